//! Handle Bridge
//!
//! Lets callers that cannot see the concrete subscription variants hold,
//! query and release them through opaque handles.
//!
//! ```text
//! Uninitialized --create--> Live --destroy--> Destroyed
//! ```
//!
//! Every operation on an `Uninitialized` or `Destroyed` handle fails
//! without side effects. There is no way back to `Live`.

mod error;
mod handle;
mod registry;

pub use error::{BridgeError, ErrorKind};
pub use handle::{Handle, HandleState, INERT_KIND_ID, KindRange};
pub use registry::{DEFAULT_MAX_HANDLES, HandleRegistry};
