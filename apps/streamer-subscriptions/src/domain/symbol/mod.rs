//! Symbol Normalization
//!
//! Converts raw tickers into the streamer's wire symbol form. The suffix
//! table is part of the vendor protocol, so the rewrite rules below are
//! applied exactly as listed, including the lowercase `p` for preferred
//! share classes.
//!
//! | Raw      | Wire       | Rule                       |
//! |----------|------------|----------------------------|
//! | `t.a`    | `T/A`      | share class dot            |
//! | `brk-b`  | `BRKpB`    | preferred hyphen           |
//! | `abc+a`  | `ABC/WS/A` | warrant with series        |
//! | `spy+`   | `SPY/WS`   | trailing warrant marker    |

/// Suffix rewrites keyed on the second-to-last character.
const SUFFIX_TABLE: [(char, &str); 3] = [('.', "/"), ('-', "p"), ('+', "/WS/")];

/// Replacement for a trailing `+`.
const WARRANT_SUFFIX: &str = "/WS";

fn suffix_replacement(c: char) -> Option<&'static str> {
    SUFFIX_TABLE
        .iter()
        .find(|(key, _)| *key == c)
        .map(|(_, replacement)| *replacement)
}

/// Normalize a raw ticker into its encoded, uppercased wire form.
///
/// Total and pure: every input maps to exactly one output. Only ASCII
/// letters are uppercased, so the output has one character per input
/// character outside the rewritten suffix.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let upper: Vec<char> = raw.chars().map(|c| c.to_ascii_uppercase()).collect();
    let len = upper.len();

    if len < 2 {
        return upper.into_iter().collect();
    }

    if let Some(replacement) = suffix_replacement(upper[len - 2]) {
        let mut out: String = upper[..len - 2].iter().collect();
        out.push_str(replacement);
        out.push(upper[len - 1]);
        return out;
    }

    if upper[len - 1] == '+' {
        let mut out: String = upper[..len - 1].iter().collect();
        out.push_str(WARRANT_SUFFIX);
        return out;
    }

    upper.into_iter().collect()
}
