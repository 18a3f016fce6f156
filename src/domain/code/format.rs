use regex::Regex;
use std::sync::LazyLock;

// `[0-9]` rather than `\d`: the regex crate's `\d` is Unicode-aware.
static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^P[0-9]{5}$").expect("product code pattern is a valid regex"));

/// Returns true iff `code` is a literal `P` followed by exactly five ASCII digits.
pub fn is_valid_format(code: &str) -> bool {
    CODE_PATTERN.is_match(code)
}
