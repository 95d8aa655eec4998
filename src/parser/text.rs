/// Collapse every whitespace run (newlines included) to a single space and
/// trim both ends.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
