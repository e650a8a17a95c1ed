use subtle::ConstantTimeEq;

/// Exact equality of two shared secrets, compared in constant time.
///
/// Only the length leaks: strings of different length never match and
/// return early.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();

    if provided.len() != expected.len() {
        return false;
    }

    provided.ct_eq(expected).into()
}
