//! `VERBOSE` environment value parsing.

/// Interpret a `VERBOSE` value: unset, `"0"`, and `"false"` are off; anything
/// else (including the empty string) is on.
pub fn verbose_from_env(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(value) => !matches!(value, "0" | "false"),
    }
}
