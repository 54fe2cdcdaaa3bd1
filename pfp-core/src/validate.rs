//! Path parameter validation.

use crate::constants::{GITHUB_LOGIN_MAX_LEN, USER_ID_MAX_DIGITS, USER_ID_MIN_DIGITS};

/// True for a Discord snowflake: 17 to 20 ASCII digits, nothing else.
pub fn is_valid_user_id(id: &str) -> bool {
    (USER_ID_MIN_DIGITS..=USER_ID_MAX_DIGITS).contains(&id.len())
        && id.bytes().all(|b| b.is_ascii_digit())
}

/// True for a login that can be looked up as one `/users/{login}` path
/// segment: non-empty, bounded, and free of path separators, query or
/// fragment syntax, escapes, whitespace and `..`.
///
/// Anything else GitHub issues is accepted, including `dependabot[bot]` and
/// `alice_acme`.
pub fn is_valid_github_login(login: &str) -> bool {
    (1..=GITHUB_LOGIN_MAX_LEN).contains(&login.len())
        && !login.contains("..")
        && !login
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
}
