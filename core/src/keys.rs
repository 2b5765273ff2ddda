//! Shape check shared by session keys and developer keys.

/// Length of every key the API hands out.
pub const KEY_LEN: usize = 32;

/// Reports whether `key` could be an API key: exactly 32 hex digits, in
/// either case, and nothing else.
///
/// The login endpoint answers failed logins with HTTP 200 and an error
/// sentence, so this check is also what tells a token from an error body.
pub fn is_valid_key(key: &str) -> bool {
    key.len() == KEY_LEN && key.bytes().all(|b| b.is_ascii_hexdigit())
}
