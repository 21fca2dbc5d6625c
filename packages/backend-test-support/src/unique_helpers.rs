//! Unique test values, so tests sharing a database never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("user");
/// assert_ne!(a, unique_str("user"));
/// assert!(a.starts_with("user-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// `{prefix}-{ulid}@example.test`, already in normalized (lowercase) form.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("Test");
/// assert!(email.starts_with("test-"));
/// assert!(email.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}

/// A nickname of at most 20 characters: up to 8 prefix characters followed
/// by the 12 most random characters of a ULID.
///
/// ```
/// use backend_test_support::unique_helpers::unique_nickname;
///
/// let nick = unique_nickname("a-very-long-prefix");
/// assert!(nick.chars().count() <= 20);
/// assert_ne!(nick, unique_nickname("a-very-long-prefix"));
/// ```
pub fn unique_nickname(prefix: &str) -> String {
    let ulid = Ulid::new().to_string().to_lowercase();
    let head: String = prefix.chars().take(8).collect();
    format!("{head}{}", &ulid[ulid.len() - 12..])
}
