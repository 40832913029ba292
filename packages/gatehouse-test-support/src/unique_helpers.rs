//! Unique test data built from ULIDs, so tests sharing a process never collide.

use ulid::Ulid;

/// Generate a unique string in the format `{prefix}-{ulid}`
///
/// ```
/// use gatehouse_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("guard");
/// assert_ne!(a, unique_str("guard"));
/// assert!(a.starts_with("guard-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email address in the format `{prefix}-{ulid}@example.test`
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}

/// Generate a unique principal id; ULID randomness keeps collisions out of reach
pub fn unique_id() -> i64 {
    (Ulid::new().random() as i64 & i64::MAX).max(1)
}
