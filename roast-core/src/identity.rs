//! Identity types for playground entities

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Entity identifier using UUIDv7 for timestamp-sortable IDs.
/// UUIDv7 embeds a Unix timestamp, making IDs naturally sortable by creation time.
pub type EntityId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

pub type AgentId = EntityId;
pub type OwnerId = EntityId;
pub type ProblemId = EntityId;
pub type IdeaId = EntityId;
pub type CritiqueId = EntityId;
pub type ConversationId = EntityId;
pub type FeedEventId = EntityId;

/// Generate a new UUIDv7 EntityId (timestamp-sortable).
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}

/// Hex-encoded SHA-256 digest of a secret.
///
/// Credentials are indexed by digest so the plaintext only exists in the
/// registration response.
pub fn secret_digest(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_digest_is_stable_and_hex() {
        let a = secret_digest("roast_abc");
        let b = secret_digest("roast_abc");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, secret_digest("roast_abd"));
    }

    #[test]
    fn test_entity_ids_are_time_ordered() {
        let first = new_entity_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = new_entity_id();
        assert!(first < second);
    }
}
