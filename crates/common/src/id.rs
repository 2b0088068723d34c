//! ID and ticket-code generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// Prefix for human-readable complaint ticket codes.
pub const TICKET_CODE_PREFIX: &str = "CMP-";

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based entity ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a human-readable complaint ticket code (`CMP-XXXXXXXX`).
    ///
    /// The suffix is the random tail of a fresh ULID, kept uppercase so the
    /// code can be read back over the phone. Uniqueness is backed by the
    /// database index on the ticket code column.
    #[must_use]
    pub fn generate_ticket_code(&self) -> String {
        let ulid = Ulid::new().to_string();
        // A ULID is 26 Crockford-base32 chars; the last 16 are random.
        format!("{}{}", TICKET_CODE_PREFIX, &ulid[18..26])
    }

    /// Generate an opaque bearer token for a provisioned user.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // Use UUID v4 for tokens (no time component for security)
        Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_ticket_code_shape() {
        let id_gen = IdGenerator::new();
        let code = id_gen.generate_ticket_code();

        assert!(code.starts_with(TICKET_CODE_PREFIX));
        assert_eq!(code.len(), TICKET_CODE_PREFIX.len() + 8);
        let suffix = &code[TICKET_CODE_PREFIX.len()..];
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_ticket_codes_differ() {
        let id_gen = IdGenerator::new();
        let a = id_gen.generate_ticket_code();
        let b = id_gen.generate_ticket_code();
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_token() {
        let id_gen = IdGenerator::new();
        let token = id_gen.generate_token();

        assert_eq!(token.len(), 32); // Simple UUID without hyphens
    }
}
