//! ID and identifier generation utilities.
//!
//! Primary keys are ULIDs. Admission references, PINs, student index
//! numbers and temporary passwords are short human-presentable codes;
//! callers are responsible for probing the store for collisions and
//! regenerating (see the admission and enrollment services).

use chrono::{Datelike, Utc};
use rand::Rng;
use ulid::Ulid;

/// Uppercase alphanumerics used for admission references.
const REFERENCE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Mixed-case alphanumerics used for temporary passwords. Excludes
/// ambiguous glyphs (0/O, 1/l/I) since the password is read out to the
/// applicant from a printed slip.
const PASSWORD_ALPHABET: &[u8] = b"abcdefghijkmnpqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// ID generator for entities and human-facing admission identifiers.
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

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a candidate admission reference: `APP-<year>-<6 uppercase
    /// alphanumerics>` (36^6 ≈ 2.1e9 values per year).
    #[must_use]
    pub fn application_reference(&self) -> String {
        let year = Utc::now().year();
        format!("APP-{year}-{}", random_string(REFERENCE_ALPHABET, 6))
    }

    /// Generate a candidate 6-digit numeric admission PIN.
    ///
    /// Used as a lighter-weight lookup secret alongside the reference.
    /// Leading zeros are preserved.
    #[must_use]
    pub fn application_pin(&self) -> String {
        let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
        format!("{n:06}")
    }

    /// Generate a candidate student index number: `STU-<year>-<4 digits>`.
    #[must_use]
    pub fn student_index_number(&self) -> String {
        let year = Utc::now().year();
        let n: u32 = rand::thread_rng().gen_range(0..10_000);
        format!("STU-{year}-{n:04}")
    }

    /// Generate the random 3-digit suffix appended to derived usernames.
    #[must_use]
    pub fn username_suffix(&self) -> String {
        let n: u32 = rand::thread_rng().gen_range(0..1_000);
        format!("{n:03}")
    }

    /// Generate a random temporary password of the given length.
    #[must_use]
    pub fn temp_password(&self, length: usize) -> String {
        random_string(PASSWORD_ALPHABET, length)
    }
}

fn random_string(alphabet: &[u8], length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
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
    fn test_application_reference_format() {
        let id_gen = IdGenerator::new();
        let reference = id_gen.application_reference();

        let parts: Vec<&str> = reference.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "APP");
        assert_eq!(parts[1].len(), 4);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 6);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_application_pin_is_six_digits() {
        let id_gen = IdGenerator::new();
        for _ in 0..50 {
            let pin = id_gen.application_pin();
            assert_eq!(pin.len(), 6);
            assert!(pin.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_student_index_number_format() {
        let id_gen = IdGenerator::new();
        let index = id_gen.student_index_number();

        let parts: Vec<&str> = index.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "STU");
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_username_suffix_is_three_digits() {
        let id_gen = IdGenerator::new();
        for _ in 0..50 {
            let suffix = id_gen.username_suffix();
            assert_eq!(suffix.len(), 3);
            assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_temp_password_length_and_alphabet() {
        let id_gen = IdGenerator::new();
        let password = id_gen.temp_password(8);

        assert_eq!(password.len(), 8);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!password.contains('0'));
        assert!(!password.contains('O'));
        assert!(!password.contains('l'));
    }
}
