//! Opaque identifier generation.

use uuid::Uuid;

/// Well-known id of the synthetic Today tag. The destination looks this
/// tag up by id, so it must never be replaced by a generated one.
pub const TODAY_TAG_ID: &str = "TODAY";

/// Generate a fresh opaque entity id.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn today_id_is_not_a_generated_id() {
        assert!(Uuid::parse_str(TODAY_TAG_ID).is_err());
    }
}
