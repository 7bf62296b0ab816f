//! Content fingerprinting
//!
//! A document's identity is the blake3 digest of its raw upload bytes.
//! The same digest drives deduplication, the content-addressed storage
//! path, and the Qdrant point id.

use uuid::Uuid;

/// Namespace for deriving Qdrant point UUIDs from fingerprints
const POINT_NAMESPACE: Uuid = Uuid::from_bytes([
    0x8e, 0x1f, 0x4a, 0x02, 0x6b, 0x3d, 0x4c, 0x51, 0x9a, 0x77, 0x15, 0x2e, 0xc0, 0xde, 0x5e,
    0xed,
]);

/// Compute the content fingerprint of raw file bytes
pub fn fingerprint(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Derive the stable Qdrant point id for a fingerprint
pub fn point_id(fingerprint: &str) -> Uuid {
    Uuid::new_v5(&POINT_NAMESPACE, fingerprint.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let a = fingerprint(b"course content");
        let b = fingerprint(b"course content");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_differs_on_content() {
        assert_ne!(fingerprint(b"lecture 1"), fingerprint(b"lecture 2"));
    }

    #[test]
    fn test_point_id_stable() {
        let fp = fingerprint(b"some bytes");
        assert_eq!(point_id(&fp), point_id(&fp));
        assert_ne!(point_id(&fp), point_id("other"));
    }
}
