//! Merkle tree calculation over opaque block payloads
//!
//! Each payload entry is hashed individually as a leaf; pairs are combined
//! level by level until a single root digest remains. An odd node at the
//! end of a level is paired with itself.

use super::hash::{sha256_hex, ZERO_HASH};

/// Calculate the merkle root of an ordered data payload.
///
/// An empty payload has the defined root of 64 zero characters, not an
/// incidental hash of nothing.
pub fn merkle_root(data: &[String]) -> String {
    if data.is_empty() {
        return ZERO_HASH.to_string();
    }

    let mut level: Vec<String> = data.iter().map(|d| sha256_hex(d.as_bytes())).collect();

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));

        for pair in level.chunks(2) {
            let combined = if pair.len() == 2 {
                format!("{}{}", pair[0], pair[1])
            } else {
                format!("{}{}", pair[0], pair[0])
            };
            next.push(sha256_hex(combined.as_bytes()));
        }

        level = next;
    }

    level.remove(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_payload_is_zero_sentinel() {
        assert_eq!(merkle_root(&[]), ZERO_HASH);
    }

    #[test]
    fn test_single_leaf() {
        let root = merkle_root(&payload(&["x"]));
        assert_eq!(root, sha256_hex(b"x"));
        assert_eq!(root, merkle_root(&payload(&["x"])));
    }

    #[test]
    fn test_two_leaves() {
        let left = sha256_hex(b"a");
        let right = sha256_hex(b"b");
        let expected = sha256_hex(format!("{}{}", left, right).as_bytes());
        assert_eq!(merkle_root(&payload(&["a", "b"])), expected);
    }

    #[test]
    fn test_odd_leaf_paired_with_itself() {
        let ab = {
            let left = sha256_hex(b"a");
            let right = sha256_hex(b"b");
            sha256_hex(format!("{}{}", left, right).as_bytes())
        };
        let cc = {
            let c = sha256_hex(b"c");
            sha256_hex(format!("{}{}", c, c).as_bytes())
        };
        let expected = sha256_hex(format!("{}{}", ab, cc).as_bytes());
        assert_eq!(merkle_root(&payload(&["a", "b", "c"])), expected);
    }

    #[test]
    fn test_order_matters() {
        assert_ne!(
            merkle_root(&payload(&["a", "b"])),
            merkle_root(&payload(&["b", "a"]))
        );
    }
}
