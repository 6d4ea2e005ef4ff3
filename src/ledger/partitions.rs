//! Key layout and encoding utilities for Fjall partitions
//!
//! Partition structure:
//! - `topics`: topic:{name} -> TopicRecord (JSON)
//! - `details`: detail:{name}\0{seq:016} -> AuditRecord (JSON)
//!
//! Topic names never contain control characters, so the NUL separator keeps
//! the detail prefix of `a` from matching the details of `a:b`.

pub const TOPICS_PARTITION: &str = "topics";
pub const DETAILS_PARTITION: &str = "details";

/// Encode a topic key: topic:{name}
pub fn encode_topic_key(name: &str) -> Vec<u8> {
    format!("topic:{}", name).into_bytes()
}

/// Decode a topic key: topic:{name} -> name
pub fn decode_topic_key(key: &[u8]) -> Option<String> {
    let key_str = std::str::from_utf8(key).ok()?;
    key_str.strip_prefix("topic:").map(String::from)
}

/// Encode a detail key: detail:{name}\0{seq:016}
pub fn encode_detail_key(name: &str, seq: u64) -> Vec<u8> {
    format!("detail:{}\0{:016}", name, seq).into_bytes()
}

/// Encode a detail prefix for range scan: detail:{name}\0
pub fn encode_detail_prefix(name: &str) -> Vec<u8> {
    format!("detail:{}\0", name).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_key_encoding() {
        let key = encode_topic_key("coffee");
        assert_eq!(key, b"topic:coffee");
        assert_eq!(decode_topic_key(&key).unwrap(), "coffee");
        assert!(decode_topic_key(b"detail:coffee").is_none());
    }

    #[test]
    fn test_detail_key_encoding() {
        let key = encode_detail_key("coffee", 42);
        assert_eq!(key, b"detail:coffee\x000000000000000042");
        assert!(key.starts_with(&encode_detail_prefix("coffee")));
    }

    #[test]
    fn test_detail_keys_sort_chronologically() {
        let mut keys = vec![
            encode_detail_key("t", 10),
            encode_detail_key("t", 2),
            encode_detail_key("t", 1),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                encode_detail_key("t", 1),
                encode_detail_key("t", 2),
                encode_detail_key("t", 10),
            ]
        );
    }

    #[test]
    fn test_detail_prefix_does_not_leak_into_similar_names() {
        let prefix = encode_detail_prefix("a");
        assert!(encode_detail_key("a", 0).starts_with(&prefix));
        assert!(!encode_detail_key("a:b", 0).starts_with(&prefix));
        assert!(!encode_detail_key("ab", 0).starts_with(&prefix));
    }
}
