//! Size validator: the final post-condition pass.

use tracing::debug;

use super::base::char_len;
use super::hard_split::split_at_boundary;

/// Replace every chunk longer than `hard_max` characters with its hard
/// boundary pieces. Compliant chunks pass through untouched and order is
/// preserved, so applying this twice is the same as applying it once.
pub fn enforce(chunks: Vec<String>, hard_max: usize) -> Vec<String> {
    let mut validated = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        let chars = char_len(&chunk);
        if chars > hard_max {
            debug!(chars, hard_max, "Chunk over hard cap, force-splitting");
            validated.extend(split_at_boundary(&chunk, hard_max));
        } else {
            validated.push(chunk);
        }
    }

    validated
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compliant_chunks_untouched() {
        let chunks = vec!["one".to_string(), "two".to_string()];
        assert_eq!(enforce(chunks.clone(), 3), chunks);
    }

    #[test]
    fn test_oversize_chunk_replaced_in_place() {
        let chunks = vec!["a".to_string(), "b".repeat(7), "c".to_string()];
        let validated = enforce(chunks, 5);
        assert_eq!(validated, vec!["a", "bbbbb", "bb", "c"]);
    }

    #[test]
    fn test_idempotent() {
        let chunks = vec!["x".repeat(23), "short".to_string(), format!("{} {}", "p".repeat(9), "q".repeat(9))];
        let once = enforce(chunks, 10);
        let twice = enforce(once.clone(), 10);
        assert_eq!(once, twice);
    }
}
