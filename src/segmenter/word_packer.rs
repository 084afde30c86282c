//! Word-level packer, the last tier that respects semantic boundaries.

use tracing::debug;

use super::base::{char_len, Accumulator};
use super::hard_split::split_at_boundary;

/// Greedily pack whitespace-delimited tokens into chunks under `target`.
///
/// Tokens are joined by single spaces. A token longer than `target` is
/// never packed: the pending buffer is flushed, the token is handed to the
/// hard boundary splitter with `hard_max`, and its pieces are emitted
/// directly.
pub fn pack_words(text: &str, target: usize, hard_max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut acc = Accumulator::new(" ", target);

    for token in text.split_whitespace() {
        let token_chars = char_len(token);
        if token_chars > target {
            chunks.extend(acc.flush());
            debug!(token_chars, hard_max, "Oversized token, cutting at hard boundary");
            chunks.extend(split_at_boundary(token, hard_max));
            continue;
        }
        chunks.extend(acc.push(token));
    }

    chunks.extend(acc.flush());
    chunks
}
