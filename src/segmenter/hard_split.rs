//! Hard boundary splitter, the terminal tier.
//!
//! Cuts any string into pieces of at most `cap` characters. It never
//! fails and never calls another tier, so every other tier can fall back
//! to it without risking a cycle.

use super::base::char_len;

/// Split `text` into trimmed pieces of at most `cap` characters.
///
/// Prefers to cut on the last whitespace at or after `0.8 * cap` into the
/// current window, dropping that whitespace character; otherwise cuts at
/// exactly `cap`. Text that already fits is returned unchanged as a single
/// piece. Blank pieces are not emitted. A `cap` of zero is treated as one.
pub fn split_at_boundary(text: &str, cap: usize) -> Vec<String> {
    let cap = cap.max(1);
    if char_len(text) <= cap {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    let min_fill = min_fill(cap);
    let mut pieces = Vec::new();
    let mut offset = 0;

    while offset < chars.len() {
        if chars.len() - offset <= cap {
            push_trimmed(&mut pieces, &chars[offset..]);
            break;
        }

        let limit = offset + cap;
        // `limit` itself is a valid cut: the piece is exactly `cap` chars
        // and the whitespace at `limit` is consumed.
        let boundary = (offset + min_fill..=limit)
            .rev()
            .find(|&i| chars[i].is_whitespace());

        match boundary {
            Some(cut) => {
                push_trimmed(&mut pieces, &chars[offset..cut]);
                offset = cut + 1;
            }
            None => {
                push_trimmed(&mut pieces, &chars[offset..limit]);
                offset = limit;
            }
        }
    }

    pieces
}

/// `ceil(0.8 * cap)`: a whitespace cut must keep at least this many
/// characters in the piece. At least 1 so every cut advances.
fn min_fill(cap: usize) -> usize {
    (cap * 4).div_ceil(5).clamp(1, cap)
}

fn push_trimmed(pieces: &mut Vec<String>, chars: &[char]) {
    let piece: String = chars.iter().collect();
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        pieces.push(trimmed.to_string());
    }
}
