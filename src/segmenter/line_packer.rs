//! Line-level packer for blocks without sentence punctuation.

use super::base::Accumulator;

/// Greedily pack newline-delimited lines into chunks under `target`.
///
/// Lines are trimmed, blank lines skipped, and the survivors joined by
/// `\n`. A single line longer than the hard cap is passed through as-is;
/// the size validator cuts it afterwards.
pub fn pack_lines(text: &str, target: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut acc = Accumulator::new("\n", target);

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        chunks.extend(acc.push(line));
    }

    chunks.extend(acc.flush());
    chunks
}
