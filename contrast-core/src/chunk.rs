//! Prompt chunking and masking.
//!
//! A prompt is addressed as an ordered sequence of chunks, each a group of up
//! to `split_k` consecutive whitespace-separated words. One chunk at a time is
//! replaced by the mask marker before being handed to the infilling capability.

use crate::error::SearchError;

/// Reserved marker standing in for a masked chunk, pending infill.
///
/// System-wide constant; the infilling capability contract assumes exactly
/// one occurrence of this token in the text it receives.
pub const MASK_TOKEN: &str = "<mask>";

/// Split a prompt into chunks of up to `split_k` words each.
///
/// The last chunk may hold fewer than `split_k` words when the word count is
/// not divisible by `split_k`. Joining the result with single spaces
/// reconstructs the prompt up to whitespace normalization (runs of whitespace
/// collapse to single spaces). Empty or whitespace-only text yields an empty
/// sequence.
pub fn split_prompt(text: &str, split_k: usize) -> Result<Vec<String>, SearchError> {
    if split_k == 0 {
        return Err(SearchError::InvalidSplitK { got: split_k });
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    Ok(words.chunks(split_k).map(|group| group.join(" ")).collect())
}

/// Reconstruct a prompt from its chunks with single-space separators.
pub fn join_chunks(chunks: &[String]) -> String {
    chunks.join(" ")
}

/// Return a copy of `chunks` with the element at `index` replaced by
/// [`MASK_TOKEN`]. The input sequence is not mutated.
///
/// An out-of-range index indicates a controller bug and fails loudly with
/// [`SearchError::MaskIndexOutOfRange`].
pub fn mask_chunk(chunks: &[String], index: usize) -> Result<Vec<String>, SearchError> {
    if index >= chunks.len() {
        return Err(SearchError::MaskIndexOutOfRange {
            index,
            len: chunks.len(),
        });
    }
    let mut masked = chunks.to_vec();
    masked[index] = MASK_TOKEN.to_string();
    Ok(masked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_split_single_words() {
        let chunks = split_prompt("the quick brown fox", 1).unwrap();
        assert_eq!(chunks, vec!["the", "quick", "brown", "fox"]);
    }

    #[test]
    fn test_split_groups_with_remainder() {
        let chunks = split_prompt("a b c d e", 2).unwrap();
        assert_eq!(chunks, vec!["a b", "c d", "e"]);
    }

    #[test]
    fn test_split_collapses_whitespace() {
        let chunks = split_prompt("  a\t b \n c  ", 1).unwrap();
        assert_eq!(chunks, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_empty_text() {
        assert!(split_prompt("", 3).unwrap().is_empty());
        assert!(split_prompt("   ", 3).unwrap().is_empty());
    }

    #[test]
    fn test_split_zero_k_rejected() {
        assert!(matches!(
            split_prompt("a b", 0),
            Err(SearchError::InvalidSplitK { got: 0 })
        ));
    }

    #[test]
    fn test_join_empty_is_empty_string() {
        assert_eq!(join_chunks(&[]), "");
    }

    #[test]
    fn test_mask_replaces_only_target() {
        let chunks = split_prompt("a b c", 1).unwrap();
        let masked = mask_chunk(&chunks, 1).unwrap();
        assert_eq!(masked, vec!["a", MASK_TOKEN, "c"]);
        // Input untouched.
        assert_eq!(chunks, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_mask_out_of_range() {
        let chunks = split_prompt("a b c", 1).unwrap();
        assert!(matches!(
            mask_chunk(&chunks, 3),
            Err(SearchError::MaskIndexOutOfRange { index: 3, len: 3 })
        ));
    }

    proptest! {
        #[test]
        fn prop_chunk_count_matches_ceil(text in "[a-z ]{0,200}", k in 1usize..8) {
            let words = text.split_whitespace().count();
            let chunks = split_prompt(&text, k).unwrap();
            prop_assert_eq!(chunks.len(), words.div_ceil(k));
        }

        #[test]
        fn prop_join_split_round_trips_normalized(text in "[a-z ]{0,200}", k in 1usize..8) {
            let joined = join_chunks(&split_prompt(&text, k).unwrap());
            let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
            prop_assert_eq!(joined, normalized);
        }
    }
}
