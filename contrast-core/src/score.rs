//! Contrast scoring between two responses.
//!
//! The score is `1 - similarity_ratio` over the two strings as character
//! sequences, so a larger difference yields a higher score. The ratio is the
//! longest-matching-subsequence measure from the `similar` crate, which
//! favors detecting structural rewrites over mere substring edits.

use similar::TextDiff;

/// Compute the contrast score between a reference response and a candidate
/// response.
///
/// Bounded in `[0, 1]`, symmetric, deterministic. Identical strings score
/// `0.0`; strings with no common characters score `1.0`.
pub fn contrast_score(reference: &str, candidate: &str) -> f64 {
    let ratio = f64::from(TextDiff::from_chars(reference, candidate).ratio());
    (1.0 - ratio).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identical_strings_score_zero() {
        assert_eq!(contrast_score("same response", "same response"), 0.0);
    }

    #[test]
    fn test_disjoint_strings_score_one() {
        assert_eq!(contrast_score("aaaa", "bbbb"), 1.0);
    }

    #[test]
    fn test_partial_overlap_is_between_bounds() {
        let score = contrast_score("the cat sat", "the cat ran");
        assert!(score > 0.0 && score < 1.0, "score was {score}");
    }

    #[test]
    fn test_both_empty_score_zero() {
        assert_eq!(contrast_score("", ""), 0.0);
    }

    proptest! {
        #[test]
        fn prop_symmetric(a in ".{0,80}", b in ".{0,80}") {
            prop_assert_eq!(
                contrast_score(&a, &b).to_bits(),
                contrast_score(&b, &a).to_bits()
            );
        }

        #[test]
        fn prop_identity_scores_zero(a in ".{0,120}") {
            prop_assert_eq!(contrast_score(&a, &a), 0.0);
        }

        #[test]
        fn prop_bounded(a in ".{0,80}", b in ".{0,80}") {
            let s = contrast_score(&a, &b);
            prop_assert!((0.0..=1.0).contains(&s));
        }
    }
}
