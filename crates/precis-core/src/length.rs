//! Summary length-bound derivation.
//!
//! The model errors out when asked for a minimum or maximum output length that
//! exceeds the input's plausible capacity, so length bounds are clamped to the
//! input's word count before the model is ever called. This is a defensive
//! clamp, not a quality optimization.

/// Default minimum summary length in tokens.
pub const DEFAULT_MIN_LENGTH: usize = 100;
/// Default maximum summary length in tokens.
pub const DEFAULT_MAX_LENGTH: usize = 300;
/// Inputs below this word count are never sent to the model.
pub const MIN_SUMMARIZABLE_WORDS: usize = 10;

/// Minimum and maximum token lengths for a summarization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for LengthBounds {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

/// Outcome of adjusting the default bounds against an input's word count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Fewer than [`MIN_SUMMARIZABLE_WORDS`] words; do not call the model.
    TooShort,
    /// Safe bounds for the model call.
    Bounds(LengthBounds),
}

/// Counts whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Derives safe length bounds for `word_count` words of input.
///
/// Inputs shorter than the default minimum get bounds scaled to roughly half
/// and four-fifths of the word count. The result always satisfies
/// `min_length < max_length`.
pub fn adjust_bounds(word_count: usize, defaults: LengthBounds) -> Adjustment {
    if word_count < MIN_SUMMARIZABLE_WORDS {
        return Adjustment::TooShort;
    }

    let mut min_length = defaults.min_length;
    let mut max_length = defaults.max_length;

    if word_count < min_length {
        min_length = ((word_count as f64 * 0.5).round() as usize).max(10);
        max_length = ((word_count as f64 * 0.8).round() as usize).max(min_length + 10);
    }

    if max_length < min_length {
        max_length = min_length + 10;
    }

    Adjustment::Bounds(LengthBounds {
        min_length,
        max_length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(word_count: usize) -> LengthBounds {
        match adjust_bounds(word_count, LengthBounds::default()) {
            Adjustment::Bounds(b) => b,
            Adjustment::TooShort => panic!("unexpected TooShort for {} words", word_count),
        }
    }

    #[test]
    fn fewer_than_ten_words_is_terminal() {
        for n in 0..10 {
            assert_eq!(
                adjust_bounds(n, LengthBounds::default()),
                Adjustment::TooShort
            );
        }
    }

    #[test]
    fn short_input_scales_bounds_to_word_count() {
        let b = bounds(50);
        assert_eq!(b.min_length, 25);
        assert_eq!(b.max_length, 40);
    }

    #[test]
    fn minimum_floor_kicks_in_for_very_short_input() {
        // 10 words: half rounds to 5, floored to 10; 80% rounds to 8,
        // floored to min + 10.
        let b = bounds(10);
        assert_eq!(b.min_length, 10);
        assert_eq!(b.max_length, 20);
    }

    #[test]
    fn long_input_passes_defaults_through() {
        let b = bounds(500);
        assert_eq!(b.min_length, DEFAULT_MIN_LENGTH);
        assert_eq!(b.max_length, DEFAULT_MAX_LENGTH);
    }

    #[test]
    fn max_never_below_min() {
        for n in 10..600 {
            let b = bounds(n);
            assert!(
                b.min_length < b.max_length,
                "degenerate bounds {:?} for {} words",
                b,
                n
            );
        }
    }

    #[test]
    fn inverted_defaults_are_repaired() {
        let defaults = LengthBounds {
            min_length: 300,
            max_length: 100,
        };
        match adjust_bounds(400, defaults) {
            Adjustment::Bounds(b) => {
                assert_eq!(b.min_length, 300);
                assert_eq!(b.max_length, 310);
            }
            Adjustment::TooShort => panic!("unexpected TooShort"),
        }
    }

    #[test]
    fn counts_whitespace_delimited_words() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("one  two\nthree"), 3);
    }
}
