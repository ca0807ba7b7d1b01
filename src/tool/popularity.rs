//! Search-volume popularity score.

/// Score assigned when the search volume is unknown or zero.
pub const DEFAULT_POPULARITY: u8 = 50;

/// Maps a search-result count onto the 50..=100 popularity scale.
///
/// `round(min(50 + log10(count) * 10, 100))`, with `0` mapping to
/// [`DEFAULT_POPULARITY`].
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn calculate_popularity(search_count: u64) -> u8 {
    if search_count == 0 {
        return DEFAULT_POPULARITY;
    }
    let score = (50.0 + (search_count as f64).log10() * 10.0).min(100.0);
    score.round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_popularity_zero_is_default() {
        assert_eq!(calculate_popularity(0), 50);
    }

    #[test]
    fn test_calculate_popularity_known_points() {
        assert_eq!(calculate_popularity(1), 50);
        assert_eq!(calculate_popularity(10), 60);
        assert_eq!(calculate_popularity(100), 70);
        assert_eq!(calculate_popularity(1_000_000), 100);
    }

    #[test]
    fn test_calculate_popularity_caps_at_hundred() {
        assert_eq!(calculate_popularity(u64::MAX), 100);
    }

    #[test]
    fn test_calculate_popularity_rounds_half_up() {
        // log10(3162) * 10 = 34.999..., log10(3163) * 10 = 35.0009...
        assert_eq!(calculate_popularity(3162), 85);
        assert_eq!(calculate_popularity(3163), 85);
        assert_eq!(calculate_popularity(31), 65);
    }

    #[test]
    fn test_calculate_popularity_is_monotonic() {
        let mut previous = calculate_popularity(0);
        for count in (0..200_000u64).step_by(37) {
            let score = calculate_popularity(count);
            assert!(score >= previous, "score dropped at count {count}");
            previous = score;
        }
    }
}
