//! Star rating rendering for difficulty scores.

pub const STAR_COUNT: usize = 5;
pub const FILLED_STAR: char = '★';
pub const EMPTY_STAR: char = '☆';

/// Number of filled stars for a difficulty score in `[0, 1]`.
///
/// Position `i` is filled when `i <= floor(difficulty * 5)`, so a score of
/// zero still shows one star. Missing and NaN scores show none; scores past
/// either end of the range clamp to none or all.
pub fn filled_stars(difficulty: Option<f64>) -> usize {
    let Some(difficulty) = difficulty.filter(|d| !d.is_nan()) else {
        return 0;
    };
    let level = (difficulty * STAR_COUNT as f64).floor();
    if level < 0.0 {
        return 0;
    }
    (level as usize).saturating_add(1).min(STAR_COUNT)
}

/// Renders the rating string, each symbol preceded by two spaces.
pub fn render_rating(difficulty: Option<f64>) -> String {
    let filled = filled_stars(difficulty);
    (0..STAR_COUNT)
        .map(|i| if i < filled { FILLED_STAR } else { EMPTY_STAR })
        .fold(String::new(), |mut out, star| {
            out.push_str("  ");
            out.push(star);
            out
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_filled(rating: &str) -> usize {
        rating.chars().filter(|c| *c == FILLED_STAR).count()
    }

    #[test]
    fn high_difficulty_fills_every_star() {
        assert_eq!(filled_stars(Some(0.83)), 5);
        assert_eq!(filled_stars(Some(0.8)), 5);
        assert_eq!(filled_stars(Some(1.0)), 5);
    }

    #[test]
    fn zero_difficulty_fills_first_star() {
        assert_eq!(filled_stars(Some(0.0)), 1);
        assert_eq!(filled_stars(Some(0.19)), 1);
        assert_eq!(filled_stars(Some(0.4)), 3);
    }

    #[test]
    fn missing_or_invalid_difficulty_is_empty() {
        assert_eq!(filled_stars(None), 0);
        assert_eq!(filled_stars(Some(f64::NAN)), 0);
        assert_eq!(filled_stars(Some(-0.5)), 0);
        assert_eq!(filled_stars(Some(f64::NEG_INFINITY)), 0);
    }

    #[test]
    fn out_of_range_high_difficulty_clamps_to_full() {
        assert_eq!(filled_stars(Some(1.7)), 5);
        assert_eq!(filled_stars(Some(f64::INFINITY)), 5);
    }

    #[test]
    fn rating_string_layout() {
        assert_eq!(render_rating(Some(0.4)), "  ★  ★  ★  ☆  ☆");
        assert_eq!(render_rating(None), "  ☆  ☆  ☆  ☆  ☆");
        assert_eq!(count_filled(&render_rating(Some(0.83))), 5);
        assert_eq!(render_rating(Some(0.0)).chars().count(), 15);
    }
}
