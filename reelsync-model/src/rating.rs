/// Audience rating normalised from the canonical provider's 0-10 scale.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rating {
    pub votes: u64,
    pub watching: u64,
    /// 0..=100
    pub percentage: u8,
    /// 0..=5, two decimals
    pub stars: f64,
}

impl Rating {
    /// Build a rating from a raw 0-10 score.
    ///
    /// `percentage = round(raw * 10)` and `stars = percentage / 100 * 5`
    /// rounded to two decimals. Scores outside the scale are clamped.
    pub fn from_raw(raw: f64, votes: u64, watching: u64) -> Self {
        let percentage = if raw.is_finite() {
            (raw * 10.0).round().clamp(0.0, 100.0) as u8
        } else {
            0
        };

        Self {
            votes,
            watching,
            percentage,
            stars: stars_for(percentage),
        }
    }
}

fn stars_for(percentage: u8) -> f64 {
    let stars = f64::from(percentage) / 100.0 * 5.0;
    (stars * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_and_stars_follow_raw_score() {
        let rating = Rating::from_raw(8.4567, 1200, 7);
        assert_eq!(rating.percentage, 85);
        assert_eq!(rating.stars, 4.25);
        assert_eq!(rating.votes, 1200);
        assert_eq!(rating.watching, 7);
    }

    #[test]
    fn stars_are_rounded_to_two_decimals() {
        let rating = Rating::from_raw(7.3, 0, 0);
        assert_eq!(rating.percentage, 73);
        assert_eq!(rating.stars, 3.65);

        let rating = Rating::from_raw(6.67, 0, 0);
        assert_eq!(rating.percentage, 67);
        assert_eq!(rating.stars, 3.35);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        assert_eq!(Rating::from_raw(12.0, 0, 0).percentage, 100);
        assert_eq!(Rating::from_raw(-1.0, 0, 0).percentage, 0);
        assert_eq!(Rating::from_raw(f64::NAN, 0, 0).percentage, 0);
    }
}
