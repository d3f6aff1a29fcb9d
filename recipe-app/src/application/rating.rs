use crate::domain::Ratings;
use recipe_errors::AppError;

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

pub struct RatingAggregator;

impl RatingAggregator {
    /// Folds one more rating into the running mean.
    pub fn rate(current: Ratings, rating: f64) -> Result<Ratings, AppError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(AppError::InvalidRating(rating));
        }

        let count = current.count + 1;
        let average = (current.average * f64::from(current.count) + rating) / f64::from(count);

        Ok(Ratings { average, count })
    }
}
