use crate::models::search_model::{SaveOutcome, SearchError};
use cityweather_core::{AppError, FavoritesError, WeatherError};

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Geocoding(s) => AppError::Weather(WeatherError::GeocodingFailed(s)),
            SearchError::Weather(s) => AppError::Weather(WeatherError::ApiError(s)),
            SearchError::InvalidSelection(i) => {
                AppError::Service(format!("No search result at index {}", i))
            }
        }
    }
}

impl SaveOutcome {
    /// The error to show for an unsuccessful save, if any.
    pub fn into_result(self) -> Result<String, AppError> {
        match self {
            SaveOutcome::Saved { city_name } => Ok(city_name),
            SaveOutcome::LimitReached { limit } => {
                Err(AppError::Favorites(FavoritesError::LimitReached(limit)))
            }
            SaveOutcome::Rejected { city_name } => {
                Err(AppError::Favorites(FavoritesError::SaveRejected(city_name)))
            }
            SaveOutcome::NothingSelected => Err(AppError::Service("No city selected".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn geocoding_failure_message() {
        let err: AppError = SearchError::Geocoding("503".into()).into();
        assert_eq!(err.user_message(), "Geocoding failed. Please try again.");
    }

    #[test]
    fn save_outcome_messages() {
        let limit = SaveOutcome::LimitReached { limit: 5 }.into_result().unwrap_err();
        assert_eq!(limit.user_message(), "You can only save up to 5 cities.");

        let rejected = SaveOutcome::Rejected {
            city_name: "Paris".into(),
        }
        .into_result()
        .unwrap_err();
        assert_eq!(
            rejected.user_message(),
            "Could not save city (maybe it's already saved)."
        );

        let saved = SaveOutcome::Saved {
            city_name: "Paris".into(),
        };
        assert_eq!(saved.into_result().unwrap(), "Paris");
    }
}
