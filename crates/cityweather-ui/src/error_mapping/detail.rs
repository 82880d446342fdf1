use crate::models::detail_model::DetailError;
use cityweather_core::{AppError, WeatherError};

impl From<DetailError> for AppError {
    fn from(e: DetailError) -> Self {
        match e {
            DetailError::CityNotFound(s) => AppError::Weather(WeatherError::CityNotFound(s)),
            DetailError::FetchFailed(s) => AppError::Weather(WeatherError::ApiError(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_error_messages() {
        let not_found: AppError = DetailError::CityNotFound("Atlantis".into()).into();
        assert_eq!(
            not_found.user_message(),
            "City not found. Check the name and try again."
        );

        let failed: AppError = DetailError::FetchFailed("timeout".into()).into();
        assert_eq!(
            failed.user_message(),
            "Failed to fetch weather data. Please try again."
        );
    }
}
