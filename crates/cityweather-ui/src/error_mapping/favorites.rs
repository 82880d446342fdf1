use crate::models::favorites_model::FavoritesError as UiFavoritesError;
use cityweather_core::{AppError, FavoritesError};

impl From<UiFavoritesError> for AppError {
    fn from(e: UiFavoritesError) -> Self {
        match e {
            UiFavoritesError::RemoveFailed(id) => {
                AppError::Favorites(FavoritesError::RemoveFailed(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_failure_message() {
        let err: AppError = UiFavoritesError::RemoveFailed(3).into();
        assert!(matches!(err, AppError::Favorites(FavoritesError::RemoveFailed(3))));
        assert!(!err.user_message().is_empty());
    }
}
