use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Invalid submission: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rating {0} is outside 1-5")]
    InvalidRating(f64),

    #[error("Unknown vote direction: {0}")]
    InvalidVote(String),

    #[error("Login required")]
    Unauthorized,

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Rate limited, retry in {0}s")]
    RateLimited(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::Validation(_) => "Some required recipe details are missing or invalid.",
            Self::NotFound(_) => "That recipe could not be found.",
            Self::InvalidRating(_) => "Ratings must be between 1 and 5 stars.",
            Self::InvalidVote(_) => "Votes must be either up or down.",
            Self::Unauthorized => "Please log in first.",
            Self::Conflict(_) => "That username or email is already taken.",
            Self::RateLimited(_) => "Too many requests. Please slow down.",
            Self::Config(_) | Self::Internal(_) => "Something went wrong on our side. Try again later.",
        }
    }
}

#[cfg(feature = "http")]
mod http_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        message: String,
    }

    impl AppError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                AppError::Validation(_) | AppError::InvalidRating(_) | AppError::InvalidVote(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                AppError::Unauthorized => StatusCode::UNAUTHORIZED,
                AppError::Conflict(_) => StatusCode::CONFLICT,
                AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = self.status_code();
            let message = match &self {
                AppError::Config(_) | AppError::Internal(_) => self.user_message().to_string(),
                _ => self.to_string(),
            };
            (status, Json(ErrorResponse { message })).into_response()
        }
    }
}
