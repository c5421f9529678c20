use actix_web::error::BlockingError;
use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found<T: Into<String>>(what: T) -> Self {
        Self::NotFound(what.into())
    }

    pub fn forbidden<T: Into<String>>(what: T) -> Self {
        Self::Forbidden(what.into())
    }

    pub fn bad_request<T: Into<String>>(what: T) -> Self {
        Self::BadRequest(what.into())
    }
}

impl From<BlockingError> for AppError {
    fn from(e: BlockingError) -> Self {
        Self::Internal(anyhow::anyhow!("blocking task failed: {}", e))
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(e: diesel::result::Error) -> Self {
        Self::Internal(e.into())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        Self::Internal(e.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthenticated => HttpResponse::Found()
                .insert_header((header::LOCATION, "/login"))
                .finish(),
            AppError::Internal(e) => {
                error!("{:#}", e);
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
            _ => HttpResponse::build(self.status_code()).body(self.to_string()),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
