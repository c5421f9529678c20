//! Query extractor

use crate::error::AppError;
use actix_web::{dev, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use serde::de;
use std::{fmt, ops};

/// Query extractor backed by `serde_qs`. A missing or malformed query is a
/// bad request.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Deconstruct to a inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> ops::Deref for Query<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> FromRequest for Query<T>
where
    T: de::DeserializeOwned,
{
    type Error = AppError;
    type Future = Ready<Result<Self, AppError>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        ready(
            serde_qs::from_str::<T>(req.query_string())
                .map(Query)
                .map_err(|e| AppError::bad_request(format!("Could not extract query: {}", e))),
        )
    }
}
