use std::collections::BTreeMap;

use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::{validation::ValidationErrors, JsonResponse};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    NotAuthorized(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("validation failed: {0:?}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    ServerError(#[from] anyhow::Error),
    #[error("database error: {0}")]
    DatabaseError(sqlx::Error),
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RequestErrorJsonWrapper {
    pub errors: BTreeMap<String, Vec<String>>,
}

impl RequestErrorJsonWrapper {
    pub fn new(error: &str) -> RequestErrorJsonWrapper {
        let mut errors = BTreeMap::new();
        errors.insert("body".to_owned(), vec![error.to_owned()]);
        RequestErrorJsonWrapper { errors }
    }
}

impl From<ValidationErrors> for RequestErrorJsonWrapper {
    fn from(value: ValidationErrors) -> Self {
        RequestErrorJsonWrapper {
            errors: value.into_inner(),
        }
    }
}

impl From<sqlx::Error> for RequestError {
    fn from(value: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &value {
            let message = db_error.message();
            if let Some(field) = unique_violation_field(message) {
                return Self::Validation(ValidationErrors::single(field, "has already been taken"));
            }
            if message.contains("FOREIGN KEY constraint failed") {
                return Self::Validation(ValidationErrors::single(
                    "body",
                    "references a missing record",
                ));
            }
        }
        Self::DatabaseError(value)
    }
}

/// Column named by SQLite's `UNIQUE constraint failed: <table>.<column>[, ...]`.
fn unique_violation_field(message: &str) -> Option<&str> {
    let columns = message.strip_prefix("UNIQUE constraint failed: ")?;
    let first = columns.split(',').next()?.trim();
    first.rsplit('.').next()
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::NotFound(_) => StatusCode::NOT_FOUND,
            RequestError::NotAuthorized(_) => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden(_) => StatusCode::FORBIDDEN,
            RequestError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RequestError::ServerError(_) | RequestError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_json_response(self) -> JsonResponse<RequestErrorJsonWrapper> {
        let status_code = self.status_code();
        let json = match self {
            RequestError::NotFound(message)
            | RequestError::NotAuthorized(message)
            | RequestError::Forbidden(message) => RequestErrorJsonWrapper::new(message),
            RequestError::Validation(errors) => errors.into(),
            RequestError::ServerError(e) => {
                tracing::error!(error = ?e, "request failed");
                RequestErrorJsonWrapper::new("Internal Server Error")
            }
            RequestError::DatabaseError(e) => {
                tracing::error!(error = %e, "database error");
                RequestErrorJsonWrapper::new("Internal Server Error")
            }
        };
        (status_code, Json(json))
    }
}
