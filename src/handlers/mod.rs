use axum::http::Uri;

use crate::{errors::RequestError, JsonResponse};

mod articles;
mod comments;
mod profiles;
mod tags;
mod users;

pub use articles::*;
pub use comments::*;
pub use profiles::*;
pub use tags::*;
pub use users::*;

type JsonResult<T> = Result<JsonResponse<T>, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> RequestError {
    tracing::debug!(%uri, "no route matched");
    RequestError::NotFound("Not Found")
}
