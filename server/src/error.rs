use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use paindraw_shared::DataUrlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("malformed export request: {0}")]
    BadRequest(String),
    #[error("image payload rejected: {0}")]
    DataUrl(#[from] DataUrlError),
    #[error("image could not be decoded: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("pdf assembly failed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("pdf could not be written: {0}")]
    Io(#[from] std::io::Error),
    #[error("pdf worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl SubmitError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmitError::BadRequest(_) | SubmitError::DataUrl(_) => StatusCode::BAD_REQUEST,
            SubmitError::ImageDecode(_)
            | SubmitError::Pdf(_)
            | SubmitError::Io(_)
            | SubmitError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "submit failed");
        } else {
            tracing::warn!(error = %self, "submit rejected");
        }
        (status, self.to_string()).into_response()
    }
}
