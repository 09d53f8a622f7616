//! Error types shared by the page store, the upload receiver and the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use thiserror::Error;

/// Wiki errors
///
/// The Display text of every variant is what a client sees in the body of a
/// failed request.
#[derive(Error, Debug)]
pub enum WikiError {
    /// Reading `<title>.txt` failed. Missing, unreadable and broken files all
    /// land here.
    #[error("open {}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("page title must not be empty")]
    EmptyTitle,

    #[error("ParseForm: {0}")]
    Form(String),

    #[error("{step}: {message}")]
    Multipart { step: String, message: String },

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

impl WikiError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn multipart(step: impl Into<String>, message: impl ToString) -> Self {
        Self::Multipart {
            step: step.into(),
            message: message.to_string(),
        }
    }

    /// True when the error came from loading a page
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::warn!("Request failed: {}", message);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{}\n", message)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WikiError>;
