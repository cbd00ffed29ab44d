//! HTTP-facing error type and startup failures.
//!
//! # Invariants
//! - Not-found and bad-request errors render their own pages.
//! - Every other failure is logged server-side and rendered as a generic
//!   500 page without internal details.

use crate::views;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use residence_core::db::DbError;
use residence_core::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type WebResult<T> = Result<T, WebError>;

#[derive(Debug)]
pub enum WebError {
    /// Requested document does not exist or the id is malformed.
    NotFound(String),
    /// Form input could not be coerced to the document field type.
    BadRequest(String),
    Repo(RepoError),
    /// A previous store operation panicked while holding the connection.
    StorePoisoned,
    Join(tokio::task::JoinError),
}

impl Display for WebError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::StorePoisoned => write!(f, "store connection poisoned"),
            Self::Join(err) => write!(f, "store task failed: {err}"),
        }
    }
}

impl Error for WebError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Join(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for WebError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(format!("document {id}")),
            other => Self::Repo(other),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotFound(what) => {
                warn!("event=http_error module=web status=error error_code=not_found target={what}");
                (StatusCode::NOT_FOUND, views::not_found_page()).into_response()
            }
            Self::BadRequest(message) => {
                warn!("event=http_error module=web status=error error_code=bad_request error={message}");
                (StatusCode::BAD_REQUEST, views::bad_request_page(message)).into_response()
            }
            _ => {
                error!("event=http_error module=web status=error error_code=internal error={self}");
                (StatusCode::INTERNAL_SERVER_ERROR, views::error_page()).into_response()
            }
        }
    }
}

/// Failures that stop the server before or while serving.
#[derive(Debug)]
pub enum StartupError {
    Store(DbError),
    Io(std::io::Error),
}

impl Display for StartupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "failed to open store: {err}"),
            Self::Io(err) => write!(f, "server io error: {err}"),
        }
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<DbError> for StartupError {
    fn from(value: DbError) -> Self {
        Self::Store(value)
    }
}

impl From<std::io::Error> for StartupError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
