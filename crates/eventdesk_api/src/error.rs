//! Failure-kind to status mapping.

use crate::request::FieldError;
use eventdesk_core::{ErrorKind, ServiceError};
use log::error;
use serde::Serialize;
use std::fmt::{Display, Formatter};

pub type ApiResult<T> = Result<T, ApiError>;

/// Transport-neutral outcome class. Mirrors the HTTP status a web front end
/// would send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    BadRequest,
    NotFound,
    Conflict,
    Internal,
}

impl ApiStatus {
    pub fn as_u16(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }
}

/// Error returned to callers: status, stable code, and a message safe to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: ApiStatus,
    pub code: &'static str,
    pub message: String,
    /// Per-field problems for request validation failures.
    pub fields: Vec<FieldError>,
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'static str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "no_fields")]
    pub fields: &'a [FieldError],
}

fn no_fields(fields: &&[FieldError]) -> bool {
    fields.is_empty()
}

impl ApiError {
    pub fn invalid_request(fields: Vec<FieldError>) -> Self {
        let message = fields
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            status: ApiStatus::BadRequest,
            code: "validation_error",
            message,
            fields,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::NotFound,
            code: "not_found",
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn body(&self) -> ErrorBody<'_> {
        ErrorBody {
            error: self.code,
            message: &self.message,
            fields: &self.fields,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.status.as_u16(), self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match err.kind() {
            ErrorKind::NotFound => ApiStatus::NotFound,
            ErrorKind::InvalidArgument => ApiStatus::BadRequest,
            ErrorKind::EventFull | ErrorKind::DuplicateAttendee => ApiStatus::Conflict,
            ErrorKind::Unclassified => {
                error!("event=request_failed module=api status=error error_code=unclassified error={err}");
                ApiStatus::Internal
            }
        };
        Self {
            status,
            code: err.code(),
            message: err.safe_message(),
            fields: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdesk_core::{RepoError, UNCLASSIFIED_MESSAGE};

    fn status_of(err: ServiceError) -> ApiStatus {
        ApiError::from(err).status
    }

    #[test]
    fn failure_kinds_map_to_statuses() {
        assert_eq!(status_of(ServiceError::NotFound(1)), ApiStatus::NotFound);
        assert_eq!(
            status_of(ServiceError::InvalidArgument("Invalid timezone: x".into())),
            ApiStatus::BadRequest
        );
        assert_eq!(status_of(ServiceError::EventFull(1)), ApiStatus::Conflict);
        assert_eq!(
            status_of(ServiceError::DuplicateAttendee(1)),
            ApiStatus::Conflict
        );
        assert_eq!(
            status_of(ServiceError::Unclassified(RepoError::InvalidData("x".into()))),
            ApiStatus::Internal
        );
    }

    #[test]
    fn internal_errors_use_safe_message() {
        let err = ApiError::from(ServiceError::Unclassified(RepoError::InvalidData(
            "secret path /var/db".into(),
        )));
        assert_eq!(err.message, UNCLASSIFIED_MESSAGE);
        assert_eq!(err.status.as_u16(), 500);
    }

    #[test]
    fn body_omits_empty_field_list() {
        let err = ApiError::not_found("Event with ID 3 not found");
        let json = serde_json::to_value(err.body()).unwrap();
        assert_eq!(json["error"], "not_found");
        assert!(json.get("fields").is_none());
    }
}
