//! Request-handling layer over `eventdesk_core`.
//!
//! # Responsibility
//! - Validate and normalize caller requests before they reach core services.
//! - Apply the default time zone when a caller omits one.
//! - Map core failure kinds onto transport-neutral statuses with safe messages.
//!
//! # Invariants
//! - Public functions never panic.
//! - Unclassified failures never leak internal detail to callers.

pub mod error;
pub mod events;
pub mod request;

pub use error::{ApiError, ApiResult, ApiStatus, ErrorBody};
pub use events::EventsApi;
pub use request::{CreateEventRequest, FieldError, RegisterAttendeeRequest, RequestTime};
