//! The backend's request envelope and service facade.
//!
//! Every client-facing operation follows one envelope shape:
//! `{method, params}` in, `{result}` or `{error}` out, over whatever
//! transport the embedding shell provides. The shell itself (HTTP framework,
//! multipart parsing, content negotiation) is an external collaborator;
//! this module owns the method names, the typed payloads, and the
//! [`service::ConversationService`] the shell delegates to.

pub mod envelope;
pub mod service;

pub use envelope::{ApiError, ApiRequest, ApiResponse, FilePayload, FileUpload, MessageInfo};
pub use service::{ConversationService, ServiceError, ServiceResult};
