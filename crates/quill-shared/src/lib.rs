//! # Quill Shared
//!
//! Wire types shared by the server and its clients: request/response DTOs
//! with their input rules, and the RFC 7807 error body.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
