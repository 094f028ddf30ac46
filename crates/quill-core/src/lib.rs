//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! This crate contains the entities, the ports infrastructure must implement,
//! and the services that own every authentication and authorization rule.
//! It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
