//! REST API client module for the event-management backend.
//!
//! This module provides the `ApiClient` for fetching events, users,
//! qualification categories and translation dictionaries that feed the
//! eligibility rules and the renderer.
//!
//! The API uses token authentication obtained from the login endpoint.

pub mod client;
pub mod error;

pub use client::{ApiClient, OrganizerInputs};
pub use error::ApiError;
