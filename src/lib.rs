//! Client library for the GitHub deployments REST API.

pub mod deployments;
pub mod error;
pub mod github;
