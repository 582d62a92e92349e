//! Core library for the telecom applications admin backend: the
//! application catalogue, the NBN order automation pipeline, and the
//! configuration/telemetry plumbing shared with the API service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
