//! FHIR server integration
//!
//! A reqwest-based client for FHIR R4 servers. Authentication is either none,
//! HTTP basic or a bearer token; transient failures (connection errors,
//! timeouts, 5xx and 429 responses) are retried with exponential backoff.

pub mod client;
pub mod models;

pub use client::FhirServerClient;
