//! Repository abstraction layer
//!
//! The import core only sees [`FhirRepository`]. [`create_repository`] picks
//! the implementation: a live FHIR server, or an in-memory store for dry runs.

pub mod factory;
pub mod traits;

pub use factory::create_repository;
pub use traits::FhirRepository;
