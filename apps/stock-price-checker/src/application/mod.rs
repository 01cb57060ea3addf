//! Application Layer - Use cases and port definitions.
//!
//! This layer contains the application services and port interfaces
//! that define how the domain interacts with external systems.

/// Port interfaces for external systems (quote source, storage).
pub mod ports;

/// Application services (like ledger).
pub mod services;

/// Use cases driven by the HTTP adapter.
pub mod use_cases;
