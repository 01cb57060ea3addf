//! Domain Layer - Core business logic.
//!
//! Pure types with no knowledge of HTTP, storage or the quote source.

/// Symbols, client identities and the per-symbol like record.
pub mod stock;

/// Quote values and quote failures.
pub mod quote;
