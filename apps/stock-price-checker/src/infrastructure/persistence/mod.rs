//! Persistence Adapters
//!
//! Implementations of `StockRepository`.

pub mod in_memory;
pub mod turso_repository;

pub use in_memory::InMemoryStockRepository;
pub use turso_repository::TursoStockRepository;
