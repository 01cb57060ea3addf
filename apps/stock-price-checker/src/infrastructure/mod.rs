//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer.

/// Quote proxy REST client adapter.
pub mod quote_proxy;

/// Stock record repositories (Turso, in-memory).
pub mod persistence;

/// HTTP API, landing page and static assets.
pub mod http;

/// Configuration loaded from the environment.
pub mod config;

/// Health check and metrics routes.
pub mod health;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// OpenTelemetry tracing integration.
pub mod telemetry;
