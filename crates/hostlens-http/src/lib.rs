//! Centralized HTTP client for HostLens
//!
//! Provides a mockable, configurable JSON-over-HTTP client wrapper used by the
//! monitoring API layer.
//!
//! ## Features
//!
//! - **Trait-based design**: Mockable via `HttpClientTrait`
//! - **Configurable**: Optional timeouts, proxy, user-agent, redirects
//! - **Single round trip**: No retries and no caching; every call is one request
//! - **Testing support**: Easy mocking with mockito

pub mod client;
pub mod config;
pub mod error;

pub use client::{shared_client, HttpClient, HttpClientTrait, QueryParams};
pub use config::HttpConfig;
pub use error::{HttpError, Result};

/// Re-export commonly used types
pub use reqwest::{header, Method, Response, StatusCode};
