//! REST API access: the client and one request type per endpoint

pub mod client;
pub mod v0;

pub use client::{ApiClient, ApiError, ApiRequest, ClientOptions};
