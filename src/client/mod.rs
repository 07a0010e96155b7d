//! # Mealie HTTP Client
//!
//! A thin async client for the Mealie REST API: a transport that wraps every
//! round trip in a success/failure envelope, a pluggable bearer-token store,
//! hand-validated domain records, and a facade with one method per endpoint.
//!
//! ## Modules
//!
//! - [`http`] - HTTP transport and the response envelope
//! - [`token`] - bearer token storage (in-memory and file-backed)
//! - [`types`] - domain records and their `from_json` parsers
//! - [`api`] - the facade composing transport, token store and parsers
//! - [`error`] - the error taxonomy
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use mealie_bridge::client::{Api, HttpClient, MemoryTokenStore};
//!
//! # async fn example() -> Result<(), mealie_bridge::client::ApiError> {
//! let api = Api::new(
//!     HttpClient::new(),
//!     "http://localhost:9000".to_string(),
//!     Arc::new(MemoryTokenStore::new()),
//! );
//! let (token, user) = api.authenticate("chef", "secret").await?;
//! println!("signed in as {}", user.full_name);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod http;
pub mod token;
pub mod types;

pub use api::Api;
pub use error::{ApiError, HttpError, ParseError, UpdateError};
pub use http::{HttpClient, Response, Status};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::*;
