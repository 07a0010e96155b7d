//! # Mealie Bridge
//!
//! A client library and polling bridge for Mealie (a self-hosted recipe
//! manager). It exposes sensor-style data — recipe counts, today's recipe,
//! and the weekly meal plan — for smart-home style consumers.
//!
//! ## Client Module
//!
//! The [`client`] module is the API layer: HTTP transport with a uniform
//! response envelope, bearer-token storage, typed response records, and a
//! facade with one method per Mealie endpoint.
//!
//! ## Updater Module
//!
//! The [`updater`] module refreshes a sensor snapshot from the API: one
//! sequential pass per cycle, with authentication failures reported
//! separately from ordinary update failures.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use mealie_bridge::client::{Api, HttpClient, MemoryTokenStore};
//! use mealie_bridge::updater::Updater;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let api = Arc::new(Api::new(
//!     HttpClient::new(),
//!     "http://localhost:9000".to_string(),
//!     Arc::new(MemoryTokenStore::new()),
//! ));
//! api.authenticate("chef", "secret").await?;
//!
//! let updater = Updater::new(api);
//! let snapshot = updater.refresh().await?;
//! println!("tracking {} sensors", snapshot.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod updater;

pub use client::Api;
pub use updater::Updater;
