//! Infoblox NIOS WAPI Client
//!
//! A Rust client library for the Infoblox NIOS WAPI REST interface.
//! Provides object CRUD, batched requests and paged reads with bounded
//! result counts.
//!
//! # Example
//!
//! ```no_run
//! use wapi_client::{ClientConfig, ReadOptions, WapiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client
//! let config = ClientConfig::new("gm.example.com", "admin", "infoblox").version("v2.12");
//! let client = WapiClient::new(&config)?;
//!
//! // Read at most 500 host records, failing if there are more
//! let options = ReadOptions::new()
//!     .return_fields(["default", "extattrs"])
//!     .max_results(-500);
//! let hosts = client
//!     .read_paged("record:host", &[("zone", "example.com")], &options)
//!     .await?;
//!
//! // Create an A record
//! let reference = client
//!     .create(
//!         "record:a",
//!         &serde_json::json!({ "name": "web.example.com", "ipv4addr": "10.0.0.5" }),
//!         &[],
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Paged Reads**: Follows `next_page_id` tokens, caps or rejects oversized result sets
//! - **CRUD**: Create, modify and remove objects by type or reference
//! - **Batching**: Multiple operations in one call through the `request` object
//! - **Typed Errors**: Server `Error`/`code`/`text` fields extracted from failed responses
//! - **Test Support**: `test-util` feature exposes a scripted [`MockTransport`]

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod session;
pub mod transport;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::WapiClient;
pub use config::ClientConfig;
pub use error::{ApiError, WapiError};
pub use models::*;
pub use query::QueryParams;
pub use session::{Credentials, Session};
pub use transport::{HttpTransport, Transport};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockTransport;
