//! HTTP client library for the STIR Settlements API.
//!
//! This crate provides a typed HTTP client for the settlement price server:
//! the liveness and health endpoints and the per-product price endpoints.
//!
//! # Example
//!
//! ```no_run
//! use settlements_client::{ClientConfig, Product, SettlementsClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), settlements_client::Error> {
//!     let client = SettlementsClient::new(ClientConfig {
//!         base_url: "http://localhost:4000".into(),
//!         timeout: Duration::from_secs(30),
//!     })?;
//!
//!     for contract in client.contracts(Product::Zq).await? {
//!         println!("{}: {}", contract.contract, contract.price);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{ClientConfig, SettlementsClient};
pub use error::Error;
pub use types::*;
