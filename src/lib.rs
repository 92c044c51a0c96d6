//! # STIR Settlements - Futures Settlement Price Scraper and API
//!
//! Periodically scrapes the published settlement prices of two short-term
//! interest rate futures families from the exchange quotes pages, persists
//! them as JSON snapshots and serves them over a small REST API built with
//! [Axum](https://crates.io/crates/axum).
//!
//! | Product | Contract | Snapshot |
//! |---------|----------|----------|
//! | `ZQ` | 30-day Fed Funds futures | `zq_prices.json` |
//! | `SR3` | 3-month SOFR futures | `sr3_prices.json` |
//!
//! ## Pipeline
//!
//! ```text
//! Scheduler ──▶ BrowserScraper ──▶ SnapshotStore (raw rows)
//!                                        │
//!                      GET /api/zq ◀── transform ◀── load
//! ```
//!
//! The quotes tables are rendered client-side, so rows are read through a
//! Chrome session driven by [chromiumoxide](https://crates.io/crates/chromiumoxide).
//! Each row's contract cell carries a label and the exchange symbol
//! (`"AUG 2025\nZQQ5"`); the API turns that into a compact name (`Aug5`).
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Route handlers and router configuration |
//! | [`config`] | TOML configuration |
//! | [`error`] | API error types with `IntoResponse` implementation |
//! | [`models`] | Products, quote rows and response DTOs |
//! | [`month_code`] | Futures month-code table |
//! | [`scheduler`] | Periodic scrape-and-save loop |
//! | [`scraper`] | Browser scraper and table row parsing |
//! | [`state`] | Application state management |
//! | [`store`] | Per-product JSON snapshots |
//! | [`transform`] | Contract name normalization |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/` | Liveness message |
//! | GET | `/health` | Health check with last scrape time |
//! | GET | `/api/zq` | ZQ settlement prices |
//! | GET | `/api/sr3` | SR3 settlement prices |
//!
//! Data endpoints return `[{"contract": "Aug5", "price": 95.5}, ...]`, or
//! `500 {"error": "ZQ data unavailable"}` when the snapshot is missing or invalid.
//!
//! ## Example Usage
//!
//! ```bash
//! # Scheduler and API server in one process
//! cargo run -- run
//!
//! # API server only, custom port
//! PORT=5000 cargo run -- serve
//!
//! # One scrape cycle, then exit
//! cargo run -- --config config.toml once
//!
//! curl http://localhost:4000/api/zq
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod month_code;
pub mod scheduler;
pub mod scraper;
pub mod state;
pub mod store;
pub mod transform;

#[cfg(test)]
mod test_support;
