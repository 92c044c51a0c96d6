//! Integration tests for the STIR Settlements API.
//!
//! These tests require the API server to be running. Configure the server URL
//! via the `API_BASE_URL` environment variable (default: `http://localhost:4000`).

use settlements_client::{ClientConfig, NormalizedContract, SettlementsClient};
use std::time::Duration;

/// Gets the API base URL from environment or uses default.
#[must_use]
pub fn get_api_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// Creates a test client configured for the API.
///
/// # Errors
/// Returns error if client creation fails.
pub fn create_test_client() -> Result<SettlementsClient, settlements_client::Error> {
    SettlementsClient::new(ClientConfig {
        base_url: get_api_url(),
        timeout: Duration::from_secs(10),
    })
}

fn is_year(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_digit())
}

/// Returns true if `name` looks like a normalized contract name: a month
/// abbreviation followed by year digits (`Aug5`, `Mar26`), or an untranslated
/// month letter followed by year digits (`W5`).
#[must_use]
pub fn is_contract_name(name: &str) -> bool {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    if MONTHS
        .iter()
        .any(|month| name.strip_prefix(month).is_some_and(is_year))
    {
        return true;
    }

    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|code| !code.is_ascii_digit() && is_year(chars.as_str()))
}

/// Checks the invariants every served contract must satisfy.
pub fn assert_valid_contracts(contracts: &[NormalizedContract]) {
    for contract in contracts {
        assert!(
            is_contract_name(&contract.contract),
            "unexpected contract name {:?}",
            contract.contract
        );
        assert!(
            contract.price.is_finite() && contract.price >= 0.0,
            "invalid price {} for {}",
            contract.price,
            contract.contract
        );
    }
}
