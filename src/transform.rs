//! Normalises persisted quote rows into compact contract names.
//!
//! A raw row's `contract` holds the rendered label and the exchange symbol on
//! separate lines (`"AUG 2025\nZQQ5"`). The symbol is split into product code,
//! month code and year code, and the result is named `<Month><Year>` (`Aug5`).

use crate::models::{NormalizedContract, Product, RawQuoteRow};
use crate::month_code;
use tracing::{debug, warn};

/// Why a raw row produced no normalized contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractSkip {
    /// The contract text did not split into exactly a label and a symbol.
    Malformed(String),
    /// The symbol belongs to another product.
    OtherProduct(String),
    /// The symbol has no month code after the product prefix.
    MissingMonthCode(String),
}

/// Normalizes a single raw row against a product code.
///
/// # Errors
/// Returns the reason the row was skipped.
pub fn normalize(row: &RawQuoteRow, product_code: &str) -> Result<NormalizedContract, ContractSkip> {
    let parts: Vec<&str> = row.contract.split('\n').collect();
    let [_, symbol] = parts.as_slice() else {
        return Err(ContractSkip::Malformed(row.contract.clone()));
    };

    let symbol = symbol.trim();
    let Some(rest) = symbol.strip_prefix(product_code) else {
        return Err(ContractSkip::OtherProduct(symbol.to_string()));
    };

    let mut chars = rest.chars();
    let Some(code) = chars.next() else {
        return Err(ContractSkip::MissingMonthCode(symbol.to_string()));
    };
    let year_code = chars.as_str();

    Ok(NormalizedContract {
        contract: format!("{}{}", month_code::translate(code), year_code),
        price: row.settle,
    })
}

/// Normalizes every row belonging to `product_code`, preserving input order.
///
/// Malformed rows are logged and skipped; rows for other instruments are dropped.
#[must_use]
pub fn transform(rows: &[RawQuoteRow], product_code: &str) -> Vec<NormalizedContract> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        match normalize(row, product_code) {
            Ok(contract) => out.push(contract),
            Err(ContractSkip::Malformed(raw)) => {
                warn!("Skipping malformed contract: {:?}", raw);
            }
            Err(ContractSkip::MissingMonthCode(symbol)) => {
                warn!("Skipping {} symbol without month code: {}", product_code, symbol);
            }
            Err(ContractSkip::OtherProduct(_)) => {}
        }
    }
    debug!("{}: {} contracts transformed", product_code, out.len());
    out
}

/// Transforms rows for a known product.
#[must_use]
pub fn transform_product(rows: &[RawQuoteRow], product: Product) -> Vec<NormalizedContract> {
    transform(rows, product.code())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(contract: &str, settle: f64) -> RawQuoteRow {
        RawQuoteRow {
            contract: contract.to_string(),
            settle,
        }
    }

    #[test]
    fn test_transform_zq_row() {
        let rows = vec![row("AUG 2025\nZQQ5", 95.5)];
        let out = transform(&rows, "ZQ");
        assert_eq!(
            out,
            vec![NormalizedContract {
                contract: "Aug5".to_string(),
                price: 95.5,
            }]
        );
    }

    #[test]
    fn test_transform_sr3_row_with_padding() {
        let rows = vec![row("DEC 2025\n  SR3Z5  ", 96.125)];
        let out = transform_product(&rows, Product::Sr3);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].contract, "Dec5");
        assert_eq!(out[0].price, 96.125);
    }

    #[test]
    fn test_transform_excludes_other_products() {
        let rows = vec![row("DEC 2025\nSR3Z5", 96.0), row("AUG 2025\nZQQ5", 95.5)];
        let out = transform(&rows, "ZQ");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].contract, "Aug5");
    }

    #[test]
    fn test_transform_prefix_is_case_sensitive() {
        let rows = vec![row("AUG 2025\nzqQ5", 95.5)];
        assert!(transform(&rows, "ZQ").is_empty());
    }

    #[test]
    fn test_transform_excludes_malformed() {
        let rows = vec![
            row("AUG 2025", 95.5),
            row("AUG 2025\nZQQ5\nextra", 95.5),
            row("", 95.5),
        ];
        assert!(transform(&rows, "ZQ").is_empty());
        assert_eq!(
            normalize(&rows[0], "ZQ"),
            Err(ContractSkip::Malformed("AUG 2025".to_string()))
        );
    }

    #[test]
    fn test_transform_two_digit_year() {
        let rows = vec![row("MAR 2026\nSR3H26", 96.3)];
        let out = transform(&rows, "SR3");
        assert_eq!(out[0].contract, "Mar26");
    }

    #[test]
    fn test_transform_unknown_month_code_passes_through() {
        let rows = vec![row("??? 2025\nZQW5", 95.0)];
        let out = transform(&rows, "ZQ");
        assert_eq!(out[0].contract, "W5");
    }

    #[test]
    fn test_transform_missing_month_code() {
        let r = row("AUG 2025\nZQ", 95.0);
        assert_eq!(
            normalize(&r, "ZQ"),
            Err(ContractSkip::MissingMonthCode("ZQ".to_string()))
        );
        assert!(transform(&[r], "ZQ").is_empty());
    }

    #[test]
    fn test_transform_preserves_order_and_duplicates() {
        let rows = vec![
            row("SEP 2025\nZQU5", 95.7),
            row("AUG 2025\nZQQ5", 95.5),
            row("AUG 2025\nZQQ5", 95.5),
        ];
        let names: Vec<String> = transform(&rows, "ZQ")
            .into_iter()
            .map(|c| c.contract)
            .collect();
        assert_eq!(names, vec!["Sep5", "Aug5", "Aug5"]);
    }
}
