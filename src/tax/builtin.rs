//! Tax documents bundled with the binary.

use super::catalog::TaxCatalog;
use super::config::CountryTaxDocument;
use anyhow::Context;

const DOCUMENTS: &[(&str, &str)] = &[
    ("BE", include_str!("../../data/BE.json")),
    ("CH", include_str!("../../data/CH.json")),
    ("DE", include_str!("../../data/DE.json")),
    ("GB", include_str!("../../data/GB.json")),
    ("NL", include_str!("../../data/NL.json")),
    ("US", include_str!("../../data/US.json")),
];

/// Parse the bundled documents, keyed by country code
pub fn documents() -> anyhow::Result<Vec<(String, CountryTaxDocument)>> {
    DOCUMENTS
        .iter()
        .map(|(code, json)| -> anyhow::Result<(String, CountryTaxDocument)> {
            let document: CountryTaxDocument = serde_json::from_str(json)
                .with_context(|| format!("bundled tax document {} is malformed", code))?;
            Ok((code.to_string(), document))
        })
        .collect()
}

/// Catalog built from the bundled documents
pub fn catalog() -> anyhow::Result<TaxCatalog> {
    Ok(TaxCatalog::load(documents()?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::{compute_liability, TaxType};
    use rust_decimal_macros::dec;

    #[test]
    fn bundled_documents_validate() {
        let catalog = catalog().unwrap();
        assert_eq!(
            catalog.supported_countries(),
            vec!["BE", "CH", "DE", "GB", "NL", "US"]
        );
    }

    #[test]
    fn every_country_has_income_and_capital_gains() {
        let catalog = catalog().unwrap();
        for config in catalog.iter() {
            assert!(!config.income_taxes.is_empty(), "{}", config.country_code);
            assert!(!config.capital_gains_taxes.is_empty(), "{}", config.country_code);
        }
    }

    #[test]
    fn netherlands_box1() {
        let catalog = catalog().unwrap();
        let box1 = catalog.default_option("NL", TaxType::Income).unwrap();
        assert_eq!(box1.id, "nl-box1");
        // 75518 * 36.97% + 24482 * 49.5%
        assert_eq!(compute_liability(dec!(100000), box1), dec!(40037.5946));
    }

    #[test]
    fn countries_without_wealth_tax() {
        let catalog = catalog().unwrap();
        assert!(catalog.options("DE", TaxType::Wealth).is_empty());
        assert!(catalog.default_option("DE", TaxType::Wealth).is_none());
        assert!(catalog.default_option("CH", TaxType::Wealth).is_some());
    }

    #[test]
    fn uk_capital_gains_allowance() {
        let catalog = catalog().unwrap();
        let cgt = catalog.find_option("gb-cgt-basic", Some("GB")).unwrap();
        assert_eq!(compute_liability(dec!(3000), cgt), dec!(0));
        assert_eq!(compute_liability(dec!(13000), cgt), dec!(1800));
    }
}
