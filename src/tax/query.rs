//! Read-only queries over a loaded [`TaxCatalog`].
//!
//! Unknown countries, unknown tax types, missing defaults and unknown ids are
//! ordinary outcomes here and come back as `None` or an empty slice.

use super::brackets::compute_liability;
use super::catalog::TaxCatalog;
use super::config::{TaxOption, TaxType};
use rust_decimal::Decimal;

impl TaxCatalog {
    /// Options for a country and tax type in document order
    pub fn options(&self, country_code: &str, tax_type: TaxType) -> &[TaxOption] {
        self.config(country_code)
            .map(|config| config.options(tax_type))
            .unwrap_or(&[])
    }

    /// Like [`TaxCatalog::options`] with the tax type given by name
    /// (`income`, `wealth` or `capital_gains`)
    pub fn options_named(&self, country_code: &str, tax_type: &str) -> &[TaxOption] {
        match TaxType::from_str(tax_type) {
            Some(tax_type) => self.options(country_code, tax_type),
            None => &[],
        }
    }

    /// The option marked as default, if any
    pub fn default_option(&self, country_code: &str, tax_type: TaxType) -> Option<&TaxOption> {
        self.options(country_code, tax_type)
            .iter()
            .find(|option| option.is_default)
    }

    /// Find an option by id.
    ///
    /// With a country, searches that country's income, wealth and capital
    /// gains options in that order. Without, searches every country in
    /// catalog order. First match wins.
    pub fn find_option(&self, id: &str, country_code: Option<&str>) -> Option<&TaxOption> {
        match country_code {
            Some(code) => self
                .config(code)?
                .all_options()
                .find(|option| option.id == id),
            None => self
                .iter()
                .flat_map(|config| config.all_options())
                .find(|option| option.id == id),
        }
    }

    /// Supported country codes, sorted
    pub fn supported_countries(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.iter().map(|c| c.country_code.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }

    /// Liability under the country's default option for the tax type
    pub fn default_liability(
        &self,
        country_code: &str,
        tax_type: TaxType,
        amount: Decimal,
    ) -> Option<Decimal> {
        self.default_option(country_code, tax_type)
            .map(|option| compute_liability(amount, option))
    }
}
