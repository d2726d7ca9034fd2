use super::config::{
    CountryTaxConfig, CountryTaxDocument, RateSchedule, RawTaxOption, TaxBracket, TaxOption,
    TaxType,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Where in the input a validation problem was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationLocation {
    pub country: String,
    pub tax_type: Option<TaxType>,
    pub option_id: Option<String>,
}

impl std::fmt::Display for ValidationLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.country)?;
        if let Some(tax_type) = self.tax_type {
            write!(f, "/{}", tax_type)?;
        }
        if let Some(id) = &self.option_id {
            write!(f, "/{}", id)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("document is keyed as '{key}' but declares country code '{declared}'")]
    CountryCodeMismatch { key: String, declared: String },
    #[error("country code must be two uppercase ASCII letters")]
    InvalidCountryCode,
    #[error("duplicate country code")]
    DuplicateCountry,
    #[error("country name is empty")]
    MissingCountryName,
    #[error("no tax options configured")]
    EmptyTaxGroup,
    #[error("option id is empty")]
    MissingOptionId,
    #[error("option declares type '{declared}' but is listed under a different tax type")]
    TypeMismatch { declared: TaxType },
    #[error("both rate and brackets are set")]
    RateAndBrackets,
    #[error("neither rate nor brackets is set")]
    MissingRate,
    #[error("bracket list is empty")]
    EmptyBrackets,
    #[error("bracket threshold {threshold} is negative")]
    NegativeThreshold { threshold: Decimal },
    #[error("bracket thresholds must be strictly increasing ({previous} followed by {threshold})")]
    UnorderedBrackets {
        previous: Decimal,
        threshold: Decimal,
    },
    #[error("rate {rate} is outside [{min}, {max}]")]
    RateOutOfRange {
        rate: Decimal,
        min: Decimal,
        max: Decimal,
    },
    #[error("exemption threshold {0} is negative")]
    NegativeExemption(Decimal),
    #[error("more than one default option ('{first}' and '{second}')")]
    MultipleDefaults { first: String, second: String },
    #[error("option id already used by country {first_country}")]
    DuplicateOptionId { first_country: String },
}

/// Rejection of a tax document while building a [`TaxCatalog`]
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("invalid tax configuration at {location}: {issue}")]
pub struct ConfigValidationError {
    pub location: ValidationLocation,
    pub issue: ValidationIssue,
}

impl ConfigValidationError {
    fn country(country: &str, issue: ValidationIssue) -> Self {
        ConfigValidationError {
            location: ValidationLocation {
                country: country.to_string(),
                tax_type: None,
                option_id: None,
            },
            issue,
        }
    }

    fn group(country: &str, tax_type: TaxType, issue: ValidationIssue) -> Self {
        ConfigValidationError {
            location: ValidationLocation {
                country: country.to_string(),
                tax_type: Some(tax_type),
                option_id: None,
            },
            issue,
        }
    }

    fn option(country: &str, tax_type: TaxType, id: &str, issue: ValidationIssue) -> Self {
        ConfigValidationError {
            location: ValidationLocation {
                country: country.to_string(),
                tax_type: Some(tax_type),
                option_id: Some(id.to_string()),
            },
            issue,
        }
    }
}

const MAX_RATE: Decimal = dec!(100);
const MIN_BRACKET_RATE: Decimal = dec!(-100);

/// Immutable store of validated country tax configurations.
///
/// Built once from trusted documents; lookups are read-only. Countries keep
/// the order in which they were supplied to [`TaxCatalog::load`].
#[derive(Debug, Clone, Default)]
pub struct TaxCatalog {
    countries: Vec<CountryTaxConfig>,
    index: HashMap<String, usize>,
}

impl TaxCatalog {
    /// Validate and index the given documents, keyed by country code.
    ///
    /// Fails on the first problem found; no partially valid catalog is ever
    /// returned.
    pub fn load<I>(documents: I) -> Result<TaxCatalog, ConfigValidationError>
    where
        I: IntoIterator<Item = (String, CountryTaxDocument)>,
    {
        let mut countries = Vec::new();
        let mut index = HashMap::new();
        // option id -> country it was first seen in
        let mut option_owners: HashMap<String, String> = HashMap::new();

        for (key, document) in documents {
            let config = validate_document(&key, &document)?;
            if index.contains_key(&config.country_code) {
                return Err(ConfigValidationError::country(
                    &config.country_code,
                    ValidationIssue::DuplicateCountry,
                ));
            }

            for tax_type in TaxType::ALL {
                for option in config.options(tax_type) {
                    if let Some(first_country) = option_owners.get(&option.id) {
                        return Err(ConfigValidationError::option(
                            &config.country_code,
                            tax_type,
                            &option.id,
                            ValidationIssue::DuplicateOptionId {
                                first_country: first_country.clone(),
                            },
                        ));
                    }
                    option_owners.insert(option.id.clone(), config.country_code.clone());
                }
            }

            log::debug!(
                "Loaded {} ({}) with {} tax options",
                config.country_code,
                config.country_name,
                config.option_count()
            );
            index.insert(config.country_code.clone(), countries.len());
            countries.push(config);
        }

        log::info!(
            "Tax catalog ready: {} countries, {} options",
            countries.len(),
            option_owners.len()
        );
        Ok(TaxCatalog { countries, index })
    }

    /// Country configuration by ISO code
    pub fn config(&self, country_code: &str) -> Option<&CountryTaxConfig> {
        self.index.get(country_code).map(|&i| &self.countries[i])
    }

    /// Countries in load order
    pub fn iter(&self) -> impl Iterator<Item = &CountryTaxConfig> {
        self.countries.iter()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// Validate a single country document against the key it was supplied under.
///
/// Checks everything that can be decided within one document; cross-country
/// rules (duplicate codes and option ids) are enforced by [`TaxCatalog::load`].
pub fn validate_document(
    key: &str,
    document: &CountryTaxDocument,
) -> Result<CountryTaxConfig, ConfigValidationError> {
    let code = document.country_code.as_str();
    if key != code {
        return Err(ConfigValidationError::country(
            key,
            ValidationIssue::CountryCodeMismatch {
                key: key.to_string(),
                declared: code.to_string(),
            },
        ));
    }
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ConfigValidationError::country(
            code,
            ValidationIssue::InvalidCountryCode,
        ));
    }
    if document.country_name.trim().is_empty() {
        return Err(ConfigValidationError::country(
            code,
            ValidationIssue::MissingCountryName,
        ));
    }

    let income_taxes = validate_group(code, TaxType::Income, document.options(TaxType::Income))?;
    let wealth_taxes = validate_group(code, TaxType::Wealth, document.options(TaxType::Wealth))?;
    let capital_gains_taxes = validate_group(
        code,
        TaxType::CapitalGains,
        document.options(TaxType::CapitalGains),
    )?;

    Ok(CountryTaxConfig {
        country_code: code.to_string(),
        country_name: document.country_name.clone(),
        income_taxes,
        wealth_taxes,
        capital_gains_taxes,
        sources: document.sources.clone(),
    })
}

fn validate_group(
    country: &str,
    tax_type: TaxType,
    raw: &[RawTaxOption],
) -> Result<Vec<TaxOption>, ConfigValidationError> {
    // A country without wealth tax is data, not an error
    if raw.is_empty() && tax_type != TaxType::Wealth {
        return Err(ConfigValidationError::group(
            country,
            tax_type,
            ValidationIssue::EmptyTaxGroup,
        ));
    }

    let mut default_id: Option<&str> = None;
    let mut options = Vec::with_capacity(raw.len());
    for option in raw {
        let validated = validate_option(country, tax_type, option)?;
        if validated.is_default {
            if let Some(first) = default_id {
                return Err(ConfigValidationError::group(
                    country,
                    tax_type,
                    ValidationIssue::MultipleDefaults {
                        first: first.to_string(),
                        second: option.id.clone(),
                    },
                ));
            }
            default_id = Some(option.id.as_str());
        }
        options.push(validated);
    }
    Ok(options)
}

fn validate_option(
    country: &str,
    tax_type: TaxType,
    raw: &RawTaxOption,
) -> Result<TaxOption, ConfigValidationError> {
    let fail = |issue| ConfigValidationError::option(country, tax_type, &raw.id, issue);

    if raw.id.trim().is_empty() {
        return Err(fail(ValidationIssue::MissingOptionId));
    }
    if raw.tax_type != tax_type {
        return Err(fail(ValidationIssue::TypeMismatch {
            declared: raw.tax_type,
        }));
    }

    let exemption_threshold = raw.exemption_threshold.unwrap_or(Decimal::ZERO);
    if exemption_threshold < Decimal::ZERO {
        return Err(fail(ValidationIssue::NegativeExemption(exemption_threshold)));
    }

    let schedule = match (raw.rate, &raw.brackets) {
        (Some(_), Some(_)) => return Err(fail(ValidationIssue::RateAndBrackets)),
        (None, None) => return Err(fail(ValidationIssue::MissingRate)),
        (Some(rate), None) => {
            check_rate(rate, Decimal::ZERO).map_err(fail)?;
            RateSchedule::Flat(rate)
        }
        (None, Some(brackets)) => {
            check_brackets(brackets).map_err(fail)?;
            RateSchedule::Progressive(brackets.clone())
        }
    };

    Ok(TaxOption {
        id: raw.id.clone(),
        name: raw.name.clone(),
        tax_type,
        is_default: raw.is_default,
        schedule,
        exemption_threshold,
        notes: raw.notes.clone(),
    })
}

fn check_rate(rate: Decimal, min: Decimal) -> Result<(), ValidationIssue> {
    if rate < min || rate > MAX_RATE {
        return Err(ValidationIssue::RateOutOfRange {
            rate,
            min,
            max: MAX_RATE,
        });
    }
    Ok(())
}

fn check_brackets(brackets: &[TaxBracket]) -> Result<(), ValidationIssue> {
    if brackets.is_empty() {
        return Err(ValidationIssue::EmptyBrackets);
    }

    let mut previous: Option<Decimal> = None;
    for bracket in brackets {
        if bracket.threshold < Decimal::ZERO {
            return Err(ValidationIssue::NegativeThreshold {
                threshold: bracket.threshold,
            });
        }
        if let Some(previous) = previous {
            if bracket.threshold <= previous {
                return Err(ValidationIssue::UnorderedBrackets {
                    previous,
                    threshold: bracket.threshold,
                });
            }
        }
        check_rate(bracket.rate, MIN_BRACKET_RATE)?;
        previous = Some(bracket.threshold);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    pub(crate) fn flat(id: &str, tax_type: TaxType, rate: Decimal) -> RawTaxOption {
        RawTaxOption {
            id: id.to_string(),
            name: id.to_string(),
            tax_type,
            is_default: false,
            rate: Some(rate),
            brackets: None,
            exemption_threshold: None,
            notes: None,
        }
    }

    pub(crate) fn progressive(
        id: &str,
        tax_type: TaxType,
        brackets: &[(Decimal, Decimal)],
    ) -> RawTaxOption {
        RawTaxOption {
            id: id.to_string(),
            name: id.to_string(),
            tax_type,
            is_default: false,
            rate: None,
            brackets: Some(
                brackets
                    .iter()
                    .map(|&(threshold, rate)| TaxBracket { threshold, rate })
                    .collect(),
            ),
            exemption_threshold: None,
            notes: None,
        }
    }

    pub(crate) fn default_of(mut option: RawTaxOption) -> RawTaxOption {
        option.is_default = true;
        option
    }

    /// Minimal valid document: one default progressive income option and one
    /// flat capital gains option, no wealth tax
    pub(crate) fn document(code: &str) -> CountryTaxDocument {
        let lower = code.to_lowercase();
        CountryTaxDocument {
            country_code: code.to_string(),
            country_name: format!("Country {}", code),
            income_taxes: vec![default_of(progressive(
                &format!("{lower}-income"),
                TaxType::Income,
                &[(dec!(0), dec!(10)), (dec!(1000), dec!(20))],
            ))],
            wealth_taxes: vec![],
            capital_gains_taxes: vec![flat(
                &format!("{lower}-cg"),
                TaxType::CapitalGains,
                dec!(15),
            )],
            sources: None,
        }
    }

    pub(crate) fn keyed(docs: Vec<CountryTaxDocument>) -> Vec<(String, CountryTaxDocument)> {
        docs.into_iter()
            .map(|d| (d.country_code.clone(), d))
            .collect()
    }

    fn load_err(docs: Vec<CountryTaxDocument>) -> ConfigValidationError {
        TaxCatalog::load(keyed(docs)).unwrap_err()
    }

    #[test]
    fn loads_valid_documents_in_order() {
        let catalog = TaxCatalog::load(keyed(vec![document("NL"), document("BE")])).unwrap();
        assert_eq!(catalog.len(), 2);
        let codes: Vec<_> = catalog.iter().map(|c| c.country_code.as_str()).collect();
        assert_eq!(codes, vec!["NL", "BE"]);

        let nl = catalog.config("NL").unwrap();
        assert_eq!(nl.income_taxes.len(), 1);
        assert!(nl.wealth_taxes.is_empty());
        assert_eq!(nl.capital_gains_taxes[0].rate(), Some(dec!(15)));
        assert!(catalog.config("XX").is_none());
    }

    #[test]
    fn empty_input_gives_empty_catalog() {
        let catalog = TaxCatalog::load(Vec::new()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn rejects_empty_income_taxes() {
        let mut doc = document("NL");
        doc.income_taxes.clear();
        let err = load_err(vec![doc]);
        assert_eq!(err.issue, ValidationIssue::EmptyTaxGroup);
        assert_eq!(err.location.country, "NL");
        assert_eq!(err.location.tax_type, Some(TaxType::Income));
    }

    #[test]
    fn rejects_empty_capital_gains_taxes() {
        let mut doc = document("NL");
        doc.capital_gains_taxes.clear();
        let err = load_err(vec![doc]);
        assert_eq!(err.issue, ValidationIssue::EmptyTaxGroup);
        assert_eq!(err.location.tax_type, Some(TaxType::CapitalGains));
    }

    #[test]
    fn rejects_rate_and_brackets_together() {
        let mut doc = document("NL");
        doc.income_taxes[0].rate = Some(dec!(30));
        let err = load_err(vec![doc]);
        assert_eq!(err.issue, ValidationIssue::RateAndBrackets);
        assert_eq!(err.location.option_id.as_deref(), Some("nl-income"));
    }

    #[test]
    fn rejects_missing_rate_and_brackets() {
        let mut doc = document("NL");
        doc.capital_gains_taxes[0].rate = None;
        let err = load_err(vec![doc]);
        assert_eq!(err.issue, ValidationIssue::MissingRate);
        assert_eq!(
            err.to_string(),
            "invalid tax configuration at NL/capital_gains/nl-cg: neither rate nor brackets is set"
        );
    }

    #[test]
    fn rejects_empty_bracket_list() {
        let mut doc = document("NL");
        doc.income_taxes[0].brackets = Some(vec![]);
        assert_eq!(load_err(vec![doc]).issue, ValidationIssue::EmptyBrackets);
    }

    #[test]
    fn rejects_unordered_brackets() {
        let mut doc = document("NL");
        doc.income_taxes[0] = progressive(
            "nl-income",
            TaxType::Income,
            &[(dec!(0), dec!(10)), (dec!(5000), dec!(30)), (dec!(5000), dec!(40))],
        );
        assert_eq!(
            load_err(vec![doc]).issue,
            ValidationIssue::UnorderedBrackets {
                previous: dec!(5000),
                threshold: dec!(5000)
            }
        );
    }

    #[test]
    fn rejects_negative_threshold() {
        let mut doc = document("NL");
        doc.income_taxes[0] =
            progressive("nl-income", TaxType::Income, &[(dec!(-1), dec!(10))]);
        assert_eq!(
            load_err(vec![doc]).issue,
            ValidationIssue::NegativeThreshold { threshold: dec!(-1) }
        );
    }

    #[test]
    fn rate_ranges() {
        let mut doc = document("NL");
        doc.capital_gains_taxes[0].rate = Some(dec!(100.5));
        assert!(matches!(
            load_err(vec![doc]).issue,
            ValidationIssue::RateOutOfRange { .. }
        ));

        let mut doc = document("NL");
        doc.capital_gains_taxes[0].rate = Some(dec!(-5));
        assert!(matches!(
            load_err(vec![doc]).issue,
            ValidationIssue::RateOutOfRange { .. }
        ));

        // Negative bracket rates model rebates
        let mut doc = document("NL");
        doc.income_taxes[0] = progressive(
            "nl-income",
            TaxType::Income,
            &[(dec!(0), dec!(-5)), (dec!(1000), dec!(20))],
        );
        assert!(TaxCatalog::load(keyed(vec![doc])).is_ok());
    }

    #[test]
    fn rejects_negative_exemption() {
        let mut doc = document("NL");
        doc.capital_gains_taxes[0].exemption_threshold = Some(dec!(-100));
        assert_eq!(
            load_err(vec![doc]).issue,
            ValidationIssue::NegativeExemption(dec!(-100))
        );
    }

    #[test]
    fn rejects_two_defaults_in_group() {
        let mut doc = document("NL");
        doc.income_taxes.push(default_of(flat("nl-flat", TaxType::Income, dec!(30))));
        let err = load_err(vec![doc]);
        assert_eq!(
            err.issue,
            ValidationIssue::MultipleDefaults {
                first: "nl-income".to_string(),
                second: "nl-flat".to_string()
            }
        );
        assert_eq!(err.location.tax_type, Some(TaxType::Income));
    }

    #[test]
    fn defaults_in_different_groups_are_fine() {
        let mut doc = document("NL");
        doc.capital_gains_taxes[0].is_default = true;
        doc.wealth_taxes.push(default_of(flat("nl-box3", TaxType::Wealth, dec!(36))));
        assert!(TaxCatalog::load(keyed(vec![doc])).is_ok());
    }

    #[test]
    fn rejects_type_listed_in_wrong_group() {
        let mut doc = document("NL");
        doc.wealth_taxes.push(flat("nl-wrong", TaxType::Income, dec!(1)));
        assert_eq!(
            load_err(vec![doc]).issue,
            ValidationIssue::TypeMismatch {
                declared: TaxType::Income
            }
        );
    }

    #[test]
    fn rejects_key_mismatch_and_bad_codes() {
        let err = TaxCatalog::load(vec![("BE".to_string(), document("NL"))]).unwrap_err();
        assert!(matches!(err.issue, ValidationIssue::CountryCodeMismatch { .. }));
        assert_eq!(err.location.country, "BE");

        let err = load_err(vec![document("nl")]);
        assert_eq!(err.issue, ValidationIssue::InvalidCountryCode);

        let mut doc = document("NL");
        doc.country_name = " ".to_string();
        assert_eq!(load_err(vec![doc]).issue, ValidationIssue::MissingCountryName);
    }

    #[test]
    fn rejects_duplicate_country() {
        let err = load_err(vec![document("NL"), document("NL")]);
        assert_eq!(err.issue, ValidationIssue::DuplicateCountry);
    }

    #[test]
    fn rejects_option_id_reused_across_countries() {
        let mut be = document("BE");
        be.capital_gains_taxes[0].id = "nl-cg".to_string();
        let err = load_err(vec![document("NL"), be]);
        assert_eq!(
            err.issue,
            ValidationIssue::DuplicateOptionId {
                first_country: "NL".to_string()
            }
        );
        assert_eq!(err.location.country, "BE");
    }

    #[test]
    fn validate_document_works_standalone() {
        let config = validate_document("NL", &document("NL")).unwrap();
        assert_eq!(config.option_count(), 2);
        assert!(config.income_taxes[0].is_progressive());
    }
}
