use crate::schema::{FieldSchema, SchemaField};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Category of tax an option applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaxType {
    Income,
    Wealth,
    CapitalGains,
}

impl TaxType {
    /// All tax types in the order options are searched within a country
    pub const ALL: [TaxType; 3] = [TaxType::Income, TaxType::Wealth, TaxType::CapitalGains];

    pub fn from_str(s: &str) -> Option<TaxType> {
        match s.to_lowercase().as_str() {
            "income" => Some(TaxType::Income),
            "wealth" => Some(TaxType::Wealth),
            "capital_gains" | "capital-gains" => Some(TaxType::CapitalGains),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaxType::Income => "income",
            TaxType::Wealth => "wealth",
            TaxType::CapitalGains => "capital_gains",
        }
    }
}

impl std::fmt::Display for TaxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Start of a marginal rate band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, FieldSchema)]
pub struct TaxBracket {
    /// Amount from which the rate applies (after exemption)
    #[schemars(with = "f64")]
    pub threshold: Decimal,
    /// Marginal rate in percent for the slice above the threshold
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

/// Tax option as it appears in a country document.
///
/// `rate` and `brackets` are both optional here; validation turns this into a
/// [`TaxOption`] carrying exactly one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, FieldSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawTaxOption {
    /// Identifier, unique across all countries
    pub id: String,
    /// Display name
    pub name: String,
    /// income, wealth or capital_gains (must match the list it appears in)
    #[serde(rename = "type")]
    pub tax_type: TaxType,
    /// Whether this option applies absent an explicit user choice
    #[serde(default)]
    pub is_default: bool,
    /// Flat rate in percent (exclusive with brackets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub rate: Option<Decimal>,
    /// Progressive brackets ordered by threshold (exclusive with rate)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brackets: Option<Vec<TaxBracket>>,
    /// Amount exempt from tax, subtracted before rates apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub exemption_threshold: Option<Decimal>,
    /// Free-form remarks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// How an option turns a taxable amount into tax
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateSchedule {
    /// Single percentage applied to the whole taxable amount
    Flat(Decimal),
    /// Marginal brackets, thresholds strictly increasing
    Progressive(Vec<TaxBracket>),
}

/// Validated tax option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "RawTaxOption")]
pub struct TaxOption {
    pub id: String,
    pub name: String,
    pub tax_type: TaxType,
    pub is_default: bool,
    pub schedule: RateSchedule,
    pub exemption_threshold: Decimal,
    pub notes: Option<String>,
}

impl TaxOption {
    pub fn is_progressive(&self) -> bool {
        matches!(self.schedule, RateSchedule::Progressive(_))
    }

    /// Flat rate, if this is a flat option
    pub fn rate(&self) -> Option<Decimal> {
        match self.schedule {
            RateSchedule::Flat(rate) => Some(rate),
            RateSchedule::Progressive(_) => None,
        }
    }

    /// Brackets, if this is a progressive option
    pub fn brackets(&self) -> Option<&[TaxBracket]> {
        match &self.schedule {
            RateSchedule::Flat(_) => None,
            RateSchedule::Progressive(brackets) => Some(brackets),
        }
    }

    /// Short human readable description of the rates, e.g. "30%" or "10%-45%"
    pub fn rate_summary(&self) -> String {
        match &self.schedule {
            RateSchedule::Flat(rate) => format!("{}%", rate.normalize()),
            RateSchedule::Progressive(brackets) => {
                let min = brackets.iter().map(|b| b.rate).min().unwrap_or_default();
                let max = brackets.iter().map(|b| b.rate).max().unwrap_or_default();
                if min == max {
                    format!("{}%", min.normalize())
                } else {
                    format!("{}%-{}%", min.normalize(), max.normalize())
                }
            }
        }
    }
}

impl From<TaxOption> for RawTaxOption {
    fn from(option: TaxOption) -> Self {
        let (rate, brackets) = match option.schedule {
            RateSchedule::Flat(rate) => (Some(rate), None),
            RateSchedule::Progressive(brackets) => (None, Some(brackets)),
        };
        RawTaxOption {
            id: option.id,
            name: option.name,
            tax_type: option.tax_type,
            is_default: option.is_default,
            rate,
            brackets,
            exemption_threshold: (!option.exemption_threshold.is_zero())
                .then_some(option.exemption_threshold),
            notes: option.notes,
        }
    }
}

/// Per-country tax document as delivered by the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, FieldSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountryTaxDocument {
    /// ISO 3166-1 alpha-2 code, e.g. NL
    pub country_code: String,
    /// Display name of the country
    pub country_name: String,
    /// Income tax options (at least one)
    pub income_taxes: Vec<RawTaxOption>,
    /// Wealth tax options (may be empty)
    #[serde(default)]
    pub wealth_taxes: Vec<RawTaxOption>,
    /// Capital gains tax options (at least one)
    pub capital_gains_taxes: Vec<RawTaxOption>,
    /// Where the figures come from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl CountryTaxDocument {
    pub fn options(&self, tax_type: TaxType) -> &[RawTaxOption] {
        match tax_type {
            TaxType::Income => &self.income_taxes,
            TaxType::Wealth => &self.wealth_taxes,
            TaxType::CapitalGains => &self.capital_gains_taxes,
        }
    }
}

/// Validated per-country tax configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryTaxConfig {
    pub country_code: String,
    pub country_name: String,
    pub income_taxes: Vec<TaxOption>,
    pub wealth_taxes: Vec<TaxOption>,
    pub capital_gains_taxes: Vec<TaxOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl CountryTaxConfig {
    pub fn options(&self, tax_type: TaxType) -> &[TaxOption] {
        match tax_type {
            TaxType::Income => &self.income_taxes,
            TaxType::Wealth => &self.wealth_taxes,
            TaxType::CapitalGains => &self.capital_gains_taxes,
        }
    }

    /// All options in search order: income, wealth, capital gains
    pub fn all_options(&self) -> impl Iterator<Item = &TaxOption> {
        TaxType::ALL
            .into_iter()
            .flat_map(move |tax_type| self.options(tax_type).iter())
    }

    pub fn option_count(&self) -> usize {
        self.income_taxes.len() + self.wealth_taxes.len() + self.capital_gains_taxes.len()
    }
}
