pub mod compute;
pub mod countries;
pub mod items;
pub mod options;
pub mod schema;
pub mod validate;

use clap::ValueEnum;
use finplan::tax::{builtin, TaxCatalog, TaxType};
use finplan::{loader, ItemCategory};
use rust_decimal::Decimal;
use std::path::Path;

/// Catalog from `data_dir`, or the bundled documents when none is given
pub fn load_catalog(data_dir: Option<&Path>) -> anyhow::Result<TaxCatalog> {
    match data_dir {
        Some(dir) => loader::load_catalog(dir),
        None => {
            log::debug!("No data directory configured, using bundled tax documents");
            builtin::catalog()
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TaxTypeArg {
    Income,
    Wealth,
    CapitalGains,
}

impl From<TaxTypeArg> for TaxType {
    fn from(arg: TaxTypeArg) -> Self {
        match arg {
            TaxTypeArg::Income => TaxType::Income,
            TaxTypeArg::Wealth => TaxType::Wealth,
            TaxTypeArg::CapitalGains => TaxType::CapitalGains,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Asset,
    Cashflow,
    Debt,
}

impl From<CategoryArg> for ItemCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Asset => ItemCategory::Asset,
            CategoryArg::Cashflow => ItemCategory::Cashflow,
            CategoryArg::Debt => ItemCategory::Debt,
        }
    }
}

/// Country codes are stored upper case
pub fn normalize_country(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Two decimal places for display
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", rate.normalize())
}
