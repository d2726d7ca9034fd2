use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Broad grouping shown in the item editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Asset,
    Cashflow,
    Debt,
}

impl ItemCategory {
    pub fn from_str(s: &str) -> Option<ItemCategory> {
        match s.to_lowercase().as_str() {
            "asset" | "assets" => Some(ItemCategory::Asset),
            "cashflow" | "cashflows" | "cash_flow" => Some(ItemCategory::Cashflow),
            "debt" | "debts" => Some(ItemCategory::Debt),
            _ => None,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            ItemCategory::Asset => "asset",
            ItemCategory::Cashflow => "cashflow",
            ItemCategory::Debt => "debt",
        }
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FlowDirection {
    Income,
    Expense,
}

/// Cash or cash-like holding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LiquidAsset {
    pub name: String,
    #[schemars(with = "f64")]
    pub balance: Decimal,
    /// Expected yearly return in percent
    #[schemars(with = "f64")]
    pub annual_return: Decimal,
}

/// Asset whose value changes at a steady yearly rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FixedAsset {
    pub name: String,
    #[schemars(with = "f64")]
    pub value: Decimal,
    /// Yearly change in percent, negative for depreciation
    #[schemars(with = "f64")]
    pub annual_change: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CashFlow {
    pub name: String,
    /// Monthly amount for recurring flows, total for one-time flows
    #[schemars(with = "f64")]
    pub amount: Decimal,
    pub direction: FlowDirection,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    pub recurring: bool,
}

/// Loan repaid in equal principal instalments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LinearDebt {
    pub name: String,
    #[schemars(with = "f64")]
    pub principal: Decimal,
    #[schemars(with = "f64")]
    pub annual_rate: Decimal,
    pub term_months: u32,
}

/// Loan repaid with a fixed monthly payment covering interest and principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnnualizedDebt {
    pub name: String,
    #[schemars(with = "f64")]
    pub principal: Decimal,
    #[schemars(with = "f64")]
    pub annual_rate: Decimal,
    #[schemars(with = "f64")]
    pub monthly_payment: Decimal,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// Loan where only interest is paid until the principal falls due
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InterestOnlyDebt {
    pub name: String,
    #[schemars(with = "f64")]
    pub principal: Decimal,
    #[schemars(with = "f64")]
    pub annual_rate: Decimal,
    pub term_months: u32,
}

/// Prototype of a user-editable financial item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind")]
pub enum ItemTemplate {
    LiquidAsset(LiquidAsset),
    FixedAsset(FixedAsset),
    CashFlow(CashFlow),
    LinearDebt(LinearDebt),
    AnnualizedDebt(AnnualizedDebt),
    InterestOnlyDebt(InterestOnlyDebt),
}

impl ItemTemplate {
    pub fn name(&self) -> &str {
        match self {
            ItemTemplate::LiquidAsset(a) => &a.name,
            ItemTemplate::FixedAsset(a) => &a.name,
            ItemTemplate::CashFlow(c) => &c.name,
            ItemTemplate::LinearDebt(d) => &d.name,
            ItemTemplate::AnnualizedDebt(d) => &d.name,
            ItemTemplate::InterestOnlyDebt(d) => &d.name,
        }
    }

    pub fn category(&self) -> ItemCategory {
        match self {
            ItemTemplate::LiquidAsset(_) | ItemTemplate::FixedAsset(_) => ItemCategory::Asset,
            ItemTemplate::CashFlow(_) => ItemCategory::Cashflow,
            ItemTemplate::LinearDebt(_)
            | ItemTemplate::AnnualizedDebt(_)
            | ItemTemplate::InterestOnlyDebt(_) => ItemCategory::Debt,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ItemTemplate::LiquidAsset(_) => "LiquidAsset",
            ItemTemplate::FixedAsset(_) => "FixedAsset",
            ItemTemplate::CashFlow(_) => "CashFlow",
            ItemTemplate::LinearDebt(_) => "LinearDebt",
            ItemTemplate::AnnualizedDebt(_) => "AnnualizedDebt",
            ItemTemplate::InterestOnlyDebt(_) => "InterestOnlyDebt",
        }
    }
}
