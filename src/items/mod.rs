pub mod catalog;
pub mod projection;
pub mod template;

pub use catalog::{button_label, headline_amount, ItemTypeCatalog, ItemTypeDefinition};
pub use projection::{annuity_payment, project, ProjectionPoint};
pub use template::{
    AnnualizedDebt, CashFlow, FixedAsset, FlowDirection, InterestOnlyDebt, ItemCategory,
    ItemTemplate, LinearDebt, LiquidAsset,
};
