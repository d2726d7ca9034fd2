//! Tax configuration catalog and financial item templates for personal
//! financial planning.
//!
//! The [`tax`] module resolves per-country tax options and computes
//! liabilities with marginal brackets. The [`items`] module holds the fixed
//! catalog of instrument templates that seed user-editable items.

pub mod items;
pub mod loader;
pub mod schema;
pub mod tax;

pub use items::{ItemCategory, ItemTemplate, ItemTypeCatalog, ItemTypeDefinition};
pub use tax::{
    compute_liability, ConfigValidationError, CountryTaxConfig, CountryTaxDocument,
    LiabilityFloor, SharedCatalog, TaxCatalog, TaxOption, TaxType,
};
