pub mod brackets;
pub mod builtin;
pub mod catalog;
pub mod config;
pub mod query;
pub mod shared;

pub use brackets::{
    bracket_breakdown, compute_liability, compute_liability_with, taxable_amount, BracketSlice,
    LiabilityFloor,
};
pub use catalog::{
    validate_document, ConfigValidationError, TaxCatalog, ValidationIssue, ValidationLocation,
};
pub use config::{
    CountryTaxConfig, CountryTaxDocument, RateSchedule, RawTaxOption, TaxBracket, TaxOption,
    TaxType,
};
pub use shared::SharedCatalog;
