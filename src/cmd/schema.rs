//! Schema command - print the expected tax document format

use clap::Args;
use finplan::schema::SchemaField;
use finplan::tax::{CountryTaxDocument, RawTaxOption, TaxBracket};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for a country tax document
    JsonSchema,
    /// Field descriptions for each document section
    Fields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::Fields => self.print_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(CountryTaxDocument);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_fields(&self) -> anyhow::Result<()> {
        println!("Tax Document Format (one <CODE>.json file per country)");
        println!("=====================================================");
        print_section("Country", CountryTaxDocument::field_schema());
        print_section("Tax option", RawTaxOption::field_schema());
        print_section("Bracket", TaxBracket::field_schema());
        println!();
        println!("Each option sets exactly one of rate or brackets. Rates are percentages.");
        Ok(())
    }
}

fn print_section(title: &str, fields: &[SchemaField]) {
    println!();
    println!("{}", title);
    for field in fields {
        let req = if field.required { "required" } else { "optional" };
        println!("  {:20} ({:8})  {}", field.name, req, field.description);
    }
}
