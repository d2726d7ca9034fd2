//! Countries command - list supported jurisdictions

use clap::Args;
use finplan::tax::{TaxCatalog, TaxType};
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CountriesCommand {
    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled, Serialize)]
struct CountryRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Country")]
    name: String,
    #[tabled(rename = "Income")]
    income: usize,
    #[tabled(rename = "Wealth")]
    wealth: usize,
    #[tabled(rename = "Capital Gains")]
    capital_gains: usize,
}

impl CountriesCommand {
    pub fn exec(&self, catalog: &TaxCatalog) -> anyhow::Result<()> {
        let rows: Vec<CountryRow> = catalog
            .supported_countries()
            .into_iter()
            .filter_map(|code| catalog.config(code))
            .map(|config| CountryRow {
                code: config.country_code.clone(),
                name: config.country_name.clone(),
                income: config.options(TaxType::Income).len(),
                wealth: config.options(TaxType::Wealth).len(),
                capital_gains: config.options(TaxType::CapitalGains).len(),
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        if rows.is_empty() {
            println!("No countries configured");
            return Ok(());
        }
        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}
