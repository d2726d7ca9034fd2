//! Option commands - list, default and lookup of tax options

use super::{format_amount, normalize_country, TaxTypeArg};
use clap::Args;
use finplan::tax::{TaxCatalog, TaxOption, TaxType};
use serde::Serialize;
use std::io;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct OptionsCommand {
    /// Country code (e.g., NL, DE, US)
    #[arg(short, long)]
    country: String,

    /// Tax type
    #[arg(short = 't', long, value_enum)]
    tax_type: TaxTypeArg,

    /// Output as JSON instead of formatted table
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

#[derive(Args, Debug)]
pub struct DefaultCommand {
    /// Country code (e.g., NL, DE, US)
    #[arg(short, long)]
    country: String,

    /// Tax type
    #[arg(short = 't', long, value_enum)]
    tax_type: TaxTypeArg,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub struct FindCommand {
    /// Option id (e.g., nl-box1)
    id: String,

    /// Restrict the search to one country
    #[arg(short, long)]
    country: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Row for the options table output
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct OptionRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Default")]
    #[serde(rename = "default")]
    is_default: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Rates")]
    rates: String,
    #[tabled(rename = "Exempt")]
    exemption: String,
}

impl From<&TaxOption> for OptionRow {
    fn from(option: &TaxOption) -> Self {
        OptionRow {
            id: option.id.clone(),
            name: option.name.clone(),
            is_default: if option.is_default { "yes" } else { "" }.to_string(),
            kind: if option.is_progressive() {
                "progressive"
            } else {
                "flat"
            }
            .to_string(),
            rates: option.rate_summary(),
            exemption: format_amount(option.exemption_threshold),
        }
    }
}

impl OptionsCommand {
    pub fn exec(&self, catalog: &TaxCatalog) -> anyhow::Result<()> {
        let country = normalize_country(&self.country);
        let tax_type: TaxType = self.tax_type.into();
        let options = catalog.options(&country, tax_type);

        if self.json {
            println!("{}", serde_json::to_string_pretty(options)?);
            return Ok(());
        }

        let rows: Vec<OptionRow> = options.iter().map(OptionRow::from).collect();
        if self.csv {
            let mut wtr = csv::Writer::from_writer(io::stdout());
            for row in &rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
            return Ok(());
        }

        if rows.is_empty() {
            println!("No {} tax options for {}", tax_type, country);
            return Ok(());
        }
        println!("{}", Table::new(&rows).with(Style::rounded()));
        Ok(())
    }
}

impl DefaultCommand {
    pub fn exec(&self, catalog: &TaxCatalog) -> anyhow::Result<()> {
        let country = normalize_country(&self.country);
        let tax_type: TaxType = self.tax_type.into();

        match catalog.default_option(&country, tax_type) {
            Some(option) if self.json => println!("{}", serde_json::to_string_pretty(option)?),
            Some(option) => print_option(option),
            None if self.json => println!("null"),
            None => {
                let available = catalog.options(&country, tax_type).len();
                if available == 0 {
                    println!("No {} tax options for {}", tax_type, country);
                } else {
                    println!(
                        "No default {} tax option for {}; choose one of {} options explicitly",
                        tax_type, country, available
                    );
                }
            }
        }
        Ok(())
    }
}

impl FindCommand {
    pub fn exec(&self, catalog: &TaxCatalog) -> anyhow::Result<()> {
        let country = self.country.as_deref().map(normalize_country);
        let found = catalog.find_option(&self.id, country.as_deref());

        match found {
            Some(option) if self.json => println!("{}", serde_json::to_string_pretty(option)?),
            Some(option) => print_option(option),
            None => anyhow::bail!("No tax option with id '{}'", self.id),
        }
        Ok(())
    }
}

fn print_option(option: &TaxOption) {
    println!("{} ({})", option.name, option.id);
    println!("  Type:      {}", option.tax_type);
    println!("  Default:   {}", if option.is_default { "yes" } else { "no" });
    println!("  Exemption: {}", format_amount(option.exemption_threshold));
    match option.brackets() {
        Some(brackets) => {
            println!("  Brackets:");
            for bracket in brackets {
                println!(
                    "    from {:>14}  {}",
                    format_amount(bracket.threshold),
                    super::format_rate(bracket.rate)
                );
            }
        }
        None => {
            if let Some(rate) = option.rate() {
                println!("  Rate:      {}", super::format_rate(rate));
            }
        }
    }
    if let Some(notes) = &option.notes {
        println!("  Notes:     {}", notes);
    }
}
