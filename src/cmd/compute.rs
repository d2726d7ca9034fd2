//! Compute command - tax liability for an amount

use super::{format_amount, format_rate, normalize_country, TaxTypeArg};
use clap::Args;
use finplan::tax::{
    bracket_breakdown, compute_liability_with, taxable_amount, BracketSlice, LiabilityFloor,
    TaxCatalog, TaxOption, TaxType,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ComputeCommand {
    /// Country code (e.g., NL, DE, US)
    #[arg(short, long)]
    country: String,

    /// Tax type
    #[arg(short = 't', long, value_enum)]
    tax_type: TaxTypeArg,

    /// Income, wealth or gain to tax
    #[arg(short, long)]
    amount: Decimal,

    /// Option id to use instead of the country's default
    #[arg(short, long)]
    option: Option<String>,

    /// Clamp negative liabilities (rebates) at zero
    #[arg(long)]
    floor: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ComputeOutput<'a> {
    country: String,
    tax_type: TaxType,
    option_id: &'a str,
    option_name: &'a str,
    amount: String,
    exemption: String,
    taxable: String,
    liability: String,
    effective_rate_pct: String,
    brackets: Vec<BracketSlice>,
}

#[derive(Debug, Tabled)]
struct SliceRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Taxed")]
    taxed: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

impl ComputeCommand {
    pub fn exec(&self, catalog: &TaxCatalog) -> anyhow::Result<()> {
        if self.amount < Decimal::ZERO {
            anyhow::bail!("Amount must not be negative");
        }
        let country = normalize_country(&self.country);
        let tax_type: TaxType = self.tax_type.into();
        let option = self.resolve_option(catalog, &country, tax_type)?;

        let floor = if self.floor {
            LiabilityFloor::Zero
        } else {
            LiabilityFloor::PassThrough
        };
        let liability = compute_liability_with(self.amount, option, floor);
        let slices = bracket_breakdown(self.amount, option);
        let effective_rate = if self.amount.is_zero() {
            Decimal::ZERO
        } else {
            (liability / self.amount * Decimal::ONE_HUNDRED).round_dp(2)
        };
        log::debug!(
            "{} on {} under {}: {}",
            tax_type,
            self.amount,
            option.id,
            liability
        );

        if self.json {
            let output = ComputeOutput {
                country,
                tax_type,
                option_id: &option.id,
                option_name: &option.name,
                amount: format_amount(self.amount),
                exemption: format_amount(option.exemption_threshold),
                taxable: format_amount(taxable_amount(self.amount, option)),
                liability: format_amount(liability),
                effective_rate_pct: format!("{:.2}", effective_rate),
                brackets: slices,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!();
        println!("TAX LIABILITY ({} {})", country, tax_type);
        println!();
        println!("  Option:         {} ({})", option.name, option.id);
        println!("  Amount:         {}", format_amount(self.amount));
        println!("  Exemption:      {}", format_amount(option.exemption_threshold));
        println!(
            "  Taxable:        {}",
            format_amount(taxable_amount(self.amount, option))
        );
        println!();

        if !slices.is_empty() {
            let rows: Vec<SliceRow> = slices
                .iter()
                .map(|s| SliceRow {
                    from: format_amount(s.threshold),
                    to: s.upper_bound.map(format_amount).unwrap_or_default(),
                    rate: format_rate(s.rate),
                    taxed: format_amount(s.taxed_amount),
                    tax: format_amount(s.tax),
                })
                .collect();
            let table = Table::new(&rows)
                .with(Style::rounded())
                .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
            println!();
        }

        println!("  Liability:      {}", format_amount(liability));
        println!("  Effective rate: {:.2}%", effective_rate);
        Ok(())
    }

    fn resolve_option<'a>(
        &self,
        catalog: &'a TaxCatalog,
        country: &str,
        tax_type: TaxType,
    ) -> anyhow::Result<&'a TaxOption> {
        if catalog.config(country).is_none() {
            anyhow::bail!("Country {} is not supported", country);
        }

        match &self.option {
            Some(id) => {
                let option = catalog
                    .find_option(id, Some(country))
                    .ok_or_else(|| anyhow::anyhow!("No tax option '{}' for {}", id, country))?;
                if option.tax_type != tax_type {
                    anyhow::bail!("Option '{}' is a {} tax, not {}", id, option.tax_type, tax_type);
                }
                Ok(option)
            }
            None => catalog.default_option(country, tax_type).ok_or_else(|| {
                anyhow::anyhow!(
                    "{} has no default {} tax option; pass --option with one of: {}",
                    country,
                    tax_type,
                    option_ids(catalog.options(country, tax_type))
                )
            }),
        }
    }
}

fn option_ids(options: &[TaxOption]) -> String {
    if options.is_empty() {
        return "(none configured)".to_string();
    }
    options
        .iter()
        .map(|o| o.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
