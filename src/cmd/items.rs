//! Item commands - browse item type templates and project them forward

use super::{format_amount, CategoryArg};
use clap::Args;
use finplan::items::{button_label, headline_amount, project, ItemTypeCatalog, ItemTypeDefinition};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ItemsCommand {
    /// Only show one category
    #[arg(short, long, value_enum)]
    category: Option<CategoryArg>,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub struct ProjectCommand {
    /// Item type id (e.g., mortgage, savings)
    id: String,

    /// Number of months to project (at most 100 years)
    #[arg(
        short,
        long,
        default_value_t = 12,
        value_parser = clap::value_parser!(u32).range(1..=1200)
    )]
    months: u32,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled)]
struct ItemRow {
    #[tabled(rename = "Id")]
    id: &'static str,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Color")]
    color: &'static str,
}

impl From<&ItemTypeDefinition> for ItemRow {
    fn from(definition: &ItemTypeDefinition) -> Self {
        ItemRow {
            id: definition.id,
            category: definition.category.to_string(),
            kind: definition.template.kind(),
            label: button_label(definition).to_string(),
            amount: format_amount(headline_amount(&definition.template)),
            color: definition.color,
        }
    }
}

#[derive(Debug, Tabled)]
struct PointRow {
    #[tabled(rename = "Month")]
    month: u32,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

impl ItemsCommand {
    pub fn exec(&self, catalog: &ItemTypeCatalog) -> anyhow::Result<()> {
        let definitions: Vec<&ItemTypeDefinition> = match self.category {
            Some(category) => catalog.list_by_category(category.into()),
            None => catalog.list_all().iter().collect(),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&definitions)?);
            return Ok(());
        }

        let rows: Vec<ItemRow> = definitions.into_iter().map(ItemRow::from).collect();
        println!("{}", Table::new(&rows).with(Style::rounded()));
        Ok(())
    }
}

impl ProjectCommand {
    pub fn exec(&self, catalog: &ItemTypeCatalog) -> anyhow::Result<()> {
        let definition = catalog
            .get_by_id(&self.id)
            .ok_or_else(|| anyhow::anyhow!("Unknown item type '{}'", self.id))?;
        let points = project(&definition.instantiate(), self.months);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&points)?);
            return Ok(());
        }

        println!();
        println!(
            "PROJECTION: {} ({}) over {} months",
            button_label(definition),
            definition.template.kind(),
            self.months
        );
        println!();
        let rows: Vec<PointRow> = points
            .iter()
            .map(|p| PointRow {
                month: p.month,
                payment: format_amount(p.payment),
                balance: format_amount(p.balance),
            })
            .collect();
        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}
