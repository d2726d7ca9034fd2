use super::template::{
    AnnualizedDebt, CashFlow, FixedAsset, FlowDirection, InterestOnlyDebt, ItemCategory,
    ItemTemplate, LinearDebt, LiquidAsset,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Entry of the item type catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemTypeDefinition {
    pub id: &'static str,
    pub category: ItemCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    pub color: &'static str,
    pub template: ItemTemplate,
}

impl ItemTypeDefinition {
    fn new(
        id: &'static str,
        icon: Option<&'static str>,
        color: &'static str,
        template: ItemTemplate,
    ) -> Self {
        ItemTypeDefinition {
            id,
            category: template.category(),
            icon,
            color,
            template,
        }
    }

    /// Fresh copy of the template for the caller to edit
    pub fn instantiate(&self) -> ItemTemplate {
        self.template.clone()
    }
}

/// Label for the "add item" button of a definition
pub fn button_label(definition: &ItemTypeDefinition) -> &str {
    definition.template.name()
}

/// Fixed, ordered set of item type templates
#[derive(Debug, Clone)]
pub struct ItemTypeCatalog {
    definitions: Vec<ItemTypeDefinition>,
}

impl ItemTypeCatalog {
    pub fn standard() -> Self {
        let definitions = vec![
            ItemTypeDefinition::new(
                "savings",
                Some("piggy-bank"),
                "#2e7d32",
                ItemTemplate::LiquidAsset(LiquidAsset {
                    name: "Savings Account".to_string(),
                    balance: dec!(10000),
                    annual_return: dec!(2),
                }),
            ),
            ItemTypeDefinition::new(
                "investments",
                Some("chart-line"),
                "#1565c0",
                ItemTemplate::LiquidAsset(LiquidAsset {
                    name: "Investment Portfolio".to_string(),
                    balance: dec!(25000),
                    annual_return: dec!(7),
                }),
            ),
            ItemTypeDefinition::new(
                "real-estate",
                Some("house"),
                "#6a1b9a",
                ItemTemplate::FixedAsset(FixedAsset {
                    name: "Real Estate".to_string(),
                    value: dec!(350000),
                    annual_change: dec!(3),
                }),
            ),
            ItemTypeDefinition::new(
                "vehicle",
                Some("car"),
                "#ef6c00",
                ItemTemplate::FixedAsset(FixedAsset {
                    name: "Vehicle".to_string(),
                    value: dec!(30000),
                    annual_change: dec!(-15),
                }),
            ),
            ItemTypeDefinition::new(
                "salary",
                Some("briefcase"),
                "#00897b",
                ItemTemplate::CashFlow(CashFlow {
                    name: "Salary".to_string(),
                    amount: dec!(4000),
                    direction: FlowDirection::Income,
                    start: None,
                    end: None,
                    recurring: true,
                }),
            ),
            ItemTypeDefinition::new(
                "expenses",
                Some("cart"),
                "#c62828",
                ItemTemplate::CashFlow(CashFlow {
                    name: "Monthly Expenses".to_string(),
                    amount: dec!(2500),
                    direction: FlowDirection::Expense,
                    start: None,
                    end: None,
                    recurring: true,
                }),
            ),
            ItemTypeDefinition::new(
                "windfall",
                None,
                "#43a047",
                ItemTemplate::CashFlow(CashFlow {
                    name: "One-time Income".to_string(),
                    amount: dec!(5000),
                    direction: FlowDirection::Income,
                    start: None,
                    end: None,
                    recurring: false,
                }),
            ),
            ItemTypeDefinition::new(
                "purchase",
                None,
                "#e53935",
                ItemTemplate::CashFlow(CashFlow {
                    name: "One-time Expense".to_string(),
                    amount: dec!(5000),
                    direction: FlowDirection::Expense,
                    start: None,
                    end: None,
                    recurring: false,
                }),
            ),
            ItemTypeDefinition::new(
                "personal-loan",
                Some("hand-coins"),
                "#8d6e63",
                ItemTemplate::LinearDebt(LinearDebt {
                    name: "Personal Loan".to_string(),
                    principal: dec!(15000),
                    annual_rate: dec!(6.5),
                    term_months: 60,
                }),
            ),
            ItemTypeDefinition::new(
                "mortgage",
                Some("landmark"),
                "#455a64",
                ItemTemplate::AnnualizedDebt(AnnualizedDebt {
                    name: "Mortgage".to_string(),
                    principal: dec!(300000),
                    annual_rate: dec!(4),
                    monthly_payment: dec!(1432.25),
                    start: None,
                    end: None,
                }),
            ),
            ItemTypeDefinition::new(
                "interest-only-loan",
                None,
                "#78909c",
                ItemTemplate::InterestOnlyDebt(InterestOnlyDebt {
                    name: "Interest-only Loan".to_string(),
                    principal: dec!(100000),
                    annual_rate: dec!(5),
                    term_months: 120,
                }),
            ),
        ];

        ItemTypeCatalog { definitions }
    }

    pub fn list_all(&self) -> &[ItemTypeDefinition] {
        &self.definitions
    }

    pub fn get_by_id(&self, id: &str) -> Option<&ItemTypeDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    /// Definitions of one category, in catalog order
    pub fn list_by_category(&self, category: ItemCategory) -> Vec<&ItemTypeDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    pub fn asset_types(&self) -> Vec<&ItemTypeDefinition> {
        self.list_by_category(ItemCategory::Asset)
    }

    pub fn cash_flow_types(&self) -> Vec<&ItemTypeDefinition> {
        self.list_by_category(ItemCategory::Cashflow)
    }

    pub fn debt_types(&self) -> Vec<&ItemTypeDefinition> {
        self.list_by_category(ItemCategory::Debt)
    }
}

impl Default for ItemTypeCatalog {
    fn default() -> Self {
        ItemTypeCatalog::standard()
    }
}

/// Starting amount of a template, for listings
pub fn headline_amount(template: &ItemTemplate) -> Decimal {
    match template {
        ItemTemplate::LiquidAsset(a) => a.balance,
        ItemTemplate::FixedAsset(a) => a.value,
        ItemTemplate::CashFlow(c) => c.amount,
        ItemTemplate::LinearDebt(d) => d.principal,
        ItemTemplate::AnnualizedDebt(d) => d.principal,
        ItemTemplate::InterestOnlyDebt(d) => d.principal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let catalog = ItemTypeCatalog::standard();
        let ids: HashSet<_> = catalog.list_all().iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), catalog.list_all().len());
    }

    #[test]
    fn order_is_stable() {
        let a: Vec<_> = ItemTypeCatalog::standard().list_all().iter().map(|d| d.id).collect();
        let b: Vec<_> = ItemTypeCatalog::standard().list_all().iter().map(|d| d.id).collect();
        assert_eq!(a, b);
        assert_eq!(a.first(), Some(&"savings"));
        assert_eq!(a.last(), Some(&"interest-only-loan"));
    }

    #[test]
    fn category_lists() {
        let catalog = ItemTypeCatalog::standard();
        let ids = |defs: Vec<&ItemTypeDefinition>| defs.iter().map(|d| d.id).collect::<Vec<_>>();
        assert_eq!(
            ids(catalog.asset_types()),
            vec!["savings", "investments", "real-estate", "vehicle"]
        );
        assert_eq!(
            ids(catalog.cash_flow_types()),
            vec!["salary", "expenses", "windfall", "purchase"]
        );
        assert_eq!(
            ids(catalog.debt_types()),
            vec!["personal-loan", "mortgage", "interest-only-loan"]
        );
    }

    #[test]
    fn every_definition_appears_once_in_its_category() {
        let catalog = ItemTypeCatalog::standard();
        for definition in catalog.list_all() {
            let found = catalog.get_by_id(definition.id).unwrap();
            assert_eq!(found.category, found.template.category());
            let matches = catalog
                .list_by_category(found.category)
                .iter()
                .filter(|d| d.id == found.id)
                .count();
            assert_eq!(matches, 1, "{}", found.id);
        }
    }

    #[test]
    fn unknown_id() {
        assert!(ItemTypeCatalog::standard().get_by_id("yacht").is_none());
    }

    #[test]
    fn button_label_is_template_name() {
        let catalog = ItemTypeCatalog::standard();
        let mortgage = catalog.get_by_id("mortgage").unwrap();
        assert_eq!(button_label(mortgage), "Mortgage");
    }

    #[test]
    fn instantiate_does_not_touch_catalog() {
        let catalog = ItemTypeCatalog::standard();
        let definition = catalog.get_by_id("savings").unwrap();
        let mut item = definition.instantiate();
        if let ItemTemplate::LiquidAsset(asset) = &mut item {
            asset.balance = dec!(1);
        }
        assert_ne!(item, definition.template);
        assert_eq!(headline_amount(&definition.template), dec!(10000));
    }
}
