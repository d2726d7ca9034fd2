//! Month-by-month projection of item templates.
//!
//! Month 0 is the initial state. Rates are nominal yearly percentages
//! compounded monthly. Calendar dates on cash flows and debts are not
//! interpreted here; month indexes are relative to the item's start.

use super::template::{
    AnnualizedDebt, CashFlow, FlowDirection, InterestOnlyDebt, ItemTemplate, LinearDebt,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionPoint {
    pub month: u32,
    /// Asset value, cumulative net cash flow, or outstanding debt
    pub balance: Decimal,
    /// Amount paid or received during the month
    pub payment: Decimal,
}

/// Project `template` for `months` months (result has `months + 1` points).
///
/// The projection ends early if a balance leaves the `Decimal` range.
pub fn project(template: &ItemTemplate, months: u32) -> Vec<ProjectionPoint> {
    match template {
        ItemTemplate::LiquidAsset(asset) => compound(asset.balance, asset.annual_return, months),
        ItemTemplate::FixedAsset(asset) => compound(asset.value, asset.annual_change, months),
        ItemTemplate::CashFlow(flow) => cash_flow(flow, months),
        ItemTemplate::LinearDebt(debt) => linear_debt(debt, months),
        ItemTemplate::AnnualizedDebt(debt) => annualized_debt(debt, months),
        ItemTemplate::InterestOnlyDebt(debt) => interest_only_debt(debt, months),
    }
}

/// Level monthly payment that repays `principal` over `months`
pub fn annuity_payment(principal: Decimal, annual_rate: Decimal, months: u32) -> Decimal {
    if months == 0 {
        return principal;
    }
    let rate = monthly_rate(annual_rate);
    let growth = (0..months).try_fold(Decimal::ONE, |acc, _| acc.checked_mul(Decimal::ONE + rate));
    let Some(growth) = growth else {
        // growth beyond range: the payment converges to the interest alone
        return principal * rate;
    };
    // rates too small to register in `1 + rate` behave like zero
    if growth == Decimal::ONE {
        return principal / Decimal::from(months);
    }
    match Decimal::ONE.checked_div(growth) {
        Some(discount) => principal * rate / (Decimal::ONE - discount),
        None => principal * rate,
    }
}

fn monthly_rate(annual_rate: Decimal) -> Decimal {
    annual_rate / dec!(1200)
}

/// Month 0 at `initial`, then one point per month from `step` until it
/// yields `None` (arithmetic overflow) or `months` is reached.
fn run<F>(initial: Decimal, months: u32, mut step: F) -> Vec<ProjectionPoint>
where
    F: FnMut(u32) -> Option<ProjectionPoint>,
{
    let mut points = vec![ProjectionPoint {
        month: 0,
        balance: initial,
        payment: Decimal::ZERO,
    }];
    for month in 1..=months {
        match step(month) {
            Some(point) => points.push(point),
            None => {
                log::warn!("Projection stopped at month {}: amount out of range", month);
                break;
            }
        }
    }
    points
}

fn compound(initial: Decimal, annual_rate: Decimal, months: u32) -> Vec<ProjectionPoint> {
    let rate = monthly_rate(annual_rate);
    let mut balance = initial;
    run(initial, months, |month| {
        balance = balance.checked_add(balance.checked_mul(rate)?)?;
        Some(ProjectionPoint {
            month,
            balance,
            payment: Decimal::ZERO,
        })
    })
}

fn cash_flow(flow: &CashFlow, months: u32) -> Vec<ProjectionPoint> {
    let signed = match flow.direction {
        FlowDirection::Income => flow.amount,
        FlowDirection::Expense => -flow.amount,
    };
    let mut total = Decimal::ZERO;
    run(Decimal::ZERO, months, |month| {
        let payment = if flow.recurring || month == 1 {
            signed
        } else {
            Decimal::ZERO
        };
        total = total.checked_add(payment)?;
        Some(ProjectionPoint {
            month,
            balance: total,
            payment,
        })
    })
}

fn linear_debt(debt: &LinearDebt, months: u32) -> Vec<ProjectionPoint> {
    let rate = monthly_rate(debt.annual_rate);
    let instalment = if debt.term_months == 0 {
        debt.principal
    } else {
        debt.principal / Decimal::from(debt.term_months)
    };

    let mut balance = debt.principal;
    run(debt.principal, months, |month| {
        let interest = balance.checked_mul(rate)?;
        let repaid = if month >= debt.term_months {
            balance
        } else {
            instalment.min(balance)
        };
        balance -= repaid;
        Some(ProjectionPoint {
            month,
            balance,
            payment: repaid.checked_add(interest)?,
        })
    })
}

fn annualized_debt(debt: &AnnualizedDebt, months: u32) -> Vec<ProjectionPoint> {
    let rate = monthly_rate(debt.annual_rate);
    let mut balance = debt.principal;
    run(debt.principal, months, |month| {
        let owed = balance.checked_add(balance.checked_mul(rate)?)?;
        let payment = debt.monthly_payment.min(owed);
        balance = owed - payment;
        Some(ProjectionPoint {
            month,
            balance,
            payment,
        })
    })
}

fn interest_only_debt(debt: &InterestOnlyDebt, months: u32) -> Vec<ProjectionPoint> {
    let rate = monthly_rate(debt.annual_rate);
    let mut balance = debt.principal;
    run(debt.principal, months, |month| {
        let mut payment = balance.checked_mul(rate)?;
        if month >= debt.term_months {
            payment = payment.checked_add(balance)?;
            balance = Decimal::ZERO;
        }
        Some(ProjectionPoint {
            month,
            balance,
            payment,
        })
    })
}
