//! Marginal tax computation.
//!
//! Each bracket taxes only the slice of the taxable amount that lies between
//! its threshold and the next bracket's threshold (the last bracket is
//! unbounded). Results are not rounded. Any non-negative `Decimal` amount is
//! accepted: no bracket rate exceeds 100%, so neither a slice's tax nor the
//! total can exceed the taxable amount in magnitude.

use super::config::{RateSchedule, TaxBracket, TaxOption};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// What to do with a negative total produced by rebate brackets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiabilityFloor {
    /// Return negative totals unchanged
    #[default]
    PassThrough,
    /// Never return less than zero
    Zero,
}

/// Portion of the taxable amount that fell within one bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketSlice {
    pub threshold: Decimal,
    /// Next bracket's threshold, `None` for the open-ended top bracket
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub taxed_amount: Decimal,
    pub tax: Decimal,
}

/// Amount left after the exemption, never negative
pub fn taxable_amount(amount: Decimal, option: &TaxOption) -> Decimal {
    amount
        .checked_sub(option.exemption_threshold)
        .map_or(Decimal::ZERO, |taxable| taxable.max(Decimal::ZERO))
}

/// Tax due on `amount` under `option`, negative totals passed through
pub fn compute_liability(amount: Decimal, option: &TaxOption) -> Decimal {
    compute_liability_with(amount, option, LiabilityFloor::default())
}

pub fn compute_liability_with(
    amount: Decimal,
    option: &TaxOption,
    floor: LiabilityFloor,
) -> Decimal {
    let taxable = taxable_amount(amount, option);
    let liability = match &option.schedule {
        RateSchedule::Flat(rate) => percent_of(taxable, *rate),
        RateSchedule::Progressive(brackets) => slices(taxable, brackets).map(|s| s.tax).sum(),
    };

    match floor {
        LiabilityFloor::PassThrough => liability,
        LiabilityFloor::Zero => liability.max(Decimal::ZERO),
    }
}

/// Per-bracket view of a computation, for display.
///
/// Brackets that receive nothing are left out. A flat option yields a single
/// slice starting at zero.
pub fn bracket_breakdown(amount: Decimal, option: &TaxOption) -> Vec<BracketSlice> {
    let taxable = taxable_amount(amount, option);
    match &option.schedule {
        RateSchedule::Flat(rate) => {
            if taxable.is_zero() {
                return Vec::new();
            }
            vec![BracketSlice {
                threshold: Decimal::ZERO,
                upper_bound: None,
                rate: *rate,
                taxed_amount: taxable,
                tax: percent_of(taxable, *rate),
            }]
        }
        RateSchedule::Progressive(brackets) => slices(taxable, brackets).collect(),
    }
}

fn slices(taxable: Decimal, brackets: &[TaxBracket]) -> impl Iterator<Item = BracketSlice> + '_ {
    debug_assert!(!brackets.is_empty(), "progressive schedule without brackets");

    brackets.iter().enumerate().filter_map(move |(i, bracket)| {
        let upper_bound = brackets.get(i + 1).map(|next| next.threshold);
        let top = match upper_bound {
            Some(upper) => taxable.min(upper),
            None => taxable,
        };
        let taxed_amount = top - bracket.threshold;
        if taxed_amount <= Decimal::ZERO {
            return None;
        }
        Some(BracketSlice {
            threshold: bracket.threshold,
            upper_bound,
            rate: bracket.rate,
            taxed_amount,
            tax: percent_of(taxed_amount, bracket.rate),
        })
    })
}

/// Validated rates lie within `[-100, 100]`, so the fraction is at most one
/// in magnitude and the product cannot leave the range of `amount`.
fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    amount * (rate / dec!(100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::config::TaxType;

    fn option(schedule: RateSchedule, exemption: Decimal) -> TaxOption {
        TaxOption {
            id: "test".to_string(),
            name: "Test".to_string(),
            tax_type: TaxType::Income,
            is_default: true,
            schedule,
            exemption_threshold: exemption,
            notes: None,
        }
    }

    fn brackets(pairs: &[(Decimal, Decimal)]) -> RateSchedule {
        RateSchedule::Progressive(
            pairs
                .iter()
                .map(|&(threshold, rate)| TaxBracket { threshold, rate })
                .collect(),
        )
    }

    fn two_band() -> TaxOption {
        option(
            brackets(&[(dec!(0), dec!(10)), (dec!(1000), dec!(20))]),
            Decimal::ZERO,
        )
    }

    #[test]
    fn within_first_bracket() {
        assert_eq!(compute_liability(dec!(500), &two_band()), dec!(50));
    }

    #[test]
    fn exactly_at_threshold() {
        assert_eq!(compute_liability(dec!(1000), &two_band()), dec!(100));
    }

    #[test]
    fn spans_two_brackets() {
        // 1000 * 10% + 500 * 20%
        assert_eq!(compute_liability(dec!(1500), &two_band()), dec!(200));
    }

    #[test]
    fn zero_amount() {
        assert_eq!(compute_liability(Decimal::ZERO, &two_band()), Decimal::ZERO);
    }

    #[test]
    fn flat_rate_with_exemption() {
        let opt = option(RateSchedule::Flat(dec!(26.375)), dec!(1000));
        assert_eq!(compute_liability(dec!(3000), &opt), dec!(527.5));
        assert_eq!(compute_liability(dec!(1000), &opt), Decimal::ZERO);
        assert_eq!(compute_liability(dec!(400), &opt), Decimal::ZERO);
    }

    #[test]
    fn exemption_applies_before_brackets() {
        let opt = option(
            brackets(&[(dec!(0), dec!(10)), (dec!(1000), dec!(20))]),
            dec!(500),
        );
        // taxable 1000
        assert_eq!(compute_liability(dec!(1500), &opt), dec!(100));
        assert_eq!(compute_liability(dec!(500), &opt), Decimal::ZERO);
        assert_eq!(compute_liability(dec!(499.99), &opt), Decimal::ZERO);
    }

    #[test]
    fn single_bracket_matches_flat_rate() {
        let single = option(brackets(&[(dec!(0), dec!(18))]), dec!(3000));
        let flat = option(RateSchedule::Flat(dec!(18)), dec!(3000));
        for amount in [dec!(0), dec!(1), dec!(2999.99), dec!(3000), dec!(12345.67), dec!(1000000)] {
            assert_eq!(
                compute_liability(amount, &single),
                compute_liability(amount, &flat),
                "amount {}",
                amount
            );
        }
    }

    #[test]
    fn first_threshold_above_zero_leaves_bottom_untaxed() {
        let opt = option(brackets(&[(dec!(100), dec!(10))]), Decimal::ZERO);
        assert_eq!(compute_liability(dec!(50), &opt), Decimal::ZERO);
        assert_eq!(compute_liability(dec!(300), &opt), dec!(20));
    }

    #[test]
    fn non_monotonic_rates() {
        let opt = option(
            brackets(&[(dec!(0), dec!(30)), (dec!(100), dec!(10)), (dec!(200), dec!(40))]),
            Decimal::ZERO,
        );
        // 30 + 10 + 20
        assert_eq!(compute_liability(dec!(250), &opt), dec!(60));
    }

    #[test]
    fn non_decreasing_in_amount_with_positive_rates() {
        let opt = option(
            brackets(&[
                (dec!(0), dec!(36.97)),
                (dec!(75518), dec!(49.5)),
                (dec!(200000), dec!(45)),
            ]),
            dec!(1000),
        );
        let mut previous = Decimal::ZERO;
        let mut amount = Decimal::ZERO;
        while amount <= dec!(300000) {
            let liability = compute_liability(amount, &opt);
            assert!(liability >= previous, "dropped at {}", amount);
            previous = liability;
            amount += dec!(2500);
        }
    }

    #[test]
    fn rebate_brackets_pass_through_or_floor() {
        let opt = option(
            brackets(&[(dec!(0), dec!(-10)), (dec!(1000), dec!(5))]),
            Decimal::ZERO,
        );
        assert_eq!(compute_liability(dec!(500), &opt), dec!(-50));
        assert_eq!(
            compute_liability_with(dec!(500), &opt, LiabilityFloor::Zero),
            Decimal::ZERO
        );
        // -100 + 100
        assert_eq!(compute_liability(dec!(3000), &opt), Decimal::ZERO);
    }

    #[test]
    fn negative_amount_is_untaxed() {
        assert_eq!(compute_liability(dec!(-500), &two_band()), Decimal::ZERO);
    }

    #[test]
    fn largest_amount_does_not_overflow() {
        let opt = option(RateSchedule::Flat(dec!(45)), Decimal::ZERO);
        let liability = compute_liability(Decimal::MAX, &opt);
        assert!(liability > Decimal::MAX * dec!(0.44));
        assert!(liability < Decimal::MAX * dec!(0.46));

        let liability = compute_liability(Decimal::MAX, &two_band());
        assert!(liability > Decimal::MAX * dec!(0.19));
        assert!(liability < Decimal::MAX * dec!(0.21));
        let total: Decimal = bracket_breakdown(Decimal::MAX, &two_band())
            .iter()
            .map(|s| s.tax)
            .sum();
        assert_eq!(total, liability);

        let exempt = option(RateSchedule::Flat(dec!(45)), dec!(100));
        assert_eq!(compute_liability(Decimal::MIN, &exempt), Decimal::ZERO);
    }

    #[test]
    fn no_rounding_applied() {
        let opt = option(RateSchedule::Flat(dec!(36.97)), Decimal::ZERO);
        assert_eq!(compute_liability(dec!(1.23), &opt), dec!(0.454731));
    }

    #[test]
    fn breakdown_lists_taxed_slices() {
        let slices = bracket_breakdown(dec!(1500), &two_band());
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].taxed_amount, dec!(1000));
        assert_eq!(slices[0].upper_bound, Some(dec!(1000)));
        assert_eq!(slices[1].taxed_amount, dec!(500));
        assert_eq!(slices[1].upper_bound, None);
        assert_eq!(slices[1].tax, dec!(100));

        let total: Decimal = slices.iter().map(|s| s.tax).sum();
        assert_eq!(total, compute_liability(dec!(1500), &two_band()));

        assert_eq!(bracket_breakdown(dec!(500), &two_band()).len(), 1);
    }

    #[test]
    fn breakdown_of_flat_option() {
        let opt = option(RateSchedule::Flat(dec!(20)), dec!(100));
        let slices = bracket_breakdown(dec!(600), &opt);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].taxed_amount, dec!(500));
        assert_eq!(slices[0].tax, dec!(100));
        assert!(bracket_breakdown(dec!(50), &opt).is_empty());
    }
}
