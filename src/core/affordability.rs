use super::policy::LendingPolicy;
use super::types::{AcquisitionFigures, AffordabilityBand, AffordabilityFigures, HouseholdTotals};

pub fn classify_affordability(pct: f64, policy: &LendingPolicy) -> AffordabilityBand {
    if pct <= policy.affordability_limit_pct {
        AffordabilityBand::Good
    } else if pct <= policy.elevated_limit_pct {
        AffordabilityBand::Elevated
    } else {
        AffordabilityBand::Critical
    }
}

/// Splits the mortgage at the first-mortgage cap. Returns `(cap, first, second)`;
/// `first + second == mortgage`.
pub fn split_tranches(
    mortgage: f64,
    total_object_investment: f64,
    policy: &LendingPolicy,
) -> (f64, f64, f64) {
    let cap = total_object_investment * policy.first_mortgage_ltv;
    let second = (mortgage - cap).max(0.0);
    (cap, mortgage - second, second)
}

pub fn calculate_affordability(
    acquisition: &AcquisitionFigures,
    totals: &HouseholdTotals,
    build_year: Option<i32>,
    valuation_year: i32,
    policy: &LendingPolicy,
) -> AffordabilityFigures {
    let investment = acquisition.total_object_investment;
    let mortgage = acquisition.mortgage;

    let (first_mortgage_cap, first_mortgage, second_mortgage) =
        split_tranches(mortgage, investment, policy);
    let amortization_years = policy.amortization_years(totals.max_age);
    let amortization_year = second_mortgage / amortization_years as f64;
    let interest_year = mortgage * policy.imputed_interest_rate;

    let building_age = policy.building_age(build_year, valuation_year);
    let hev_rate = policy.hev_rate(building_age);
    let maintenance_bank = investment * policy.bank_maintenance_rate;
    let maintenance_real = investment * policy.real_maintenance_rate;
    let maintenance_hev = investment * hev_rate;
    let maintenance_save = (maintenance_hev - maintenance_real).max(0.0);

    let housing_costs_bank = interest_year + amortization_year + maintenance_bank;
    let total_burden_bank = housing_costs_bank + totals.total_liabilities_year;
    let affordability_pct = if totals.total_income > 0.0 {
        total_burden_bank / totals.total_income * 100.0
    } else {
        0.0
    };

    AffordabilityFigures {
        first_mortgage_cap,
        first_mortgage,
        second_mortgage,
        amortization_years,
        amortization_year,
        interest_year,
        building_age,
        hev_rate,
        maintenance_bank,
        maintenance_real,
        maintenance_hev,
        maintenance_save,
        housing_costs_bank,
        total_burden_bank,
        affordability_pct,
        band: classify_affordability(affordability_pct, policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{any, prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn acquisition(investment: f64, mortgage: f64) -> AcquisitionFigures {
        AcquisitionFigures {
            total_buying_fees: 0.0,
            total_object_investment: investment,
            total_equity: investment - mortgage,
            equity_cash: investment - mortgage,
            equity_pension_assets: 0.0,
            mortgage,
            lending_ratio_pct: mortgage / investment * 100.0,
            total_cash_needed: investment - mortgage,
        }
    }

    fn totals(income: f64, max_age: Option<u32>, liabilities: f64) -> HouseholdTotals {
        HouseholdTotals {
            total_income: income,
            total_equity: 0.0,
            total_pension: income * 0.6,
            max_age,
            total_liabilities_year: liabilities,
        }
    }

    #[test]
    fn oracle_new_build_matches_hand_calculation() {
        let figures = calculate_affordability(
            &acquisition(1_000_000.0, 750_000.0),
            &totals(200_000.0, Some(40), 0.0),
            Some(2026),
            2026,
            &LendingPolicy::default(),
        );

        assert_approx(figures.first_mortgage_cap, 666_600.0);
        assert_approx(figures.second_mortgage, 83_400.0);
        assert_approx(figures.first_mortgage, 666_600.0);
        assert_eq!(figures.amortization_years, 15);
        assert_approx(figures.amortization_year, 5_560.0);
        assert_approx(figures.interest_year, 37_500.0);
        assert_eq!(figures.building_age, 0);
        assert_approx(figures.hev_rate, 0.005);
        assert_approx(figures.maintenance_bank, 10_000.0);
        assert_approx(figures.maintenance_real, 3_000.0);
        assert_approx(figures.maintenance_hev, 5_000.0);
        assert_approx(figures.maintenance_save, 2_000.0);
        assert_approx(figures.total_burden_bank, 53_060.0);
        assert_approx(figures.affordability_pct, 26.53);
        assert_eq!(figures.band, AffordabilityBand::Good);
    }

    #[test]
    fn liabilities_add_to_burden_and_old_buildings_use_higher_hev() {
        let figures = calculate_affordability(
            &acquisition(1_000_000.0, 750_000.0),
            &totals(150_000.0, Some(55), 6_000.0),
            None,
            2026,
            &LendingPolicy::default(),
        );

        assert_eq!(figures.building_age, 20);
        assert_approx(figures.hev_rate, 0.008);
        assert_eq!(figures.amortization_years, 10);
        assert_approx(figures.amortization_year, 8_340.0);
        assert_approx(figures.total_burden_bank, 37_500.0 + 8_340.0 + 10_000.0 + 6_000.0);
        assert_approx(figures.affordability_pct, 61_840.0 / 150_000.0 * 100.0);
        assert_eq!(figures.band, AffordabilityBand::Critical);
    }

    #[test]
    fn zero_income_resolves_ratio_to_zero() {
        let figures = calculate_affordability(
            &acquisition(500_000.0, 400_000.0),
            &totals(0.0, None, 0.0),
            None,
            2026,
            &LendingPolicy::default(),
        );
        assert_approx(figures.affordability_pct, 0.0);
        assert_eq!(figures.band, AffordabilityBand::Good);
    }

    #[test]
    fn bands_follow_canonical_thresholds() {
        let policy = LendingPolicy::default();
        assert_eq!(classify_affordability(33.33, &policy), AffordabilityBand::Good);
        assert_eq!(classify_affordability(33.34, &policy), AffordabilityBand::Elevated);
        assert_eq!(classify_affordability(38.0, &policy), AffordabilityBand::Elevated);
        assert_eq!(classify_affordability(38.01, &policy), AffordabilityBand::Critical);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_tranche_split_preserves_total(
            investment in 10_000u32..10_000_000,
            mortgage_share_bp in 0u32..10_001
        ) {
            let investment = investment as f64;
            let mortgage = investment * mortgage_share_bp as f64 / 10_000.0;
            let (cap, first, second) = split_tranches(mortgage, investment, &LendingPolicy::default());
            prop_assert!(second >= 0.0);
            prop_assert!(first <= cap + 1e-6);
            prop_assert!(((first + second) - mortgage).abs() <= 1e-6);
        }

        #[test]
        fn prop_amortization_years_within_term(age in proptest::option::of(0u32..120)) {
            let years = LendingPolicy::default().amortization_years(age);
            prop_assert!((1..=15).contains(&years));
        }

        #[test]
        fn prop_hev_rate_tier_for_every_build_year(build_year in any::<i16>(), valuation_year in 1900i32..2200) {
            let policy = LendingPolicy::default();
            let age = policy.building_age(Some(build_year as i32), valuation_year);
            let expected = if age <= 10 { 0.005 } else { 0.008 };
            prop_assert!(policy.hev_rate(age) == expected);
        }
    }
}
