use super::policy::LendingPolicy;
use super::types::{Equity, Household, HouseholdTotals};

pub fn aggregate_household(
    household: &Household,
    equity: &Equity,
    policy: &LendingPolicy,
) -> HouseholdTotals {
    let total_income = household.members().map(|p| p.total_income()).sum::<f64>();
    let total_liabilities_year = household
        .members()
        .map(|p| p.liabilities_annual)
        .sum::<f64>();
    let declared_pension = household
        .members()
        .map(|p| p.old_age_pension)
        .sum::<f64>();
    let total_pension = if declared_pension > 0.0 {
        declared_pension
    } else {
        total_income * policy.pension_fallback_ratio
    };
    let max_age = household.members().filter_map(|p| p.age).max();

    HouseholdTotals {
        total_income,
        total_equity: equity.total(),
        total_pension,
        max_age,
        total_liabilities_year,
    }
}
