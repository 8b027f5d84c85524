use super::policy::LendingPolicy;
use super::types::{FundingStatus, PensionBand, RetirementAssessment};

/// Pension-phase check. The second mortgage is assumed to be amortized by
/// then, so only the first tranche remains as debt.
pub fn assess_retirement(
    mortgage: f64,
    first_mortgage_cap: f64,
    total_pension: f64,
    maintenance_bank: f64,
    total_liabilities_year: f64,
    policy: &LendingPolicy,
) -> RetirementAssessment {
    let rate = policy.imputed_interest_rate;
    let residual_debt = mortgage.min(first_mortgage_cap);
    let max_affordable_cost = total_pension * policy.affordability_limit();
    let available_for_interest = max_affordable_cost - maintenance_bank - total_liabilities_year;
    let max_sustainable_mortgage = if rate > 0.0 {
        (available_for_interest / rate).max(0.0)
    } else {
        0.0
    };
    let funding_gap = (residual_debt - max_sustainable_mortgage).max(0.0);

    let pension_affordability_pct = if total_pension > 0.0 {
        (residual_debt * rate + maintenance_bank + total_liabilities_year) / total_pension * 100.0
    } else {
        0.0
    };

    RetirementAssessment {
        total_pension,
        residual_debt,
        max_affordable_cost,
        available_for_interest,
        max_sustainable_mortgage,
        funding_gap,
        funding_status: if funding_gap > 0.0 {
            FundingStatus::Underfunded
        } else {
            FundingStatus::Secured
        },
        pension_affordability_pct,
        pension_band: if pension_affordability_pct <= policy.affordability_limit_pct {
            PensionBand::Good
        } else {
            PensionBand::Critical
        },
    }
}
