use tracing::debug;

use super::acquisition::{calculate_acquisition, validate_purchase_price};
use super::affordability::calculate_affordability;
use super::error::Result;
use super::household::aggregate_household;
use super::policy::LendingPolicy;
use super::retirement::assess_retirement;
use super::risk::assess_risks;
use super::types::{AnalysisInput, AnalysisResult};

/// Runs one full analysis. Rejects the input before computing anything when
/// the purchase price is below the policy minimum.
pub fn run_analysis(input: &AnalysisInput, policy: &LendingPolicy) -> Result<AnalysisResult> {
    validate_purchase_price(&input.property, policy)?;

    let totals = aggregate_household(&input.household, &input.equity, policy);
    let acquisition =
        calculate_acquisition(&input.property, &input.costs, &input.equity, policy)?;
    let affordability = calculate_affordability(
        &acquisition,
        &totals,
        input.property.build_year,
        input.valuation_year,
        policy,
    );
    let risks = assess_risks(
        &input.household,
        &affordability,
        acquisition.mortgage,
        policy,
    );
    let retirement = assess_retirement(
        acquisition.mortgage,
        affordability.first_mortgage_cap,
        totals.total_pension,
        affordability.maintenance_bank,
        totals.total_liabilities_year,
        policy,
    );

    debug!(
        mortgage = acquisition.mortgage,
        lending_ratio_pct = acquisition.lending_ratio_pct,
        affordability_pct = affordability.affordability_pct,
        funding_gap = retirement.funding_gap,
        "analysis computed"
    );

    Ok(AnalysisResult {
        totals,
        acquisition,
        affordability,
        risks,
        retirement,
    })
}
