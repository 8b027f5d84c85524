use super::error::{AnalysisError, Result};
use super::policy::LendingPolicy;
use super::types::{AcquisitionCosts, AcquisitionFigures, Equity, Property};

pub fn validate_purchase_price(property: &Property, policy: &LendingPolicy) -> Result<()> {
    // NaN compares false, so test the accepting side.
    if property.purchase_price >= policy.min_purchase_price {
        Ok(())
    } else {
        Err(AnalysisError::PurchasePriceBelowMinimum {
            price: property.purchase_price,
            minimum: policy.min_purchase_price,
        })
    }
}

pub fn calculate_acquisition(
    property: &Property,
    costs: &AcquisitionCosts,
    equity: &Equity,
    policy: &LendingPolicy,
) -> Result<AcquisitionFigures> {
    validate_purchase_price(property, policy)?;

    let total_buying_fees = costs.total();
    let total_object_investment = property.purchase_price + property.renovation_cost;
    let total_equity = equity.total();
    let mortgage = (total_object_investment - total_equity).max(0.0);
    let lending_ratio_pct = if total_object_investment > 0.0 {
        mortgage / total_object_investment * 100.0
    } else {
        0.0
    };

    Ok(AcquisitionFigures {
        total_buying_fees,
        total_object_investment,
        total_equity,
        equity_cash: equity.cash,
        equity_pension_assets: equity.pension_assets(),
        mortgage,
        lending_ratio_pct,
        total_cash_needed: total_equity + total_buying_fees,
    })
}
