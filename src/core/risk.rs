use super::affordability::classify_affordability;
use super::policy::LendingPolicy;
use super::types::{
    AffordabilityFigures, CoverageStatus, Household, Person, RiskAssessment, RiskAssessments,
    RiskKind,
};

/// Household income needed to keep the bank burden at the affordability limit.
pub fn required_income(total_burden_bank: f64, policy: &LendingPolicy) -> f64 {
    total_burden_bank / policy.affordability_limit()
}

/// Daily-allowance replacement on the insured base salary. Bonuses are not insured.
pub fn unemployment_benefit(person: &Person, policy: &LendingPolicy) -> f64 {
    let rate = if person.is_obligated() {
        policy.unemployment_rate_obligated
    } else {
        policy.unemployment_rate_default
    };
    person.income.min(policy.unemployment_insured_cap) * rate
}

/// Household income for each affected borrower: `(primary affected, partner affected)`.
///
/// `replacement` is what the affected borrower still brings in. The unaffected
/// partner keeps their full income, except in the death case where the
/// survivor pension is already part of the replacement and the deceased's
/// own income is gone.
fn affected_incomes(
    household: &Household,
    kind: RiskKind,
    policy: &LendingPolicy,
) -> (f64, Option<f64>) {
    let replacement = |person: &Person| match kind {
        RiskKind::Unemployment => unemployment_benefit(person, policy),
        RiskKind::Disability => person.disability_pension,
        RiskKind::Death => person.survivor_pension,
    };

    let primary = &household.primary;
    match &household.partner {
        None => (replacement(primary), None),
        Some(partner) => (
            replacement(primary) + partner.total_income(),
            Some(replacement(partner) + primary.total_income()),
        ),
    }
}

fn assess(
    household: &Household,
    kind: RiskKind,
    affordability: &AffordabilityFigures,
    mortgage: f64,
    policy: &LendingPolicy,
) -> RiskAssessment {
    let burden = affordability.total_burden_bank;
    let required = required_income(burden, policy);
    let (primary_affected_income, partner_affected_income) =
        affected_incomes(household, kind, policy);
    let risk_income = partner_affected_income
        .map(|partner| primary_affected_income.min(partner))
        .unwrap_or(primary_affected_income);

    let income_gap = (required - risk_income).max(0.0);
    let affordability_pct = if risk_income > 0.0 {
        burden / risk_income * 100.0
    } else {
        0.0
    };

    let capital_gap = match kind {
        RiskKind::Death => Some(capital_gap(
            burden,
            risk_income,
            affordability.amortization_year,
            mortgage,
            policy,
        )),
        RiskKind::Unemployment | RiskKind::Disability => None,
    };

    RiskAssessment {
        kind,
        primary_affected_income,
        partner_affected_income,
        risk_income,
        required_income: required,
        income_gap,
        affordability_pct,
        band: classify_affordability(affordability_pct, policy),
        capital_gap,
        status: if income_gap > 0.0 {
            CoverageStatus::InsuranceGap
        } else {
            CoverageStatus::Covered
        },
    }
}

/// Lump sum that, paid against the mortgage, cuts interest plus amortization
/// enough to bring the burden back to the limit at `risk_income`.
pub fn capital_gap(
    total_burden_bank: f64,
    risk_income: f64,
    amortization_year: f64,
    mortgage: f64,
    policy: &LendingPolicy,
) -> f64 {
    let annual_shortfall =
        (total_burden_bank - risk_income * policy.affordability_limit()).max(0.0);
    let amortization_rate = if mortgage > 0.0 {
        amortization_year / mortgage
    } else {
        0.0
    };
    let service_rate = policy.imputed_interest_rate + amortization_rate;
    if service_rate > 0.0 {
        annual_shortfall / service_rate
    } else {
        0.0
    }
}

pub fn assess_risks(
    household: &Household,
    affordability: &AffordabilityFigures,
    mortgage: f64,
    policy: &LendingPolicy,
) -> RiskAssessments {
    RiskAssessments {
        required_income: required_income(affordability.total_burden_bank, policy),
        unemployment: assess(
            household,
            RiskKind::Unemployment,
            affordability,
            mortgage,
            policy,
        ),
        disability: assess(
            household,
            RiskKind::Disability,
            affordability,
            mortgage,
            policy,
        ),
        death: assess(household, RiskKind::Death, affordability, mortgage, policy),
    }
}
