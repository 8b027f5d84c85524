use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CivilStatus {
    #[default]
    Single,
    Married,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub income: f64,
    pub bonus: f64,
    pub age: Option<u32>,
    pub liabilities_annual: f64,
    pub disability_pension: f64,
    /// Paid to the household when this person dies.
    pub survivor_pension: f64,
    pub old_age_pension: f64,
    pub civil_status: CivilStatus,
    pub has_dependent_children: bool,
}

impl Person {
    pub fn total_income(&self) -> f64 {
        self.income + self.bonus
    }

    /// Married or supporting children; raises the unemployment benefit rate.
    pub fn is_obligated(&self) -> bool {
        self.civil_status == CivilStatus::Married || self.has_dependent_children
    }
}

/// One or two borrowers. Whether a partner exists is fixed at normalization
/// time and never inferred from the figures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Household {
    pub primary: Person,
    pub partner: Option<Person>,
}

impl Household {
    pub fn single(primary: Person) -> Self {
        Self {
            primary,
            partner: None,
        }
    }

    pub fn couple(primary: Person, partner: Person) -> Self {
        Self {
            primary,
            partner: Some(partner),
        }
    }

    pub fn members(&self) -> impl Iterator<Item = &Person> {
        std::iter::once(&self.primary).chain(self.partner.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Property {
    pub purchase_price: f64,
    pub renovation_cost: f64,
    pub build_year: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AcquisitionCosts {
    pub transfer_tax: f64,
    pub notary_fee: f64,
    pub registry_fee: f64,
    pub mortgage_note_fee: f64,
}

impl AcquisitionCosts {
    pub fn total(&self) -> f64 {
        self.transfer_tax + self.notary_fee + self.registry_fee + self.mortgage_note_fee
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Equity {
    pub cash: f64,
    pub pillar_3a: f64,
    pub pillar_pk: f64,
}

impl Equity {
    pub fn total(&self) -> f64 {
        self.cash + self.pillar_3a + self.pillar_pk
    }

    /// Retirement-savings withdrawals (pillar 3a plus pension fund).
    pub fn pension_assets(&self) -> f64 {
        self.pillar_3a + self.pillar_pk
    }
}

/// Validated, normalized input for one analysis run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisInput {
    pub household: Household,
    pub property: Property,
    pub costs: AcquisitionCosts,
    pub equity: Equity,
    /// Calendar year building age is measured against.
    pub valuation_year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdTotals {
    pub total_income: f64,
    pub total_equity: f64,
    pub total_pension: f64,
    pub max_age: Option<u32>,
    pub total_liabilities_year: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionFigures {
    pub total_buying_fees: f64,
    pub total_object_investment: f64,
    pub total_equity: f64,
    pub equity_cash: f64,
    pub equity_pension_assets: f64,
    pub mortgage: f64,
    pub lending_ratio_pct: f64,
    pub total_cash_needed: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AffordabilityBand {
    Good,
    Elevated,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityFigures {
    pub first_mortgage_cap: f64,
    pub first_mortgage: f64,
    pub second_mortgage: f64,
    pub amortization_years: u32,
    pub amortization_year: f64,
    pub interest_year: f64,
    pub building_age: i32,
    pub hev_rate: f64,
    pub maintenance_bank: f64,
    pub maintenance_real: f64,
    pub maintenance_hev: f64,
    pub maintenance_save: f64,
    pub housing_costs_bank: f64,
    pub total_burden_bank: f64,
    pub affordability_pct: f64,
    pub band: AffordabilityBand,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverageStatus {
    Covered,
    InsuranceGap,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskKind {
    Unemployment,
    Disability,
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub kind: RiskKind,
    /// Household income when the primary borrower is affected.
    pub primary_affected_income: f64,
    /// Household income when the partner is affected; `None` for a single earner.
    pub partner_affected_income: Option<f64>,
    pub risk_income: f64,
    pub required_income: f64,
    pub income_gap: f64,
    pub affordability_pct: f64,
    pub band: AffordabilityBand,
    pub capital_gap: Option<f64>,
    pub status: CoverageStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessments {
    pub required_income: f64,
    pub unemployment: RiskAssessment,
    pub disability: RiskAssessment,
    pub death: RiskAssessment,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PensionBand {
    Good,
    Critical,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FundingStatus {
    Secured,
    Underfunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementAssessment {
    pub total_pension: f64,
    pub residual_debt: f64,
    pub max_affordable_cost: f64,
    pub available_for_interest: f64,
    pub max_sustainable_mortgage: f64,
    pub funding_gap: f64,
    pub funding_status: FundingStatus,
    pub pension_affordability_pct: f64,
    pub pension_band: PensionBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub totals: HouseholdTotals,
    pub acquisition: AcquisitionFigures,
    pub affordability: AffordabilityFigures,
    pub risks: RiskAssessments,
    pub retirement: RetirementAssessment,
}
