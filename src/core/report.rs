use serde::Serialize;

use super::types::{
    AffordabilityBand, AnalysisResult, CoverageStatus, FundingStatus, PensionBand, RiskAssessment,
    RiskKind,
};

/// Renders an amount for display. Supplied by the presentation layer.
pub trait AmountFormatter {
    fn format_amount(&self, value: f64) -> String;
}

/// Monetary value plus its display string, when a formatter was supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Figure {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionReport {
    pub mortgage: Figure,
    pub lending_ratio_pct: f64,
    pub total_buying_fees: Figure,
    pub total_object_investment: Figure,
    pub total_cash_needed: Figure,
    pub total_equity: Figure,
    pub equity_cash: Figure,
    pub equity_pension_assets: Figure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostsReport {
    pub first_mortgage: Figure,
    pub second_mortgage: Figure,
    pub amortization_years: u32,
    pub amortization_year: Figure,
    pub interest_year: Figure,
    pub hev_rate: f64,
    pub maintenance_bank: Figure,
    pub maintenance_real: Figure,
    pub maintenance_save: Figure,
    pub total_burden_bank: Figure,
    pub total_income: Figure,
    pub affordability_pct: f64,
    pub band: AffordabilityBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    pub kind: RiskKind,
    pub risk_income: Figure,
    pub income_gap: Figure,
    pub affordability_pct: f64,
    pub band: AffordabilityBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital_gap: Option<Figure>,
    pub status: CoverageStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementReport {
    pub total_pension: Figure,
    pub residual_debt: Figure,
    pub max_sustainable_mortgage: Figure,
    pub funding_gap: Figure,
    pub funding_status: FundingStatus,
    pub pension_affordability_pct: f64,
    pub pension_band: PensionBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub acquisition: AcquisitionReport,
    pub costs: CostsReport,
    pub required_income: Figure,
    pub unemployment: RiskReport,
    pub disability: RiskReport,
    pub death: RiskReport,
    pub retirement: RetirementReport,
}

struct Packer<'a> {
    formatter: Option<&'a dyn AmountFormatter>,
}

impl Packer<'_> {
    fn figure(&self, value: f64) -> Figure {
        Figure {
            value,
            formatted: self.formatter.map(|f| f.format_amount(value)),
        }
    }

    fn risk(&self, risk: &RiskAssessment) -> RiskReport {
        RiskReport {
            kind: risk.kind,
            risk_income: self.figure(risk.risk_income),
            income_gap: self.figure(risk.income_gap),
            affordability_pct: risk.affordability_pct,
            band: risk.band,
            capital_gap: risk.capital_gap.map(|gap| self.figure(gap)),
            status: risk.status,
        }
    }
}

pub fn assemble_report(
    result: &AnalysisResult,
    formatter: Option<&dyn AmountFormatter>,
) -> AnalysisReport {
    let p = Packer { formatter };
    let acquisition = &result.acquisition;
    let costs = &result.affordability;
    let retirement = &result.retirement;

    AnalysisReport {
        acquisition: AcquisitionReport {
            mortgage: p.figure(acquisition.mortgage),
            lending_ratio_pct: acquisition.lending_ratio_pct,
            total_buying_fees: p.figure(acquisition.total_buying_fees),
            total_object_investment: p.figure(acquisition.total_object_investment),
            total_cash_needed: p.figure(acquisition.total_cash_needed),
            total_equity: p.figure(acquisition.total_equity),
            equity_cash: p.figure(acquisition.equity_cash),
            equity_pension_assets: p.figure(acquisition.equity_pension_assets),
        },
        costs: CostsReport {
            first_mortgage: p.figure(costs.first_mortgage),
            second_mortgage: p.figure(costs.second_mortgage),
            amortization_years: costs.amortization_years,
            amortization_year: p.figure(costs.amortization_year),
            interest_year: p.figure(costs.interest_year),
            hev_rate: costs.hev_rate,
            maintenance_bank: p.figure(costs.maintenance_bank),
            maintenance_real: p.figure(costs.maintenance_real),
            maintenance_save: p.figure(costs.maintenance_save),
            total_burden_bank: p.figure(costs.total_burden_bank),
            total_income: p.figure(result.totals.total_income),
            affordability_pct: costs.affordability_pct,
            band: costs.band,
        },
        required_income: p.figure(result.risks.required_income),
        unemployment: p.risk(&result.risks.unemployment),
        disability: p.risk(&result.risks.disability),
        death: p.risk(&result.risks.death),
        retirement: RetirementReport {
            total_pension: p.figure(retirement.total_pension),
            residual_debt: p.figure(retirement.residual_debt),
            max_sustainable_mortgage: p.figure(retirement.max_sustainable_mortgage),
            funding_gap: p.figure(retirement.funding_gap),
            funding_status: retirement.funding_status,
            pension_affordability_pct: retirement.pension_affordability_pct,
            pension_band: retirement.pension_band,
        },
    }
}
