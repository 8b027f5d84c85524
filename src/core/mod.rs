mod acquisition;
mod affordability;
mod engine;
mod error;
mod household;
pub mod normalize;
mod policy;
mod report;
mod retirement;
mod risk;
mod types;

pub use engine::run_analysis;
pub use error::AnalysisError;
pub use policy::{LendingPolicy, PolicyError};
pub use report::{
    AcquisitionReport, AmountFormatter, AnalysisReport, CostsReport, Figure, RetirementReport,
    RiskReport, assemble_report,
};
pub use types::{
    AcquisitionCosts, AcquisitionFigures, AffordabilityBand, AffordabilityFigures,
    AnalysisInput, AnalysisResult, CivilStatus, CoverageStatus, Equity, FundingStatus,
    Household, HouseholdTotals, PensionBand, Person, Property, RetirementAssessment,
    RiskAssessment, RiskAssessments, RiskKind,
};
