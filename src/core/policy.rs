use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lending and underwriting constants applied by every calculator.
///
/// Rates are fractions (`0.05` = 5%), limits expressed in percent are
/// suffixed `_pct`. The default is the canonical policy: a 33.33%
/// affordability limit for both the working and the pension phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LendingPolicy {
    pub imputed_interest_rate: f64,
    pub first_mortgage_ltv: f64,
    pub bank_maintenance_rate: f64,
    pub real_maintenance_rate: f64,
    pub hev_rate_new_building: f64,
    pub hev_rate_old_building: f64,
    pub new_building_max_age: i32,
    pub default_building_age: i32,
    pub amortization_end_age: u32,
    pub max_amortization_years: u32,
    pub affordability_limit_pct: f64,
    pub elevated_limit_pct: f64,
    pub unemployment_insured_cap: f64,
    pub unemployment_rate_obligated: f64,
    pub unemployment_rate_default: f64,
    pub pension_fallback_ratio: f64,
    pub min_purchase_price: f64,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            imputed_interest_rate: 0.05,
            first_mortgage_ltv: 0.6666,
            bank_maintenance_rate: 0.01,
            real_maintenance_rate: 0.003,
            hev_rate_new_building: 0.005,
            hev_rate_old_building: 0.008,
            new_building_max_age: 10,
            default_building_age: 20,
            amortization_end_age: 65,
            max_amortization_years: 15,
            affordability_limit_pct: 33.33,
            elevated_limit_pct: 38.0,
            unemployment_insured_cap: 148_200.0,
            unemployment_rate_obligated: 0.80,
            unemployment_rate_default: 0.70,
            pension_fallback_ratio: 0.6,
            min_purchase_price: 10_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("policy value {name} must be a finite number >= 0, got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("affordability limit must be > 0 and <= elevated limit ({elevated}), got {limit}")]
    InvalidAffordabilityLimits { limit: f64, elevated: f64 },

    #[error("maximum amortization years must be >= 1")]
    InvalidAmortizationYears,
}

impl LendingPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        for (name, value) in [
            ("imputedInterestRate", self.imputed_interest_rate),
            ("firstMortgageLtv", self.first_mortgage_ltv),
            ("bankMaintenanceRate", self.bank_maintenance_rate),
            ("realMaintenanceRate", self.real_maintenance_rate),
            ("hevRateNewBuilding", self.hev_rate_new_building),
            ("hevRateOldBuilding", self.hev_rate_old_building),
            ("unemploymentInsuredCap", self.unemployment_insured_cap),
            ("unemploymentRateObligated", self.unemployment_rate_obligated),
            ("unemploymentRateDefault", self.unemployment_rate_default),
            ("pensionFallbackRatio", self.pension_fallback_ratio),
            ("minPurchasePrice", self.min_purchase_price),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PolicyError::InvalidRate { name, value });
            }
        }

        if !self.affordability_limit_pct.is_finite()
            || self.affordability_limit_pct <= 0.0
            || self.affordability_limit_pct > self.elevated_limit_pct
        {
            return Err(PolicyError::InvalidAffordabilityLimits {
                limit: self.affordability_limit_pct,
                elevated: self.elevated_limit_pct,
            });
        }

        if self.max_amortization_years == 0 {
            return Err(PolicyError::InvalidAmortizationYears);
        }

        Ok(())
    }

    /// Affordability limit as a fraction of income.
    pub fn affordability_limit(&self) -> f64 {
        self.affordability_limit_pct / 100.0
    }

    /// Maintenance benchmark by building age: the new-building rate up to
    /// and including `new_building_max_age`, the old-building rate after.
    pub fn hev_rate(&self, building_age: i32) -> f64 {
        if building_age <= self.new_building_max_age {
            self.hev_rate_new_building
        } else {
            self.hev_rate_old_building
        }
    }

    pub fn building_age(&self, build_year: Option<i32>, valuation_year: i32) -> i32 {
        build_year
            .map(|year| valuation_year - year)
            .unwrap_or(self.default_building_age)
    }

    /// Years over which the second mortgage is paid down. Unknown ages fall
    /// back to the maximum term.
    pub fn amortization_years(&self, max_age: Option<u32>) -> u32 {
        match max_age {
            None => self.max_amortization_years,
            Some(age) => self
                .amortization_end_age
                .saturating_sub(age)
                .max(1)
                .min(self.max_amortization_years),
        }
    }
}
