use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("purchase price must be at least CHF {minimum}, got {price}")]
    PurchasePriceBelowMinimum { price: f64, minimum: f64 },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
