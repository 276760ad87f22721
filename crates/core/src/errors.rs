use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown product `{0}`")]
    UnknownProduct(String),
    #[error("unknown occasion `{0}`")]
    UnknownOccasion(String),
    #[error("unknown color theme `{0}`")]
    UnknownColorTheme(String),
    #[error("unknown budget tier `{0}`")]
    UnknownBudgetTier(String),
    #[error("unknown outfit slot `{0}`")]
    UnknownSlot(String),
}
