use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("{field} = {value} is outside the accepted range {range}")]
    Validation {
        field: &'static str,
        value: String,
        range: String,
    },
    #[error("region '{0}' was not seen when the encoder was fitted")]
    UnknownRegion(String),
    #[error("prevalence dataset has no rows")]
    EmptyDataset,
    #[error("tip profile '{0}' has no rules")]
    EmptyProfile(String),
}
