use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ControllerError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("invalid state: {0}")]
    State(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing inputs")]
    MissingInputs,
    #[error("missing panel")]
    MissingPanel,
    #[error("missing terminal")]
    MissingTerminal,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
