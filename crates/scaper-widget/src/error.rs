use scaper_core::EngineError;
use scaper_data::DataError;
use thiserror::Error;

/// Errors that abort a render
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Invalid specification: {0}")]
    Spec(#[from] serde_json::Error),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Scene error: {0}")]
    Engine(#[from] EngineError),
}
