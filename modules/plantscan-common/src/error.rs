use thiserror::Error;

/// Why an analysis cycle ended in `Failed`. Every kind is terminal for its
/// cycle and none is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No image was selected")]
    MissingInput,

    #[error("Image is too large ({size} bytes, limit is {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Could not read the image: {0}")]
    ReadError(String),

    #[error("The analysis service returned HTTP {status}")]
    ServerError { status: u16 },

    #[error("The analysis service returned no description")]
    MalformedResponse,

    #[error("Could not reach the analysis service: {0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum PlantScanError {
    #[error("Configuration error: {0}")]
    Config(String),
}
