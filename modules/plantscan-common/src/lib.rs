pub mod config;
pub mod error;
pub mod parser;
pub mod record;

pub use config::Config;
pub use error::{AnalysisError, PlantScanError};
pub use parser::parse;
pub use record::PlantRecord;
