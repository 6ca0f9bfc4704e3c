//! Response types and output format writers.

mod csv;
mod json;
pub mod json_envelope;
pub mod progress;
pub mod reporter;
mod types;
mod writer;

pub use csv::CsvWriter;
pub use json::{JsonResultFile, JsonResultWriter, JsonSummary};
pub use reporter::{PipelineSummary, emit_json_error, emit_json_result};
pub use types::{Detection, PredictResponse, Resolution, confidence_percent};
pub use writer::OutputWriter;
