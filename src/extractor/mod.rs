pub mod output_writer;
pub mod pipeline;
pub mod report;

pub use output_writer::OutputWriter;
pub use pipeline::{ExtractionPipeline, ExtractionRequest};
pub use report::ExtractionReport;
