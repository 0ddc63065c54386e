pub mod batch;
pub mod recorder;

pub use batch::{BatchEntry, BatchReport, BatchRunner, BATCH_REPORT_FILE};
pub use recorder::{DreamRecorder, RecordedPaths};
