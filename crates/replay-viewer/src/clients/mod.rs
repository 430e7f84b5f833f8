pub mod eval;
pub mod records;

pub use eval::{EvalService, Evaluation, HttpEvalClient};
pub use records::{FileRecordStore, HttpRecordClient, RecordSource};
