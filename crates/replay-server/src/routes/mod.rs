pub mod analyze;
pub mod games;
