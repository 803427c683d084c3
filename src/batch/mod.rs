pub mod report;
pub mod runner;

pub use report::{BatchReport, FileResult};
pub use runner::{BatchConverter, BatchEvent, BatchPlan};
