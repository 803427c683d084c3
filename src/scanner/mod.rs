pub mod notebook_filter;
pub mod notebook_scanner;

pub use notebook_filter::NotebookFilter;
pub use notebook_scanner::{NotebookFile, NotebookScanner, ScanResult};
