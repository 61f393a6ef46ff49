pub mod cli;
pub mod format;
pub mod layout;
pub mod report;
pub mod viewer;
pub mod walker;

pub use viewer::{load_report, run};
