pub mod file;
pub mod report;
