pub mod format;
pub mod output;
