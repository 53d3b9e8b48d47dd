pub mod config;
pub mod paths;
pub mod valgrind_report;
