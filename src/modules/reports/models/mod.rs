mod cargo_report;

pub use cargo_report::CargoReport;
