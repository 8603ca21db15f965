pub mod formatter;
pub mod report_file;

pub use formatter::{
    format_change, format_earnings, format_money, format_path, format_readiness, format_report,
    format_scenario, format_valuation, should_use_colors,
};
pub use report_file::save_report;
