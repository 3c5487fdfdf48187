pub mod request_loader;
pub mod workbook_loader;

pub use request_loader::{load_requests_file, parse_pattern_list};
pub use workbook_loader::{load_workbook_file, parse_workbook, parse_xlsx};
