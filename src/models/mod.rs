pub mod index;
pub mod loaders;
pub mod pattern;
pub mod raw;
pub mod request;

pub use index::ValidatedIndex;
pub use loaders::{
    load_requests_file, load_workbook_file, parse_pattern_list, parse_workbook, parse_xlsx,
};
pub use pattern::{
    PatternItem, PatternListing, PatternSummary, Section, DEFAULT_UNIT, MAX_SELECTION, QUOTA,
};
pub use raw::{RawCell, RawTable, RawWorkbook};
pub use request::{RequestFile, WorksheetRequest};
