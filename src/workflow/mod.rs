pub mod worksheet_ctx;
pub mod worksheet_flow;

pub use worksheet_ctx::WorksheetCtx;
pub use worksheet_flow::{generate_worksheet, WorksheetFlow};
