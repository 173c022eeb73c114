// casklabels: print data-driven labels onto pre-printed label sheets

pub mod canvas;
pub mod config;
pub mod error;
pub mod expand;
pub mod field;
pub mod geometry;
pub mod metrics;
pub mod page;
pub mod paragraph;
pub mod pdf;
pub mod record;
pub mod render;
pub mod style;
pub mod template;

pub use canvas::Canvas;
pub use config::{LabelType, LabelTypes};
pub use error::{LabelError, Result};
pub use expand::expand;
pub use field::{FieldParams, FieldSpec};
pub use geometry::{GridGeometry, GridParams};
pub use page::PageSize;
pub use pdf::PdfCanvas;
pub use record::{CsvRecords, Record};
pub use render::{LabelSheetRenderer, RenderSummary};
