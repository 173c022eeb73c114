//! Label sheet renderer: records in, paginated labels out.

use crate::canvas::Canvas;
use crate::error::Result;
use crate::field::FieldSpec;
use crate::geometry::GridGeometry;
use crate::record::Record;
use tracing::{debug, info};

/// Counts from a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub labels: usize,
    pub pages: usize,
}

pub struct LabelSheetRenderer<'a> {
    geometry: &'a GridGeometry,
    fields: &'a [FieldSpec],
}

impl<'a> LabelSheetRenderer<'a> {
    pub fn new(geometry: &'a GridGeometry, fields: &'a [FieldSpec]) -> Self {
        Self { geometry, fields }
    }

    /// Render one label per record, in order, starting a new page whenever
    /// the grid fills. Records are pulled one at a time. The last page is
    /// committed even when no records arrive, then the document is
    /// finalized. Any error aborts the run.
    pub fn render<C, I>(&self, canvas: &mut C, records: I) -> Result<RenderSummary>
    where
        C: Canvas + ?Sized,
        I: IntoIterator<Item = Result<Record>>,
    {
        if let Some(size) = self.geometry.configured_page_size() {
            canvas.set_page_size(size);
        }

        let mut labels = 0;
        let mut pages = 0;

        for (i, record) in records.into_iter().enumerate() {
            let record = record?;

            if self.geometry.is_page_boundary(i) {
                canvas.show_page()?;
                pages += 1;
                info!("page {} complete", pages);
            }

            let (x, y) = self.geometry.slot_origin(i);
            debug!("label {} at ({:.1}, {:.1})", i + 1, x, y);

            canvas.save_state()?;
            canvas.translate(x, y);
            for field in self.fields {
                field.render(canvas, &record)?;
            }
            canvas.restore_state();

            labels += 1;
        }

        canvas.show_page()?;
        pages += 1;
        info!("page {} complete", pages);

        canvas.finalize()?;

        Ok(RenderSummary { labels, pages })
    }
}
