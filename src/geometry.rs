//! Label grid geometry: where the Nth label lands on which page.

use crate::error::{LabelError, Result};
use crate::page::{pt_to_mm, PageSize};

/// Physical description of one label sheet, in points.
#[derive(Debug, Clone, PartialEq)]
pub struct GridParams {
    /// Page size named by the label type, if any
    pub page_size: Option<PageSize>,
    /// Page edge to the left edge of the first column
    pub left: f32,
    /// Page top edge to the top edge of the first row
    pub top: f32,
    pub horizontal_pitch: f32,
    pub vertical_pitch: f32,
    pub slot_width: f32,
    pub slot_height: f32,
    pub columns: usize,
    pub rows: usize,
}

/// Immutable grid built once per run.
///
/// Labels are numbered across, then down, then on to the next page. PDF
/// coordinates grow upwards from the bottom-left corner, so rows are
/// stored bottom-up and the top row of the sheet has the highest index.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    configured_page: Option<PageSize>,
    page: PageSize,
    left: f32,
    bottom: f32,
    horizontal_pitch: f32,
    vertical_pitch: f32,
    slot_width: f32,
    slot_height: f32,
    columns: usize,
    rows: usize,
}

impl GridGeometry {
    /// Validate `params` and derive the grid. `default_page` is used when
    /// the label type does not name a page size.
    pub fn new(params: GridParams, default_page: PageSize) -> Result<Self> {
        let page = params.page_size.unwrap_or(default_page);

        if params.columns == 0 || params.rows == 0 {
            return Err(LabelError::InvalidGrid(format!(
                "grid must have at least one column and one row, got {} x {}",
                params.columns, params.rows
            )));
        }

        let positive = [
            ("page width", page.width),
            ("page height", page.height),
            ("horizontal pitch", params.horizontal_pitch),
            ("vertical pitch", params.vertical_pitch),
            ("label width", params.slot_width),
            ("label height", params.slot_height),
        ];
        for (what, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LabelError::InvalidGrid(format!(
                    "{} must be greater than zero, got {}",
                    what, value
                )));
            }
        }

        for (what, value) in [("left offset", params.left), ("top offset", params.top)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LabelError::InvalidGrid(format!(
                    "{} must not be negative, got {}",
                    what, value
                )));
            }
        }

        let bottom = page.height - params.top - params.rows as f32 * params.vertical_pitch;

        Ok(Self {
            configured_page: params.page_size,
            page,
            left: params.left,
            bottom,
            horizontal_pitch: params.horizontal_pitch,
            vertical_pitch: params.vertical_pitch,
            slot_width: params.slot_width,
            slot_height: params.slot_height,
            columns: params.columns,
            rows: params.rows,
        })
    }

    /// Bottom-left corner, in page points, of the slot for label `label_index`
    /// (zero based, across then down then across pages).
    pub fn slot_origin(&self, label_index: usize) -> (f32, f32) {
        let position = label_index % self.slots_per_page();

        let row_from_top = position / self.columns;
        let row = self.rows - 1 - (row_from_top % self.rows);
        let column = position % self.columns;

        (
            self.left + column as f32 * self.horizontal_pitch,
            self.bottom + row as f32 * self.vertical_pitch,
        )
    }

    /// True when label `label_index` must start on a fresh page.
    pub fn is_page_boundary(&self, label_index: usize) -> bool {
        label_index > 0 && label_index % self.slots_per_page() == 0
    }

    pub fn slots_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// Page size named by the label type, `None` when the default applies
    pub fn configured_page_size(&self) -> Option<PageSize> {
        self.configured_page
    }

    /// Page size the grid was laid out against
    pub fn page_size(&self) -> PageSize {
        self.page
    }

    pub fn slot_width(&self) -> f32 {
        self.slot_width
    }

    pub fn slot_height(&self) -> f32 {
        self.slot_height
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Problems that do not stop printing but suggest a mismeasured sheet:
    /// labels overlapping their neighbours, or a grid larger than the page.
    pub fn fit_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.slot_width > self.horizontal_pitch && self.columns > 1 {
            problems.push(format!(
                "label width {:.1}mm exceeds horizontal pitch {:.1}mm, labels will overlap",
                pt_to_mm(self.slot_width),
                pt_to_mm(self.horizontal_pitch)
            ));
        }
        if self.slot_height > self.vertical_pitch && self.rows > 1 {
            problems.push(format!(
                "label height {:.1}mm exceeds vertical pitch {:.1}mm, labels will overlap",
                pt_to_mm(self.slot_height),
                pt_to_mm(self.vertical_pitch)
            ));
        }
        if self.bottom < 0.0 {
            problems.push(format!(
                "grid is {:.1}mm taller than the page, bottom row runs off the sheet",
                pt_to_mm(-self.bottom)
            ));
        }
        let right = self.left
            + (self.columns - 1) as f32 * self.horizontal_pitch
            + self.slot_width;
        if right > self.page.width {
            problems.push(format!(
                "grid is {:.1}mm wider than the page, last column runs off the sheet",
                pt_to_mm(right - self.page.width)
            ));
        }

        problems
    }

    /// Page bottom edge to the bottom edge of the lowest row
    pub fn bottom_offset(&self) -> f32 {
        self.bottom
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashSet;

    const PAGE: PageSize = PageSize {
        width: 600.0,
        height: 800.0,
    };

    pub(crate) fn params(columns: usize, rows: usize) -> GridParams {
        GridParams {
            page_size: Some(PAGE),
            left: 10.0,
            top: 20.0,
            horizontal_pitch: 150.0,
            vertical_pitch: 100.0,
            slot_width: 140.0,
            slot_height: 90.0,
            columns,
            rows,
        }
    }

    pub(crate) fn grid(columns: usize, rows: usize) -> GridGeometry {
        GridGeometry::new(params(columns, rows), PAGE).unwrap()
    }

    #[test]
    fn bottom_offset_is_derived_from_page_height() {
        let g = grid(3, 2);
        assert_eq!(g.bottom_offset(), 800.0 - 20.0 - 2.0 * 100.0);
        assert_eq!(g.slots_per_page(), 6);
    }

    #[test]
    fn first_page_covers_every_slot_once() {
        let g = grid(3, 2);
        let origins: Vec<_> = (0..6).map(|i| g.slot_origin(i)).collect();
        let distinct: HashSet<_> = origins
            .iter()
            .map(|(x, y)| (x.to_bits(), y.to_bits()))
            .collect();
        assert_eq!(distinct.len(), 6);
    }

    #[test]
    fn labels_wrap_onto_the_next_page() {
        let g = grid(3, 2);
        assert_eq!(g.slot_origin(6), g.slot_origin(0));
        assert_eq!(g.slot_origin(11), g.slot_origin(5));
        assert!(g.is_page_boundary(6));
        assert!(g.is_page_boundary(12));
        for i in 0..6 {
            assert!(!g.is_page_boundary(i), "label {} is not a boundary", i);
        }
        assert!(!g.is_page_boundary(7));
    }

    #[test]
    fn first_label_is_on_the_top_row() {
        let g = grid(3, 2);
        let bottom = g.bottom_offset();

        assert_eq!(g.slot_origin(0), (10.0, bottom + 100.0));
        assert_eq!(g.slot_origin(2), (10.0 + 2.0 * 150.0, bottom + 100.0));
        assert_eq!(g.slot_origin(3), (10.0, bottom));
    }

    #[test]
    fn single_column_counts_downwards() {
        let g = grid(1, 3);
        let ys: Vec<f32> = (0..3).map(|i| g.slot_origin(i).1).collect();
        assert!(ys[0] > ys[1] && ys[1] > ys[2]);
    }

    #[test]
    fn queries_do_not_change_the_grid() {
        let g = grid(2, 2);
        let before = g.clone();
        assert_eq!(g.slot_origin(3), g.slot_origin(3));
        assert_eq!(g.is_page_boundary(4), g.is_page_boundary(4));
        assert_eq!(g, before);
    }

    #[test]
    fn default_page_is_used_when_unspecified() {
        let mut p = params(2, 2);
        p.page_size = None;
        let fallback = PageSize {
            width: 612.0,
            height: 792.0,
        };
        let g = GridGeometry::new(p, fallback).unwrap();
        assert_eq!(g.configured_page_size(), None);
        assert_eq!(g.page_size(), fallback);
        assert_eq!(g.bottom_offset(), 792.0 - 20.0 - 200.0);
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(matches!(
            GridGeometry::new(params(0, 2), PAGE),
            Err(LabelError::InvalidGrid(_))
        ));
        assert!(matches!(
            GridGeometry::new(params(2, 0), PAGE),
            Err(LabelError::InvalidGrid(_))
        ));
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        let mut p = params(2, 2);
        p.vertical_pitch = 0.0;
        assert!(GridGeometry::new(p, PAGE).is_err());

        let mut p = params(2, 2);
        p.slot_width = f32::NAN;
        assert!(GridGeometry::new(p, PAGE).is_err());

        let mut p = params(2, 2);
        p.left = -1.0;
        assert!(GridGeometry::new(p, PAGE).is_err());
    }

    #[test]
    fn zero_offsets_are_allowed() {
        let mut p = params(2, 2);
        p.left = 0.0;
        p.top = 0.0;
        let g = GridGeometry::new(p, PAGE).unwrap();
        assert_eq!(g.slot_origin(0), (0.0, 800.0 - 100.0));
    }

    #[test]
    fn measured_sheet_fits() {
        assert!(grid(3, 2).fit_problems().is_empty());
        // 7 rows leave 80 below the grid
        assert!(grid(3, 7).fit_problems().is_empty());
    }

    #[test]
    fn oversized_labels_and_grids_are_reported() {
        let mut p = params(2, 2);
        p.slot_width = 160.0;
        let problems = GridGeometry::new(p, PAGE).unwrap().fit_problems();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("overlap"), "{:?}", problems);

        // 8 rows of 100 below a 20 top margin, on an 800 high page
        let problems = grid(2, 8).fit_problems();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("taller"), "{:?}", problems);

        // 10 + 3 * 150 + 140 = 600 fits exactly, one more column does not
        assert!(grid(4, 2).fit_problems().is_empty());
        let problems = grid(5, 2).fit_problems();
        assert!(problems[0].contains("wider"), "{:?}", problems);
    }
}
