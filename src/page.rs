//! Physical units and named page sizes.
//!
//! Everything downstream of configuration works in PDF points (1/72 inch),
//! with the origin at the bottom-left corner of the page.

use crate::error::{LabelError, Result};

/// Points per millimetre (1 inch = 72 points = 25.4 mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert millimetres to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimetres
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn from_mm(width: f32, height: f32) -> Self {
        Self {
            width: mm_to_pt(width),
            height: mm_to_pt(height),
        }
    }

    pub fn from_inches(width: f32, height: f32) -> Self {
        Self {
            width: width * POINTS_PER_INCH,
            height: height * POINTS_PER_INCH,
        }
    }
}

// ============================================================================
// Page Size Table
// ============================================================================

/// ISO 216 / 269 sizes, width x height in millimetres
const ISO_SIZES_MM: &[(&str, f32, f32)] = &[
    ("A0", 841.0, 1189.0),
    ("A1", 594.0, 841.0),
    ("A2", 420.0, 594.0),
    ("A3", 297.0, 420.0),
    ("A4", 210.0, 297.0),
    ("A5", 148.0, 210.0),
    ("A6", 105.0, 148.0),
    ("A7", 74.0, 105.0),
    ("A8", 52.0, 74.0),
    ("A9", 37.0, 52.0),
    ("A10", 26.0, 37.0),
    ("B0", 1000.0, 1414.0),
    ("B1", 707.0, 1000.0),
    ("B2", 500.0, 707.0),
    ("B3", 353.0, 500.0),
    ("B4", 250.0, 353.0),
    ("B5", 176.0, 250.0),
    ("B6", 125.0, 176.0),
    ("B7", 88.0, 125.0),
    ("B8", 62.0, 88.0),
    ("B9", 44.0, 62.0),
    ("B10", 31.0, 44.0),
    ("C0", 917.0, 1297.0),
    ("C1", 648.0, 917.0),
    ("C2", 458.0, 648.0),
    ("C3", 324.0, 458.0),
    ("C4", 229.0, 324.0),
    ("C5", 162.0, 229.0),
    ("C6", 114.0, 162.0),
    ("C7", 81.0, 114.0),
    ("C8", 57.0, 81.0),
    ("C9", 40.0, 57.0),
    ("C10", 28.0, 40.0),
];

/// North American sizes, width x height in inches
const INCH_SIZES: &[(&str, f32, f32)] = &[
    ("LETTER", 8.5, 11.0),
    ("LEGAL", 8.5, 14.0),
    ("ELEVENSEVENTEEN", 11.0, 17.0),
    ("TABLOID", 11.0, 17.0),
    ("LEDGER", 17.0, 11.0),
    ("JUNIOR_LEGAL", 5.0, 8.0),
    ("HALF_LETTER", 5.5, 8.5),
    ("GOV_LETTER", 8.0, 10.5),
    ("GOV_LEGAL", 8.5, 13.0),
];

/// Look up a page size by name, ignoring case.
pub fn find_page_size(name: &str) -> Result<PageSize> {
    let wanted = name.trim();

    if let Some(&(_, w, h)) = ISO_SIZES_MM
        .iter()
        .find(|(n, _, _)| n.eq_ignore_ascii_case(wanted))
    {
        return Ok(PageSize::from_mm(w, h));
    }

    INCH_SIZES
        .iter()
        .find(|(n, _, _)| n.eq_ignore_ascii_case(wanted))
        .map(|&(_, w, h)| PageSize::from_inches(w, h))
        .ok_or_else(|| LabelError::UnknownPageSize(wanted.to_string()))
}

/// Like [`find_page_size`], but an empty name means "not specified".
pub fn optional_page_size(name: &str) -> Result<Option<PageSize>> {
    if name.trim().is_empty() {
        Ok(None)
    } else {
        find_page_size(name).map(Some)
    }
}
