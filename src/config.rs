//! Label-type and field definition files.
//!
//! Both are CSV files with a header row. Dimensions in the label-type file
//! are millimetres; field positions and font sizes are fractions of one
//! label.

use crate::error::{LabelError, Result};
use crate::field::{FieldParams, FieldSpec};
use crate::geometry::{GridGeometry, GridParams};
use crate::page::{mm_to_pt, optional_page_size, PageSize};
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{error, info};

// ============================================================================
// Columns
// ============================================================================

pub const LABEL_COLUMNS: [&str; 10] = [
    "Name",
    "Page size",
    "Left",
    "Horizontal Pitch",
    "Width",
    "Columns",
    "Top",
    "Vertical Pitch",
    "Height",
    "Rows",
];

/// Older label files spell the vertical pitch column this way
const LEGACY_VERTICAL_PITCH: &str = "Vertial Pitch";

pub const FIELD_COLUMNS: [&str; 9] = [
    "X",
    "Y",
    "Width",
    "Height",
    "Font family",
    "Font size",
    "Colour",
    "Layout",
    "Format",
];

#[derive(Debug, Deserialize)]
struct LabelTypeRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Page size")]
    page_size: String,
    #[serde(rename = "Left")]
    left: f32,
    #[serde(rename = "Horizontal Pitch")]
    horizontal_pitch: f32,
    #[serde(rename = "Width")]
    width: f32,
    #[serde(rename = "Columns")]
    columns: usize,
    #[serde(rename = "Top")]
    top: f32,
    #[serde(rename = "Vertical Pitch", alias = "Vertial Pitch")]
    vertical_pitch: f32,
    #[serde(rename = "Height")]
    height: f32,
    #[serde(rename = "Rows")]
    rows: usize,
}

impl LabelTypeRow {
    fn into_label_type(self, default_page: PageSize) -> Result<LabelType> {
        let params = GridParams {
            page_size: optional_page_size(&self.page_size)?,
            left: mm_to_pt(self.left),
            top: mm_to_pt(self.top),
            horizontal_pitch: mm_to_pt(self.horizontal_pitch),
            vertical_pitch: mm_to_pt(self.vertical_pitch),
            slot_width: mm_to_pt(self.width),
            slot_height: mm_to_pt(self.height),
            columns: self.columns,
            rows: self.rows,
        };
        Ok(LabelType {
            name: self.name,
            geometry: GridGeometry::new(params, default_page)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct FieldRow {
    #[serde(rename = "X")]
    x: f32,
    #[serde(rename = "Y")]
    y: f32,
    #[serde(rename = "Width")]
    width: f32,
    #[serde(rename = "Height")]
    height: f32,
    #[serde(rename = "Font family")]
    font_family: String,
    #[serde(rename = "Font size")]
    font_size: Option<f32>,
    #[serde(rename = "Colour")]
    colour: String,
    #[serde(rename = "Layout")]
    layout: String,
    #[serde(rename = "Format")]
    format: String,
}

impl From<FieldRow> for FieldParams {
    fn from(row: FieldRow) -> Self {
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
        FieldParams {
            x: row.x,
            y: row.y,
            width: row.width,
            height: row.height,
            font_family: non_empty(row.font_family),
            font_size: row.font_size,
            colour: non_empty(row.colour),
            layout: non_empty(row.layout),
            format: row.format,
        }
    }
}

// ============================================================================
// Reading
// ============================================================================

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Report every required column missing from `headers`.
fn check_header(source: &str, kind: &str, headers: &csv::StringRecord, required: &[&str]) -> Result<()> {
    let has = |column: &str| {
        headers.iter().any(|h| h == column)
            || (column == "Vertical Pitch" && headers.iter().any(|h| h == LEGACY_VERTICAL_PITCH))
    };

    let missing: Vec<String> = required
        .iter()
        .filter(|column| !has(**column))
        .map(|column| column.to_string())
        .collect();

    for column in &missing {
        error!("{} file must have a '{}' column", kind, column);
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LabelError::MissingColumns {
            file: source.to_string(),
            columns: missing,
        })
    }
}

fn row_error(source: &str, line: u64, err: impl std::fmt::Display) -> LabelError {
    LabelError::ConfigError {
        file: source.to_string(),
        line,
        message: err.to_string(),
    }
}

/// Rows of a label-type file, each with its CSV line number.
fn rows<R, T>(reader: &mut csv::Reader<R>, source: &str) -> Result<Vec<(u64, T)>>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row = record
            .deserialize(Some(&headers))
            .map_err(|e| row_error(source, line, e))?;
        rows.push((line, row));
    }
    Ok(rows)
}

/// One named sheet layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelType {
    pub name: String,
    pub geometry: GridGeometry,
}

/// All label types from one file, in file order.
#[derive(Debug, Clone, Default)]
pub struct LabelTypes {
    types: Vec<LabelType>,
}

impl LabelTypes {
    /// Find a label type by name; `None` picks the first in the file.
    pub fn get(&self, name: Option<&str>) -> Result<&LabelType> {
        match name {
            Some(name) => self.types.iter().find(|t| t.name == name).ok_or_else(|| {
                error!(
                    "Label type '{}' not known, choose one of: {}",
                    name,
                    self.names().collect::<Vec<_>>().join(", ")
                );
                LabelError::UnknownLabelType(name.to_string())
            }),
            None => self
                .types
                .first()
                .ok_or_else(|| LabelError::UnknownLabelType("(first in file)".to_string())),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

pub fn parse_label_types<R: Read>(reader: R, source: &str, default_page: PageSize) -> Result<LabelTypes> {
    let mut reader = csv_reader(reader);
    check_header(source, "Label", reader.headers()?, &LABEL_COLUMNS)?;

    let types = rows::<_, LabelTypeRow>(&mut reader, source)?
        .into_iter()
        .map(|(line, row)| {
            row.into_label_type(default_page)
                .map_err(|e| row_error(source, line, e))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LabelTypes { types })
}

pub fn read_label_types(path: impl AsRef<Path>, default_page: PageSize) -> Result<LabelTypes> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let types = parse_label_types(File::open(path)?, &source, default_page)?;
    info!("read {} label type(s) from {}", types.len(), source);
    Ok(types)
}

/// Fields in file order; later fields draw over earlier ones.
pub fn parse_fields<R: Read>(reader: R, source: &str, geometry: &GridGeometry) -> Result<Vec<FieldSpec>> {
    let mut reader = csv_reader(reader);
    check_header(source, "Field", reader.headers()?, &FIELD_COLUMNS)?;

    rows::<_, FieldRow>(&mut reader, source)?
        .into_iter()
        .map(|(line, row)| {
            FieldSpec::new(row.into(), geometry).map_err(|e| row_error(source, line, e))
        })
        .collect()
}

pub fn read_fields(path: impl AsRef<Path>, geometry: &GridGeometry) -> Result<Vec<FieldSpec>> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let fields = parse_fields(File::open(path)?, &source, geometry)?;
    info!("read {} field(s) from {}", fields.len(), source);
    Ok(fields)
}

// ============================================================================
// Template Files
// ============================================================================

/// Write a header-only CSV file. An existing file is left untouched.
fn create_file(path: &Path, kind: &str, columns: &[&str]) -> Result<()> {
    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            error!("{} file '{}' exists, not overwriting", kind, path.display());
            return Err(LabelError::FileExists(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(columns)?;
    writer.flush()?;
    info!("created {} file {}", kind.to_lowercase(), path.display());
    Ok(())
}

pub fn create_label_file(path: impl AsRef<Path>) -> Result<()> {
    create_file(path.as_ref(), "Label", &LABEL_COLUMNS)
}

pub fn create_field_file(path: impl AsRef<Path>) -> Result<()> {
    create_file(path.as_ref(), "Field", &FIELD_COLUMNS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::find_page_size;
    use crate::style::{Alignment, Font};
    use std::fs;

    const LABELS: &str = "\
Name,Page size,Left,Horizontal Pitch,Width,Columns,Top,Vertical Pitch,Height,Rows
L7163,A4,4.65,101.6,99.1,2,15.15,38.1,38.1,7
Letter 3x10,LETTER,4.8,69.9,66.7,3,12.7,25.4,25.4,10
Plain,,10,100,95,2,10,50,45,5
";

    fn a4() -> PageSize {
        find_page_size("A4").unwrap()
    }

    #[test]
    fn label_types_are_read_in_millimetres() {
        let types = parse_label_types(LABELS.as_bytes(), "labels.csv", a4()).unwrap();
        assert_eq!(types.names().collect::<Vec<_>>(), vec!["L7163", "Letter 3x10", "Plain"]);

        let l7163 = &types.get(Some("L7163")).unwrap().geometry;
        assert_eq!(l7163.columns(), 2);
        assert_eq!(l7163.rows(), 7);
        assert!((l7163.slot_width() - mm_to_pt(99.1)).abs() < 1e-3);
        assert_eq!(l7163.configured_page_size(), Some(a4()));
    }

    #[test]
    fn first_type_is_the_default() {
        let types = parse_label_types(LABELS.as_bytes(), "labels.csv", a4()).unwrap();
        assert_eq!(types.get(None).unwrap().name, "L7163");
    }

    #[test]
    fn blank_page_size_uses_the_default() {
        let letter = find_page_size("LETTER").unwrap();
        let types = parse_label_types(LABELS.as_bytes(), "labels.csv", letter).unwrap();
        let plain = &types.get(Some("Plain")).unwrap().geometry;
        assert_eq!(plain.configured_page_size(), None);
        assert_eq!(plain.page_size(), letter);
    }

    #[test]
    fn unknown_label_type_is_a_lookup_error() {
        let types = parse_label_types(LABELS.as_bytes(), "labels.csv", a4()).unwrap();
        assert!(matches!(
            types.get(Some("L7160")),
            Err(LabelError::UnknownLabelType(name)) if name == "L7160"
        ));

        let empty = parse_label_types(&LABELS.as_bytes()[..LABELS.find('\n').unwrap() + 1], "x", a4()).unwrap();
        assert!(empty.is_empty());
        assert!(empty.get(None).is_err());
    }

    #[test]
    fn legacy_vertical_pitch_header_is_accepted() {
        let data = LABELS.replace("Vertical Pitch", "Vertial Pitch");
        let types = parse_label_types(data.as_bytes(), "labels.csv", a4()).unwrap();
        assert_eq!(types.len(), 3);
    }

    #[test]
    fn every_missing_column_is_reported() {
        let data = "Name,Page size,Left,Width,Columns,Top,Height\nx,A4,1,1,1,1,1\n";
        match parse_label_types(data.as_bytes(), "labels.csv", a4()) {
            Err(LabelError::MissingColumns { file, columns }) => {
                assert_eq!(file, "labels.csv");
                assert_eq!(columns, vec!["Horizontal Pitch", "Vertical Pitch", "Rows"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn malformed_cells_report_the_line() {
        let data = LABELS.replace("101.6", "wide");
        match parse_label_types(data.as_bytes(), "labels.csv", a4()) {
            Err(LabelError::ConfigError { file, line, .. }) => {
                assert_eq!(file, "labels.csv");
                assert_eq!(line, 2);
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }

        let data = LABELS.replace("LETTER", "FOOLSCAP");
        match parse_label_types(data.as_bytes(), "labels.csv", a4()) {
            Err(LabelError::ConfigError { line, message, .. }) => {
                assert_eq!(line, 3);
                assert!(message.contains("FOOLSCAP"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn fields_are_read_in_order_with_styles() {
        let types = parse_label_types(LABELS.as_bytes(), "labels.csv", a4()).unwrap();
        let geometry = &types.get(None).unwrap().geometry;
        let data = "\
X,Y,Width,Height,Font family,Font size,Colour,Layout,Format
0,0.6,1,0.4,Helvetica-Bold,0.2,darkred,c,%(Beer)s
0,0,1,0.6,,,,,\"%(ABV)s%% - cask %(Cask)s\"
";
        let fields = parse_fields(data.as_bytes(), "fields.csv", geometry).unwrap();
        assert_eq!(fields.len(), 2);

        assert_eq!(fields[0].style().font, Font::HelveticaBold);
        assert_eq!(fields[0].style().alignment, Alignment::Center);
        assert!((fields[0].style().font_size - 0.2 * geometry.slot_height()).abs() < 1e-3);
        assert_eq!(fields[1].template().source(), "%(ABV)s%% - cask %(Cask)s");
        assert_eq!(fields[1].style().font, Font::Helvetica);
    }

    #[test]
    fn bad_field_rows_report_the_line() {
        let types = parse_label_types(LABELS.as_bytes(), "labels.csv", a4()).unwrap();
        let geometry = &types.get(None).unwrap().geometry;
        let data = "\
X,Y,Width,Height,Font family,Font size,Colour,Layout,Format
0,0,1,1,,,,,ok
0,0,1,1,Wingdings,,,,bad
";
        match parse_fields(data.as_bytes(), "fields.csv", geometry) {
            Err(LabelError::ConfigError { line, message, .. }) => {
                assert_eq!(line, 3);
                assert!(message.contains("Wingdings"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }

        let missing = "X,Y,Width,Height,Format\n0,0,1,1,x\n";
        assert!(matches!(
            parse_fields(missing.as_bytes(), "fields.csv", geometry),
            Err(LabelError::MissingColumns { .. })
        ));
    }

    #[test]
    fn template_files_hold_only_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let labels = dir.path().join("labeltypes.csv");
        let fields = dir.path().join("labelfields.csv");

        create_label_file(&labels).unwrap();
        create_field_file(&fields).unwrap();

        assert_eq!(
            fs::read_to_string(&labels).unwrap(),
            format!("{}\n", LABEL_COLUMNS.join(","))
        );
        assert_eq!(
            fs::read_to_string(&fields).unwrap(),
            format!("{}\n", FIELD_COLUMNS.join(","))
        );

        // and read back as an empty set of label types
        assert!(read_label_types(&labels, a4()).unwrap().is_empty());
    }

    #[test]
    fn template_files_are_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labeltypes.csv");
        fs::write(&path, LABELS).unwrap();

        assert!(matches!(create_label_file(&path), Err(LabelError::FileExists(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), LABELS);
    }
}
