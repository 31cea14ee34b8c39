//! Bulk import of tabular files into board items.
//!
//! The first row of the file names the columns; every following row becomes
//! one item. Rows are processed strictly in order, one remote call per row.
//! A failed row is recorded and the import moves on.

use std::{convert::Infallible, path::Path, str::FromStr};

use calamine::{Data, Reader, open_workbook_auto};
use tracing::{info, warn};

use crate::{
    board::Board,
    error::{Error, ImportError},
};

/// Which worksheet of a spreadsheet to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl FromStr for SheetSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<usize>()
            .map_or_else(|_| Self::Name(s.to_string()), Self::Index))
    }
}

impl std::fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "#{i}"),
            Self::Name(name) => write!(f, "'{name}'"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Worksheet to read. Ignored for CSV input; defaults to the first sheet.
    pub sheet: Option<SheetSelector>,
    /// Column holding the item name. Defaults to the first column.
    pub name_column: Option<String>,
}

/// Header plus data rows. A `None` cell is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// A row that could not be turned into an item.
#[derive(Debug)]
pub struct RowFailure {
    /// One-based data row number.
    pub row: usize,
    pub item_name: String,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    /// Ids of the created items, in row order.
    pub created: Vec<String>,
    pub failures: Vec<RowFailure>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.created.len() + self.failures.len()
    }
}

/// Progress notification emitted after each row.
#[derive(Debug)]
pub struct RowProgress<'a> {
    pub row: usize,
    pub total: usize,
    pub item_name: &'a str,
    pub outcome: Result<&'a str, &'a Error>,
}

/// Reads `path` and imports every row into `board`.
///
/// # Errors
///
/// Returns an error only if the file cannot be read.
pub async fn import_file(
    board: &Board,
    path: &Path,
    options: &ImportOptions,
) -> Result<ImportReport, ImportError> {
    let table = read_table(path, options.sheet.as_ref())?;
    Ok(import_table(board, &table, options.name_column.as_deref(), |_| {}).await)
}

/// Creates one item per row of `table`, calling `progress` after each row.
pub async fn import_table<F>(
    board: &Board,
    table: &Table,
    name_column: Option<&str>,
    mut progress: F,
) -> ImportReport
where
    F: FnMut(RowProgress<'_>),
{
    let name_index = name_column_index(&table.headers, name_column);
    let total = table.rows.len();
    let mut report = ImportReport::default();

    info!(board = %board.name(), rows = total, "starting import");

    for (i, cells) in table.rows.iter().enumerate() {
        let row = i + 1;
        let (item_name, values) = split_row(&table.headers, cells, name_index);
        info!("creating item {row}/{total}: {item_name}");

        match board.create_item(&item_name, values).await {
            Ok(item) => {
                progress(RowProgress {
                    row,
                    total,
                    item_name: &item_name,
                    outcome: Ok(&item.id),
                });
                report.created.push(item.id);
            }
            Err(error) => {
                warn!(row, item = %item_name, "failed to create item: {error}");
                progress(RowProgress {
                    row,
                    total,
                    item_name: &item_name,
                    outcome: Err(&error),
                });
                report.failures.push(RowFailure {
                    row,
                    item_name,
                    error,
                });
            }
        }
    }

    info!(
        created = report.created.len(),
        failed = report.failures.len(),
        "import finished"
    );
    report
}

fn name_column_index(headers: &[String], name_column: Option<&str>) -> usize {
    let Some(name_column) = name_column else {
        return 0;
    };
    headers.iter().position(|h| h == name_column).unwrap_or_else(|| {
        warn!(column = name_column, "name column not found, using the first column");
        0
    })
}

/// Splits a row into the item name and the `(title, value)` pairs of every
/// other non-missing cell.
fn split_row<'a>(
    headers: &'a [String],
    cells: &'a [Option<String>],
    name_index: usize,
) -> (String, Vec<(&'a str, &'a str)>) {
    let item_name = cells
        .get(name_index)
        .and_then(Option::as_deref)
        .unwrap_or_default()
        .to_string();

    let values = headers
        .iter()
        .zip(cells)
        .enumerate()
        .filter(|(i, _)| *i != name_index)
        .filter_map(|(_, (title, cell))| Some((title.as_str(), cell.as_deref()?)))
        .collect();

    (item_name, values)
}

// ============================================================================
// READERS
// ============================================================================

/// Reads a CSV file (by `.csv` extension) or a spreadsheet.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed, the requested
/// sheet does not exist or the file has no header row.
pub fn read_table(path: &Path, sheet: Option<&SheetSelector>) -> Result<Table, ImportError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        read_csv(path)
    } else {
        read_spreadsheet(path, sheet.cloned().unwrap_or_default())
    }
}

fn read_csv(path: &Path) -> Result<Table, ImportError> {
    let csv_err = |source| ImportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .enumerate()
        .map(|(i, h)| header_name(i, h.trim_start_matches('\u{feff}')))
        .collect();
    if headers.is_empty() {
        return Err(ImportError::MissingHeader(path.to_path_buf()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let mut cells: Vec<Option<String>> = record.iter().map(non_empty).collect();
        cells.resize(headers.len(), None);
        if cells.iter().any(Option::is_some) {
            rows.push(cells);
        }
    }

    Ok(Table { headers, rows })
}

fn read_spreadsheet(path: &Path, sheet: SheetSelector) -> Result<Table, ImportError> {
    let sheet_err = |e: calamine::Error| ImportError::Spreadsheet {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut workbook = open_workbook_auto(path).map_err(sheet_err)?;
    let names = workbook.sheet_names();
    let sheet_name = match &sheet {
        SheetSelector::Index(i) => names.get(*i).cloned(),
        SheetSelector::Name(name) => names.iter().find(|n| *n == name).cloned(),
    }
    .ok_or_else(|| ImportError::SheetNotFound(sheet.to_string()))?;

    let range = workbook.worksheet_range(&sheet_name).map_err(sheet_err)?;
    let mut rows_iter = range.rows();

    let headers: Vec<String> = rows_iter
        .next()
        .ok_or_else(|| ImportError::MissingHeader(path.to_path_buf()))?
        .iter()
        .enumerate()
        .map(|(i, cell)| header_name(i, &cell_to_string(cell).unwrap_or_default()))
        .collect();

    let rows = rows_iter
        .map(|row| {
            let mut cells: Vec<Option<String>> = row.iter().map(cell_to_string).collect();
            cells.resize(headers.len(), None);
            cells
        })
        .filter(|cells| cells.iter().any(Option::is_some))
        .collect();

    Ok(Table { headers, rows })
}

fn header_name(index: usize, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("Unnamed: {index}")
    } else {
        trimmed.to_string()
    }
}

fn non_empty(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => non_empty(s),
        Data::Int(n) => Some(n.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(dt.as_datetime().map_or_else(
            || dt.as_f64().to_string(),
            |d| d.format("%Y-%m-%d %H:%M:%S").to_string(),
        )),
    }
}
