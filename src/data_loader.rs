// src/data_loader.rs

use std::collections::HashSet;
use std::path::Path;

use log::debug;

use crate::error::{AppError, Result};

/// Cell contents treated as missing, in addition to the empty string.
const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
}

/// Column-major string table as read from disk.
#[derive(Debug, Clone)]
pub struct TableData {
    pub headers: Vec<String>,
    pub columns: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(headers: Vec<String>, columns: Vec<Vec<String>>) -> Self {
        TableData { headers, columns }
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Name of the equivalent dataframe dtype.
    pub fn dtype(self) -> &'static str {
        match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Text => "object",
        }
    }

    fn infer(cells: &[String]) -> ColumnKind {
        let mut has_missing = false;
        let mut all_integer = true;
        for cell in cells {
            if is_missing(cell) {
                has_missing = true;
                continue;
            }
            let trimmed = cell.trim();
            if trimmed.parse::<i64>().is_ok() {
                continue;
            }
            if trimmed.parse::<f64>().is_ok() {
                all_integer = false;
                continue;
            }
            return ColumnKind::Text;
        }
        if all_integer && !has_missing {
            ColumnKind::Integer
        } else {
            ColumnKind::Float
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: ColumnValues,
}

impl Column {
    pub fn from_cells(name: String, cells: &[String]) -> Self {
        let kind = ColumnKind::infer(cells);
        let values = if kind.is_numeric() {
            ColumnValues::Numeric(
                cells
                    .iter()
                    .map(|c| {
                        if is_missing(c) {
                            None
                        } else {
                            c.trim().parse::<f64>().ok()
                        }
                    })
                    .collect(),
            )
        } else {
            ColumnValues::Text(
                cells
                    .iter()
                    .map(|c| if is_missing(c) { None } else { Some(c.clone()) })
                    .collect(),
            )
        };
        Column { name, kind, values }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind.is_numeric()
    }

    pub fn len(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    pub fn is_missing_at(&self, row: usize) -> bool {
        match &self.values {
            ColumnValues::Numeric(v) => v[row].is_none(),
            ColumnValues::Text(v) => v[row].is_none(),
        }
    }

    pub fn non_missing_count(&self) -> usize {
        (0..self.len()).filter(|&i| !self.is_missing_at(i)).count()
    }

    /// Present numeric values, in row order. Empty for text columns.
    pub fn numbers(&self) -> Vec<f64> {
        match &self.values {
            ColumnValues::Numeric(v) => v.iter().flatten().copied().collect(),
            ColumnValues::Text(_) => Vec::new(),
        }
    }

    pub fn number_at(&self, row: usize) -> Option<f64> {
        match &self.values {
            ColumnValues::Numeric(v) => v[row],
            ColumnValues::Text(_) => None,
        }
    }

    /// Display form of a cell, or `None` when missing.
    pub fn label_at(&self, row: usize) -> Option<String> {
        match &self.values {
            ColumnValues::Numeric(v) => v[row].map(|x| format_number(x, self.kind)),
            ColumnValues::Text(v) => v[row].clone(),
        }
    }

    pub fn display_at(&self, row: usize) -> String {
        self.label_at(row).unwrap_or_else(|| "NaN".to_string())
    }

    pub fn unique_count(&self) -> usize {
        (0..self.len())
            .filter_map(|i| self.label_at(i))
            .collect::<HashSet<_>>()
            .len()
    }
}

pub fn format_number(value: f64, kind: ColumnKind) -> String {
    match kind {
        ColumnKind::Integer => format!("{}", value as i64),
        _ if value.fract() == 0.0 && value.abs() < 1e15 => format!("{value:.1}"),
        _ => format!("{value}"),
    }
}

/// In-memory table with a type tag per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub columns: Vec<Column>,
    num_rows: usize,
}

impl Dataset {
    pub fn from_table(table: TableData) -> Self {
        let num_rows = table.num_rows();
        let columns = table
            .headers
            .into_iter()
            .zip(table.columns.iter())
            .map(|(name, cells)| Column::from_cells(name, cells))
            .collect();
        Dataset { columns, num_rows }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| AppError::ColumnNotFound(name.to_string()))
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn drop_column(&mut self, name: &str) -> Result<Column> {
        let index = self
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| AppError::ColumnNotFound(name.to_string()))?;
        Ok(self.columns.remove(index))
    }

    pub fn to_table(&self) -> TableData {
        TableData::new(
            self.column_names(),
            self.columns
                .iter()
                .map(|c| (0..c.len()).map(|row| c.display_at(row)).collect())
                .collect(),
        )
    }
}

pub trait DataLoader {
    fn load(&self, path: &Path) -> Result<TableData>;
}

pub struct CsvLoader;

impl DataLoader for CsvLoader {
    fn load(&self, path: &Path) -> Result<TableData> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if h.trim().is_empty() {
                    format!("Unnamed: {i}")
                } else {
                    h.to_string()
                }
            })
            .collect::<Vec<String>>();

        let mut columns: Vec<Vec<String>> = headers.iter().map(|_| Vec::new()).collect();

        for result in reader.records() {
            let record = result?;
            for (i, field) in record.iter().enumerate() {
                columns[i].push(field.to_string());
            }
        }

        debug!(
            "Read {} rows x {} columns from {}",
            columns.first().map_or(0, Vec::len),
            headers.len(),
            path.display()
        );
        Ok(TableData::new(headers, columns))
    }
}

pub fn get_loader(extension: &str) -> Result<Box<dyn DataLoader>> {
    match extension.to_lowercase().as_str() {
        "csv" => Ok(Box::new(CsvLoader)),

        _ => Err(AppError::UnsupportedFormat(extension.to_string())),
    }
}

pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub(crate) const CARS_CSV: &str = "\
,Name,Brand,Price,Kilometers_Driven,Fuel_Type,Transmission,Owner_Type,Colour,Seats
0,Maruti Swift,Maruti,4.5,72000,Petrol,Manual,First,White,5
1,Hyundai Creta,Hyundai,12.5,41000,Diesel,Manual,First,Black,5
2,Honda City,Honda,9.0,46000,Petrol,Automatic,Second,Silver,5
3,Maruti Ertiga,Maruti,6.0,87000,CNG,Manual,First,White,7
4,Toyota Innova,Toyota,17.7,120000,Diesel,Automatic,Third,Grey,
5,Hyundai i20,Hyundai,5.2,36000,Petrol,Manual,First,Red,5
";

    pub(crate) fn csv_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("create temp csv");
        file.write_all(content.as_bytes()).expect("write temp csv");
        file
    }

    pub(crate) fn cars() -> Dataset {
        let file = csv_file(CARS_CSV);
        let mut dataset = Dataset::from_table(CsvLoader.load(file.path()).unwrap());
        dataset.drop_column("Unnamed: 0").unwrap();
        dataset
    }

    #[test]
    fn test_blank_header_is_named_like_an_index() {
        let file = csv_file(CARS_CSV);
        let table = CsvLoader.load(file.path()).unwrap();
        assert_eq!(table.headers[0], "Unnamed: 0");
        assert_eq!(table.num_rows(), 6);
    }

    #[test]
    fn test_drop_index_column() {
        let dataset = cars();
        assert_eq!(dataset.num_columns(), 9);
        assert!(dataset.column("Unnamed: 0").is_err());
        assert_eq!(dataset.column_names()[0], "Name");
    }

    #[test]
    fn test_type_tags_resolved_at_load() {
        let dataset = cars();
        assert_eq!(dataset.column("Kilometers_Driven").unwrap().kind, ColumnKind::Integer);
        assert_eq!(dataset.column("Price").unwrap().kind, ColumnKind::Float);
        // integer column with a gap widens to float
        assert_eq!(dataset.column("Seats").unwrap().kind, ColumnKind::Float);
        assert_eq!(dataset.column("Brand").unwrap().kind, ColumnKind::Text);
        assert_eq!(
            dataset.numeric_column_names(),
            vec!["Price", "Kilometers_Driven", "Seats"]
        );
    }

    #[test]
    fn test_all_missing_column_is_float() {
        let column = Column::from_cells("Empty".into(), &["".into(), "NaN".into()]);
        assert_eq!(column.kind, ColumnKind::Float);
        assert_eq!(column.non_missing_count(), 0);
        assert!(column.numbers().is_empty());
    }

    #[test]
    fn test_missing_tokens_in_text_column() {
        let column = Column::from_cells(
            "Colour".into(),
            &["Red".into(), "NA".into(), "".into(), "Blue".into()],
        );
        assert_eq!(column.kind, ColumnKind::Text);
        assert_eq!(column.non_missing_count(), 2);
        assert_eq!(column.display_at(1), "NaN");
        assert_eq!(column.unique_count(), 2);
    }

    #[test]
    fn test_get_loader_rejects_unknown_format() {
        assert!(get_loader("CSV").is_ok());
        let err = get_loader("parquet").err().unwrap();
        assert!(matches!(err, AppError::UnsupportedFormat(ext) if ext == "parquet"));
    }

    #[test]
    fn test_ragged_rows_are_a_csv_error() {
        let file = csv_file("a,b\n1,2\n3\n");
        assert!(matches!(CsvLoader.load(file.path()), Err(AppError::Csv(_))));
    }

    #[test]
    fn test_display_formats() {
        let dataset = cars();
        assert_eq!(dataset.column("Kilometers_Driven").unwrap().display_at(0), "72000");
        assert_eq!(dataset.column("Price").unwrap().display_at(2), "9.0");
        assert_eq!(dataset.column("Seats").unwrap().display_at(4), "NaN");
    }
}
