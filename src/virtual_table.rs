// src/virtual_table.rs

use std::cmp::Ordering;

use crate::data_loader::{Dataset, TableData};

fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(a_num), Ok(b_num)) => a_num.partial_cmp(&b_num).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// Display strings of a table, as browsed on the Data Overview page.
pub struct VirtualTable {
    pub data: TableData,
}

impl VirtualTable {
    pub fn new(data: TableData) -> Self {
        VirtualTable { data }
    }

    pub fn from_dataset(dataset: &Dataset) -> Self {
        VirtualTable::new(dataset.to_table())
    }

    pub fn num_rows(&self) -> usize {
        self.data.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.data.headers.len()
    }

    pub fn content_width(&self, col_idx: usize) -> u16 {
        let widest = self.data.columns[col_idx]
            .iter()
            .chain(std::iter::once(&self.data.headers[col_idx]))
            .map(|cell| cell.chars().count() as u16)
            .max()
            .unwrap_or(10);
        widest + 2
    }

    pub fn sort_by_column(&mut self, col_idx: usize, ascending: bool) {
        if col_idx >= self.num_columns() {
            return;
        }
        let mut indices: Vec<usize> = (0..self.num_rows()).collect();

        indices.sort_by(|&i, &j| {
            let a = &self.data.columns[col_idx][i];
            let b = &self.data.columns[col_idx][j];
            let ord = compare_cells(a, b);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });

        for col in self.data.columns.iter_mut() {
            let reordered_col: Vec<String> = indices.iter().map(|&i| col[i].clone()).collect();
            *col = reordered_col;
        }
    }

    /// Field/Value view of one row.
    pub fn row_detail(&self, row: usize) -> Option<VirtualTable> {
        if row >= self.num_rows() {
            return None;
        }
        let field_column = self.data.headers.clone();
        let value_column: Vec<String> = self
            .data
            .columns
            .iter()
            .map(|col| col[row].clone())
            .collect();

        Some(VirtualTable::new(TableData::new(
            vec!["Field".to_string(), "Value".to_string()],
            vec![field_column, value_column],
        )))
    }
}
