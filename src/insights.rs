// src/insights.rs

use std::collections::{HashMap, HashSet};

use crate::config::Config;
use crate::data_loader::{Column, ColumnValues, Dataset};
use crate::error::Result;
use crate::stats::{self, Describe};

const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

/// Compact human form of a number: two decimals, trailing zeros dropped,
/// thousands folded into a suffix.
pub fn numerize(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    let index = if magnitude < 1000.0 {
        0
    } else {
        ((magnitude.log10() / 3.0).floor() as usize).min(SUFFIXES.len() - 1)
    };
    let scaled = magnitude / 1000f64.powi(index as i32);
    format!(
        "{sign}{}{}",
        drop_zero(&format!("{scaled:.decimals$}")),
        SUFFIXES[index]
    )
}

fn drop_zero(number: &str) -> String {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        number.to_string()
    }
}

/// `1234567` -> `1,234,567`
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewMetrics {
    pub total_cars: String,
    pub average_price: String,
    pub unique_brands: usize,
}

pub fn overview_metrics(dataset: &Dataset, config: &Config) -> Result<OverviewMetrics> {
    let names = dataset.column(&config.name_column)?;
    let prices = dataset.column(&config.price_column)?;
    let brands = dataset.column(&config.brand_column)?;

    // a missing brand counts as one more distinct value
    let has_missing_brand = brands.non_missing_count() < brands.len();
    Ok(OverviewMetrics {
        total_cars: thousands(names.non_missing_count()),
        average_price: numerize(stats::mean(&prices.numbers()).unwrap_or(f64::NAN), 2),
        unique_brands: brands.unique_count() + usize::from(has_missing_brand),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub dtype: &'static str,
    pub unique: usize,
    pub example: String,
}

impl ColumnInfo {
    fn of(column: &Column) -> Self {
        let example = (0..column.len())
            .find_map(|row| column.label_at(row))
            .unwrap_or_else(|| "N/A".to_string());
        ColumnInfo {
            name: column.name.clone(),
            non_null: column.non_missing_count(),
            dtype: column.kind.dtype(),
            unique: column.unique_count(),
            example,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueCountSection {
    pub column: String,
    pub counts: std::result::Result<(usize, Vec<(String, usize)>), String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsightsReport {
    pub columns: Vec<ColumnInfo>,
    pub total_entries: usize,
    pub total_columns: usize,
    pub memory_mb: f64,
    pub summary: Vec<Describe>,
    pub null_counts: Vec<(String, usize)>,
    pub value_counts: Vec<ValueCountSection>,
    pub top_driven: std::result::Result<Vec<(String, String)>, String>,
    pub price_by_brand: std::result::Result<Vec<(String, f64)>, String>,
}

/// Approximate in-memory footprint of the table as a dataframe would
/// report it: eight bytes per numeric cell, boxed strings for text.
pub fn estimated_memory_bytes(dataset: &Dataset) -> usize {
    let index = 128;
    let cells: usize = dataset
        .columns
        .iter()
        .map(|column| match &column.values {
            ColumnValues::Numeric(v) => 8 * v.len(),
            ColumnValues::Text(v) => v
                .iter()
                .map(|cell| 8 + cell.as_ref().map_or(24, |s| 49 + s.len()))
                .sum(),
        })
        .sum();
    index + cells
}

pub fn build_report(dataset: &Dataset, config: &Config) -> InsightsReport {
    InsightsReport {
        columns: dataset.columns.iter().map(ColumnInfo::of).collect(),
        total_entries: dataset.num_rows(),
        total_columns: dataset.num_columns(),
        memory_mb: estimated_memory_bytes(dataset) as f64 / (1024.0 * 1024.0),
        summary: dataset.columns.iter().filter_map(stats::describe).collect(),
        null_counts: dataset
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.len() - c.non_missing_count()))
            .collect(),
        value_counts: config
            .value_count_columns
            .iter()
            .map(|name| ValueCountSection {
                column: name.clone(),
                counts: dataset
                    .column(name)
                    .map(|c| (c.unique_count(), stats::value_counts(c)))
                    .map_err(|e| e.to_string()),
            })
            .collect(),
        top_driven: top_driven(dataset, config).map_err(|e| e.to_string()),
        price_by_brand: price_by_brand(dataset, config).map_err(|e| e.to_string()),
    }
}

fn top_driven(dataset: &Dataset, config: &Config) -> Result<Vec<(String, String)>> {
    let names = dataset.column(&config.name_column)?;
    let mileage = dataset.column(&config.mileage_column)?;
    let mut rows: Vec<usize> = (0..dataset.num_rows()).collect();
    // missing mileage sorts last
    rows.sort_by(|&a, &b| {
        match (mileage.number_at(a), mileage.number_at(b)) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
    Ok(rows
        .into_iter()
        .take(config.top_driven)
        .map(|row| (names.display_at(row), mileage.display_at(row)))
        .collect())
}

fn price_by_brand(dataset: &Dataset, config: &Config) -> Result<Vec<(String, f64)>> {
    let brands = dataset.column(&config.brand_column)?;
    let prices = dataset.column(&config.price_column)?;
    let mut order: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
    for row in 0..dataset.num_rows() {
        let Some(brand) = brands.label_at(row) else {
            continue;
        };
        if seen.insert(brand.clone()) {
            order.push(brand.clone());
        }
        if let Some(price) = prices.number_at(row) {
            let entry = sums.entry(brand).or_insert((0.0, 0));
            entry.0 += price;
            entry.1 += 1;
        }
    }
    let mut means: Vec<(String, f64)> = order
        .into_iter()
        .map(|brand| {
            let mean = sums
                .get(&brand)
                .map_or(f64::NAN, |(sum, n)| sum / *n as f64);
            (brand, mean)
        })
        .collect();
    // descending, NaN last
    means.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
        (false, false) => b.1.total_cmp(&a.1),
        (x, y) => x.cmp(&y),
    });
    Ok(means)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::tests::cars;
    use crate::error::AppError;

    #[test]
    fn test_numerize() {
        assert_eq!(numerize(9.15, 2), "9.15");
        assert_eq!(numerize(9.5, 2), "9.5");
        assert_eq!(numerize(12.0, 2), "12");
        assert_eq!(numerize(1234.5, 2), "1.23K");
        assert_eq!(numerize(2_500_000.0, 2), "2.5M");
        assert_eq!(numerize(-4200.0, 2), "-4.2K");
        assert_eq!(numerize(f64::NAN, 2), "N/A");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(7253), "7,253");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_overview_metrics() {
        let metrics = overview_metrics(&cars(), &Config::default()).unwrap();
        assert_eq!(metrics.total_cars, "6");
        assert_eq!(metrics.average_price, "9.15");
        assert_eq!(metrics.unique_brands, 4);
    }

    #[test]
    fn test_overview_metrics_missing_column() {
        let config = Config {
            price_column: "Cost".into(),
            ..Config::default()
        };
        assert!(matches!(
            overview_metrics(&cars(), &config),
            Err(AppError::ColumnNotFound(c)) if c == "Cost"
        ));
    }

    #[test]
    fn test_report_sections() {
        let report = build_report(&cars(), &Config::default());
        assert_eq!(report.total_entries, 6);
        assert_eq!(report.total_columns, 9);
        assert_eq!(report.summary.len(), 3);

        let seats = report.columns.iter().find(|c| c.name == "Seats").unwrap();
        assert_eq!(seats.dtype, "float64");
        assert_eq!(seats.non_null, 5);
        assert_eq!(seats.example, "5.0");

        assert!(report.null_counts.contains(&("Seats".to_string(), 1)));
        assert!(report.memory_mb > 0.0);

        let top = report.top_driven.unwrap();
        assert_eq!(top.len(), 5);
        assert_eq!(top[0], ("Toyota Innova".to_string(), "120000".to_string()));

        let brands = report.price_by_brand.unwrap();
        assert_eq!(brands[0].0, "Toyota");
        assert_eq!(brands.last().unwrap().0, "Maruti");
    }

    #[test]
    fn test_report_tolerates_missing_columns() {
        let config = Config {
            value_count_columns: vec!["Fuel_Type".into(), "Location".into()],
            mileage_column: "Odometer".into(),
            ..Config::default()
        };
        let report = build_report(&cars(), &config);
        assert!(report.value_counts[0].counts.is_ok());
        assert_eq!(
            report.value_counts[1].counts,
            Err("Column not found: Location".to_string())
        );
        assert!(report.top_driven.is_err());
    }
}
