// src/stats.rs

use std::collections::HashMap;

use crate::data_loader::{format_number, Column, ColumnValues};

/// Upper bound on histogram bins; a terminal cannot show more.
pub const MAX_BINS: usize = 60;
const KDE_POINTS: usize = 128;
const WHISKER_IQR: f64 = 1.5;

pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (one degree of freedom removed).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Linear-interpolated quantile of already sorted data.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summary statistics of a numeric column, `None` for text columns.
/// Statistics that cannot be computed are NaN.
pub fn describe(column: &Column) -> Option<Describe> {
    if !column.is_numeric() {
        return None;
    }
    let values = sorted(&column.numbers());
    let q = |p| quantile(&values, p).unwrap_or(f64::NAN);
    Some(Describe {
        column: column.name.clone(),
        count: values.len(),
        mean: mean(&values).unwrap_or(f64::NAN),
        std: std_dev(&values).unwrap_or(f64::NAN),
        min: q(0.0),
        q25: q(0.25),
        median: q(0.5),
        q75: q(0.75),
        max: q(1.0),
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl HistBin {
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Equal-width histogram. The bin width is the smaller of the Sturges and
/// Freedman-Diaconis estimates, falling back to Sturges when the IQR is zero.
pub fn histogram(values: &[f64]) -> Vec<HistBin> {
    if values.is_empty() {
        return Vec::new();
    }
    let data = sorted(values);
    let n = data.len() as f64;
    let (min, max) = (data[0], data[data.len() - 1]);
    let range = max - min;
    if range == 0.0 {
        return vec![HistBin {
            lower: min - 0.5,
            upper: max + 0.5,
            count: data.len(),
        }];
    }

    let sturges = range / (n.log2() + 1.0);
    let iqr = quantile(&data, 0.75).unwrap_or(0.0) - quantile(&data, 0.25).unwrap_or(0.0);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let bin_width = if fd > 0.0 { fd.min(sturges) } else { sturges };
    let bins = ((range / bin_width).ceil() as usize).clamp(1, MAX_BINS);
    let width = range / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in &data {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count,
        })
        .collect()
}

/// Gaussian kernel density estimate on the data range, scaled so the curve
/// sits on a histogram with bins of `bin_width`. Empty when the data has
/// fewer than two values or no spread.
pub fn kde(values: &[f64], bin_width: f64) -> Vec<(f64, f64)> {
    let sd = match std_dev(values) {
        Some(sd) if sd > 0.0 => sd,
        _ => return Vec::new(),
    };
    let n = values.len() as f64;
    let bandwidth = sd * n.powf(-0.2);
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let norm = n * bandwidth * (2.0 * std::f64::consts::PI).sqrt();
    let step = (max - min) / (KDE_POINTS - 1) as f64;

    (0..KDE_POINTS)
        .map(|i| {
            let x = min + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                / norm;
            (x, density * n * bin_width)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let data = sorted(values);
    let q1 = quantile(&data, 0.25)?;
    let median = quantile(&data, 0.5)?;
    let q3 = quantile(&data, 0.75)?;
    let iqr = q3 - q1;
    let low_fence = q1 - WHISKER_IQR * iqr;
    let high_fence = q3 + WHISKER_IQR * iqr;

    let whisker_low = data
        .iter()
        .copied()
        .find(|&v| v >= low_fence)
        .map_or(q1, |v| v.min(q1));
    let whisker_high = data
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= high_fence)
        .map_or(q3, |v| v.max(q3));
    let outliers = data
        .iter()
        .copied()
        .filter(|&v| v < low_fence || v > high_fence)
        .collect();

    Some(BoxStats {
        count: data.len(),
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        outliers,
    })
}

/// Occurrences of each distinct present value, most frequent first.
/// Equal counts keep first-seen order.
pub fn value_counts(column: &Column) -> Vec<(String, usize)> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in 0..column.len() {
        if let Some(label) = column.label_at(row) {
            match index.get(&label) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(label.clone(), order.len());
                    order.push((label, 1));
                }
            }
        }
    }
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
}

/// Distinct levels of a column used for grouping: sorted values for numeric
/// columns, first-seen order for text.
pub fn categorical_order(column: &Column) -> Vec<String> {
    match &column.values {
        ColumnValues::Numeric(_) => {
            let mut values = sorted(&column.numbers());
            values.dedup();
            values
                .into_iter()
                .map(|v| format_number(v, column.kind))
                .collect()
        }
        ColumnValues::Text(cells) => {
            let mut seen = Vec::new();
            for cell in cells.iter().flatten() {
                if !seen.contains(cell) {
                    seen.push(cell.clone());
                }
            }
            seen
        }
    }
}

/// Pearson correlation over rows where both values are present.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx).powi(2);
        syy += (y - my).powi(2);
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

fn numeric_cells(column: &Column) -> &[Option<f64>] {
    match &column.values {
        ColumnValues::Numeric(v) => v,
        ColumnValues::Text(_) => &[],
    }
}

/// Symmetric matrix of pairwise correlations between numeric columns.
pub fn correlation_matrix(columns: &[&Column]) -> Vec<Vec<f64>> {
    let k = columns.len();
    let mut matrix = vec![vec![f64::NAN; k]; k];
    for i in 0..k {
        let xs = numeric_cells(columns[i]);
        matrix[i][i] = match std_dev(&columns[i].numbers()) {
            Some(sd) if sd > 0.0 => 1.0,
            _ => f64::NAN,
        };
        for j in (i + 1)..k {
            let r = pearson(xs, numeric_cells(columns[j]));
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}
