// src/analysis.rs
//
// Maps a visualization request onto the statistics and chart data to draw.
// Every path is best-effort: failures become `Panel::Error` and nothing here
// returns `Err` to the caller.

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};
use strum_macros::EnumIter;

use crate::data_loader::{Column, Dataset};
use crate::error::{AppError, Result};
use crate::stats::{self, BoxStats, HistBin};

pub const NOT_AVAILABLE: &str = "Bivariate plot not available for selected combination.";
pub const SELECT_TWO: &str = "Select at least two numeric columns for heatmap.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum PlotKind {
    Scatter,
    Bar,
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotKind::Scatter => write!(f, "Scatter Plot"),
            PlotKind::Bar => write!(f, "Bar Plot"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupedPlotRequest {
    pub x: String,
    pub y: String,
    pub hue: Option<String>,
    pub kind: PlotKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequest {
    Univariate {
        column: String,
    },
    Bivariate {
        first: String,
        second: String,
    },
    Multivariate {
        heatmap_columns: Vec<String>,
        grouped: GroupedPlotRequest,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AxisScale {
    Numeric,
    /// Levels plotted at positions 0, 1, 2, ...
    Categorical(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub label: String,
    pub bins: Vec<HistBin>,
    pub kde: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    pub label: Option<String>,
    pub stats: Option<BoxStats>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlot {
    pub value_label: String,
    pub group_label: Option<String>,
    pub groups: Vec<BoxGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountPlot {
    pub label: String,
    pub counts: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlot {
    pub x_label: String,
    pub y_label: String,
    pub x_axis: AxisScale,
    pub y_axis: AxisScale,
    pub series: Vec<ScatterSeries>,
}

impl ScatterPlot {
    pub fn has_legend(&self) -> bool {
        self.series.iter().any(|s| s.label.is_some())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub labels: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub label: Option<String>,
    /// Mean per category, aligned with `BarPlot::categories`.
    pub means: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarPlot {
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    Histogram(Histogram),
    BoxPlot(BoxPlot),
    Counts(CountPlot),
    Scatter(ScatterPlot),
    Heatmap(Heatmap),
    Bar(BarPlot),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub kind: ChartKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Chart(Chart),
    Message(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub subheading: Option<String>,
    pub panels: Vec<Panel>,
}

impl Section {
    fn plain(panels: Vec<Panel>) -> Self {
        Section {
            subheading: None,
            panels,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub heading: &'static str,
    pub sections: Vec<Section>,
}

impl Analysis {
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.sections.iter().flat_map(|s| s.panels.iter())
    }

    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.panels().filter_map(|p| match p {
            Panel::Chart(chart) => Some(chart),
            _ => None,
        })
    }
}

pub fn analyze(dataset: &Dataset, request: &AnalysisRequest) -> Analysis {
    debug!("Evaluating {request:?}");
    match request {
        AnalysisRequest::Univariate { column } => Analysis {
            heading: "Univariate Analysis",
            sections: vec![Section::plain(univariate(dataset, column))],
        },
        AnalysisRequest::Bivariate { first, second } => Analysis {
            heading: "Bivariate Analysis",
            sections: vec![Section::plain(vec![bivariate(dataset, first, second)])],
        },
        AnalysisRequest::Multivariate {
            heatmap_columns,
            grouped,
        } => Analysis {
            heading: "Multivariate Analysis",
            sections: vec![
                Section {
                    subheading: Some("Correlation Heatmap".to_string()),
                    panels: vec![heatmap_panel(dataset, heatmap_columns)],
                },
                Section {
                    subheading: Some("Scatter / Bar plot with Hue".to_string()),
                    panels: vec![grouped_panel(dataset, grouped)],
                },
            ],
        },
    }
}

fn univariate(dataset: &Dataset, name: &str) -> Vec<Panel> {
    let column = match dataset.column(name) {
        Ok(column) => column,
        Err(e) => return vec![Panel::Error(e.to_string())],
    };

    if column.is_numeric() {
        let values = column.numbers();
        let bins = stats::histogram(&values);
        let kde = stats::kde(&values, bins.first().map_or(1.0, HistBin::width));
        vec![
            Panel::Chart(Chart {
                title: format!("Distribution of {name}"),
                kind: ChartKind::Histogram(Histogram {
                    label: name.to_string(),
                    bins,
                    kde,
                }),
            }),
            Panel::Chart(Chart {
                title: format!("Boxplot of {name}"),
                kind: ChartKind::BoxPlot(BoxPlot {
                    value_label: name.to_string(),
                    group_label: None,
                    groups: vec![BoxGroup {
                        label: None,
                        stats: stats::box_stats(&values),
                    }],
                }),
            }),
        ]
    } else {
        vec![Panel::Chart(Chart {
            title: format!("Count plot of {name}"),
            kind: ChartKind::Counts(CountPlot {
                label: name.to_string(),
                counts: stats::value_counts(column),
            }),
        })]
    }
}

fn bivariate(dataset: &Dataset, first: &str, second: &str) -> Panel {
    let (a, b) = match (dataset.column(first), dataset.column(second)) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) | (_, Err(e)) => return Panel::Error(e.to_string()),
    };

    match (a.is_numeric(), b.is_numeric()) {
        (true, true) => {
            let points = (0..a.len())
                .filter_map(|row| Some((a.number_at(row)?, b.number_at(row)?)))
                .collect();
            Panel::Chart(Chart {
                title: format!("Scatter plot between {first} and {second}"),
                kind: ChartKind::Scatter(ScatterPlot {
                    x_label: first.to_string(),
                    y_label: second.to_string(),
                    x_axis: AxisScale::Numeric,
                    y_axis: AxisScale::Numeric,
                    series: vec![ScatterSeries {
                        label: None,
                        points,
                    }],
                }),
            })
        }
        (true, false) => Panel::Chart(Chart {
            title: format!("Boxplot of {first} grouped by {second}"),
            kind: ChartKind::BoxPlot(grouped_boxes(a, b)),
        }),
        _ => Panel::Message(NOT_AVAILABLE.to_string()),
    }
}

fn grouped_boxes(values: &Column, groups: &Column) -> BoxPlot {
    let levels = stats::categorical_order(groups);
    let mut buckets: HashMap<String, Vec<f64>> = HashMap::new();
    for row in 0..values.len() {
        if let (Some(v), Some(level)) = (values.number_at(row), groups.label_at(row)) {
            buckets.entry(level).or_default().push(v);
        }
    }
    BoxPlot {
        value_label: values.name.clone(),
        group_label: Some(groups.name.clone()),
        groups: levels
            .into_iter()
            .map(|level| {
                let stats = buckets.get(&level).and_then(|v| stats::box_stats(v));
                BoxGroup {
                    label: Some(level),
                    stats,
                }
            })
            .collect(),
    }
}

fn heatmap_panel(dataset: &Dataset, names: &[String]) -> Panel {
    if names.len() < 2 {
        return Panel::Message(SELECT_TWO.to_string());
    }
    match heatmap(dataset, names) {
        Ok(chart) => Panel::Chart(chart),
        Err(e) => {
            warn!("Heatmap failed: {e}");
            Panel::Error(e.to_string())
        }
    }
}

fn heatmap(dataset: &Dataset, names: &[String]) -> Result<Chart> {
    let columns = names
        .iter()
        .map(|name| {
            let column = dataset.column(name)?;
            if column.is_numeric() {
                Ok(column)
            } else {
                Err(AppError::Plot(format!("Column `{name}` is not numeric")))
            }
        })
        .collect::<Result<Vec<&Column>>>()?;

    Ok(Chart {
        title: "Correlation Heatmap".to_string(),
        kind: ChartKind::Heatmap(Heatmap {
            labels: names.to_vec(),
            matrix: stats::correlation_matrix(&columns),
        }),
    })
}

fn grouped_panel(dataset: &Dataset, request: &GroupedPlotRequest) -> Panel {
    match grouped_plot(dataset, request) {
        Ok(chart) => Panel::Chart(chart),
        Err(e) => {
            warn!("{} failed for {request:?}: {e}", request.kind);
            Panel::Error(format!("Error plotting: {e}"))
        }
    }
}

/// Position of a cell along an axis: the value itself for numeric columns,
/// the level index for categorical ones.
struct Positioner<'a> {
    column: &'a Column,
    levels: Option<HashMap<String, usize>>,
}

impl<'a> Positioner<'a> {
    fn new(column: &'a Column) -> (Self, AxisScale) {
        if column.is_numeric() {
            (Positioner { column, levels: None }, AxisScale::Numeric)
        } else {
            let levels = stats::categorical_order(column);
            let index = levels
                .iter()
                .enumerate()
                .map(|(i, level)| (level.clone(), i))
                .collect();
            (
                Positioner {
                    column,
                    levels: Some(index),
                },
                AxisScale::Categorical(levels),
            )
        }
    }

    fn at(&self, row: usize) -> Option<f64> {
        match &self.levels {
            None => self.column.number_at(row),
            Some(index) => {
                let label = self.column.label_at(row)?;
                index.get(&label).map(|&i| i as f64)
            }
        }
    }
}

fn grouped_plot(dataset: &Dataset, request: &GroupedPlotRequest) -> Result<Chart> {
    let x = dataset.column(&request.x)?;
    let y = dataset.column(&request.y)?;
    let hue = request
        .hue
        .as_deref()
        .map(|name| dataset.column(name))
        .transpose()?;

    let title = format!(
        "{} of {} vs {} grouped by {}",
        request.kind,
        request.y,
        request.x,
        request.hue.as_deref().unwrap_or("None")
    );

    let hue_levels: Vec<Option<String>> = match hue {
        Some(h) => stats::categorical_order(h).into_iter().map(Some).collect(),
        None => vec![None],
    };
    let hue_slot = |row: usize| -> Option<usize> {
        match hue {
            None => Some(0),
            Some(h) => {
                let label = h.label_at(row)?;
                hue_levels.iter().position(|l| l.as_deref() == Some(label.as_str()))
            }
        }
    };

    let kind = match request.kind {
        PlotKind::Scatter => {
            let (xs, x_axis) = Positioner::new(x);
            let (ys, y_axis) = Positioner::new(y);
            let mut series: Vec<ScatterSeries> = hue_levels
                .iter()
                .map(|label| ScatterSeries {
                    label: label.clone(),
                    points: Vec::new(),
                })
                .collect();
            for row in 0..dataset.num_rows() {
                if let (Some(px), Some(py), Some(slot)) = (xs.at(row), ys.at(row), hue_slot(row)) {
                    series[slot].points.push((px, py));
                }
            }
            ChartKind::Scatter(ScatterPlot {
                x_label: request.x.clone(),
                y_label: request.y.clone(),
                x_axis,
                y_axis,
                series,
            })
        }
        PlotKind::Bar => {
            if !y.is_numeric() {
                return Err(AppError::Plot(format!(
                    "{} needs a numeric Y column, but `{}` is categorical",
                    request.kind, request.y
                )));
            }
            let categories = stats::categorical_order(x);
            let category_index: HashMap<&str, usize> = categories
                .iter()
                .enumerate()
                .map(|(i, c)| (c.as_str(), i))
                .collect();
            let mut sums = vec![vec![(0.0f64, 0usize); categories.len()]; hue_levels.len()];
            for row in 0..dataset.num_rows() {
                let (Some(label), Some(value), Some(slot)) =
                    (x.label_at(row), y.number_at(row), hue_slot(row))
                else {
                    continue;
                };
                if let Some(&c) = category_index.get(label.as_str()) {
                    sums[slot][c].0 += value;
                    sums[slot][c].1 += 1;
                }
            }
            let series = hue_levels
                .iter()
                .zip(sums)
                .map(|(label, cells)| BarSeries {
                    label: label.clone(),
                    means: cells
                        .into_iter()
                        .map(|(sum, n)| (n > 0).then(|| sum / n as f64))
                        .collect(),
                })
                .collect();
            ChartKind::Bar(BarPlot {
                x_label: request.x.clone(),
                y_label: request.y.clone(),
                categories,
                series,
            })
        }
    };

    Ok(Chart { title, kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::tests::cars;

    fn only_chart(analysis: &Analysis) -> &Chart {
        let charts: Vec<&Chart> = analysis.charts().collect();
        assert_eq!(charts.len(), 1, "expected one chart in {analysis:?}");
        charts[0]
    }

    fn univariate(column: &str) -> AnalysisRequest {
        AnalysisRequest::Univariate {
            column: column.to_string(),
        }
    }

    fn grouped(x: &str, y: &str, hue: Option<&str>, kind: PlotKind) -> AnalysisRequest {
        AnalysisRequest::Multivariate {
            heatmap_columns: vec![],
            grouped: GroupedPlotRequest {
                x: x.to_string(),
                y: y.to_string(),
                hue: hue.map(str::to_string),
                kind,
            },
        }
    }

    fn total(plot: &CountPlot) -> usize {
        plot.counts.iter().map(|(_, n)| n).sum()
    }

    fn grouped_panel_of(analysis: &Analysis) -> &Panel {
        &analysis.sections[1].panels[0]
    }

    #[test]
    fn test_univariate_numeric_gives_distribution_and_boxplot() {
        let analysis = analyze(&cars(), &univariate("Seats"));
        let charts: Vec<&Chart> = analysis.charts().collect();
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].title, "Distribution of Seats");
        assert_eq!(charts[1].title, "Boxplot of Seats");
        match &charts[0].kind {
            ChartKind::Histogram(h) => {
                // the missing seat count is left out
                assert_eq!(h.bins.iter().map(|b| b.count).sum::<usize>(), 5);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_univariate_all_missing_still_renders() {
        let mut table = cars().to_table();
        table.headers.push("Mileage".into());
        table.columns.push(vec![String::new(); 6]);
        let dataset = Dataset::from_table(table);
        let analysis = analyze(&dataset, &univariate("Mileage"));
        let charts: Vec<&Chart> = analysis.charts().collect();
        assert_eq!(charts.len(), 2);
        match &charts[1].kind {
            ChartKind::BoxPlot(b) => assert!(b.groups[0].stats.is_none()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_univariate_categorical_counts_non_missing() {
        let dataset = cars();
        let analysis = analyze(&dataset, &univariate("Colour"));
        let chart = only_chart(&analysis);
        assert_eq!(chart.title, "Count plot of Colour");
        match &chart.kind {
            ChartKind::Counts(c) => {
                assert_eq!(total(c), dataset.column("Colour").unwrap().non_missing_count());
                assert_eq!(c.counts[0], ("White".to_string(), 2));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_column_is_an_error_panel() {
        let analysis = analyze(&cars(), &univariate("Engine"));
        assert_eq!(
            analysis.sections[0].panels,
            vec![Panel::Error("Column not found: Engine".into())]
        );
    }

    #[test]
    fn test_bivariate_dispatch() {
        let dataset = cars();
        let scatter = analyze(
            &dataset,
            &AnalysisRequest::Bivariate {
                first: "Price".into(),
                second: "Kilometers_Driven".into(),
            },
        );
        let chart = only_chart(&scatter);
        assert_eq!(chart.title, "Scatter plot between Price and Kilometers_Driven");
        assert!(matches!(&chart.kind, ChartKind::Scatter(s) if s.series[0].points.len() == 6));

        let boxes = analyze(
            &dataset,
            &AnalysisRequest::Bivariate {
                first: "Price".into(),
                second: "Transmission".into(),
            },
        );
        match &only_chart(&boxes).kind {
            ChartKind::BoxPlot(b) => {
                let labels: Vec<_> = b.groups.iter().map(|g| g.label.clone().unwrap()).collect();
                assert_eq!(labels, vec!["Manual", "Automatic"]);
                assert_eq!(b.groups[1].stats.as_ref().unwrap().count, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bivariate_non_numeric_first_is_a_message() {
        let analysis = analyze(
            &cars(),
            &AnalysisRequest::Bivariate {
                first: "Brand".into(),
                second: "Price".into(),
            },
        );
        assert_eq!(
            analysis.sections[0].panels,
            vec![Panel::Message(NOT_AVAILABLE.to_string())]
        );
    }

    #[test]
    fn test_heatmap_needs_two_columns() {
        let analysis = analyze(
            &cars(),
            &AnalysisRequest::Multivariate {
                heatmap_columns: vec!["Price".into()],
                grouped: GroupedPlotRequest {
                    x: "Price".into(),
                    y: "Price".into(),
                    hue: None,
                    kind: PlotKind::Scatter,
                },
            },
        );
        assert_eq!(
            analysis.sections[0].panels,
            vec![Panel::Message(SELECT_TWO.to_string())]
        );
    }

    #[test]
    fn test_heatmap_symmetric_unit_diagonal() {
        let analysis = analyze(
            &cars(),
            &AnalysisRequest::Multivariate {
                heatmap_columns: vec!["Price".into(), "Kilometers_Driven".into(), "Seats".into()],
                grouped: GroupedPlotRequest {
                    x: "Brand".into(),
                    y: "Price".into(),
                    hue: None,
                    kind: PlotKind::Bar,
                },
            },
        );
        match &analysis.sections[0].panels[0] {
            Panel::Chart(Chart {
                kind: ChartKind::Heatmap(h),
                ..
            }) => {
                for i in 0..3 {
                    assert_eq!(h.matrix[i][i], 1.0);
                    for j in 0..3 {
                        assert_eq!(h.matrix[i][j], h.matrix[j][i]);
                    }
                }
                assert!(h.matrix[0][1] > 0.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_heatmap_rejects_text_column() {
        let analysis = analyze(
            &cars(),
            &AnalysisRequest::Multivariate {
                heatmap_columns: vec!["Price".into(), "Brand".into()],
                grouped: GroupedPlotRequest {
                    x: "Price".into(),
                    y: "Price".into(),
                    hue: None,
                    kind: PlotKind::Scatter,
                },
            },
        );
        assert!(matches!(&analysis.sections[0].panels[0], Panel::Error(m) if m.contains("Brand")));
    }

    #[test]
    fn test_bar_with_categorical_y_is_caught() {
        let analysis = analyze(&cars(), &grouped("Brand", "Fuel_Type", None, PlotKind::Bar));
        match grouped_panel_of(&analysis) {
            Panel::Error(msg) => assert!(msg.starts_with("Error plotting: ")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_grouped_unknown_hue_is_caught() {
        let analysis = analyze(
            &cars(),
            &grouped("Price", "Seats", Some("Engine"), PlotKind::Scatter),
        );
        assert_eq!(
            grouped_panel_of(&analysis),
            &Panel::Error("Error plotting: Column not found: Engine".into())
        );
    }

    #[test]
    fn test_scatter_without_hue_has_no_legend() {
        let analysis = analyze(&cars(), &grouped("Kilometers_Driven", "Price", None, PlotKind::Scatter));
        match grouped_panel_of(&analysis) {
            Panel::Chart(chart) => {
                assert_eq!(
                    chart.title,
                    "Scatter Plot of Price vs Kilometers_Driven grouped by None"
                );
                match &chart.kind {
                    ChartKind::Scatter(s) => {
                        assert!(!s.has_legend());
                        assert_eq!(s.series.len(), 1);
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_scatter_with_hue_and_categorical_axis() {
        let analysis = analyze(
            &cars(),
            &grouped("Brand", "Price", Some("Transmission"), PlotKind::Scatter),
        );
        match grouped_panel_of(&analysis) {
            Panel::Chart(Chart {
                kind: ChartKind::Scatter(s),
                ..
            }) => {
                assert!(s.has_legend());
                assert_eq!(s.series.len(), 2);
                assert_eq!(
                    s.x_axis,
                    AxisScale::Categorical(vec![
                        "Maruti".into(),
                        "Hyundai".into(),
                        "Honda".into(),
                        "Toyota".into()
                    ])
                );
                assert_eq!(s.series[1].points, vec![(2.0, 9.0), (3.0, 17.7)]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bar_means_per_category() {
        let analysis = analyze(&cars(), &grouped("Brand", "Price", None, PlotKind::Bar));
        match grouped_panel_of(&analysis) {
            Panel::Chart(Chart {
                kind: ChartKind::Bar(b),
                ..
            }) => {
                assert_eq!(b.categories[0], "Maruti");
                assert_eq!(b.series[0].means[0], Some(5.25));
                assert!((b.series[0].means[1].unwrap() - 8.85).abs() < 1e-9);
                assert_eq!(b.series.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_all_missing_y_gives_empty_chart() {
        let mut table = cars().to_table();
        table.headers.push("Mileage".into());
        table.columns.push(vec![String::new(); 6]);
        let dataset = Dataset::from_table(table);

        match grouped_panel_of(&analyze(&dataset, &grouped("Brand", "Mileage", None, PlotKind::Scatter))) {
            Panel::Chart(Chart {
                kind: ChartKind::Scatter(s),
                ..
            }) => assert!(s.series[0].points.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
        match grouped_panel_of(&analyze(&dataset, &grouped("Brand", "Mileage", None, PlotKind::Bar))) {
            Panel::Chart(Chart {
                kind: ChartKind::Bar(b),
                ..
            }) => assert!(b.series[0].means.iter().all(Option::is_none)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_repeated_requests_are_equivalent() {
        let dataset = cars();
        let requests = [
            univariate("Price"),
            univariate("Brand"),
            grouped("Brand", "Price", Some("Fuel_Type"), PlotKind::Bar),
        ];
        for request in &requests {
            let first = format!("{:?}", analyze(&dataset, request));
            let second = format!("{:?}", analyze(&dataset, request));
            assert_eq!(first, second);
        }
    }
}
