// src/charts.rs

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart as ChartWidget, Dataset,
        GraphType, Paragraph, Row, Table, Wrap,
    },
    Frame,
};

use crate::analysis::{
    AxisScale, BarPlot, BoxPlot, Chart, ChartKind, CountPlot, Heatmap, Histogram, Panel,
    ScatterPlot,
};

const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
    Color::White,
    Color::LightGreen,
];

const BAR_SCALE: f64 = 10_000.0;

const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

fn series_color(i: usize) -> Color {
    PALETTE[i % PALETTE.len()]
}

/// Diverging blue-grey-red scale, neutral at zero.
pub fn diverging_rgb(r: f64) -> (u8, u8, u8) {
    let t = r.clamp(-1.0, 1.0);
    let end = if t < 0.0 { COLD } else { WARM };
    let w = t.abs();
    let mix = |a: f64, b: f64| (a + (b - a) * w).round() as u8;
    (mix(NEUTRAL.0, end.0), mix(NEUTRAL.1, end.1), mix(NEUTRAL.2, end.2))
}

fn short_number(v: f64) -> String {
    if v.abs() >= 10_000.0 {
        format!("{v:.0}")
    } else if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn truncate(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        label.to_string()
    } else {
        let mut out: String = label.chars().take(width.saturating_sub(1)).collect();
        out.push('~');
        out
    }
}

fn padded_bounds(lo: f64, hi: f64) -> [f64; 2] {
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if lo == hi {
        return [lo - 0.5, hi + 0.5];
    }
    let pad = (hi - lo) * 0.05;
    [lo - pad, hi + pad]
}

fn numeric_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    vec![
        Span::raw(short_number(bounds[0])),
        Span::raw(short_number(mid)),
        Span::raw(short_number(bounds[1])),
    ]
}

fn chart_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)))
}

pub fn render_panel(f: &mut Frame, area: Rect, panel: &Panel) {
    match panel {
        Panel::Chart(chart) => render_chart(f, area, chart),
        Panel::Message(text) => {
            let message = Paragraph::new(text.as_str())
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(message, area);
        }
        Panel::Error(text) => {
            let error = Paragraph::new(text.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("Error"));
            f.render_widget(error, area);
        }
    }
}

pub fn render_chart(f: &mut Frame, area: Rect, chart: &Chart) {
    match &chart.kind {
        ChartKind::Histogram(h) => render_histogram(f, area, &chart.title, h),
        ChartKind::BoxPlot(b) => render_box_plot(f, area, &chart.title, b),
        ChartKind::Counts(c) => render_counts(f, area, &chart.title, c),
        ChartKind::Scatter(s) => render_scatter(f, area, &chart.title, s),
        ChartKind::Heatmap(h) => render_heatmap(f, area, &chart.title, h),
        ChartKind::Bar(b) => render_bars(f, area, &chart.title, b),
    }
}

fn render_histogram(f: &mut Frame, area: Rect, title: &str, hist: &Histogram) {
    let bars: Vec<(f64, f64)> = hist
        .bins
        .iter()
        .map(|b| (b.midpoint(), b.count as f64))
        .collect();
    let x_bounds = match (hist.bins.first(), hist.bins.last()) {
        (Some(first), Some(last)) => [first.lower, last.upper],
        _ => [0.0, 1.0],
    };
    let y_max = bars
        .iter()
        .chain(hist.kde.iter())
        .map(|p| p.1)
        .fold(1.0f64, f64::max);

    let datasets = vec![
        Dataset::default()
            .name("count")
            .marker(Marker::HalfBlock)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(Color::LightBlue))
            .data(&bars),
        Dataset::default()
            .name("kde")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&hist.kde),
    ];
    let y_bounds = [0.0, y_max * 1.1];
    let widget = ChartWidget::new(datasets)
        .block(chart_block(title))
        .x_axis(
            Axis::default()
                .title(hist.label.as_str())
                .bounds(x_bounds)
                .labels(numeric_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title("Count")
                .bounds(y_bounds)
                .labels(numeric_labels(y_bounds)),
        );
    f.render_widget(widget, area);
}

fn render_box_plot(f: &mut Frame, area: Rect, title: &str, plot: &BoxPlot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let (lo, hi) = plot
        .groups
        .iter()
        .filter_map(|g| g.stats.as_ref())
        .flat_map(|s| {
            s.outliers
                .iter()
                .copied()
                .chain([s.whisker_low, s.whisker_high])
                .collect::<Vec<f64>>()
        })
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let y_bounds = padded_bounds(lo, hi);
    let n = plot.groups.len().max(1) as f64;

    let canvas = Canvas::default()
        .block(chart_block(title))
        .marker(Marker::Braille)
        .x_bounds([-1.0, n - 0.4])
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.print(-1.0, y_bounds[1], Line::from(short_number(y_bounds[1])));
            ctx.print(-1.0, y_bounds[0], Line::from(short_number(y_bounds[0])));
            for (i, group) in plot.groups.iter().enumerate() {
                let color = series_color(i);
                let x = i as f64;
                let Some(s) = &group.stats else {
                    ctx.print(x - 0.2, (y_bounds[0] + y_bounds[1]) / 2.0, "no data");
                    continue;
                };
                let (left, right) = (x - 0.3, x + 0.3);
                for (x1, y1, x2, y2) in [
                    (left, s.q1, right, s.q1),
                    (left, s.q3, right, s.q3),
                    (left, s.q1, left, s.q3),
                    (right, s.q1, right, s.q3),
                    (x, s.q1, x, s.whisker_low),
                    (x, s.q3, x, s.whisker_high),
                    (x - 0.15, s.whisker_low, x + 0.15, s.whisker_low),
                    (x - 0.15, s.whisker_high, x + 0.15, s.whisker_high),
                ] {
                    ctx.draw(&CanvasLine {
                        x1,
                        y1,
                        x2,
                        y2,
                        color,
                    });
                }
                ctx.draw(&CanvasLine {
                    x1: left,
                    y1: s.median,
                    x2: right,
                    y2: s.median,
                    color: Color::White,
                });
                let outliers: Vec<(f64, f64)> = s.outliers.iter().map(|&v| (x, v)).collect();
                ctx.draw(&Points {
                    coords: &outliers,
                    color: Color::Red,
                });
            }
        });
    f.render_widget(canvas, chunks[0]);

    let label = match &plot.group_label {
        Some(group) => {
            let levels: Vec<String> = plot
                .groups
                .iter()
                .enumerate()
                .map(|(i, g)| format!("{}={}", i + 1, g.label.as_deref().unwrap_or("")))
                .collect();
            format!("{} by {}: {}", plot.value_label, group, levels.join("  "))
        }
        None => plot.value_label.clone(),
    };
    f.render_widget(Paragraph::new(label), chunks[1]);
}

fn render_counts(f: &mut Frame, area: Rect, title: &str, plot: &CountPlot) {
    let capacity = area.height.saturating_sub(2) as usize;
    let shown = plot.counts.len().min(capacity);
    let title = if shown < plot.counts.len() {
        format!("{title} (top {shown} of {})", plot.counts.len())
    } else {
        title.to_string()
    };
    let bars: Vec<Bar> = plot
        .counts
        .iter()
        .take(shown)
        .map(|(label, n)| {
            Bar::default()
                .value(*n as u64)
                .label(Line::from(truncate(label, 14)))
                .style(Style::default().fg(Color::LightBlue))
        })
        .collect();
    let widget = BarChart::default()
        .block(chart_block(&title))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(widget, area);
}

fn axis_for(scale: &AxisScale, values: impl Iterator<Item = f64>) -> ([f64; 2], Vec<Span<'static>>) {
    match scale {
        AxisScale::Numeric => {
            let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
            let bounds = padded_bounds(lo, hi);
            (bounds, numeric_labels(bounds))
        }
        AxisScale::Categorical(levels) => {
            let bounds = [-0.5, levels.len().max(1) as f64 - 0.5];
            let labels = if levels.len() <= 6 {
                levels.iter().map(|l| Span::raw(truncate(l, 10))).collect()
            } else {
                vec![
                    Span::raw(truncate(&levels[0], 10)),
                    Span::raw(truncate(&levels[levels.len() - 1], 10)),
                ]
            };
            (bounds, labels)
        }
    }
}

fn render_scatter(f: &mut Frame, area: Rect, title: &str, plot: &ScatterPlot) {
    let all_points = || plot.series.iter().flat_map(|s| s.points.iter());
    let (x_bounds, x_labels) = axis_for(&plot.x_axis, all_points().map(|p| p.0));
    let (y_bounds, y_labels) = axis_for(&plot.y_axis, all_points().map(|p| p.1));
    let legend_constraints = if plot.has_legend() {
        (Constraint::Ratio(1, 2), Constraint::Ratio(1, 2))
    } else {
        (Constraint::Length(0), Constraint::Length(0))
    };

    let datasets: Vec<Dataset> = plot
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            let dataset = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(series_color(i)))
                .data(&series.points);
            match &series.label {
                Some(label) => dataset.name(label.clone()),
                None => dataset,
            }
        })
        .collect();

    let widget = ChartWidget::new(datasets)
        .block(chart_block(title))
        .x_axis(
            Axis::default()
                .title(plot.x_label.as_str())
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(plot.y_label.as_str())
                .bounds(y_bounds)
                .labels(y_labels),
        )
        .hidden_legend_constraints(legend_constraints);
    f.render_widget(widget, area);
}

fn render_heatmap(f: &mut Frame, area: Rect, title: &str, heatmap: &Heatmap) {
    let k = heatmap.labels.len();
    let label_width = heatmap
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(4)
        .min(18);
    let cell_width = ((area.width as usize).saturating_sub(label_width + 4) / k.max(1)).clamp(6, 12);

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(
                heatmap
                    .labels
                    .iter()
                    .map(|l| Cell::from(truncate(l, cell_width - 1))),
            )
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = heatmap.matrix.iter().zip(&heatmap.labels).map(|(values, label)| {
        let cells = std::iter::once(
            Cell::from(truncate(label, label_width)).style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .chain(values.iter().map(|&r| {
            if r.is_nan() {
                Cell::from("nan").style(Style::default().fg(Color::Gray).bg(Color::DarkGray))
            } else {
                let (red, green, blue) = diverging_rgb(r);
                let fg = if r.abs() > 0.6 { Color::White } else { Color::Black };
                Cell::from(format!("{r:.2}"))
                    .style(Style::default().fg(fg).bg(Color::Rgb(red, green, blue)))
            }
        }))
        .collect::<Vec<_>>();
        Row::new(cells).height(1)
    });

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(label_width as u16))
        .chain((0..k).map(|_| Constraint::Length(cell_width as u16)))
        .collect();
    let table = Table::new(rows, widths)
        .header(header)
        .block(chart_block(title))
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_bars(f: &mut Frame, area: Rect, title: &str, plot: &BarPlot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let series = plot.series.len().max(1);
    let group_width = (series * 3 + 1).min(u16::MAX as usize);
    let capacity = (chunks[0].width.saturating_sub(2) as usize / group_width).max(1);
    let shown = plot.categories.len().min(capacity);

    // bar heights are integers; scale the tallest finite mean to BAR_SCALE
    let tallest = plot
        .series
        .iter()
        .flat_map(|s| s.means[..shown].iter().flatten())
        .filter(|m| m.is_finite())
        .fold(0.0f64, |acc, &m| acc.max(m));
    let height = |m: f64| {
        if m.is_finite() && m > 0.0 && tallest > 0.0 {
            (m / tallest * BAR_SCALE).round() as u64
        } else {
            0
        }
    };

    let groups: Vec<Vec<Bar>> = (0..shown)
        .map(|c| {
            plot.series
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let mean = s.means[c];
                    Bar::default()
                        .value(mean.map_or(0, &height))
                        .text_value(mean.map_or_else(|| "-".to_string(), short_number))
                        .style(Style::default().fg(series_color(i)))
                })
                .collect()
        })
        .collect();

    let title = if shown < plot.categories.len() {
        format!("{title} (first {shown} of {} {})", plot.categories.len(), plot.x_label)
    } else {
        title.to_string()
    };
    let mut widget = BarChart::default()
        .block(chart_block(&title))
        .bar_width(3)
        .bar_gap(0)
        .group_gap(1);
    for (c, bars) in groups.iter().enumerate() {
        widget = widget.data(
            BarGroup::default()
                .label(Line::from(truncate(&plot.categories[c], group_width)))
                .bars(bars),
        );
    }
    f.render_widget(widget, chunks[0]);

    let legend: Vec<Span> = plot
        .series
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            s.label.as_ref().map(|label| {
                Span::styled(format!("■ {label}  "), Style::default().fg(series_color(i)))
            })
        })
        .collect();
    let footer = if legend.is_empty() {
        Line::from(format!("mean {} per {}", plot.y_label, plot.x_label))
    } else {
        Line::from(legend)
    };
    f.render_widget(Paragraph::new(footer), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisRequest, GroupedPlotRequest, PlotKind};
    use crate::data_loader::tests::cars;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(panel: &Panel, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| render_panel(f, f.area(), panel))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    fn requests() -> Vec<AnalysisRequest> {
        let mut out: Vec<AnalysisRequest> = ["Price", "Brand", "Seats", "Name"]
            .iter()
            .map(|c| AnalysisRequest::Univariate {
                column: c.to_string(),
            })
            .collect();
        out.push(AnalysisRequest::Bivariate {
            first: "Price".into(),
            second: "Owner_Type".into(),
        });
        for kind in [PlotKind::Scatter, PlotKind::Bar] {
            out.push(AnalysisRequest::Multivariate {
                heatmap_columns: vec!["Price".into(), "Kilometers_Driven".into(), "Seats".into()],
                grouped: GroupedPlotRequest {
                    x: "Fuel_Type".into(),
                    y: "Price".into(),
                    hue: Some("Transmission".into()),
                    kind,
                },
            });
        }
        out
    }

    #[test]
    fn test_every_panel_draws_in_small_and_large_areas() {
        let dataset = cars();
        for request in requests() {
            for panel in analyze(&dataset, &request).panels() {
                draw(panel, 100, 30);
                draw(panel, 12, 5);
            }
        }
    }

    #[test]
    fn test_empty_charts_draw() {
        let mut table = cars().to_table();
        table.headers.push("Mileage".into());
        table.columns.push(vec![String::new(); 6]);
        let dataset = crate::data_loader::Dataset::from_table(table);
        let analysis = analyze(
            &dataset,
            &AnalysisRequest::Univariate {
                column: "Mileage".into(),
            },
        );
        for panel in analysis.panels() {
            let screen = draw(panel, 60, 20);
            assert!(screen.contains("Mileage"));
        }
    }

    fn with_column(name: &str, cells: &[&str]) -> crate::data_loader::Dataset {
        let mut table = cars().to_table();
        table.headers.push(name.into());
        table.columns.push(cells.iter().map(|c| c.to_string()).collect());
        crate::data_loader::Dataset::from_table(table)
    }

    fn grouped_bar(x: &str, y: &str, hue: Option<&str>) -> AnalysisRequest {
        AnalysisRequest::Multivariate {
            heatmap_columns: vec![],
            grouped: GroupedPlotRequest {
                x: x.into(),
                y: y.into(),
                hue: hue.map(str::to_string),
                kind: PlotKind::Bar,
            },
        }
    }

    #[test]
    fn test_bar_with_infinite_means_draws() {
        let dataset = with_column("Weird", &["1", "inf", "3", "-inf", "5", "6"]);
        let analysis = analyze(&dataset, &grouped_bar("Brand", "Weird", None));
        let panel = &analysis.sections[1].panels[0];
        assert!(matches!(panel, Panel::Chart(_)));
        let screen = draw(panel, 100, 30);
        assert!(screen.contains("Bar Plot of Weird vs Brand"));
        draw(panel, 12, 5);
    }

    #[test]
    fn test_bar_with_huge_and_negative_means_draws() {
        let dataset = with_column("Swing", &["1e300", "-4", "2", "1e308", "-7", "0"]);
        let analysis = analyze(&dataset, &grouped_bar("Brand", "Swing", Some("Name")));
        for panel in analysis.panels() {
            draw(panel, 100, 30);
        }
    }

    #[test]
    fn test_scatter_legend_only_with_hue() {
        let dataset = cars();
        let scatter = |hue: Option<&str>| AnalysisRequest::Multivariate {
            heatmap_columns: vec![],
            grouped: GroupedPlotRequest {
                x: "Kilometers_Driven".into(),
                y: "Price".into(),
                hue: hue.map(str::to_string),
                kind: PlotKind::Scatter,
            },
        };
        let with_hue = analyze(&dataset, &scatter(Some("Transmission")));
        let screen = draw(&with_hue.sections[1].panels[0], 100, 30);
        assert!(screen.contains("Automatic"));

        let without_hue = analyze(&dataset, &scatter(None));
        draw(&without_hue.sections[1].panels[0], 100, 30);
    }

    #[test]
    fn test_heatmap_is_annotated() {
        let dataset = cars();
        let analysis = analyze(
            &dataset,
            &AnalysisRequest::Multivariate {
                heatmap_columns: vec!["Price".into(), "Seats".into()],
                grouped: GroupedPlotRequest {
                    x: "Price".into(),
                    y: "Price".into(),
                    hue: None,
                    kind: PlotKind::Scatter,
                },
            },
        );
        let screen = draw(&analysis.sections[0].panels[0], 80, 10);
        assert!(screen.contains("1.00"));
        assert!(screen.contains("Correlation Heatmap"));
    }

    #[test]
    fn test_error_panel_text_visible() {
        let screen = draw(&Panel::Error("Error plotting: boom".into()), 40, 5);
        assert!(screen.contains("Error plotting: boom"));
    }

    #[test]
    fn test_diverging_scale_centered_at_zero() {
        assert_eq!(diverging_rgb(0.0), (221, 221, 221));
        assert_eq!(diverging_rgb(1.0), (180, 4, 38));
        assert_eq!(diverging_rgb(-1.0), (59, 76, 192));
        assert_eq!(diverging_rgb(2.0), diverging_rgb(1.0));
        let (r, _, b) = diverging_rgb(0.5);
        assert!(r < 221 && b < 221);
    }
}
