// src/render.rs

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
    Frame,
};
use strum::IntoEnumIterator;

use crate::analysis::{Analysis, Panel};
use crate::charts::render_panel;
use crate::controls::VisualizationControls;
use crate::insights::{thousands, InsightsReport};
use crate::tui_app::{
    Focus, OverviewState, OverviewTable, OverviewView, Page, PageView, TuiApp, VisualizationView,
};
use crate::virtual_table::VirtualTable;

const SIDEBAR_WIDTH: u16 = 24;
const ACCENT: Color = Color::Rgb(57, 144, 134);
const SELECTED: Color = Color::Rgb(149, 234, 221);

const PROBLEM_STATEMENT: &str = "The used car market is expanding rapidly, but buyers often \
struggle to make informed decisions due to lack of clear and comprehensive data insights.\n\n\
This project provides an in-depth Exploratory Data Analysis (EDA) on used car listings to \
reveal trends and patterns in location, manufacturing year, fuel type, mileage and price.\n\n\
These insights help both buyers and sellers make confident, data-driven decisions.";

const KEY_DIFFERENCES: &str = "Key differences: missing values handled; columns cleaned \
(data types, units removed); consistent formatting (e.g. bhp, kmpl as numeric); brand and \
model separated in clean data.";

pub fn draw(f: &mut Frame, app: &mut TuiApp) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(size);

    draw_sidebar(f, chunks[0], app);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(chunks[1]);

    match &app.view {
        PageView::Home => draw_home(f, main[0], app.show_problem_statement),
        PageView::About => draw_about(f, main[0]),
        PageView::Insights(report) => draw_insights(f, main[0], report, app.insights_scroll),
        PageView::Visualizations(view) => {
            draw_visualizations(f, main[0], view, &app.controls, app.focus == Focus::Page);
            if app.show_heatmap_popup {
                draw_heatmap_popup(f, main[0], view, &app.controls, &mut app.heatmap_state);
            }
        }
        PageView::Overview(view) => draw_overview(f, main[0], view, &mut app.overview),
    }

    f.render_widget(
        Paragraph::new(key_hints(app)).style(Style::default().fg(Color::DarkGray)),
        main[1],
    );
}

fn key_hints(app: &TuiApp) -> &'static str {
    match (app.focus, app.page) {
        (Focus::Sidebar, _) => "↑/↓ page  Enter/Tab open  q quit",
        (Focus::Page, Page::Home) => "e expand problem statement  Esc menu",
        (Focus::Page, Page::DataOverview) => {
            "arrows move  [ ] sort  t raw/clean  Enter row detail  Esc menu"
        }
        (Focus::Page, Page::Insights) => "↑/↓ PgUp/PgDn scroll  Esc menu",
        (Focus::Page, Page::Visualizations) => {
            "↑/↓ widget  ←/→ change  Space pick heatmap columns  Esc menu"
        }
        (Focus::Page, Page::About) => "Esc menu",
    }
}

fn draw_sidebar(f: &mut Frame, area: Rect, app: &mut TuiApp) {
    let border = if app.focus == Focus::Sidebar {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };
    let items: Vec<ListItem> = Page::iter().map(|p| ListItem::new(p.title())).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title("Main Menu"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(SELECTED)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut app.menu_state);
}

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))
}

fn draw_home(f: &mut Frame, area: Rect, expanded: bool) {
    let mut lines = vec![
        heading("Cars Exploratory Data Analysis (EDA) Project"),
        Line::from("Understand the Used Car Market with Data-Driven Insights"),
        Line::from(""),
    ];
    if expanded {
        lines.push(Line::from("▼ Problem Statement"));
        lines.extend(PROBLEM_STATEMENT.lines().map(Line::from));
    } else {
        lines.push(Line::from("▶ Problem Statement (press e)"));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Use the sidebar to explore more about the data and visual insights."));

    let home = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Home"));
    f.render_widget(home, area);
}

fn draw_about(f: &mut Frame, area: Rect) {
    let lines = vec![
        heading("About This App"),
        Line::from(""),
        Line::from("Project: Used Cars EDA"),
        Line::from("Tools Used: Rust, ratatui, csv"),
        Line::from("GitHub: https://github.com/Amit-Singh-P/CarsEDA/"),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("About")),
        area,
    );
}

fn metric_block<'a>(title: &'a str, value: String) -> Paragraph<'a> {
    Paragraph::new(Line::from(Span::styled(
        value,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).title(title))
}

fn draw_overview(f: &mut Frame, area: Rect, view: &OverviewView, state: &mut OverviewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(area);

    match &view.metrics {
        Ok(metrics) => {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 3); 3])
                .split(chunks[0]);
            f.render_widget(metric_block("Total Cars", metrics.total_cars.clone()), cells[0]);
            f.render_widget(
                metric_block("Average Price (In Lakhs)", metrics.average_price.clone()),
                cells[1],
            );
            f.render_widget(
                metric_block("Unique Brands", metrics.unique_brands.to_string()),
                cells[2],
            );
        }
        Err(e) => f.render_widget(error_paragraph(e), chunks[0]),
    }

    let title = match state.active {
        OverviewTable::Raw => "Raw Dataset",
        OverviewTable::Clean => "Cleaned Dataset",
    };
    match view.active(state.active) {
        Ok(table) => {
            let widths = column_window(
                table,
                state.selected_column,
                &mut state.first_column,
                chunks[1].width,
            );
            let widget = data_table(
                table,
                title,
                state.first_column,
                &widths,
                state.selected_row,
                state.selected_column,
            );
            f.render_stateful_widget(widget, chunks[1], &mut state.table_state);

            if state.show_detail {
                if let Some(detail) = table.row_detail(state.selected_row) {
                    let popup = centered_rect(60, 60, area);
                    let widths = [Constraint::Length(22), Constraint::Min(10)];
                    let widget = data_table(
                        &detail,
                        "Row detail (Enter to close)",
                        0,
                        &widths,
                        usize::MAX,
                        usize::MAX,
                    );
                    f.render_widget(Clear, popup);
                    f.render_widget(widget, popup);
                }
            }
        }
        Err(e) => f.render_widget(error_paragraph(e), chunks[1]),
    }

    f.render_widget(
        Paragraph::new(KEY_DIFFERENCES)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Gray)),
        chunks[2],
    );
}

/// Widths of the columns visible from `first`, scrolled so that
/// `selected` stays on screen.
fn column_window(
    table: &VirtualTable,
    selected: usize,
    first: &mut usize,
    width: u16,
) -> Vec<Constraint> {
    let available = width.saturating_sub(4);
    let widths: Vec<u16> = (0..table.num_columns())
        .map(|i| table.content_width(i).clamp(6, 30))
        .collect();
    if widths.is_empty() {
        return Vec::new();
    }
    let selected = selected.min(widths.len() - 1);
    if selected < *first {
        *first = selected;
    }
    loop {
        let used: u16 = widths[*first..=selected]
            .iter()
            .map(|w| w + 2)
            .sum();
        if used <= available || *first >= selected {
            break;
        }
        *first += 1;
    }
    widths[*first..]
        .iter()
        .map(|w| Constraint::Length(*w))
        .collect()
}

fn data_table<'a>(
    table: &'a VirtualTable,
    title: &'a str,
    first_column: usize,
    widths: &[Constraint],
    selected_row: usize,
    selected_column: usize,
) -> Table<'a> {
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let header_cells = table
        .data
        .headers
        .iter()
        .enumerate()
        .skip(first_column)
        .map(|(i, h)| {
            let style = if i == selected_column {
                header_style.bg(Color::Blue)
            } else {
                header_style
            };
            Cell::from(h.as_str()).style(style)
        });
    let header = Row::new(header_cells).height(1);

    let rows = (0..table.num_rows()).map(move |row_idx| {
        let cells = table
            .data
            .columns
            .iter()
            .enumerate()
            .skip(first_column)
            .map(move |(col_idx, col)| {
                let cell = Cell::from(col[row_idx].as_str());
                if row_idx == selected_row && col_idx == selected_column {
                    cell.style(Style::default().bg(Color::LightBlue))
                } else {
                    cell
                }
            });
        Row::new(cells).height(1)
    });

    Table::new(rows, widths.to_vec())
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("-> ")
        .column_spacing(2)
}

fn error_paragraph(message: &str) -> Paragraph<'_> {
    Paragraph::new(message)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Error"))
}

fn draw_insights(f: &mut Frame, area: Rect, report: &Result<InsightsReport, String>, scroll: u16) {
    let block = Block::default().borders(Borders::ALL).title("Key Insights");
    match report {
        Ok(report) => f.render_widget(
            Paragraph::new(report_lines(report))
                .block(block)
                .scroll((scroll, 0)),
            area,
        ),
        Err(e) => f.render_widget(error_paragraph(e), area),
    }
}

fn report_lines(report: &InsightsReport) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "1. Dataset Overview",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))];
    lines.push(Line::from(format!(
        "{:<22} {:>14} {:>10} {:>14}  {}",
        "Column", "Non-Null Count", "Data Type", "Unique Values", "Example Value"
    )));
    for info in &report.columns {
        lines.push(Line::from(format!(
            "{:<22} {:>14} {:>10} {:>14}  {}",
            info.name, info.non_null, info.dtype, info.unique, info.example
        )));
    }
    lines.push(Line::from(format!(
        "Total Entries: {}   Total Columns: {}   Memory Usage: {:.2} MB",
        thousands(report.total_entries),
        report.total_columns,
        report.memory_mb
    )));

    let section = |title: &str| {
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
    };

    lines.push(Line::from(""));
    lines.push(section("2. Summary Statistics"));
    lines.push(Line::from(format!(
        "{:<22} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    )));
    for d in &report.summary {
        lines.push(Line::from(format!(
            "{:<22} {:>8} {:>12.3} {:>12.3} {:>12.3} {:>12.3} {:>12.3} {:>12.3} {:>12.3}",
            d.column, d.count, d.mean, d.std, d.min, d.q25, d.median, d.q75, d.max
        )));
    }

    lines.push(Line::from(""));
    lines.push(section("3. Null Values"));
    for (name, nulls) in &report.null_counts {
        lines.push(Line::from(format!("{name:<22} {nulls}")));
    }

    lines.push(Line::from(""));
    lines.push(section("4. Unique Value Counts"));
    for vc in &report.value_counts {
        match &vc.counts {
            Ok((unique, counts)) => {
                lines.push(Line::from(format!("{}: {unique} unique values", vc.column)));
                for (value, n) in counts {
                    lines.push(Line::from(format!("    {value:<30} {n}")));
                }
            }
            Err(e) => lines.push(Line::from(format!("{}: {e}", vc.column))),
        }
    }

    lines.push(Line::from(""));
    lines.push(section("5. Top Most Driven Cars"));
    match &report.top_driven {
        Ok(rows) => {
            for (name, km) in rows {
                lines.push(Line::from(format!("{name:<40} {km:>12}")));
            }
        }
        Err(e) => lines.push(Line::from(e.clone())),
    }

    lines.push(Line::from(""));
    lines.push(section("6. Average Price by Brand"));
    match &report.price_by_brand {
        Ok(rows) => {
            for (brand, mean) in rows {
                lines.push(Line::from(format!("{brand:<22} {mean:>10.3}")));
            }
        }
        Err(e) => lines.push(Line::from(e.clone())),
    }
    lines
}

fn draw_visualizations(
    f: &mut Frame,
    area: Rect,
    view: &VisualizationView,
    widgets: &VisualizationControls,
    page_focused: bool,
) {
    let controls = widgets.controls();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(controls.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

    let focused = widgets.focused();
    let control_lines: Vec<Line> = controls
        .iter()
        .map(|&control| {
            let marker = if page_focused && control == focused { "▸ " } else { "  " };
            let style = if page_focused && control == focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{marker}{}: ", control.label()), style),
                Span::raw(format!("◀ {} ▶", widgets.value_label(control, &view.catalog))),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(control_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Visualization and Analysis"),
        ),
        chunks[0],
    );

    draw_analysis(f, chunks[1], view);
}

fn draw_analysis(f: &mut Frame, area: Rect, view: &VisualizationView) {
    let analysis: &Analysis = match &view.analysis {
        Ok(analysis) => analysis,
        Err(e) => {
            f.render_widget(error_paragraph(e), area);
            return;
        }
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    f.render_widget(Paragraph::new(heading(analysis.heading)), rows[0]);

    // one column per panel, subheadings above the first panel of a section
    let cells: Vec<(Option<&str>, &Panel)> = analysis
        .sections
        .iter()
        .flat_map(|s| {
            s.panels
                .iter()
                .enumerate()
                .map(move |(i, p)| (if i == 0 { s.subheading.as_deref() } else { None }, p))
        })
        .collect();
    if cells.is_empty() {
        return;
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, cells.len() as u32); cells.len()])
        .split(rows[1]);
    for ((subheading, panel), column) in cells.into_iter().zip(columns.iter()) {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(*column);
        if let Some(text) = subheading {
            f.render_widget(
                Paragraph::new(text).style(Style::default().add_modifier(Modifier::BOLD)),
                parts[0],
            );
        }
        render_panel(f, parts[1], panel);
    }
}

fn draw_heatmap_popup(
    f: &mut Frame,
    area: Rect,
    view: &VisualizationView,
    widgets: &VisualizationControls,
    state: &mut ListState,
) {
    let popup_area = centered_rect(60, 50, area);
    let block = Block::default()
        .title("Select numeric columns for heatmap (Space toggles, Enter closes)")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black));

    let chosen = widgets.heatmap_selection(&view.catalog);
    let items: Vec<ListItem> = view
        .catalog
        .numeric
        .iter()
        .map(|name| {
            let checkbox = if chosen.contains(name) { "[x]" } else { "[ ]" };
            ListItem::new(format!("{checkbox} {name}"))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bg(Color::Blue))
        .highlight_symbol(">> ");

    f.render_widget(Clear, popup_area);
    f.render_stateful_widget(list, popup_area, state);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
