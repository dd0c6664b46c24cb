// src/tui_app.rs

use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::{debug, warn};
use ratatui::{backend::Backend, widgets::ListState, widgets::TableState, Terminal};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::analysis::{analyze, Analysis};
use crate::config::Config;
use crate::controls::{ColumnCatalog, Control, VisualizationControls};
use crate::data_loader::{extension_of, get_loader, Dataset};
use crate::error::{AppError, Result};
use crate::insights::{self, InsightsReport, OverviewMetrics};
use crate::logging;
use crate::render;
use crate::virtual_table::VirtualTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter)]
pub enum Page {
    Home,
    DataOverview,
    Insights,
    Visualizations,
    About,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::DataOverview => "Data Overview",
            Page::Insights => "Insights",
            Page::Visualizations => "Visualizations",
            Page::About => "About",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Page> {
        match slug.to_lowercase().as_str() {
            "home" => Some(Page::Home),
            "overview" | "data-overview" => Some(Page::DataOverview),
            "insights" => Some(Page::Insights),
            "visualizations" | "viz" => Some(Page::Visualizations),
            "about" => Some(Page::About),
            _ => None,
        }
    }

    fn index(self) -> usize {
        Page::iter().position(|p| p == self).unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Page,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverviewTable {
    Raw,
    Clean,
}

/// Browsing state of the Data Overview tables.
pub struct OverviewState {
    pub active: OverviewTable,
    pub selected_row: usize,
    pub selected_column: usize,
    pub first_column: usize,
    pub sort: Option<(usize, bool)>,
    pub show_detail: bool,
    pub table_state: TableState,
}

impl OverviewState {
    fn new() -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));
        OverviewState {
            active: OverviewTable::Clean,
            selected_row: 0,
            selected_column: 0,
            first_column: 0,
            sort: None,
            show_detail: false,
            table_state,
        }
    }
}

/// Reads the two listings files. Nothing is cached between calls.
pub struct DataSource {
    config: Config,
}

impl DataSource {
    pub fn new(config: Config) -> Self {
        DataSource { config }
    }

    fn load(&self, path: &Path) -> Result<Dataset> {
        let extension = match &self.config.format {
            Some(format) => format.clone(),
            None => extension_of(path),
        };
        let table = get_loader(&extension)?.load(path).inspect_err(|e| {
            logging::log_load_failure(path, e);
        })?;
        let dataset = Dataset::from_table(table);
        logging::log_dataset_loaded(
            path,
            dataset.num_rows(),
            dataset.num_columns(),
            dataset.numeric_column_names().len(),
        );
        Ok(dataset)
    }

    pub fn load_raw(&self) -> Result<Dataset> {
        self.load(&self.config.raw_data)
    }

    /// Cleaned listings without the leftover index column.
    pub fn load_clean(&self) -> Result<Dataset> {
        let mut dataset = self.load(&self.config.clean_data)?;
        if let Err(AppError::ColumnNotFound(name)) = dataset.drop_column(&self.config.index_column) {
            warn!("Index column {name:?} not present in cleaned data");
        }
        Ok(dataset)
    }
}

pub struct OverviewView {
    pub metrics: std::result::Result<OverviewMetrics, String>,
    pub raw: std::result::Result<VirtualTable, String>,
    pub clean: std::result::Result<VirtualTable, String>,
}

impl OverviewView {
    pub fn active(&self, which: OverviewTable) -> std::result::Result<&VirtualTable, &str> {
        let table = match which {
            OverviewTable::Raw => &self.raw,
            OverviewTable::Clean => &self.clean,
        };
        table.as_ref().map_err(String::as_str)
    }
}

pub struct VisualizationView {
    pub catalog: ColumnCatalog,
    pub analysis: std::result::Result<Analysis, String>,
}

/// Result of the last evaluation of the current page.
pub enum PageView {
    Home,
    Overview(OverviewView),
    Insights(std::result::Result<InsightsReport, String>),
    Visualizations(VisualizationView),
    About,
}

pub struct TuiApp {
    pub config: Config,
    source: DataSource,

    pub page: Page,
    pub focus: Focus,
    pub menu_state: ListState,

    pub show_problem_statement: bool,
    pub overview: OverviewState,
    pub insights_scroll: u16,

    pub controls: VisualizationControls,
    pub show_heatmap_popup: bool,
    pub heatmap_state: ListState,

    pub view: PageView,
}

impl TuiApp {
    pub fn new(config: Config, page: Page) -> Self {
        let mut menu_state = ListState::default();
        menu_state.select(Some(page.index()));

        let mut heatmap_state = ListState::default();
        heatmap_state.select(Some(0));

        let mut app = TuiApp {
            source: DataSource::new(config.clone()),
            controls: VisualizationControls::new(config.heatmap_default_columns),
            config,
            page,
            focus: Focus::Sidebar,
            menu_state,
            show_problem_statement: false,
            overview: OverviewState::new(),
            insights_scroll: 0,
            show_heatmap_popup: false,
            heatmap_state,
            view: PageView::Home,
        };
        app.evaluate();
        app
    }

    pub fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let tick = Duration::from_millis(self.config.tick_rate_ms);
        loop {
            terminal.draw(|f| render::draw(f, self))?;

            if event::poll(tick)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if !self.handle_key(key) {
                        return Ok(());
                    }
                    self.evaluate();
                }
            }
        }
    }

    /// Applies one key press. Returns `false` when the user quits.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.show_heatmap_popup {
            self.handle_heatmap_popup(key.code);
            return true;
        }
        match self.focus {
            Focus::Sidebar => return self.handle_sidebar(key.code),
            Focus::Page => match key.code {
                KeyCode::Esc | KeyCode::BackTab if !self.overview.show_detail => {
                    self.focus = Focus::Sidebar;
                }
                code => match self.page {
                    Page::Home => {
                        if code == KeyCode::Char('e') {
                            self.show_problem_statement = !self.show_problem_statement;
                        }
                    }
                    Page::DataOverview => self.handle_overview(code),
                    Page::Insights => match code {
                        KeyCode::Up => self.insights_scroll = self.insights_scroll.saturating_sub(1),
                        KeyCode::Down => self.insights_scroll = self.insights_scroll.saturating_add(1),
                        KeyCode::PageUp => self.insights_scroll = self.insights_scroll.saturating_sub(10),
                        KeyCode::PageDown => self.insights_scroll = self.insights_scroll.saturating_add(10),
                        _ => {}
                    },
                    Page::Visualizations => self.handle_visualizations(code),
                    Page::About => {}
                },
            },
        }
        true
    }

    fn handle_sidebar(&mut self, code: KeyCode) -> bool {
        let pages: Vec<Page> = Page::iter().collect();
        let current = self.page.index();
        match code {
            KeyCode::Up => self.select_page(pages[(current + pages.len() - 1) % pages.len()]),
            KeyCode::Down => self.select_page(pages[(current + 1) % pages.len()]),
            KeyCode::Tab | KeyCode::Enter | KeyCode::Right => self.focus = Focus::Page,
            KeyCode::Char('q') | KeyCode::Esc => return false,
            _ => {}
        }
        true
    }

    fn select_page(&mut self, page: Page) {
        self.page = page;
        self.menu_state.select(Some(page.index()));
        self.overview.show_detail = false;
    }

    fn handle_overview(&mut self, code: KeyCode) {
        if self.overview.show_detail {
            if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                self.overview.show_detail = false;
            }
            return;
        }
        let (rows, columns) = match &self.view {
            PageView::Overview(view) => view
                .active(self.overview.active)
                .map_or((0, 0), |t| (t.num_rows(), t.num_columns())),
            _ => (0, 0),
        };
        let state = &mut self.overview;
        match code {
            KeyCode::Up => state.selected_row = state.selected_row.saturating_sub(1),
            KeyCode::Down => {
                if state.selected_row + 1 < rows {
                    state.selected_row += 1;
                }
            }
            KeyCode::PageDown => state.selected_row = (state.selected_row + 20).min(rows.saturating_sub(1)),
            KeyCode::PageUp => state.selected_row = state.selected_row.saturating_sub(20),
            KeyCode::Left => state.selected_column = state.selected_column.saturating_sub(1),
            KeyCode::Right => {
                if state.selected_column + 1 < columns {
                    state.selected_column += 1;
                }
            }
            KeyCode::Char('[') => state.sort = Some((state.selected_column, true)),
            KeyCode::Char(']') => state.sort = Some((state.selected_column, false)),
            KeyCode::Char('t') => {
                state.active = match state.active {
                    OverviewTable::Raw => OverviewTable::Clean,
                    OverviewTable::Clean => OverviewTable::Raw,
                };
                state.selected_row = 0;
                state.selected_column = 0;
                state.first_column = 0;
                state.sort = None;
            }
            KeyCode::Enter if rows > 0 => state.show_detail = true,
            _ => {}
        }
        state.table_state.select(Some(state.selected_row));
    }

    fn catalog(&self) -> ColumnCatalog {
        match &self.view {
            PageView::Visualizations(view) => view.catalog.clone(),
            _ => ColumnCatalog::default(),
        }
    }

    fn handle_visualizations(&mut self, code: KeyCode) {
        let catalog = self.catalog();
        match code {
            KeyCode::Up => self.controls.focus_prev(),
            KeyCode::Down => self.controls.focus_next(),
            KeyCode::Left => self.controls.cycle(&catalog, false),
            KeyCode::Right => self.controls.cycle(&catalog, true),
            KeyCode::Char(' ') | KeyCode::Enter
                if self.controls.focused() == Control::HeatmapColumns =>
            {
                self.show_heatmap_popup = true;
                self.heatmap_state.select(Some(0));
            }
            _ => {}
        }
    }

    fn handle_heatmap_popup(&mut self, code: KeyCode) {
        let catalog = self.catalog();
        let count = catalog.numeric.len();
        match code {
            KeyCode::Up if count > 0 => {
                let i = match self.heatmap_state.selected() {
                    Some(0) | None => count - 1,
                    Some(i) => i - 1,
                };
                self.heatmap_state.select(Some(i));
            }
            KeyCode::Down if count > 0 => {
                let i = match self.heatmap_state.selected() {
                    Some(i) if i + 1 < count => i + 1,
                    _ => 0,
                };
                self.heatmap_state.select(Some(i));
            }
            KeyCode::Char(' ') => {
                let index = self.heatmap_state.selected().unwrap_or(0);
                if let Some(name) = catalog.numeric.get(index) {
                    self.controls.toggle_heatmap_column(&catalog, name);
                }
            }
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => {
                self.show_heatmap_popup = false;
            }
            _ => {}
        }
    }

    /// Recomputes the current page from freshly loaded data.
    pub fn evaluate(&mut self) {
        debug!("Evaluating page {:?}", self.page);
        self.view = match self.page {
            Page::Home => PageView::Home,
            Page::About => PageView::About,
            Page::DataOverview => PageView::Overview(self.evaluate_overview()),
            Page::Insights => PageView::Insights(
                self.source
                    .load_clean()
                    .map(|dataset| insights::build_report(&dataset, &self.config))
                    .map_err(|e| e.to_string()),
            ),
            Page::Visualizations => PageView::Visualizations(self.evaluate_visualizations()),
        };
    }

    fn evaluate_overview(&mut self) -> OverviewView {
        let clean = self.source.load_clean();
        let metrics = clean
            .as_ref()
            .map_err(|e| e.to_string())
            .and_then(|d| insights::overview_metrics(d, &self.config).map_err(|e| e.to_string()));
        let mut view = OverviewView {
            metrics,
            raw: self
                .source
                .load_raw()
                .map(|d| VirtualTable::from_dataset(&d))
                .map_err(|e| e.to_string()),
            clean: clean
                .map(|d| VirtualTable::from_dataset(&d))
                .map_err(|e| e.to_string()),
        };

        let state = &mut self.overview;
        let table = match state.active {
            OverviewTable::Raw => view.raw.as_mut(),
            OverviewTable::Clean => view.clean.as_mut(),
        };
        if let Ok(table) = table {
            if let Some((column, ascending)) = state.sort {
                table.sort_by_column(column, ascending);
            }
            state.selected_row = state.selected_row.min(table.num_rows().saturating_sub(1));
            state.selected_column = state
                .selected_column
                .min(table.num_columns().saturating_sub(1));
            state.table_state.select(Some(state.selected_row));
        }
        view
    }

    fn evaluate_visualizations(&self) -> VisualizationView {
        let dataset = match self.source.load_clean() {
            Ok(dataset) => dataset,
            Err(e) => {
                return VisualizationView {
                    catalog: ColumnCatalog::default(),
                    analysis: Err(e.to_string()),
                }
            }
        };
        let catalog = ColumnCatalog::of(&dataset);
        let analysis = match self.controls.request(&catalog) {
            Some(request) => Ok(analyze(&dataset, &request)),
            None => Err("The dataset has no columns to analyse for this selection.".to_string()),
        };
        VisualizationView { catalog, analysis }
    }
}
