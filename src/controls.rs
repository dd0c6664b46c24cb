// src/controls.rs
//
// Widget state of the Visualizations page. Selections are stored by column
// name and resolved against the freshly loaded column list on every
// interaction, so a reload with different columns falls back to the first
// available option instead of failing.

use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::analysis::{AnalysisRequest, GroupedPlotRequest, PlotKind};
use crate::data_loader::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum AnalysisMode {
    Univariate,
    Bivariate,
    Multivariate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Mode,
    Column,
    FirstColumn,
    SecondColumn,
    HeatmapColumns,
    XColumn,
    YColumn,
    HueColumn,
    PlotType,
}

impl Control {
    pub fn label(self) -> &'static str {
        match self {
            Control::Mode => "Choose Analysis Type",
            Control::Column => "Select column for univariate analysis",
            Control::FirstColumn => "Select first column (usually numeric)",
            Control::SecondColumn => "Select second column",
            Control::HeatmapColumns => "Select numeric columns for heatmap",
            Control::XColumn => "Select X-axis column",
            Control::YColumn => "Select Y-axis column",
            Control::HueColumn => "Select Hue (legend) column",
            Control::PlotType => "Select plot type",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnCatalog {
    pub all: Vec<String>,
    pub numeric: Vec<String>,
}

impl ColumnCatalog {
    pub fn of(dataset: &Dataset) -> Self {
        ColumnCatalog {
            all: dataset.column_names(),
            numeric: dataset.numeric_column_names(),
        }
    }
}

fn pick(selected: &Option<String>, options: &[String]) -> Option<String> {
    match selected {
        Some(name) if options.contains(name) => Some(name.clone()),
        _ => options.first().cloned(),
    }
}

fn step<T: Clone + PartialEq>(options: &[T], current: &T, forward: bool) -> Option<T> {
    if options.is_empty() {
        return None;
    }
    let pos = options.iter().position(|o| o == current).unwrap_or(0);
    let next = if forward {
        (pos + 1) % options.len()
    } else {
        (pos + options.len() - 1) % options.len()
    };
    Some(options[next].clone())
}

#[derive(Debug, Clone)]
pub struct VisualizationControls {
    pub mode: AnalysisMode,
    pub plot_kind: PlotKind,
    focus: usize,
    column: Option<String>,
    first: Option<String>,
    second: Option<String>,
    heatmap: Option<Vec<String>>,
    heatmap_default: usize,
    x: Option<String>,
    y: Option<String>,
    hue: Option<String>,
}

impl VisualizationControls {
    pub fn new(heatmap_default: usize) -> Self {
        VisualizationControls {
            mode: AnalysisMode::Univariate,
            plot_kind: PlotKind::Scatter,
            focus: 0,
            column: None,
            first: None,
            second: None,
            heatmap: None,
            heatmap_default,
            x: None,
            y: None,
            hue: None,
        }
    }

    pub fn controls(&self) -> Vec<Control> {
        match self.mode {
            AnalysisMode::Univariate => vec![Control::Mode, Control::Column],
            AnalysisMode::Bivariate => {
                vec![Control::Mode, Control::FirstColumn, Control::SecondColumn]
            }
            AnalysisMode::Multivariate => vec![
                Control::Mode,
                Control::HeatmapColumns,
                Control::XColumn,
                Control::YColumn,
                Control::HueColumn,
                Control::PlotType,
            ],
        }
    }

    pub fn focused(&self) -> Control {
        let controls = self.controls();
        controls[self.focus.min(controls.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1).min(self.controls().len() - 1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    /// Options offered by a column selector.
    pub fn options<'a>(&self, control: Control, catalog: &'a ColumnCatalog) -> &'a [String] {
        match control {
            Control::FirstColumn | Control::HeatmapColumns => &catalog.numeric,
            _ => &catalog.all,
        }
    }

    /// Moves the focused widget to its next (or previous) value.
    pub fn cycle(&mut self, catalog: &ColumnCatalog, forward: bool) {
        let control = self.focused();
        match control {
            Control::Mode => {
                let modes: Vec<AnalysisMode> = AnalysisMode::iter().collect();
                if let Some(mode) = step(&modes, &self.mode, forward) {
                    self.mode = mode;
                    self.focus = 0;
                }
            }
            Control::PlotType => {
                let kinds: Vec<PlotKind> = PlotKind::iter().collect();
                if let Some(kind) = step(&kinds, &self.plot_kind, forward) {
                    self.plot_kind = kind;
                }
            }
            Control::HueColumn => {
                let mut options: Vec<Option<String>> = vec![None];
                options.extend(catalog.all.iter().cloned().map(Some));
                let current = self.hue.clone().filter(|h| catalog.all.contains(h));
                if let Some(hue) = step(&options, &current, forward) {
                    self.hue = hue;
                }
            }
            Control::HeatmapColumns => {}
            _ => {
                let options = self.options(control, catalog);
                let slot = match control {
                    Control::Column => &mut self.column,
                    Control::FirstColumn => &mut self.first,
                    Control::SecondColumn => &mut self.second,
                    Control::XColumn => &mut self.x,
                    _ => &mut self.y,
                };
                if let Some(current) = pick(slot, options) {
                    *slot = step(options, &current, forward);
                }
            }
        }
    }

    pub fn heatmap_selection(&self, catalog: &ColumnCatalog) -> Vec<String> {
        match &self.heatmap {
            None => catalog
                .numeric
                .iter()
                .take(self.heatmap_default)
                .cloned()
                .collect(),
            Some(chosen) => chosen
                .iter()
                .filter(|c| catalog.numeric.contains(c))
                .cloned()
                .collect(),
        }
    }

    pub fn toggle_heatmap_column(&mut self, catalog: &ColumnCatalog, name: &str) {
        let mut chosen = self.heatmap_selection(catalog);
        if let Some(pos) = chosen.iter().position(|c| c == name) {
            chosen.remove(pos);
        } else if catalog.numeric.iter().any(|c| c == name) {
            chosen.push(name.to_string());
        }
        self.heatmap = Some(chosen);
    }

    /// Text shown next to a widget's label.
    pub fn value_label(&self, control: Control, catalog: &ColumnCatalog) -> String {
        let or_none = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
        match control {
            Control::Mode => format!("{:?}", self.mode),
            Control::PlotType => self.plot_kind.to_string(),
            Control::Column => or_none(pick(&self.column, &catalog.all)),
            Control::FirstColumn => or_none(pick(&self.first, &catalog.numeric)),
            Control::SecondColumn => or_none(pick(&self.second, &catalog.all)),
            Control::XColumn => or_none(pick(&self.x, &catalog.all)),
            Control::YColumn => or_none(pick(&self.y, &catalog.all)),
            Control::HueColumn => self
                .hue
                .clone()
                .filter(|h| catalog.all.contains(h))
                .unwrap_or_else(|| "None".to_string()),
            Control::HeatmapColumns => {
                let chosen = self.heatmap_selection(catalog);
                if chosen.is_empty() {
                    "(none)".to_string()
                } else {
                    chosen.join(", ")
                }
            }
        }
    }

    /// The dispatcher request for the current widget values, or `None` when
    /// the dataset offers nothing to select.
    pub fn request(&self, catalog: &ColumnCatalog) -> Option<AnalysisRequest> {
        match self.mode {
            AnalysisMode::Univariate => Some(AnalysisRequest::Univariate {
                column: pick(&self.column, &catalog.all)?,
            }),
            AnalysisMode::Bivariate => Some(AnalysisRequest::Bivariate {
                first: pick(&self.first, &catalog.numeric)?,
                second: pick(&self.second, &catalog.all)?,
            }),
            AnalysisMode::Multivariate => Some(AnalysisRequest::Multivariate {
                heatmap_columns: self.heatmap_selection(catalog),
                grouped: GroupedPlotRequest {
                    x: pick(&self.x, &catalog.all)?,
                    y: pick(&self.y, &catalog.all)?,
                    hue: self.hue.clone().filter(|h| catalog.all.contains(h)),
                    kind: self.plot_kind,
                },
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::tests::cars;

    fn catalog() -> ColumnCatalog {
        ColumnCatalog::of(&cars())
    }

    #[test]
    fn test_first_column_only_offers_numeric() {
        let catalog = catalog();
        let mut controls = VisualizationControls::new(5);
        controls.cycle(&catalog, true);
        assert_eq!(controls.mode, AnalysisMode::Bivariate);
        assert_eq!(controls.value_label(Control::FirstColumn, &catalog), "Price");

        controls.focus_next();
        assert_eq!(controls.focused(), Control::FirstColumn);
        for _ in 0..10 {
            controls.cycle(&catalog, true);
            match controls.request(&catalog) {
                Some(AnalysisRequest::Bivariate { first, .. }) => {
                    assert!(catalog.numeric.contains(&first))
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_mode_cycles_backwards() {
        let catalog = catalog();
        let mut controls = VisualizationControls::new(5);
        controls.cycle(&catalog, false);
        assert_eq!(controls.mode, AnalysisMode::Multivariate);
        assert_eq!(controls.controls().len(), 6);
    }

    #[test]
    fn test_hue_cycles_through_none() {
        let catalog = catalog();
        let mut controls = VisualizationControls::new(5);
        controls.mode = AnalysisMode::Multivariate;
        for _ in 0..4 {
            controls.focus_next();
        }
        assert_eq!(controls.focused(), Control::HueColumn);
        assert_eq!(controls.value_label(Control::HueColumn, &catalog), "None");
        controls.cycle(&catalog, true);
        assert_eq!(controls.value_label(Control::HueColumn, &catalog), "Name");
        controls.cycle(&catalog, false);
        assert_eq!(controls.value_label(Control::HueColumn, &catalog), "None");
        controls.cycle(&catalog, false);
        assert_eq!(controls.value_label(Control::HueColumn, &catalog), "Seats");
    }

    #[test]
    fn test_heatmap_defaults_and_toggle() {
        let catalog = catalog();
        let mut controls = VisualizationControls::new(2);
        assert_eq!(
            controls.heatmap_selection(&catalog),
            vec!["Price", "Kilometers_Driven"]
        );
        controls.toggle_heatmap_column(&catalog, "Price");
        assert_eq!(controls.heatmap_selection(&catalog), vec!["Kilometers_Driven"]);
        controls.toggle_heatmap_column(&catalog, "Brand");
        assert_eq!(controls.heatmap_selection(&catalog), vec!["Kilometers_Driven"]);
        controls.toggle_heatmap_column(&catalog, "Seats");
        assert_eq!(
            controls.heatmap_selection(&catalog),
            vec!["Kilometers_Driven", "Seats"]
        );
    }

    #[test]
    fn test_request_falls_back_when_column_disappears() {
        let catalog = catalog();
        let mut controls = VisualizationControls::new(5);
        controls.focus_next();
        controls.cycle(&catalog, true);
        assert_eq!(
            controls.request(&catalog),
            Some(AnalysisRequest::Univariate {
                column: "Brand".into()
            })
        );
        let reduced = ColumnCatalog {
            all: vec!["Price".into()],
            numeric: vec!["Price".into()],
        };
        assert_eq!(
            controls.request(&reduced),
            Some(AnalysisRequest::Univariate {
                column: "Price".into()
            })
        );
        assert_eq!(controls.request(&ColumnCatalog::default()), None);
    }

    #[test]
    fn test_multivariate_request() {
        let catalog = catalog();
        let mut controls = VisualizationControls::new(5);
        controls.mode = AnalysisMode::Multivariate;
        controls.plot_kind = PlotKind::Bar;
        match controls.request(&catalog) {
            Some(AnalysisRequest::Multivariate {
                heatmap_columns,
                grouped,
            }) => {
                assert_eq!(heatmap_columns.len(), 3);
                assert_eq!(grouped.x, "Name");
                assert_eq!(grouped.hue, None);
                assert_eq!(grouped.kind, PlotKind::Bar);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
