use std::collections::{BTreeMap, BTreeSet};

use crate::config::AppConfig;
use crate::data::filter::{FilterSpec, SELECT_ALL};
use crate::pipeline::{render, Session, UiEvent, ViewModel};

/// The eight categorical filter columns and their form labels.
/// Every column found in the upload gets a picker, even when it holds a
/// single category.
pub const FILTER_COLUMNS: [(&str, &str); 8] = [
    ("job", "Job"),
    ("marital", "Marital status"),
    ("default", "In default?"),
    ("housing", "Housing loan?"),
    ("loan", "Personal loan?"),
    ("contact", "Contact channel"),
    ("month", "Contact month"),
    ("day_of_week", "Day of week"),
];

/// Chart style selector, as submitted by the sidebar form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    Barras,
    Pizza,
}

impl GraphKind {
    pub fn label(self) -> &'static str {
        match self {
            GraphKind::Barras => "Barras",
            GraphKind::Pizza => "Pizza",
        }
    }
}

/// One picker's options in the sidebar form: the column, its label, and the
/// selectable values (`all` first, then the observed categories).
#[derive(Debug, Clone)]
pub struct PickerOptions {
    pub column: String,
    pub label: String,
    pub values: Vec<String>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Pipeline state: loaded table plus memo caches.
    pub session: Session,

    /// Result of the last pipeline evaluation (None until a file loads).
    pub view: Option<ViewModel>,

    /// Startup configuration (logo path).
    pub config: AppConfig,
    /// `file://` URI for the sidebar logo, resolved once at startup.
    pub logo_uri: Option<String>,
    /// A logo was configured but the file is absent; show a warning label.
    pub logo_missing: bool,

    // ---- sidebar form state ----
    pub graph_kind: GraphKind,
    /// Observed min/max of the age column, fixed for this table's session.
    pub age_bounds: (i64, i64),
    /// The slider pair's current value.
    pub age_selection: (i64, i64),
    /// Picker options per filter column present in the upload.
    pub pickers: Vec<PickerOptions>,
    /// Current multiselect picks, defaulting to `{all}` per column.
    pub selections: BTreeMap<String, BTreeSet<String>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let config = AppConfig::load();
        let logo_uri = config
            .logo_if_present()
            .map(|p| format!("file://{}", p.display()));
        let logo_missing = logo_uri.is_none() && config.logo.is_some();
        AppState {
            session: Session::default(),
            view: None,
            config,
            logo_uri,
            logo_missing,
            graph_kind: GraphKind::Barras,
            age_bounds: (0, 0),
            age_selection: (0, 0),
            pickers: Vec::new(),
            selections: BTreeMap::new(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Run the pipeline for an uploaded file and, on success, rebuild the
    /// sidebar form from the fresh table.
    pub fn handle_upload(&mut self, name: String, bytes: Vec<u8>) {
        match render(&mut self.session, UiEvent::FileUploaded { name, bytes }) {
            Ok(view) => {
                if let ViewModel::Loaded { raw } = &view {
                    let columns: Vec<&str> = FILTER_COLUMNS.iter().map(|(c, _)| *c).collect();
                    let spec = FilterSpec::passthrough(raw, &columns);
                    self.age_bounds = spec.age_range;
                    self.age_selection = spec.age_range;
                    self.pickers = FILTER_COLUMNS
                        .iter()
                        .filter(|(col, _)| spec.selections.contains_key(*col))
                        .map(|(col, label)| {
                            let mut values = vec![SELECT_ALL.to_string()];
                            values.extend(raw.unique_values(col).iter().map(|v| v.to_string()));
                            PickerOptions {
                                column: col.to_string(),
                                label: label.to_string(),
                                values,
                            }
                        })
                        .collect();
                    self.selections = spec.selections;
                }
                self.view = Some(view);
                self.status_message = None;
            }
            Err(e) => {
                self.view = None;
                self.pickers.clear();
                self.selections.clear();
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// The filter spec the form currently describes.
    pub fn current_spec(&self) -> FilterSpec {
        FilterSpec {
            age_range: self.age_selection,
            selections: self.selections.clone(),
        }
    }

    /// Submit the filter form: one synchronous pipeline evaluation.
    pub fn apply_filters(&mut self) {
        let spec = self.current_spec();
        match render(&mut self.session, UiEvent::FiltersApplied(spec)) {
            Ok(view) => {
                self.view = Some(view);
                self.status_message = None;
            }
            Err(e) => {
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Toggle one value in a column's multiselect.
    pub fn toggle_selection(&mut self, column: &str, value: &str) {
        let selected = self.selections.entry(column.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    pub fn is_selected(&self, column: &str, value: &str) -> bool {
        self.selections
            .get(column)
            .is_some_and(|s| s.contains(value))
    }
}
