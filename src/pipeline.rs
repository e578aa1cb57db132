use std::sync::Arc;

use crate::cache::{memo_key, LruMemo, Memo, NoopMemo};
use crate::data::aggregate::{distribution, Distribution};
use crate::data::error::DataError;
use crate::data::export::to_xlsx_bytes;
use crate::data::filter::{self, FilterSpec};
use crate::data::loader::load_bytes;
use crate::data::model::Table;

/// Categorical column whose distribution the dashboard compares.
pub const TARGET_COLUMN: &str = "y";

// ---------------------------------------------------------------------------
// Session – one user's isolated pipeline state
// ---------------------------------------------------------------------------

/// Owns the loaded raw table and the advisory memo caches. One session per
/// user; nothing here is shared across sessions.
pub struct Session {
    raw: Option<Arc<Table>>,
    load_cache: Box<dyn Memo<Arc<Table>>>,
    filter_cache: Box<dyn Memo<Arc<Table>>>,
    export_cache: Box<dyn Memo<Arc<Vec<u8>>>>,
}

impl Default for Session {
    fn default() -> Self {
        // Caching is advisory only; BANKVIEW_NO_CACHE turns it off entirely.
        if std::env::var_os("BANKVIEW_NO_CACHE").is_some() {
            return Session::uncached();
        }
        Session {
            raw: None,
            load_cache: Box::new(LruMemo::new(4)),
            filter_cache: Box::new(LruMemo::new(32)),
            export_cache: Box::new(LruMemo::new(16)),
        }
    }
}

impl Session {
    /// A session with caching disabled. Behavior must be indistinguishable
    /// from the default session; tests rely on that.
    pub fn uncached() -> Self {
        Session {
            raw: None,
            load_cache: Box::new(NoopMemo),
            filter_cache: Box::new(NoopMemo),
            export_cache: Box::new(NoopMemo),
        }
    }

    /// The unfiltered baseline table, if a file has been loaded.
    pub fn raw(&self) -> Option<&Arc<Table>> {
        self.raw.as_ref()
    }

    /// Encode a table for download, memoized by table identity.
    pub fn export_xlsx(&mut self, table: &Table) -> Result<Arc<Vec<u8>>, DataError> {
        let key = table.fingerprint();
        if let Some(bytes) = self.export_cache.get(key) {
            return Ok(bytes);
        }
        let bytes = Arc::new(to_xlsx_bytes(table)?);
        self.export_cache.put(key, Arc::clone(&bytes));
        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// render – the explicit pipeline entry point
// ---------------------------------------------------------------------------

/// One user interaction, as handed over by the host UI layer.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// A file was uploaded through the file picker.
    FileUploaded { name: String, bytes: Vec<u8> },
    /// The filter form was submitted.
    FiltersApplied(FilterSpec),
}

/// What the UI renders after one pipeline evaluation.
#[derive(Debug, Clone)]
pub enum ViewModel {
    /// A fresh table was loaded; no filters run yet.
    Loaded { raw: Arc<Table> },
    /// Filters ran and left at least one row.
    Filtered {
        raw: Arc<Table>,
        filtered: Arc<Table>,
        raw_distribution: Distribution,
        filtered_distribution: Distribution,
    },
    /// Filters excluded every row; no aggregation or charts to show.
    NoRowsMatched { raw: Arc<Table> },
}

/// Evaluate the full pipeline for one UI event, synchronously on the calling
/// thread. The core never re-renders on its own; the host calls this once
/// per interaction. Errors are recoverable: the session keeps waiting for
/// the next event.
pub fn render(session: &mut Session, event: UiEvent) -> Result<ViewModel, DataError> {
    match event {
        UiEvent::FileUploaded { name, bytes } => {
            let key = memo_key(&(name.as_str(), bytes.as_slice()));
            let raw = match session.load_cache.get(key) {
                Some(table) => table,
                None => {
                    let table = match load_bytes(&name, &bytes) {
                        Ok(t) => Arc::new(t),
                        Err(e) => {
                            // Failed upload means "no data loaded": later
                            // filter events must not see a stale table.
                            session.raw = None;
                            return Err(e);
                        }
                    };
                    session.load_cache.put(key, Arc::clone(&table));
                    table
                }
            };
            session.raw = Some(Arc::clone(&raw));
            Ok(ViewModel::Loaded { raw })
        }

        UiEvent::FiltersApplied(spec) => {
            let raw = session
                .raw
                .clone()
                .ok_or_else(|| DataError::Load("no data loaded".to_string()))?;

            let key = memo_key(&(raw.fingerprint(), &spec));
            let filtered = match session.filter_cache.get(key) {
                Some(table) => table,
                None => {
                    let table = Arc::new(filter::apply(&raw, &spec));
                    session.filter_cache.put(key, Arc::clone(&table));
                    table
                }
            };

            if filtered.is_empty() {
                return Ok(ViewModel::NoRowsMatched { raw });
            }

            // Both distributions are recomputed every render; the raw one is
            // stable across filter changes but cheap enough not to cache.
            let raw_distribution = distribution(&raw, TARGET_COLUMN)?;
            let filtered_distribution = distribution(&filtered, TARGET_COLUMN)?;

            Ok(ViewModel::Filtered {
                raw,
                filtered,
                raw_distribution,
                filtered_distribution,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::SELECT_ALL;
    use std::collections::{BTreeMap, BTreeSet};

    const SAMPLE_CSV: &str = "age;job;y\n25;admin;yes\n60;blue-collar;no\n";

    fn upload() -> UiEvent {
        UiEvent::FileUploaded {
            name: "bank.csv".to_string(),
            bytes: SAMPLE_CSV.as_bytes().to_vec(),
        }
    }

    fn spec(age: (i64, i64), jobs: &[&str]) -> FilterSpec {
        FilterSpec {
            age_range: age,
            selections: BTreeMap::from([(
                "job".to_string(),
                jobs.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            )]),
        }
    }

    #[test]
    fn upload_then_filter_produces_both_distributions() {
        let mut session = Session::default();
        render(&mut session, upload()).unwrap();

        let vm = render(
            &mut session,
            UiEvent::FiltersApplied(spec((20, 30), &["admin"])),
        )
        .unwrap();

        let ViewModel::Filtered {
            filtered,
            raw_distribution,
            filtered_distribution,
            ..
        } = vm
        else {
            panic!("expected a filtered view");
        };

        assert_eq!(filtered.len(), 1);
        assert_eq!(raw_distribution["no"], 50.0);
        assert_eq!(raw_distribution["yes"], 50.0);
        assert_eq!(filtered_distribution.len(), 1);
        assert_eq!(filtered_distribution["yes"], 100.0);
    }

    #[test]
    fn excluding_every_row_reports_no_data_instead_of_aggregating() {
        let mut session = Session::default();
        render(&mut session, upload()).unwrap();

        let vm = render(
            &mut session,
            UiEvent::FiltersApplied(spec((90, 99), &[SELECT_ALL])),
        )
        .unwrap();
        assert!(matches!(vm, ViewModel::NoRowsMatched { .. }));
    }

    #[test]
    fn unsupported_upload_leaves_no_table_behind() {
        let mut session = Session::default();
        let err = render(
            &mut session,
            UiEvent::FileUploaded {
                name: "bank.txt".to_string(),
                bytes: SAMPLE_CSV.as_bytes().to_vec(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(_)));
        assert!(session.raw().is_none());

        // Downstream stages refuse to run without a table.
        let err = render(
            &mut session,
            UiEvent::FiltersApplied(spec((0, 100), &[SELECT_ALL])),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Load(_)));
    }

    #[test]
    fn failed_upload_clears_a_previously_loaded_table() {
        let mut session = Session::default();
        render(&mut session, upload()).unwrap();
        assert!(session.raw().is_some());

        let _ = render(
            &mut session,
            UiEvent::FileUploaded {
                name: "bank.csv".to_string(),
                bytes: b"age;job\n25;admin\n".to_vec(),
            },
        )
        .unwrap_err();
        assert!(session.raw().is_none());
    }

    #[test]
    fn cached_and_uncached_sessions_agree() {
        let mut cached = Session::default();
        let mut uncached = Session::uncached();
        let event = UiEvent::FiltersApplied(spec((20, 30), &["admin"]));

        render(&mut cached, upload()).unwrap();
        render(&mut uncached, upload()).unwrap();

        // Render twice with the cached session so the second hit comes from
        // the memo, then compare against the cache-free result.
        let _ = render(&mut cached, event.clone()).unwrap();
        let from_cache = render(&mut cached, event.clone()).unwrap();
        let plain = render(&mut uncached, event).unwrap();

        match (from_cache, plain) {
            (
                ViewModel::Filtered {
                    filtered: a,
                    filtered_distribution: da,
                    ..
                },
                ViewModel::Filtered {
                    filtered: b,
                    filtered_distribution: db,
                    ..
                },
            ) => {
                assert_eq!(*a, *b);
                assert_eq!(da, db);
            }
            _ => panic!("expected filtered views from both sessions"),
        }
    }

    #[test]
    fn export_round_trips_through_the_session_cache() {
        let mut session = Session::default();
        render(&mut session, upload()).unwrap();
        let raw = Arc::clone(session.raw().unwrap());

        let first = session.export_xlsx(&raw).unwrap();
        let second = session.export_xlsx(&raw).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let reloaded = crate::data::loader::load_bytes("x.xlsx", &first).unwrap();
        assert_eq!(reloaded.columns, raw.columns);
    }
}
