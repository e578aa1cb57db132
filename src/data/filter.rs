use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, Table};

/// Sentinel option in a multiselect meaning "no restriction on this column".
/// Its presence wins over any co-selected concrete values.
pub const SELECT_ALL: &str = "all";

/// Column the numeric range filter runs over.
pub const AGE_COLUMN: &str = "age";

// ---------------------------------------------------------------------------
// FilterSpec – one form submission's worth of filtering criteria
// ---------------------------------------------------------------------------

/// The combined filtering criteria for one pass: an inclusive age range plus
/// a selected-value set per categorical column. Hashable so the session can
/// memoize filter results across reactive re-renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSpec {
    /// Inclusive `[min, max]` bounds over [`AGE_COLUMN`].
    pub age_range: (i64, i64),
    /// column name → selected values; a set containing [`SELECT_ALL`]
    /// leaves that column unfiltered.
    pub selections: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSpec {
    /// A spec that keeps every row of `table`: full observed age range,
    /// every selection defaulting to the `all` sentinel.
    pub fn passthrough(table: &Table, columns: &[&str]) -> Self {
        let age_range = table.numeric_bounds(AGE_COLUMN).unwrap_or((0, 0));
        let selections = columns
            .iter()
            .filter(|c| table.column_index(c).is_some())
            .map(|c| {
                (
                    (*c).to_string(),
                    BTreeSet::from([SELECT_ALL.to_string()]),
                )
            })
            .collect();
        FilterSpec {
            age_range,
            selections,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter application
// ---------------------------------------------------------------------------

/// Apply a full [`FilterSpec`]: the age range filter first, then each
/// categorical filter in turn. Filters compose by conjunction, so the order
/// only affects how much work later passes see, never the result. Every pass
/// builds a fresh table; an all-excluding spec yields an empty table, not an
/// error.
pub fn apply(table: &Table, spec: &FilterSpec) -> Table {
    let mut current = range_filter(table, AGE_COLUMN, spec.age_range);
    for (column, selected) in &spec.selections {
        current = multiselect_filter(&current, column, selected);
    }
    current
}

/// Keep rows whose `column` value lies within `[min, max]` inclusive.
/// Rows with a missing or non-numeric value are dropped.
pub fn range_filter(table: &Table, column: &str, (min, max): (i64, i64)) -> Table {
    let Some(idx) = table.column_index(column) else {
        log::warn!("range filter on unknown column '{column}', leaving table unchanged");
        return table.clone();
    };
    let rows = table
        .rows
        .iter()
        .filter(|row| {
            row.get(idx)
                .and_then(CellValue::as_f64)
                .is_some_and(|v| v >= min as f64 && v <= max as f64)
        })
        .cloned()
        .collect();
    Table::new(table.columns.clone(), rows)
}

/// Keep rows whose `column` value (rendered as text) is in `selected`.
/// The [`SELECT_ALL`] sentinel short-circuits to the identity regardless of
/// anything else in the set.
pub fn multiselect_filter(table: &Table, column: &str, selected: &BTreeSet<String>) -> Table {
    if selected.contains(SELECT_ALL) {
        return table.clone();
    }
    let Some(idx) = table.column_index(column) else {
        log::warn!("multiselect filter on unknown column '{column}', leaving table unchanged");
        return table.clone();
    };
    let rows = table
        .rows
        .iter()
        .filter(|row| {
            row.get(idx)
                .is_some_and(|v| selected.contains(&v.to_string()))
        })
        .cloned()
        .collect();
    Table::new(table.columns.clone(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["age".into(), "job".into(), "y".into()],
            vec![
                vec![
                    CellValue::Integer(25),
                    CellValue::String("admin".into()),
                    CellValue::String("yes".into()),
                ],
                vec![
                    CellValue::Integer(60),
                    CellValue::String("blue-collar".into()),
                    CellValue::String("no".into()),
                ],
            ],
        )
    }

    fn spec(age: (i64, i64), jobs: &[&str]) -> FilterSpec {
        FilterSpec {
            age_range: age,
            selections: BTreeMap::from([(
                "job".to_string(),
                jobs.iter().map(|s| s.to_string()).collect(),
            )]),
        }
    }

    #[test]
    fn range_and_multiselect_compose_by_conjunction() {
        let table = sample();
        let filtered = apply(&table, &spec((20, 30), &["admin"]));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows[0][1], CellValue::String("admin".into()));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let table = sample();
        let filtered = apply(&table, &spec((25, 60), &[SELECT_ALL]));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn all_sentinel_wins_over_co_selected_values() {
        let table = sample();
        // "all" plus a concrete value: the column filter must be a no-op.
        let filtered = apply(&table, &spec((0, 100), &[SELECT_ALL, "admin"]));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn filtered_table_is_never_larger_than_input() {
        let table = sample();
        for jobs in [vec![SELECT_ALL], vec!["admin"], vec!["nobody"]] {
            let filtered = apply(&table, &spec((0, 100), &jobs));
            assert!(filtered.len() <= table.len());
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let table = sample();
        let s = spec((20, 30), &["admin"]);
        let once = apply(&table, &s);
        let twice = apply(&once, &s);
        assert_eq!(once, twice);
    }

    #[test]
    fn excluding_every_row_yields_an_empty_table() {
        let table = sample();
        let filtered = apply(&table, &spec((90, 99), &[SELECT_ALL]));
        assert!(filtered.is_empty());
        assert_eq!(filtered.columns, table.columns);
    }

    #[test]
    fn rows_with_null_age_are_dropped_by_the_range_filter() {
        let mut table = sample();
        table.rows.push(vec![
            CellValue::Null,
            CellValue::String("admin".into()),
            CellValue::String("yes".into()),
        ]);
        let filtered = apply(&table, &spec((0, 100), &[SELECT_ALL]));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn passthrough_spec_keeps_every_row() {
        let table = sample();
        let s = FilterSpec::passthrough(&table, &["job", "not_present"]);
        assert_eq!(s.age_range, (25, 60));
        assert!(!s.selections.contains_key("not_present"));
        assert_eq!(apply(&table, &s), table);
    }
}
