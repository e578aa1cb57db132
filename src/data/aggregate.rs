use std::collections::BTreeMap;

use super::error::DataError;
use super::model::{CellValue, Table};

/// Percentage breakdown of a column's categories: label → share of rows.
/// `BTreeMap` keeps labels sorted ascending for display and export.
pub type Distribution = BTreeMap<String, f64>;

/// Normalized value counts of `target`, as percentages summing to ~100.
///
/// The pipeline guards against empty tables before calling this; the
/// [`DataError::EmptyAggregationInput`] arm is a safety net, not a user-facing
/// path.
pub fn distribution(table: &Table, target: &str) -> Result<Distribution, DataError> {
    if table.is_empty() {
        return Err(DataError::EmptyAggregationInput);
    }
    let idx = table
        .column_index(target)
        .ok_or_else(|| DataError::Load(format!("missing column '{target}'")))?;

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in &table.rows {
        if let Some(v) = row.get(idx) {
            if matches!(v, CellValue::Null) {
                continue;
            }
            *counts.entry(v.to_string()).or_default() += 1;
        }
    }

    let total: usize = counts.values().sum();
    if total == 0 {
        return Err(DataError::EmptyAggregationInput);
    }
    Ok(counts
        .into_iter()
        .map(|(label, n)| (label, n as f64 / total as f64 * 100.0))
        .collect())
}

/// Render a distribution as a two-column table (`target` label + percent)
/// so it can go through the regular spreadsheet exporter.
pub fn distribution_table(dist: &Distribution, target: &str) -> Table {
    let rows = dist
        .iter()
        .map(|(label, pct)| {
            vec![
                CellValue::String(label.clone()),
                CellValue::Float(*pct),
            ]
        })
        .collect();
    Table::new(vec![target.to_string(), "percent".to_string()], rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_y(values: &[&str]) -> Table {
        Table::new(
            vec!["y".into()],
            values
                .iter()
                .map(|v| vec![CellValue::String(v.to_string())])
                .collect(),
        )
    }

    #[test]
    fn even_split_gives_fifty_fifty() {
        let dist = distribution(&table_with_y(&["yes", "no"]), "y").unwrap();
        assert_eq!(dist.len(), 2);
        assert_eq!(dist["no"], 50.0);
        assert_eq!(dist["yes"], 50.0);
    }

    #[test]
    fn single_category_is_one_hundred_percent() {
        let dist = distribution(&table_with_y(&["yes"]), "y").unwrap();
        assert_eq!(dist["yes"], 100.0);
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let dist = distribution(
            &table_with_y(&["a", "b", "b", "c", "c", "c", "c"]),
            "y",
        )
        .unwrap();
        let sum: f64 = dist.values().sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn labels_are_sorted_ascending() {
        let dist = distribution(&table_with_y(&["zebra", "apple", "mango"]), "y").unwrap();
        let labels: Vec<&String> = dist.keys().collect();
        assert_eq!(labels, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn empty_table_is_rejected() {
        let empty = Table::new(vec!["y".into()], Vec::new());
        assert!(matches!(
            distribution(&empty, "y"),
            Err(DataError::EmptyAggregationInput)
        ));
    }

    #[test]
    fn null_cells_do_not_count_as_a_category() {
        let mut table = table_with_y(&["yes", "yes", "no"]);
        table.rows.push(vec![CellValue::Null]);
        let dist = distribution(&table, "y").unwrap();
        assert_eq!(dist.len(), 2);
        let sum: f64 = dist.values().sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn distribution_table_keeps_label_order() {
        let dist = distribution(&table_with_y(&["yes", "no"]), "y").unwrap();
        let table = distribution_table(&dist, "y");
        assert_eq!(table.columns, vec!["y", "percent"]);
        assert_eq!(table.rows[0][0], CellValue::String("no".into()));
        assert_eq!(table.rows[1][0], CellValue::String("yes".into()));
    }
}
