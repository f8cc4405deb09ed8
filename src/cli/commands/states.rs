//! States with events

use anyhow::Result;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::cli::output::{column, print_formatted, OutputFormat};

#[derive(Serialize)]
pub struct StateRow {
    pub code: String,
    pub name: String,
    pub events: usize,
}

pub fn rows(catalog: &Catalog) -> Vec<StateRow> {
    catalog
        .counts_by_state()
        .into_iter()
        .map(|(code, events)| StateRow {
            name: code.display_name().to_string(),
            code: code.as_str().to_string(),
            events,
        })
        .collect()
}

pub fn format_rows(rows: &[StateRow]) -> String {
    if rows.is_empty() {
        return "Nenhum estado com eventos".to_string();
    }
    rows.iter()
        .map(|row| format!("{}  {}  {:>3}", column(&row.code, 3), column(&row.name, 20), row.events))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn run(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let rows = rows(catalog);
    print_formatted(&rows, format, |rows| format_rows(rows));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_sorted_with_counts() {
        let json = r#"[
            {"name": "A", "date": "2025-01", "city": "X", "state": "SP", "url": "u"},
            {"name": "B", "date": "2025-01", "city": "X", "state": "BA", "url": "u"},
            {"name": "C", "date": "2025-01", "city": "X", "state": "SP", "url": "u"}
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let rows = rows(&catalog);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "BA");
        assert_eq!(rows[0].name, "Bahia");
        assert_eq!(rows[1].code, "SP");
        assert_eq!(rows[1].events, 2);
    }

    #[test]
    fn test_empty_catalog_message() {
        assert_eq!(format_rows(&[]), "Nenhum estado com eventos");
    }
}
