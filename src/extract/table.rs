//! Table extraction

use super::strategy::element_text;
use super::Table;
use scraper::{Html, Selector};

/// Lifts every table in the document
///
/// Every `th` in a table becomes a header and every `tr` with at least one
/// `td` becomes a row. Tables with neither headers nor rows are skipped.
pub fn extract_tables(document: &Html) -> Vec<Table> {
    let (Ok(table_sel), Ok(th_sel), Ok(tr_sel), Ok(td_sel)) = (
        Selector::parse("table"),
        Selector::parse("th"),
        Selector::parse("tr"),
        Selector::parse("td"),
    ) else {
        return Vec::new();
    };

    let mut tables = Vec::new();
    for table in document.select(&table_sel) {
        let headers: Vec<String> = table.select(&th_sel).map(element_text).collect();

        let rows: Vec<Vec<String>> = table
            .select(&tr_sel)
            .map(|tr| tr.select(&td_sel).map(element_text).collect::<Vec<_>>())
            .filter(|cells| !cells.is_empty())
            .collect();

        if headers.is_empty() && rows.is_empty() {
            continue;
        }
        tables.push(Table { headers, rows });
    }
    tables
}
