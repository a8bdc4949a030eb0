//! Locating and parsing the seismic table in the fetched markup.
//!
//! This is the fragile end of the pipeline: table selection and column
//! mapping are heuristics tied to the page's current visual layout. There
//! is no semantic validation of the extracted fields, so a layout change
//! that still matches the marker text will produce shifted data rather
//! than an error.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::TableNotFoundError;
use crate::types::SeismicRecord;

/// Cap on extracted records per run.
///
/// Applied to candidate rows before the cell-count filter, so a table with
/// malformed rows among its first ten can yield fewer than ten records
/// even when more valid rows follow. Matches the upstream behavior;
/// flagged for review in DESIGN.md.
pub const MAX_RECORDS: usize = 10;

/// A row needs at least this many cells to be usable.
const MIN_CELLS: usize = 4;

/// Extract up to [`MAX_RECORDS`] records from the report page markup.
///
/// Table selection: the first `<table>` whose full text contains
/// `"Magnitud"` or `"IGP/CENSIS"`. Rows come from `<tbody>` when present,
/// otherwise all `<tr>` minus the leading header row.
pub fn extract_records(html: &str) -> Result<Vec<SeismicRecord>, TableNotFoundError> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").unwrap();

    let table = document
        .select(&table_selector)
        .find(|t| {
            let text: String = t.text().collect();
            text.contains("Magnitud") || text.contains("IGP/CENSIS")
        })
        .ok_or(TableNotFoundError)?;

    let rows = data_rows(table);
    let candidate_count = rows.len();

    let td_selector = Selector::parse("td").unwrap();
    let mut records = Vec::new();

    for row in rows.into_iter().take(MAX_RECORDS) {
        let cells: Vec<ElementRef> = row.select(&td_selector).collect();
        if cells.len() < MIN_CELLS {
            warn!(cells = cells.len(), "skipping row with too few cells");
            continue;
        }

        // Column layout of the rendered IGP table:
        // 0: report id, 1: epicenter reference, 2: local date/time, 3: magnitude.
        records.push(SeismicRecord::new(
            cell_text(&cells[0]),
            cell_text(&cells[1]),
            cell_text(&cells[2]),
            cell_text(&cells[3]),
        ));
    }

    debug!(
        candidates = candidate_count,
        extracted = records.len(),
        "table rows extracted"
    );
    Ok(records)
}

/// Rows holding data: `tbody > tr` when a tbody exists, otherwise every
/// `tr` except the first (treated as the header).
fn data_rows(table: ElementRef) -> Vec<ElementRef> {
    let tbody_rows = Selector::parse("tbody tr").unwrap();
    let all_rows = Selector::parse("tr").unwrap();

    let from_tbody: Vec<ElementRef> = table.select(&tbody_rows).collect();
    if !from_tbody.is_empty() {
        return from_tbody;
    }
    table.select(&all_rows).skip(1).collect()
}

/// Concatenated text of a cell, trimmed and with internal runs of
/// whitespace collapsed to single spaces.
fn cell_text(cell: &ElementRef) -> String {
    let raw: String = cell.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_rows(rows: &str) -> String {
        format!(
            "<html><body><h1>Sismos reportados</h1>\
             <table><thead><tr><th>Reporte</th><th>Referencia</th>\
             <th>Fecha y hora local</th><th>Magnitud</th></tr></thead>\
             <tbody>{rows}</tbody></table></body></html>"
        )
    }

    fn row(report: &str, location: &str, datetime: &str, magnitude: &str) -> String {
        format!(
            "<tr><td>{report}</td><td>{location}</td><td>{datetime}</td><td>{magnitude}</td></tr>"
        )
    }

    #[test]
    fn test_extracts_fields_by_column_position() {
        let html = table_with_rows(&row(
            "IGP/CENSIS/RS 2026-0412",
            "23 km al SO de Chilca, Cañete - Lima",
            "28/08/2026 14:05:33",
            "4.2",
        ));

        let records = extract_records(&html).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].origin_report, "IGP/CENSIS/RS 2026-0412");
        assert_eq!(records[0].location, "23 km al SO de Chilca, Cañete - Lima");
        assert_eq!(records[0].local_datetime, "28/08/2026 14:05:33");
        assert_eq!(records[0].magnitude, "4.2");
    }

    #[test]
    fn test_whitespace_is_trimmed_and_collapsed() {
        let html = table_with_rows(
            "<tr><td>  IGP/CENSIS/RS\n 2026-0001 </td><td> Lima\t\tPerú </td>\
             <td>\n 01/01/2026  </td><td> 5.1 </td></tr>",
        );

        let records = extract_records(&html).unwrap();
        assert_eq!(records[0].origin_report, "IGP/CENSIS/RS 2026-0001");
        assert_eq!(records[0].location, "Lima Perú");
        assert_eq!(records[0].local_datetime, "01/01/2026");
        assert_eq!(records[0].magnitude, "5.1");
    }

    #[test]
    fn test_cap_at_ten_records() {
        let rows: String = (0..12)
            .map(|i| row(&format!("RS-{i}"), "Lima", "01/01/2026", "4.0"))
            .collect();
        let records = extract_records(&table_with_rows(&rows)).unwrap();

        assert_eq!(records.len(), MAX_RECORDS);
        assert_eq!(records[0].origin_report, "RS-0");
        assert_eq!(records[9].origin_report, "RS-9");
    }

    #[test]
    fn test_short_rows_are_skipped_without_refill() {
        // Row 2 has only two cells: skipped, and its slot is not refilled.
        let rows = [
            row("RS-0", "Lima", "01/01/2026", "4.0"),
            "<tr><td>RS-1</td><td>Lima</td></tr>".to_string(),
            row("RS-2", "Lima", "01/01/2026", "4.1"),
        ]
        .concat();

        let records = extract_records(&table_with_rows(&rows)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].origin_report, "RS-0");
        assert_eq!(records[1].origin_report, "RS-2");
    }

    #[test]
    fn test_cap_applies_before_cell_filter() {
        // 10 candidate rows where one is malformed: only 9 records come
        // out even though an 11th valid row exists.
        let mut rows = String::new();
        for i in 0..10 {
            if i == 4 {
                rows.push_str("<tr><td>broken</td></tr>");
            } else {
                rows.push_str(&row(&format!("RS-{i}"), "Lima", "01/01/2026", "4.0"));
            }
        }
        rows.push_str(&row("RS-10", "Lima", "01/01/2026", "4.0"));

        let records = extract_records(&table_with_rows(&rows)).unwrap();
        assert_eq!(records.len(), 9);
        assert!(!records.iter().any(|r| r.origin_report == "RS-10"));
    }

    #[test]
    fn test_no_tbody_falls_back_to_rows_minus_header() {
        let html = format!(
            "<table><tr><th>Reporte</th><th>Referencia</th><th>Fecha</th>\
             <th>Magnitud</th></tr>{}</table>",
            row("RS-0", "Arequipa", "02/02/2026", "3.9")
        );

        let records = extract_records(&html).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location, "Arequipa");
    }

    #[test]
    fn test_selects_first_matching_table() {
        // First table has no marker text; second matches via "IGP/CENSIS".
        let html = format!(
            "<table><tr><td>nav</td><td>links</td><td>a</td><td>b</td></tr></table>\
             <table><tbody>{}</tbody></table>",
            row("IGP/CENSIS/RS 2026-0007", "Ica", "03/03/2026", "4.4")
        );
        let records = extract_records(&html).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].origin_report, "IGP/CENSIS/RS 2026-0007");
    }

    #[test]
    fn test_no_tables_is_table_not_found() {
        let html = "<html><body><p>Magnitud mencionada, pero sin tabla</p></body></html>";
        assert!(extract_records(html).is_err());
    }

    #[test]
    fn test_tables_without_marker_text_are_rejected() {
        let html = "<table><tr><td>a</td><td>b</td><td>c</td><td>d</td></tr></table>";
        assert!(extract_records(html).is_err());
    }

    #[test]
    fn test_same_markup_yields_disjoint_ids() {
        let html = table_with_rows(&row("RS-0", "Lima", "01/01/2026", "4.0"));
        let first = extract_records(&html).unwrap();
        let second = extract_records(&html).unwrap();
        assert_ne!(first[0].id, second[0].id);
        assert_eq!(first[0].origin_report, second[0].origin_report);
    }
}
