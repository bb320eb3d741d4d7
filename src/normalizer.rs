//! Turns raw worksheet cells into searchable [`Record`]s.
//!
//! Steps applied to every worksheet, in order: header deduplication, row
//! assembly, blank-row removal, day-first date parsing on `DATA` and
//! Brazilian amount parsing on `VALOR`.

use crate::error::{LookupError, Result};
use crate::schema::{
    Record, Table, COL_CARRO, COL_DATA, COL_FORNECEDOR, COL_PEDIDO, COL_STATUS, COL_UNIDADE,
    COL_VALOR,
};
use crate::utils::expand_two_digit_year;
use chrono::NaiveDate;
use log::debug;
use std::collections::HashMap;

/// Physical row holding the column labels; row 0 is free-form metadata.
pub const HEADER_ROW_INDEX: usize = 1;
/// First physical row carrying data.
pub const FIRST_DATA_ROW_INDEX: usize = 2;

/// Uppercases and trims header labels, then suffixes repeats with `_1`, `_2`, ...
pub fn dedup_headers<S: AsRef<str>>(raw_headers: &[S]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut unique = Vec::with_capacity(raw_headers.len());

    for raw in raw_headers {
        let label = raw.as_ref().trim().to_uppercase();
        match seen.get_mut(&label) {
            Some(count) => {
                *count += 1;
                unique.push(format!("{}_{}", label, count));
            }
            None => {
                seen.insert(label.clone(), 0);
                unique.push(label);
            }
        }
    }

    unique
}

/// Parses a Brazilian monetary cell such as `"R$ 1.234,56"`.
///
/// Absent or unparsable input yields `0.0`.
pub fn parse_amount(value: Option<&str>) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };

    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, 'R' | '$' | '.') && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount,
        _ => 0.0,
    }
}

/// Parses a day-first date, discarding any time of day.
///
/// Accepts `DD/MM/YYYY`, `DD-MM-YYYY`, `DD.MM.YYYY`, two-digit years and
/// year-first ISO dates (`YYYY-MM-DD`).
pub fn parse_day_first_date(value: &str) -> Option<NaiveDate> {
    let date_part = value
        .trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()?;

    let parts: Vec<&str> = date_part.split(['/', '-', '.']).collect();
    if parts.len() != 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let (year, month, day) = if parts[0].len() == 4 {
        (parts[0], parts[1], parts[2])
    } else {
        (parts[2], parts[1], parts[0])
    };

    let year = match year.len() {
        2 => expand_two_digit_year(year.parse().ok()?),
        4 => year.parse().ok()?,
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

/// Trimmed, uppercased form used on both sides of an order-id comparison.
pub fn normalize_order_id(order_id: &str) -> String {
    order_id.trim().to_uppercase()
}

struct ColumnIndex {
    pedido: Option<usize>,
    status: Option<usize>,
    data: Option<usize>,
    valor: Option<usize>,
    unidade: Option<usize>,
    carro: Option<usize>,
    fornecedor: Option<usize>,
}

impl ColumnIndex {
    fn new(columns: &[String]) -> Self {
        let position = |name: &str| columns.iter().position(|c| c == name);
        Self {
            pedido: position(COL_PEDIDO),
            status: position(COL_STATUS),
            data: position(COL_DATA),
            valor: position(COL_VALOR),
            unidade: position(COL_UNIDADE),
            carro: position(COL_CARRO),
            fornecedor: position(COL_FORNECEDOR),
        }
    }
}

fn cell<'a>(row: &[Option<&'a str>], index: Option<usize>) -> Option<&'a str> {
    index.and_then(|i| row.get(i).copied().flatten())
}

fn text(row: &[Option<&str>], index: Option<usize>) -> String {
    cell(row, index).unwrap_or_default().to_string()
}

/// Normalizes a header row plus its data rows into a [`Table`].
///
/// Rows with every cell empty are dropped. When a `DATA` column exists,
/// rows whose date cannot be parsed are dropped as well.
pub fn normalize<S: AsRef<str>>(header_row: &[S], data_rows: &[Vec<S>]) -> Table {
    let columns = dedup_headers(header_row);
    let index = ColumnIndex::new(&columns);

    let mut blank_rows = 0usize;
    let mut undated_rows = 0usize;
    let mut records = Vec::with_capacity(data_rows.len());

    for raw in data_rows {
        // Short rows are padded with absent cells; cells past the header are ignored.
        let row: Vec<Option<&str>> = (0..columns.len())
            .map(|i| {
                raw.get(i)
                    .map(|c| c.as_ref())
                    .filter(|c| !c.is_empty())
            })
            .collect();

        if row.iter().all(Option::is_none) {
            blank_rows += 1;
            continue;
        }

        let date = cell(&row, index.data).and_then(parse_day_first_date);
        if index.data.is_some() && date.is_none() {
            undated_rows += 1;
            continue;
        }

        records.push(Record {
            order_id: text(&row, index.pedido),
            status: text(&row, index.status),
            date,
            amount: parse_amount(cell(&row, index.valor)),
            requesting_unit: text(&row, index.unidade),
            vehicle_usage: text(&row, index.carro),
            supplier: text(&row, index.fornecedor),
        });
    }

    debug!(
        "Normalized {} rows: kept {}, dropped {} blank and {} undated",
        data_rows.len(),
        records.len(),
        blank_rows,
        undated_rows
    );

    Table { columns, records }
}

/// Normalizes a full worksheet dump, header on the second physical row.
pub fn normalize_sheet(sheet: &str, rows: &[Vec<String>]) -> Result<Table> {
    if rows.len() <= HEADER_ROW_INDEX {
        return Err(LookupError::MalformedSheet {
            sheet: sheet.to_string(),
            details: format!(
                "expected a header on row {}, worksheet has {} row(s)",
                HEADER_ROW_INDEX + 1,
                rows.len()
            ),
        });
    }

    let data_rows = rows.get(FIRST_DATA_ROW_INDEX..).unwrap_or_default();
    Ok(normalize(&rows[HEADER_ROW_INDEX], data_rows))
}

/// All records whose `PEDIDO` matches `order_id`, in table order.
pub fn find_all<'a>(table: &'a Table, order_id: &str) -> impl Iterator<Item = &'a Record> + 'a {
    let wanted = normalize_order_id(order_id);
    let searchable = !wanted.is_empty() && table.has_column(COL_PEDIDO) && !table.is_empty();

    table
        .records
        .iter()
        .filter(move |record| searchable && normalize_order_id(&record.order_id) == wanted)
}

/// First record whose `PEDIDO` matches `order_id`.
pub fn find<'a>(table: &'a Table, order_id: &str) -> Option<&'a Record> {
    find_all(table, order_id).next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn header() -> Vec<String> {
        row(&[
            "pedido",
            "STATUS",
            " data ",
            "VALOR",
            "UNIDADE",
            "CARRO | UTILIZAÇÃO",
            "FORNECEDOR",
        ])
    }

    #[test]
    fn test_dedup_headers() {
        assert_eq!(dedup_headers(&["A", "B", "A", "A"]), vec!["A", "B", "A_1", "A_2"]);
    }

    #[test]
    fn test_dedup_headers_trims_and_uppercases() {
        assert_eq!(
            dedup_headers(&[" pedido", "Pedido ", "", "", "x"]),
            vec!["PEDIDO", "PEDIDO_1", "", "_1", "X"]
        );
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(Some("R$ 1.234,56")), 1234.56);
        assert_eq!(parse_amount(Some("1234,5")), 1234.5);
        assert_eq!(parse_amount(Some("R$ 1.000.000,00")), 1_000_000.0);
        assert_eq!(parse_amount(Some("-R$ 12,30")), -12.3);
        assert_eq!(parse_amount(Some("")), 0.0);
        assert_eq!(parse_amount(None), 0.0);
        assert_eq!(parse_amount(Some("abc")), 0.0);
        assert_eq!(parse_amount(Some("nan")), 0.0);
    }

    #[test]
    fn test_parse_day_first_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        assert_eq!(parse_day_first_date("03/06/2025"), Some(expected));
        assert_eq!(parse_day_first_date("3/6/2025"), Some(expected));
        assert_eq!(parse_day_first_date("03-06-2025"), Some(expected));
        assert_eq!(parse_day_first_date("03.06.25"), Some(expected));
        assert_eq!(parse_day_first_date(" 03/06/2025 14:30:00 "), Some(expected));
        assert_eq!(parse_day_first_date("2025-06-03"), Some(expected));
        assert_eq!(parse_day_first_date("2025-06-03T08:00:00"), Some(expected));
    }

    #[test]
    fn test_parse_day_first_date_rejects_garbage() {
        assert_eq!(parse_day_first_date(""), None);
        assert_eq!(parse_day_first_date("amanhã"), None);
        assert_eq!(parse_day_first_date("31/02/2025"), None);
        assert_eq!(parse_day_first_date("03/06"), None);
        assert_eq!(parse_day_first_date("03/06/202"), None);
    }

    #[test]
    fn test_normalize_drops_blank_and_undated_rows() {
        let rows = vec![
            row(&["1/2025", "PAGO", "02/06/2025", "R$ 10,00", "BH", "CARRO 10", "ACME"]),
            row(&["", "", "", "", "", "", ""]),
            row(&["2/2025", "PENDENTE", "sem data", "R$ 5,00", "BH", "", "ACME"]),
            row(&["3/2025", "PENDENTE", "", "R$ 5,00", "BH", "", "ACME"]),
        ];

        let table = normalize(&header(), &rows);
        assert_eq!(table.columns[0], "PEDIDO");
        assert_eq!(table.columns[2], "DATA");
        assert_eq!(table.len(), 1);

        let record = &table.records[0];
        assert_eq!(record.order_id, "1/2025");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 6, 2));
        assert_eq!(record.amount, 10.0);
        assert_eq!(record.vehicle_usage, "CARRO 10");
        assert_eq!(record.supplier, "ACME");
    }

    #[test]
    fn test_normalize_pads_short_rows_and_zeroes_bad_amounts() {
        let rows = vec![row(&["7/2025", "PAGO", "10/06/2025", "a combinar"])];
        let table = normalize(&header(), &rows);

        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].amount, 0.0);
        assert_eq!(table.records[0].supplier, "");
    }

    #[test]
    fn test_normalize_without_date_column_keeps_rows() {
        let rows = vec![row(&["8/2025", "R$ 3,50"])];
        let table = normalize(&row(&["PEDIDO", "VALOR"]), &rows);

        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].date, None);
        assert_eq!(table.records[0].amount, 3.5);
    }

    #[test]
    fn test_duplicate_date_column_uses_first_occurrence() {
        let rows = vec![row(&["9/2025", "01/06/2025", "invalid"])];
        let table = normalize(&row(&["PEDIDO", "DATA", "DATA"]), &rows);

        assert_eq!(table.columns, vec!["PEDIDO", "DATA", "DATA_1"]);
        assert_eq!(table.records[0].date, NaiveDate::from_ymd_opt(2025, 6, 1));
    }

    #[test]
    fn test_normalize_sheet_skips_metadata_row() {
        let rows = vec![
            row(&["Planilha de pedidos", "", ""]),
            row(&["PEDIDO", "DATA", "VALOR"]),
            row(&["10/2025", "05/06/2025", "R$ 1,00"]),
        ];
        let table = normalize_sheet("ALTA", &rows).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].order_id, "10/2025");
    }

    #[test]
    fn test_normalize_sheet_without_header_is_malformed() {
        let rows = vec![row(&["only metadata"])];
        let err = normalize_sheet("ALTA", &rows).unwrap_err();
        assert!(matches!(err, LookupError::MalformedSheet { .. }));
    }

    #[test]
    fn test_find_is_case_and_whitespace_insensitive() {
        let rows = vec![
            row(&["AB12", "PAGO", "02/06/2025"]),
            row(&["ab12", "PENDENTE", "03/06/2025"]),
        ];
        let table = normalize(&row(&["PEDIDO", "STATUS", "DATA"]), &rows);

        let found = find(&table, " ab12 ").unwrap();
        assert_eq!(found.status, "PAGO");
        assert_eq!(find_all(&table, "AB12").count(), 2);
        assert!(find(&table, "AB13").is_none());
        assert!(find(&table, "   ").is_none());
    }

    #[test]
    fn test_find_requires_pedido_column() {
        let rows = vec![row(&["AB12", "02/06/2025"])];
        let table = normalize(&row(&["CODIGO", "DATA"]), &rows);
        assert_eq!(table.len(), 1);
        assert!(find(&table, "").is_none());
        assert!(find(&table, "AB12").is_none());
    }
}
