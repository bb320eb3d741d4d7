use crate::backup_window::{BackupWindow, BackupWindowResolver};
use crate::cache::TableCache;
use crate::clock::{Clock, FixedOffsetClock};
use crate::config::LookupConfig;
use crate::normalizer::{find, normalize_sheet};
use crate::schema::{
    LoadedTables, LookupHit, LookupOutcome, SourceDiagnostic, Table, ALTA_SHEET,
    EMERGENCIAL_SHEET,
};
use crate::source::TableSource;
use crate::utils::format_iso_date;
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::time::Duration;

/// Names of the two fixed worksheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetNames {
    pub alta: String,
    pub emergencial: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            alta: ALTA_SHEET.to_string(),
            emergencial: EMERGENCIAL_SHEET.to_string(),
        }
    }
}

/// Fetches one worksheet and normalizes it. Any failure degrades to an
/// empty table; failures other than "not found" are recorded in `diagnostics`.
pub async fn load_table<S: TableSource>(
    source: &S,
    sheet: &str,
    diagnostics: &mut Vec<SourceDiagnostic>,
) -> Table {
    debug!("Loading worksheet '{}'", sheet);

    let result = source
        .fetch_rows(sheet)
        .await
        .and_then(|rows| normalize_sheet(sheet, &rows));

    match result {
        Ok(table) => {
            info!("Loaded worksheet '{}' with {} record(s)", sheet, table.len());
            table
        }
        Err(e) if e.is_not_found() => {
            warn!("Worksheet '{}' not found, treating it as empty", sheet);
            Table::empty()
        }
        Err(e) => {
            error!("Failed to load worksheet '{}': {}", sheet, e);
            diagnostics.push(SourceDiagnostic {
                sheet: sheet.to_string(),
                message: e.to_string(),
            });
            Table::empty()
        }
    }
}

/// Loads ALTA, EMERGENCIAL and the backup worksheet for `today`, one after another.
pub async fn load_tables<S: TableSource>(
    source: &S,
    sheets: &SheetNames,
    today: NaiveDate,
) -> LoadedTables {
    let backup_window = BackupWindowResolver::resolve(today);
    let mut diagnostics = Vec::new();

    let alta = load_table(source, &sheets.alta, &mut diagnostics).await;
    let emergencial = load_table(source, &sheets.emergencial, &mut diagnostics).await;
    let backup = load_table(source, &backup_window.label(), &mut diagnostics).await;

    LoadedTables {
        alta,
        emergencial,
        backup,
        backup_window,
        diagnostics,
    }
}

/// Searches every loaded table for `query`, keeping the first match of each.
pub fn search_tables(tables: &LoadedTables, query: &str) -> LookupOutcome {
    let hits: Vec<LookupHit> = tables
        .sources()
        .into_iter()
        .filter_map(|(origin, table)| {
            find(table, query).map(|record| LookupHit {
                origin,
                record: record.clone(),
            })
        })
        .collect();

    info!("Order '{}' found in {} table(s)", query.trim(), hits.len());

    LookupOutcome {
        query: query.to_string(),
        hits,
        backup_window: tables.backup_window,
        diagnostics: tables.diagnostics.clone(),
    }
}

/// Purchase-order lookup over an injected table source and clock, with a
/// per-day table cache.
pub struct OrderLookup<S, C = FixedOffsetClock> {
    source: S,
    clock: C,
    sheets: SheetNames,
    cache: TableCache,
}

impl<S: TableSource> OrderLookup<S, FixedOffsetClock> {
    pub fn from_config(source: S, config: &LookupConfig) -> Self {
        OrderLookup::new(source, FixedOffsetClock::new(config.utc_offset_minutes))
            .with_sheet_names(SheetNames {
                alta: config.alta_sheet.clone(),
                emergencial: config.emergencial_sheet.clone(),
            })
            .with_cache_ttl(Duration::from_secs(config.cache_ttl_secs))
    }
}

impl<S: TableSource, C: Clock> OrderLookup<S, C> {
    pub fn new(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            sheets: SheetNames::default(),
            cache: TableCache::default(),
        }
    }

    pub fn with_sheet_names(mut self, sheets: SheetNames) -> Self {
        self.sheets = sheets;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = TableCache::new(ttl);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// The backup window tracked today.
    pub fn backup_window(&self) -> BackupWindow {
        BackupWindowResolver::resolve(self.clock.today())
    }

    /// Fetches all three tables, bypassing the cache.
    pub async fn load_tables(&self) -> LoadedTables {
        load_tables(&self.source, &self.sheets, self.clock.today()).await
    }

    /// Looks `query` up in today's tables, loading them on a cache miss.
    ///
    /// An empty query returns an outcome without hits and fetches nothing.
    pub async fn search(&mut self, query: &str) -> LookupOutcome {
        let today = self.clock.today();

        if query.trim().is_empty() {
            return LookupOutcome {
                query: query.to_string(),
                hits: Vec::new(),
                backup_window: BackupWindowResolver::resolve(today),
                diagnostics: Vec::new(),
            };
        }

        let key = format_iso_date(today);
        match self.cache.get(&key) {
            Some(tables) => {
                debug!("Serving order lookup from cached tables for {}", key);
                search_tables(tables, query)
            }
            None => {
                let loaded = load_tables(&self.source, &self.sheets, today).await;
                let tables = self.cache.insert(key, loaded);
                search_tables(tables, query)
            }
        }
    }

    /// Operator-triggered reload: the next search fetches fresh tables.
    pub fn reload(&mut self) {
        info!("Reload requested, clearing cached tables");
        self.cache.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::schema::SourceTable;
    use crate::source::InMemorySource;
    use futures::executor::block_on;
    use std::cell::Cell;

    fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn sheet(data: &[&[&str]]) -> Vec<Vec<String>> {
        let mut all = rows(&[&["Controle de pedidos", "", ""], &["PEDIDO", "DATA", "VALOR"]]);
        all.extend(rows(data));
        all
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    #[test]
    fn test_load_tables_isolates_failures() {
        let source = InMemorySource::new()
            .with_sheet("ALTA", sheet(&[&["1/2025", "02/06/2025", "R$ 10,00"]]))
            .with_failure("EMERGENCIAL", "quota exceeded");

        let tables = block_on(load_tables(&source, &SheetNames::default(), tuesday()));

        assert_eq!(tables.alta.len(), 1);
        assert!(tables.emergencial.is_empty());
        assert!(tables.backup.is_empty());
        assert_eq!(tables.backup_window.label(), "26.05 a 30.05");

        // Missing backup tab is silent; the API failure is reported.
        assert_eq!(tables.diagnostics.len(), 1);
        assert_eq!(tables.diagnostics[0].sheet, "EMERGENCIAL");
        assert!(tables.diagnostics[0].message.contains("quota exceeded"));
    }

    #[test]
    fn test_malformed_sheet_is_reported() {
        let source = InMemorySource::new().with_sheet("ALTA", rows(&[&["only metadata"]]));
        let tables = block_on(load_tables(&source, &SheetNames::default(), tuesday()));

        assert!(tables.alta.is_empty());
        assert_eq!(tables.diagnostics.len(), 1);
        assert_eq!(tables.diagnostics[0].sheet, "ALTA");
    }

    #[test]
    fn test_search_reports_one_hit_per_table() {
        let source = InMemorySource::new()
            .with_sheet("ALTA", sheet(&[&["5/2025", "02/06/2025", "R$ 1,00"]]))
            .with_sheet(
                "EMERGENCIAL",
                sheet(&[
                    &["5/2025", "03/06/2025", "R$ 2,00"],
                    &["5/2025", "04/06/2025", "R$ 3,00"],
                ]),
            )
            .with_sheet("26.05 a 30.05", sheet(&[&["6/2025", "27/05/2025", "R$ 4,00"]]));

        let mut lookup = OrderLookup::new(source, FixedClock(tuesday()));
        let outcome = block_on(lookup.search(" 5/2025 "));

        assert_eq!(outcome.hits.len(), 2);
        assert_eq!(outcome.hits[0].origin, SourceTable::Alta);
        assert_eq!(outcome.hits[1].origin, SourceTable::Emergencial);
        assert_eq!(outcome.hits[1].record.amount, 2.0);

        let backup = block_on(lookup.search("6/2025"));
        assert_eq!(backup.hits.len(), 1);
        assert_eq!(backup.hits[0].origin.label(), "26.05 a 30.05");
    }

    #[test]
    fn test_empty_query_fetches_nothing() {
        let source = InMemorySource::new().with_failure("ALTA", "should not be called");
        let mut lookup = OrderLookup::new(source, FixedClock(tuesday()));

        let outcome = block_on(lookup.search("   "));
        assert!(outcome.is_empty_query());
        assert!(outcome.diagnostics.is_empty());
    }

    struct CountingSource {
        inner: InMemorySource,
        fetches: Cell<usize>,
    }

    impl TableSource for CountingSource {
        async fn fetch_rows(&self, sheet: &str) -> crate::error::Result<Vec<Vec<String>>> {
            self.fetches.set(self.fetches.get() + 1);
            self.inner.fetch_rows(sheet).await
        }
    }

    #[test]
    fn test_cache_and_reload() {
        let source = CountingSource {
            inner: InMemorySource::new().with_sheet("ALTA", sheet(&[&["7/2025", "02/06/2025", ""]])),
            fetches: Cell::new(0),
        };
        let mut lookup = OrderLookup::new(&source, FixedClock(tuesday()))
            .with_cache_ttl(Duration::from_secs(3600));

        assert_eq!(block_on(lookup.search("7/2025")).hits.len(), 1);
        assert_eq!(source.fetches.get(), 3);

        assert!(block_on(lookup.search("8/2025")).is_not_found());
        assert_eq!(source.fetches.get(), 3);

        lookup.reload();
        assert_eq!(block_on(lookup.search("7/2025")).hits.len(), 1);
        assert_eq!(source.fetches.get(), 6);
    }

    #[test]
    fn test_zero_ttl_always_refetches() {
        let source = CountingSource {
            inner: InMemorySource::new(),
            fetches: Cell::new(0),
        };
        let mut lookup =
            OrderLookup::new(&source, FixedClock(tuesday())).with_cache_ttl(Duration::ZERO);

        block_on(lookup.search("1/2025"));
        block_on(lookup.search("1/2025"));
        assert_eq!(source.fetches.get(), 6);
    }
}
