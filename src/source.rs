use crate::error::{LookupError, Result};
use std::collections::HashMap;

/// Anything that can return the raw cell rows of a named worksheet.
///
/// Rows come back exactly as stored: row 0 is metadata, row 1 the header,
/// data from row 2 onwards. A missing worksheet is reported as
/// [`LookupError::WorksheetNotFound`].
#[allow(async_fn_in_trait)]
pub trait TableSource {
    async fn fetch_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>>;
}

impl<T: TableSource> TableSource for &T {
    async fn fetch_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        (**self).fetch_rows(sheet).await
    }
}

/// Worksheets held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    sheets: HashMap<String, Vec<Vec<String>>>,
    failures: HashMap<String, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        self.insert_sheet(name, rows);
        self
    }

    /// Makes every fetch of `name` fail with an API error carrying `message`.
    pub fn with_failure(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(name.into(), message.into());
        self
    }

    pub fn insert_sheet(&mut self, name: impl Into<String>, rows: Vec<Vec<String>>) {
        self.sheets.insert(name.into(), rows);
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sheets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl TableSource for InMemorySource {
    async fn fetch_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        if let Some(message) = self.failures.get(sheet) {
            return Err(LookupError::Api {
                status: 500,
                message: message.clone(),
            });
        }

        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| LookupError::WorksheetNotFound(sheet.to_string()))
    }
}
