use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CapGainsError;
use crate::CapGainsResult;

/// Notified cost inflation index, base year 2001-02 = 100.
/// The final row is a projection pending notification.
const BUILTIN_CII: &[(i32, u32, bool)] = &[
    (2001, 100, false),
    (2002, 105, false),
    (2003, 109, false),
    (2004, 113, false),
    (2005, 117, false),
    (2006, 122, false),
    (2007, 129, false),
    (2008, 137, false),
    (2009, 148, false),
    (2010, 167, false),
    (2011, 184, false),
    (2012, 200, false),
    (2013, 220, false),
    (2014, 240, false),
    (2015, 254, false),
    (2016, 264, false),
    (2017, 272, false),
    (2018, 280, false),
    (2019, 289, false),
    (2020, 301, false),
    (2021, 317, false),
    (2022, 331, false),
    (2023, 348, false),
    (2024, 363, false),
    (2025, 376, false),
    (2026, 394, true),
];

/// One row of the index, keyed by the calendar year the fiscal year starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiiEntry {
    pub fiscal_year: i32,
    pub value: u32,
    #[serde(default)]
    pub estimated: bool,
}

impl CiiEntry {
    pub fn notified(fiscal_year: i32, value: u32) -> Self {
        Self {
            fiscal_year,
            value,
            estimated: false,
        }
    }
}

/// How a lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CiiSource {
    /// Exact row, officially notified
    Notified,
    /// Exact row, flagged as a projection
    Estimated,
    /// Year is past the table; latest row reused
    ForwardFilled,
    /// Year precedes the base year; base row reused
    BeforeBaseYear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiiLookup {
    /// Fiscal year the date falls in
    pub fiscal_year: i32,
    /// Display label, e.g. "2024-25"
    pub label: String,
    pub value: u32,
    /// Fiscal year of the row actually used
    pub table_year: i32,
    pub source: CiiSource,
}

impl CiiLookup {
    pub fn is_exact(&self) -> bool {
        self.source == CiiSource::Notified
    }

    /// Human-readable caveat for non-notified lookups.
    pub fn caveat(&self) -> Option<String> {
        match self.source {
            CiiSource::Notified => None,
            CiiSource::Estimated => Some(format!(
                "CII {} for FY {} is an estimate pending notification",
                self.value, self.label
            )),
            CiiSource::ForwardFilled => Some(format!(
                "No CII published for FY {}; using FY {} value {} (stale)",
                self.label,
                fiscal_year_label(self.table_year),
                self.value
            )),
            CiiSource::BeforeBaseYear => Some(format!(
                "FY {} precedes the CII base year; using FY {} value {}",
                self.label,
                fiscal_year_label(self.table_year),
                self.value
            )),
        }
    }
}

/// Fiscal year (April to March) containing `date`.
pub fn fiscal_year_of(date: NaiveDate) -> i32 {
    if date.month() >= 4 {
        date.year()
    } else {
        date.year() - 1
    }
}

pub fn fiscal_year_label(fiscal_year: i32) -> String {
    format!("{}-{:02}", fiscal_year, (fiscal_year + 1).rem_euclid(100))
}

/// Ordered, monotonically non-decreasing fiscal-year → CII table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostInflationIndex {
    entries: Vec<CiiEntry>,
}

impl CostInflationIndex {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_CII
                .iter()
                .map(|&(fiscal_year, value, estimated)| CiiEntry {
                    fiscal_year,
                    value,
                    estimated,
                })
                .collect(),
        }
    }

    /// Build a table from arbitrary rows. Rows are sorted by year; duplicate
    /// years, zero values and decreasing values are rejected.
    pub fn from_entries(mut entries: Vec<CiiEntry>) -> CapGainsResult<Self> {
        if entries.is_empty() {
            return Err(CapGainsError::InvalidPolicy {
                field: "cii_table".into(),
                reason: "CII table must contain at least one year".into(),
            });
        }
        entries.sort_by_key(|e| e.fiscal_year);

        for pair in entries.windows(2) {
            if pair[0].fiscal_year == pair[1].fiscal_year {
                return Err(CapGainsError::InvalidPolicy {
                    field: "cii_table".into(),
                    reason: format!("Duplicate CII row for {}", pair[0].fiscal_year),
                });
            }
            if pair[1].value < pair[0].value {
                return Err(CapGainsError::InvalidPolicy {
                    field: "cii_table".into(),
                    reason: format!(
                        "CII must not decrease: {} -> {} between {} and {}",
                        pair[0].value, pair[1].value, pair[0].fiscal_year, pair[1].fiscal_year
                    ),
                });
            }
        }
        if entries.iter().any(|e| e.value == 0) {
            return Err(CapGainsError::InvalidPolicy {
                field: "cii_table".into(),
                reason: "CII values must be positive".into(),
            });
        }

        Ok(Self { entries })
    }

    pub fn base(&self) -> &CiiEntry {
        &self.entries[0]
    }

    pub fn latest(&self) -> &CiiEntry {
        &self.entries[self.entries.len() - 1]
    }

    /// CII for a fiscal year. Never fails: untabulated years fall back to the
    /// nearest end of the table and say so in `source`.
    pub fn lookup_year(&self, fiscal_year: i32) -> CiiLookup {
        let (row, source) = match self
            .entries
            .binary_search_by_key(&fiscal_year, |e| e.fiscal_year)
        {
            Ok(idx) => {
                let row = self.entries[idx];
                let source = if row.estimated {
                    CiiSource::Estimated
                } else {
                    CiiSource::Notified
                };
                (row, source)
            }
            Err(0) => (*self.base(), CiiSource::BeforeBaseYear),
            Err(idx) if idx >= self.entries.len() => (*self.latest(), CiiSource::ForwardFilled),
            // Gap inside the table: carry the previous year forward
            Err(idx) => (self.entries[idx - 1], CiiSource::ForwardFilled),
        };

        if matches!(source, CiiSource::ForwardFilled | CiiSource::BeforeBaseYear) {
            tracing::warn!(
                fiscal_year,
                table_year = row.fiscal_year,
                value = row.value,
                "CII year not tabulated, falling back"
            );
        }

        CiiLookup {
            fiscal_year,
            label: fiscal_year_label(fiscal_year),
            value: row.value,
            table_year: row.fiscal_year,
            source,
        }
    }

    pub fn lookup(&self, date: NaiveDate) -> CiiLookup {
        self.lookup_year(fiscal_year_of(date))
    }
}

impl Default for CostInflationIndex {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_fiscal_year_boundary() {
        assert_eq!(fiscal_year_of(d(2024, 3, 31)), 2023);
        assert_eq!(fiscal_year_of(d(2024, 4, 1)), 2024);
        assert_eq!(fiscal_year_of(d(2015, 1, 1)), 2014);
    }

    #[test]
    fn test_fiscal_year_label() {
        assert_eq!(fiscal_year_label(2024), "2024-25");
        assert_eq!(fiscal_year_label(1999), "1999-00");
    }

    #[test]
    fn test_builtin_table_is_monotonic() {
        let table = CostInflationIndex::builtin();
        assert!(CostInflationIndex::from_entries(table.entries.clone()).is_ok());
        assert_eq!(table.base().value, 100);
        assert_eq!(table.base().fiscal_year, 2001);
    }

    #[test]
    fn test_exact_lookup() {
        let table = CostInflationIndex::builtin();
        let l = table.lookup(d(2015, 6, 10));
        assert_eq!(l.value, 254);
        assert_eq!(l.label, "2015-16");
        assert!(l.is_exact());
        assert!(l.caveat().is_none());
    }

    #[test]
    fn test_jan_to_march_uses_previous_fiscal_year() {
        let table = CostInflationIndex::builtin();
        assert_eq!(table.lookup(d(2015, 1, 1)).value, 240);
        assert_eq!(table.lookup(d(2026, 1, 1)).value, 376);
    }

    #[test]
    fn test_estimated_row_is_flagged() {
        let table = CostInflationIndex::builtin();
        let l = table.lookup(d(2026, 5, 1));
        assert_eq!(l.value, 394);
        assert_eq!(l.source, CiiSource::Estimated);
        assert!(l.caveat().unwrap().contains("estimate"));
    }

    #[test]
    fn test_future_year_forward_fills_latest() {
        let table = CostInflationIndex::builtin();
        let l = table.lookup_year(2035);
        assert_eq!(l.value, table.latest().value);
        assert_eq!(l.table_year, 2026);
        assert_eq!(l.source, CiiSource::ForwardFilled);
        assert!(l.caveat().unwrap().contains("stale"));
    }

    #[test]
    fn test_before_base_year_uses_base_row() {
        let table = CostInflationIndex::builtin();
        let l = table.lookup(d(1995, 8, 1));
        assert_eq!(l.value, 100);
        assert_eq!(l.source, CiiSource::BeforeBaseYear);
    }

    #[test]
    fn test_gap_in_custom_table_carries_previous_year() {
        let table = CostInflationIndex::from_entries(vec![
            CiiEntry::notified(2020, 300),
            CiiEntry::notified(2023, 350),
        ])
        .unwrap();
        let l = table.lookup_year(2021);
        assert_eq!(l.value, 300);
        assert_eq!(l.source, CiiSource::ForwardFilled);
    }

    #[test]
    fn test_unsorted_rows_are_sorted() {
        let table = CostInflationIndex::from_entries(vec![
            CiiEntry::notified(2021, 320),
            CiiEntry::notified(2020, 300),
        ])
        .unwrap();
        assert_eq!(table.base().fiscal_year, 2020);
    }

    #[test]
    fn test_invalid_tables_rejected() {
        assert!(CostInflationIndex::from_entries(vec![]).is_err());
        assert!(CostInflationIndex::from_entries(vec![
            CiiEntry::notified(2020, 300),
            CiiEntry::notified(2020, 310),
        ])
        .is_err());
        assert!(CostInflationIndex::from_entries(vec![CiiEntry::notified(2020, 0)]).is_err());
    }
}
