//! Completed work sessions ("tomatoes") counted per calendar day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-day completed-session counts keyed by ISO date (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomatoTally {
    #[serde(default)]
    pub by_date: BTreeMap<String, u32>,
    /// All-time count. Unaffected by `reset_day`.
    #[serde(default)]
    pub total: u32,
}

fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl TomatoTally {
    /// Count one completed session on `date`.
    pub fn bump(&mut self, date: NaiveDate) -> u32 {
        let count = self.by_date.entry(day_key(date)).or_insert(0);
        *count = count.saturating_add(1);
        self.total = self.total.saturating_add(1);
        *count
    }

    pub fn on(&self, date: NaiveDate) -> u32 {
        self.by_date.get(&day_key(date)).copied().unwrap_or(0)
    }

    /// Zero the count for `date`, keeping the all-time total.
    pub fn reset_day(&mut self, date: NaiveDate) {
        if let Some(count) = self.by_date.get_mut(&day_key(date)) {
            *count = 0;
        }
    }

    /// Number of days with at least one session.
    pub fn active_days(&self) -> usize {
        self.by_date.values().filter(|&&n| n > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn bump_counts_per_day_and_total() {
        let mut tally = TomatoTally::default();
        assert_eq!(tally.bump(day(1)), 1);
        assert_eq!(tally.bump(day(1)), 2);
        assert_eq!(tally.bump(day(2)), 1);
        assert_eq!(tally.on(day(1)), 2);
        assert_eq!(tally.on(day(3)), 0);
        assert_eq!(tally.total, 3);
        assert!(tally.by_date.contains_key("2024-03-01"));
    }

    #[test]
    fn reset_day_keeps_total() {
        let mut tally = TomatoTally::default();
        tally.bump(day(1));
        tally.bump(day(2));
        tally.reset_day(day(1));
        tally.reset_day(day(9));
        assert_eq!(tally.on(day(1)), 0);
        assert_eq!(tally.total, 2);
        assert_eq!(tally.active_days(), 1);
    }

    #[test]
    fn missing_fields_default() {
        let tally: TomatoTally = serde_json::from_str(r#"{"total": 4}"#).unwrap();
        assert_eq!(tally.total, 4);
        assert!(tally.by_date.is_empty());
    }
}
