//! View statistics - lifetime counters plus a bounded daily series per event

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::value_objects::EntityId;

/// Number of daily buckets kept per event
pub const MAX_DAILY_BUCKETS: usize = 90;

/// Where a view happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Page,
    Popup,
}

impl ViewKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Popup => "popup",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "page" => Some(Self::Page),
            "popup" => Some(Self::Popup),
            _ => None,
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DailyViews {
    pub page: i64,
    pub popup: i64,
    pub total: i64,
}

impl DailyViews {
    fn bump(&mut self, kind: ViewKind) {
        match kind {
            ViewKind::Page => self.page += 1,
            ViewKind::Popup => self.popup += 1,
        }
        self.total += 1;
    }
}

/// Lifetime counters without the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub page_count: i64,
    pub popup_count: i64,
    pub total_count: i64,
    pub last_viewed_at: Option<DateTime<Utc>>,
}

/// Aggregate view statistics for one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewStat {
    pub object_id: EntityId,
    pub page_count: i64,
    pub popup_count: i64,
    pub total_count: i64,
    pub last_viewed_at: Option<DateTime<Utc>>,
    /// Ordered by date; never longer than [`MAX_DAILY_BUCKETS`]
    pub daily: BTreeMap<NaiveDate, DailyViews>,
}

impl ViewStat {
    /// Empty stats for an event that has never been viewed
    pub fn new(object_id: EntityId) -> Self {
        Self {
            object_id,
            page_count: 0,
            popup_count: 0,
            total_count: 0,
            last_viewed_at: None,
            daily: BTreeMap::new(),
        }
    }

    /// Count one view on `date`, then drop the oldest days beyond the window
    pub fn record(&mut self, kind: ViewKind, date: NaiveDate, at: DateTime<Utc>) {
        match kind {
            ViewKind::Page => self.page_count += 1,
            ViewKind::Popup => self.popup_count += 1,
        }
        self.total_count += 1;
        self.last_viewed_at = Some(at);

        self.daily.entry(date).or_default().bump(kind);

        while self.daily.len() > MAX_DAILY_BUCKETS {
            self.daily.pop_first();
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            page_count: self.page_count,
            popup_count: self.popup_count,
            total_count: self.total_count,
            last_viewed_at: self.last_viewed_at,
        }
    }
}
