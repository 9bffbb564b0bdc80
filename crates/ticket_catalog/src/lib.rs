use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use shared::domain::{DateBucket, MatchKind, StatusTab, TicketRecord};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

/// Quiet period after the last keystroke before a search query is evaluated.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Immutable copy of the query state, for renderers and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySnapshot {
    pub active_tab: StatusTab,
    /// Raw committed search input. `""` means no search.
    pub search_query: String,
    /// The value actually used for filtering, updated once the debounce
    /// window has elapsed without further input.
    pub evaluated_query: String,
    pub date_bucket: DateBucket,
}

/// The derived view: which records to show and why the set looks the way
/// it does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogView {
    pub records: Vec<TicketRecord>,
    pub match_kind: MatchKind,
}

#[derive(Debug, Clone)]
pub enum CatalogEvent {
    /// A debounced search query was committed for evaluation.
    SearchEvaluated { query: String },
}

struct QueryInner {
    active_tab: StatusTab,
    search_query: String,
    evaluated_query: String,
    date_bucket: DateBucket,
    /// Monotonic token for pending search evaluations; a debounce task
    /// only commits if its token is still current.
    search_generation: u64,
}

/// Derives the visible subset of a ticket collection from three inputs:
/// the status tab, a debounced free-text search over ticket ids, and a
/// mutually exclusive date bucket over `created_at`.
///
/// The record collection is supplied once at construction and treated as
/// read-only; every view is derived fresh from it.
pub struct CatalogQueryEngine {
    records: Vec<TicketRecord>,
    inner: Arc<Mutex<QueryInner>>,
    search_debounce: Duration,
    events: broadcast::Sender<CatalogEvent>,
}

impl CatalogQueryEngine {
    pub fn new(records: Vec<TicketRecord>) -> Self {
        Self::with_search_debounce(records, DEFAULT_SEARCH_DEBOUNCE)
    }

    pub fn with_search_debounce(records: Vec<TicketRecord>, debounce: Duration) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            records,
            inner: Arc::new(Mutex::new(QueryInner {
                active_tab: StatusTab::All,
                search_query: String::new(),
                evaluated_query: String::new(),
                date_bucket: DateBucket::Unset,
                search_generation: 0,
            })),
            search_debounce: debounce,
            events,
        }
    }

    /// Switches the status tab. Search and date filters are left in place
    /// and re-apply against the new tab subset on the next derivation.
    pub async fn set_tab(&self, tab: StatusTab) {
        let mut inner = self.inner.lock().await;
        debug!(?tab, "catalog tab changed");
        inner.active_tab = tab;
    }

    /// Commits new search input and schedules its evaluation after the
    /// debounce window. Any still-pending evaluation is superseded, so a
    /// burst of calls evaluates only the final value. Setting a search
    /// deactivates the date bucket.
    ///
    /// An empty query never waits: it clears the evaluated query at once.
    pub async fn set_search_query(&self, text: impl Into<String>) {
        let text = text.into();
        let generation = {
            let mut inner = self.inner.lock().await;
            inner.search_query = text.clone();
            inner.date_bucket = DateBucket::Unset;
            inner.search_generation += 1;
            if text.is_empty() {
                inner.evaluated_query.clear();
                return;
            }
            inner.search_generation
        };

        let state = Arc::clone(&self.inner);
        let events = self.events.clone();
        let debounce = self.search_debounce;
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let mut inner = state.lock().await;
            if inner.search_generation != generation {
                // Superseded by later input or a bucket change.
                return;
            }
            debug!(query = %text, "search query evaluated");
            inner.evaluated_query = text.clone();
            drop(inner);
            let _ = events.send(CatalogEvent::SearchEvaluated { query: text });
        });
    }

    /// Selects a date bucket, synchronously. Deactivates the search (raw
    /// and evaluated) and cancels any pending search evaluation.
    pub async fn set_date_bucket(&self, bucket: DateBucket) {
        let mut inner = self.inner.lock().await;
        debug!(bucket = bucket.as_key(), "date bucket changed");
        inner.date_bucket = bucket;
        inner.search_query.clear();
        inner.evaluated_query.clear();
        inner.search_generation += 1;
    }

    pub async fn query_snapshot(&self) -> QuerySnapshot {
        let inner = self.inner.lock().await;
        QuerySnapshot {
            active_tab: inner.active_tab,
            search_query: inner.search_query.clone(),
            evaluated_query: inner.evaluated_query.clone(),
            date_bucket: inner.date_bucket,
        }
    }

    pub async fn visible_results(&self) -> CatalogView {
        self.visible_results_at(Utc::now()).await
    }

    /// Derives the view against an explicit reference instant; date
    /// bucket windows are anchored to `now`.
    pub async fn visible_results_at(&self, now: DateTime<Utc>) -> CatalogView {
        let snapshot = self.query_snapshot().await;
        derive_visible(&self.records, &snapshot, now)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }
}

/// Pure derivation of the visible record list. Precedence: an active date
/// bucket wins over an evaluated search, which wins over the plain tab
/// view. Record order is always the input order.
pub fn derive_visible(
    records: &[TicketRecord],
    query: &QuerySnapshot,
    now: DateTime<Utc>,
) -> CatalogView {
    let tab_filtered: Vec<&TicketRecord> = records
        .iter()
        .filter(|record| query.active_tab.matches(record.status))
        .collect();

    if let Some(window) = bucket_window(query.date_bucket, now) {
        let records: Vec<TicketRecord> = tab_filtered
            .into_iter()
            .filter(|record| window.contains(record.created_at))
            .cloned()
            .collect();
        return CatalogView {
            match_kind: filtered_kind(&records),
            records,
        };
    }

    if !query.evaluated_query.is_empty() {
        let needle = query.evaluated_query.to_lowercase();
        let records: Vec<TicketRecord> = tab_filtered
            .into_iter()
            .filter(|record| record.id.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        return CatalogView {
            match_kind: filtered_kind(&records),
            records,
        };
    }

    CatalogView {
        records: tab_filtered.into_iter().cloned().collect(),
        match_kind: MatchKind::Default,
    }
}

fn filtered_kind(records: &[TicketRecord]) -> MatchKind {
    if records.is_empty() {
        MatchKind::FilteredEmpty
    } else {
        MatchKind::FilteredNonempty
    }
}

/// Inclusive window over `created_at` epoch milliseconds. `None` bounds
/// are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateWindow {
    start_ms: Option<i64>,
    end_ms: Option<i64>,
}

impl DateWindow {
    fn contains(&self, created_at: i64) -> bool {
        self.start_ms.map_or(true, |start| created_at >= start)
            && self.end_ms.map_or(true, |end| created_at <= end)
    }
}

fn bucket_window(bucket: DateBucket, now: DateTime<Utc>) -> Option<DateWindow> {
    match bucket {
        DateBucket::Unset | DateBucket::All => None,
        DateBucket::SevenDays => Some(DateWindow {
            start_ms: Some((now - chrono::Duration::days(7)).timestamp_millis()),
            end_ms: Some(now.timestamp_millis()),
        }),
        DateBucket::LastMonth => {
            let current_month_start = start_of_month(now);
            let previous_month_start = current_month_start
                .checked_sub_months(Months::new(1))
                .unwrap_or(current_month_start);
            Some(DateWindow {
                start_ms: Some(previous_month_start.timestamp_millis()),
                // Last instant of the previous month, at millisecond
                // resolution.
                end_ms: Some(current_month_start.timestamp_millis() - 1),
            })
        }
        DateBucket::Previous => {
            // Everything before last year started: at or before midnight
            // of 31 Dec two years back.
            let boundary = Utc
                .with_ymd_and_hms(now.year() - 2, 12, 31, 0, 0, 0)
                .single()?;
            Some(DateWindow {
                start_ms: None,
                end_ms: Some(boundary.timestamp_millis()),
            })
        }
    }
}

fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .unwrap_or_else(|| now.date_naive());
    Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
