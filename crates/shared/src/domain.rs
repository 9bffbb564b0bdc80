use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of drawn/selected numbers on every ticket.
pub const TICKET_NUMBER_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Active,
    Finished,
    Winner,
}

/// Coarse status filter shown as tabs above the ticket list.
///
/// `Finished` covers both drawn-and-lost and drawn-and-won tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTab {
    #[default]
    All,
    Active,
    Finished,
}

impl StatusTab {
    pub fn matches(self, status: TicketStatus) -> bool {
        match self {
            StatusTab::All => true,
            StatusTab::Active => status == TicketStatus::Active,
            StatusTab::Finished => {
                matches!(status, TicketStatus::Finished | TicketStatus::Winner)
            }
        }
    }
}

/// Named date-range filter over `created_at`.
///
/// `Unset` and `All` are both inactive, but they are distinct states:
/// editing the search box clears the bucket to `Unset`, while `All` is an
/// explicit selection in the bucket dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateBucket {
    #[default]
    #[serde(rename = "")]
    Unset,
    #[serde(rename = "all")]
    All,
    #[serde(rename = "7-days")]
    SevenDays,
    #[serde(rename = "last-month")]
    LastMonth,
    #[serde(rename = "previous")]
    Previous,
}

impl DateBucket {
    /// Parses a bucket key. Unknown keys degrade to `All` (no date filter)
    /// instead of failing.
    pub fn from_key(key: &str) -> Self {
        match key {
            "" => DateBucket::Unset,
            "all" => DateBucket::All,
            "7-days" => DateBucket::SevenDays,
            "last-month" => DateBucket::LastMonth,
            "previous" => DateBucket::Previous,
            _ => DateBucket::All,
        }
    }

    pub fn as_key(self) -> &'static str {
        match self {
            DateBucket::Unset => "",
            DateBucket::All => "all",
            DateBucket::SevenDays => "7-days",
            DateBucket::LastMonth => "last-month",
            DateBucket::Previous => "previous",
        }
    }

    /// Whether this bucket actually narrows the result set.
    pub fn is_active(self) -> bool {
        !matches!(self, DateBucket::Unset | DateBucket::All)
    }
}

/// How the currently visible result set was produced, so a renderer can
/// tell "empty tab" apart from "filter matched nothing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    Default,
    FilteredEmpty,
    FilteredNonempty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: String,
    pub status: TicketStatus,
    pub numbers: [u8; TICKET_NUMBER_COUNT],
    pub draw_date: String,
    pub purchase_date: String,
    /// Purchase instant in epoch milliseconds. The only date field the
    /// catalog filters on; the display strings above stay opaque.
    pub created_at: i64,
    pub draw_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_numbers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_left: Option<u32>,
}

impl TicketRecord {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }
}
