use std::collections::HashSet;

use crate::{
    domain::{TicketRecord, TicketStatus},
    error::RecordImportError,
};

/// Parses a JSON array of ticket records, rejecting duplicate ids.
///
/// Order is preserved: the catalog treats the supplied collection as the
/// canonical display order and never re-sorts it.
pub fn parse_records(json: &str) -> Result<Vec<TicketRecord>, RecordImportError> {
    let records: Vec<TicketRecord> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.id.clone()) {
            return Err(RecordImportError::DuplicateId {
                id: record.id.clone(),
            });
        }
    }

    Ok(records)
}

/// The demo ticket set shipped with the site, in display order.
pub fn sample_records() -> Vec<TicketRecord> {
    vec![
        TicketRecord {
            id: "ticket-005".into(),
            status: TicketStatus::Active,
            numbers: [2, 13, 24, 35, 46],
            draw_date: "Mar 24, 2025".into(),
            draw_amount: "$270,000".into(),
            purchase_date: "Mar 21, 2025".into(),
            created_at: 1_742_598_000_000,
            matched_numbers: None,
            win_amount: None,
            days_left: Some(3),
        },
        TicketRecord {
            id: "ticket-001".into(),
            status: TicketStatus::Active,
            numbers: [7, 12, 23, 34, 45],
            draw_date: "Mar 23, 2025".into(),
            draw_amount: "$250,000".into(),
            purchase_date: "Mar 20, 2025".into(),
            created_at: 1_742_511_600_000,
            matched_numbers: None,
            win_amount: None,
            days_left: Some(2),
        },
        TicketRecord {
            id: "ticket-002".into(),
            status: TicketStatus::Active,
            numbers: [3, 16, 22, 31, 42],
            draw_date: "Mar 22, 2025".into(),
            draw_amount: "$300,000".into(),
            purchase_date: "Mar 19, 2025".into(),
            created_at: 1_742_425_200_000,
            matched_numbers: None,
            win_amount: None,
            days_left: Some(1),
        },
        TicketRecord {
            id: "ticket-003".into(),
            status: TicketStatus::Finished,
            numbers: [5, 11, 18, 27, 39],
            draw_date: "Mar 20, 2025".into(),
            draw_amount: "$200,000".into(),
            purchase_date: "Mar 17, 2025".into(),
            created_at: 1_742_252_400_000,
            matched_numbers: Some("4 / 5".into()),
            win_amount: Some("No win".into()),
            days_left: None,
        },
        TicketRecord {
            id: "ticket-004".into(),
            status: TicketStatus::Winner,
            numbers: [9, 14, 25, 33, 41],
            draw_date: "Mar 18, 2025".into(),
            draw_amount: "$180,000".into(),
            purchase_date: "Mar 15, 2025".into(),
            created_at: 1_742_079_600_000,
            matched_numbers: Some("5 / 5".into()),
            win_amount: Some("$180,000".into()),
            days_left: None,
        },
        TicketRecord {
            id: "ticket-006".into(),
            status: TicketStatus::Finished,
            numbers: [3, 16, 22, 31, 42],
            draw_date: "Mar 22, 2024".into(),
            draw_amount: "$300,000".into(),
            purchase_date: "Mar 19, 2024".into(),
            created_at: 1_710_802_800_000,
            matched_numbers: Some("2 / 5".into()),
            win_amount: Some("No win".into()),
            days_left: None,
        },
        TicketRecord {
            id: "ticket-007".into(),
            status: TicketStatus::Finished,
            numbers: [5, 11, 18, 27, 39],
            draw_date: "Apr 28, 2025".into(),
            draw_amount: "$200,000".into(),
            purchase_date: "Apr 27, 2025".into(),
            created_at: 1_745_708_400_000,
            matched_numbers: Some("4 / 5".into()),
            win_amount: Some("No win".into()),
            days_left: None,
        },
        TicketRecord {
            id: "ticket-008".into(),
            status: TicketStatus::Winner,
            numbers: [9, 14, 25, 33, 41],
            draw_date: "Feb 15, 2025".into(),
            draw_amount: "$180,000".into(),
            purchase_date: "Feb 12, 2025".into(),
            created_at: 1_739_660_400_000,
            matched_numbers: Some("5 / 5".into()),
            win_amount: Some("$180,000".into()),
            days_left: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateBucket;

    #[test]
    fn parses_record_array_round_trip() {
        let records = sample_records();
        let json = serde_json::to_string(&records).expect("serialize");
        let parsed = parse_records(&json).expect("parse");
        assert_eq!(parsed, records);
    }

    #[test]
    fn rejects_duplicate_ticket_ids() {
        let mut records = sample_records();
        let dup = records[0].clone();
        records.push(dup);
        let json = serde_json::to_string(&records).expect("serialize");
        let err = parse_records(&json).expect_err("duplicate must fail");
        assert!(matches!(
            err,
            RecordImportError::DuplicateId { id } if id == "ticket-005"
        ));
    }

    #[test]
    fn conditional_fields_are_omitted_when_absent() {
        let records = sample_records();
        let active = serde_json::to_value(&records[0]).expect("active json");
        assert!(active.get("matched_numbers").is_none());
        assert!(active.get("days_left").is_some());

        let finished = serde_json::to_value(&records[3]).expect("finished json");
        assert!(finished.get("matched_numbers").is_some());
        assert!(finished.get("days_left").is_none());
    }

    #[test]
    fn unknown_bucket_key_falls_back_to_all() {
        assert_eq!(DateBucket::from_key("yesterday"), DateBucket::All);
        assert_eq!(DateBucket::from_key(""), DateBucket::Unset);
        assert_eq!(DateBucket::from_key("7-days"), DateBucket::SevenDays);
        assert!(!DateBucket::from_key("nonsense").is_active());
    }
}
