use crate::record::Record;
use chrono::NaiveDate;

/// Restrict records to one collaborator over an inclusive date range.
///
/// The collaborator match is exact and case-sensitive. Both range ends are
/// inclusive. The input is never mutated; a fresh vector of clones is
/// returned so callers can keep the full normalized set around.
///
/// # Arguments
/// * `records` - Normalized records
/// * `collaborator_id` - CTV identifier to keep
/// * `start` - First day of the range, inclusive
/// * `end` - Last day of the range, inclusive
///
/// # Returns
/// * `Vec<Record>` - Matching records, in input order
pub fn filter_records(
    records: &[Record],
    collaborator_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Record> {
    records
        .iter()
        .filter(|r| r.collaborator_id == collaborator_id)
        .filter(|r| r.date >= start && r.date <= end)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, ctv: &str) -> Record {
        Record {
            date: NaiveDate::parse_from_str(date, crate::record::DATE_FORMAT).unwrap(),
            name: String::new(),
            phone: String::new(),
            procedure: String::new(),
            status: String::new(),
            payment_state: String::new(),
            collaborator_id: ctv.to_string(),
            login_user: String::new(),
            login_password: String::new(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn keeps_only_the_requested_collaborator() {
        let records = vec![
            record("05/01/2024", "ctv01"),
            record("05/01/2024", "ctv02"),
            record("05/01/2024", "CTV01"),
        ];
        let out = filter_records(&records, "ctv01", date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].collaborator_id, "ctv01");
    }

    #[test]
    fn range_ends_are_inclusive() {
        let records = vec![
            record("31/12/2023", "ctv01"),
            record("01/01/2024", "ctv01"),
            record("15/01/2024", "ctv01"),
            record("31/01/2024", "ctv01"),
            record("01/02/2024", "ctv01"),
        ];
        let out = filter_records(&records, "ctv01", date(2024, 1, 1), date(2024, 1, 31));
        let days: Vec<u32> = out.iter().map(|r| chrono::Datelike::day(&r.date)).collect();
        assert_eq!(days, vec![1, 15, 31]);
    }

    #[test]
    fn input_is_untouched() {
        let records = vec![record("05/01/2024", "ctv01")];
        let before = records.clone();
        let _ = filter_records(&records, "nobody", date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(records, before);
    }
}
