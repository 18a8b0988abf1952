use crate::record::Record;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Payment-state value that marks an order as paid ("Đã thanh toán").
///
/// This is the only payment-state value with computational meaning; every
/// other value is an opaque label that only shows up in the tallies.
pub const PAID_MARKER: &str = "Đã thanh toán";

/// Commission owed for a single day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Commission {
    /// Payout in whole VND (all multipliers are exact, never fractional)
    pub amount: i64,

    /// Nominal rate for the tier, informational only
    pub rate: f64,
}

/// Paid-order count for one calendar day of the selected range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyCount {
    /// The day
    pub date: NaiveDate,

    /// Paid orders on that day (zero when no record exists for it)
    pub paid_orders: u32,
}

/// Total commission over a date range plus the full per-day series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommissionReport {
    /// Sum of the per-day tiered amounts, whole VND
    pub total: i64,

    /// One entry per calendar day from start to end inclusive,
    /// chronological, zero-count days included
    pub daily: Vec<DailyCount>,
}

/// Commission for one day given its paid-order count.
///
/// Tiered per-order rate: the whole day's count is paid at the rate of the
/// tier it lands in, which rewards daily consistency over per-range volume.
///
/// # Arguments
/// * `paid_orders` - Number of paid orders on the day
///
/// # Returns
/// * `Commission` - Payout amount and the tier's nominal rate
///
/// # Examples
/// ```
/// use ctv_dashboard::commission::calculate_commission;
///
/// assert_eq!(calculate_commission(14).amount, 140_000);
/// assert_eq!(calculate_commission(15).amount, 180_000);
/// assert_eq!(calculate_commission(26).amount, 390_000);
/// ```
pub fn calculate_commission(paid_orders: u32) -> Commission {
    let count = i64::from(paid_orders);
    if paid_orders < 15 {
        Commission {
            amount: count * 10_000,
            rate: 0.20,
        }
    } else if paid_orders <= 25 {
        Commission {
            amount: count * 12_000,
            rate: 0.24,
        }
    } else {
        Commission {
            amount: count * 15_000,
            rate: 0.30,
        }
    }
}

/// Compute the total commission for a date range.
///
/// Only records whose payment state equals [`PAID_MARKER`] count. The
/// per-day series always covers every calendar day from `start` to `end`
/// inclusive, so charts show gaps as zeros instead of compressing the
/// timeline. A pure function: identical inputs yield identical output.
///
/// # Arguments
/// * `records` - Normalized records (already filtered to one collaborator)
/// * `start` - First day of the range, inclusive
/// * `end` - Last day of the range, inclusive
///
/// # Returns
/// * `CommissionReport` - Total payout and the full per-day count series.
///   If `start > end` the series is empty and the total is zero.
pub fn compute(records: &[Record], start: NaiveDate, end: NaiveDate) -> CommissionReport {
    let mut per_day: HashMap<NaiveDate, u32> = HashMap::new();
    for record in records {
        if record.payment_state == PAID_MARKER {
            *per_day.entry(record.date).or_insert(0) += 1;
        }
    }

    let mut total = 0i64;
    let mut daily = Vec::new();
    let mut day = start;
    while day <= end {
        let paid_orders = per_day.get(&day).copied().unwrap_or(0);
        total += calculate_commission(paid_orders).amount;
        daily.push(DailyCount {
            date: day,
            paid_orders,
        });
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }

    CommissionReport { total, daily }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn paid_records(on: NaiveDate, count: usize) -> Vec<Record> {
        (0..count)
            .map(|i| Record {
                date: on,
                name: format!("kh{}", i),
                phone: String::new(),
                procedure: String::new(),
                status: String::new(),
                payment_state: PAID_MARKER.to_string(),
                collaborator_id: "ctv01".to_string(),
                login_user: String::new(),
                login_password: String::new(),
            })
            .collect()
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(calculate_commission(0).amount, 0);
        assert_eq!(calculate_commission(14).amount, 14 * 10_000);
        assert_eq!(calculate_commission(15).amount, 15 * 12_000);
        assert_eq!(calculate_commission(25).amount, 25 * 12_000);
        assert_eq!(calculate_commission(26).amount, 26 * 15_000);
    }

    #[test]
    fn tier_rates() {
        assert_eq!(calculate_commission(14).rate, 0.20);
        assert_eq!(calculate_commission(15).rate, 0.24);
        assert_eq!(calculate_commission(26).rate, 0.30);
    }

    #[test]
    fn fourteen_paid_orders_across_january() {
        // Scenario A: 14 paid orders on Jan 5, range covering the month
        let records = paid_records(date(2024, 1, 5), 14);
        let report = compute(&records, date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(report.total, 140_000);
        assert_eq!(report.daily.len(), 31);
        let jan5 = report.daily.iter().find(|d| d.date == date(2024, 1, 5)).unwrap();
        assert_eq!(jan5.paid_orders, 14);
        assert!(report
            .daily
            .iter()
            .filter(|d| d.date != date(2024, 1, 5))
            .all(|d| d.paid_orders == 0));
    }

    #[test]
    fn mid_tier_single_day() {
        // Scenario B
        let day = date(2024, 1, 5);
        let report = compute(&paid_records(day, 20), day, day);
        assert_eq!(report.total, 240_000);
        assert_eq!(report.daily, vec![DailyCount { date: day, paid_orders: 20 }]);
    }

    #[test]
    fn top_tier_single_day() {
        // Scenario C
        let day = date(2024, 1, 5);
        let report = compute(&paid_records(day, 30), day, day);
        assert_eq!(report.total, 450_000);
    }

    #[test]
    fn empty_records_give_full_zero_series() {
        // Scenario D
        let report = compute(&[], date(2024, 3, 1), date(2024, 3, 10));
        assert_eq!(report.total, 0);
        assert_eq!(report.daily.len(), 10);
        assert!(report.daily.iter().all(|d| d.paid_orders == 0));
    }

    #[test]
    fn inverted_range_is_empty() {
        let report = compute(&[], date(2024, 3, 10), date(2024, 3, 1));
        assert_eq!(report.total, 0);
        assert!(report.daily.is_empty());
    }

    #[test]
    fn unpaid_records_do_not_count() {
        let day = date(2024, 1, 5);
        let mut records = paid_records(day, 3);
        records[1].payment_state = "Chưa thanh toán".to_string();
        let report = compute(&records, day, day);
        assert_eq!(report.daily[0].paid_orders, 2);
        assert_eq!(report.total, 20_000);
    }

    #[test]
    fn series_covers_every_day_in_order() {
        let report = compute(&[], date(2024, 2, 27), date(2024, 3, 2));
        let days: Vec<NaiveDate> = report.daily.iter().map(|d| d.date).collect();
        assert_eq!(
            days,
            vec![
                date(2024, 2, 27),
                date(2024, 2, 28),
                date(2024, 2, 29),
                date(2024, 3, 1),
                date(2024, 3, 2),
            ]
        );
    }

    #[test]
    fn compute_is_idempotent() {
        let records = paid_records(date(2024, 1, 5), 20);
        let a = compute(&records, date(2024, 1, 1), date(2024, 1, 31));
        let b = compute(&records, date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(a, b);
    }
}
