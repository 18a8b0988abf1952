use chrono::NaiveDate;
use ctv_dashboard::commission::{PAID_MARKER, calculate_commission, compute};
use ctv_dashboard::record::Record;

// Helper to build n paid records on one day
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

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Test the tier function across every boundary
fn test_tier_boundaries() {
    println!("\n====== Testing calculate_commission ======");
    for c in 0u32..15 {
        assert_eq!(calculate_commission(c).amount, i64::from(c) * 10_000);
    }
    for c in 15u32..=25 {
        assert_eq!(calculate_commission(c).amount, i64::from(c) * 12_000);
    }
    for c in 26u32..200 {
        assert_eq!(calculate_commission(c).amount, i64::from(c) * 15_000);
    }
    println!("✓ Amounts match the tier multipliers for counts 0..200");

    assert_eq!(calculate_commission(14).rate, 0.20);
    assert_eq!(calculate_commission(15).rate, 0.24);
    assert_eq!(calculate_commission(25).rate, 0.24);
    assert_eq!(calculate_commission(26).rate, 0.30);
    println!("✓ Rate markers switch at 15 and 26");
}

// Test range computation over a month with one active day
fn test_range_totals() {
    println!("\n====== Testing compute over a range ======");
    let records = paid_records(date(2024, 1, 5), 14);
    let report = compute(&records, date(2024, 1, 1), date(2024, 1, 31));
    assert_eq!(report.total, 140_000);
    assert_eq!(report.daily.len(), 31);
    println!("✓ 14 paid orders on one day of January total 140.000");

    let day = date(2024, 1, 5);
    assert_eq!(compute(&paid_records(day, 20), day, day).total, 240_000);
    assert_eq!(compute(&paid_records(day, 30), day, day).total, 450_000);
    println!("✓ Single-day totals hit the mid and top tiers");
}

// Test that the series always spans the full range
fn test_full_series() {
    println!("\n====== Testing the full date sequence ======");
    let report = compute(&[], date(2024, 2, 1), date(2024, 4, 30));
    assert_eq!(report.daily.len(), 29 + 31 + 30);
    assert!(report.daily.iter().all(|d| d.paid_orders == 0));
    assert_eq!(report.total, 0);
    println!("✓ Empty records still yield one zero entry per calendar day");

    let inverted = compute(&[], date(2024, 4, 30), date(2024, 2, 1));
    assert!(inverted.daily.is_empty());
    assert_eq!(inverted.total, 0);
    println!("✓ Inverted range yields an empty series and zero total");
}

fn main() {
    test_tier_boundaries();
    test_range_totals();
    test_full_series();
    println!("\nAll commission tests passed!");
}
