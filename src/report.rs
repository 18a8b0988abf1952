use crate::record::Record;
use std::collections::HashMap;

/// Columns shown in the dashboard table, in display order.
///
/// The trailing credential columns (CTV, User, Password) are hidden from
/// the rendered table even though they travel with every record.
pub const DISPLAY_COLUMNS: [&str; 6] = ["Date", "Name", "Phone", "thuTuc", "Status", "Done"];

/// Format a whole-VND amount with dot thousands separators.
///
/// Matches the upstream display convention: `1234000` renders as
/// `"1.234.000 VND"`.
pub fn format_vnd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-{} VND", grouped)
    } else {
        format!("{} VND", grouped)
    }
}

/// Count records by an arbitrary string field.
///
/// Status and payment-state labels are an open enumeration tallied by exact
/// value, never a fixed set. Results are sorted by descending count, then
/// label, so summaries and bar charts are stable between requests.
///
/// # Arguments
/// * `records` - Records to tally
/// * `field` - Accessor picking the label out of a record
///
/// # Returns
/// * `Vec<(String, usize)>` - Label/count pairs, descending by count
pub fn tally<F>(records: &[Record], field: F) -> Vec<(String, usize)>
where
    F: Fn(&Record) -> &str,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(field(record)).or_insert(0) += 1;
    }

    let mut pairs: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs
}

/// Render a tally as the textual summary shown next to its bar chart.
///
/// # Arguments
/// * `heading` - Summary heading line
/// * `pairs` - Label/count pairs from [`tally`]
/// * `unit` - Unit word appended to each count (e.g. "đơn", "hồ sơ")
pub fn tally_summary(heading: &str, pairs: &[(String, usize)], unit: &str) -> String {
    let mut out = format!("{}:\n", heading);
    for (label, count) in pairs {
        out.push_str(&format!("- {}: {} {}\n", label, count, unit));
    }
    out
}

/// Project records onto the display table, hiding credential columns.
///
/// # Arguments
/// * `records` - Records to display
///
/// # Returns
/// * Rows of display cells in [`DISPLAY_COLUMNS`] order, dates rendered
///   back in `DD/MM/YYYY`
pub fn trimmed_rows(records: &[Record]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.display_date(),
                r.name.clone(),
                r.phone.clone(),
                r.procedure.clone(),
                r.status.clone(),
                r.payment_state.clone(),
            ]
        })
        .collect()
}
