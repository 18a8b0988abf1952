#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]

use crate::commission::DailyCount;
use plotters::prelude::*;
use std::error::Error;

/// Styling options shared by the dashboard charts.
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            width: 800,
            height: 400,
        }
    }
}

/// Render a label/count tally as a bar chart.
///
/// Used for the payment-state and case-status breakdowns. Bars keep the
/// order of the input pairs, which [`crate::report::tally`] already sorts
/// by descending count.
///
/// # Arguments
/// * `pairs` - Label/count pairs to plot
/// * `options` - Chart styling options
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
pub fn render_bar_chart(
    pairs: &[(String, usize)],
    options: &ChartOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let tmp = tempfile::Builder::new().suffix(".png").tempfile()?;
    {
        let root = BitMapBackend::new(tmp.path(), (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let max_count = pairs.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1);
        let labels: Vec<&str> = pairs.iter().map(|(l, _)| l.as_str()).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d(0..pairs.len() as i32, 0..(max_count as i32 + 1))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(pairs.len().max(1))
            .x_label_formatter(&|idx| {
                labels
                    .get(*idx as usize)
                    .map(|l| l.to_string())
                    .unwrap_or_default()
            })
            .y_desc("Count")
            .draw()?;

        chart.draw_series(pairs.iter().enumerate().map(|(i, (_, count))| {
            let x = i as i32;
            let mut bar = Rectangle::new([(x, 0), (x + 1, *count as i32)], BLUE.filled());
            bar.set_margin(0, 0, 8, 8);
            bar
        }))?;

        root.present()?;
    }

    let png_data = std::fs::read(tmp.path())?;
    Ok(png_data)
}

/// Render the daily paid-order series as a line chart.
///
/// The series already covers every calendar day of the selected range, so
/// zero-count days show up as dips to the axis instead of the timeline
/// compressing around active days.
///
/// # Arguments
/// * `daily` - Full per-day paid-order series, chronological
/// * `options` - Chart styling options
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
pub fn render_daily_line_chart(
    daily: &[DailyCount],
    options: &ChartOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    if daily.is_empty() {
        return Err("empty date range".into());
    }

    let tmp = tempfile::Builder::new().suffix(".png").tempfile()?;
    {
        let root = BitMapBackend::new(tmp.path(), (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let max_count = daily.iter().map(|d| d.paid_orders).max().unwrap_or(1).max(1);
        let start = daily[0].date;
        let end = daily[daily.len() - 1].date;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d(start..end, 0..(max_count as i32 + 1))?;

        chart
            .configure_mesh()
            .x_label_formatter(&|date| date.format("%d/%m").to_string())
            .y_desc("Paid orders")
            .draw()?;

        chart.draw_series(LineSeries::new(
            daily.iter().map(|d| (d.date, d.paid_orders as i32)),
            &BLUE,
        ))?;

        root.present()?;
    }

    let png_data = std::fs::read(tmp.path())?;
    Ok(png_data)
}
