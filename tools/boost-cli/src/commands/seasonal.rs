//! Show the seasonal index for a month.

use anyhow::{Context as _, Result};
use boost_engine::pricing::factors::{is_holiday_season, is_payday_window, seasonal_index};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::SeasonalArgs;
use crate::context::Context;

#[derive(Debug, Serialize)]
struct SeasonalDay {
    date: NaiveDate,
    weekday: String,
    payday: bool,
    holiday: bool,
    index: f64,
}

/// Run the seasonal command.
pub fn run(args: SeasonalArgs, ctx: &Context) -> Result<()> {
    let days = month_days(&args.month)?;

    if ctx.output.is_json() {
        ctx.output.json(&days);
        return Ok(());
    }

    ctx.output.header(&format!("Seasonal index for {}", args.month));
    let widths = [12, 4, 8, 8, 6];
    ctx.output
        .table_row(&["DATE", "DAY", "PAYDAY", "HOLIDAY", "INDEX"], &widths);
    for day in &days {
        ctx.output.table_row(
            &[
                day.date.to_string().as_str(),
                day.weekday.as_str(),
                if day.payday { "yes" } else { "" },
                if day.holiday { "yes" } else { "" },
                format!("{:.2}", day.index).as_str(),
            ],
            &widths,
        );
    }

    Ok(())
}

fn month_days(month: &str) -> Result<Vec<SeasonalDay>> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", month))?;

    Ok(first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .map(|date| SeasonalDay {
            date,
            weekday: date.weekday().to_string(),
            payday: is_payday_window(date),
            holiday: is_holiday_season(date),
            index: seasonal_index(date),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_days() {
        let days = month_days("2026-02").unwrap();
        assert_eq!(days.len(), 28);
        assert!(days[0].payday);

        let december = month_days("2026-12").unwrap();
        assert!(december.iter().all(|d| d.holiday));

        assert!(month_days("2026-13").is_err());
    }
}
