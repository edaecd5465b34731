use time::{
	Date, Month, OffsetDateTime, PrimitiveDateTime, UtcOffset,
	format_description::{
		BorrowedFormatItem,
		well_known::{Rfc2822, Rfc3339},
	},
	macros::format_description,
};

use crate::query::{self, QueryContext};

pub const EXACT_DAY: u32 = 420;
pub const SAME_MONTH: u32 = 240;
pub const SAME_YEAR: u32 = 130;
pub const CONTAINS_QUERY: u32 = 70;

const SECONDS_PER_DAY: f64 = 86_400.0;
/// Inclusive day-distance ceilings and their bonus, nearest first.
const RECENCY_STEPS: [(f64, u32); 4] = [(2.0, 24), (7.0, 18), (30.0, 12), (90.0, 6)];

const DAY_KEY: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const LOCAL_T: &[BorrowedFormatItem<'_>] = format_description!(
	"[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);
const LOCAL_SPACE: &[BorrowedFormatItem<'_>] = format_description!(
	"[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
);

/// Scores one date-like field: a shape tier (first match wins) plus a freshness bonus.
pub fn score_date(field: Option<&str>, ctx: &QueryContext, now: OffsetDateTime) -> u32 {
	let Some(key) = field.and_then(resolve_date_key) else { return 0 };
	let mut score = 0;

	if ctx.is_iso_date && key == ctx.raw {
		score += EXACT_DAY;
	} else if ctx.is_month_key && key.starts_with(&format!("{}-", ctx.raw)) {
		score += SAME_MONTH;
	} else if ctx.is_year_key && key.starts_with(&format!("{}-", ctx.raw)) {
		score += SAME_YEAR;
	} else if key.contains(ctx.lower.as_str()) {
		score += CONTAINS_QUERY;
	}

	score + recency_bonus(&key, now)
}

/// Resolves a date-like value to its `YYYY-MM-DD` key.
///
/// ISO-shaped values are returned verbatim, without calendar validation. Anything else is
/// parsed as a timestamp and reduced to its UTC calendar day.
pub fn resolve_date_key(value: &str) -> Option<String> {
	if value.is_empty() {
		return None;
	}
	if query::is_iso_date(value) {
		return Some(value.to_string());
	}

	parse_utc_date(value).map(date_key)
}

pub fn date_key(date: Date) -> String {
	format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

/// Bonus for how close `key` (taken at UTC midnight) is to `now`. Keys that are ISO-shaped but
/// not real calendar days earn nothing.
pub fn recency_bonus(key: &str, now: OffsetDateTime) -> u32 {
	let Ok(date) = Date::parse(key, DAY_KEY) else { return 0 };
	let midnight = date.midnight().assume_utc();
	let days = ((now - midnight).as_seconds_f64() / SECONDS_PER_DAY).abs();

	RECENCY_STEPS
		.iter()
		.find(|(ceiling, _)| days <= *ceiling)
		.map(|(_, bonus)| *bonus)
		.unwrap_or(0)
}

fn parse_utc_date(value: &str) -> Option<Date> {
	if let Ok(ts) = OffsetDateTime::parse(value, &Rfc3339) {
		return Some(ts.to_offset(UtcOffset::UTC).date());
	}
	if let Ok(ts) = OffsetDateTime::parse(value, &Rfc2822) {
		return Some(ts.to_offset(UtcOffset::UTC).date());
	}

	for format in [LOCAL_T, LOCAL_SPACE] {
		if let Ok(ts) = PrimitiveDateTime::parse(value, format) {
			return Some(ts.date());
		}
	}

	if query::is_month_key(value) {
		return first_day(&value[..4], &value[5..7]);
	}
	if query::is_year_key(value) {
		return first_day(value, "01");
	}

	None
}

fn first_day(year: &str, month: &str) -> Option<Date> {
	let year = year.parse::<i32>().ok()?;
	let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;

	Date::from_calendar_date(year, month, 1).ok()
}
