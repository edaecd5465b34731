use std::sync::LazyLock;

use regex::Regex;

static ISO_DATE: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").ok());
static MONTH_KEY: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}$").ok());
static YEAR_KEY: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]{4}$").ok());

/// Which date-like format a query has. Format only: `2026-13-40` is still a `Day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateShape {
	Day,
	Month,
	Year,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
	pub raw: String,
	pub lower: String,
	pub tokens: Vec<String>,
	pub is_iso_date: bool,
	pub is_month_key: bool,
	pub is_year_key: bool,
}
impl QueryContext {
	pub fn new(query: &str) -> Self {
		let lower = query.to_lowercase();
		let tokens = tokenize(&lower);

		Self {
			raw: query.to_string(),
			is_iso_date: is_iso_date(query),
			is_month_key: is_month_key(query),
			is_year_key: is_year_key(query),
			lower,
			tokens,
		}
	}

	pub fn date_shape(&self) -> Option<DateShape> {
		if self.is_iso_date {
			Some(DateShape::Day)
		} else if self.is_month_key {
			Some(DateShape::Month)
		} else if self.is_year_key {
			Some(DateShape::Year)
		} else {
			None
		}
	}
}

pub fn is_iso_date(value: &str) -> bool {
	matches_shape(&ISO_DATE, value)
}

pub fn is_month_key(value: &str) -> bool {
	matches_shape(&MONTH_KEY, value)
}

pub fn is_year_key(value: &str) -> bool {
	matches_shape(&YEAR_KEY, value)
}

/// Splits on every run of characters outside `[a-z0-9]`. Duplicates are kept.
pub fn tokenize(lower: &str) -> Vec<String> {
	lower
		.split(|ch: char| !(ch.is_ascii_lowercase() || ch.is_ascii_digit()))
		.filter(|token| !token.is_empty())
		.map(str::to_string)
		.collect()
}

fn matches_shape(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
	(**pattern).as_ref().map(|re| re.is_match(value)).unwrap_or(false)
}
