use time::OffsetDateTime;

use crate::{date, query::QueryContext, text};

/// The text and date fields a record exposes for ranking.
///
/// Listing a field twice weights it twice; there is no other weighting between fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFields {
	pub text: Vec<Option<String>>,
	pub dates: Vec<Option<String>>,
}
impl RecordFields {
	pub fn new(text: Vec<Option<String>>, dates: Vec<Option<String>>) -> Self {
		Self { text, dates }
	}

	pub fn score(&self, ctx: &QueryContext, now: OffsetDateTime) -> u32 {
		score_fields(
			self.text.iter().map(Option::as_deref),
			self.dates.iter().map(Option::as_deref),
			ctx,
			now,
		)
	}
}

pub fn score_fields<'a, T, D>(text: T, dates: D, ctx: &QueryContext, now: OffsetDateTime) -> u32
where
	T: IntoIterator<Item = Option<&'a str>>,
	D: IntoIterator<Item = Option<&'a str>>,
{
	let text_score: u32 = text.into_iter().map(|field| text::score_text(field, ctx)).sum();
	let date_score: u32 =
		dates.into_iter().map(|field| date::score_date(field, ctx, now)).sum();

	text_score + date_score
}
