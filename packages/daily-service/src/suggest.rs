use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	DailyService, Result, SearchHit, SearchRecord, Source, ViewerSource, settle, validate_query,
	viewer_fetch,
};
use daily_domain::{query::QueryContext, rank};
use daily_storage::queries::RecordFilter;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestRequest {
	pub q: String,
	/// Raw `limit` parameter; parsed leniently.
	pub limit: Option<String>,
	#[serde(default)]
	pub viewer: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestResponse {
	pub results: Vec<SearchHit>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub failed_sources: Vec<String>,
}

impl DailyService {
	pub async fn suggest(&self, req: SuggestRequest) -> Result<SuggestResponse> {
		self.suggest_at(req, OffsetDateTime::now_utc()).await
	}

	/// As [`DailyService::suggest`], with recency measured against `now`.
	pub async fn suggest_at(
		&self,
		req: SuggestRequest,
		now: OffsetDateTime,
	) -> Result<SuggestResponse> {
		let cfg = &self.cfg.search.suggest;
		let query = req.q.trim();
		let limit = parse_limit(req.limit.as_deref(), cfg.default_limit, cfg.max_limit);

		if query.chars().count() < self.cfg.search.min_query_chars as usize {
			return Ok(SuggestResponse::default());
		}

		validate_query(query)?;

		let ctx = QueryContext::new(query);
		let pattern = RecordFilter::Pattern(query.to_string());
		let pattern_or_date = RecordFilter::PatternOrDate(query.to_string());
		let backend = self.backend.as_ref();
		let fetch_limit = cfg.fetch_limit;
		let (profiles, threads, posts, comments, games, badges, anomalies, plays) = tokio::join!(
			backend.search(Source::Profiles, &pattern, fetch_limit),
			backend.search(Source::ForumThreads, &pattern_or_date, fetch_limit),
			backend.search(Source::ForumPosts, &pattern, fetch_limit),
			backend.search(Source::Comments, &pattern_or_date, fetch_limit),
			backend.search(Source::DailyGames, &pattern_or_date, fetch_limit),
			backend.search(Source::Badges, &pattern, fetch_limit),
			backend.search(Source::Anomalies, &pattern, fetch_limit),
			viewer_fetch(backend, ViewerSource::Plays, req.viewer, cfg.play_fetch_limit),
		);
		let batches = [
			(Source::Profiles.as_str(), profiles),
			(Source::ForumThreads.as_str(), threads),
			(Source::ForumPosts.as_str(), posts),
			(Source::Comments.as_str(), comments),
			(Source::DailyGames.as_str(), games),
			(Source::Badges.as_str(), badges),
			(Source::Anomalies.as_str(), anomalies),
			(ViewerSource::Plays.as_str(), plays),
		];
		let mut failures = Vec::new();
		let mut candidates: Vec<(SearchRecord, u32)> = Vec::new();

		for (label, result) in batches {
			for record in settle(label, result, &mut failures) {
				let score = record.fields().score(&ctx, now);

				candidates.push((record, score));
			}
		}

		let scored = candidates.len();
		let results: Vec<SearchHit> =
			rank::rank(candidates, limit).iter().map(|record| record.to_hit(query)).collect();

		tracing::debug!(
			query,
			scored,
			returned = results.len(),
			failed = failures.len(),
			"Suggest search completed."
		);

		Ok(SuggestResponse {
			results,
			failed_sources: failures.into_iter().map(|failure| failure.source).collect(),
		})
	}
}

/// Resolves the requested result count.
///
/// An absent value takes `default_limit`, as does anything that is not a finite number. A blank
/// value counts as zero. Decimal, exponent and `0x`/`0o`/`0b` integer forms are accepted.
/// Numbers are clamped into `1..=max_limit` and fractions are truncated.
pub fn parse_limit(raw: Option<&str>, default_limit: u32, max_limit: u32) -> usize {
	let Some(raw) = raw else { return default_limit as usize };
	let trimmed = raw.trim();
	let value = if trimmed.is_empty() {
		0.0
	} else {
		match parse_number(trimmed) {
			Some(value) => value,
			None => return default_limit as usize,
		}
	};

	if !value.is_finite() {
		return default_limit as usize;
	}

	value.clamp(1.0, f64::from(max_limit.max(1))).trunc() as usize
}

fn parse_number(text: &str) -> Option<f64> {
	let radix = match text.get(..2) {
		Some("0x" | "0X") => 16,
		Some("0o" | "0O") => 8,
		Some("0b" | "0B") => 2,
		_ => return text.parse().ok(),
	};
	let digits = &text[2..];

	if digits.is_empty() {
		return None;
	}

	digits.chars().try_fold(0.0, |acc: f64, ch| {
		ch.to_digit(radix).map(|digit| acc * f64::from(radix) + f64::from(digit))
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn limit_defaults_and_clamps() {
		assert_eq!(parse_limit(None, 8, 20), 8);
		assert_eq!(parse_limit(Some("5"), 8, 20), 5);
		assert_eq!(parse_limit(Some(" 12 "), 8, 20), 12);
		assert_eq!(parse_limit(Some("500"), 8, 20), 20);
		assert_eq!(parse_limit(Some("0"), 8, 20), 1);
		assert_eq!(parse_limit(Some("-3"), 8, 20), 1);
		assert_eq!(parse_limit(Some(""), 8, 20), 1);
	}

	#[test]
	fn limit_ignores_garbage_and_truncates_fractions() {
		assert_eq!(parse_limit(Some("abc"), 8, 20), 8);
		assert_eq!(parse_limit(Some("NaN"), 8, 20), 8);
		assert_eq!(parse_limit(Some("inf"), 8, 20), 8);
		assert_eq!(parse_limit(Some("2.9"), 8, 20), 2);
		assert_eq!(parse_limit(Some("1e1"), 8, 20), 10);
	}

	#[test]
	fn limit_accepts_prefixed_integers() {
		assert_eq!(parse_limit(Some("0x10"), 8, 20), 16);
		assert_eq!(parse_limit(Some("0b11"), 8, 20), 3);
		assert_eq!(parse_limit(Some("0o7"), 8, 20), 7);
		assert_eq!(parse_limit(Some("0xffffffffffffffffffff"), 8, 20), 20);
		assert_eq!(parse_limit(Some("0x"), 8, 20), 8);
		assert_eq!(parse_limit(Some("0x1g"), 8, 20), 8);
		assert_eq!(parse_limit(Some("-0x10"), 8, 20), 8);
	}
}
