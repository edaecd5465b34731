use std::collections::{HashMap, hash_map::Entry};

use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime};
use uuid::Uuid;

use crate::{
	BoxFuture, DailyService, RecordId, Result, SearchBackend, SearchHit, SearchRecord, Source,
	ViewerSource, settle, validate_query, viewer_fetch,
};
use daily_domain::{
	query::{DateShape, QueryContext},
	rank,
};
use daily_storage::queries::RecordFilter;

const THREADS_BY_DATE: &str = "forum_threads_by_date";
const COMMENTS_BY_DATE: &str = "comments_by_date";
const GAMES_BY_DATE: &str = "daily_games_by_date";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPageRequest {
	pub q: String,
	#[serde(default)]
	pub viewer: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPageHit {
	#[serde(flatten)]
	pub hit: SearchHit,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub detail: Option<String>,
	pub score: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPageSections {
	pub profiles: Vec<SearchPageHit>,
	pub threads: Vec<SearchPageHit>,
	pub posts: Vec<SearchPageHit>,
	pub comments: Vec<SearchPageHit>,
	pub games: Vec<SearchPageHit>,
	pub plays: Vec<SearchPageHit>,
	pub badges: Vec<SearchPageHit>,
	pub my_badges: Vec<SearchPageHit>,
	pub anomalies: Vec<SearchPageHit>,
	pub stats: Option<SearchPageHit>,
}
impl SearchPageSections {
	pub fn total_matches(&self) -> usize {
		let counts = self.counts();

		counts.forum
			+ counts.puzzle_history
			+ counts.profiles_and_badges
			+ self.anomalies.len()
			+ usize::from(self.stats.is_some())
	}

	pub fn counts(&self) -> SearchPageCounts {
		SearchPageCounts {
			forum: self.threads.len() + self.posts.len() + self.comments.len(),
			puzzle_history: self.games.len() + self.plays.len(),
			profiles_and_badges: self.profiles.len() + self.badges.len() + self.my_badges.len(),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPageCounts {
	pub forum: usize,
	pub puzzle_history: usize,
	pub profiles_and_badges: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
	pub source: String,
	pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPageResponse {
	pub query: String,
	pub date_shape: Option<DateShape>,
	pub sections: SearchPageSections,
	pub total_matches: usize,
	pub counts: SearchPageCounts,
	pub failed_sources: Vec<SourceFailure>,
}

impl DailyService {
	pub async fn search_page(&self, req: SearchPageRequest) -> Result<SearchPageResponse> {
		self.search_page_at(req, OffsetDateTime::now_utc()).await
	}

	/// As [`DailyService::search_page`], with recency measured against `now`.
	pub async fn search_page_at(
		&self,
		req: SearchPageRequest,
		now: OffsetDateTime,
	) -> Result<SearchPageResponse> {
		let cfg = &self.cfg.search.page;
		let query = req.q.trim();

		if query.chars().count() < self.cfg.search.min_query_chars as usize {
			return Ok(SearchPageResponse { query: query.to_string(), ..Default::default() });
		}

		validate_query(query)?;

		let ctx = QueryContext::new(query);
		let pattern = RecordFilter::Pattern(query.to_string());
		let on_day = day_filter(&ctx);
		let games_dated = games_filter(&ctx);
		let backend = self.backend.as_ref();
		let fetch_limit = cfg.fetch_limit;
		let viewer = req.viewer;
		let (
			profiles,
			threads,
			threads_by_date,
			posts,
			comments,
			comments_by_date,
			games,
			games_by_date,
			badges,
			anomalies,
			plays,
			stats,
			my_badges,
		) = tokio::join!(
			backend.search(Source::Profiles, &pattern, fetch_limit),
			backend.search(Source::ForumThreads, &pattern, fetch_limit),
			optional_search(backend, Source::ForumThreads, on_day.as_ref(), fetch_limit),
			backend.search(Source::ForumPosts, &pattern, fetch_limit),
			backend.search(Source::Comments, &pattern, fetch_limit),
			optional_search(backend, Source::Comments, on_day.as_ref(), fetch_limit),
			backend.search(Source::DailyGames, &pattern, fetch_limit),
			optional_search(backend, Source::DailyGames, games_dated.as_ref(), fetch_limit),
			backend.search(Source::Badges, &pattern, fetch_limit),
			backend.search(Source::Anomalies, &pattern, fetch_limit),
			viewer_fetch(backend, ViewerSource::Plays, viewer, cfg.play_fetch_limit),
			viewer_fetch(backend, ViewerSource::Stats, viewer, 1),
			viewer_fetch(backend, ViewerSource::UserBadges, viewer, cfg.user_badge_fetch_limit),
		);
		let mut failures = Vec::new();
		let profiles = settle(Source::Profiles.as_str(), profiles, &mut failures);
		let comments = merge_unique(
			settle(Source::Comments.as_str(), comments, &mut failures),
			settle(COMMENTS_BY_DATE, comments_by_date, &mut failures),
		);
		let threads = merge_unique(
			settle(Source::ForumThreads.as_str(), threads, &mut failures),
			settle(THREADS_BY_DATE, threads_by_date, &mut failures),
		);
		let posts = settle(Source::ForumPosts.as_str(), posts, &mut failures);
		let badges = settle(Source::Badges.as_str(), badges, &mut failures);
		let anomalies = settle(Source::Anomalies.as_str(), anomalies, &mut failures);
		let games = merge_unique(
			settle(Source::DailyGames.as_str(), games, &mut failures),
			settle(GAMES_BY_DATE, games_by_date, &mut failures),
		);
		let plays = settle(ViewerSource::Plays.as_str(), plays, &mut failures);
		let stats = settle(ViewerSource::Stats.as_str(), stats, &mut failures);
		let my_badges = settle(ViewerSource::UserBadges.as_str(), my_badges, &mut failures);
		let display_limit = cfg.display_limit as usize;
		let section = |records: Vec<SearchRecord>, limit: usize| {
			rank_section(records, &ctx, now, query, limit)
		};
		let sections = SearchPageSections {
			profiles: section(profiles, display_limit),
			threads: section(threads, display_limit),
			posts: section(posts, display_limit),
			comments: section(comments, display_limit),
			games: section(games, display_limit),
			plays: section(plays, cfg.play_display_limit as usize),
			badges: section(badges, display_limit),
			my_badges: section(my_badges, display_limit),
			anomalies: section(anomalies, display_limit),
			stats: section(stats, 1).into_iter().next(),
		};
		let total_matches = sections.total_matches();
		let counts = sections.counts();

		tracing::debug!(query, total_matches, failed = failures.len(), "Search page completed.");

		Ok(SearchPageResponse {
			query: query.to_string(),
			date_shape: ctx.date_shape(),
			sections,
			total_matches,
			counts,
			failed_sources: failures,
		})
	}
}

fn optional_search<'a>(
	backend: &'a dyn SearchBackend,
	source: Source,
	filter: Option<&'a RecordFilter>,
	limit: u32,
) -> BoxFuture<'a, Result<Vec<SearchRecord>>> {
	match filter {
		Some(filter) => backend.search(source, filter, limit),
		None => Box::pin(async { Ok(Vec::new()) }),
	}
}

fn rank_section(
	records: Vec<SearchRecord>,
	ctx: &QueryContext,
	now: OffsetDateTime,
	query: &str,
	limit: usize,
) -> Vec<SearchPageHit> {
	let candidates = records
		.into_iter()
		.map(|record| {
			let score = record.fields().score(ctx, now);

			(record, score)
		})
		.collect();

	rank::rank_scored(candidates, limit)
		.into_iter()
		.map(|scored| SearchPageHit {
			hit: scored.item.to_page_hit(query),
			detail: scored.item.page_detail(),
			score: scored.score,
		})
		.collect()
}

/// Concatenates two batches of one source, collapsing rows that share an id.
///
/// A repeated row keeps the position of its first occurrence and takes the later value.
fn merge_unique(first: Vec<SearchRecord>, second: Vec<SearchRecord>) -> Vec<SearchRecord> {
	let mut positions: HashMap<RecordId, usize> = HashMap::new();
	let mut merged: Vec<SearchRecord> = Vec::with_capacity(first.len() + second.len());

	for record in first.into_iter().chain(second) {
		let Some(id) = record.id() else {
			merged.push(record);

			continue;
		};

		match positions.entry(id) {
			Entry::Occupied(entry) => merged[*entry.get()] = record,
			Entry::Vacant(entry) => {
				entry.insert(merged.len());
				merged.push(record);
			},
		}
	}

	merged
}

/// Exact-day filter for day-shaped queries naming a real calendar day.
fn day_filter(ctx: &QueryContext) -> Option<RecordFilter> {
	if ctx.date_shape() != Some(DateShape::Day) {
		return None;
	}

	let (year, month) = year_month(&ctx.raw)?;
	let day = ctx.raw.get(8..10)?.parse::<u8>().ok()?;

	Date::from_calendar_date(year, month, day).ok().map(RecordFilter::OnDate)
}

/// Games are additionally fetched for the whole month or year of a month or year query.
fn games_filter(ctx: &QueryContext) -> Option<RecordFilter> {
	match ctx.date_shape()? {
		DateShape::Day => day_filter(ctx),
		DateShape::Month => {
			let (year, month) = year_month(&ctx.raw)?;
			let start = Date::from_calendar_date(year, month, 1).ok()?;
			let end = last_day_of_month(year, month)?;

			Some(RecordFilter::DateRange { start, end })
		},
		DateShape::Year => {
			let year = ctx.raw.parse::<i32>().ok()?;
			let start = Date::from_calendar_date(year, Month::January, 1).ok()?;
			let end = Date::from_calendar_date(year, Month::December, 31).ok()?;

			Some(RecordFilter::DateRange { start, end })
		},
	}
}

fn year_month(raw: &str) -> Option<(i32, Month)> {
	let year = raw.get(0..4)?.parse::<i32>().ok()?;
	let month = raw.get(5..7)?.parse::<u8>().ok()?;

	Some((year, Month::try_from(month).ok()?))
}

fn last_day_of_month(year: i32, month: Month) -> Option<Date> {
	let (next_year, next_month) =
		if month == Month::December { (year + 1, Month::January) } else { (year, month.next()) };

	Date::from_calendar_date(next_year, next_month, 1).ok()?.previous_day()
}
