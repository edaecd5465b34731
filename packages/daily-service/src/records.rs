use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset};
use uuid::Uuid;

use daily_domain::{date, fields::RecordFields};
use daily_storage::models::{
	Anomaly, Badge, Comment, DailyGame, DailyPlay, ForumPost, ForumThread, Profile, UserBadge,
	UserStats,
};

const EXCERPT_CHARS: usize = 72;
const STATS_LABEL: &str = "games played wins current streak best streak total score";

/// Sources searched by pattern or date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
	Profiles,
	ForumThreads,
	ForumPosts,
	Comments,
	DailyGames,
	Badges,
	Anomalies,
}
impl Source {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Profiles => "profiles",
			Self::ForumThreads => "forum_threads",
			Self::ForumPosts => "forum_posts",
			Self::Comments => "comments",
			Self::DailyGames => "daily_games",
			Self::Badges => "badges",
			Self::Anomalies => "anomalies",
		}
	}
}

/// Sources that only exist for a signed-in viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerSource {
	Plays,
	Stats,
	UserBadges,
}
impl ViewerSource {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Plays => "daily_plays",
			Self::Stats => "user_stats",
			Self::UserBadges => "user_badges",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
	Profile,
	Thread,
	Post,
	Comment,
	Game,
	Badge,
	UserBadge,
	Anomaly,
	Play,
	Stats,
}

/// Row identity within one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordId {
	Row(i64),
	Day(Date),
	User(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
	pub kind: RecordKind,
	pub title: String,
	pub subtitle: String,
	pub href: String,
}

#[derive(Debug, Clone)]
pub enum SearchRecord {
	Profile(Profile),
	Thread(ForumThread),
	Post(ForumPost),
	Comment(Comment),
	Game(DailyGame),
	Badge(Badge),
	UserBadge(UserBadge),
	Anomaly(Anomaly),
	Play(DailyPlay),
	Stats(UserStats),
}
impl SearchRecord {
	pub fn kind(&self) -> RecordKind {
		match self {
			Self::Profile(_) => RecordKind::Profile,
			Self::Thread(_) => RecordKind::Thread,
			Self::Post(_) => RecordKind::Post,
			Self::Comment(_) => RecordKind::Comment,
			Self::Game(_) => RecordKind::Game,
			Self::Badge(_) => RecordKind::Badge,
			Self::UserBadge(_) => RecordKind::UserBadge,
			Self::Anomaly(_) => RecordKind::Anomaly,
			Self::Play(_) => RecordKind::Play,
			Self::Stats(_) => RecordKind::Stats,
		}
	}

	/// `None` for the per-viewer stats row, which has no identity of its own.
	pub fn id(&self) -> Option<RecordId> {
		match self {
			Self::Profile(row) => Some(RecordId::User(row.id)),
			Self::Thread(row) => Some(RecordId::Row(row.id)),
			Self::Post(row) => Some(RecordId::Row(row.id)),
			Self::Comment(row) => Some(RecordId::Row(row.id)),
			Self::Game(row) => Some(RecordId::Day(row.game_date)),
			Self::Badge(row) => Some(RecordId::Row(row.id)),
			Self::UserBadge(row) => Some(RecordId::Row(row.badge_id)),
			Self::Anomaly(row) => Some(RecordId::Row(row.id)),
			Self::Play(row) => Some(RecordId::Row(row.id)),
			Self::Stats(_) => None,
		}
	}

	/// The text and date fields this record is ranked on.
	pub fn fields(&self) -> RecordFields {
		match self {
			Self::Profile(row) => RecordFields::new(
				vec![row.username.clone()],
				vec![Some(timestamp_key(row.created_at))],
			),
			Self::Thread(row) => RecordFields::new(
				vec![Some(row.title.clone()), Some(row.kind.clone())],
				vec![Some(day_key(row.puzzle_date)), Some(timestamp_key(row.created_at))],
			),
			Self::Post(row) => RecordFields::new(
				vec![Some(row.body.clone()), row.thread_title.clone()],
				vec![Some(timestamp_key(row.created_at)), row.thread_puzzle_date.map(day_key)],
			),
			Self::Comment(row) => RecordFields::new(
				vec![Some(row.body.clone())],
				vec![Some(day_key(row.game_date)), Some(timestamp_key(row.created_at))],
			),
			Self::Game(row) => RecordFields::new(
				vec![Some(row.game_key.clone())],
				vec![Some(day_key(row.game_date)), Some(timestamp_key(row.created_at))],
			),
			Self::Badge(row) => RecordFields::new(
				badge_text(&row.name, &row.description, &row.kind, row.threshold),
				Vec::new(),
			),
			Self::UserBadge(row) => RecordFields::new(
				badge_text(&row.name, &row.description, &row.kind, row.threshold),
				vec![Some(timestamp_key(row.awarded_at))],
			),
			Self::Anomaly(row) => RecordFields::new(
				vec![
					row.content.clone(),
					row.tic_id.clone(),
					row.anomaly_type.clone(),
					row.anomaly_set.clone(),
				],
				vec![Some(timestamp_key(row.created_at))],
			),
			Self::Play(row) => RecordFields::new(
				vec![
					Some(row.id.to_string()),
					Some(row.score.to_string()),
					Some(row.attempts.to_string()),
					Some(outcome(row.won).to_lowercase()),
				],
				vec![Some(day_key(row.game_date)), Some(timestamp_key(row.played_at))],
			),
			Self::Stats(row) => RecordFields::new(
				vec![
					Some(row.games_played.to_string()),
					Some(row.wins.to_string()),
					Some(row.current_streak.to_string()),
					Some(row.best_streak.to_string()),
					Some(row.total_score.to_string()),
					Some(STATS_LABEL.to_string()),
				],
				vec![Some(timestamp_key(row.updated_at))],
			),
		}
	}

	/// Presentation of the record. `query` is the trimmed query and only feeds fallback links.
	pub fn to_hit(&self, query: &str) -> SearchHit {
		let kind = self.kind();
		let (title, subtitle, href) = match self {
			Self::Profile(row) => (
				format!("@{}", row.username.as_deref().unwrap_or("anonymous")),
				format!("Joined {}", timestamp_key(row.created_at)),
				"/profile".to_string(),
			),
			Self::Thread(row) => (
				row.title.clone(),
				format!("{} • {}", thread_label(&row.kind), day_key(row.puzzle_date)),
				discuss_href(row.puzzle_date),
			),
			Self::Post(row) => (
				"Forum post".to_string(),
				excerpt(&row.body),
				row.thread_puzzle_date.map(discuss_href).unwrap_or_else(|| search_href(query)),
			),
			Self::Comment(row) => (
				format!("Comment • {}", day_key(row.game_date)),
				excerpt(&row.body),
				discuss_href(row.game_date),
			),
			Self::Game(row) => (
				row.game_key.clone(),
				format!("Puzzle day {}", day_key(row.game_date)),
				format!("/games/today?date={}", day_key(row.game_date)),
			),
			Self::Badge(row) => (
				row.name.clone(),
				format!("{} • threshold {}", row.kind, row.threshold),
				search_href(query),
			),
			Self::UserBadge(row) => (
				row.name.clone(),
				format!("Awarded {}", timestamp_key(row.awarded_at)),
				search_href(query),
			),
			Self::Anomaly(row) => {
				let text =
					row.content.as_deref().or(row.anomaly_type.as_deref()).unwrap_or("entry");

				(format!("Anomaly #{}", row.id), excerpt(text), search_href(query))
			},
			Self::Play(row) => (
				format!("{} • {}", day_key(row.game_date), outcome(row.won)),
				format!("Score {}, attempts {}", row.score, row.attempts),
				discuss_href(row.game_date),
			),
			Self::Stats(row) => (
				"My stats".to_string(),
				format!(
					"Played {} • Wins {} • Streak {} (best {}) • Total score {}",
					row.games_played, row.wins, row.current_streak, row.best_streak, row.total_score
				),
				"/profile".to_string(),
			),
		};

		SearchHit { kind, title, subtitle, href }
	}

	/// Search page presentation, which attributes posts and comments to their author.
	pub fn to_page_hit(&self, query: &str) -> SearchHit {
		let mut hit = self.to_hit(query);

		match self {
			Self::Post(row) => {
				hit.title = author_title(row.author_username.as_deref(), "Forum user");
			},
			Self::Comment(row) => {
				hit.title = author_title(row.author_username.as_deref(), "Comment");
			},
			_ => {},
		}

		hit
	}

	/// Secondary line under a search page hit.
	pub fn page_detail(&self) -> Option<String> {
		match self {
			Self::Post(row) => Some(format!(
				"{} • {}",
				row.thread_title.as_deref().unwrap_or("Thread"),
				timestamp_key(row.created_at)
			)),
			Self::Comment(row) => Some(format!("Puzzle date {}", day_key(row.game_date))),
			_ => None,
		}
	}
}

fn badge_text(name: &str, description: &str, kind: &str, threshold: i32) -> Vec<Option<String>> {
	vec![
		Some(name.to_string()),
		Some(description.to_string()),
		Some(kind.to_string()),
		Some(threshold.to_string()),
	]
}

fn author_title(username: Option<&str>, fallback: &str) -> String {
	match username {
		Some(username) if !username.is_empty() => format!("@{username}"),
		_ => fallback.to_string(),
	}
}

fn day_key(value: Date) -> String {
	date::date_key(value)
}

fn timestamp_key(value: OffsetDateTime) -> String {
	date::date_key(value.to_offset(UtcOffset::UTC).date())
}

fn outcome(won: bool) -> &'static str {
	if won { "Won" } else { "Lost" }
}

fn thread_label(kind: &str) -> &'static str {
	if kind == "daily_live" { "Live" } else { "Ongoing" }
}

fn discuss_href(day: Date) -> String {
	format!("/discuss?date={}", day_key(day))
}

fn search_href(query: &str) -> String {
	format!("/search?q={}", urlencoding::encode(query))
}

fn excerpt(text: &str) -> String {
	let mut out: String = text.chars().take(EXCERPT_CHARS).collect();

	if text.chars().count() > EXCERPT_CHARS {
		out.push_str("...");
	}

	out
}
