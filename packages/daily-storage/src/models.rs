use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Profile {
	pub id: Uuid,
	pub username: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ForumThread {
	pub id: i64,
	pub puzzle_date: Date,
	/// `daily_live` or `ongoing`.
	pub kind: String,
	pub title: String,
	pub created_at: OffsetDateTime,
}

/// A forum post joined with its author and parent thread.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ForumPost {
	pub id: i64,
	pub thread_id: i64,
	pub body: String,
	pub created_at: OffsetDateTime,
	pub author_username: Option<String>,
	pub thread_puzzle_date: Option<Date>,
	pub thread_title: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
	pub id: i64,
	pub game_date: Date,
	pub body: String,
	pub created_at: OffsetDateTime,
	pub author_username: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyGame {
	pub game_date: Date,
	pub game_key: String,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Badge {
	pub id: i64,
	pub name: String,
	pub description: String,
	pub kind: String,
	pub threshold: i32,
}

/// A badge owned by the viewer, joined with its catalog entry.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserBadge {
	pub badge_id: i64,
	pub awarded_at: OffsetDateTime,
	pub name: String,
	pub description: String,
	pub kind: String,
	pub threshold: i32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Anomaly {
	pub id: i64,
	pub content: Option<String>,
	pub tic_id: Option<String>,
	pub anomaly_type: Option<String>,
	pub anomaly_set: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyPlay {
	pub id: i64,
	pub game_date: Date,
	pub won: bool,
	pub score: i32,
	pub attempts: i32,
	pub played_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserStats {
	pub games_played: i32,
	pub wins: i32,
	pub current_streak: i32,
	pub best_streak: i32,
	pub total_score: i64,
	pub updated_at: OffsetDateTime,
}
