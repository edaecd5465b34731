use sqlx::{Postgres, QueryBuilder};
use time::Date;
use uuid::Uuid;

use crate::{
	Error, Result,
	db::Db,
	models::{
		Anomaly, Badge, Comment, DailyGame, DailyPlay, ForumPost, ForumThread, Profile, UserBadge,
		UserStats,
	},
};

/// How a source narrows its candidate rows before ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter {
	/// Case-insensitive substring match over the source's text columns.
	Pattern(String),
	/// As `Pattern`, also matching the text form of the source's date column.
	PatternOrDate(String),
	OnDate(Date),
	/// Inclusive on both ends.
	DateRange { start: Date, end: Date },
}

struct SourceColumns<'a> {
	text: &'a [&'a str],
	date: Option<&'a str>,
}

pub async fn search_profiles(db: &Db, filter: &RecordFilter, limit: u32) -> Result<Vec<Profile>> {
	let mut builder = QueryBuilder::new("SELECT id, username, created_at FROM profiles WHERE ");

	push_filter(&mut builder, filter, &SourceColumns { text: &["username"], date: None })?;
	builder.push(" ORDER BY created_at DESC");
	push_limit(&mut builder, limit);

	Ok(builder.build_query_as().fetch_all(&db.pool).await?)
}

pub async fn search_threads(
	db: &Db,
	filter: &RecordFilter,
	limit: u32,
) -> Result<Vec<ForumThread>> {
	let mut builder = QueryBuilder::new(
		"SELECT id, puzzle_date, kind, title, created_at FROM forum_threads WHERE ",
	);

	push_filter(
		&mut builder,
		filter,
		&SourceColumns { text: &["title"], date: Some("puzzle_date") },
	)?;
	builder.push(" ORDER BY puzzle_date DESC, id DESC");
	push_limit(&mut builder, limit);

	Ok(builder.build_query_as().fetch_all(&db.pool).await?)
}

pub async fn search_posts(db: &Db, filter: &RecordFilter, limit: u32) -> Result<Vec<ForumPost>> {
	let mut builder = QueryBuilder::new(
		"\
SELECT
	p.id,
	p.thread_id,
	p.body,
	p.created_at,
	pr.username AS author_username,
	t.puzzle_date AS thread_puzzle_date,
	t.title AS thread_title
FROM forum_posts p
LEFT JOIN forum_threads t ON t.id = p.thread_id
LEFT JOIN profiles pr ON pr.id = p.user_id
WHERE ",
	);

	push_filter(&mut builder, filter, &SourceColumns { text: &["p.body"], date: None })?;
	builder.push(" ORDER BY p.created_at DESC");
	push_limit(&mut builder, limit);

	Ok(builder.build_query_as().fetch_all(&db.pool).await?)
}

pub async fn search_comments(db: &Db, filter: &RecordFilter, limit: u32) -> Result<Vec<Comment>> {
	let mut builder = QueryBuilder::new(
		"\
SELECT c.id, c.game_date, c.body, c.created_at, pr.username AS author_username
FROM comments c
LEFT JOIN profiles pr ON pr.id = c.user_id
WHERE ",
	);

	push_filter(
		&mut builder,
		filter,
		&SourceColumns { text: &["c.body"], date: Some("c.game_date") },
	)?;
	builder.push(" ORDER BY c.created_at DESC");
	push_limit(&mut builder, limit);

	Ok(builder.build_query_as().fetch_all(&db.pool).await?)
}

pub async fn search_games(db: &Db, filter: &RecordFilter, limit: u32) -> Result<Vec<DailyGame>> {
	let mut builder =
		QueryBuilder::new("SELECT game_date, game_key, created_at FROM daily_games WHERE ");

	push_filter(
		&mut builder,
		filter,
		&SourceColumns { text: &["game_key"], date: Some("game_date") },
	)?;
	builder.push(" ORDER BY game_date DESC");
	push_limit(&mut builder, limit);

	Ok(builder.build_query_as().fetch_all(&db.pool).await?)
}

pub async fn search_badges(db: &Db, filter: &RecordFilter, limit: u32) -> Result<Vec<Badge>> {
	let mut builder = QueryBuilder::new(
		"SELECT id, name, description, kind, threshold FROM badges WHERE ",
	);

	push_filter(
		&mut builder,
		filter,
		&SourceColumns { text: &["slug", "name", "description", "kind"], date: None },
	)?;
	builder.push(" ORDER BY id ASC");
	push_limit(&mut builder, limit);

	Ok(builder.build_query_as().fetch_all(&db.pool).await?)
}

pub async fn search_anomalies(db: &Db, filter: &RecordFilter, limit: u32) -> Result<Vec<Anomaly>> {
	let mut builder = QueryBuilder::new(
		"SELECT id, content, tic_id, anomaly_type, anomaly_set, created_at FROM anomalies WHERE ",
	);

	push_filter(
		&mut builder,
		filter,
		&SourceColumns { text: &["content", "tic_id", "anomaly_type", "anomaly_set"], date: None },
	)?;
	builder.push(" ORDER BY created_at DESC");
	push_limit(&mut builder, limit);

	Ok(builder.build_query_as().fetch_all(&db.pool).await?)
}

pub async fn list_plays(db: &Db, user_id: Uuid, limit: u32) -> Result<Vec<DailyPlay>> {
	let plays = sqlx::query_as::<_, DailyPlay>(
		"\
SELECT id, game_date, won, score, attempts, played_at
FROM daily_plays
WHERE user_id = $1
ORDER BY played_at DESC
LIMIT $2",
	)
	.bind(user_id)
	.bind(i64::from(limit))
	.fetch_all(&db.pool)
	.await?;

	Ok(plays)
}

pub async fn get_stats(db: &Db, user_id: Uuid) -> Result<Option<UserStats>> {
	let stats = sqlx::query_as::<_, UserStats>(
		"\
SELECT games_played, wins, current_streak, best_streak, total_score, updated_at
FROM user_stats
WHERE user_id = $1",
	)
	.bind(user_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(stats)
}

pub async fn list_user_badges(db: &Db, user_id: Uuid, limit: u32) -> Result<Vec<UserBadge>> {
	let badges = sqlx::query_as::<_, UserBadge>(
		"\
SELECT ub.badge_id, ub.awarded_at, b.name, b.description, b.kind, b.threshold
FROM user_badges ub
JOIN badges b ON b.id = ub.badge_id
WHERE ub.user_id = $1
ORDER BY ub.awarded_at DESC
LIMIT $2",
	)
	.bind(user_id)
	.bind(i64::from(limit))
	.fetch_all(&db.pool)
	.await?;

	Ok(badges)
}

/// Escapes `LIKE` metacharacters so user input only ever matches literally.
pub fn like_pattern(query: &str) -> String {
	let mut out = String::with_capacity(query.len() + 2);

	out.push('%');

	for ch in query.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(ch);
	}

	out.push('%');

	out
}

fn push_filter(
	builder: &mut QueryBuilder<'_, Postgres>,
	filter: &RecordFilter,
	columns: &SourceColumns<'_>,
) -> Result<()> {
	match filter {
		RecordFilter::Pattern(query) => push_pattern(builder, query, columns.text, None),
		RecordFilter::PatternOrDate(query) =>
			push_pattern(builder, query, columns.text, columns.date),
		RecordFilter::OnDate(date) => {
			let column = date_column(columns)?;

			builder.push(column).push(" = ").push_bind(*date);
		},
		RecordFilter::DateRange { start, end } => {
			let column = date_column(columns)?;

			builder
				.push(column)
				.push(" BETWEEN ")
				.push_bind(*start)
				.push(" AND ")
				.push_bind(*end);
		},
	}

	Ok(())
}

fn push_pattern(
	builder: &mut QueryBuilder<'_, Postgres>,
	query: &str,
	text_columns: &[&str],
	date_column: Option<&str>,
) {
	let pattern = like_pattern(query);

	builder.push("(");

	for (idx, column) in text_columns.iter().enumerate() {
		if idx > 0 {
			builder.push(" OR ");
		}

		builder.push(*column).push(" ILIKE ").push_bind(pattern.clone());
	}

	if let Some(column) = date_column {
		builder.push(" OR ").push(column).push("::text ILIKE ").push_bind(pattern);
	}

	builder.push(")");
}

fn date_column<'a>(columns: &SourceColumns<'a>) -> Result<&'a str> {
	columns.date.ok_or_else(|| {
		Error::InvalidArgument("Date filters require a source with a date column.".to_string())
	})
}

fn push_limit(builder: &mut QueryBuilder<'_, Postgres>, limit: u32) {
	builder.push(" LIMIT ").push_bind(i64::from(limit));
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use super::*;

	fn render(filter: &RecordFilter, columns: &SourceColumns<'_>) -> Result<String> {
		let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 WHERE ");

		push_filter(&mut builder, filter, columns)?;

		Ok(builder.sql().to_string())
	}

	#[test]
	fn like_pattern_escapes_metacharacters() {
		assert_eq!(like_pattern("liam"), "%liam%");
		assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
	}

	#[test]
	fn pattern_or_date_adds_text_cast() {
		let sql = render(
			&RecordFilter::PatternOrDate("2026".to_string()),
			&SourceColumns { text: &["title"], date: Some("puzzle_date") },
		)
		.expect("Expected filter to render.");

		assert_eq!(sql, "SELECT 1 WHERE (title ILIKE $1 OR puzzle_date::text ILIKE $2)");
	}

	#[test]
	fn pattern_spans_every_text_column() {
		let sql = render(
			&RecordFilter::Pattern("nova".to_string()),
			&SourceColumns { text: &["name", "kind"], date: None },
		)
		.expect("Expected filter to render.");

		assert_eq!(sql, "SELECT 1 WHERE (name ILIKE $1 OR kind ILIKE $2)");
	}

	#[test]
	fn date_range_is_inclusive() {
		let sql = render(
			&RecordFilter::DateRange { start: date!(2026 - 02 - 01), end: date!(2026 - 02 - 28) },
			&SourceColumns { text: &["game_key"], date: Some("game_date") },
		)
		.expect("Expected filter to render.");

		assert_eq!(sql, "SELECT 1 WHERE game_date BETWEEN $1 AND $2");
	}

	#[test]
	fn date_filters_need_a_date_column() {
		let err = render(
			&RecordFilter::OnDate(date!(2026 - 02 - 11)),
			&SourceColumns { text: &["username"], date: None },
		)
		.expect_err("Expected missing date column error.");

		assert!(matches!(err, Error::InvalidArgument(_)));
	}
}
