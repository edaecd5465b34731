use uuid::Uuid;

use crate::{BoxFuture, Result, SearchBackend, SearchRecord, Source, ViewerSource};
use daily_storage::{
	db::Db,
	queries::{self, RecordFilter},
};

/// Postgres-backed record sources.
pub struct PgBackend {
	pub db: Db,
}
impl PgBackend {
	pub fn new(db: Db) -> Self {
		Self { db }
	}

	async fn search_source(
		&self,
		source: Source,
		filter: &RecordFilter,
		limit: u32,
	) -> Result<Vec<SearchRecord>> {
		let db = &self.db;
		let records = match source {
			Source::Profiles =>
				wrap(queries::search_profiles(db, filter, limit).await?, SearchRecord::Profile),
			Source::ForumThreads =>
				wrap(queries::search_threads(db, filter, limit).await?, SearchRecord::Thread),
			Source::ForumPosts =>
				wrap(queries::search_posts(db, filter, limit).await?, SearchRecord::Post),
			Source::Comments =>
				wrap(queries::search_comments(db, filter, limit).await?, SearchRecord::Comment),
			Source::DailyGames =>
				wrap(queries::search_games(db, filter, limit).await?, SearchRecord::Game),
			Source::Badges =>
				wrap(queries::search_badges(db, filter, limit).await?, SearchRecord::Badge),
			Source::Anomalies =>
				wrap(queries::search_anomalies(db, filter, limit).await?, SearchRecord::Anomaly),
		};

		Ok(records)
	}

	async fn viewer_source(
		&self,
		source: ViewerSource,
		user_id: Uuid,
		limit: u32,
	) -> Result<Vec<SearchRecord>> {
		let db = &self.db;
		let records = match source {
			ViewerSource::Plays =>
				wrap(queries::list_plays(db, user_id, limit).await?, SearchRecord::Play),
			ViewerSource::Stats => {
				let stats = queries::get_stats(db, user_id).await?;

				stats.map(SearchRecord::Stats).into_iter().collect()
			},
			ViewerSource::UserBadges =>
				wrap(queries::list_user_badges(db, user_id, limit).await?, SearchRecord::UserBadge),
		};

		Ok(records)
	}
}
impl SearchBackend for PgBackend {
	fn search<'a>(
		&'a self,
		source: Source,
		filter: &'a RecordFilter,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<SearchRecord>>> {
		Box::pin(self.search_source(source, filter, limit))
	}

	fn viewer_records<'a>(
		&'a self,
		source: ViewerSource,
		user_id: Uuid,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<SearchRecord>>> {
		Box::pin(self.viewer_source(source, user_id, limit))
	}
}

fn wrap<T>(rows: Vec<T>, variant: fn(T) -> SearchRecord) -> Vec<SearchRecord> {
	rows.into_iter().map(variant).collect()
}
