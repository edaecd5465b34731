pub mod backend;
pub mod records;
pub mod search_page;
pub mod suggest;

mod error;

pub use backend::PgBackend;
pub use error::{Error, Result};
pub use records::{RecordId, RecordKind, SearchHit, SearchRecord, Source, ViewerSource};
pub use search_page::{
	SearchPageCounts, SearchPageHit, SearchPageRequest, SearchPageResponse, SearchPageSections,
	SourceFailure,
};
pub use suggest::{SuggestRequest, SuggestResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

use daily_config::Config;
use daily_storage::{db::Db, queries::RecordFilter};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Where candidate records come from.
///
/// Each call is one independent fetch; the service runs them concurrently and tolerates any
/// of them failing.
pub trait SearchBackend
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		source: Source,
		filter: &'a RecordFilter,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<SearchRecord>>>;

	fn viewer_records<'a>(
		&'a self,
		source: ViewerSource,
		user_id: Uuid,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<SearchRecord>>>;
}

pub struct DailyService {
	pub cfg: Config,
	pub backend: Arc<dyn SearchBackend>,
}
impl DailyService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, backend: Arc::new(PgBackend::new(db)) }
	}

	pub fn with_backend(cfg: Config, backend: Arc<dyn SearchBackend>) -> Self {
		Self { cfg, backend }
	}
}

pub(crate) fn validate_query(query: &str) -> Result<()> {
	if query.contains('\0') {
		return Err(Error::InvalidRequest {
			message: "q must not contain NUL characters.".to_string(),
		});
	}

	Ok(())
}

/// Anonymous viewers resolve to an empty batch without touching the backend.
pub(crate) fn viewer_fetch<'a>(
	backend: &'a dyn SearchBackend,
	source: ViewerSource,
	viewer: Option<Uuid>,
	limit: u32,
) -> BoxFuture<'a, Result<Vec<SearchRecord>>> {
	match viewer {
		Some(user_id) => backend.viewer_records(source, user_id, limit),
		None => Box::pin(async { Ok(Vec::new()) }),
	}
}

pub(crate) fn settle(
	label: &'static str,
	result: Result<Vec<SearchRecord>>,
	failures: &mut Vec<SourceFailure>,
) -> Vec<SearchRecord> {
	match result {
		Ok(records) => records,
		Err(err) => {
			tracing::warn!(error = %err, source = label, "Search source fetch failed.");

			failures.push(SourceFailure { source: label.to_string(), message: err.to_string() });

			Vec::new()
		},
	}
}
