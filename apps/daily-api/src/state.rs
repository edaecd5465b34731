use std::sync::Arc;

use daily_config::Config;
use daily_service::DailyService;
use daily_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<DailyService>,
}
impl AppState {
	/// Connects to Postgres and bootstraps the schema before serving.
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(DailyService::new(config, db)))
	}

	pub fn from_service(service: DailyService) -> Self {
		Self { service: Arc::new(service) }
	}
}
