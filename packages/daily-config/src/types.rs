use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub search: Search,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	/// Queries shorter than this many characters return no results without touching storage.
	#[serde(default = "default_min_query_chars")]
	pub min_query_chars: u32,
	pub suggest: SearchSuggest,
	pub page: SearchPage,
}

/// Limits for the live suggestion endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchSuggest {
	pub default_limit: u32,
	pub max_limit: u32,
	/// Row cap applied to each source before merging.
	pub fetch_limit: u32,
	pub play_fetch_limit: u32,
}

/// Limits for the full search page.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
	pub fetch_limit: u32,
	/// Hits kept per section after ranking.
	pub display_limit: u32,
	pub play_display_limit: u32,
	pub play_fetch_limit: u32,
	pub user_badge_fetch_limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}

fn default_min_query_chars() -> u32 {
	2
}
