mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Postgres, Search, SearchPage, SearchSuggest, Security, Service, Storage};

use std::{fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.http_bind.parse::<SocketAddr>().is_err() {
		return Err(Error::Validation {
			message: "service.http_bind must be a socket address such as 127.0.0.1:8080."
				.to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.search.min_query_chars == 0 {
		return Err(Error::Validation {
			message: "search.min_query_chars must be greater than zero.".to_string(),
		});
	}

	let suggest = &cfg.search.suggest;
	let page = &cfg.search.page;

	for (label, value) in [
		("search.suggest.default_limit", suggest.default_limit),
		("search.suggest.max_limit", suggest.max_limit),
		("search.suggest.fetch_limit", suggest.fetch_limit),
		("search.suggest.play_fetch_limit", suggest.play_fetch_limit),
		("search.page.fetch_limit", page.fetch_limit),
		("search.page.display_limit", page.display_limit),
		("search.page.play_display_limit", page.play_display_limit),
		("search.page.play_fetch_limit", page.play_fetch_limit),
		("search.page.user_badge_fetch_limit", page.user_badge_fetch_limit),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if suggest.default_limit > suggest.max_limit {
		return Err(Error::Validation {
			message: "search.suggest.default_limit must not exceed search.suggest.max_limit."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let level = cfg.service.log_level.trim();

	if level.is_empty() {
		cfg.service.log_level = "info".to_string();
	} else if level.len() != cfg.service.log_level.len() {
		cfg.service.log_level = level.to_string();
	}

	let bind = cfg.service.http_bind.trim();

	if bind.len() != cfg.service.http_bind.len() {
		cfg.service.http_bind = bind.to_string();
	}
}
