mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use uuid::Uuid;

const DSN_VAR: &str = "DAILY_PG_DSN";
const ADMIN_DATABASES: [&str; 2] = ["postgres", "template1"];

/// A scratch database on the server named by `DAILY_PG_DSN`.
///
/// Call [`TestDatabase::cleanup`] at the end of the test. A test that panics first leaves its
/// `daily_test_*` database behind.
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin: PgConnectOptions,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::InvalidDsn { var: DSN_VAR, message: err.to_string() })?;
		let (admin, mut conn) = admin_connection(&base).await?;
		let name = format!("daily_test_{}", Uuid::new_v4().simple());

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str()).await?;

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// Runs a multi-statement script such as fixture rows.
	pub async fn execute_script(&self, sql: &str) -> Result<()> {
		let mut conn = PgConnection::connect(&self.dsn).await?;

		conn.execute(sql).await?;

		Ok(())
	}

	/// Disconnects any remaining sessions and drops the database.
	pub async fn cleanup(self) -> Result<()> {
		let mut conn = PgConnection::connect_with(&self.admin).await?;

		sqlx::query(
			"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
		)
		.bind(&self.name)
		.fetch_all(&mut conn)
		.await?;
		conn.execute(format!(r#"DROP DATABASE IF EXISTS "{}""#, self.name).as_str()).await?;

		Ok(())
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(DSN_VAR).ok().filter(|dsn| !dsn.trim().is_empty())
}

async fn admin_connection(base: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let mut last_err = None;

	for database in ADMIN_DATABASES {
		let options = base.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => last_err = Some(err),
		}
	}

	Err(Error::AdminUnavailable { source: last_err })
}
