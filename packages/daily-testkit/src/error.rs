pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{var} is not a valid Postgres DSN: {message}")]
	InvalidDsn { var: &'static str, message: String },

	#[error("No admin database (postgres or template1) accepted a connection.")]
	AdminUnavailable { source: Option<sqlx::Error> },

	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
}
