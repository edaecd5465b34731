pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<daily_storage::Error> for Error {
	fn from(err: daily_storage::Error) -> Self {
		match err {
			daily_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			daily_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
		}
	}
}
