use common_error::LakecatError;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SqlError {
    #[snafu(display("Unable to connect to {uri}: {source}"))]
    Connection { uri: String, source: sqlx::Error },

    #[snafu(display("Unable to acquire a connection to {uri}: {source}"))]
    Acquire { uri: String, source: sqlx::Error },

    #[snafu(display("Query failed: {source}"))]
    Query { source: sqlx::Error },

    #[snafu(display("Transaction failed: {source}"))]
    Transaction { source: sqlx::Error },
}

pub type SqlResult<T, E = SqlError> = std::result::Result<T, E>;

impl From<SqlError> for LakecatError {
    fn from(err: SqlError) -> Self {
        Self::External(err.into())
    }
}
