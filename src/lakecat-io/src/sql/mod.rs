mod connection;
mod errors;

pub use connection::{SqlConnectionPool, SqlPoolOptions};
pub use errors::{
    AcquireSnafu, ConnectionSnafu, QuerySnafu, SqlError, SqlResult, TransactionSnafu,
};
