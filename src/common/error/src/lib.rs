mod error;

pub use error::{GenericError, LakecatError, LakecatResult};
