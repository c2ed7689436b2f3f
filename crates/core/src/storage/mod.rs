mod error;
mod traits;

pub use error::{MappingError, RepositoryError, Result};
pub use traits::HostRepository;
