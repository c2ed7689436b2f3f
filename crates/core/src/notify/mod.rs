mod error;
mod traits;
mod types;

pub use error::{NotifyError, Result};
pub use traits::ChangeNotifier;
pub use types::{ChangeOperation, TableChanged, HOSTS_TABLE};
