//! User directory: account registration, credential checks, login bookkeeping,
//! profile lookups and sent/received message threads.
//!
//! Every operation is a stateless call against the store; nothing is cached.

pub mod credentials;
pub mod directory;
pub mod error;

pub use credentials::{Credentials, HashConfig};
pub use directory::UserDirectory;
pub use error::{DirectoryError, Result};
