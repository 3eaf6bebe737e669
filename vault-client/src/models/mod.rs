pub mod auth;
pub mod file;

pub use auth::{Credentials, Identity};
pub use file::RemoteFile;
