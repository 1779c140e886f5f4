pub mod access;

pub use access::{apply, require_token};
