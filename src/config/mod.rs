pub mod loader;
pub mod schema;

pub use loader::{load_from_path, ConfigError};
pub use schema::{BadEntry, PolicySection, RewriteConfig};
