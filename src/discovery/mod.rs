pub mod matcher;
pub mod secrets;
pub mod walker;

pub use matcher::{find_directories_matching, MetaMatch};
pub use secrets::{load_secret_chain, SecretEnv};
