pub mod global;
pub mod meta;
pub mod paths;

pub use global::GlobalConfig;
pub use meta::{Meta, MetaType, Scope};
