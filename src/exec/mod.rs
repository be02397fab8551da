pub mod batch;
pub mod process;

pub use batch::{run_batch, BatchPolicy, BatchReport, BatchUnit};
pub use process::{is_not_found, CommandSpec};
