// Execution substrate: the staged grouped-aggregation contract and an
// in-process implementation of it.

pub mod local;
pub mod traits;
