//! The functional core: classify log lines, then fold them into records.
pub mod classify;
pub mod reducer;

pub use classify::classify;
pub use reducer::{Reducer, lossy_lines, reduce_lines, reduce_reader, reduce_str};
