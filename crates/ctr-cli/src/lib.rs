//! Library side of the `ctr` command line tool.

pub mod logging;
pub mod pipeline;
pub mod summary;
