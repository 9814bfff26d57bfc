//! Cassettes: recorded port interactions used to replay builds.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
