//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the build core and the outside
//! world (filesystem metadata, the toolchain, time). Implementations live in
//! `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod process;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use process::{ProcessOutput, ProcessRunner};
