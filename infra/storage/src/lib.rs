//! A sandboxed, synchronous storage engine for compiled artifacts.
//!
//! - **Sandbox**: relative paths only, `..` cannot leave the root and symlinks
//!   are checked against the canonical root.
//! - **Atomic writes**: unique temp file, `fsync`, rename. A crash never leaves
//!   a half-written artifact behind.
//! - **Compression**: optional LZ4 block compression invisible to callers.
//! - **Directory moves**: [`Storage::move_into`] and [`Storage::remove_root`]
//!   let callers build into a scratch directory and swap the results in.
//! - **Self-healing**: stale temp files are purged when a storage is opened.
//!
//! ```rust
//! use rosetta_storage::{Storage, StorageError};
//!
//! fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     let live = Storage::builder().root(tmp.path().join("live")).connect()?;
//!     let scratch = Storage::builder().root(tmp.path().join("live.next")).connect()?;
//!
//!     scratch.write("catalogue.fr.bin", b"fresh")?;
//!     scratch.move_into(&live)?;
//!     scratch.remove_root()?;
//!
//!     assert_eq!(live.read("catalogue.fr.bin")?, b"fresh");
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod maintenance;
mod security;

pub use builder::StorageBuilder;
pub use engine::{Compression, Storage};
pub use error::{StorageError, StorageErrorExt};
