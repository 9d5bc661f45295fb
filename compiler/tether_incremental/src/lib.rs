//! Incremental log for tether.
//!
//! Keeps the facts extracted from every unit between runs so unchanged units
//! are not re-extracted. The log is a cache: losing it costs a cold rebuild,
//! never correctness.
//!
//! # Blob format
//!
//! ```text
//! +------+---------+----------+-----------------+
//! | TTHR | version | checksum | bincode payload |
//! | 4 B  | u32 LE  | u64 LE   | ...             |
//! +------+---------+----------+-----------------+
//! ```

mod hash;
mod log;
mod store;

pub use hash::{hash_bytes, hash_value, ContentHash};
pub use log::{IncrementalLog, RegistrationEvent, UnitEntry};
pub use store::{decode, encode, BlobStore, CacheError, FileBlob, MemoryBlob, FORMAT_VERSION, MAGIC};
