//! Transport module - moving documents between byte sources/sinks and trees.
//!
//! Provides thin adapters over:
//! - `std::io::Read` / `std::io::Write` and files
//! - `tokio::io::AsyncRead` / `tokio::io::AsyncWrite`
//!
//! Every adapter encodes into memory before touching the sink, and takes the
//! source or sink by value so it is released on every exit path.

mod io;
mod stream;

pub use io::{read_document, read_document_with, read_file, write_document, write_file};
pub use stream::{read_document_async, read_document_async_with, write_document_async};
