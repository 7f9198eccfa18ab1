//! # byteranges
//!
//! Server-side encoding of HTTP range-request responses.
//!
//! [`parse_range_header`] turns a raw `Range` header value into an ordered
//! list of validated [`Part`] descriptors, [`content_length`] computes the
//! exact body length before a single byte is produced, and
//! [`RangedResponse`] streams either a bare single-range body or a
//! `multipart/byteranges` body from any source implementing [`AsyncRead`]
//! and [`AsyncSeekStart`].
//!
//! The body is produced and consumed concurrently: the encoder runs as a
//! producer task behind a bounded in-memory conduit, so the caller can start
//! reading before encoding finishes, encoder failures surface as read
//! errors, and dropping the reader cancels the producer.
//!
//! ```no_run
//! use std::io::Cursor;
//!
//! use byteranges::{parse_range_header, RangedResponse};
//! use tokio::io::AsyncReadExt;
//!
//! #[tokio::main]
//! async fn main() {
//!     let parts = parse_range_header("bytes=0-3, 8-8", "text/plain", "10").unwrap();
//!     let response = RangedResponse::new(Cursor::new(b"0123456789".to_vec()), parts, false).unwrap();
//!     println!("Content-Length: {}", response.content_length());
//!
//!     let mut body = response.into_body();
//!     let mut buf = Vec::new();
//!     body.read_to_end(&mut buf).await.unwrap();
//! }
//! ```
//!
//! [`AsyncRead`]: tokio::io::AsyncRead

mod encode;
mod parse;
mod stream;

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use rand::RngCore;
use tokio::io::AsyncSeek;

pub use encode::{content_length, encode, EncodeError, MultipartWriter};
pub use parse::{parse_range_header, Part, ParseError};
pub use stream::{BodyStream, RangedResponse};

/// [`AsyncSeek`] narrowed to only allow seeking from start.
pub trait AsyncSeekStart {
    /// Same semantics as [`AsyncSeek::start_seek`], always passing position as the `SeekFrom::Start` variant.
    fn start_seek(self: Pin<&mut Self>, position: u64) -> io::Result<()>;

    /// Same semantics as [`AsyncSeek::poll_complete`], returning `()` instead of the new stream position.
    fn poll_complete(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>>;
}

impl<T: AsyncSeek> AsyncSeekStart for T {
    fn start_seek(self: Pin<&mut Self>, position: u64) -> io::Result<()> {
        AsyncSeek::start_seek(self, io::SeekFrom::Start(position))
    }

    fn poll_complete(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        AsyncSeek::poll_complete(self, cx).map_ok(|_| ())
    }
}

/// Generate a fresh multipart boundary token: 30 bytes from the thread-local
/// CSPRNG, hex encoded.
///
/// Stateless; callers that need a fixed token (tests, reproducible output)
/// pass their own boundary to the `with_boundary` entry points instead.
pub fn generate_boundary() -> String {
    let mut raw = [0u8; 30];
    rand::thread_rng().fill_bytes(&mut raw);
    raw.iter().map(|byte| format!("{byte:02x}")).collect()
}
