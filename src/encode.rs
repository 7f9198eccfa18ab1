use std::future::poll_fn;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::parse::Part;
use crate::AsyncSeekStart;

const IO_BUFFER_SIZE: usize = 64 * 1024;

/// Failure while streaming a range response body.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("i/o failure while encoding range response")]
    Io(#[from] io::Error),
    /// The source ran out before the validated range was fully copied. The
    /// declared size and the real source disagree; never silently truncated.
    #[error("source ended after {actual} of {expected} bytes")]
    SourceExhausted { expected: u64, actual: u64 },
    #[error("no parts to encode")]
    NoParts,
    #[error("multipart writer is already finished")]
    WriterFinished,
}

impl From<EncodeError> for io::Error {
    fn from(err: EncodeError) -> io::Error {
        match err {
            EncodeError::Io(err) => err,
            other => io::Error::other(other),
        }
    }
}

/// Header frame opening one part: boundary line, part headers, blank line.
/// Shared between the encoder and [`content_length`] so the advertised
/// length cannot drift from the bytes actually written.
fn part_header(boundary: &str, part: &Part) -> String {
    format!(
        "\r\n--{boundary}\r\nContent-Type: {}\r\nContent-Range: {}\r\n\r\n",
        part.content_type(),
        part.content_range(),
    )
}

fn closing_frame(boundary: &str) -> String {
    format!("\r\n--{boundary}--")
}

/// Exact byte length of the response body for `parts`, computed before any
/// byte is written.
///
/// A single part carries its bytes directly under a `Content-Range` header,
/// so its length is just the range length. Multiple parts include every
/// frame the encoder will emit, minus 2: the leading CRLF of the first frame
/// completes the preceding header block's terminating blank line and does
/// not count as message body.
pub fn content_length(parts: &[Part], boundary: &str) -> u64 {
    match parts {
        [] => 0,
        [part] => part.byte_len(),
        _ => {
            let framing: u64 = parts
                .iter()
                .map(|part| part_header(boundary, part).len() as u64)
                .sum::<u64>()
                + closing_frame(boundary).len() as u64;
            // aggregate body length saturates instead of wrapping
            let bodies = parts
                .iter()
                .map(Part::byte_len)
                .fold(0u64, u64::saturating_add);
            framing.saturating_add(bodies) - 2
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartState {
    NoPartOpen,
    PartOpen,
    PartClosed,
    Finished,
}

/// Incremental `multipart/byteranges` writer over any [`AsyncWrite`] sink.
///
/// Tracks an explicit part state: body bytes may only be written while a
/// part is open, opening a part forces the previous one closed, and nothing
/// may follow [`finish`](Self::finish).
pub struct MultipartWriter<W> {
    sink: W,
    boundary: String,
    state: PartState,
}

impl<W: AsyncWrite + Unpin> MultipartWriter<W> {
    pub fn new(sink: W, boundary: impl Into<String>) -> Self {
        MultipartWriter {
            sink,
            boundary: boundary.into(),
            state: PartState::NoPartOpen,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Write the header frame for `part` and open it for body writes. Any
    /// previously open part is closed first.
    pub async fn create_part(&mut self, part: &Part) -> Result<(), EncodeError> {
        if self.state == PartState::Finished {
            return Err(EncodeError::WriterFinished);
        }
        self.sink
            .write_all(part_header(&self.boundary, part).as_bytes())
            .await?;
        self.state = PartState::PartOpen;
        Ok(())
    }

    /// Close the currently open part. Writes nothing; the next boundary line
    /// is the on-wire terminator.
    pub fn close_part(&mut self) {
        if self.state == PartState::PartOpen {
            self.state = PartState::PartClosed;
        }
    }

    /// Write the closing boundary frame. No further parts or writes are
    /// accepted afterwards.
    pub async fn finish(&mut self) -> Result<(), EncodeError> {
        if self.state == PartState::Finished {
            return Err(EncodeError::WriterFinished);
        }
        self.sink
            .write_all(closing_frame(&self.boundary).as_bytes())
            .await?;
        self.state = PartState::Finished;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for MultipartWriter<W> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let message = match this.state {
            PartState::PartOpen => return Pin::new(&mut this.sink).poll_write(cx, buf),
            PartState::NoPartOpen => "create a part before writing",
            PartState::PartClosed => "last part is closed",
            PartState::Finished => "writer is finished",
        };
        Poll::Ready(Err(io::Error::new(io::ErrorKind::InvalidInput, message)))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().sink).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().sink).poll_shutdown(cx)
    }
}

async fn seek_to<S>(src: &mut S, position: u64) -> io::Result<()>
where
    S: AsyncSeekStart + Unpin,
{
    Pin::new(&mut *src).start_seek(position)?;
    poll_fn(|cx| Pin::new(&mut *src).poll_complete(cx)).await
}

/// Seek to the part's start offset and copy exactly its byte count from
/// `src` to `dst`. A short source is a hard failure.
async fn copy_range<S, W>(src: &mut S, dst: &mut W, part: &Part) -> Result<(), EncodeError>
where
    S: AsyncRead + AsyncSeekStart + Unpin,
    W: AsyncWrite + Unpin,
{
    seek_to(src, part.start()).await?;

    let expected = part.byte_len();
    let mut copied = 0u64;
    let mut buf = vec![0u8; IO_BUFFER_SIZE];
    while copied < expected {
        let want = usize::try_from(expected - copied)
            .unwrap_or(usize::MAX)
            .min(IO_BUFFER_SIZE);
        let n = src.read(&mut buf[..want]).await?;
        if n == 0 {
            return Err(EncodeError::SourceExhausted {
                expected,
                actual: copied,
            });
        }
        dst.write_all(&buf[..n]).await?;
        copied += n as u64;
    }
    Ok(())
}

/// Stream the response body for `parts` from `src` into `dst`.
///
/// One part produces the raw range bytes with no framing; two or more
/// produce `multipart/byteranges` frames separated by `boundary`, closed by
/// the final `--boundary--` frame. Parts are emitted in list order, and the
/// encoder owns `src`'s seek position for the duration of the call.
pub async fn encode<S, W>(
    src: &mut S,
    dst: &mut W,
    parts: &[Part],
    boundary: &str,
) -> Result<(), EncodeError>
where
    S: AsyncRead + AsyncSeekStart + Unpin,
    W: AsyncWrite + Unpin,
{
    match parts {
        [] => Err(EncodeError::NoParts),
        [part] => copy_range(src, dst, part).await,
        _ => {
            let mut writer = MultipartWriter::new(&mut *dst, boundary);
            for part in parts {
                writer.create_part(part).await?;
                copy_range(src, &mut writer, part).await?;
                writer.close_part();
            }
            writer.finish().await
        }
    }
}
