use std::collections::BTreeMap;
use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::channel::mpsc;
use futures::{SinkExt, Stream};
use http_body::{Body, Frame, SizeHint};
use pin_project::pin_project;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};
use tracing::debug;

use crate::encode::{content_length, encode, EncodeError};
use crate::parse::Part;
use crate::{generate_boundary, AsyncSeekStart};

/// Chunks buffered in the conduit before the producer blocks on the
/// consumer. Bounds memory regardless of range sizes.
const CONDUIT_CAPACITY: usize = 8;

const STATUS_LINE: &[u8] = b"HTTP/1.1 206 Partial Content\r\n";

fn broken_conduit() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "response body reader is gone")
}

/// Producer end of the body conduit. Each write becomes one ordered chunk;
/// writes park until the consumer drains, and fail with `BrokenPipe` once
/// the consumer is gone.
struct ConduitWriter {
    tx: mpsc::Sender<Result<Bytes, EncodeError>>,
}

impl ConduitWriter {
    /// Hand the error to the consumer as its terminal read result, parking
    /// until the conduit has room so buffered chunks cannot bury it. A send
    /// failure means the consumer already hung up.
    async fn close_with_error(&mut self, err: EncodeError) {
        let _ = self.tx.send(Err(err)).await;
        self.tx.close_channel();
    }
}

impl AsyncWrite for ConduitWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }
        match ready!(this.tx.poll_ready(cx)) {
            Ok(()) => match this.tx.start_send(Ok(Bytes::copy_from_slice(buf))) {
                Ok(()) => Poll::Ready(Ok(buf.len())),
                Err(_) => Poll::Ready(Err(broken_conduit())),
            },
            Err(_) => Poll::Ready(Err(broken_conduit())),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        // chunks are handed over on write, nothing to flush
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.get_mut().tx.close_channel();
        Poll::Ready(Ok(()))
    }
}

/// Consumer end of the body conduit.
///
/// Yields the response body in producer order via [`Stream`], [`AsyncRead`],
/// or [`http_body::Body`]. An encoding failure arrives as a terminal read
/// error rather than a silent EOF; dropping this stream cancels the
/// producer.
#[pin_project]
pub struct BodyStream {
    #[pin]
    rx: mpsc::Receiver<Result<Bytes, EncodeError>>,
    chunk: Bytes,
    // leading bytes still to be discarded before anything is yielded
    trim: usize,
    exact_size: Option<u64>,
    done: bool,
}

impl Stream for BodyStream {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<io::Result<Bytes>>> {
        let mut this = self.project();
        loop {
            if *this.trim > 0 && !this.chunk.is_empty() {
                let n = (*this.trim).min(this.chunk.len());
                let _ = this.chunk.split_to(n);
                *this.trim -= n;
            }
            if !this.chunk.is_empty() {
                return Poll::Ready(Some(Ok(std::mem::take(this.chunk))));
            }
            if *this.done {
                return Poll::Ready(None);
            }
            match ready!(this.rx.as_mut().poll_next(cx)) {
                Some(Ok(bytes)) => *this.chunk = bytes,
                Some(Err(err)) => {
                    *this.done = true;
                    return Poll::Ready(Some(Err(err.into())));
                }
                None => {
                    *this.done = true;
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl AsyncRead for BodyStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let mut this = self.project();
        loop {
            if *this.trim > 0 && !this.chunk.is_empty() {
                let n = (*this.trim).min(this.chunk.len());
                let _ = this.chunk.split_to(n);
                *this.trim -= n;
            }
            if !this.chunk.is_empty() {
                let n = this.chunk.len().min(buf.remaining());
                buf.put_slice(&this.chunk.split_to(n));
                return Poll::Ready(Ok(()));
            }
            if *this.done {
                return Poll::Ready(Ok(()));
            }
            match ready!(this.rx.as_mut().poll_next(cx)) {
                Some(Ok(bytes)) => *this.chunk = bytes,
                Some(Err(err)) => {
                    *this.done = true;
                    return Poll::Ready(Err(err.into()));
                }
                None => {
                    *this.done = true;
                    return Poll::Ready(Ok(()));
                }
            }
        }
    }
}

impl Body for BodyStream {
    type Data = Bytes;
    type Error = io::Error;

    fn size_hint(&self) -> SizeHint {
        match self.exact_size {
            Some(size) => SizeHint::with_exact(size),
            None => SizeHint::default(),
        }
    }

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<io::Result<Frame<Bytes>>>> {
        self.poll_next(cx)
            .map(|item| item.map(|result| result.map(Frame::data)))
    }
}

#[derive(Debug)]
enum ResponseKind {
    Single {
        content_range: String,
        content_type: String,
    },
    Multipart {
        content_type: String,
    },
}

/// A fully prepared range response: the exact body length, computed before
/// any byte is produced, plus the body itself streaming from a producer
/// task.
pub struct RangedResponse {
    content_length: u64,
    boundary: String,
    kind: ResponseKind,
    body: BodyStream,
}

impl RangedResponse {
    /// Like [`with_boundary`](Self::with_boundary) with a freshly generated
    /// boundary token.
    pub fn new<S>(src: S, parts: Vec<Part>, emit_headers: bool) -> Result<Self, EncodeError>
    where
        S: AsyncRead + AsyncSeekStart + Unpin + Send + 'static,
    {
        Self::with_boundary(src, parts, generate_boundary(), emit_headers)
    }

    /// Prepare the response and start encoding on a spawned producer task,
    /// which owns `src` until the body is fully streamed or abandoned. Must
    /// be called within a tokio runtime.
    ///
    /// With `emit_headers` the conduit starts with the `206 Partial Content`
    /// status line and headers sorted by name; otherwise it carries only the
    /// body, which is what [`IntoResponse`] expects.
    pub fn with_boundary<S>(
        src: S,
        parts: Vec<Part>,
        boundary: String,
        emit_headers: bool,
    ) -> Result<Self, EncodeError>
    where
        S: AsyncRead + AsyncSeekStart + Unpin + Send + 'static,
    {
        if parts.is_empty() {
            return Err(EncodeError::NoParts);
        }

        let content_length = content_length(&parts, &boundary);
        let kind = match &parts[..] {
            [part] => ResponseKind::Single {
                content_range: part.content_range(),
                content_type: part.content_type().to_string(),
            },
            _ => ResponseKind::Multipart {
                content_type: format!("multipart/byteranges; boundary={boundary}"),
            },
        };
        // an exact hint only holds when the conduit carries the bare
        // single-range body; multipart output keeps its leading CRLF
        let exact_size = match (&kind, emit_headers) {
            (ResponseKind::Single { .. }, false) => Some(content_length),
            _ => None,
        };

        debug!(
            parts = parts.len(),
            content_length, emit_headers, "streaming range response"
        );

        let (tx, rx) = mpsc::channel(CONDUIT_CAPACITY);
        tokio::spawn(produce(src, parts, boundary.clone(), emit_headers, tx));

        Ok(RangedResponse {
            content_length,
            boundary,
            kind,
            body: BodyStream {
                rx,
                chunk: Bytes::new(),
                trim: 0,
                exact_size,
                done: false,
            },
        })
    }

    /// Body length for the `Content-Length` header, excluding any preamble.
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self.kind, ResponseKind::Multipart { .. })
    }

    pub fn into_body(self) -> BodyStream {
        self.body
    }
}

impl IntoResponse for RangedResponse {
    fn into_response(self) -> Response {
        let content_length = HeaderValue::from(self.content_length);
        match self.kind {
            ResponseKind::Single {
                content_range,
                content_type,
            } => {
                let headers = [
                    (header::ACCEPT_RANGES, HeaderValue::from_static("bytes")),
                    (header::CONTENT_LENGTH, content_length),
                    (
                        header::CONTENT_RANGE,
                        HeaderValue::from_str(&content_range)
                            .expect("validated ranges render to ascii"),
                    ),
                    (
                        header::CONTENT_TYPE,
                        HeaderValue::from_str(&content_type).unwrap_or_else(|_| {
                            HeaderValue::from_static("application/octet-stream")
                        }),
                    ),
                ];
                (
                    StatusCode::PARTIAL_CONTENT,
                    headers,
                    axum::body::Body::new(self.body),
                )
                    .into_response()
            }
            ResponseKind::Multipart { content_type } => {
                let headers = [
                    (header::ACCEPT_RANGES, HeaderValue::from_static("bytes")),
                    (header::CONTENT_LENGTH, content_length),
                    (
                        header::CONTENT_TYPE,
                        HeaderValue::from_str(&content_type)
                            .expect("boundary must be a valid header token"),
                    ),
                ];
                // the transport writes the header-block terminator itself,
                // so the first frame's leading CRLF must not go out as body
                let mut body = self.body;
                body.trim = 2;
                body.exact_size = Some(self.content_length);
                (
                    StatusCode::PARTIAL_CONTENT,
                    headers,
                    axum::body::Body::new(body),
                )
                    .into_response()
            }
        }
    }
}

async fn produce<S>(
    mut src: S,
    parts: Vec<Part>,
    boundary: String,
    emit_headers: bool,
    tx: mpsc::Sender<Result<Bytes, EncodeError>>,
) where
    S: AsyncRead + AsyncSeekStart + Unpin,
{
    let mut sink = ConduitWriter { tx };
    if let Err(err) = write_response(&mut src, &mut sink, &parts, &boundary, emit_headers).await {
        debug!(error = %err, "range response abandoned");
        sink.close_with_error(err).await;
    }
}

async fn write_response<S, W>(
    src: &mut S,
    sink: &mut W,
    parts: &[Part],
    boundary: &str,
    emit_headers: bool,
) -> Result<(), EncodeError>
where
    S: AsyncRead + AsyncSeekStart + Unpin,
    W: AsyncWrite + Unpin,
{
    if emit_headers {
        sink.write_all(&preamble(parts, boundary)).await?;
    }
    encode(src, sink, parts, boundary).await?;
    sink.flush().await?;
    Ok(())
}

/// Status line and headers preceding the body when header emission is on.
fn preamble(parts: &[Part], boundary: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(STATUS_LINE);

    let mut headers = BTreeMap::new();
    match parts {
        [part] => {
            headers.insert("Content-Range", part.content_range());
        }
        _ => {
            headers.insert(
                "Content-Type",
                format!("multipart/byteranges; boundary={boundary}"),
            );
        }
    }
    write_headers(&mut buf, &headers);

    if parts.len() == 1 {
        // terminate the header block; in the multipart case the first
        // frame's leading CRLF does this
        buf.extend_from_slice(b"\r\n");
    }
    buf
}

fn write_headers(buf: &mut Vec<u8>, headers: &BTreeMap<&str, String>) {
    // BTreeMap iteration gives the lexicographic header order on the wire
    for (name, value) in headers {
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use assert_matches::assert_matches;
    use futures::{pin_mut, StreamExt};
    use tokio::io::AsyncReadExt;

    use crate::parse::parse_range_header;

    use super::*;

    const BOUNDARY: &str = "THIS_STRING_SEPARATES";
    const CTYPE: &str = "application/octet-stream";

    fn crlf(text: &str) -> Vec<u8> {
        text.replace('\n', "\r\n").into_bytes()
    }

    fn respond(content: &[u8], header: &str, size: &str, emit_headers: bool) -> RangedResponse {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let parts = parse_range_header(header, CTYPE, size).unwrap();
        RangedResponse::with_boundary(
            Cursor::new(content.to_vec()),
            parts,
            BOUNDARY.to_string(),
            emit_headers,
        )
        .unwrap()
    }

    async fn read_all(response: RangedResponse) -> Vec<u8> {
        let mut body = response.into_body();
        let mut out = Vec::new();
        body.read_to_end(&mut out).await.unwrap();
        out
    }

    fn body_after_headers(out: &[u8]) -> &[u8] {
        let at = out
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .unwrap();
        &out[at + 4..]
    }

    #[tokio::test]
    async fn multi_part_response_with_preamble() {
        let response = respond(b"10110", "bytes=1-2, 3-3, -2, 2-", "5", true);
        let content_length = response.content_length();
        assert!(response.is_multipart());

        let out = read_all(response).await;
        let expected = crlf(
            "HTTP/1.1 206 Partial Content\n\
             Content-Type: multipart/byteranges; boundary=THIS_STRING_SEPARATES\n\
             \n\
             --THIS_STRING_SEPARATES\n\
             Content-Type: application/octet-stream\n\
             Content-Range: bytes 1-2/5\n\
             \n\
             01\n\
             --THIS_STRING_SEPARATES\n\
             Content-Type: application/octet-stream\n\
             Content-Range: bytes 3-3/5\n\
             \n\
             1\n\
             --THIS_STRING_SEPARATES\n\
             Content-Type: application/octet-stream\n\
             Content-Range: bytes -2/5\n\
             \n\
             10\n\
             --THIS_STRING_SEPARATES\n\
             Content-Type: application/octet-stream\n\
             Content-Range: bytes 2-/5\n\
             \n\
             110\n\
             --THIS_STRING_SEPARATES--",
        );
        assert_eq!(expected, out);
        assert_eq!(content_length as usize, body_after_headers(&out).len());
    }

    #[tokio::test]
    async fn multi_part_response_with_unknown_size() {
        let response = respond(b"10110", "bytes=0-1, 3-3", "*", true);
        let content_length = response.content_length();

        let out = read_all(response).await;
        let expected = crlf(
            "HTTP/1.1 206 Partial Content\n\
             Content-Type: multipart/byteranges; boundary=THIS_STRING_SEPARATES\n\
             \n\
             --THIS_STRING_SEPARATES\n\
             Content-Type: application/octet-stream\n\
             Content-Range: bytes 0-1/*\n\
             \n\
             10\n\
             --THIS_STRING_SEPARATES\n\
             Content-Type: application/octet-stream\n\
             Content-Range: bytes 3-3/*\n\
             \n\
             1\n\
             --THIS_STRING_SEPARATES--",
        );
        assert_eq!(expected, out);
        assert_eq!(content_length as usize, body_after_headers(&out).len());
    }

    #[tokio::test]
    async fn single_part_responses_with_preamble() {
        let cases = [
            (
                "bytes=1-2",
                "5",
                "HTTP/1.1 206 Partial Content\nContent-Range: bytes 1-2/5\n\n01",
            ),
            (
                "bytes=2-",
                "5",
                "HTTP/1.1 206 Partial Content\nContent-Range: bytes 2-/5\n\n110",
            ),
            (
                "bytes=-2",
                "5",
                "HTTP/1.1 206 Partial Content\nContent-Range: bytes -2/5\n\n10",
            ),
            (
                "bytes=1-2",
                "*",
                "HTTP/1.1 206 Partial Content\nContent-Range: bytes 1-2/*\n\n01",
            ),
        ];
        for (header, size, expected) in cases {
            let response = respond(b"10110", header, size, true);
            let content_length = response.content_length();
            let out = read_all(response).await;
            assert_eq!(crlf(expected), out, "case {header}");
            assert_eq!(content_length as usize, body_after_headers(&out).len());
        }
    }

    #[tokio::test]
    async fn single_part_body_without_preamble() {
        let response = respond(b"10110", "bytes=1-2", "5", false);
        assert_eq!(2, response.content_length());
        assert!(!response.is_multipart());
        assert_eq!(b"01", &read_all(response).await[..]);
    }

    #[tokio::test]
    async fn body_streams_in_order_as_chunks() {
        let response = respond(b"0123456789", "bytes=0-3, 8-8", "10", false);
        let stream = response.into_body();
        pin_mut!(stream);

        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await.transpose().unwrap() {
            out.extend_from_slice(&chunk);
        }
        let expected = crlf(
            "\n--THIS_STRING_SEPARATES\n\
             Content-Type: application/octet-stream\n\
             Content-Range: bytes 0-3/10\n\
             \n\
             0123\n\
             --THIS_STRING_SEPARATES\n\
             Content-Type: application/octet-stream\n\
             Content-Range: bytes 8-8/10\n\
             \n\
             8\n\
             --THIS_STRING_SEPARATES--",
        );
        assert_eq!(expected, out);
    }

    #[tokio::test]
    async fn consumer_can_start_before_the_producer_finishes() {
        // much larger than the conduit can buffer, so the producer parks on
        // a full channel until the consumer drains it
        let content: Vec<u8> = (0..1024 * 1024u32).map(|n| n as u8).collect();
        let size = content.len().to_string();
        let response = respond(&content, "bytes=0-", &size, false);
        assert_eq!(content.len() as u64, response.content_length());

        let out = read_all(response).await;
        assert_eq!(content, out);
    }

    #[tokio::test]
    async fn encoder_failure_surfaces_as_read_error() {
        // declared size promises more than the source holds
        let response = respond(b"0123", "bytes=0-9", "10", false);
        let mut body = response.into_body();
        let mut out = Vec::new();
        let err = body.read_to_end(&mut out).await.unwrap_err();
        assert_eq!(io::ErrorKind::Other, err.kind());
    }

    #[tokio::test]
    async fn empty_part_list_is_rejected() {
        let result = RangedResponse::with_boundary(
            Cursor::new(b"0123".to_vec()),
            Vec::new(),
            BOUNDARY.to_string(),
            false,
        );
        assert_matches!(result.map(|_| ()), Err(EncodeError::NoParts));
    }

    struct TrickleSource {
        inner: Cursor<Vec<u8>>,
    }

    impl AsyncRead for TrickleSource {
        fn poll_read(
            self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let mut byte = [0u8; 1];
            let mut one = ReadBuf::new(&mut byte);
            ready!(Pin::new(&mut self.get_mut().inner).poll_read(cx, &mut one))?;
            buf.put_slice(one.filled());
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncSeekStart for TrickleSource {
        fn start_seek(self: Pin<&mut Self>, position: u64) -> io::Result<()> {
            AsyncSeekStart::start_seek(Pin::new(&mut self.get_mut().inner), position)
        }

        fn poll_complete(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            AsyncSeekStart::poll_complete(Pin::new(&mut self.get_mut().inner), cx)
        }
    }

    #[tokio::test]
    async fn failure_behind_a_full_conduit_still_surfaces() {
        // one-byte chunks fill the conduit before the source runs dry
        // short of the declared range
        let src = TrickleSource {
            inner: Cursor::new(vec![b'x'; CONDUIT_CAPACITY + 1]),
        };
        let parts = parse_range_header("bytes=0-99", CTYPE, "100").unwrap();
        let response =
            RangedResponse::with_boundary(src, parts, BOUNDARY.to_string(), false).unwrap();

        let mut body = response.into_body();
        let mut out = Vec::new();
        let err = body.read_to_end(&mut out).await.unwrap_err();
        assert_eq!(io::ErrorKind::Other, err.kind());
    }

    struct WatchedSource {
        inner: Cursor<Vec<u8>>,
        dropped: Arc<AtomicBool>,
    }

    impl Drop for WatchedSource {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    impl AsyncRead for WatchedSource {
        fn poll_read(
            self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Pin::new(&mut self.get_mut().inner).poll_read(cx, buf)
        }
    }

    impl AsyncSeekStart for WatchedSource {
        fn start_seek(self: Pin<&mut Self>, position: u64) -> io::Result<()> {
            AsyncSeekStart::start_seek(Pin::new(&mut self.get_mut().inner), position)
        }

        fn poll_complete(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            AsyncSeekStart::poll_complete(Pin::new(&mut self.get_mut().inner), cx)
        }
    }

    #[tokio::test]
    async fn dropped_reader_stops_the_producer() {
        let dropped = Arc::new(AtomicBool::new(false));
        let content: Vec<u8> = (0..1024 * 1024u32).map(|n| n as u8).collect();
        let size = content.len().to_string();
        let parts = parse_range_header("bytes=0-", CTYPE, &size).unwrap();

        let src = WatchedSource {
            inner: Cursor::new(content),
            dropped: dropped.clone(),
        };
        let response =
            RangedResponse::with_boundary(src, parts, BOUNDARY.to_string(), false).unwrap();

        let mut body = response.into_body();
        let mut buf = [0u8; 1024];
        body.read(&mut buf).await.unwrap();
        drop(body);

        // the producer sees the broken conduit and releases the source
        for _ in 0..200 {
            if dropped.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn into_response_sets_multipart_headers() {
        let response = respond(b"0123456789", "bytes=0-3, 8-8", "10", false);
        let content_length = response.content_length();
        let response = response.into_response();

        assert_eq!(StatusCode::PARTIAL_CONTENT, response.status());
        let head = response.headers();
        assert_eq!(
            Some(HeaderValue::from_static("bytes")).as_ref(),
            head.get("Accept-Ranges")
        );
        assert_eq!(
            Some(HeaderValue::from(content_length)).as_ref(),
            head.get("Content-Length")
        );
        assert_eq!(
            Some(HeaderValue::from_static(
                "multipart/byteranges; boundary=THIS_STRING_SEPARATES"
            ))
            .as_ref(),
            head.get("Content-Type")
        );

        // the body must carry exactly the advertised length, starting at
        // the first boundary line with no leading CRLF
        let stream = response.into_body().into_data_stream();
        pin_mut!(stream);
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await.transpose().unwrap() {
            out.extend_from_slice(&chunk);
        }
        assert_eq!(content_length as usize, out.len());
        assert!(out.starts_with(b"--THIS_STRING_SEPARATES\r\n"));
        assert!(out.ends_with(b"\r\n--THIS_STRING_SEPARATES--"));
    }

    #[tokio::test]
    async fn into_response_sets_single_range_headers() {
        let response = respond(b"10110", "bytes=1-2", "5", false);
        let response = response.into_response();

        assert_eq!(StatusCode::PARTIAL_CONTENT, response.status());
        let head = response.headers();
        assert_eq!(
            Some(HeaderValue::from_static("bytes 1-2/5")).as_ref(),
            head.get("Content-Range")
        );
        assert_eq!(
            Some(HeaderValue::from_static("2")).as_ref(),
            head.get("Content-Length")
        );
    }
}
