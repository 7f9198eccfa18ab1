use thiserror::Error;

const UNIT_PREFIX: &str = "bytes=";
const UNKNOWN_SIZE: &str = "*";

/// Failure to turn a `Range` header value into a part list. All variants are
/// client errors; none of them is transient.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("range unit is not bytes")]
    UnsupportedUnit,
    #[error("range {0:?} has no `-` separator")]
    MissingSeparator(String),
    #[error("invalid file size {0:?}")]
    InvalidFileSize(String),
    #[error("invalid range start {0:?}")]
    InvalidRangeStart(String),
    #[error("invalid range end {0:?}")]
    InvalidRangeEnd(String),
    #[error("range has neither start nor end")]
    EmptyRange,
    #[error("suffix range requires a known file size")]
    SuffixNeedsSize,
    #[error("open-ended range requires a known file size")]
    OpenRangeNeedsSize,
}

/// One resolved, validated byte-range descriptor.
///
/// Keeps both the raw textual bounds as they appeared in the request and the
/// resolved inclusive offsets. The raw forms are what go on the wire in
/// `Content-Range` part headers, so re-parsing an emitted header yields the
/// same resolved offsets. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    content_type: String,
    start_text: String,
    end_text: String,
    size_text: String,
    start: u64,
    end: u64,
    size: Option<u64>,
}

impl Part {
    /// Content type advertised in this part's header frame.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Resolved inclusive start offset.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Resolved inclusive end offset.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Total resource size, `None` when the request declared it unknown.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Number of body bytes this part covers.
    pub fn byte_len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value in the raw textual form of the request,
    /// e.g. `bytes 1-2/5`, `bytes -2/5`, or `bytes 0-1/*`.
    pub fn content_range(&self) -> String {
        format!(
            "bytes {}-{}/{}",
            self.start_text, self.end_text, self.size_text
        )
    }
}

/// Parse a raw `Range` header value against a declared resource size into an
/// ordered part list.
///
/// `file_size` is the decimal resource size, or `*` when unknown. An empty
/// header value means no range was requested and yields an empty list. Ranges
/// are kept in request order; overlapping or out-of-order ranges pass through
/// as given. The first invalid token fails the whole header.
pub fn parse_range_header(
    value: &str,
    content_type: &str,
    file_size: &str,
) -> Result<Vec<Part>, ParseError> {
    if value.is_empty() {
        return Ok(Vec::new());
    }

    let Some(spec) = value.strip_prefix(UNIT_PREFIX) else {
        return Err(ParseError::UnsupportedUnit);
    };

    let mut parts = Vec::new();
    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let Some((start_text, end_text)) = token.split_once('-') else {
            return Err(ParseError::MissingSeparator(token.to_string()));
        };

        parts.push(resolve(
            content_type,
            start_text.trim(),
            end_text.trim(),
            file_size,
        )?);
    }

    Ok(parts)
}

/// Resolve one raw range token into concrete offsets, validating as we go.
/// Check order: size, end, suffix resolution, start.
fn resolve(
    content_type: &str,
    start_text: &str,
    end_text: &str,
    size_text: &str,
) -> Result<Part, ParseError> {
    let size = parse_size(size_text)?;

    let (start, end) = if !end_text.is_empty() {
        let end: u64 = end_text
            .parse()
            .map_err(|_| ParseError::InvalidRangeEnd(end_text.to_string()))?;
        // an inclusive end at the numeric limit would overflow the range
        // length
        if end == u64::MAX || size.is_some_and(|size| end >= size) {
            return Err(ParseError::InvalidRangeEnd(end_text.to_string()));
        }

        if start_text.is_empty() {
            // suffix range: the end token is a length counted back from the
            // end of the resource
            let size = size.ok_or(ParseError::SuffixNeedsSize)?;
            if end == 0 {
                return Err(ParseError::InvalidRangeEnd(end_text.to_string()));
            }
            (size - end, size - 1)
        } else {
            (parse_start(start_text, size, end)?, end)
        }
    } else {
        // open-ended range: an implicit end can only come from a known size
        let size = size.ok_or(ParseError::OpenRangeNeedsSize)?;
        if start_text.is_empty() {
            return Err(ParseError::EmptyRange);
        }
        let end = size - 1;
        (parse_start(start_text, Some(size), end)?, end)
    };

    Ok(Part {
        content_type: content_type.to_string(),
        start_text: start_text.to_string(),
        end_text: end_text.to_string(),
        size_text: size_text.to_string(),
        start,
        end,
        size,
    })
}

fn parse_size(size_text: &str) -> Result<Option<u64>, ParseError> {
    if size_text == UNKNOWN_SIZE {
        return Ok(None);
    }
    let size: u64 = size_text
        .parse()
        .map_err(|_| ParseError::InvalidFileSize(size_text.to_string()))?;
    if size == 0 {
        return Err(ParseError::InvalidFileSize(size_text.to_string()));
    }
    Ok(Some(size))
}

fn parse_start(start_text: &str, size: Option<u64>, end: u64) -> Result<u64, ParseError> {
    let start: u64 = start_text
        .parse()
        .map_err(|_| ParseError::InvalidRangeStart(start_text.to_string()))?;
    if size.is_some_and(|size| start >= size) || start > end {
        return Err(ParseError::InvalidRangeStart(start_text.to_string()));
    }
    Ok(start)
}
