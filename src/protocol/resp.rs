use crate::error::ProtocolError;
use bytes::{Buf, Bytes, BytesMut};

/// Largest bulk string payload accepted from a client (512 MiB).
pub const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// Largest array element count accepted from a client.
pub const MAX_ARRAY_LEN: i64 = 1024 * 1024;

/// Deepest array nesting the parser will follow.
pub const MAX_DEPTH: usize = 64;

/// Longest CRLF-terminated line accepted from a client: simple strings,
/// errors, integers and length headers (64 KiB).
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// RESP (Redis Serialization Protocol) value types.
///
/// Bulk strings are binary safe. `None` is the null form of bulk strings and
/// arrays, and is distinct from an empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
    SimpleString(String),          // +
    Error(String),                 // -
    Integer(i64),                  // :
    BulkString(Option<Bytes>),     // $ (None = null)
    Array(Option<Vec<RespValue>>), // * (None = null)
}

impl RespValue {
    /// The `+OK` status reply.
    pub fn ok() -> Self {
        RespValue::SimpleString("OK".to_string())
    }

    pub fn bulk(data: impl Into<Bytes>) -> Self {
        RespValue::BulkString(Some(data.into()))
    }

    pub fn null_bulk() -> Self {
        RespValue::BulkString(None)
    }

    pub fn error(message: impl Into<String>) -> Self {
        RespValue::Error(message.into())
    }

    /// Array of non-null bulk strings.
    pub fn bulk_array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
    {
        RespValue::Array(Some(
            items
                .into_iter()
                .map(|item| RespValue::BulkString(Some(item)))
                .collect(),
        ))
    }

    /// Append the wire encoding of this value to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            RespValue::SimpleString(s) => encode_simple_string(dst, s),
            RespValue::Error(e) => encode_error(dst, e),
            RespValue::Integer(i) => encode_integer(dst, *i),
            RespValue::BulkString(Some(data)) => encode_bulk_string(dst, data),
            RespValue::BulkString(None) => encode_null_bulk_string(dst),
            RespValue::Array(Some(items)) => encode_array(dst, items),
            RespValue::Array(None) => encode_null_array(dst),
        }
    }

    /// Serialize this value to Redis wire format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut dst = BytesMut::new();
        self.encode(&mut dst);
        dst.to_vec()
    }
}

/// `+<text>\r\n`
pub fn encode_simple_string(dst: &mut BytesMut, text: &str) {
    debug_assert!(!text.contains(['\r', '\n']));
    dst.extend_from_slice(b"+");
    dst.extend_from_slice(text.as_bytes());
    dst.extend_from_slice(b"\r\n");
}

/// `-<message>\r\n`
///
/// Messages can echo client input (an unknown command name), so CR and LF
/// are replaced with spaces to keep the reply on one line.
pub fn encode_error(dst: &mut BytesMut, message: &str) {
    dst.extend_from_slice(b"-");
    dst.extend(
        message
            .bytes()
            .map(|b| if b == b'\r' || b == b'\n' { b' ' } else { b }),
    );
    dst.extend_from_slice(b"\r\n");
}

/// `:<decimal>\r\n`
pub fn encode_integer(dst: &mut BytesMut, n: i64) {
    dst.extend_from_slice(b":");
    dst.extend_from_slice(n.to_string().as_bytes());
    dst.extend_from_slice(b"\r\n");
}

/// `$<byte-length>\r\n<bytes>\r\n`
pub fn encode_bulk_string(dst: &mut BytesMut, data: &[u8]) {
    dst.extend_from_slice(b"$");
    dst.extend_from_slice(data.len().to_string().as_bytes());
    dst.extend_from_slice(b"\r\n");
    dst.extend_from_slice(data);
    dst.extend_from_slice(b"\r\n");
}

/// `$-1\r\n`
pub fn encode_null_bulk_string(dst: &mut BytesMut) {
    dst.extend_from_slice(b"$-1\r\n");
}

/// `*<count>\r\n` followed by each element's encoding.
pub fn encode_array(dst: &mut BytesMut, items: &[RespValue]) {
    dst.extend_from_slice(b"*");
    dst.extend_from_slice(items.len().to_string().as_bytes());
    dst.extend_from_slice(b"\r\n");
    for item in items {
        item.encode(dst);
    }
}

/// `*-1\r\n`
pub fn encode_null_array(dst: &mut BytesMut) {
    dst.extend_from_slice(b"*-1\r\n");
}

/// Stateful parser for Redis protocol messages.
///
/// Accumulates data in a buffer and parses complete RESP values. Bytes are
/// only consumed once a whole value is available, so an incomplete frame
/// stays buffered until more data arrives.
///
/// Completeness is tracked by a framing-only scan that resumes where the
/// previous call stopped. The value itself is decoded once, after its last
/// byte has arrived.
pub struct RespParser {
    buffer: BytesMut,
    scan: FrameScan,
}

impl Default for RespParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RespParser {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            scan: FrameScan::default(),
        }
    }

    /// Add incoming bytes to the parser buffer.
    pub fn add_data(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Number of buffered bytes not yet consumed by a parsed value.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.scan.clear();
    }

    /// Parse next complete value. Returns `None` if incomplete.
    pub fn parse(&mut self) -> Result<Option<RespValue>, ProtocolError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        tracing::trace!("Parsing buffer: {} bytes", self.buffer.len());

        let Some(frame_len) = self.scan.advance(&self.buffer)? else {
            return Ok(None);
        };

        let mut cursor = Cursor::new(&self.buffer[..frame_len]);
        let value = parse_value(&mut cursor, 0)?.ok_or(ProtocolError::Truncated)?;
        self.buffer.advance(frame_len);
        self.scan.clear();
        Ok(Some(value))
    }

    /// Called when the peer closed the stream: leftover bytes mean a frame
    /// was cut off.
    pub fn finish(&self) -> Result<(), ProtocolError> {
        if self.buffer.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::Truncated)
        }
    }
}

/// Framing progress through the value at the front of the buffer.
///
/// `pos` is where the first element not yet known to be complete starts.
/// `open` holds how many elements each enclosing array still owes, innermost
/// last. Bytes before `pos` are not looked at again.
#[derive(Debug, Default)]
struct FrameScan {
    pos: usize,
    open: Vec<usize>,
}

impl FrameScan {
    fn clear(&mut self) {
        self.pos = 0;
        self.open.clear();
    }

    /// Step over every complete element from `pos` on. Returns the byte length
    /// of the first value once all of it is in `buf`.
    fn advance(&mut self, buf: &[u8]) -> Result<Option<usize>, ProtocolError> {
        loop {
            let mut cursor = Cursor { buf, pos: self.pos };
            let Some(type_byte) = cursor.next_byte() else {
                return Ok(None);
            };

            match type_byte {
                b'+' | b'-' | b':' => {
                    if cursor.read_line()?.is_none() {
                        return Ok(None);
                    }
                }
                b'$' => {
                    let Some(line) = cursor.read_line()? else {
                        return Ok(None);
                    };
                    if let Some(len) = bulk_len(line)? {
                        if cursor.take(len).is_none() || cursor.take(2).is_none() {
                            return Ok(None);
                        }
                    }
                }
                b'*' => {
                    let Some(line) = cursor.read_line()? else {
                        return Ok(None);
                    };
                    if let Some(len) = array_len(line, self.open.len())? {
                        if len > 0 {
                            self.open.push(len);
                            self.pos = cursor.pos;
                            continue;
                        }
                    }
                }
                other => return Err(ProtocolError::UnknownType(other)),
            }

            self.pos = cursor.pos;
            while let Some(remaining) = self.open.last_mut() {
                *remaining -= 1;
                if *remaining > 0 {
                    break;
                }
                self.open.pop();
            }
            if self.open.is_empty() {
                return Ok(Some(self.pos));
            }
        }
    }
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.buf.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let data = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(data)
    }

    /// Read up to the next `\n`, which must be preceded by `\r`. The line
    /// itself may hold at most `MAX_LINE_LEN` bytes.
    fn read_line(&mut self) -> Result<Option<&'a [u8]>, ProtocolError> {
        let buf: &'a [u8] = self.buf;
        let rest = &buf[self.pos..];
        let window = &rest[..rest.len().min(MAX_LINE_LEN + 2)];
        let Some(newline) = window.iter().position(|&b| b == b'\n') else {
            if rest.len() >= MAX_LINE_LEN + 2 {
                return Err(ProtocolError::LineTooLong(MAX_LINE_LEN));
            }
            return Ok(None);
        };
        if newline == 0 || rest[newline - 1] != b'\r' {
            return Err(ProtocolError::MissingCrlf);
        }
        self.pos += newline + 1;
        Ok(Some(&rest[..newline - 1]))
    }
}

fn parse_value(cursor: &mut Cursor<'_>, depth: usize) -> Result<Option<RespValue>, ProtocolError> {
    let Some(type_byte) = cursor.next_byte() else {
        return Ok(None);
    };

    match type_byte {
        b'+' => Ok(parse_text(cursor)?.map(RespValue::SimpleString)),
        b'-' => Ok(parse_text(cursor)?.map(RespValue::Error)),
        b':' => parse_integer(cursor),
        b'$' => parse_bulk_string(cursor),
        b'*' => parse_array(cursor, depth),
        other => Err(ProtocolError::UnknownType(other)),
    }
}

fn parse_text(cursor: &mut Cursor<'_>) -> Result<Option<String>, ProtocolError> {
    let Some(line) = cursor.read_line()? else {
        return Ok(None);
    };
    let text = std::str::from_utf8(line).map_err(|_| ProtocolError::InvalidUtf8)?;
    Ok(Some(text.to_string()))
}

fn parse_integer(cursor: &mut Cursor<'_>) -> Result<Option<RespValue>, ProtocolError> {
    let Some(line) = cursor.read_line()? else {
        return Ok(None);
    };
    let num = parse_i64(line)
        .ok_or_else(|| ProtocolError::InvalidInteger(String::from_utf8_lossy(line).into_owned()))?;
    Ok(Some(RespValue::Integer(num)))
}

fn parse_bulk_string(cursor: &mut Cursor<'_>) -> Result<Option<RespValue>, ProtocolError> {
    let Some(line) = cursor.read_line()? else {
        return Ok(None);
    };
    let Some(length) = bulk_len(line)? else {
        return Ok(Some(RespValue::BulkString(None)));
    };

    let Some(data) = cursor.take(length) else {
        return Ok(None);
    };
    // The two terminator bytes are discarded without being inspected.
    if cursor.take(2).is_none() {
        return Ok(None);
    }

    Ok(Some(RespValue::BulkString(Some(Bytes::copy_from_slice(data)))))
}

fn parse_array(cursor: &mut Cursor<'_>, depth: usize) -> Result<Option<RespValue>, ProtocolError> {
    let Some(line) = cursor.read_line()? else {
        return Ok(None);
    };
    let Some(length) = array_len(line, depth)? else {
        return Ok(Some(RespValue::Array(None)));
    };

    let mut elements = Vec::with_capacity(length.min(1024));
    for _ in 0..length {
        match parse_value(cursor, depth + 1)? {
            Some(element) => elements.push(element),
            None => return Ok(None), // Not enough data
        }
    }

    Ok(Some(RespValue::Array(Some(elements))))
}

/// Payload length from a `$` header, `None` for the null bulk string.
fn bulk_len(line: &[u8]) -> Result<Option<usize>, ProtocolError> {
    let length = parse_i64(line)
        .ok_or_else(|| ProtocolError::InvalidBulkLength(String::from_utf8_lossy(line).into_owned()))?;

    match length {
        -1 => Ok(None),
        n if n < 0 => Err(ProtocolError::InvalidBulkLength(n.to_string())),
        n if n > MAX_BULK_LEN => Err(ProtocolError::FrameTooLarge(n)),
        n => Ok(Some(n as usize)),
    }
}

/// Element count from a `*` header, `None` for the null array. `depth` is the
/// number of arrays enclosing this one.
fn array_len(line: &[u8], depth: usize) -> Result<Option<usize>, ProtocolError> {
    let length = parse_i64(line).ok_or_else(|| {
        ProtocolError::InvalidArrayLength(String::from_utf8_lossy(line).into_owned())
    })?;

    match length {
        -1 => Ok(None),
        n if n < 0 => Err(ProtocolError::InvalidArrayLength(n.to_string())),
        n if n > MAX_ARRAY_LEN => Err(ProtocolError::FrameTooLarge(n)),
        _ if depth >= MAX_DEPTH => Err(ProtocolError::NestingTooDeep(MAX_DEPTH)),
        n => Ok(Some(n as usize)),
    }
}

/// Decimal integer line. An explicit `+` sign is refused: integers and
/// length headers are written as bare digits with an optional `-`.
fn parse_i64(line: &[u8]) -> Option<i64> {
    if line.first() == Some(&b'+') {
        return None;
    }
    std::str::from_utf8(line).ok()?.parse().ok()
}
