//! Decoder for PHP `serialize()` output.
//!
//! WordPress stores structured options and post meta (`sticky_posts`,
//! `_wp_attachment_metadata`, ...) in this format. Only decoding is supported.
//!
//! ```text
//! a:2:{s:5:"width";i:1024;s:4:"file";s:18:"2019/01/photo.jpg";}
//! ```
//!
//! Numbers are frequently stored as numeric strings, so [`PhpValue::as_int`]
//! accepts both `i:1024;` and `s:4:"1024";`.

/// Errors raised while decoding a serialized PHP value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEof(usize),

    #[error("unexpected byte {found:?} at {pos}, expected {expected:?}")]
    Unexpected {
        pos: usize,
        expected: char,
        found: char,
    },

    #[error("unknown type tag {tag:?} at byte {pos}")]
    UnknownTag { pos: usize, tag: char },

    #[error("invalid number at byte {0}")]
    InvalidNumber(usize),

    #[error("string is not valid UTF-8 at byte {0}")]
    InvalidUtf8(usize),

    #[error("trailing data after value at byte {0}")]
    TrailingData(usize),

    #[error("arrays nested deeper than {MAX_DEPTH} levels at byte {0}")]
    TooDeep(usize),
}

/// Nesting limit for arrays and objects. WordPress metadata stays a few
/// levels deep; anything beyond this is rejected before it can exhaust the
/// stack.
const MAX_DEPTH: usize = 64;

/// A decoded PHP value. Arrays keep their insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<(PhpValue, PhpValue)>),
}

impl PhpValue {
    /// Looks up a string key in an array value.
    pub fn get(&self, key: &str) -> Option<&PhpValue> {
        match self {
            PhpValue::Array(entries) => entries
                .iter()
                .find(|(k, _)| matches!(k, PhpValue::Str(s) if s == key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Integer value of an `i:` entry or of a numeric string.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PhpValue::Int(i) => Some(*i),
            PhpValue::Str(s) => s.trim().parse().ok(),
            PhpValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PhpValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar rendered as text, as PHP would echo it.
    pub fn to_text(&self) -> Option<String> {
        match self {
            PhpValue::Str(s) => Some(s.clone()),
            PhpValue::Int(i) => Some(i.to_string()),
            PhpValue::Float(f) => Some(f.to_string()),
            PhpValue::Bool(b) => Some(if *b { "1" } else { "" }.to_string()),
            PhpValue::Null | PhpValue::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&[(PhpValue, PhpValue)]> {
        match self {
            PhpValue::Array(entries) => Some(entries),
            _ => None,
        }
    }
}

/// Decodes one serialized value spanning the whole input.
pub fn unserialize(input: &str) -> Result<PhpValue, DecodeError> {
    let mut parser = Parser {
        bytes: input.as_bytes(),
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;

    if parser.pos != parser.bytes.len() {
        return Err(DecodeError::TrailingData(parser.pos));
    }

    Ok(value)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Result<u8, DecodeError> {
        self.bytes
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::UnexpectedEof(self.pos))
    }

    fn bump(&mut self) -> Result<u8, DecodeError> {
        let b = self.peek()?;
        self.pos += 1;
        Ok(b)
    }

    fn expect(&mut self, expected: u8) -> Result<(), DecodeError> {
        let pos = self.pos;
        let found = self.bump()?;
        if found != expected {
            return Err(DecodeError::Unexpected {
                pos,
                expected: expected as char,
                found: found as char,
            });
        }
        Ok(())
    }

    /// Reads raw bytes up to (not including) `terminator` and consumes it.
    fn until(&mut self, terminator: u8) -> Result<&str, DecodeError> {
        let start = self.pos;
        let len = self.bytes[start..]
            .iter()
            .position(|b| *b == terminator)
            .ok_or(DecodeError::UnexpectedEof(self.bytes.len()))?;
        self.pos = start + len + 1;
        std::str::from_utf8(&self.bytes[start..start + len])
            .map_err(|_| DecodeError::InvalidUtf8(start))
    }

    fn integer(&mut self, terminator: u8) -> Result<i64, DecodeError> {
        let start = self.pos;
        self.until(terminator)?
            .parse()
            .map_err(|_| DecodeError::InvalidNumber(start))
    }

    fn length(&mut self) -> Result<usize, DecodeError> {
        let start = self.pos;
        usize::try_from(self.integer(b':')?).map_err(|_| DecodeError::InvalidNumber(start))
    }

    fn string_body(&mut self) -> Result<String, DecodeError> {
        let len = self.length()?;
        self.expect(b'"')?;
        let start = self.pos;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(DecodeError::UnexpectedEof(self.bytes.len()))?;
        let s = std::str::from_utf8(&self.bytes[start..end])
            .map_err(|_| DecodeError::InvalidUtf8(start))?
            .to_string();
        self.pos = end;
        self.expect(b'"')?;
        Ok(s)
    }

    fn entries(&mut self) -> Result<Vec<(PhpValue, PhpValue)>, DecodeError> {
        if self.depth >= MAX_DEPTH {
            return Err(DecodeError::TooDeep(self.pos));
        }
        self.depth += 1;

        let count = self.length()?;
        self.expect(b'{')?;
        let mut entries = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            let key = self.value()?;
            let value = self.value()?;
            entries.push((key, value));
        }
        self.expect(b'}')?;
        self.depth -= 1;
        Ok(entries)
    }

    fn value(&mut self) -> Result<PhpValue, DecodeError> {
        let pos = self.pos;
        let tag = self.bump()?;

        if tag == b'N' {
            self.expect(b';')?;
            return Ok(PhpValue::Null);
        }

        self.expect(b':')?;

        match tag {
            b'b' => {
                let v = self.integer(b';')?;
                Ok(PhpValue::Bool(v != 0))
            }
            b'i' => Ok(PhpValue::Int(self.integer(b';')?)),
            b'd' => {
                let start = self.pos;
                let raw = self.until(b';')?;
                let f = match raw {
                    "INF" => f64::INFINITY,
                    "-INF" => f64::NEG_INFINITY,
                    "NAN" => f64::NAN,
                    other => other
                        .parse()
                        .map_err(|_| DecodeError::InvalidNumber(start))?,
                };
                Ok(PhpValue::Float(f))
            }
            b's' => {
                let s = self.string_body()?;
                self.expect(b';')?;
                Ok(PhpValue::Str(s))
            }
            b'a' => Ok(PhpValue::Array(self.entries()?)),
            // Objects decode as their property table; the class name is dropped.
            b'O' => {
                self.string_body()?;
                self.expect(b':')?;
                Ok(PhpValue::Array(self.entries()?))
            }
            other => Err(DecodeError::UnknownTag {
                pos,
                tag: other as char,
            }),
        }
    }
}
