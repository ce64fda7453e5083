use std::fmt;

use kt_yellow::SyntaxKind;

/// Which of the two serialized streams a position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Shape,
    Payload,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shape => "shape",
            Self::Payload => "payload",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StubError {
    #[error("{stream} stream ends early at byte {position}")]
    UnexpectedEnd { stream: Stream, position: usize },

    #[error("malformed number in the {stream} stream at byte {position}")]
    MalformedNumber { stream: Stream, position: usize },

    #[error("unknown kind tag {raw} in the shape stream at byte {position}")]
    UnknownKind { raw: u64, position: usize },

    #[error("no stub descriptor for {kind:?} at byte {position} of the shape stream")]
    Unregistered { kind: SyntaxKind, position: usize },

    #[error("invalid {kind:?} record in the payload stream at byte {position}: {reason}")]
    InvalidRecord { kind: SyntaxKind, position: usize, reason: &'static str },

    #[error("{remaining} unread bytes at the end of the {stream} stream")]
    TrailingBytes { stream: Stream, remaining: usize },

    #[error("the shape stream describes no stubs")]
    Empty,
}

/// LEB128-encoded byte sink.
#[derive(Debug, Default)]
pub struct StubOutput {
    bytes: Vec<u8>,
}

impl StubOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u64(&mut self, value: u64) {
        tracing::trace!(value, at = self.bytes.len(), "write");
        leb128::write::unsigned(&mut self.bytes, value).expect("writing to a Vec cannot fail");
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u64(u64::from(value));
    }

    /// Length-prefixed UTF-8.
    pub fn write_name(&mut self, name: &str) {
        self.write_u64(name.len() as u64);
        self.bytes.extend_from_slice(name.as_bytes());
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Cursor over one serialized stream.
#[derive(Debug)]
pub struct StubInput<'a> {
    bytes: &'a [u8],
    position: usize,
    stream: Stream,
}

impl<'a> StubInput<'a> {
    pub fn new(bytes: &'a [u8], stream: Stream) -> Self {
        Self { bytes, position: 0, stream }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn stream(&self) -> Stream {
        self.stream
    }

    pub fn is_at_end(&self) -> bool {
        self.position == self.bytes.len()
    }

    pub fn read_u64(&mut self) -> Result<u64, StubError> {
        let start = self.position;
        let mut rest = &self.bytes[start..];
        let value = leb128::read::unsigned(&mut rest).map_err(|error| match error {
            leb128::read::Error::IoError(_) => {
                StubError::UnexpectedEnd { stream: self.stream, position: start }
            }
            leb128::read::Error::Overflow => {
                StubError::MalformedNumber { stream: self.stream, position: start }
            }
        })?;

        self.position = self.bytes.len() - rest.len();
        tracing::trace!(value, at = start, "read");
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32, StubError> {
        let start = self.position;
        let value = self.read_u64()?;
        u32::try_from(value)
            .ok()
            .ok_or(StubError::MalformedNumber { stream: self.stream, position: start })
    }

    pub fn read_bool(&mut self) -> Result<Option<bool>, StubError> {
        Ok(match self.read_u64()? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        })
    }

    /// Reads a name written by [`StubOutput::write_name`]; `None` if it is
    /// not UTF-8.
    pub fn read_name(&mut self) -> Result<Option<String>, StubError> {
        let start = self.position;
        let len = self.read_u32()? as usize;
        let end = self.position.checked_add(len).filter(|&end| end <= self.bytes.len());
        let Some(end) = end else {
            return Err(StubError::UnexpectedEnd { stream: self.stream, position: start });
        };

        let name = std::str::from_utf8(&self.bytes[self.position..end]).ok().map(str::to_owned);
        self.position = end;
        Ok(name)
    }

    /// Fails unless every byte was read.
    pub fn finish(self) -> Result<(), StubError> {
        match self.bytes.len() - self.position {
            0 => Ok(()),
            remaining => Err(StubError::TrailingBytes { stream: self.stream, remaining }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_names() {
        let mut output = StubOutput::new();
        output.write_u64(300);
        output.write_name("héllo");
        output.write_bool(true);
        let bytes = output.into_bytes();
        assert_eq!(&bytes[..2], [0xac, 0x02]);

        let mut input = StubInput::new(&bytes, Stream::Payload);
        assert_eq!(input.read_u64(), Ok(300));
        assert_eq!(input.read_name(), Ok(Some("héllo".to_owned())));
        assert_eq!(input.read_bool(), Ok(Some(true)));
        assert_eq!(input.finish(), Ok(()));
    }

    #[test]
    fn truncated_number() {
        let mut input = StubInput::new(&[0x80], Stream::Shape);
        assert_eq!(
            input.read_u64(),
            Err(StubError::UnexpectedEnd { stream: Stream::Shape, position: 0 })
        );
    }

    #[test]
    fn name_longer_than_stream() {
        let mut input = StubInput::new(&[0x05, b'a'], Stream::Payload);
        assert_eq!(
            input.read_name(),
            Err(StubError::UnexpectedEnd { stream: Stream::Payload, position: 0 })
        );
    }

    #[test]
    fn trailing_bytes() {
        let input = StubInput::new(&[0x01], Stream::Shape);
        assert_eq!(
            input.finish(),
            Err(StubError::TrailingBytes { stream: Stream::Shape, remaining: 1 })
        );
    }
}
