//! Incremental extraction of complete JSON values from a growable
//! per-connection byte buffer.
//!
//! The daemon reads whatever bytes are available off the socket into
//! [`ConnBuf::spare_capacity`], calls [`ConnBuf::try_extract`] to pull out
//! as many complete JSON-RPC requests as are currently buffered, and
//! [`ConnBuf::grow`] when a read fills the buffer without producing one.
//! This mirrors the original daemon's buffer-doubling read loop without
//! hand-rolling a streaming JSON parser: `serde_json`'s own
//! [`serde_json::Deserializer::from_slice`] already reports, via
//! `byte_offset`, how many bytes the first complete value consumed —
//! exactly the information needed to compact the buffer afterward.

use serde_json::Value;

use introspectd_core::limits::CONN_BUFFER_START;

/// Result of one extraction attempt against the buffered prefix.
#[derive(Debug)]
pub enum Frame {
    /// A complete JSON value, with its serialized text removed from the
    /// buffer already.
    Complete(Value),
    /// The buffered bytes are a valid prefix of some JSON value, but no
    /// value is complete yet. Read more.
    Partial,
    /// The buffered bytes can never form valid JSON, no matter what
    /// follows. The caller should treat this as a parse error.
    Invalid,
}

/// Growable input buffer for one connection.
pub struct ConnBuf {
    buf: Vec<u8>,
    pos: usize,
    max: usize,
}

impl ConnBuf {
    pub fn new(max: usize) -> Self {
        ConnBuf { buf: vec![0u8; CONN_BUFFER_START], pos: 0, max }
    }

    /// The unfilled tail of the buffer, for a socket read to fill.
    /// Empty once the buffer is full; call [`Self::grow`] first.
    pub fn spare_capacity(&mut self) -> &mut [u8] {
        &mut self.buf[self.pos..]
    }

    /// Record that `n` bytes were just read into [`Self::spare_capacity`].
    pub fn commit(&mut self, n: usize) {
        self.pos += n;
    }

    /// Double the buffer, up to `max`. Returns `false` if already at cap
    /// (the connection should be dropped with no response, per the wire
    /// contract — a request that can't fit no matter how much room it's
    /// given is not a transient condition).
    pub fn grow(&mut self) -> bool {
        if self.buf.len() >= self.max {
            return false;
        }
        let new_len = (self.buf.len() * 2).min(self.max);
        self.buf.resize(new_len, 0);
        true
    }

    pub fn is_full(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Attempt to parse one complete JSON value off the front of the
    /// buffered bytes. On [`Frame::Complete`], the consumed bytes are
    /// compacted out of the buffer before returning, so the next call
    /// sees only whatever was left over (e.g. the start of a second,
    /// pipelined request).
    pub fn try_extract(&mut self) -> Frame {
        if self.pos == 0 {
            return Frame::Partial;
        }

        let mut stream = serde_json::Deserializer::from_slice(&self.buf[..self.pos]).into_iter::<Value>();

        match stream.next() {
            Some(Ok(value)) => {
                let consumed = stream.byte_offset();
                self.drain(consumed);
                Frame::Complete(value)
            }
            Some(Err(e)) if e.is_eof() => Frame::Partial,
            Some(Err(_)) => Frame::Invalid,
            None => Frame::Partial,
        }
    }

    fn drain(&mut self, consumed: usize) {
        self.buf.copy_within(consumed..self.pos, 0);
        self.pos -= consumed;
        for b in &mut self.buf[self.pos..] {
            *b = 0;
        }
    }
}

#[cfg(test)]
#[path = "framing_tests.rs"]
mod tests;
