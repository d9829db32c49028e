//! Duplex byte channels carrying protocol output

use crate::error::TransportError;
use std::collections::VecDeque;
use std::io::{Read, Write};
use std::sync::mpsc::{self, Receiver, Sender};

/// A duplex byte channel.
///
/// `receive` fills the whole buffer or fails; `flush` pushes buffered output
/// to the peer. Generated code flushes once per message.
pub trait Channel {
    /// Queue bytes for sending
    fn send(&mut self, buf: &[u8]) -> Result<(), TransportError>;

    /// Read exactly `buf.len()` bytes
    fn receive(&mut self, buf: &mut [u8]) -> Result<(), TransportError>;

    /// Deliver queued bytes
    fn flush(&mut self) -> Result<(), TransportError>;
}

impl<C: Channel + ?Sized> Channel for &mut C {
    fn send(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        (**self).send(buf)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        (**self).receive(buf)
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        (**self).flush()
    }
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn send(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        (**self).send(buf)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        (**self).receive(buf)
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        (**self).flush()
    }
}

/// In-memory channel: reads from an input buffer, writes to an output buffer.
///
/// Used for marshaling values without a peer.
#[derive(Debug, Default, Clone)]
pub struct MemoryChannel {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl MemoryChannel {
    /// Create an empty channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a channel whose reads come from `bytes`
    pub fn with_input(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            input: VecDeque::from(bytes.into()),
            output: Vec::new(),
        }
    }

    /// Append bytes to the read side
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes);
    }

    /// Bytes written so far
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Take the written bytes, leaving the output empty
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Number of unread input bytes
    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    /// Move everything written so far onto the read side
    pub fn loopback(&mut self) {
        let written = self.take_output();
        self.input.extend(written);
    }
}

impl Channel for MemoryChannel {
    fn send(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        self.output.extend_from_slice(buf);
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        if self.input.len() < buf.len() {
            return Err(TransportError::UnexpectedEof {
                wanted: buf.len(),
                available: self.input.len(),
            });
        }
        let n = buf.len();
        for (dst, src) in buf.iter_mut().zip(self.input.drain(..n)) {
            *dst = src;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// One end of an in-process channel pair.
///
/// Sends are buffered locally and handed to the peer on `flush`; `receive`
/// blocks until enough bytes have arrived. Both ends are `Send`, so a pair
/// connects a client and a server running on different threads.
#[derive(Debug)]
pub struct DuplexChannel {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
    pending: Vec<u8>,
    inbox: VecDeque<u8>,
}

impl DuplexChannel {
    /// Create a connected pair of channel ends
    pub fn pair() -> (DuplexChannel, DuplexChannel) {
        let (a_tx, b_rx) = mpsc::channel();
        let (b_tx, a_rx) = mpsc::channel();
        (Self::new(a_tx, a_rx), Self::new(b_tx, b_rx))
    }

    fn new(tx: Sender<Vec<u8>>, rx: Receiver<Vec<u8>>) -> Self {
        Self {
            tx,
            rx,
            pending: Vec::new(),
            inbox: VecDeque::new(),
        }
    }
}

impl Channel for DuplexChannel {
    fn send(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        self.pending.extend_from_slice(buf);
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        while self.inbox.len() < buf.len() {
            let chunk = self.rx.recv().map_err(|_| TransportError::Closed)?;
            self.inbox.extend(chunk);
        }
        let n = buf.len();
        for (dst, src) in buf.iter_mut().zip(self.inbox.drain(..n)) {
            *dst = src;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let chunk = std::mem::take(&mut self.pending);
        tracing::trace!(bytes = chunk.len(), "flushing duplex channel");
        self.tx.send(chunk).map_err(|_| TransportError::Closed)
    }
}

/// Channel over any `Read + Write` stream, such as a `TcpStream`
#[derive(Debug)]
pub struct StreamChannel<T> {
    stream: T,
}

impl<T: Read + Write> StreamChannel<T> {
    /// Wrap a stream
    pub fn new(stream: T) -> Self {
        Self { stream }
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> T {
        self.stream
    }
}

impl<T: Read + Write> Channel for StreamChannel<T> {
    fn send(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        self.stream.write_all(buf)?;
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        match self.stream.read_exact(buf) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Err(TransportError::Closed)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        self.stream.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "channel/channel_tests.rs"]
mod channel_tests;
