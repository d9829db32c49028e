//! Server-side dispatch contract

use crate::channel::Channel;
use crate::error::{RpcError, RpcResult, TransportError};

/// Handles one request per call to [`Processor::process`].
///
/// Generated `<Service>Server` types implement this: read one call envelope
/// from the channel, dispatch by method name, and write the reply back on the
/// same channel.
pub trait Processor {
    fn process(&mut self, channel: &mut dyn Channel) -> RpcResult<()>;

    /// Process requests until the peer closes the channel.
    ///
    /// Returns the number of requests handled. Any error other than a clean
    /// close stops the loop and is returned.
    fn serve(&mut self, channel: &mut dyn Channel) -> RpcResult<usize> {
        let mut handled = 0usize;
        loop {
            match self.process(channel) {
                Ok(()) => handled += 1,
                Err(RpcError::Transport(TransportError::Closed)) => {
                    tracing::debug!(handled, "channel closed, stopping");
                    return Ok(handled);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<P: Processor + ?Sized> Processor for Box<P> {
    fn process(&mut self, channel: &mut dyn Channel) -> RpcResult<()> {
        (**self).process(channel)
    }
}
