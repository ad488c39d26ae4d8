mod channel;
mod tcp;

pub use channel::ChannelConnector;
pub use tcp::TcpConnector;

use crate::error::SyncError;

/// One open connection to a receiver. Frames are delivered in order.
pub trait FrameSender: Send {
    /// Sends one message frame
    fn send_frame(&mut self, payload: &[u8]) -> Result<(), SyncError>;
    /// Pushes out anything buffered. Called once at the end of an export.
    fn flush(&mut self) -> Result<(), SyncError> {
        Ok(())
    }
}

/// Opens a fresh connection for every export
pub trait Connector: Send {
    fn connect(&mut self) -> Result<Box<dyn FrameSender>, SyncError>;
}
