use flume::{Receiver, Sender};

use super::{Connector, FrameSender};
use crate::error::SyncError;

/// In-process transport. Every frame sent through any connection lands on
/// one receiver, in send order.
#[derive(Clone)]
pub struct ChannelConnector {
    sender: Sender<Vec<u8>>,
}

impl ChannelConnector {
    pub fn unbounded() -> (Self, Receiver<Vec<u8>>) {
        let (sender, receiver) = flume::unbounded();
        (Self { sender }, receiver)
    }

    pub fn bounded(capacity: usize) -> (Self, Receiver<Vec<u8>>) {
        let (sender, receiver) = flume::bounded(capacity);
        (Self { sender }, receiver)
    }
}

impl Connector for ChannelConnector {
    fn connect(&mut self) -> Result<Box<dyn FrameSender>, SyncError> {
        if self.sender.is_disconnected() {
            return Err(SyncError::ConnectFailed {
                address: "channel".to_string(),
                reason: "receiver dropped".to_string(),
            });
        }
        Ok(Box::new(ChannelFrameSender {
            sender: self.sender.clone(),
        }))
    }
}

struct ChannelFrameSender {
    sender: Sender<Vec<u8>>,
}

impl FrameSender for ChannelFrameSender {
    fn send_frame(&mut self, payload: &[u8]) -> Result<(), SyncError> {
        self.sender
            .send(payload.to_vec())
            .map_err(|_| SyncError::TransportFailure {
                reason: "channel receiver dropped".to_string(),
            })
    }
}
