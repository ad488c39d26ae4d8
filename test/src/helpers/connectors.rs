use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use scenesync_client::{
    transport::{ChannelConnector, Connector, FrameSender},
    SyncError,
};

/// Refuses every connection. Counts the attempts.
#[derive(Clone, Default)]
pub struct FailingConnector {
    attempts: Arc<AtomicUsize>,
}

impl FailingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Connector for FailingConnector {
    fn connect(&mut self) -> Result<Box<dyn FrameSender>, SyncError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SyncError::ConnectFailed {
            address: "nowhere".to_string(),
            reason: "refused".to_string(),
        })
    }
}

/// Refuses the first `failures` connections, then delivers like a
/// [`ChannelConnector`]
pub struct FlakyConnector {
    failures: usize,
    inner: ChannelConnector,
}

impl FlakyConnector {
    pub fn new(failures: usize) -> (Self, flume::Receiver<Vec<u8>>) {
        let (inner, frames) = ChannelConnector::unbounded();
        (Self { failures, inner }, frames)
    }
}

impl Connector for FlakyConnector {
    fn connect(&mut self) -> Result<Box<dyn FrameSender>, SyncError> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(SyncError::ConnectFailed {
                address: "flaky".to_string(),
                reason: "refused".to_string(),
            });
        }
        self.inner.connect()
    }
}

/// Holds every connection attempt until the test releases it with a token
/// on the gate channel
pub struct GatedConnector {
    gate: flume::Receiver<()>,
    inner: ChannelConnector,
}

impl GatedConnector {
    pub fn new() -> (Self, flume::Sender<()>, flume::Receiver<Vec<u8>>) {
        let (gate_sender, gate) = flume::unbounded();
        let (inner, frames) = ChannelConnector::unbounded();
        (Self { gate, inner }, gate_sender, frames)
    }
}

impl Connector for GatedConnector {
    fn connect(&mut self) -> Result<Box<dyn FrameSender>, SyncError> {
        self.gate.recv().map_err(|_| SyncError::ConnectFailed {
            address: "gate".to_string(),
            reason: "gate closed".to_string(),
        })?;
        self.inner.connect()
    }
}

/// Connects, but the connection breaks after `frames_per_connection` frames,
/// for the first `broken_connections` connections
pub struct TruncatingConnector {
    frames_per_connection: usize,
    broken_connections: usize,
    inner: ChannelConnector,
}

impl TruncatingConnector {
    pub fn new(
        frames_per_connection: usize,
        broken_connections: usize,
    ) -> (Self, flume::Receiver<Vec<u8>>) {
        let (inner, frames) = ChannelConnector::unbounded();
        (
            Self {
                frames_per_connection,
                broken_connections,
                inner,
            },
            frames,
        )
    }
}

impl Connector for TruncatingConnector {
    fn connect(&mut self) -> Result<Box<dyn FrameSender>, SyncError> {
        let connection = self.inner.connect()?;
        if self.broken_connections == 0 {
            return Ok(connection);
        }
        self.broken_connections -= 1;
        Ok(Box::new(TruncatingSender {
            remaining: self.frames_per_connection,
            inner: connection,
        }))
    }
}

struct TruncatingSender {
    remaining: usize,
    inner: Box<dyn FrameSender>,
}

impl FrameSender for TruncatingSender {
    fn send_frame(&mut self, payload: &[u8]) -> Result<(), SyncError> {
        if self.remaining == 0 {
            return Err(SyncError::TransportFailure {
                reason: "connection reset".to_string(),
            });
        }
        self.remaining -= 1;
        self.inner.send_frame(payload)
    }
}
