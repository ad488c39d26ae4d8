use std::{
    io::{BufWriter, Write},
    net::{Shutdown, SocketAddr, TcpStream},
    time::Duration,
};

use scenesync_shared::write_frame;

use super::{Connector, FrameSender};
use crate::error::SyncError;

/// Connects to a `scenesync-server` over TCP
pub struct TcpConnector {
    address: SocketAddr,
    timeout: Duration,
}

impl TcpConnector {
    pub fn new(address: SocketAddr, timeout: Duration) -> Self {
        Self { address, timeout }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }
}

impl Connector for TcpConnector {
    fn connect(&mut self) -> Result<Box<dyn FrameSender>, SyncError> {
        let connect_failed = |err: std::io::Error| SyncError::ConnectFailed {
            address: self.address.to_string(),
            reason: err.to_string(),
        };

        let stream = TcpStream::connect_timeout(&self.address, self.timeout).map_err(connect_failed)?;
        stream
            .set_write_timeout(Some(self.timeout))
            .map_err(connect_failed)?;
        stream.set_nodelay(true).map_err(connect_failed)?;

        Ok(Box::new(TcpFrameSender {
            stream: BufWriter::new(stream),
        }))
    }
}

struct TcpFrameSender {
    stream: BufWriter<TcpStream>,
}

impl FrameSender for TcpFrameSender {
    fn send_frame(&mut self, payload: &[u8]) -> Result<(), SyncError> {
        write_frame(&mut self.stream, payload)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SyncError> {
        self.stream.flush()?;
        // lets the receiver see end of stream right after the last frame
        self.stream.get_ref().shutdown(Shutdown::Write)?;
        Ok(())
    }
}
