use std::{
    io::BufReader,
    net::{SocketAddr, TcpListener, TcpStream},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use flume::{Receiver, RecvTimeoutError, Sender};
use log::{info, warn};

use scenesync_shared::FrameReader;

use crate::{
    error::ServerError, events::ServerEvent, receiver::SceneReceiver, server_config::ServerConfig,
};

const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Accepts scenesync clients over TCP. Every connection is read on its own
/// thread; their events are collected through `receive`.
pub struct Server {
    local_addr: SocketAddr,
    events: Receiver<(SocketAddr, ServerEvent)>,
    shutdown: Arc<AtomicBool>,
    acceptor: Option<JoinHandle<()>>,
}

impl Server {
    pub fn listen(config: ServerConfig) -> Result<Self, ServerError> {
        let listener =
            TcpListener::bind(config.bind_address).map_err(|err| ServerError::BindFailed {
                address: config.bind_address.to_string(),
                reason: err.to_string(),
            })?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;

        let (event_sender, event_receiver) = flume::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));

        let acceptor = {
            let shutdown = shutdown.clone();
            let max_frame_size = config.max_frame_size;
            thread::Builder::new()
                .name("scenesync-accept".to_string())
                .spawn(move || accept_loop(listener, event_sender, shutdown, max_frame_size))?
        };

        info!("Server: listening on {}", local_addr);
        Ok(Self {
            local_addr,
            events: event_receiver,
            shutdown,
            acceptor: Some(acceptor),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Drains every pending event
    pub fn receive(&mut self) -> Vec<(SocketAddr, ServerEvent)> {
        self.events.try_iter().collect()
    }

    /// Waits up to `timeout` for the next event
    pub fn receive_timeout(&mut self, timeout: Duration) -> Option<(SocketAddr, ServerEvent)> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Stops accepting connections. Connections already open are read
    /// until their clients close them.
    pub fn close(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(acceptor) = self.acceptor.take() {
            if acceptor.join().is_err() {
                warn!("Server: accept thread panicked");
            }
            info!("Server: stopped listening on {}", self.local_addr);
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.close();
    }
}

fn accept_loop(
    listener: TcpListener,
    events: Sender<(SocketAddr, ServerEvent)>,
    shutdown: Arc<AtomicBool>,
    max_frame_size: u64,
) {
    while !shutdown.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((stream, address)) => {
                let events = events.clone();
                let spawned = thread::Builder::new()
                    .name(format!("scenesync-read-{}", address))
                    .spawn(move || read_connection(stream, address, events, max_frame_size));
                if let Err(err) = spawned {
                    warn!("Server: failed to start reader for {}: {}", address, err);
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(err) => {
                warn!("Server: accept failed: {}", err);
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
        }
    }
}

fn read_connection(
    stream: TcpStream,
    address: SocketAddr,
    events: Sender<(SocketAddr, ServerEvent)>,
    max_frame_size: u64,
) {
    // accepted sockets may inherit the listener's non-blocking mode
    if let Err(err) = stream.set_nonblocking(false) {
        warn!("Server: dropping {}: {}", address, err);
        return;
    }
    if events.send((address, ServerEvent::Connected)).is_err() {
        return;
    }

    let mut frames = FrameReader::with_max_frame_size(BufReader::new(stream), max_frame_size);
    let mut receiver = SceneReceiver::new();
    loop {
        match frames.read_frame() {
            Ok(Some(frame)) => {
                let event = receiver.receive_frame(&frame);
                if events.send((address, event)).is_err() {
                    return;
                }
            }
            Ok(None) => break,
            Err(err) => {
                warn!("Server: closing {}: {}", address, err);
                break;
            }
        }
    }

    if receiver.in_scene() {
        warn!("Server: {} disconnected inside a scene", address);
    }
    let _ = events.send((address, ServerEvent::Disconnected));
}
