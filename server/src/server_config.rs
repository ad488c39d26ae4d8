use std::{
    default::Default,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use scenesync_shared::DEFAULT_MAX_FRAME_SIZE;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address to listen on. Port 0 picks a free port, see
    /// `Server::local_addr`.
    pub bind_address: SocketAddr,
    /// Frames larger than this close the connection
    pub max_frame_size: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}
