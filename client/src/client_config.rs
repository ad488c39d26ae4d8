use std::{
    default::Default,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

/// Contains Config properties which will be used by the Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Address of the receiving server
    pub server_address: SocketAddr,
    /// Used for connecting and for every write of an export. An export that
    /// stalls longer than this fails and is retried on the next sync.
    pub timeout: Duration,
    /// Session id stamped on every message. A random one is picked when
    /// this is None.
    pub session_id: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080),
            timeout: Duration::from_secs(30),
            session_id: None,
        }
    }
}

impl ClientConfig {
    pub fn session_id(&self) -> u32 {
        self.session_id.unwrap_or_else(|| fastrand::u32(..))
    }
}
