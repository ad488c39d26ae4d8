//! # SceneSync Server
//! Receives scenes exported by `scenesync-client`. Each connection's frames
//! are decoded into [`ServerEvent`]s; scenes that fail their integrity
//! check are dropped without closing the connection.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub mod shared {
    pub use scenesync_shared::{
        DeleteMessage, Entity, GetMessage, Identifier, MessageError, Scene, SceneSettings,
    };
}

mod error;
mod events;
mod receiver;
mod server;
mod server_config;

pub use error::ServerError;
pub use events::ServerEvent;
pub use receiver::SceneReceiver;
pub use server::Server;
pub use server_config::ServerConfig;
