//! # SceneSync Client
//! The producer side of scenesync: a host application feeds its scene into
//! a [`SyncEngine`], which tracks what changed and exports it on a
//! background thread, either to a `scenesync-server` over TCP or into a
//! scene cache file.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub mod transport;
pub mod shared {
    pub use scenesync_shared::{
        Asset, Camera, Constraint, Entity, HostHandle, Identifier, Light, Material, Mesh, Points,
        Scene, SceneSettings, Texture, Transform, INVALID_ID,
    };
}

mod client_config;
mod engine;
mod error;
mod sender;
mod sync_settings;

pub use client_config::ClientConfig;
pub use engine::SyncEngine;
pub use error::SyncError;
pub use sender::{
    cache_sink::CacheFileSink,
    exporter::{AsyncExporter, ExportOutcome, ExportReport, ExportSink, ExportState},
    network_sink::NetworkSink,
    snapshot::SceneSnapshot,
};
pub use sync_settings::{AnimationSettings, SyncScope, SyncSettings};
