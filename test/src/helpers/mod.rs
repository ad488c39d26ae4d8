pub mod builders;
pub mod connectors;
pub mod frames;
pub mod temp_path;

pub use builders::{channel_engine, moving_clip, sync_blocking, triangle_mesh, SceneBuilder};
pub use connectors::{FailingConnector, FlakyConnector, GatedConnector, TruncatingConnector};
pub use frames::{deleted_entities, deleted_materials, drain_envelopes, message_kinds, set_scenes};
pub use temp_path::TempPath;
