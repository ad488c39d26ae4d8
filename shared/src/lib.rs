//! # SceneSync Shared
//! Scene model, wire messages, dirty tracking and cache file support shared
//! between scenesync-client & scenesync-server crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

pub use scenesync_serde::{
    BitReader, BitWrite, BitWriter, HashWriter, Serde, SerdeErr, SerdeInteger,
    SignedVariableInteger, UnsignedVariableInteger,
};

mod cache;
mod compression;
mod id_registry;
mod messages;
mod scene_cache;
pub mod scene_graph;
mod types;

pub use cache::{
    content_cache::{CacheExport, CacheTicket, Cached, ContentCache, DirtyKind, Fingerprint},
    entity_manager::{EntityExport, EntityManager},
    material_manager::{MaterialExport, MaterialManager},
    texture_manager::{TextureExport, TextureManager},
};
pub use compression::{
    compression_config::{CompressionConfig, SceneCacheEncoding},
    decoder::Decoder,
    encoder::Encoder,
    error::{DecoderError, EncoderError},
};
pub use id_registry::{Handle, HostHandle, IdRegistry};
pub use messages::{
    error::{FrameError, MessageError},
    frame::{write_frame, FrameReader, DEFAULT_MAX_FRAME_SIZE},
    get_message::{GetFlags, GetMessage},
    message::{DeleteMessage, Envelope, FenceKind, Message, MessageHeader, MessageKind},
};
pub use scene_cache::{
    error::SceneCacheError,
    header::{
        RecordHeader, SceneCacheHeader, HEADER_SIZE, MAX_RECORD_SIZE, RECORD_HEADER_SIZE,
        SCENE_CACHE_MAGIC,
    },
    reader::SceneCacheReader,
    writer::{CacheWriterConfig, SceneCacheWriter},
};
pub use scene_graph::{
    animation::{
        reduce_curve, Animation, AnimationClip, BlendshapeAnimation, CameraAnimation, Curve,
        LightAnimation, MeshAnimation, NearEqual, PointsAnimation, TransformAnimation, TVP,
    },
    asset::{Asset, AssetType, FileAsset},
    camera::Camera,
    constraint::{Constraint, ConstraintKind, ParentSource},
    content_hash,
    entity::{Entity, EntityKind, Transform},
    error::{CorruptReason, SceneError, TopologyMismatch},
    light::{Light, LightType},
    material::{
        Material, MaterialKeyword, MaterialProperty, MaterialValue, TextureRef,
        COLOR_MAP_PROPERTY, COLOR_PROPERTY, NORMAL_MAP_PROPERTY,
    },
    mesh::{
        BlendShapeData, BlendShapeFrameData, BoneData, Mesh, MeshRefineFlags,
        MeshRefineSettings,
    },
    points::{Points, PointsData},
    scene::{Handedness, Scene, SceneSettings},
    texture::{Texture, TextureFormat, TextureType},
};
pub use types::{Identifier, INVALID_ID, PROTOCOL_VERSION};
