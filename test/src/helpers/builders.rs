use std::time::Duration;

use glam::{Vec2, Vec3};

use scenesync_client::{transport::ChannelConnector, SyncEngine, SyncScope, SyncSettings};
use scenesync_shared::{
    Animation, AnimationClip, Entity, Material, Mesh, Scene, SceneSettings, Transform,
    TransformAnimation, TVP,
};

/// How long a test waits on an export before giving up
pub const EXPORT_TIMEOUT: Duration = Duration::from_secs(10);

/// Engine wired to an in-process channel. The receiver yields one wire frame
/// per message.
pub fn channel_engine(settings: SyncSettings) -> (SyncEngine, flume::Receiver<Vec<u8>>) {
    let (connector, frames) = ChannelConnector::unbounded();
    let engine = SyncEngine::with_connector(Box::new(connector), 42, settings)
        .expect("engine should start");
    (engine, frames)
}

/// Runs one sync and waits for it. Returns true if the export succeeded.
pub fn sync_blocking(engine: &mut SyncEngine, scope: SyncScope, force_full: bool) -> bool {
    assert!(engine.sync(scope, force_full), "sync should start an export");
    assert!(engine.wait(Some(EXPORT_TIMEOUT)), "export timed out");
    engine.last_error().is_none()
}

/// Single triangle with normals and uvs
pub fn triangle_mesh(path: &str) -> Mesh {
    let mut mesh = Mesh::new(path);
    mesh.points = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
    mesh.normals = vec![Vec3::Z; 3];
    mesh.uv0 = vec![Vec2::ZERO, Vec2::X, Vec2::Y];
    mesh.counts = vec![3];
    mesh.indices = vec![0, 1, 2];
    mesh
}

/// Clip moving `path` along x over one second
pub fn moving_clip(name: &str, path: &str) -> AnimationClip {
    let mut animation = TransformAnimation::new(path);
    animation.translation = vec![
        TVP::new(0.0, Vec3::ZERO),
        TVP::new(0.5, Vec3::X * 0.5),
        TVP::new(1.0, Vec3::X),
    ];

    let mut clip = AnimationClip::new(name, 30.0);
    clip.animations.push(Animation::Transform(animation));
    clip
}

/// Fluent builder for scenes used outside an engine
pub struct SceneBuilder {
    scene: Scene,
    next_id: i32,
}

impl SceneBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            scene: Scene::new(SceneSettings {
                name: name.to_string(),
                ..Default::default()
            }),
            next_id: 0,
        }
    }

    pub fn transform(mut self, path: &str, position: Vec3) -> Self {
        let mut transform = Transform::new(path);
        transform.id = self.take_id();
        transform.position = position;
        self.scene.entities.push(Entity::Transform(transform));
        self
    }

    pub fn mesh(mut self, path: &str) -> Self {
        let mut mesh = triangle_mesh(path);
        mesh.transform.id = self.take_id();
        self.scene.entities.push(mesh.into());
        self
    }

    pub fn material(mut self, name: &str) -> Self {
        let material = Material::new(self.take_id(), name);
        self.scene.assets.push(material.into());
        self
    }

    pub fn build(self) -> Scene {
        self.scene
    }

    fn take_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
