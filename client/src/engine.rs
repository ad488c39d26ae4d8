use std::{path::Path, time::Duration};

use log::{debug, info, warn};
use rayon::prelude::*;

use scenesync_shared::{
    AnimationClip, CacheTicket, CacheWriterConfig, Camera, Constraint, EntityManager, FileAsset,
    HostHandle, IdRegistry, Light, Material, MaterialManager, Mesh, Points, TextureFormat,
    TextureManager, TextureType, TopologyMismatch, Transform, INVALID_ID,
};

use crate::{
    client_config::ClientConfig,
    error::SyncError,
    sender::{
        cache_sink::CacheFileSink,
        exporter::{AsyncExporter, ExportOutcome},
        network_sink::NetworkSink,
        snapshot::SceneSnapshot,
    },
    sync_settings::{SyncScope, SyncSettings},
    transport::{Connector, TcpConnector},
};

/// What an export in flight took from the producer. Committed only when
/// the export succeeds.
struct PendingExport {
    export_id: u64,
    entities: CacheTicket<String>,
    materials: CacheTicket<i32>,
    textures: CacheTicket<String>,
    /// Leading entries of the pending lists included in the export
    animation_clips: usize,
    constraints: usize,
    files: usize,
}

/// Producer side of a sync session. A host adapter walks its scene, feeds
/// objects in with the `add_*` methods, then calls `sync`.
///
/// Objects are moved in at `add_*` time; the engine never refers back to
/// host data. Every export works on its own snapshot, so the host may keep
/// adding while an export is in flight.
pub struct SyncEngine {
    settings: SyncSettings,
    session_id: u32,

    entity_ids: IdRegistry<HostHandle>,
    material_ids: IdRegistry<HostHandle>,
    entities: EntityManager,
    materials: MaterialManager,
    textures: TextureManager,

    pending_clips: Vec<AnimationClip>,
    pending_constraints: Vec<Constraint>,
    pending_files: Vec<FileAsset>,
    stale_swept: bool,

    exporter: AsyncExporter<NetworkSink>,
    pending_export: Option<PendingExport>,
    cache_exporter: Option<AsyncExporter<CacheFileSink>>,
    last_error: Option<String>,
}

impl SyncEngine {
    /// Syncs to a `scenesync-server` over TCP
    pub fn new(config: &ClientConfig, settings: SyncSettings) -> Result<Self, SyncError> {
        let connector = TcpConnector::new(config.server_address, config.timeout);
        Self::with_connector(Box::new(connector), config.session_id(), settings)
    }

    pub fn with_connector(
        connector: Box<dyn Connector>,
        session_id: u32,
        settings: SyncSettings,
    ) -> Result<Self, SyncError> {
        let exporter = AsyncExporter::new(NetworkSink::new(connector, session_id))?;
        info!("SyncEngine: session {} started", session_id);

        Ok(Self {
            settings,
            session_id,
            entity_ids: IdRegistry::new(),
            material_ids: IdRegistry::new(),
            entities: EntityManager::new(),
            materials: MaterialManager::new(),
            textures: TextureManager::new(),
            pending_clips: Vec::new(),
            pending_constraints: Vec::new(),
            pending_files: Vec::new(),
            stale_swept: false,
            exporter,
            pending_export: None,
            cache_exporter: None,
            last_error: None,
        })
    }

    // Settings

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SyncSettings {
        &mut self.settings
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn materials(&self) -> &MaterialManager {
        &self.materials
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    // Identity

    /// Stable id for a host object, INVALID_ID for a null handle
    pub fn entity_id(&mut self, handle: &HostHandle) -> i32 {
        self.entity_ids.get_id(handle)
    }

    /// Stable id for a host material, INVALID_ID for a null handle. Meshes
    /// store these in `material_ids`.
    pub fn material_id(&mut self, handle: &HostHandle) -> i32 {
        self.material_ids.get_id(handle)
    }

    // Entities

    /// Each `add_*` returns true if the entity's content changed
    pub fn add_transform(&mut self, transform: Transform) -> bool {
        self.entities.add(transform.into())
    }

    pub fn add_camera(&mut self, camera: Camera) -> bool {
        if !self.settings.sync_cameras {
            return self.add_transform(camera.transform);
        }
        self.entities.add(camera.into())
    }

    pub fn add_light(&mut self, light: Light) -> bool {
        if !self.settings.sync_lights {
            return self.add_transform(light.transform);
        }
        self.entities.add(light.into())
    }

    /// Applies the sync toggles, then stores the mesh. A mesh that breaks
    /// its topology invariants is stored without geometry.
    pub fn add_mesh(&mut self, mut mesh: Mesh) -> bool {
        if !self.settings.sync_meshes {
            return self.add_transform(mesh.transform);
        }

        if mesh.transform.reference.is_some() {
            mesh.strip_geometry();
        } else {
            self.apply_mesh_toggles(&mut mesh);
            if let Err(err) = mesh.validate() {
                warn!("SyncEngine: emptying mesh: {}", err);
                mesh.strip_geometry();
            }
        }
        self.entities.add(mesh.into())
    }

    pub fn add_points(&mut self, mut points: Points) -> bool {
        if points.transform.reference.is_some() {
            points.data.clear();
        }
        self.entities.add(points.into())
    }

    /// Runs `extract` over `sources`, on the rayon pool when multithreaded
    /// extraction is enabled, and adds every mesh it produced. All
    /// extraction is finished when this returns. Returns the number of
    /// meshes added.
    pub fn extract_meshes<T, F>(&mut self, sources: &[T], extract: F) -> usize
    where
        T: Sync,
        F: Fn(&T) -> Result<Mesh, TopologyMismatch> + Send + Sync,
    {
        let results: Vec<Result<Mesh, TopologyMismatch>> = if self.settings.multithreaded {
            sources.par_iter().map(&extract).collect()
        } else {
            sources.iter().map(&extract).collect()
        };

        let mut added = 0;
        for result in results {
            match result {
                Ok(mesh) => {
                    self.add_mesh(mesh);
                    added += 1;
                }
                Err(err) => warn!("SyncEngine: skipping mesh: {}", err),
            }
        }
        added
    }

    /// Marks an unchanged entity as still present
    pub fn touch(&mut self, path: &str) -> bool {
        self.entities.touch(path)
    }

    /// Moves every entity, material and texture not added or touched since
    /// the last sweep to the deleted lists, and forgets host handles not
    /// queried since then. `sync(SyncScope::All, ..)` sweeps on its own
    /// unless this was already called in the same cycle.
    pub fn erase_stale(&mut self) {
        let entities = self.entities.erase_stale();
        let materials = self.materials.erase_stale();
        let textures = self.textures.erase_stale();
        self.entity_ids.erase_stale_records();
        self.material_ids.erase_stale_records();
        self.stale_swept = true;
        debug!(
            "SyncEngine: swept {} entities, {} materials, {} textures",
            entities, materials, textures
        );
    }

    // Assets

    /// Stores a material under the id of its host handle. Returns that id,
    /// or INVALID_ID for a null handle.
    pub fn add_material(&mut self, handle: &HostHandle, mut material: Material) -> i32 {
        let id = self.material_ids.get_id(handle);
        if id == INVALID_ID {
            return INVALID_ID;
        }
        material.id = id;
        self.materials.add(material);
        id
    }

    /// Adds an image file. Returns its id, or INVALID_ID when textures are
    /// disabled or the file can't be read.
    pub fn add_texture(&mut self, path: &Path, texture_type: TextureType) -> i32 {
        if !self.settings.sync_textures {
            return INVALID_ID;
        }
        self.textures.add_file(path, texture_type)
    }

    pub fn add_texture_image(
        &mut self,
        name: &str,
        width: i32,
        height: i32,
        format: TextureFormat,
        data: Vec<u8>,
    ) -> i32 {
        if !self.settings.sync_textures {
            return INVALID_ID;
        }
        self.textures.add_image(name, width, height, format, data)
    }

    /// Queues a raw file for the next export
    pub fn add_file_asset(&mut self, file: FileAsset) {
        self.pending_files.push(file);
    }

    /// Queues a constraint for the next export
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.pending_constraints.push(constraint);
    }

    /// Applies the animation settings and queues the clip for the next
    /// export. Returns false if nothing was left to send.
    pub fn export_animation_clip(&mut self, mut clip: AnimationClip) -> bool {
        let animation = &self.settings.animation;
        if animation.time_scale != 1.0 {
            clip.scale_time(animation.time_scale);
        }
        if animation.keyframe_reduction {
            clip.reduce();
        }
        if clip.is_empty() {
            debug!("SyncEngine: clip {} has no keyframes left", clip.name);
            return false;
        }
        self.pending_clips.push(clip);
        true
    }

    // Export

    /// Starts exporting everything dirty. Returns false if the previous
    /// export is still in flight.
    ///
    /// `SyncScope::All` also sweeps stale objects first; other scopes never
    /// delete anything. `force_full` resends every live object.
    pub fn sync(&mut self, scope: SyncScope, force_full: bool) -> bool {
        self.poll();
        if self.exporter.is_exporting() {
            debug!("SyncEngine: export in flight, skipping sync");
            return false;
        }

        if force_full {
            self.entities.make_dirty_all();
            self.materials.make_dirty_all();
            self.textures.make_dirty_all();
        }
        if scope.sweeps_stale() && !self.stale_swept {
            self.erase_stale();
        }
        self.stale_swept = false;

        let entities = self.entities.export();
        let materials = self.materials.export();
        let textures = self.textures.export();

        let mut snapshot = SceneSnapshot::new(self.settings.scene.clone());
        snapshot.transforms = entities.transforms;
        snapshot.geometries = entities.geometries;
        snapshot.deleted_entities = entities.deleted;
        snapshot.materials = materials.dirty;
        snapshot.deleted_materials = materials.deleted;
        snapshot.textures = textures.dirty;
        snapshot.animation_clips = self.pending_clips.clone();
        snapshot.constraints = self.pending_constraints.clone();
        snapshot.files = self.pending_files.clone();

        let counts = (
            snapshot.animation_clips.len(),
            snapshot.constraints.len(),
            snapshot.files.len(),
        );

        if !self.exporter.kick(snapshot) {
            self.last_error = self.exporter.error_message();
            return false;
        }
        let Some(export_id) = self.exporter.current_export_id() else {
            return false;
        };

        self.pending_export = Some(PendingExport {
            export_id,
            entities: entities.ticket,
            materials: materials.ticket,
            textures: textures.ticket,
            animation_clips: counts.0,
            constraints: counts.1,
            files: counts.2,
        });
        true
    }

    /// Collects finished exports. A successful export clears the dirty
    /// state it carried; a failed one leaves it for the next sync.
    pub fn poll(&mut self) -> Option<ExportOutcome> {
        let mut latest = None;
        while let Some(outcome) = self.exporter.take_outcome() {
            self.complete_export(&outcome);
            latest = Some(outcome);
        }

        if let Some(cache_exporter) = self.cache_exporter.as_mut() {
            while let Some(outcome) = cache_exporter.take_outcome() {
                if let Err(err) = outcome.result {
                    self.last_error = Some(err.to_string());
                }
            }
        }
        latest
    }

    /// Blocks until no export is in flight. Returns false on timeout.
    pub fn wait(&mut self, timeout: Option<Duration>) -> bool {
        let mut finished = self.exporter.wait(timeout);
        if let Some(cache_exporter) = self.cache_exporter.as_mut() {
            finished &= cache_exporter.wait(timeout);
        }
        self.poll();
        finished
    }

    pub fn is_exporting(&mut self) -> bool {
        let cache_busy = match self.cache_exporter.as_mut() {
            Some(cache_exporter) => cache_exporter.is_exporting(),
            None => false,
        };
        self.exporter.is_exporting() || cache_busy
    }

    /// Message of the most recent failed export
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn complete_export(&mut self, outcome: &ExportOutcome) {
        let pending = match self.pending_export.take() {
            Some(pending) if pending.export_id == outcome.export_id => pending,
            other => {
                self.pending_export = other;
                return;
            }
        };

        match &outcome.result {
            Ok(_) => {
                self.entities.commit(&pending.entities);
                self.materials.commit(&pending.materials);
                self.textures.commit(&pending.textures);
                self.pending_clips.drain(..pending.animation_clips);
                self.pending_constraints.drain(..pending.constraints);
                self.pending_files.drain(..pending.files);
                self.last_error = None;
            }
            Err(err) => {
                warn!("SyncEngine: export failed, keeping changes for retry: {}", err);
                self.last_error = Some(err.to_string());
            }
        }
    }

    fn apply_mesh_toggles(&self, mesh: &mut Mesh) {
        let settings = &self.settings;
        if !settings.sync_normals {
            mesh.normals.clear();
            mesh.tangents.clear();
        }
        if !settings.sync_uvs {
            mesh.uv0.clear();
            mesh.uv1.clear();
        }
        if !settings.sync_colors {
            mesh.colors.clear();
        }
        if !settings.sync_bones {
            mesh.root_bone = None;
            mesh.bones.clear();
        }
        if !settings.sync_blendshapes {
            mesh.blendshapes.clear();
        }
    }

    // Scene cache

    /// Starts recording cache frames into a new file, closing any previous
    /// one
    pub fn enable_cache_writer(&mut self, config: &CacheWriterConfig) -> Result<(), SyncError> {
        self.close_cache_writer()?;
        let sink = CacheFileSink::create(config)?;
        self.cache_exporter = Some(AsyncExporter::new(sink)?);
        Ok(())
    }

    /// Waits for the frame in flight, then writes the file terminator
    pub fn close_cache_writer(&mut self) -> Result<(), SyncError> {
        let Some(mut cache_exporter) = self.cache_exporter.take() else {
            return Ok(());
        };
        let closed = cache_exporter.close();
        while let Some(outcome) = cache_exporter.take_outcome() {
            if let Err(err) = outcome.result {
                self.last_error = Some(err.to_string());
            }
        }
        closed
    }

    /// Records every live object as one cache frame at `time`. Returns false
    /// if no cache writer is enabled or the previous frame is still being
    /// written.
    pub fn write_cache_frame(&mut self, time: f32) -> bool {
        self.poll();
        let Some(cache_exporter) = self.cache_exporter.as_mut() else {
            return false;
        };

        let settings = &self.settings;
        let entities = &self.entities;
        let materials = &self.materials;
        let textures = &self.textures;
        cache_exporter.kick_with(|| {
            let mut snapshot = SceneSnapshot::new(settings.scene.clone());
            snapshot.time = time;
            snapshot.textures = textures.all().cloned().collect();
            snapshot.materials = materials.all().cloned().collect();
            for entity in entities.all() {
                if entity.is_geometry() {
                    snapshot.geometries.push(entity.clone());
                } else {
                    snapshot.transforms.push(entity.clone());
                }
            }
            snapshot.sort_entities();
            snapshot
        })
    }
}
