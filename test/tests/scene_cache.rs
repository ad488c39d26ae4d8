/// Integration tests for recording engine state into scene cache files and
/// reading it back

use std::time::Duration;

use glam::Vec3;

use scenesync_client::SyncSettings;
use scenesync_shared::{
    CacheWriterConfig, CompressionConfig, Entity, HostHandle, Material, SceneCacheReader,
    Transform, INVALID_ID,
};
use scenesync_test::{channel_engine, drain_envelopes, triangle_mesh, TempPath};

const TIMEOUT: Duration = Duration::from_secs(10);

fn at(position: Vec3) -> Transform {
    let mut transform = Transform::new("/mover");
    transform.position = position;
    transform
}

fn position_of(entity: Option<&Entity>) -> Vec3 {
    match entity {
        Some(entity) => entity.transform().position,
        None => panic!("entity missing from cache frame"),
    }
}

fn cache_config(path: &TempPath, sample_rate: f32) -> CacheWriterConfig {
    CacheWriterConfig {
        sample_rate,
        compression: CompressionConfig::plain(),
        ..CacheWriterConfig::new(path.path())
    }
}

#[test]
fn recorded_frames_play_back() {
    let path = TempPath::new("playback");
    let (mut engine, frames) = channel_engine(SyncSettings::default());
    engine.enable_cache_writer(&cache_config(&path, 10.0)).unwrap();

    engine.add_mesh(triangle_mesh("/static"));
    engine.add_material(&HostHandle(1), Material::new(INVALID_ID, "grey"));
    for step in 0..3 {
        engine.add_transform(at(Vec3::X * step as f32));
        assert!(engine.write_cache_frame(step as f32 * 0.1));
        assert!(engine.wait(Some(TIMEOUT)));
    }
    engine.close_cache_writer().unwrap();
    assert!(engine.last_error().is_none());

    // recording does not sync
    assert!(drain_envelopes(&frames).is_empty());

    let mut reader = SceneCacheReader::open(path.path()).unwrap();
    assert_eq!(reader.len(), 3);

    let first = reader.get_by_index(0).unwrap();
    assert_eq!(position_of(first.find_entity("/mover")), Vec3::ZERO);
    assert!(first.find_entity("/static").is_some());
    assert_eq!(first.materials().count(), 1);

    let last = reader.get_by_time(10.0, false).unwrap();
    assert_eq!(position_of(last.find_entity("/mover")), Vec3::X * 2.0);

    let between = reader.get_by_time(0.15, true).unwrap();
    let position = position_of(between.find_entity("/mover"));
    assert!((position.x - 1.5).abs() < 1e-3, "got {}", position.x);
}

#[test]
fn frames_faster_than_the_sample_rate_are_skipped() {
    let path = TempPath::new("sampling");
    let (mut engine, _frames) = channel_engine(SyncSettings::default());
    engine.enable_cache_writer(&cache_config(&path, 10.0)).unwrap();
    engine.add_transform(at(Vec3::ZERO));

    for time in [0.0, 0.02, 0.05, 0.1, 0.12, 0.2] {
        assert!(engine.write_cache_frame(time));
        assert!(engine.wait(Some(TIMEOUT)));
    }
    engine.close_cache_writer().unwrap();

    let reader = SceneCacheReader::open(path.path()).unwrap();
    let times: Vec<f32> = reader.times().collect();
    assert_eq!(times, vec![0.0, 0.1, 0.2]);
}

#[test]
fn write_without_cache_writer_is_refused() {
    let (mut engine, _frames) = channel_engine(SyncSettings::default());
    assert!(!engine.write_cache_frame(0.0));
}

#[test]
fn reenabling_finishes_the_previous_file() {
    let first = TempPath::new("first");
    let second = TempPath::new("second");
    let (mut engine, _frames) = channel_engine(SyncSettings::default());
    engine.add_transform(at(Vec3::ONE));

    engine.enable_cache_writer(&cache_config(&first, 30.0)).unwrap();
    assert!(engine.write_cache_frame(0.0));
    assert!(engine.wait(Some(TIMEOUT)));

    engine.enable_cache_writer(&cache_config(&second, 30.0)).unwrap();
    assert!(engine.write_cache_frame(1.0));
    engine.close_cache_writer().unwrap();

    let first = SceneCacheReader::open(first.path()).unwrap();
    let second = SceneCacheReader::open(second.path()).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(second.time_range(), Some((1.0, 1.0)));
}

#[cfg(feature = "zstd_support")]
#[test]
fn compressed_cache_reads_back() {
    let path = TempPath::new("zstd");
    let (mut engine, _frames) = channel_engine(SyncSettings::default());
    let config = CacheWriterConfig {
        compression: CompressionConfig::default(),
        ..CacheWriterConfig::new(path.path())
    };
    engine.enable_cache_writer(&config).unwrap();
    engine.add_mesh(triangle_mesh("/mesh"));
    assert!(engine.write_cache_frame(0.0));
    engine.close_cache_writer().unwrap();

    let mut reader = SceneCacheReader::open(path.path()).unwrap();
    let scene = reader.get_by_index(0).unwrap();
    assert_eq!(scene.entities.len(), 1);
}
