/// Integration tests for the validation hash carried by every Set message

use glam::Vec3;
use proptest::prelude::*;

use scenesync_client::{SyncScope, SyncSettings};
use scenesync_server::{SceneReceiver, ServerEvent};
use scenesync_shared::{Entity, Envelope, Message, MessageHeader, Scene, SceneSettings, Transform};
use scenesync_test::{channel_engine, sync_blocking, SceneBuilder};

fn set_frame(scene: Scene) -> Vec<u8> {
    Envelope::new(MessageHeader::new(1, 0), Message::Set(scene)).to_bytes()
}

#[test]
fn hash_ignores_item_order() {
    let forward = SceneBuilder::new("scene")
        .transform("/a", Vec3::X)
        .transform("/b", Vec3::Y)
        .mesh("/c")
        .material("m")
        .build();

    let mut reversed = forward.clone();
    reversed.entities.reverse();
    assert_eq!(forward.hash(), reversed.hash());
}

fn transforms_strategy() -> impl Strategy<Value = (Vec<Entity>, Vec<Entity>)> {
    prop::collection::vec(-1000.0f32..1000.0, 1..12)
        .prop_map(|xs| {
            xs.into_iter()
                .enumerate()
                .map(|(index, x)| {
                    let mut transform = Transform::new(format!("/node_{}", index));
                    transform.position = Vec3::new(x, 0.0, 0.0);
                    Entity::Transform(transform)
                })
                .collect::<Vec<_>>()
        })
        .prop_flat_map(|entities| {
            let shuffled = Just(entities.clone()).prop_shuffle();
            (Just(entities), shuffled)
        })
}

proptest! {
    #[test]
    fn prop_hash_is_order_independent((entities, shuffled) in transforms_strategy()) {
        let mut a = Scene::new(SceneSettings::default());
        a.entities = entities;
        let mut b = Scene::new(SceneSettings::default());
        b.entities = shuffled;

        prop_assert_eq!(a.hash(), b.hash());
        prop_assert!(Scene::from_bytes(&b.to_bytes()).is_ok());
    }
}

#[test]
fn hash_covers_settings() {
    let scene = SceneBuilder::new("scene").transform("/a", Vec3::X).build();
    let mut renamed = scene.clone();
    renamed.settings.name = "other".to_string();
    assert_ne!(scene.hash(), renamed.hash());
}

#[test]
fn flipped_payload_bytes_are_rejected() {
    let scene = SceneBuilder::new("scene")
        .transform("/a", Vec3::new(1.0, 2.0, 3.0))
        .mesh("/b")
        .build();
    let frame = set_frame(scene);

    let mut receiver = SceneReceiver::new();
    let mut rejected = 0;
    // tag, header and scene hash occupy the first bytes
    for index in frame.len() / 2..frame.len() - 1 {
        let mut corrupt = frame.clone();
        corrupt[index] ^= 0x04;
        if let ServerEvent::MessageDropped { .. } = receiver.receive_frame(&corrupt) {
            rejected += 1;
        }
    }
    assert_eq!(rejected, frame.len() - 1 - frame.len() / 2);
}

#[test]
fn session_continues_after_corrupt_scene() {
    let (mut engine, frames) = channel_engine(SyncSettings::default());
    for index in 0..3 {
        let mut transform = Transform::new(format!("/node_{}", index));
        transform.position = Vec3::splat(index as f32);
        engine.add_transform(transform);
    }
    assert!(sync_blocking(&mut engine, SyncScope::All, false));

    let mut frames: Vec<Vec<u8>> = frames.try_iter().collect();
    // SceneBegin, bulk Set, SceneEnd
    assert_eq!(frames.len(), 3);
    let set = &mut frames[1];
    let last = set.len() - 1;
    set[last - 1] ^= 0xFF;

    let mut receiver = SceneReceiver::new();
    let events: Vec<ServerEvent> = frames
        .iter()
        .map(|frame| receiver.receive_frame(frame))
        .collect();

    match &events[1] {
        ServerEvent::MessageDropped { reason } => assert!(reason.is_corrupt_scene()),
        other => panic!("expected a dropped message, got {:?}", other),
    }
    assert_eq!(
        events[2],
        ServerEvent::SceneEnd {
            session_id: 42,
            messages: 0
        }
    );
    assert_eq!(receiver.dropped_count(), 1);
}
