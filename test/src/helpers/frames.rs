use scenesync_shared::{Envelope, Identifier, Message, MessageKind, Scene};

/// Decodes every frame received so far
pub fn drain_envelopes(frames: &flume::Receiver<Vec<u8>>) -> Vec<Envelope> {
    frames
        .try_iter()
        .map(|frame| Envelope::from_bytes(&frame).expect("frame should decode"))
        .collect()
}

pub fn message_kinds(envelopes: &[Envelope]) -> Vec<MessageKind> {
    envelopes
        .iter()
        .map(|envelope| envelope.message.kind())
        .collect()
}

/// Scenes of every Set message, in arrival order
pub fn set_scenes(envelopes: &[Envelope]) -> Vec<&Scene> {
    envelopes
        .iter()
        .filter_map(|envelope| match &envelope.message {
            Message::Set(scene) => Some(scene),
            _ => None,
        })
        .collect()
}

pub fn deleted_entities(envelopes: &[Envelope]) -> Vec<Identifier> {
    envelopes
        .iter()
        .filter_map(|envelope| match &envelope.message {
            Message::Delete(delete) => Some(delete.entities.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}

pub fn deleted_materials(envelopes: &[Envelope]) -> Vec<Identifier> {
    envelopes
        .iter()
        .filter_map(|envelope| match &envelope.message {
            Message::Delete(delete) => Some(delete.materials.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}
