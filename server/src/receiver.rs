use log::{debug, warn};

use scenesync_shared::{Envelope, FenceKind, Message, MessageHeader};

use crate::events::ServerEvent;

/// Turns the frames of one connection into events. Holds no socket, so it
/// can be driven by any transport.
pub struct SceneReceiver {
    session_id: Option<u32>,
    last_message_id: Option<u32>,
    in_scene: bool,
    messages_in_scene: usize,
    dropped: usize,
}

impl SceneReceiver {
    pub fn new() -> Self {
        Self {
            session_id: None,
            last_message_id: None,
            in_scene: false,
            messages_in_scene: 0,
            dropped: 0,
        }
    }

    /// Decodes one frame. Frames that fail to decode, including scenes
    /// that fail their integrity check, become `MessageDropped`.
    pub fn receive_frame(&mut self, frame: &[u8]) -> ServerEvent {
        let envelope = match Envelope::from_bytes(frame) {
            Ok(envelope) => envelope,
            Err(reason) => {
                warn!("SceneReceiver: dropping message: {}", reason);
                self.dropped += 1;
                return ServerEvent::MessageDropped { reason };
            }
        };

        self.track_header(&envelope.header);
        let session_id = envelope.header.session_id;

        match envelope.message {
            Message::Fence(FenceKind::SceneBegin) => {
                if self.in_scene {
                    warn!(
                        "SceneReceiver: session {} began a scene before ending the last one",
                        session_id
                    );
                }
                self.in_scene = true;
                self.messages_in_scene = 0;
                ServerEvent::SceneBegin { session_id }
            }
            Message::Fence(FenceKind::SceneEnd) => {
                self.in_scene = false;
                ServerEvent::SceneEnd {
                    session_id,
                    messages: std::mem::take(&mut self.messages_in_scene),
                }
            }
            Message::Set(scene) => {
                self.messages_in_scene += 1;
                ServerEvent::SceneUpdated { session_id, scene }
            }
            Message::Delete(delete) => {
                self.messages_in_scene += 1;
                ServerEvent::Deleted { session_id, delete }
            }
            Message::Get(request) => ServerEvent::GetRequested {
                session_id,
                request,
            },
        }
    }

    /// True between a SceneBegin and its SceneEnd
    pub fn in_scene(&self) -> bool {
        self.in_scene
    }

    pub fn session_id(&self) -> Option<u32> {
        self.session_id
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    fn track_header(&mut self, header: &MessageHeader) {
        if self.session_id != Some(header.session_id) {
            self.session_id = Some(header.session_id);
            self.last_message_id = None;
        }
        if let Some(last) = self.last_message_id {
            let expected = last.wrapping_add(1);
            if header.message_id != expected {
                debug!(
                    "SceneReceiver: session {} skipped from message {} to {}",
                    header.session_id, last, header.message_id
                );
            }
        }
        self.last_message_id = Some(header.message_id);
    }
}

impl Default for SceneReceiver {
    fn default() -> Self {
        Self::new()
    }
}
