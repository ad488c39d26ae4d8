use scenesync_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr};

use crate::{scene_graph::scene::Scene, types::PROTOCOL_VERSION, Identifier};

use super::{error::MessageError, get_message::GetMessage};

/// Leading tag of every wire message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    Get = 1,
    Set = 2,
    Delete = 3,
    Fence = 4,
}

impl MessageKind {
    fn from_tag(tag: u8) -> Result<Self, MessageError> {
        match tag {
            1 => Ok(MessageKind::Get),
            2 => Ok(MessageKind::Set),
            3 => Ok(MessageKind::Delete),
            4 => Ok(MessageKind::Fence),
            _ => Err(MessageError::UnknownMessageKind { tag }),
        }
    }
}

/// Written after the kind tag of every message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub protocol_version: u32,
    /// Random per exporter, identifies one producer
    pub session_id: u32,
    /// Increases by one for every message of a session
    pub message_id: u32,
}

impl MessageHeader {
    pub fn new(session_id: u32, message_id: u32) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            session_id,
            message_id,
        }
    }
}

impl Serde for MessageHeader {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.protocol_version.ser(writer);
        self.session_id.ser(writer);
        self.message_id.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            protocol_version: u32::de(reader)?,
            session_id: u32::de(reader)?,
            message_id: u32::de(reader)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FenceKind {
    SceneBegin = 1,
    SceneEnd = 2,
}

impl Serde for FenceKind {
    fn ser(&self, writer: &mut dyn BitWrite) {
        (*self as u8).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            1 => Ok(FenceKind::SceneBegin),
            2 => Ok(FenceKind::SceneEnd),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "FenceKind",
                tag: tag as u64,
            }),
        }
    }
}

/// Deletions of one sync cycle. Entities are identified by path, materials
/// by name, each with the id they were exported with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteMessage {
    pub entities: Vec<Identifier>,
    pub materials: Vec<Identifier>,
}

impl DeleteMessage {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.materials.is_empty()
    }
}

impl Serde for DeleteMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.entities.ser(writer);
        self.materials.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            entities: Vec::de(reader)?,
            materials: Vec::de(reader)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Get(GetMessage),
    Set(Scene),
    Delete(DeleteMessage),
    Fence(FenceKind),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Get(_) => MessageKind::Get,
            Message::Set(_) => MessageKind::Set,
            Message::Delete(_) => MessageKind::Delete,
            Message::Fence(_) => MessageKind::Fence,
        }
    }
}

/// A message with its header, as sent in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub header: MessageHeader,
    pub message: Message,
}

impl Envelope {
    pub fn new(header: MessageHeader, message: Message) -> Self {
        Self { header, message }
    }

    pub fn ser(&self, writer: &mut dyn BitWrite) {
        (self.message.kind() as u8).ser(writer);
        self.header.ser(writer);
        match &self.message {
            Message::Get(get) => get.ser(writer),
            Message::Set(scene) => scene.ser(writer),
            Message::Delete(delete) => delete.ser(writer),
            Message::Fence(fence) => fence.ser(writer),
        }
    }

    pub fn de(reader: &mut BitReader) -> Result<Self, MessageError> {
        let kind = MessageKind::from_tag(u8::de(reader)?)?;
        let header = MessageHeader::de(reader)?;
        if header.protocol_version != PROTOCOL_VERSION {
            return Err(MessageError::ProtocolVersionMismatch {
                expected: PROTOCOL_VERSION,
                actual: header.protocol_version,
            });
        }

        let message = match kind {
            MessageKind::Get => Message::Get(GetMessage::de(reader)?),
            MessageKind::Set => Message::Set(Scene::de(reader)?),
            MessageKind::Delete => Message::Delete(DeleteMessage::de(reader)?),
            MessageKind::Fence => Message::Fence(FenceKind::de(reader)?),
        };
        Ok(Self { header, message })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BitWriter::new();
        self.ser(&mut writer);
        writer.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MessageError> {
        let mut reader = BitReader::new(bytes);
        Self::de(&mut reader)
    }
}
