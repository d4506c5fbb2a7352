//! Domain layer: value objects, entities and the ports the relay needs.

pub mod entity;
pub mod error;
pub mod message_log;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, DEFAULT_HISTORY_CAPACITY, History};
pub use error::{MessageLogError, ValueObjectError};
pub use message_log::MessageLog;
pub use registry::{
    ConnectionHandle, ConnectionRegistry, Delivery, OUTBOUND_QUEUE_CAPACITY, Outbound,
    OutboundChannel,
};
pub use repository::HistoryRepository;
pub use value_object::{ClientId, ConnectionId, MessageContent, Timestamp};
