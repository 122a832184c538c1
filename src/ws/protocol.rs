use crate::models::{ChatMessage, MessageRole};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Why an inbound frame could not be accepted. Reported operator-side; the
/// peer only ever sees the unsupported-data close code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("frame is not a JSON object")]
    NotJson,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` must be a string")]
    BadField(&'static str),
    #[error("`chat_id` is not a valid UUID")]
    InvalidChatId,
    #[error("binary frames are not supported")]
    Binary,
}

#[derive(Debug, PartialEq, Eq)]
pub struct InboundFrame {
    pub chat_id: Uuid,
    pub message: String,
}

impl InboundFrame {
    /// Decodes one text frame. Requires `chat_id` (a UUID string) and
    /// `message`; extra fields are tolerated.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|_| ProtocolError::NotJson)?;
        let object = value.as_object().ok_or(ProtocolError::NotJson)?;

        let chat_id = object
            .get("chat_id")
            .ok_or(ProtocolError::MissingField("chat_id"))?
            .as_str()
            .ok_or(ProtocolError::BadField("chat_id"))?;
        let message = object
            .get("message")
            .ok_or(ProtocolError::MissingField("message"))?
            .as_str()
            .ok_or(ProtocolError::BadField("message"))?;

        let chat_id = Uuid::parse_str(chat_id).map_err(|_| ProtocolError::InvalidChatId)?;

        Ok(InboundFrame {
            chat_id,
            message: message.to_string(),
        })
    }
}

/// The reply sent back to the peer, one per accepted inbound frame.
#[derive(Debug, Serialize)]
pub struct OutboundFrame {
    pub chat_id: Uuid,
    pub message: String,
    pub role: MessageRole,
}

impl From<&ChatMessage> for OutboundFrame {
    fn from(row: &ChatMessage) -> Self {
        OutboundFrame {
            chat_id: row.chat_id,
            message: row.message.clone(),
            role: row.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT_ID: &str = "11111111-1111-1111-1111-111111111111";

    #[test]
    fn valid_frame_parses() {
        let raw = format!(r#"{{"chat_id": "{}", "message": "hi"}}"#, CHAT_ID);
        let frame = InboundFrame::parse(&raw).unwrap();
        assert_eq!(frame.chat_id, Uuid::parse_str(CHAT_ID).unwrap());
        assert_eq!(frame.message, "hi");
    }

    #[test]
    fn extra_fields_are_tolerated() {
        let raw = format!(
            r#"{{"chat_id": "{}", "message": "hi", "client_ts": 12345}}"#,
            CHAT_ID
        );
        assert!(InboundFrame::parse(&raw).is_ok());
    }

    #[test]
    fn missing_chat_id_is_reported() {
        let err = InboundFrame::parse(r#"{"message": "hi"}"#).unwrap_err();
        assert_eq!(err, ProtocolError::MissingField("chat_id"));
    }

    #[test]
    fn missing_message_is_reported() {
        let raw = format!(r#"{{"chat_id": "{}"}}"#, CHAT_ID);
        let err = InboundFrame::parse(&raw).unwrap_err();
        assert_eq!(err, ProtocolError::MissingField("message"));
    }

    #[test]
    fn malformed_chat_id_is_reported() {
        let err =
            InboundFrame::parse(r#"{"chat_id": "not-a-uuid", "message": "hi"}"#).unwrap_err();
        assert_eq!(err, ProtocolError::InvalidChatId);
    }

    #[test]
    fn non_string_fields_are_reported() {
        let err = InboundFrame::parse(r#"{"chat_id": 42, "message": "hi"}"#).unwrap_err();
        assert_eq!(err, ProtocolError::BadField("chat_id"));
    }

    #[test]
    fn non_object_payloads_are_rejected() {
        assert_eq!(InboundFrame::parse("[1, 2]").unwrap_err(), ProtocolError::NotJson);
        assert_eq!(InboundFrame::parse("not json").unwrap_err(), ProtocolError::NotJson);
    }

    #[test]
    fn outbound_frame_serializes_role_lowercase() {
        let frame = OutboundFrame {
            chat_id: Uuid::parse_str(CHAT_ID).unwrap(),
            message: "Reply to: hi".to_string(),
            role: MessageRole::Ai,
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["role"], "ai");
        assert_eq!(json["chat_id"], CHAT_ID);
    }
}
