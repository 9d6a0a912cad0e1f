//! Peer protocol message types and wire format
//!
//! Messages travel in a JSON envelope `{"type": <int>, "data": ...}`.
//! Query messages carry no payload; `ResponseBlockchain` carries the
//! JSON-serialized block sequence as a nested string, so the envelope
//! parses identically regardless of payload shape.

use crate::core::Block;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Magic bytes for message framing
pub const MAGIC: [u8; 4] = [0x48, 0x43, 0x48, 0x4E]; // "HCHN"

const QUERY_LATEST: u8 = 0;
const QUERY_ALL: u8 = 1;
const RESPONSE_BLOCKCHAIN: u8 = 2;

/// Peer synchronization messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Ask a peer for its single latest block
    QueryLatest,
    /// Ask a peer for its full chain
    QueryAll,
    /// Carry one or more blocks: the full chain or a singleton `[latest]`
    ResponseBlockchain(Vec<Block>),
}

/// Message encoding errors
#[derive(Error, Debug)]
pub enum MessageError {
    #[error("unknown message type {0}")]
    UnknownType(u8),
    #[error("message type {0} requires a data payload")]
    MissingData(u8),
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: u8,
    data: Option<String>,
}

impl Message {
    /// Serialize message to wire bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, MessageError> {
        let envelope = match self {
            Message::QueryLatest => Envelope {
                kind: QUERY_LATEST,
                data: None,
            },
            Message::QueryAll => Envelope {
                kind: QUERY_ALL,
                data: None,
            },
            Message::ResponseBlockchain(blocks) => Envelope {
                kind: RESPONSE_BLOCKCHAIN,
                data: Some(serde_json::to_string(blocks)?),
            },
        };
        Ok(serde_json::to_vec(&envelope)?)
    }

    /// Deserialize message from wire bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MessageError> {
        let envelope: Envelope = serde_json::from_slice(bytes)?;
        match envelope.kind {
            QUERY_LATEST => Ok(Message::QueryLatest),
            QUERY_ALL => Ok(Message::QueryAll),
            RESPONSE_BLOCKCHAIN => {
                let data = envelope
                    .data
                    .ok_or(MessageError::MissingData(RESPONSE_BLOCKCHAIN))?;
                Ok(Message::ResponseBlockchain(serde_json::from_str(&data)?))
            }
            other => Err(MessageError::UnknownType(other)),
        }
    }

    /// Get message type name for logging
    pub fn type_name(&self) -> &'static str {
        match self {
            Message::QueryLatest => "QueryLatest",
            Message::QueryAll => "QueryAll",
            Message::ResponseBlockchain(_) => "ResponseBlockchain",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_round_trip() {
        for msg in [Message::QueryLatest, Message::QueryAll] {
            let bytes = msg.to_bytes().unwrap();
            assert_eq!(Message::from_bytes(&bytes).unwrap(), msg);
        }
    }

    #[test]
    fn test_response_round_trip() {
        let msg = Message::ResponseBlockchain(vec![Block::genesis()]);
        let bytes = msg.to_bytes().unwrap();
        assert_eq!(Message::from_bytes(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_envelope_shape() {
        let value: serde_json::Value =
            serde_json::from_slice(&Message::QueryLatest.to_bytes().unwrap()).unwrap();
        assert_eq!(value["type"], 0);
        assert!(value["data"].is_null());

        let value: serde_json::Value = serde_json::from_slice(
            &Message::ResponseBlockchain(vec![Block::genesis()])
                .to_bytes()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(value["type"], 2);
        // The block sequence is carried as a nested JSON string
        let nested = value["data"].as_str().unwrap();
        let blocks: Vec<Block> = serde_json::from_str(nested).unwrap();
        assert_eq!(blocks, vec![Block::genesis()]);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let bytes = br#"{"type": 9, "data": null}"#;
        assert!(matches!(
            Message::from_bytes(bytes),
            Err(MessageError::UnknownType(9))
        ));
    }

    #[test]
    fn test_response_without_data_rejected() {
        let bytes = br#"{"type": 2, "data": null}"#;
        assert!(matches!(
            Message::from_bytes(bytes),
            Err(MessageError::MissingData(2))
        ));
    }
}
