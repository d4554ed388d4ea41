//! Wire format of the collaboration socket.
//!
//! Every frame is a JSON object tagged by `event`. Client frames are
//! [`ClientMessage`]; frames fanned out to the room are [`RoomMessage`].

use notelet_core::{BlockContent, BlockKind, RemoteUpdate};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A frame broadcast to every other session in a page room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RoomMessage {
    #[serde(rename_all = "camelCase")]
    UserJoined {
        session_id: String,
        /// Presence payload supplied by the joiner, relayed verbatim.
        user: JsonValue,
    },
    #[serde(rename_all = "camelCase")]
    UserLeft { session_id: String },
    #[serde(rename_all = "camelCase")]
    BlockUpdated {
        block_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<BlockContent>,
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        kind: Option<BlockKind>,
        #[serde(skip_serializing_if = "Option::is_none")]
        props: Option<JsonValue>,
        /// Lets receivers drop their own echoes.
        source_session_id: String,
    },
}

impl RoomMessage {
    /// The session that caused this frame.
    pub fn source(&self) -> &str {
        match self {
            Self::UserJoined { session_id, .. } => session_id,
            Self::UserLeft { session_id } => session_id,
            Self::BlockUpdated { source_session_id, .. } => source_session_id,
        }
    }

    /// Bridge into the reconciliation input for `block_updated` frames.
    pub fn as_remote_update(&self) -> Option<RemoteUpdate> {
        match self {
            Self::BlockUpdated {
                block_id,
                content,
                kind,
                props,
                ..
            } => Some(RemoteUpdate {
                block_id: block_id.clone(),
                content: content.clone(),
                kind: *kind,
                props: props.clone(),
            }),
            _ => None,
        }
    }
}

/// A frame sent by a connected editor session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        page_id: String,
        #[serde(default)]
        user: JsonValue,
    },
    #[serde(rename_all = "camelCase")]
    LeaveRoom { page_id: String },
    #[serde(rename_all = "camelCase")]
    UpdateBlock {
        page_id: String,
        block_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<BlockContent>,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<BlockKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        props: Option<JsonValue>,
    },
}
