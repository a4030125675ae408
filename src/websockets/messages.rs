use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inbound heartbeat probe sent by clients
pub const HEARTBEAT_PING: &str = "ping";

/// Reply to a heartbeat probe
pub const HEARTBEAT_PONG: &str = "pong";

/// Events pushed to every client connected to a room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RoomEvent {
    #[serde(rename = "new_question")]
    NewQuestion {
        id: String,
        payload: NewQuestionPayload,
    },

    #[serde(rename = "question_update")]
    QuestionUpdate {
        id: String,
        payload: QuestionUpdatePayload,
    },

    #[serde(rename = "ROOM_STATUS_UPDATE")]
    RoomStatusUpdate { status: String },

    #[serde(rename = "ROOM_EXTENDED")]
    RoomExtended {
        expires_at: DateTime<Utc>,
        minutes_added: i64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewQuestionPayload {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub votes: i64,
    pub is_answered: bool,
}

/// Changed fields of a question; unchanged fields are left out of the frame
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuestionUpdatePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_answered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_reply: Option<String>,
}

impl RoomEvent {
    /// A question was just asked; it starts unanswered with no votes
    pub fn new_question(id: String, content: String, created_at: DateTime<Utc>) -> Self {
        Self::NewQuestion {
            id,
            payload: NewQuestionPayload {
                content,
                created_at: Some(created_at),
                votes: 0,
                is_answered: false,
            },
        }
    }

    pub fn vote_count_changed(id: String, votes: i64) -> Self {
        Self::QuestionUpdate {
            id,
            payload: QuestionUpdatePayload {
                votes: Some(votes),
                ..Default::default()
            },
        }
    }

    pub fn question_answered(id: String) -> Self {
        Self::QuestionUpdate {
            id,
            payload: QuestionUpdatePayload {
                is_answered: Some(true),
                ..Default::default()
            },
        }
    }

    /// An organizer reply also marks the question answered
    pub fn organizer_replied(id: String, reply: String) -> Self {
        Self::QuestionUpdate {
            id,
            payload: QuestionUpdatePayload {
                is_answered: Some(true),
                organizer_reply: Some(reply),
                ..Default::default()
            },
        }
    }

    pub fn room_status(status: String) -> Self {
        Self::RoomStatusUpdate { status }
    }

    pub fn room_extended(expires_at: DateTime<Utc>, minutes_added: i64) -> Self {
        Self::RoomExtended {
            expires_at,
            minutes_added,
        }
    }

    /// Wire tag of the event
    pub fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::NewQuestion { .. } => "new_question",
            RoomEvent::QuestionUpdate { .. } => "question_update",
            RoomEvent::RoomStatusUpdate { .. } => "ROOM_STATUS_UPDATE",
            RoomEvent::RoomExtended { .. } => "ROOM_EXTENDED",
        }
    }
}
