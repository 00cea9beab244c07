//! Text envelope (JSON).
//!
//! `data` is kept as `RawValue` so handlers parse only what they use.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{Result, StatsError};

/// Current envelope version.
pub const VERSION: u8 = 1;

/// Inbound envelope (Text frame).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Protocol version.
    pub v: u8,
    /// Service name (e.g., "room").
    pub svc: String,
    /// Message type (field name is `type` in JSON).
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Optional room id.
    #[serde(default)]
    pub room: Option<String>,
    /// Optional payload, stored as raw JSON (lazy parsing).
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

impl Envelope {
    pub fn parse(s: &str) -> Result<Self> {
        let env: Envelope = serde_json::from_str(s)
            .map_err(|e| StatsError::BadRequest(format!("decode failed: {e}")))?;
        if env.v != VERSION {
            return Err(StatsError::UnsupportedVersion);
        }
        Ok(env)
    }

    /// Interpret the envelope as a room command, if it is one.
    pub fn room_command(&self) -> Result<Option<RoomCommand>> {
        if self.svc != "room" {
            return Ok(None);
        }
        let room = self
            .room
            .clone()
            .filter(|r| !r.is_empty())
            .ok_or_else(|| StatsError::BadRequest(format!("room.{} requires room", self.msg_type)))?;
        match self.msg_type.as_str() {
            "join" => Ok(Some(RoomCommand::Join(room))),
            "leave" => Ok(Some(RoomCommand::Leave(room))),
            other => Err(StatsError::BadRequest(format!("unknown room type: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomCommand {
    Join(String),
    Leave(String),
}

/// Outbound `sys` envelope.
#[derive(Debug, Serialize)]
pub struct SysMessage<'a> {
    pub v: u8,
    pub svc: &'static str,
    #[serde(rename = "type")]
    pub msg_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl<'a> SysMessage<'a> {
    pub fn new(msg_type: &'static str) -> Self {
        Self { v: VERSION, svc: "sys", msg_type, room: None, data: None }
    }

    pub fn room(mut self, room: &'a str) -> Self {
        self.room = Some(room);
        self
    }

    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| StatsError::Internal(format!("json encode failed: {e}")))
    }
}
