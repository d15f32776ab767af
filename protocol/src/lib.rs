//! JSON-lines messages exchanged between the game engine and a front-end.
//!
//! Every message is a single JSON object on its own line, tagged by `type`.

use serde::{Deserialize, Serialize};

/// Intents sent by the front-end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    SelectTile {
        tile: u16,
    },
    Hint,
    SelectLevel {
        level: u32,
    },
    Restart,
    /// Time passed on the front-end's clock. A `generation` from an older
    /// level load makes the engine ignore the message.
    Advance {
        millis: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        generation: Option<u64>,
    },
    Quit,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Frame(BoardFrame),
    /// A level could not be started, the previous board stays active.
    LevelRejected {
        level: u32,
        reason: String,
    },
    /// A line that could not be understood.
    Invalid {
        reason: String,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Playing,
    Failed,
    Succeeded,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileFrame {
    pub id: u16,
    pub value: String,
    pub flipped: bool,
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hinted_color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HudFrame {
    pub hint_budget: u32,
    pub countdown: u32,
    pub status: Status,
    pub remaining_pairs: u16,
}

/// Full board state, tiles in row-major display order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardFrame {
    pub level: u32,
    pub generation: u64,
    pub rows: u8,
    pub cols: u8,
    pub tiles: Vec<TileFrame>,
    pub hud: HudFrame,
}

pub fn decode_client(line: &str) -> serde_json::Result<ClientMessage> {
    serde_json::from_str(line.trim())
}

pub fn encode_server(message: &ServerMessage) -> serde_json::Result<String> {
    serde_json::to_string(message)
}
