//! Wire types for the obs-websocket v5 control protocol.
//!
//! Every frame on the socket is a JSON object with two fields: a numeric
//! `op` code identifying the message class and a `d` object carrying the
//! class-specific payload:
//!
//! ```json
//! {"op": 1, "d": {"rpcVersion": 1, "authentication": "..."}}
//! ```
//!
//! Because the discriminant is numeric, the envelope is modelled as a plain
//! struct holding the raw `d` value, with typed payload structs decoded from
//! it on demand via [`Envelope::payload`].  Payload field names are camelCase
//! on the wire, handled by `#[serde(rename_all = "camelCase")]`.
//!
//! Only the slice of the protocol this tool consumes is modelled: the
//! identify handshake (`Hello` / `Identify` / `Identified`) and the
//! request/response pair for `GetSceneList` and `GetSceneItemList`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::scene::{SceneItem, SceneItemTransform};

/// RPC version this client speaks.  Sent in `Identify`; the server rejects
/// the handshake rather than negotiating down when it cannot honour it.
pub const RPC_VERSION: u32 = 1;

/// `requestType` for fetching the scene list and current program scene.
pub const REQUEST_GET_SCENE_LIST: &str = "GetSceneList";
/// `requestType` for fetching a scene's item list with transforms.
pub const REQUEST_GET_SCENE_ITEM_LIST: &str = "GetSceneItemList";

/// Message-class opcodes defined by obs-websocket v5.
pub mod opcode {
    /// Server greeting, first frame after the socket opens.
    pub const HELLO: u8 = 0;
    /// Client identification (and authentication) reply.
    pub const IDENTIFY: u8 = 1;
    /// Server confirmation that the session is established.
    pub const IDENTIFIED: u8 = 2;
    /// Server-pushed event; this client subscribes to none but may still
    /// receive stragglers that must be skipped.
    pub const EVENT: u8 = 5;
    /// Client request.
    pub const REQUEST: u8 = 6;
    /// Server response to a request.
    pub const REQUEST_RESPONSE: u8 = 7;
}

// ── Envelope ──────────────────────────────────────────────────────────────────

/// The outer `{op, d}` frame wrapping every protocol message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub op: u8,
    pub d: serde_json::Value,
}

impl Envelope {
    /// Wraps a typed payload into an envelope with the given opcode.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the payload fails to serialize
    /// (practically impossible for the types in this module).
    pub fn new<T: Serialize>(op: u8, payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            op,
            d: serde_json::to_value(payload)?,
        })
    }

    /// Decodes the `d` object into a typed payload.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` when the payload does not match the
    /// expected shape (protocol mismatch or a frame of the wrong class).
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.d.clone())
    }
}

// ── Handshake payloads ────────────────────────────────────────────────────────

/// `Hello` (op 0): the server's greeting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hello {
    /// Server's obs-websocket version string, e.g. `"5.3.3"`.
    #[serde(default)]
    pub obs_web_socket_version: Option<String>,
    /// Latest RPC version the server supports.
    pub rpc_version: u32,
    /// Present when the server requires authentication.
    #[serde(default)]
    pub authentication: Option<AuthChallenge>,
}

/// Authentication parameters inside `Hello`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthChallenge {
    pub challenge: String,
    pub salt: String,
}

/// `Identify` (op 1): the client's reply to `Hello`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identify {
    pub rpc_version: u32,
    /// The computed authentication string; omitted when the server did not
    /// request authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,
    /// Event subscription bitmask.  This client subscribes to nothing.
    pub event_subscriptions: u32,
}

/// `Identified` (op 2): handshake confirmation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identified {
    pub negotiated_rpc_version: u32,
}

// ── Request / response payloads ───────────────────────────────────────────────

/// `Request` (op 6).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub request_type: String,
    /// Correlates the response; a fresh UUID per request.
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_data: Option<serde_json::Value>,
}

/// `RequestResponse` (op 7).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    pub request_type: String,
    pub request_id: String,
    pub request_status: RequestStatus,
    #[serde(default)]
    pub response_data: Option<serde_json::Value>,
}

/// Outcome of a request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatus {
    pub result: bool,
    pub code: u16,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Response data of `GetSceneList`.  Only the field this tool consumes is
/// modelled; the scene array is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneListData {
    pub current_program_scene_name: String,
}

/// Request data of `GetSceneItemList`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneItemListRequest {
    pub scene_name: String,
}

/// Response data of `GetSceneItemList`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneItemListData {
    pub scene_items: Vec<SceneItemDto>,
}

/// One scene item as reported on the wire.
///
/// OBS reports many more fields (blend mode, lock state, crop, ...); only
/// the ones the pipeline consumes are decoded, the rest are dropped by
/// serde's default unknown-field handling.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneItemDto {
    pub source_name: String,
    /// Absent for groups and scenes nested as items.
    #[serde(default)]
    pub input_kind: Option<String>,
    pub scene_item_enabled: bool,
    pub scene_item_transform: SceneItemTransformDto,
}

/// The transform subset the reconciliation engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneItemTransformDto {
    pub position_x: f64,
    pub position_y: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub source_width: f64,
    pub source_height: f64,
}

impl From<SceneItemDto> for SceneItem {
    fn from(dto: SceneItemDto) -> Self {
        SceneItem {
            name: dto.source_name,
            kind: dto.input_kind,
            enabled: dto.scene_item_enabled,
            transform: SceneItemTransform {
                position_x: dto.scene_item_transform.position_x,
                position_y: dto.scene_item_transform.position_y,
                width: dto.scene_item_transform.width,
                height: dto.scene_item_transform.height,
                scale_x: dto.scene_item_transform.scale_x,
                scale_y: dto.scene_item_transform.scale_y,
                source_width: dto.scene_item_transform.source_width,
                source_height: dto.scene_item_transform.source_height,
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
