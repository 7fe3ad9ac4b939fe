//! WebSocket connection to OBS Studio's obs-websocket v5 control protocol.
//!
//! A connection is constructed fresh for each invocation and dropped when the
//! command finishes; there is no shared or long-lived session.  The protocol
//! use is deliberately narrow: identify once, then issue `GetSceneList` and
//! `GetSceneItemList` and read their responses.
//!
//! # Handshake
//!
//! ```text
//! client                              server
//! ──────                              ──────
//! open ws://host:port
//!                                     Hello (op 0, may carry challenge+salt)
//! Identify (op 1, rpcVersion 1,
//!           authentication string)
//!                                     Identified (op 2)  … or socket close
//! ```
//!
//! A server that rejects the password closes the socket instead of sending
//! `Identified`; that close is reported as
//! [`ObsError::AuthenticationRejected`].
//!
//! # Request dispatch
//!
//! Requests carry a fresh UUID `requestId`.  While waiting for the matching
//! `RequestResponse`, event frames (this client subscribes to none, but a
//! straggler is possible) and responses to other request ids are skipped.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use uuid::Uuid;

use scenefit_core::protocol::auth::authentication_string;
use scenefit_core::protocol::messages::{
    opcode, Envelope, Hello, Identified, Identify, Request, RequestResponse, SceneItemListData,
    SceneItemListRequest, SceneListData, REQUEST_GET_SCENE_ITEM_LIST, REQUEST_GET_SCENE_LIST,
    RPC_VERSION,
};
use scenefit_core::SceneItem;

use crate::infrastructure::storage::ConnectionSettings;

/// Errors produced by the OBS connection.
#[derive(Debug, Error)]
pub enum ObsError {
    /// The WebSocket could not be established (OBS not running, wrong
    /// host/port, firewall).
    #[error("failed to reach OBS at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: WsError,
    },

    /// OBS closed the connection instead of completing the handshake, which
    /// is how obs-websocket signals a rejected password.
    #[error("OBS rejected the connection during identification (check the password)")]
    AuthenticationRejected,

    /// The server confirmed the session with an RPC version this client does
    /// not speak.
    #[error("OBS negotiated unsupported RPC version {negotiated}")]
    ProtocolVersion { negotiated: u32 },

    /// A frame of an unexpected class arrived during the handshake.
    #[error("unexpected protocol frame during handshake (op {got})")]
    Handshake { got: u8 },

    /// The underlying WebSocket failed mid-session.
    #[error("WebSocket transport error: {0}")]
    Transport(#[from] WsError),

    /// A frame did not match the expected protocol shape.
    #[error("malformed protocol payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// OBS answered a request with a failure status.
    #[error("OBS request {request_type} failed (code {code}): {comment}")]
    RequestFailed {
        request_type: String,
        code: u16,
        comment: String,
    },

    /// The connection ended while waiting for a frame.
    #[error("connection closed by OBS")]
    Closed,
}

// ── Scene source seam ─────────────────────────────────────────────────────────

/// The narrow scene-query interface consumed by the resize pipeline.
///
/// The production implementation is [`ObsConnection`]; tests use
/// [`MockSceneSource`] to drive the pipeline without a running OBS.
#[async_trait]
pub trait SceneSource: Send {
    /// Returns the items of the current program scene, in scene order.
    async fn current_scene_items(&mut self) -> Result<Vec<SceneItem>, ObsError>;
}

// ── Connection ────────────────────────────────────────────────────────────────

/// An identified obs-websocket v5 session.
#[derive(Debug)]
pub struct ObsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// Server version string from `Hello`, for log context.
    server_version: Option<String>,
}

impl ObsConnection {
    /// Connects to `ws://{host}:{port}` and completes the identify handshake.
    ///
    /// One attempt, no retry: a failure here aborts the whole invocation and
    /// the caller reports it to the user.
    ///
    /// # Errors
    ///
    /// Returns [`ObsError::Connect`] when the socket cannot be opened,
    /// [`ObsError::AuthenticationRejected`] when the server closes instead of
    /// confirming, and [`ObsError::ProtocolVersion`] when the negotiated RPC
    /// version is not the one this client speaks.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, ObsError> {
        let url = format!("ws://{}:{}", settings.host, settings.port);
        debug!("connecting to OBS at {url}");

        let (stream, _response) =
            connect_async(url.as_str())
                .await
                .map_err(|source| ObsError::Connect {
                    url: url.clone(),
                    source,
                })?;

        let mut conn = Self {
            stream,
            server_version: None,
        };

        // First frame must be Hello.
        let envelope = conn.next_envelope().await?;
        if envelope.op != opcode::HELLO {
            return Err(ObsError::Handshake { got: envelope.op });
        }
        let hello: Hello = envelope.payload()?;
        conn.server_version = hello.obs_web_socket_version.clone();
        debug!(
            "OBS hello: version {:?}, rpc {}",
            conn.server_version, hello.rpc_version
        );

        // Answer with Identify, proving the password when challenged.
        let authentication = hello
            .authentication
            .map(|auth| authentication_string(&settings.password, &auth.salt, &auth.challenge));
        let identify = Identify {
            rpc_version: RPC_VERSION,
            authentication,
            event_subscriptions: 0,
        };
        conn.send_envelope(&Envelope::new(opcode::IDENTIFY, &identify)?)
            .await?;

        // The server either confirms or drops the socket.
        let envelope = match conn.next_envelope().await {
            Ok(envelope) => envelope,
            Err(ObsError::Closed) => return Err(ObsError::AuthenticationRejected),
            Err(other) => return Err(other),
        };
        if envelope.op != opcode::IDENTIFIED {
            return Err(ObsError::Handshake { got: envelope.op });
        }
        let identified: Identified = envelope.payload()?;
        if identified.negotiated_rpc_version != RPC_VERSION {
            return Err(ObsError::ProtocolVersion {
                negotiated: identified.negotiated_rpc_version,
            });
        }

        debug!("identified against OBS (rpc {})", RPC_VERSION);
        Ok(conn)
    }

    /// Name of the current program scene (`GetSceneList`).
    pub async fn current_program_scene(&mut self) -> Result<String, ObsError> {
        let data = self.call(REQUEST_GET_SCENE_LIST, None).await?;
        let scene_list: SceneListData = serde_json::from_value(data)?;
        Ok(scene_list.current_program_scene_name)
    }

    /// Items of the named scene (`GetSceneItemList`), converted to domain
    /// scene items in scene order.
    pub async fn scene_items(&mut self, scene_name: &str) -> Result<Vec<SceneItem>, ObsError> {
        let request_data = serde_json::to_value(SceneItemListRequest {
            scene_name: scene_name.to_string(),
        })?;
        let data = self
            .call(REQUEST_GET_SCENE_ITEM_LIST, Some(request_data))
            .await?;
        let item_list: SceneItemListData = serde_json::from_value(data)?;
        Ok(item_list.scene_items.into_iter().map(Into::into).collect())
    }

    /// Closes the session; errors on close are irrelevant and dropped.
    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }

    // ── Frame plumbing ────────────────────────────────────────────────────────

    /// Sends one request and waits for its matching response.
    ///
    /// # Errors
    ///
    /// Returns [`ObsError::RequestFailed`] when the server answers with a
    /// failure status, plus any transport/protocol error.
    async fn call(
        &mut self,
        request_type: &str,
        request_data: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, ObsError> {
        let request_id = Uuid::new_v4().to_string();
        let request = Request {
            request_type: request_type.to_string(),
            request_id: request_id.clone(),
            request_data,
        };
        self.send_envelope(&Envelope::new(opcode::REQUEST, &request)?)
            .await?;

        loop {
            let envelope = self.next_envelope().await?;
            match envelope.op {
                opcode::REQUEST_RESPONSE => {
                    let response: RequestResponse = envelope.payload()?;
                    if response.request_id != request_id {
                        debug!(
                            "skipping response for foreign request id {}",
                            response.request_id
                        );
                        continue;
                    }
                    if !response.request_status.result {
                        return Err(ObsError::RequestFailed {
                            request_type: response.request_type,
                            code: response.request_status.code,
                            comment: response.request_status.comment.unwrap_or_default(),
                        });
                    }
                    return Ok(response.response_data.unwrap_or(serde_json::Value::Null));
                }
                opcode::EVENT => {
                    // Not subscribed, but a frame emitted between subscribe
                    // bookkeeping on the server side can still arrive.
                    debug!("skipping unsolicited event frame");
                }
                other => {
                    warn!("skipping unexpected frame with op {other}");
                }
            }
        }
    }

    /// Reads the next protocol envelope, transparently skipping WebSocket
    /// control frames.
    async fn next_envelope(&mut self) -> Result<Envelope, ObsError> {
        loop {
            match self.stream.next().await {
                Some(Ok(WsMessage::Text(text))) => {
                    return Ok(serde_json::from_str(&text)?);
                }
                Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_))) => {
                    // tokio-tungstenite answers pings on the next send.
                    continue;
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!("OBS sent close frame: {frame:?}");
                    return Err(ObsError::Closed);
                }
                Some(Ok(other)) => {
                    warn!("ignoring non-text WebSocket frame: {other:?}");
                }
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    return Err(ObsError::Closed);
                }
                Some(Err(e)) => return Err(ObsError::Transport(e)),
            }
        }
    }

    async fn send_envelope(&mut self, envelope: &Envelope) -> Result<(), ObsError> {
        let text = serde_json::to_string(envelope)?;
        self.stream.send(WsMessage::Text(text)).await?;
        Ok(())
    }
}

#[async_trait]
impl SceneSource for ObsConnection {
    async fn current_scene_items(&mut self) -> Result<Vec<SceneItem>, ObsError> {
        let scene_name = self.current_program_scene().await?;
        debug!("current program scene: {scene_name}");
        self.scene_items(&scene_name).await
    }
}

// ── Mock implementation (always compiled for tests) ───────────────────────────

/// A scene source that serves a canned item list, or a canned error, without
/// any network.  Used by the pipeline tests on every platform.
pub struct MockSceneSource {
    result: Option<Result<Vec<SceneItem>, ObsError>>,
}

impl MockSceneSource {
    /// Serves the given items once.
    pub fn with_items(items: Vec<SceneItem>) -> Self {
        Self {
            result: Some(Ok(items)),
        }
    }

    /// Fails the query with the given error once.
    pub fn with_error(error: ObsError) -> Self {
        Self {
            result: Some(Err(error)),
        }
    }
}

#[async_trait]
impl SceneSource for MockSceneSource {
    async fn current_scene_items(&mut self) -> Result<Vec<SceneItem>, ObsError> {
        self.result.take().unwrap_or(Err(ObsError::Closed))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
