//! Test helpers for integration tests
//!
//! Provides a server on an ephemeral port, an HTTP client for the REST
//! routes and a small WebSocket client speaking the gateway protocol.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use meet_common::AppConfig;
use meet_gateway::{create_app, create_gateway_state, GatewayState};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// How long a client waits for a frame before failing the test
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: GatewayState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new in-memory test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(AppConfig::for_testing()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_gateway_state(config).await?;
        let app = create_app(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.put(&url).json(body).send().await?)
    }

    /// Register a meeting and assert it succeeded
    pub async fn register_meeting(&self, meeting_id: &str, organizer_id: &str) -> Result<()> {
        let response = self
            .put(
                &format!("/meetings/{meeting_id}"),
                &json!({ "organizerId": organizer_id }),
            )
            .await?;
        assert_status(response, StatusCode::OK).await
    }

    /// Open a gateway socket and consume Hello
    pub async fn connect(&self) -> Result<GatewayClient> {
        let url = format!("ws://{}/gateway", self.addr);
        let (stream, _) = connect_async(url).await?;
        let mut client = GatewayClient { stream };

        let hello = client.recv().await?;
        if hello["op"] != 10 {
            bail!("Expected Hello, got {hello}");
        }
        Ok(client)
    }

    /// Open a socket, identify and join one meeting room
    pub async fn connect_as(&self, user_id: &str, meeting_id: &str) -> Result<GatewayClient> {
        let mut client = self.connect().await?;
        client.identify(user_id, user_id).await?;
        client.join(meeting_id).await?;
        Ok(client)
    }
}

/// Minimal gateway protocol client
pub struct GatewayClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl GatewayClient {
    /// Send a raw text frame
    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<()> {
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Send a frame with the given op code and payload
    pub async fn send_op(&mut self, op: u8, d: Value) -> Result<()> {
        self.send_text(json!({ "op": op, "d": d }).to_string()).await
    }

    /// Next JSON frame, skipping ping and pong
    pub async fn recv(&mut self) -> Result<Value> {
        loop {
            let message = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .context("Timed out waiting for a frame")?
                .context("Socket closed")??;

            match message {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Ping(_) | Message::Pong(_) => {}
                other => bail!("Unexpected frame: {other:?}"),
            }
        }
    }

    /// Next Dispatch frame of the given type, skipping other frames
    pub async fn recv_event(&mut self, event_type: &str) -> Result<Value> {
        loop {
            let frame = self.recv().await?;
            if frame["op"] == 0 && frame["t"] == event_type {
                return Ok(frame);
            }
        }
    }

    /// Wait for the server's close frame and return its code
    pub async fn expect_close(&mut self) -> Result<u16> {
        loop {
            let message = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .context("Timed out waiting for close")?;

            match message {
                Some(Ok(Message::Close(Some(frame)))) => return Ok(u16::from(frame.code)),
                Some(Ok(Message::Close(None))) | None => bail!("Closed without a code"),
                Some(Ok(_)) => {}
                Some(Err(e)) => bail!("Socket error before close: {e}"),
            }
        }
    }

    /// Assert nothing arrives within a short window
    pub async fn expect_silence(&mut self) -> Result<()> {
        match tokio::time::timeout(Duration::from_millis(200), self.stream.next()).await {
            Err(_) => Ok(()),
            Ok(frame) => bail!("Expected no frame, got {frame:?}"),
        }
    }

    /// Identify and return the ack payload
    pub async fn identify(&mut self, user_id: &str, display_name: &str) -> Result<Value> {
        self.send_op(2, json!({ "userId": user_id, "displayName": display_name }))
            .await?;
        self.recv_ack().await
    }

    /// Join a meeting room and return the ack payload
    pub async fn join(&mut self, meeting_id: &str) -> Result<Value> {
        self.send_op(3, json!({ "meetingId": meeting_id })).await?;
        self.recv_ack().await
    }

    /// Issue a command and return its ack; room events before the ack are
    /// returned alongside it
    pub async fn command(&mut self, command: Value) -> Result<(Value, Vec<Value>)> {
        self.send_op(5, json!({ "nonce": "test", "command": command }))
            .await?;

        let mut events = Vec::new();
        loop {
            let frame = self.recv().await?;
            if frame["op"] == 6 {
                return Ok((frame["d"].clone(), events));
            }
            events.push(frame);
        }
    }

    async fn recv_ack(&mut self) -> Result<Value> {
        loop {
            let frame = self.recv().await?;
            if frame["op"] == 6 {
                return Ok(frame["d"].clone());
            }
        }
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
