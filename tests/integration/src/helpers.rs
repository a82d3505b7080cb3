//! Test helpers for integration tests
//!
//! Spawns the real router on an ephemeral port with in-memory repositories
//! and provides HTTP and WebSocket clients for it.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use campus_api::{create_basic_app, AppState};
use campus_core::RoomId;
use campus_common::{
    AppConfig, AppSettings, ChatConfig, CorsConfig, DatabaseConfig, Environment, Identity,
    JwtConfig, JwtService, RateLimitConfig, ServerConfig, StorageConfig,
};
use campus_gateway::{spawn_hub, HubHandle};
use campus_service::testing::{test_context_with, InMemoryStore, TEST_JWT_SECRET};
use campus_service::ChatEnvelope;
use futures_util::{SinkExt, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::fixtures::{seed, OutgoingMessage, Student};

/// How long a client waits for a frame before failing the test
const RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: InMemoryStore,
    pub hub: HubHandle,
    upload_dir: PathBuf,
    jwt: JwtService,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a seeded server with default chat settings
    pub async fn start() -> Result<Self> {
        Self::start_with(ChatConfig::default()).await
    }

    /// Start a seeded server with custom chat settings
    pub async fn start_with(chat: ChatConfig) -> Result<Self> {
        Self::start_configured(chat, CorsConfig::default()).await
    }

    /// Start a seeded server that only accepts lobby handshakes from `origins`
    pub async fn start_with_origins(origins: &[&str]) -> Result<Self> {
        let cors = CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
        };
        Self::start_configured(ChatConfig::default(), cors).await
    }

    async fn start_configured(chat: ChatConfig, cors: CorsConfig) -> Result<Self> {
        let store = InMemoryStore::new();
        seed(&store);

        let upload_dir = std::env::temp_dir().join(format!("campus-it-{}", uuid::Uuid::new_v4()));
        let mut config = test_config(&upload_dir, chat.clone());
        config.cors = cors;

        let context = test_context_with(&store, chat.clone(), config.storage.clone());
        let hub = spawn_hub(chat.hub_intake_capacity);
        let state = AppState::new(context, hub.clone(), config);
        let app = create_basic_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            store,
            hub,
            upload_dir,
            jwt: JwtService::new(TEST_JWT_SECRET, 3600),
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Directory uploads are written to
    pub fn upload_dir(&self) -> &PathBuf {
        &self.upload_dir
    }

    /// Issue an access token for a seeded student
    pub fn token_for(&self, student: Student) -> Result<String> {
        let identity = Identity::new(student.user_id(), student.sut_id, "student");
        Ok(self.jwt.issue_access_token(&identity)?)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .delete(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?)
    }

    /// Make a multipart POST with a single file field
    pub async fn upload(
        &self,
        path: &str,
        token: Option<&str>,
        field: &str,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part(field.to_string(), part);

        let mut request = self.client.post(&url).multipart(form);
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        Ok(request.send().await?)
    }

    /// Lobby URL for a post, with the token in the query string
    pub fn lobby_url(&self, post_id: i64, token: Option<&str>) -> String {
        match token {
            Some(token) => format!("ws://{}/api/chat/ws/lobby/{post_id}?token={token}", self.addr),
            None => format!("ws://{}/api/chat/ws/lobby/{post_id}", self.addr),
        }
    }

    /// Join a post's lobby as `student` and wait until the hub has
    /// registered the connection
    pub async fn join(&self, post_id: i64, room_id: i64, student: Student) -> Result<LobbyClient> {
        let room = RoomId::new(room_id);
        let before = self.hub.member_count(room).await?;
        let token = self.token_for(student)?;
        let (socket, _) = connect_async(self.lobby_url(post_id, Some(&token))).await?;

        // The upgrade completes before the session joins the hub
        let hub = self.hub.clone();
        wait_for(move || {
            let hub = hub.clone();
            async move { hub.member_count(room).await.map(|n| n > before).unwrap_or(false) }
        })
        .await?;

        Ok(LobbyClient { socket })
    }

    /// Try a handshake and return the HTTP status it was rejected with
    pub async fn handshake_status(&self, post_id: i64, token: Option<&str>) -> Result<StatusCode> {
        self.handshake_status_from(post_id, token, None).await
    }

    /// Same as [`Self::handshake_status`], sending `origin` as a browser would
    pub async fn handshake_status_from(
        &self,
        post_id: i64,
        token: Option<&str>,
        origin: Option<&str>,
    ) -> Result<StatusCode> {
        let mut request = self.lobby_url(post_id, token).into_client_request()?;
        if let Some(origin) = origin {
            request.headers_mut().insert("Origin", HeaderValue::from_str(origin)?);
        }
        match connect_async(request).await {
            Ok(_) => Ok(StatusCode::SWITCHING_PROTOCOLS),
            Err(tokio_tungstenite::tungstenite::Error::Http(response)) => {
                Ok(StatusCode::from_u16(response.status().as_u16())?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Configuration for an in-process test server
pub fn test_config(upload_dir: &std::path::Path, chat: ChatConfig) -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "campus-chat-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 0,
            run_migrations: false,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry: 3600,
        },
        rate_limit: RateLimitConfig {
            requests_per_second: 1000,
            burst: 1000,
        },
        cors: CorsConfig::default(),
        storage: StorageConfig {
            upload_dir: upload_dir.to_string_lossy().into_owned(),
            max_image_bytes: 1024,
            max_file_bytes: 2048,
        },
        chat,
    }
}

/// Poll `check` until it holds or the receive timeout passes
pub async fn wait_for<F, Fut>(mut check: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + RECEIVE_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    anyhow::bail!("condition not met within {:?}", RECEIVE_TIMEOUT)
}

/// WebSocket client connected to one lobby
pub struct LobbyClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

/// What arrived on a lobby socket
#[derive(Debug)]
pub enum LobbyFrame {
    Event(ChatEnvelope),
    Closed(Option<u16>),
}

impl LobbyClient {
    pub async fn send(&mut self, message: &OutgoingMessage) -> Result<()> {
        let text = serde_json::to_string(message)?;
        self.socket.send(Message::Text(text)).await?;
        Ok(())
    }

    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.socket.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Next event or close, skipping pings
    pub async fn next_frame(&mut self) -> Result<LobbyFrame> {
        loop {
            let frame = tokio::time::timeout(RECEIVE_TIMEOUT, self.socket.next())
                .await
                .context("timed out waiting for a frame")?;
            match frame {
                Some(Ok(Message::Text(text))) => {
                    return Ok(LobbyFrame::Event(serde_json::from_str(&text)?));
                }
                Some(Ok(Message::Close(frame))) => {
                    return Ok(LobbyFrame::Closed(frame.map(|f| u16::from(f.code))));
                }
                Some(Ok(_)) => {}
                Some(Err(_)) | None => return Ok(LobbyFrame::Closed(None)),
            }
        }
    }

    /// Next frame, which must be an event
    pub async fn next_event(&mut self) -> Result<ChatEnvelope> {
        match self.next_frame().await? {
            LobbyFrame::Event(event) => Ok(event),
            LobbyFrame::Closed(code) => anyhow::bail!("socket closed with {code:?}"),
        }
    }

    /// Next frame, which must be a close; returns its code
    pub async fn next_close(&mut self) -> Result<Option<u16>> {
        loop {
            if let LobbyFrame::Closed(code) = self.next_frame().await? {
                return Ok(code);
            }
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.socket.close(None).await?;
        Ok(())
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
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
