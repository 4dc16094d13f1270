#![allow(dead_code)]

// In-process stub servers standing in for the match server (WebSocket) and
// the directory backend (HTTP + SSE), bound on ephemeral ports per test.

use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::{
        IntoResponse,
        sse::{Event, Sse},
    },
    routing::get,
};
use game_client::use_cases::SessionContext;
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Instant,
};
use tokio::sync::{broadcast, mpsc};

pub fn test_session() -> SessionContext {
    SessionContext::new(Some("test-token".to_string()), Some("u1".to_string()))
}

// ---- match server stub -------------------------------------------------

struct WsStub {
    script_tx: broadcast::Sender<String>,
    inbound_tx: mpsc::UnboundedSender<String>,
}

/// A stub match server: frames pushed into `script_tx` reach every client,
/// frames received from clients land in `inbound_rx`.
pub struct GameServerStub {
    pub addr: SocketAddr,
    pub script_tx: broadcast::Sender<String>,
    pub inbound_rx: mpsc::UnboundedReceiver<String>,
}

impl GameServerStub {
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws/space-invaders", self.addr)
    }
}

pub async fn spawn_game_server() -> GameServerStub {
    let (script_tx, _) = broadcast::channel::<String>(64);
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<String>();
    let stub = Arc::new(WsStub {
        script_tx: script_tx.clone(),
        inbound_tx,
    });

    let app = Router::new()
        .route("/ws/space-invaders", get(ws_handler))
        .with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    GameServerStub {
        addr,
        script_tx,
        inbound_rx,
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(stub): State<Arc<WsStub>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, stub))
}

async fn handle_socket(mut socket: WebSocket, stub: Arc<WsStub>) {
    let mut script_rx = stub.script_tx.subscribe();
    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let _ = stub.inbound_tx.send(text.to_string());
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            frame = script_rx.recv() => match frame {
                // Sentinel for tests that need a server-side close.
                Ok(text) if text == "__close__" => break,
                Ok(text) => {
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
        }
    }
}

// ---- directory server stub ---------------------------------------------

struct SseStub {
    rooms_body: serde_json::Value,
    event_tx: broadcast::Sender<(String, String)>,
    connects: Arc<Mutex<Vec<Instant>>>,
    // When set, every subscription ends immediately to force reconnects.
    end_stream_immediately: bool,
}

/// A stub directory backend serving the bootstrap list and an SSE stream.
/// `connects` records the instant of every stream subscription.
pub struct DirectoryServerStub {
    pub addr: SocketAddr,
    pub event_tx: broadcast::Sender<(String, String)>,
    pub connects: Arc<Mutex<Vec<Instant>>>,
}

impl DirectoryServerStub {
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn stream_url(&self) -> String {
        format!("http://{}/api/rooms/stream", self.addr)
    }

    pub fn connect_count(&self) -> usize {
        self.connects.lock().expect("connects lock").len()
    }

    /// Polls until at least `count` stream subscriptions have been seen.
    pub async fn wait_for_connects(&self, count: usize) {
        let deadline = Instant::now() + std::time::Duration::from_secs(5);
        while self.connect_count() < count {
            assert!(
                Instant::now() < deadline,
                "timed out waiting for {count} feed subscriptions"
            );
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    /// Emits a named event whose data is the `{type, payload}` envelope.
    pub fn emit(&self, name: &str, payload: serde_json::Value) {
        let data = serde_json::json!({ "type": name, "payload": payload }).to_string();
        let _ = self.event_tx.send((name.to_string(), data));
    }
}

pub async fn spawn_directory_server(
    rooms_body: serde_json::Value,
    end_stream_immediately: bool,
) -> DirectoryServerStub {
    let (event_tx, _) = broadcast::channel::<(String, String)>(64);
    let connects = Arc::new(Mutex::new(Vec::new()));
    let stub = Arc::new(SseStub {
        rooms_body,
        event_tx: event_tx.clone(),
        connects: Arc::clone(&connects),
        end_stream_immediately,
    });

    let app = Router::new()
        .route("/api/rooms", get(list_rooms))
        .route("/api/rooms/stream", get(stream_rooms))
        .with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    DirectoryServerStub {
        addr,
        event_tx,
        connects,
    }
}

async fn list_rooms(State(stub): State<Arc<SseStub>>) -> Json<serde_json::Value> {
    Json(stub.rooms_body.clone())
}

async fn stream_rooms(
    State(stub): State<Arc<SseStub>>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    // Subscribe before recording the attempt so a test that waits for the
    // connect count can emit immediately afterwards without losing events.
    let rx = if stub.end_stream_immediately {
        None
    } else {
        Some(stub.event_tx.subscribe())
    };
    stub.connects
        .lock()
        .expect("connects lock")
        .push(Instant::now());

    let stream = futures::stream::unfold(rx, |state| async move {
        let mut rx = state?;
        match rx.recv().await {
            Ok((name, data)) => {
                let event = Event::default().event(name).data(data);
                Some((Ok::<_, Infallible>(event), Some(rx)))
            }
            Err(_) => None,
        }
    });
    Sse::new(stream)
}
