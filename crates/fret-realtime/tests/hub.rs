//! Channel hub against an in-process WebSocket server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use assert_matches::assert_matches;
use fret_auth::{LogNavigator, MemoryTokenStore, SessionConfig, SessionManager};
use fret_core::realtime::ChatOutbound;
use fret_realtime::{ChannelEvent, ChannelHub, ChannelSubscription, ChannelType, StaticToken};
use fret_settings::RealtimeSettings;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Request URIs seen by the server, in order.
#[derive(Clone, Default)]
struct Uris(Arc<Mutex<Vec<String>>>);

impl Uris {
    fn push(&self, uri: String) {
        self.0.lock().push(uri);
    }

    fn all(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

struct TestServer {
    ws_url: String,
    connections: Arc<AtomicUsize>,
    uris: Uris,
}

/// Echo server. `{"cmd":"garbage"}` makes it answer with a non-JSON frame,
/// `{"cmd":"close"}` makes it close the socket.
async fn start_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let uris = Uris::default();

    let conn_count = connections.clone();
    let seen = uris.clone();
    let _accept = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let _ = conn_count.fetch_add(1, Ordering::SeqCst);
            let seen = seen.clone();
            let _conn = tokio::spawn(async move {
                let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                    seen.push(req.uri().to_string());
                    Ok(resp)
                };
                let Ok(ws) = accept_hdr_async(stream, callback).await else {
                    return;
                };
                let (mut tx, mut rx) = ws.split();
                while let Some(Ok(msg)) = rx.next().await {
                    let Message::Text(text) = msg else { continue };
                    match text.as_str() {
                        r#"{"cmd":"garbage"}"# => {
                            let _ = tx.send(Message::Text("not json".into())).await;
                        }
                        r#"{"cmd":"close"}"# => {
                            let _ = tx.close().await;
                            break;
                        }
                        _ => {
                            let _ = tx.send(Message::Text(text.clone())).await;
                        }
                    }
                }
            });
        }
    });

    TestServer {
        ws_url: format!("ws://{addr}/ws"),
        connections,
        uris,
    }
}

fn hub_for(server: &TestServer, token: Option<&str>) -> ChannelHub {
    let settings = RealtimeSettings {
        ws_url: server.ws_url.clone(),
        ..Default::default()
    };
    ChannelHub::new(&settings, Arc::new(StaticToken(token.map(str::to_string))))
}

async fn next(sub: &mut ChannelSubscription) -> Option<ChannelEvent> {
    timeout(TIMEOUT, sub.recv()).await.unwrap()
}

async fn next_message(sub: &mut ChannelSubscription) -> Value {
    match next(sub).await {
        Some(ChannelEvent::Message(v)) => v,
        other => panic!("expected message, got {other:?}"),
    }
}

#[tokio::test]
async fn same_key_shares_one_socket() {
    let server = start_server().await;
    let hub = hub_for(&server, Some("a1"));

    let mut first = hub.connect(ChannelType::Tracking, "o1").unwrap();
    let mut second = hub.connect(ChannelType::Tracking, "o1").unwrap();
    // Queued before the handshake completes.
    assert!(hub.send(ChannelType::Tracking, "o1", &json!({"n": 1})));

    assert_eq!(next_message(&mut first).await, json!({"n": 1}));
    assert_eq!(next_message(&mut second).await, json!({"n": 1}));
    assert_eq!(server.connections.load(Ordering::SeqCst), 1);
    assert_eq!(hub.len(), 1);
    assert_eq!(server.uris.all(), vec!["/ws/tracking/order/o1/?token=a1".to_string()]);
}

#[tokio::test]
async fn distinct_keys_get_distinct_sockets() {
    let server = start_server().await;
    let hub = hub_for(&server, None);

    let mut tracking = hub.connect(ChannelType::Tracking, "o1").unwrap();
    let mut order = hub.connect(ChannelType::Order, "o1").unwrap();
    let mut chat = hub.connect(ChannelType::Chat, "c1").unwrap();
    for (ty, id) in [
        (ChannelType::Tracking, "o1"),
        (ChannelType::Order, "o1"),
        (ChannelType::Chat, "c1"),
    ] {
        assert!(hub.send(ty, id, &json!({"to": ty.as_str()})));
    }

    assert_eq!(next_message(&mut tracking).await, json!({"to": "tracking"}));
    assert_eq!(next_message(&mut order).await, json!({"to": "order"}));
    assert_eq!(next_message(&mut chat).await, json!({"to": "chat"}));
    assert_eq!(server.connections.load(Ordering::SeqCst), 3);

    let mut uris = server.uris.all();
    uris.sort();
    assert_eq!(uris, vec!["/ws/chat/c1/", "/ws/orders/o1/", "/ws/tracking/order/o1/"]);
}

#[tokio::test]
async fn send_without_channel_is_noop() {
    let server = start_server().await;
    let hub = hub_for(&server, None);

    assert!(!hub.send(ChannelType::Chat, "c1", &json!({"content": "hello"})));
    assert!(hub.is_empty());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(server.connections.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn server_close_ends_stream_and_reconnect_opens_new_socket() {
    let server = start_server().await;
    let hub = hub_for(&server, None);

    let mut sub = hub.connect(ChannelType::Order, "o1").unwrap();
    assert!(hub.send(ChannelType::Order, "o1", &json!({"cmd": "close"})));
    assert_eq!(next(&mut sub).await, None);
    assert!(!hub.is_open(ChannelType::Order, "o1"));
    assert!(!hub.send(ChannelType::Order, "o1", &json!({"n": 1})));

    let mut again = hub.connect(ChannelType::Order, "o1").unwrap();
    assert!(hub.send(ChannelType::Order, "o1", &json!({"n": 2})));
    assert_eq!(next_message(&mut again).await, json!({"n": 2}));
    assert_eq!(server.connections.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn malformed_frame_fails_channel_and_reconnect_opens_new_socket() {
    let server = start_server().await;
    let hub = hub_for(&server, None);

    let mut sub = hub.connect(ChannelType::Chat, "c1").unwrap();
    assert!(hub.send(ChannelType::Chat, "c1", &json!({"cmd": "garbage"})));

    assert_matches!(next(&mut sub).await, Some(ChannelEvent::Failed(reason)) if reason.contains("malformed"));
    assert_eq!(next(&mut sub).await, None);
    assert!(!hub.is_open(ChannelType::Chat, "c1"));
    assert!(!hub.send(ChannelType::Chat, "c1", &json!({"content": "lost"})));

    let mut again = hub.connect(ChannelType::Chat, "c1").unwrap();
    assert!(hub.send(ChannelType::Chat, "c1", &json!({"content": "back"})));
    assert_eq!(next_message(&mut again).await, json!({"content": "back"}));
    assert_eq!(server.connections.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn disconnect_closes_and_deregisters() {
    let server = start_server().await;
    let hub = hub_for(&server, None);

    let mut sub = hub.connect(ChannelType::Tracking, "o1").unwrap();
    assert!(hub.send(ChannelType::Tracking, "o1", &json!({"n": 1})));
    assert_eq!(next_message(&mut sub).await, json!({"n": 1}));

    hub.disconnect(ChannelType::Tracking, "o1");
    assert!(!hub.is_open(ChannelType::Tracking, "o1"));
    assert_eq!(next(&mut sub).await, None);
    assert!(!hub.send(ChannelType::Tracking, "o1", &json!({"n": 2})));

    // Second disconnect is a no-op.
    hub.disconnect(ChannelType::Tracking, "o1");
}

#[tokio::test]
async fn shutdown_closes_every_channel() {
    let server = start_server().await;
    let hub = hub_for(&server, None);

    let mut a = hub.connect(ChannelType::Tracking, "o1").unwrap();
    let mut b = hub.connect(ChannelType::Chat, "c1").unwrap();
    assert!(hub.send(ChannelType::Tracking, "o1", &json!(1)));
    assert!(hub.send(ChannelType::Chat, "c1", &json!(2)));
    assert_eq!(next_message(&mut a).await, json!(1));
    assert_eq!(next_message(&mut b).await, json!(2));

    hub.shutdown();
    assert!(hub.is_empty());
    assert_eq!(next(&mut a).await, None);
    assert_eq!(next(&mut b).await, None);
}

#[tokio::test]
async fn late_subscriber_sees_only_later_events() {
    let server = start_server().await;
    let hub = hub_for(&server, None);

    let mut early = hub.connect(ChannelType::Order, "o1").unwrap();
    assert!(hub.send(ChannelType::Order, "o1", &json!({"n": 1})));
    assert_eq!(next_message(&mut early).await, json!({"n": 1}));

    let mut late = hub.connect(ChannelType::Order, "o1").unwrap();
    assert!(hub.send(ChannelType::Order, "o1", &json!({"n": 2})));
    assert_eq!(next_message(&mut late).await, json!({"n": 2}));
    assert_eq!(next_message(&mut early).await, json!({"n": 2}));
    assert_eq!(server.connections.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn typed_payloads_round_trip_through_channel() {
    let server = start_server().await;
    let hub = hub_for(&server, None);

    let sub = hub.connect(ChannelType::Chat, "c1").unwrap();
    let mut stream = Box::pin(sub.into_stream());
    assert!(hub.send_json(ChannelType::Chat, "c1", &ChatOutbound::text("On my way")));

    let event = timeout(TIMEOUT, stream.next()).await.unwrap().unwrap();
    let echoed: ChatOutbound = event.decode().unwrap();
    assert_eq!(echoed.content, "On my way");
}

#[tokio::test]
async fn session_token_is_read_at_connect_time() {
    let server = start_server().await;
    let store = Arc::new(MemoryTokenStore::with_pair("jwt-access", "jwt-refresh"));
    let session = SessionManager::new(
        reqwest::Client::new(),
        SessionConfig::new("http://127.0.0.1:9/api/v1"),
        store,
        Arc::new(LogNavigator),
    );
    let settings = RealtimeSettings {
        ws_url: server.ws_url.clone(),
        ..Default::default()
    };
    let hub = ChannelHub::new(&settings, Arc::new(session));

    let mut sub = hub.connect(ChannelType::Chat, "c7").unwrap();
    assert!(hub.send(ChannelType::Chat, "c7", &json!({})));
    let _ = next_message(&mut sub).await;
    assert_eq!(server.uris.all(), vec!["/ws/chat/c7/?token=jwt-access".to_string()]);
}
