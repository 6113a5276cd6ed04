use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use wschat_server::{ChatServer, History, ServerConfig, Stats, StatsSnapshot};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

struct TestServer {
    addr: SocketAddr,
    stats: Arc<Stats>,
    history: Arc<History>,
    assets: TempDir,
}

async fn start_server() -> TestServer {
    let assets = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("index.html"), "<h1>wschat</h1>").unwrap();
    std::fs::write(assets.path().join("chat.js"), "console.log(1);").unwrap();

    let server = ChatServer::bind(ServerConfig {
        bind_addr: "127.0.0.1:0".into(),
        assets_dir: assets.path().to_path_buf(),
        tls: None,
    })
    .await
    .unwrap();

    let test_server = TestServer {
        addr: server.local_addr().unwrap(),
        stats: server.stats(),
        history: server.history(),
        assets,
    };
    tokio::spawn(server.run());
    test_server
}

async fn wait_until(mut check: impl FnMut() -> bool) {
    tokio::time::timeout(WAIT, async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

async fn connect(addr: SocketAddr) -> Client {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/chat", addr))
        .await
        .unwrap();
    ws
}

async fn next_text(ws: &mut Client) -> String {
    loop {
        let msg = tokio::time::timeout(WAIT, ws.next())
            .await
            .expect("no frame in time")
            .expect("stream ended")
            .unwrap();
        if let Message::Text(text) = msg {
            return text.as_str().to_owned();
        }
    }
}

#[tokio::test]
async fn broadcast_reaches_every_client_and_replays_to_late_joiner() {
    let server = start_server().await;

    let mut alice = connect(server.addr).await;
    let mut bob = connect(server.addr).await;
    // Two sessions plus the history log
    wait_until(|| server.stats.snapshot().clients == 3).await;

    alice.send(Message::Text("hello".into())).await.unwrap();

    let to_alice = next_text(&mut alice).await;
    let to_bob = next_text(&mut bob).await;
    assert!(to_alice.ends_with("> hello"), "got {to_alice}");
    assert_eq!(to_alice, to_bob);
    assert!(to_alice.contains(" <127.0.0.1:"));

    wait_until(|| server.history.len() == 1).await;
    let mut carol = connect(server.addr).await;
    assert_eq!(next_text(&mut carol).await, to_alice);

    let stats = server.stats.snapshot();
    assert_eq!(stats.msgs_in, 1);
    wait_until(|| server.stats.snapshot().msgs_out == 3).await;
}

#[tokio::test]
async fn leaving_client_is_unsubscribed() {
    let server = start_server().await;

    let mut alice = connect(server.addr).await;
    wait_until(|| server.stats.snapshot().clients == 2).await;

    alice.close(None).await.unwrap();
    wait_until(|| server.stats.snapshot().clients == 1).await;
}

#[tokio::test]
async fn servesassets_and_counters() {
    let server = start_server().await;
    let base = format!("http://{}", server.addr);

    let index = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(index.status().as_u16(), 200);
    assert_eq!(
        index.headers()["content-type"].to_str().unwrap(),
        "text/html"
    );
    assert_eq!(index.text().await.unwrap(), "<h1>wschat</h1>");

    let script = reqwest::get(format!("{}/chat.js", base)).await.unwrap();
    assert_eq!(script.text().await.unwrap(), "console.log(1);");

    let missing = reqwest::get(format!("{}/missing.txt", base)).await.unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    let vars = reqwest::get(format!("{}/debug/vars", base)).await.unwrap();
    assert_eq!(vars.status().as_u16(), 200);
    assert_eq!(
        vars.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let snapshot: StatsSnapshot = serde_json::from_str(&vars.text().await.unwrap()).unwrap();
    assert_eq!(snapshot.clients, 1);
    assert_eq!(snapshot.msgs_in, 0);
}

#[tokio::test]
async fn rejects_bad_requests() {
    let server = start_server().await;
    let base = format!("http://{}", server.addr);

    let plain_chat = reqwest::get(format!("{}/chat", base)).await.unwrap();
    assert_eq!(plain_chat.status().as_u16(), 400);

    let post = reqwest::Client::new()
        .post(format!("{}/", base))
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(post.status().as_u16(), 405);

    // Raw request, since HTTP clients normalize dot segments away
    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream
        .write_all(b"GET /../Cargo.toml HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 404 "), "got {response}");
    assert!(!response.contains("[package]"));
}

#[tokio::test]
async fn serves_escaped_names_and_head_requests() {
    let server = start_server().await;
    std::fs::write(server.assets.path().join("my page.html"), "<p>spaced</p>").unwrap();
    let base = format!("http://{}", server.addr);

    let spaced = reqwest::get(format!("{}/my%20page.html", base)).await.unwrap();
    assert_eq!(spaced.status().as_u16(), 200);
    assert_eq!(spaced.text().await.unwrap(), "<p>spaced</p>");

    let head = reqwest::Client::new()
        .head(format!("{}/", base))
        .send()
        .await
        .unwrap();
    assert_eq!(head.status().as_u16(), 200);
    assert_eq!(head.headers()["content-length"].to_str().unwrap(), "15");
}

#[test]
fn chat_client_round_trip() {
    use bevy_wschat::chat::{
        ChatConnection, ChatEvent, ChatView, ClientProfile, KeyPress, SchemePolicy,
        connection_target,
    };

    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(start_server());

    let origin = format!("http://{}", server.addr);
    let url = connection_target(&origin, SchemePolicy::FollowPage).unwrap();
    assert_eq!(url.as_str(), format!("ws://{}/chat", server.addr));

    let (connection, events) = ChatConnection::connect(url);
    let mut view = ChatView::new(ClientProfile::full());

    let opened = events.recv_timeout(WAIT).unwrap();
    assert_eq!(opened, ChatEvent::Open);
    view.apply(&opened);
    assert_eq!(view.status().as_str(), ":)");

    for c in "hi there".chars() {
        view.press(KeyPress::Text(c.to_string()));
    }
    let frame = view.press(KeyPress::Enter).unwrap();
    connection.send(frame).unwrap();

    let echoed = events.recv_timeout(WAIT).unwrap();
    view.apply(&echoed);
    let lines: Vec<_> = view.lines().map(|l| l.text.clone()).collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("> hi there"), "got {:?}", lines);
}
