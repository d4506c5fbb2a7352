//! Integration tests for the chat relay.
//!
//! Each test starts the relay in-process on an ephemeral port with its own
//! message log in a temporary directory, then drives it with real
//! WebSocket clients and HTTP requests.

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use futures_util::{SinkExt, StreamExt};
use nightowl_server::{
    config::ServerConfig,
    infrastructure::dto::websocket::ChatMessageDto,
    ui::{Server, ServerError},
};
use tempfile::TempDir;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
    time::timeout,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Error as WsError, Message},
};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper struct to manage an in-process relay
struct TestRelay {
    addr: SocketAddr,
    log_path: PathBuf,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), ServerError>>,
    _dir: TempDir,
}

impl TestRelay {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            log_path: dir.path().join("message_history.csv"),
            ..ServerConfig::default()
        };
        let server = Server::from_config(&config).await.unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(server.serve(listener, async move {
            let _ = shutdown_rx.await;
        }));

        TestRelay {
            addr,
            log_path: config.log_path,
            shutdown: Some(shutdown_tx),
            handle,
            _dir: dir,
        }
    }

    async fn connect(&self, client_id: &str) -> Socket {
        let url = format!("ws://{}/ws/{}", self.addr, client_id);
        let (socket, _response) = connect_async(url).await.unwrap();
        socket
    }

    async fn history(&self) -> Vec<ChatMessageDto> {
        reqwest::get(format!("http://{}/history", self.addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    fn log_rows(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log_path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    async fn stop(&mut self) -> Result<(), ServerError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        timeout(FRAME_TIMEOUT, &mut self.handle)
            .await
            .expect("server did not shut down")
            .unwrap()
    }
}

/// Next text frame, skipping control frames
async fn next_text(socket: &mut Socket) -> String {
    loop {
        let frame = timeout(FRAME_TIMEOUT, socket.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("websocket error");
        match frame {
            Message::Text(text) => return text.as_str().to_string(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {:?}", other),
        }
    }
}

async fn next_chat(socket: &mut Socket) -> ChatMessageDto {
    let text = next_text(socket).await;
    serde_json::from_str(&text).unwrap_or_else(|_| panic!("not a chat frame: {}", text))
}

async fn send(socket: &mut Socket, content: &str) {
    socket.send(Message::Text(content.into())).await.unwrap();
}

/// True once the server has closed the socket
async fn is_closed_by_server(socket: &mut Socket) -> bool {
    loop {
        match timeout(FRAME_TIMEOUT, socket.next()).await {
            Err(_) => return false,
            Ok(None) | Ok(Some(Err(_))) | Ok(Some(Ok(Message::Close(_)))) => return true,
            Ok(Some(Ok(_))) => continue,
        }
    }
}

#[tokio::test]
async fn test_end_to_end_join_send_replay_leave() {
    // テスト項目: alice の入室・送信、bob の入室時のリプレイ、alice の退室までの一連の流れ
    // given (前提条件):
    let relay = TestRelay::start().await;

    // when (操作): alice が入室して "hi" を送信
    let mut alice = relay.connect("alice").await;
    assert_eq!(next_text(&mut alice).await, "System: alice has joined the chat.");
    send(&mut alice, "hi").await;

    // then (期待する結果): 送信者にもエコーされ、履歴とログに 1 件ずつ記録される
    let echoed = next_chat(&mut alice).await;
    assert_eq!(echoed.client_id, "alice");
    assert_eq!(echoed.content, "hi");
    assert_eq!(relay.history().await, vec![echoed.clone()]);
    let rows = relay.log_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], "sender,message,time");
    assert_eq!(rows[1], format!("alice,hi,{}", echoed.timestamp));

    // when (操作): bob が入室
    let mut bob = relay.connect("bob").await;

    // then (期待する結果): bob には履歴のリプレイ → 入室のお知らせの順に届く
    assert_eq!(next_chat(&mut bob).await, echoed);
    assert_eq!(next_text(&mut bob).await, "System: bob has joined the chat.");
    assert_eq!(next_text(&mut alice).await, "System: bob has joined the chat.");

    // when (操作): alice が切断
    alice.close(None).await.unwrap();

    // then (期待する結果): bob に退室のお知らせが届く
    assert_eq!(next_text(&mut bob).await, "System: alice has left the chat.");

    bob.close(None).await.unwrap();
}

#[tokio::test]
async fn test_101st_message_trims_history_but_log_keeps_all() {
    // テスト項目: 101 件送信すると履歴は最新 100 件、ログは 101 行すべてを保持する
    // given (前提条件):
    let relay = TestRelay::start().await;
    let mut alice = relay.connect("alice").await;
    next_text(&mut alice).await;

    // when (操作):
    for n in 1..=101 {
        send(&mut alice, &format!("m{}", n)).await;
    }
    for n in 1..=101 {
        assert_eq!(next_chat(&mut alice).await.content, format!("m{}", n));
    }

    // then (期待する結果):
    let history = relay.history().await;
    assert_eq!(history.len(), 100);
    assert_eq!(history[0].content, "m2");
    assert_eq!(history[99].content, "m101");

    let rows = relay.log_rows();
    assert_eq!(rows.len(), 102);
    assert!(rows[1].starts_with("alice,m1,"));
    assert!(rows[101].starts_with("alice,m101,"));

    alice.close(None).await.unwrap();
}

#[tokio::test]
async fn test_rejoin_with_same_id_replaces_previous_connection() {
    // テスト項目: 同じ ID で再入室すると古い接続は閉じられ、新しい接続だけが配送を受ける
    // given (前提条件):
    let relay = TestRelay::start().await;
    let mut alice = relay.connect("alice").await;
    next_text(&mut alice).await;
    let mut old_bob = relay.connect("bob").await;
    next_text(&mut old_bob).await;
    next_text(&mut alice).await;

    // when (操作):
    let mut new_bob = relay.connect("bob").await;

    // then (期待する結果): 古い接続はサーバー側から閉じられる
    assert_eq!(next_text(&mut new_bob).await, "System: bob has joined the chat.");
    assert_eq!(next_text(&mut alice).await, "System: bob has joined the chat.");
    assert!(is_closed_by_server(&mut old_bob).await);

    // 古い接続の終了では退室のお知らせは流れず、新しい接続が引き続き受信する
    tokio::time::sleep(Duration::from_millis(100)).await;
    send(&mut alice, "still there?").await;
    assert_eq!(next_chat(&mut alice).await.content, "still there?");
    assert_eq!(next_chat(&mut new_bob).await.content, "still there?");

    alice.close(None).await.unwrap();
    new_bob.close(None).await.unwrap();
}

#[tokio::test]
async fn test_missing_client_id_is_rejected_before_upgrade() {
    // テスト項目: クライアント ID のないパスへの接続はアップグレード前に 400 で拒否される
    // given (前提条件):
    let relay = TestRelay::start().await;

    for path in ["/ws", "/ws/"] {
        // when (操作):
        let result = connect_async(format!("ws://{}{}", relay.addr, path)).await;

        // then (期待する結果):
        match result {
            Err(WsError::Http(response)) => assert_eq!(response.status().as_u16(), 400),
            other => panic!("expected HTTP 400 for {}, got {:?}", path, other.map(|_| ())),
        }
    }
}

#[tokio::test]
async fn test_receive_error_releases_registration() {
    // テスト項目: プロトコル違反のフレーム（マスクなし）で受信に失敗した接続も登録が解除され、退室が通知される
    // given (前提条件):
    let relay = TestRelay::start().await;
    let mut bob = relay.connect("bob").await;
    next_text(&mut bob).await;

    let mut eve = TcpStream::connect(relay.addr).await.unwrap();
    let request = format!(
        "GET /ws/eve HTTP/1.1\r\n\
         Host: {}\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
         Sec-WebSocket-Version: 13\r\n\r\n",
        relay.addr
    );
    eve.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    let mut byte = [0u8; 1];
    while !response.ends_with(b"\r\n\r\n") {
        timeout(FRAME_TIMEOUT, eve.read_exact(&mut byte))
            .await
            .expect("timed out waiting for the handshake")
            .unwrap();
        response.push(byte[0]);
    }
    assert!(String::from_utf8_lossy(&response).starts_with("HTTP/1.1 101"));
    assert_eq!(next_text(&mut bob).await, "System: eve has joined the chat.");

    // when (操作): クライアントからサーバーへはマスク必須のテキストフレームをマスクなしで送る
    eve.write_all(&[0x81, 0x02, b'h', b'i']).await.unwrap();

    // then (期待する結果): 本文は配送されず、eve の退室が通知される
    assert_eq!(next_text(&mut bob).await, "System: eve has left the chat.");
    assert!(relay.history().await.is_empty());

    // 解除済みなので、同じ ID での再入室は置き換えではなく新規の入室になる
    let mut new_eve = relay.connect("eve").await;
    assert_eq!(next_text(&mut new_eve).await, "System: eve has joined the chat.");
    assert_eq!(next_text(&mut bob).await, "System: eve has joined the chat.");
    send(&mut bob, "welcome back").await;
    assert_eq!(next_chat(&mut new_eve).await.content, "welcome back");
    assert_eq!(next_chat(&mut bob).await.content, "welcome back");

    bob.close(None).await.unwrap();
    new_eve.close(None).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_senders_are_seen_in_one_order() {
    // テスト項目: 同時に送信しても全ての受信者が同じ順序でメッセージを受け取り、履歴とも一致する
    // given (前提条件):
    let relay = TestRelay::start().await;
    let mut alice = relay.connect("alice").await;
    next_text(&mut alice).await;
    let mut bob = relay.connect("bob").await;
    next_text(&mut bob).await;
    next_text(&mut alice).await;

    let (mut alice_tx, mut alice_rx) = alice.split();
    let (mut bob_tx, mut bob_rx) = bob.split();

    // when (操作):
    let alice_sender = tokio::spawn(async move {
        for n in 0..20 {
            alice_tx
                .send(Message::Text(format!("a{}", n).into()))
                .await
                .unwrap();
        }
        alice_tx
    });
    let bob_sender = tokio::spawn(async move {
        for n in 0..20 {
            bob_tx
                .send(Message::Text(format!("b{}", n).into()))
                .await
                .unwrap();
        }
        bob_tx
    });

    async fn collect(
        rx: &mut futures_util::stream::SplitStream<Socket>,
        count: usize,
    ) -> Vec<String> {
        let mut seen = Vec::new();
        while seen.len() < count {
            let frame = timeout(FRAME_TIMEOUT, rx.next())
                .await
                .expect("timed out")
                .expect("stream ended")
                .expect("websocket error");
            if let Message::Text(text) = frame {
                let dto: ChatMessageDto = serde_json::from_str(text.as_str()).unwrap();
                seen.push(dto.content);
            }
        }
        seen
    }

    let alice_seen = collect(&mut alice_rx, 40).await;
    let bob_seen = collect(&mut bob_rx, 40).await;
    let _alice_tx = alice_sender.await.unwrap();
    let _bob_tx = bob_sender.await.unwrap();

    // then (期待する結果):
    assert_eq!(alice_seen, bob_seen);
    let history: Vec<String> = relay
        .history()
        .await
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(history, alice_seen);
}

#[tokio::test]
async fn test_health_check_reports_ok() {
    // テスト項目: ヘルスチェックが ok を返す
    let relay = TestRelay::start().await;

    let health: serde_json::Value = reqwest::get(format!("http://{}/api/health", relay.addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn test_graceful_shutdown_leaves_complete_log() {
    // テスト項目: グレースフルシャットダウン後、ログに全ての行が書き出されている
    // given (前提条件):
    let mut relay = TestRelay::start().await;
    let mut alice = relay.connect("alice").await;
    next_text(&mut alice).await;
    send(&mut alice, "a, \"quoted\" line").await;
    next_chat(&mut alice).await;
    alice.close(None).await.unwrap();

    // when (操作):
    let result = relay.stop().await;

    // then (期待する結果):
    assert!(result.is_ok());
    let content = std::fs::read_to_string(&relay.log_path).unwrap();
    let rows: Vec<&str> = content.split("\r\n").filter(|r| !r.is_empty()).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[1].starts_with("alice,\"a, \"\"quoted\"\" line\","));
}
