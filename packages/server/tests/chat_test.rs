//! Integration tests for the line chat server over real TCP connections.
//!
//! Each test starts an in-process server on an ephemeral port and drives it
//! with plain `TcpStream` clients.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{
        TcpListener, TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::oneshot,
    time::timeout,
};

use irori_server::{
    domain::{MessageBroadcaster, ParticipantRegistry},
    infrastructure::{broadcast::ChannelBroadcaster, registry::InMemoryParticipantRegistry},
    ui::Server,
    usecase::{ConnectParticipantUseCase, DisconnectParticipantUseCase, HandleCommandUseCase},
};

const WAIT: Duration = Duration::from_secs(5);

/// Helper struct to manage an in-process server lifecycle
struct TestServer {
    addr: SocketAddr,
    registry: Arc<InMemoryParticipantRegistry>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a test server on an ephemeral port
    async fn start(idle_timeout: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let registry = Arc::new(InMemoryParticipantRegistry::new());
        let (broadcaster, _handle) = ChannelBroadcaster::spawn(registry.clone(), 64);
        let broadcaster: Arc<dyn MessageBroadcaster> = Arc::new(broadcaster);
        let server = Server::new(
            Arc::new(ConnectParticipantUseCase::new(
                registry.clone(),
                broadcaster.clone(),
            )),
            Arc::new(DisconnectParticipantUseCase::new(
                registry.clone(),
                broadcaster.clone(),
            )),
            Arc::new(HandleCommandUseCase::new(registry.clone(), broadcaster)),
            idle_timeout,
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        TestServer {
            addr,
            registry,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Connect a client and consume its own join notice
    async fn join(&self) -> TestClient {
        let stream = TcpStream::connect(self.addr).await.unwrap();
        let address = stream.local_addr().unwrap().to_string();
        let (reader, writer) = stream.into_split();
        let mut client = TestClient {
            address,
            lines: BufReader::new(reader).lines(),
            writer,
        };
        let joined = client.next().await.unwrap();
        assert_eq!(joined, format!("[{0}]{0}:已上线", client.address));
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Helper struct for one TCP chat client
struct TestClient {
    /// Local address, which is also the initial name
    address: String,
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .unwrap();
    }

    /// Next line from the server, `None` once the server closed the connection
    async fn next(&mut self) -> Option<String> {
        timeout(WAIT, self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap()
    }

    async fn rename(&mut self, name: &str) {
        self.send(&format!("rename|{name}")).await;
        let ack = self.next().await.unwrap();
        assert!(ack.contains(name), "unexpected rename reply: {ack}");
    }
}

/// Alice, Bob, Carol の 3 人が接続・改名した状態を作る
async fn three_participants(server: &TestServer) -> (TestClient, TestClient, TestClient) {
    let mut alice = server.join().await;
    let mut bob = server.join().await;
    assert_eq!(alice.next().await.unwrap(), format!("[{0}]{0}:已上线", bob.address));
    let mut carol = server.join().await;
    for client in [&mut alice, &mut bob] {
        assert_eq!(
            client.next().await.unwrap(),
            format!("[{0}]{0}:已上线", carol.address)
        );
    }
    alice.rename("Alice").await;
    bob.rename("Bob").await;
    carol.rename("Carol").await;
    (alice, bob, carol)
}

#[tokio::test]
async fn test_broadcast_reaches_every_participant() {
    // テスト項目: 通常のメッセージは送信者を含む全員に届く
    // given (前提条件):
    let server = TestServer::start(Duration::from_secs(60)).await;
    let mut alice = server.join().await;
    let mut bob = server.join().await;
    assert_eq!(alice.next().await.unwrap(), format!("[{0}]{0}:已上线", bob.address));

    // when (操作):
    alice.send("hello").await;

    // then (期待する結果):
    let expected = format!("[{0}]{0}:hello", alice.address);
    assert_eq!(alice.next().await.unwrap(), expected);
    assert_eq!(bob.next().await.unwrap(), expected);
}

#[tokio::test]
async fn test_broadcasts_keep_order_per_receiver() {
    // テスト項目: 同じ受信者には publish 順に届く
    // given (前提条件):
    let server = TestServer::start(Duration::from_secs(60)).await;
    let mut alice = server.join().await;
    let mut bob = server.join().await;
    assert_eq!(alice.next().await.unwrap(), format!("[{0}]{0}:已上线", bob.address));

    // when (操作):
    for i in 0..20 {
        alice.send(&format!("message {i}")).await;
    }

    // then (期待する結果):
    for i in 0..20 {
        let expected = format!("[{}]{}:message {}", alice.address, alice.address, i);
        assert_eq!(bob.next().await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_who_lists_three_participants() {
    // テスト項目: 3 人オンラインで who を送ると、送信者にだけ 3 行が返る
    // given (前提条件):
    let server = TestServer::start(Duration::from_secs(60)).await;
    let (mut alice, mut bob, carol) = three_participants(&server).await;

    // when (操作):
    alice.send("who").await;

    // then (期待する結果):
    assert_eq!(
        alice.next().await.unwrap(),
        format!("[{}]Alice:在线...", alice.address)
    );
    assert_eq!(
        alice.next().await.unwrap(),
        format!("[{}]Bob:在线...", bob.address)
    );
    assert_eq!(
        alice.next().await.unwrap(),
        format!("[{}]Carol:在线...", carol.address)
    );

    // bob には何も届いていない（次の行は自分の who の結果）
    bob.send("who").await;
    assert_eq!(
        bob.next().await.unwrap(),
        format!("[{}]Alice:在线...", alice.address)
    );
}

#[tokio::test]
async fn test_private_message_reaches_only_target() {
    // テスト項目: to|Bob|hello は Bob だけに届き、送信者へのエコーはない
    // given (前提条件):
    let server = TestServer::start(Duration::from_secs(60)).await;
    let (mut alice, mut bob, mut carol) = three_participants(&server).await;

    // when (操作):
    alice.send("to|Bob|hello").await;

    // then (期待する結果):
    assert_eq!(bob.next().await.unwrap(), "Alice对您说：hello");

    // alice と carol の次の行は、それぞれの who の結果
    for client in [&mut alice, &mut carol] {
        client.send("who").await;
        assert!(client.next().await.unwrap().ends_with("Alice:在线..."));
    }
}

#[tokio::test]
async fn test_private_message_to_unknown_target() {
    // テスト項目: 存在しない宛先への個別メッセージは送信者に通知される
    // given (前提条件):
    let server = TestServer::start(Duration::from_secs(60)).await;
    let mut alice = server.join().await;

    // when (操作):
    alice.send("to|Ghost|hi").await;

    // then (期待する結果):
    assert_eq!(alice.next().await.unwrap(), "该用户名不存在");
}

#[tokio::test]
async fn test_rename_conflict_leaves_names_unchanged() {
    // テスト項目: 使用中の名前への改名は拒否され、両方の名前が変わらない
    // given (前提条件):
    let server = TestServer::start(Duration::from_secs(60)).await;
    let (mut alice, bob, carol) = three_participants(&server).await;

    // when (操作):
    alice.send("rename|Bob").await;

    // then (期待する結果):
    assert_eq!(alice.next().await.unwrap(), "当前用户名被使用");
    alice.send("who").await;
    let listed = vec![
        alice.next().await.unwrap(),
        alice.next().await.unwrap(),
        alice.next().await.unwrap(),
    ];
    assert_eq!(
        listed,
        vec![
            format!("[{}]Alice:在线...", alice.address),
            format!("[{}]Bob:在线...", bob.address),
            format!("[{}]Carol:在线...", carol.address),
        ]
    );
}

#[tokio::test]
async fn test_disconnect_announces_leave_and_unregisters() {
    // テスト項目: 切断した参加者は Registry から削除され、退出通知が届く
    // given (前提条件):
    let server = TestServer::start(Duration::from_secs(60)).await;
    let mut alice = server.join().await;
    let bob = server.join().await;
    assert_eq!(alice.next().await.unwrap(), format!("[{0}]{0}:已上线", bob.address));
    let bob_address = bob.address.clone();

    // when (操作):
    drop(bob);

    // then (期待する結果):
    assert_eq!(
        alice.next().await.unwrap(),
        format!("[{0}]{0}:已下线", bob_address)
    );
    assert_eq!(server.registry.count().await, 1);
}

#[tokio::test]
async fn test_idle_client_is_evicted() {
    // テスト項目: 無発言の接続はタイムアウト通知の後に切断され、Registry から削除される
    // given (前提条件):
    let server = TestServer::start(Duration::from_millis(300)).await;
    let mut sleeper = server.join().await;

    // when (操作):
    let notice = sleeper.next().await;
    let end = sleeper.next().await;

    // then (期待する結果):
    assert_eq!(notice.as_deref(), Some("你因超时未发言被提出聊天室"));
    assert_eq!(end, None);
    timeout(WAIT, async {
        while server.registry.count().await > 0 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("participant was not unregistered");
}
