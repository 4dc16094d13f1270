mod support;

use game_client::domain::ControlKey;
use game_client::interface_adapters::net::{ChannelState, GameChannel};
use game_client::use_cases::MatchMirror;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

async fn wait_open(channel: &GameChannel) {
    let mut rx = channel.subscribe_state();
    timeout(Duration::from_secs(5), async {
        loop {
            match *rx.borrow_and_update() {
                ChannelState::Open => return,
                ChannelState::Closed => panic!("channel closed before opening"),
                ChannelState::Connecting => {}
            }
            rx.changed().await.expect("state watch should stay alive");
        }
    })
    .await
    .expect("timed out waiting for the channel to open");
}

async fn recv_frame(rx: &mut mpsc::UnboundedReceiver<String>) -> serde_json::Value {
    let text = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a client frame")
        .expect("stub server should stay alive");
    serde_json::from_str(&text).expect("client frames are json")
}

fn state_frame(payload: serde_json::Value) -> String {
    json!({ "type": "state", "payload": payload }).to_string()
}

fn alive_player_payload() -> serde_json::Value {
    json!({
        "players": [{"userId": "u1", "username": "one", "x": 10.0, "y": 550.0, "lives": 3}],
        "level": 2
    })
}

#[tokio::test]
async fn when_state_frames_arrive_then_the_mirror_is_replaced_wholesale() {
    let stub = support::spawn_game_server().await;
    let mirror = MatchMirror::new();
    let channel = GameChannel::open(
        &stub.ws_url(),
        &support::test_session(),
        Some("r1"),
        mirror.clone(),
    )
    .expect("channel should open");
    wait_open(&channel).await;
    let mut snapshots = mirror.subscribe();

    stub.script_tx
        .send(state_frame(json!({
            "players": [{"userId": "u1", "username": "one", "lives": 3}],
            "ufo": {"x": 100.0, "y": 30.0},
            "level": 2
        })))
        .expect("script send");
    timeout(Duration::from_secs(2), snapshots.changed())
        .await
        .expect("snapshot should arrive")
        .expect("mirror alive");
    {
        let snapshot = snapshots.borrow_and_update();
        assert_eq!(snapshot.players.len(), 1);
        assert!(snapshot.ufo.is_some());
        assert_eq!(snapshot.level, 2);
    }

    // The next snapshot omits players and ufo: replaced, not merged.
    stub.script_tx
        .send(state_frame(json!({ "level": 3 })))
        .expect("script send");
    timeout(Duration::from_secs(2), snapshots.changed())
        .await
        .expect("snapshot should arrive")
        .expect("mirror alive");
    let snapshot = snapshots.borrow_and_update();
    assert!(snapshot.players.is_empty());
    assert!(snapshot.ufo.is_none());
    assert_eq!(snapshot.level, 3);
}

#[tokio::test]
async fn when_malformed_frames_arrive_then_the_prior_snapshot_is_unchanged() {
    let stub = support::spawn_game_server().await;
    let mirror = MatchMirror::new();
    let channel = GameChannel::open(
        &stub.ws_url(),
        &support::test_session(),
        Some("r1"),
        mirror.clone(),
    )
    .expect("channel should open");
    wait_open(&channel).await;
    let mut snapshots = mirror.subscribe();

    stub.script_tx
        .send(state_frame(json!({ "level": 2 })))
        .expect("script send");
    timeout(Duration::from_secs(2), snapshots.changed())
        .await
        .expect("snapshot should arrive")
        .expect("mirror alive");
    snapshots.borrow_and_update();

    for bad in ["not json", r#"{"payload": {}}"#, r#"{"type": "scores"}"#] {
        stub.script_tx.send(bad.to_string()).expect("script send");
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(!snapshots.has_changed().expect("mirror alive"));
    assert_eq!(mirror.latest().level, 2);
}

#[tokio::test]
async fn when_key_edges_occur_then_each_edge_sends_exactly_one_intent_frame() {
    let mut stub = support::spawn_game_server().await;
    let mirror = MatchMirror::new();
    let mut channel = GameChannel::open(
        &stub.ws_url(),
        &support::test_session(),
        Some("r1"),
        mirror.clone(),
    )
    .expect("channel should open");
    wait_open(&channel).await;

    let mut snapshots = mirror.subscribe();
    stub.script_tx
        .send(state_frame(alive_player_payload()))
        .expect("script send");
    timeout(Duration::from_secs(2), snapshots.changed())
        .await
        .expect("snapshot should arrive")
        .expect("mirror alive");

    channel.handle_key_down(ControlKey::Left);
    let frame = recv_frame(&mut stub.inbound_rx).await;
    assert_eq!(frame["type"], "input");
    assert_eq!(frame["payload"]["left"], true);
    assert_eq!(frame["payload"]["fire"], false);

    channel.handle_key_down(ControlKey::Fire);
    let frame = recv_frame(&mut stub.inbound_rx).await;
    assert_eq!(frame["payload"]["left"], true);
    assert_eq!(frame["payload"]["fire"], true);

    channel.handle_key_up(ControlKey::Left);
    let frame = recv_frame(&mut stub.inbound_rx).await;
    assert_eq!(frame["payload"]["left"], false);
    assert_eq!(frame["payload"]["fire"], true);

    // Three edges, three frames, nothing extra.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(stub.inbound_rx.try_recv().is_err());
}

#[tokio::test]
async fn when_the_local_player_is_dead_then_intent_frames_are_all_false() {
    let mut stub = support::spawn_game_server().await;
    let mirror = MatchMirror::new();
    let mut channel = GameChannel::open(
        &stub.ws_url(),
        &support::test_session(),
        Some("r1"),
        mirror.clone(),
    )
    .expect("channel should open");
    wait_open(&channel).await;

    let mut snapshots = mirror.subscribe();
    // u1 is out of lives while u2 keeps the match running.
    stub.script_tx
        .send(state_frame(json!({
            "players": [
                {"userId": "u1", "username": "one", "lives": 0},
                {"userId": "u2", "username": "two", "lives": 3}
            ]
        })))
        .expect("script send");
    timeout(Duration::from_secs(2), snapshots.changed())
        .await
        .expect("snapshot should arrive")
        .expect("mirror alive");

    channel.handle_key_down(ControlKey::Left);
    let frame = recv_frame(&mut stub.inbound_rx).await;
    assert_eq!(frame["type"], "input");
    assert_eq!(frame["payload"]["left"], false);
    assert_eq!(frame["payload"]["right"], false);
    assert_eq!(frame["payload"]["fire"], false);
}

#[tokio::test]
async fn when_the_match_is_over_then_intent_frames_are_all_false() {
    let mut stub = support::spawn_game_server().await;
    let mirror = MatchMirror::new();
    let mut channel = GameChannel::open(
        &stub.ws_url(),
        &support::test_session(),
        Some("r1"),
        mirror.clone(),
    )
    .expect("channel should open");
    wait_open(&channel).await;

    let mut snapshots = mirror.subscribe();
    stub.script_tx
        .send(state_frame(json!({
            "players": [{"userId": "u1", "username": "one", "lives": 3}],
            "gameOver": true
        })))
        .expect("script send");
    timeout(Duration::from_secs(2), snapshots.changed())
        .await
        .expect("snapshot should arrive")
        .expect("mirror alive");

    channel.handle_key_down(ControlKey::Fire);
    let frame = recv_frame(&mut stub.inbound_rx).await;
    assert_eq!(frame["payload"]["fire"], false);
}

#[tokio::test]
async fn when_quit_is_requested_then_a_quit_frame_is_sent_and_the_channel_closes() {
    let mut stub = support::spawn_game_server().await;
    let mirror = MatchMirror::new();
    let channel = GameChannel::open(
        &stub.ws_url(),
        &support::test_session(),
        Some("r1"),
        mirror.clone(),
    )
    .expect("channel should open");
    wait_open(&channel).await;

    channel.quit();
    let frame = recv_frame(&mut stub.inbound_rx).await;
    assert_eq!(frame["type"], "quit");

    timeout(Duration::from_secs(5), channel.wait_closed())
        .await
        .expect("channel should close after quit");
    assert_eq!(channel.state(), ChannelState::Closed);
}

#[tokio::test]
async fn when_quit_is_requested_while_the_handshake_hangs_then_the_channel_still_closes() {
    // Accepts the TCP connection but never answers the upgrade request, so
    // the channel stays in Connecting.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let mirror = MatchMirror::new();
    let mut channel = GameChannel::open(
        &format!("ws://{addr}/ws/space-invaders"),
        &support::test_session(),
        Some("r1"),
        mirror.clone(),
    )
    .expect("channel should open");

    // Far more key edges than the command queue holds; none of them may
    // get in the way of leaving.
    for _ in 0..80 {
        channel.handle_key_down(ControlKey::Fire);
    }
    channel.quit();

    timeout(Duration::from_secs(2), channel.wait_closed())
        .await
        .expect("quit must close the channel even before the socket opens");
    assert_eq!(channel.state(), ChannelState::Closed);
}

#[tokio::test]
async fn when_the_server_closes_then_the_channel_closes_without_reconnecting() {
    let stub = support::spawn_game_server().await;
    let mirror = MatchMirror::new();
    let channel = GameChannel::open(
        &stub.ws_url(),
        &support::test_session(),
        Some("r1"),
        mirror.clone(),
    )
    .expect("channel should open");
    wait_open(&channel).await;

    stub.script_tx
        .send("__close__".to_string())
        .expect("script send");
    timeout(Duration::from_secs(5), channel.wait_closed())
        .await
        .expect("channel should observe the server close");

    // No reconnection is attempted; the state stays closed.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(channel.state(), ChannelState::Closed);
}
