// Headless demo client: bootstraps the room directory, follows the live
// feed, and (when ROOM_ID is set) joins a match and logs snapshots until
// the channel closes.

use game_client::frameworks::config;
use game_client::init_runtime;
use game_client::interface_adapters::clients::DirectoryClient;
use game_client::interface_adapters::net::{DirectoryFeed, GameChannel};
use game_client::use_cases::{MatchMirror, RetryPolicy, RoomDirectory, SessionContext};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_runtime();

    let session = SessionContext::new(
        std::env::var("SESSION_TOKEN").ok(),
        std::env::var("USER_ID").ok(),
    );

    let directory = RoomDirectory::new();
    bootstrap_directory(&session, &directory).await;

    let feed = match DirectoryFeed::spawn(
        &config::directory_stream_url(),
        &session,
        directory.clone(),
        RetryPolicy::fixed(config::directory_retry_interval()),
    ) {
        Ok(feed) => Some(feed),
        Err(e) => {
            error!(error = ?e, "directory feed unavailable");
            None
        }
    };

    let mut rooms_rx = directory.subscribe();
    tokio::spawn(async move {
        while rooms_rx.changed().await.is_ok() {
            let count = rooms_rx.borrow_and_update().len();
            info!(rooms = count, "directory updated");
        }
    });

    if let Ok(room_id) = std::env::var("ROOM_ID") {
        run_match(&session, &room_id).await;
    } else {
        info!("watching directory; press ctrl-c to exit");
        let _ = tokio::signal::ctrl_c().await;
    }

    // Teardown order: transports first, then pending timers go with them.
    if let Some(feed) = feed {
        feed.close();
    }
    info!("shutting down");
}

async fn bootstrap_directory(session: &SessionContext, directory: &RoomDirectory) {
    let client = match DirectoryClient::new(
        config::api_base_url(),
        config::http_timeout(),
        session.clone(),
    ) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build directory client");
            return;
        }
    };

    match client.list_rooms().await {
        Ok(rooms) => {
            info!(rooms = rooms.len(), "room directory loaded");
            directory.replace_all(rooms);
        }
        // The mirror stays in its prior (empty) state.
        Err(e) => error!(error = ?e, "cannot load rooms"),
    }
}

async fn run_match(session: &SessionContext, room_id: &str) {
    let mirror = MatchMirror::new();
    let channel = match GameChannel::open(
        &config::game_ws_url(),
        session,
        Some(room_id),
        mirror.clone(),
    ) {
        Ok(channel) => channel,
        Err(e) => {
            error!(error = ?e, "cannot join room");
            return;
        }
    };

    let mut snapshot_rx = mirror.subscribe();
    tokio::spawn(async move {
        while snapshot_rx.changed().await.is_ok() {
            let snapshot = snapshot_rx.borrow_and_update().clone();
            info!(
                players = snapshot.players.len(),
                invaders = snapshot.invaders.len(),
                level = snapshot.level,
                game_over = snapshot.is_game_over(),
                "state"
            );
        }
    });

    tokio::select! {
        _ = channel.wait_closed() => info!("match channel closed; back to directory view"),
        _ = tokio::signal::ctrl_c() => channel.quit(),
    }
}
