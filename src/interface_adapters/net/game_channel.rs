use crate::domain::{ControlKey, Intent};
use crate::interface_adapters::protocol::{ClientMessage, ServerMessage};
use crate::use_cases::{InputEffect, InputTracker, MatchMirror, SessionContext};

use futures_util::{SinkExt, StreamExt};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use url::Url;

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const COMMAND_CHANNEL_CAPACITY: usize = 64;
// Upper bound on the farewell frames sent while closing; closure itself
// never waits on a stalled sink.
const FAREWELL_TIMEOUT: Duration = Duration::from_millis(250);

/// Connection lifecycle of the gameplay channel. There is no reconnection:
/// once `Closed`, the consumer is expected to navigate away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug)]
pub enum ChannelError {
    /// No bearer credential available; the channel never opens.
    MissingCredential,
    /// No room identifier available; the channel never opens.
    MissingRoom,
    /// The configured address could not be parsed into a URL.
    InvalidAddress(url::ParseError),
}

/// Bidirectional message channel to the match server.
///
/// Owns the edge-triggered input tracker and the match mirror writer; key
/// transitions come in through `handle_key_down`/`handle_key_up`, state
/// frames go out to mirror subscribers. Dropping the handle closes the
/// underlying socket.
pub struct GameChannel {
    tracker: InputTracker,
    mirror: MatchMirror,
    local_user_id: Option<String>,
    command_tx: mpsc::Sender<Intent>,
    shutdown_tx: watch::Sender<bool>,
    state_rx: watch::Receiver<ChannelState>,
    last_drop_log: Instant,
}

impl GameChannel {
    /// Opens the channel to `endpoint` for the given room. Requires both the
    /// opaque credential and the room id; when either is absent the failure
    /// is logged and the channel never opens.
    pub fn open(
        endpoint: &str,
        session: &SessionContext,
        room_id: Option<&str>,
        mirror: MatchMirror,
    ) -> Result<GameChannel, ChannelError> {
        let Some(token) = session.token() else {
            warn!("cannot open game channel: missing credential");
            return Err(ChannelError::MissingCredential);
        };
        let room_id = match room_id {
            Some(id) if !id.is_empty() => id,
            _ => {
                warn!("cannot open game channel: missing room id");
                return Err(ChannelError::MissingRoom);
            }
        };

        let mut url = Url::parse(endpoint).map_err(ChannelError::InvalidAddress)?;
        url.query_pairs_mut()
            .append_pair("token", token)
            .append_pair("roomId", room_id);

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(ChannelState::Connecting);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(run_channel(
            url,
            mirror.clone(),
            command_rx,
            state_tx,
            shutdown_rx,
        ));

        Ok(GameChannel {
            tracker: InputTracker::new(),
            mirror,
            local_user_id: session.user_id().map(str::to_string),
            command_tx,
            shutdown_tx,
            state_rx,
            last_drop_log: throttle_epoch(),
        })
    }

    /// Feeds a key press into the tracker and transmits the resulting
    /// intent, or starts the quit sequence for escape.
    pub fn handle_key_down(&mut self, key: ControlKey) {
        self.refresh_eligibility();
        match self.tracker.key_down(key) {
            InputEffect::Transmit(intent) => self.send_intent(intent),
            InputEffect::Quit => self.quit(),
            InputEffect::Ignored => {}
        }
    }

    /// Feeds a key release into the tracker and transmits the resulting
    /// intent.
    pub fn handle_key_up(&mut self, key: ControlKey) {
        self.refresh_eligibility();
        match self.tracker.key_up(key) {
            InputEffect::Transmit(intent) => self.send_intent(intent),
            InputEffect::Quit => self.quit(),
            InputEffect::Ignored => {}
        }
    }

    /// The intent the tracker would transmit right now.
    pub fn current_intent(&self) -> Intent {
        self.tracker.current_intent()
    }

    /// Transmits a complete intent. Best-effort: dropped frames are only
    /// corrected by the next key edge, so nothing is retried here.
    pub fn send_intent(&mut self, intent: Intent) {
        match self.command_tx.try_send(intent) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                if should_log(&mut self.last_drop_log) {
                    warn!("input channel full; dropping intent");
                }
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                if should_log(&mut self.last_drop_log) {
                    debug!("game channel closed; dropping intent");
                }
            }
        }
    }

    /// Closes the channel locally regardless of queue capacity, handshake
    /// progress or sink progress. A best-effort quit frame goes out first
    /// when the socket is open; the consumer observes `Closed` through the
    /// state watch and navigates back to the directory view.
    pub fn quit(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn state(&self) -> ChannelState {
        *self.state_rx.borrow()
    }

    /// Watch subscription for lifecycle transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<ChannelState> {
        self.state_rx.clone()
    }

    /// Resolves once the channel reaches `Closed`.
    pub async fn wait_closed(&self) {
        let mut rx = self.state_rx.clone();
        loop {
            if *rx.borrow_and_update() == ChannelState::Closed {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    pub fn mirror(&self) -> &MatchMirror {
        &self.mirror
    }

    // Re-reads the eligibility gate from the latest snapshot before every
    // key transition: dead players and finished matches produce no control.
    fn refresh_eligibility(&mut self) {
        let snapshot = self.mirror.latest();
        let alive = snapshot
            .local_player(self.local_user_id.as_deref())
            .is_some_and(|p| p.lives > 0);
        self.tracker
            .set_eligibility(alive && !snapshot.is_game_over());
    }
}

async fn run_channel(
    url: Url,
    mirror: MatchMirror,
    mut command_rx: mpsc::Receiver<Intent>,
    state_tx: watch::Sender<ChannelState>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    // The shutdown signal outranks connection establishment: quitting while
    // the handshake hangs must still reach Closed.
    let socket = tokio::select! {
        _ = shutdown_rx.changed() => {
            info!("game channel shut down before connecting");
            let _ = state_tx.send(ChannelState::Closed);
            return;
        }
        result = connect_async(url.as_str()) => match result {
            Ok((socket, _response)) => socket,
            Err(e) => {
                warn!(error = %e, "game channel connect failed");
                let _ = state_tx.send(ChannelState::Closed);
                return;
            }
        },
    };
    let _ = state_tx.send(ChannelState::Open);
    info!("game channel open");

    let (mut sink, mut stream) = socket.split();
    let mut invalid_json: u32 = 0;
    let mut last_invalid_log = throttle_epoch();

    loop {
        let disconnect = tokio::select! {
            result = shutdown_rx.changed() => {
                // Ok means an explicit quit; Err means the handle was
                // dropped. Either way the farewell is best-effort and
                // bounded so a stalled sink cannot block closure.
                let quitting = result.is_ok();
                let _ = tokio::time::timeout(FAREWELL_TIMEOUT, async {
                    if quitting {
                        if let Ok(text) = serde_json::to_string(&ClientMessage::Quit) {
                            let _ = sink.send(Message::Text(text.into())).await;
                        }
                        info!("quit sent; leaving match");
                    }
                    let _ = sink.send(Message::Close(None)).await;
                })
                .await;
                true
            }

            incoming = stream.next() => {
                handle_incoming(incoming, &mirror, &mut invalid_json, &mut last_invalid_log)
            }

            intent = command_rx.recv() => match intent {
                Some(intent) => {
                    let msg = ClientMessage::Input(intent.into());
                    match serde_json::to_string(&msg) {
                        Ok(text) => match sink.send(Message::Text(text.into())).await {
                            Ok(()) => false,
                            Err(e) => {
                                warn!(error = %e, "failed to send input");
                                true
                            }
                        },
                        Err(e) => {
                            warn!(error = %e, "failed to serialize input");
                            false
                        }
                    }
                }
                // Handle dropped: tear the socket down before exiting so no
                // further inbound callbacks run against a dead owner.
                None => {
                    let _ = tokio::time::timeout(
                        FAREWELL_TIMEOUT,
                        sink.send(Message::Close(None)),
                    )
                    .await;
                    true
                }
            },
        };

        if disconnect {
            break;
        }
    }

    let _ = state_tx.send(ChannelState::Closed);
    debug!(invalid_json, "game channel task finished");
}

// Returns true when the connection should be torn down.
fn handle_incoming(
    incoming: Option<Result<Message, tokio_tungstenite::tungstenite::Error>>,
    mirror: &MatchMirror,
    invalid_json: &mut u32,
    last_invalid_log: &mut Instant,
) -> bool {
    match incoming {
        Some(Ok(Message::Text(text))) => {
            match serde_json::from_str::<ServerMessage>(text.as_str()) {
                Ok(ServerMessage::State(snapshot)) => {
                    mirror.apply(snapshot.into());
                }
                Err(e) => {
                    // Malformed frames never alter the mirror.
                    *invalid_json += 1;
                    if should_log(last_invalid_log) {
                        debug!(bytes = text.len(), error = %e, "dropping unparseable frame");
                    }
                }
            }
            false
        }
        Some(Ok(Message::Close(_))) => {
            // No reconnection; the consumer navigates away.
            warn!("game channel closed by server");
            true
        }
        Some(Ok(_)) => false,
        Some(Err(e)) => {
            warn!(error = %e, "game channel receive error");
            true
        }
        None => {
            info!("game channel stream ended");
            true
        }
    }
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

// A starting point old enough that the first occurrence logs. The checked
// subtraction matters early after boot, where the monotonic clock may sit
// within the throttle window of its epoch.
fn throttle_epoch() -> Instant {
    Instant::now()
        .checked_sub(LOG_THROTTLE)
        .unwrap_or_else(Instant::now)
}
