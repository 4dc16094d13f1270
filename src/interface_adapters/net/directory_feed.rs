use crate::interface_adapters::net::sse::SseDecoder;
use crate::interface_adapters::protocol::decode_directory_event;
use crate::use_cases::{RetryPolicy, RoomDirectory, SessionContext};

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug)]
pub enum FeedError {
    /// No bearer credential available; the feed never opens.
    MissingCredential,
    /// The configured address could not be parsed into a URL.
    InvalidAddress(url::ParseError),
    /// The subscription request could not be sent.
    Request,
    /// The server refused the subscription.
    BadStatus(reqwest::StatusCode),
    /// The event stream broke mid-read.
    Stream,
}

/// Unidirectional push feed for the room directory.
///
/// Each subscription streams named events into the directory mirror. On any
/// transport failure the feed closes itself and re-subscribes from scratch
/// after the retry policy's fixed delay, indefinitely; there is no resume.
/// The handle owns the task: `close` (or dropping the handle) releases it.
pub struct DirectoryFeed {
    shutdown_tx: watch::Sender<bool>,
}

impl DirectoryFeed {
    pub fn spawn(
        endpoint: &str,
        session: &SessionContext,
        directory: RoomDirectory,
        retry: RetryPolicy,
    ) -> Result<DirectoryFeed, FeedError> {
        let Some(token) = session.token() else {
            warn!("cannot open directory feed: missing credential");
            return Err(FeedError::MissingCredential);
        };

        let mut url = Url::parse(endpoint).map_err(FeedError::InvalidAddress)?;
        url.query_pairs_mut().append_pair("token", token);

        // No overall request timeout: the stream is expected to stay open
        // across long idle periods.
        let http = reqwest::Client::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(run_feed(http, url, directory, retry, shutdown_rx));

        Ok(DirectoryFeed { shutdown_tx })
    }

    /// Stops the feed, including any pending reconnection timer.
    pub fn close(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

async fn run_feed(
    http: reqwest::Client,
    url: Url,
    directory: RoomDirectory,
    retry: RetryPolicy,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        tokio::select! {
            // Fires on close() and when the handle is dropped.
            _ = shutdown_rx.changed() => break,
            result = subscribe_once(&http, &url, &directory) => match result {
                Ok(()) => info!(attempt, "directory feed ended; scheduling reconnect"),
                Err(e) => warn!(attempt, error = ?e, "directory feed failed; scheduling reconnect"),
            }
        }

        // Fresh subscription after the fixed delay; no resume, no backoff.
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            _ = retry.wait(attempt) => {}
        }
    }
    debug!("directory feed task finished");
}

async fn subscribe_once(
    http: &reqwest::Client,
    url: &Url,
    directory: &RoomDirectory,
) -> Result<(), FeedError> {
    let response = http
        .get(url.clone())
        .header(ACCEPT, "text/event-stream")
        .send()
        .await
        .map_err(|_| FeedError::Request)?;
    if !response.status().is_success() {
        return Err(FeedError::BadStatus(response.status()));
    }
    info!("directory feed subscribed");

    let mut decoder = SseDecoder::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|_| FeedError::Stream)?;
        for event in decoder.feed(&chunk) {
            match decode_directory_event(&event.name, &event.data) {
                Some(room_event) => directory.apply(room_event),
                // hello, keep-alives and malformed payloads are dropped.
                None => debug!(event = %event.name, "ignoring directory event"),
            }
        }
    }

    // A cleanly ended stream still means the push channel is gone.
    Ok(())
}
