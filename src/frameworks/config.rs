use std::{env, time::Duration};

// Transport addresses and timing constants (supplied by the environment,
// produced by the excluded auth/navigation layer in a full deployment).

pub fn api_base_url() -> String {
    env::var("API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080/api".to_string())
}

pub fn game_ws_url() -> String {
    env::var("GAME_WS_URL").unwrap_or_else(|_| "ws://127.0.0.1:8080/ws/space-invaders".to_string())
}

pub fn directory_stream_url() -> String {
    format!("{}/rooms/stream", api_base_url())
}

pub fn http_timeout() -> Duration {
    let millis = env::var("HTTP_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(5000);
    Duration::from_millis(millis)
}

// Fixed delay between directory feed reconnection attempts.
pub fn directory_retry_interval() -> Duration {
    let millis = env::var("DIRECTORY_RETRY_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(2000);
    Duration::from_millis(millis)
}
