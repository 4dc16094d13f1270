use crate::domain::Room;
use crate::interface_adapters::protocol::RoomDto;
use crate::use_cases::SessionContext;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug)]
pub enum DirectoryError {
    /// The excluded auth layer supplied no credential.
    MissingCredential,
    /// The server rejected the credential.
    Unauthorized,
    /// Request failed or the upstream answered with an unexpected status.
    Upstream,
    /// The response body did not match the room shape.
    InvalidBody,
}

#[derive(Debug, Serialize)]
struct CreateRoomRequest<'a> {
    name: &'a str,
}

/// Thin reqwest client for the room directory: one-shot bootstrap plus the
/// room management calls the lobby view issues. Failures are reported to the
/// caller; nothing here synthesizes fallback data.
#[derive(Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl DirectoryClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: SessionContext,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            session,
        })
    }

    fn token(&self) -> Result<&str, DirectoryError> {
        self.session.token().ok_or(DirectoryError::MissingCredential)
    }

    /// Fetches the full current room list, normalized into the Room shape.
    pub async fn list_rooms(&self) -> Result<Vec<Room>, DirectoryError> {
        let token = self.token()?;
        let url = format!("{}/rooms", self.base_url);
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|_| DirectoryError::Upstream)?;

        let response = check_status(response)?;
        let rooms = response
            .json::<Vec<RoomDto>>()
            .await
            .map_err(|_| DirectoryError::InvalidBody)?;
        Ok(rooms.into_iter().map(Room::from).collect())
    }

    /// Creates a room and returns the server's view of it.
    pub async fn create_room(&self, name: &str) -> Result<Room, DirectoryError> {
        let token = self.token()?;
        let url = format!("{}/rooms", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&CreateRoomRequest { name })
            .send()
            .await
            .map_err(|_| DirectoryError::Upstream)?;

        let response = check_status(response)?;
        let room = response
            .json::<RoomDto>()
            .await
            .map_err(|_| DirectoryError::InvalidBody)?;
        Ok(room.into())
    }

    /// Claims a seat in the room; the caller then opens the game channel.
    pub async fn join_room(&self, room_id: &str) -> Result<(), DirectoryError> {
        let token = self.token()?;
        let url = format!("{}/rooms/{room_id}/join", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|_| DirectoryError::Upstream)?;
        check_status(response).map(|_| ())
    }

    /// Deletes a room. The mirror is updated by the resulting feed event,
    /// not by this call.
    pub async fn delete_room(&self, room_id: &str) -> Result<(), DirectoryError> {
        let token = self.token()?;
        let url = format!("{}/rooms/{room_id}/delete", self.base_url);
        let response = self
            .http
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|_| DirectoryError::Upstream)?;
        check_status(response).map(|_| ())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DirectoryError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(DirectoryError::Unauthorized),
        _ => Err(DirectoryError::Upstream),
    }
}
