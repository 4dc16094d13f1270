/// Explicitly owned session identity handed to the synchronizers at
/// construction. The token is an opaque bearer credential; this layer never
/// interprets or refreshes it, and nothing here is ambient global state.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    token: Option<String>,
    user_id: Option<String>,
}

impl SessionContext {
    pub fn new(token: Option<String>, user_id: Option<String>) -> Self {
        Self { token, user_id }
    }

    /// The bearer credential, if the excluded auth layer supplied one.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The local player's opaque user id, if known.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}
