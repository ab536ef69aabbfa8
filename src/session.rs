//! Signed-in state, injected into pages and the API client.

use std::sync::RwLock;

/// Capability answering "may we call the API, and with what credentials".
pub trait Session: Send + Sync {
    fn is_signed_in(&self) -> bool;

    /// Bearer token for API requests, if any.
    fn bearer_token(&self) -> Option<String>;
}

/// Explicit session transitions delivered to pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    SignedOut,
}

/// Session backed by an optional API token.
#[derive(Debug, Default)]
pub struct TokenSession {
    token: RwLock<Option<String>>,
}

impl TokenSession {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.filter(|t| !t.trim().is_empty())),
        }
    }

    /// Store a token and report the resulting transition.
    pub fn sign_in(&self, token: impl Into<String>) -> SessionEvent {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.into());
        }
        tracing::info!("session signed in");
        SessionEvent::SignedIn
    }

    pub fn sign_out(&self) -> SessionEvent {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
        tracing::info!("session signed out");
        SessionEvent::SignedOut
    }
}

impl Session for TokenSession {
    fn is_signed_in(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    fn bearer_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_signed_out() {
        assert!(!TokenSession::new(Some("  ".into())).is_signed_in());
        assert!(!TokenSession::new(None).is_signed_in());
    }

    #[test]
    fn test_sign_in_and_out() {
        let session = TokenSession::new(None);
        assert_eq!(session.sign_in("abc"), SessionEvent::SignedIn);
        assert_eq!(session.bearer_token().as_deref(), Some("abc"));
        assert_eq!(session.sign_out(), SessionEvent::SignedOut);
        assert!(!session.is_signed_in());
    }
}
