//! Email-keyed waiting lobby for the request/response matchmaking transport.
//!
//! [`PollingLobby`] is independent of the socket broker: participants poll
//! `join` until they are matched and receive an opaque room name for an
//! external session service. Entries are keyed by email, so one user can
//! never be matched with itself.

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::EmailDomain;
use crate::error::BrokerError;

/// One email waiting in the lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyEntry {
    /// Waiting email.
    pub email: String,
    /// Time of the most recent `join` for this email.
    pub joined_at: DateTime<Utc>,
}

/// Result of a lobby `join`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyOutcome {
    /// No partner yet; the caller stays in the lobby.
    Waiting,
    /// Both parties were removed from the lobby.
    Matched {
        /// Generated room name shared by both parties.
        room_name: String,
        /// The partner's email.
        partner_email: String,
    },
}

/// Insertion-ordered, email-keyed lobby.
///
/// All operations take the inner lock once, so a join's upsert, scan and
/// removal happen atomically.
#[derive(Debug)]
pub struct PollingLobby {
    entries: Mutex<Vec<LobbyEntry>>,
    domain: EmailDomain,
}

impl PollingLobby {
    /// Creates an empty lobby admitting emails of `domain`.
    #[must_use]
    pub fn new(domain: EmailDomain) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            domain,
        }
    }

    /// Adds or refreshes `email`, then matches it with the longest-waiting
    /// other email.
    ///
    /// A re-join keeps the entry's original position and refreshes its
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::InvalidEmail`] if `email` is outside the domain.
    pub async fn join(&self, email: &str) -> Result<LobbyOutcome, BrokerError> {
        self.validate(email)?;
        let mut entries = self.entries.lock().await;

        let now = Utc::now();
        match entries.iter_mut().find(|e| e.email == email) {
            Some(existing) => existing.joined_at = now,
            None => entries.push(LobbyEntry {
                email: email.to_string(),
                joined_at: now,
            }),
        }

        let Some(partner_email) = entries
            .iter()
            .find(|e| e.email != email)
            .map(|e| e.email.clone())
        else {
            return Ok(LobbyOutcome::Waiting);
        };

        entries.retain(|e| e.email != email && e.email != partner_email);
        let room_name = generate_room_name();
        tracing::info!(%room_name, "lobby match");
        Ok(LobbyOutcome::Matched {
            room_name,
            partner_email,
        })
    }

    /// Removes `email` from the lobby. Returns `true` if it was waiting.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::InvalidEmail`] if `email` is outside the domain.
    pub async fn leave(&self, email: &str) -> Result<bool, BrokerError> {
        self.validate(email)?;
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| e.email != email);
        Ok(entries.len() != before)
    }

    /// Returns the waiting entries in insertion order.
    pub async fn snapshot(&self) -> Vec<LobbyEntry> {
        self.entries.lock().await.clone()
    }

    /// Number of waiting emails.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Returns `true` if nobody is waiting.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Returns `true` if `email` belongs to the admission domain.
    #[must_use]
    pub fn accepts(&self, email: &str) -> bool {
        self.domain.accepts(email)
    }

    fn validate(&self, email: &str) -> Result<(), BrokerError> {
        if self.accepts(email) {
            Ok(())
        } else {
            Err(BrokerError::InvalidEmail(email.to_string()))
        }
    }
}

/// `room-` followed by nine lowercase alphanumerics.
fn generate_room_name() -> String {
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("room-{suffix}")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn lobby() -> PollingLobby {
        let Ok(domain) = EmailDomain::new("vitbhopal.ac.in") else {
            panic!("valid domain");
        };
        PollingLobby::new(domain)
    }

    #[tokio::test]
    async fn first_join_waits() {
        let lobby = lobby();
        let outcome = lobby.join("a@vitbhopal.ac.in").await;
        assert_eq!(outcome.ok(), Some(LobbyOutcome::Waiting));
        assert_eq!(lobby.len().await, 1);
    }

    #[tokio::test]
    async fn second_join_matches_and_empties() {
        let lobby = lobby();
        let _ = lobby.join("a@vitbhopal.ac.in").await;
        let Ok(LobbyOutcome::Matched {
            room_name,
            partner_email,
        }) = lobby.join("b@vitbhopal.ac.in").await
        else {
            panic!("expected a match");
        };
        assert_eq!(partner_email, "a@vitbhopal.ac.in");
        assert!(room_name.starts_with("room-"));
        assert_eq!(room_name.len(), "room-".len() + 9);
        assert!(lobby.is_empty().await);
    }

    #[tokio::test]
    async fn rejoin_does_not_self_match() {
        let lobby = lobby();
        let _ = lobby.join("a@vitbhopal.ac.in").await;
        let outcome = lobby.join("a@vitbhopal.ac.in").await;
        assert_eq!(outcome.ok(), Some(LobbyOutcome::Waiting));
        assert_eq!(lobby.len().await, 1);
    }

    #[tokio::test]
    async fn matches_longest_waiting_first() {
        let lobby = lobby();
        let _ = lobby.join("a@vitbhopal.ac.in").await;
        // A re-join refreshes the timestamp but keeps A at the front.
        let _ = lobby.join("a@vitbhopal.ac.in").await;
        let Ok(LobbyOutcome::Matched { partner_email, .. }) = lobby.join("c@vitbhopal.ac.in").await
        else {
            panic!("expected a match");
        };
        assert_eq!(partner_email, "a@vitbhopal.ac.in");
    }

    #[tokio::test]
    async fn leave_removes_entry() {
        let lobby = lobby();
        let _ = lobby.join("a@vitbhopal.ac.in").await;
        assert_eq!(lobby.leave("a@vitbhopal.ac.in").await.ok(), Some(true));
        assert_eq!(lobby.leave("a@vitbhopal.ac.in").await.ok(), Some(false));
        assert!(lobby.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn rejects_foreign_email() {
        let lobby = lobby();
        let result = lobby.join("a@gmail.com").await;
        assert!(matches!(result, Err(BrokerError::InvalidEmail(_))));
        assert!(lobby.is_empty().await);
        assert!(lobby.leave("a@gmail.com").await.is_err());
    }
}
