//! Best-effort "tournament changed" notifications.

use crate::models::TournamentId;
use tokio::sync::broadcast;

/// Buffered events per observer before it starts lagging.
const CHANNEL_CAPACITY: usize = 64;

/// Event carrying nothing but which tournament changed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TournamentChanged {
    pub tournament_id: TournamentId,
}

/// Fans change events out to zero or more observers.
///
/// Sending never blocks and never fails the caller: with no observers the event is
/// dropped, and a slow observer skips the events it lagged behind on.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<TournamentChanged>,
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TournamentChanged> {
        self.sender.subscribe()
    }

    pub fn notify(&self, tournament_id: &str) {
        let event = TournamentChanged {
            tournament_id: tournament_id.to_string(),
        };
        if self.sender.send(event).is_err() {
            log::debug!("{}: change not delivered, no observers", tournament_id);
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
