//! Connection registry for the session.
//!
//! Owns the association between transport connections and player ids in
//! both directions, plus the outbound channel of each connection. The
//! association only changes through `register` and `unregister`.

use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

pub type ConnectionId = u64;

/// Outbound text frames for one connection.
pub type Outbound = mpsc::UnboundedSender<Arc<str>>;

#[derive(Debug)]
pub struct Client {
    pub id: ConnectionId,
    pub player_id: String,
    sender: Outbound,
}

impl Client {
    /// Queues a frame for the connection's writer task.
    ///
    /// Fails only once the writer has gone away.
    pub fn send(&self, payload: Arc<str>) -> bool {
        self.sender.send(payload).is_ok()
    }
}

pub struct ClientManager {
    clients: HashMap<ConnectionId, Client>,
    by_player: HashMap<String, ConnectionId>,
    next_connection_id: ConnectionId,
}

impl ClientManager {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            by_player: HashMap::new(),
            next_connection_id: 1,
        }
    }

    pub fn register(&mut self, player_id: String, sender: Outbound) -> ConnectionId {
        let id = self.next_connection_id;
        self.next_connection_id += 1;

        info!("Connection {} bound to {}", id, player_id);
        self.by_player.insert(player_id.clone(), id);
        self.clients.insert(
            id,
            Client {
                id,
                player_id,
                sender,
            },
        );
        id
    }

    /// Drops the connection and returns the player it was bound to.
    pub fn unregister(&mut self, connection: ConnectionId) -> Option<String> {
        let client = self.clients.remove(&connection)?;
        self.by_player.remove(&client.player_id);
        Some(client.player_id)
    }

    pub fn player_for(&self, connection: ConnectionId) -> Option<&str> {
        self.clients
            .get(&connection)
            .map(|client| client.player_id.as_str())
    }

    pub fn connection_for(&self, player_id: &str) -> Option<ConnectionId> {
        self.by_player.get(player_id).copied()
    }

    /// Best-effort delivery; a failure is logged and affects no other client.
    pub fn send_to(&self, connection: ConnectionId, payload: Arc<str>) -> bool {
        match self.clients.get(&connection) {
            Some(client) => {
                let delivered = client.send(payload);
                if !delivered {
                    warn!(
                        "Dropping message for connection {} ({}): writer closed",
                        connection, client.player_id
                    );
                }
                delivered
            }
            None => false,
        }
    }

    /// Connection ids in ascending (connect) order.
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self.clients.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl Default for ClientManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_increasing_ids() {
        let mut manager = ClientManager::new();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        let c1 = manager.register("player_0".to_string(), tx1);
        let c2 = manager.register("player_1".to_string(), tx2);

        assert_eq!(c1, 1);
        assert_eq!(c2, 2);
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.connection_ids(), vec![1, 2]);
    }

    #[test]
    fn test_bidirectional_lookup() {
        let mut manager = ClientManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let connection = manager.register("player_0".to_string(), tx);

        assert_eq!(manager.player_for(connection), Some("player_0"));
        assert_eq!(manager.connection_for("player_0"), Some(connection));

        assert_eq!(manager.unregister(connection).as_deref(), Some("player_0"));
        assert_eq!(manager.player_for(connection), None);
        assert_eq!(manager.connection_for("player_0"), None);
        assert!(manager.unregister(connection).is_none());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_send_failure_is_isolated() {
        let mut manager = ClientManager::new();
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let c1 = manager.register("player_0".to_string(), tx1);
        let c2 = manager.register("player_1".to_string(), tx2);

        drop(rx1);
        let payload: Arc<str> = Arc::from("hello");

        assert!(!manager.send_to(c1, payload.clone()));
        assert!(manager.send_to(c2, payload));
        assert_eq!(rx2.try_recv().unwrap().as_ref(), "hello");
    }

    #[test]
    fn test_send_to_unknown_connection() {
        let manager = ClientManager::new();
        assert!(!manager.send_to(99, Arc::from("x")));
    }
}
