//! Registry of subscribed remote participants and their latest window records.

use log::{debug, info};
use std::collections::HashMap;

use crate::{window_state::WindowGeometry, Result};

/// Remote peers in subscription order with the last record each one sent
#[derive(Debug, Default, Clone)]
pub struct RemoteParticipants {
    order: Vec<String>,
    latest: HashMap<String, WindowGeometry>,
}

impl RemoteParticipants {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a peer; joining twice is a no-op
    pub fn join(&mut self, peer_id: &str) {
        if self.order.iter().any(|p| p == peer_id) {
            return;
        }
        info!("Participant {peer_id} joined");
        self.order.push(peer_id.to_string());
    }

    /// Unsubscribe from a peer and forget its record
    pub fn leave(&mut self, peer_id: &str) -> bool {
        let before = self.order.len();
        self.order.retain(|p| p != peer_id);
        self.latest.remove(peer_id);
        let removed = self.order.len() != before;
        if removed {
            info!("Participant {peer_id} left");
        }
        removed
    }

    /// Store a record received from a peer
    pub fn receive(&mut self, peer_id: &str, geometry: WindowGeometry) {
        debug!("Received window record from {peer_id}");
        self.latest.insert(peer_id.to_string(), geometry);
    }

    /// Decode and store a data channel payload
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a valid window record; the
    /// previous record for the peer is kept.
    pub fn receive_json(&mut self, peer_id: &str, payload: &str) -> Result<()> {
        let geometry = WindowGeometry::from_json(payload)?;
        self.receive(peer_id, geometry);
        Ok(())
    }

    /// Latest record of a peer, if it has sent one
    #[must_use]
    pub fn get(&self, peer_id: &str) -> Option<&WindowGeometry> {
        self.latest.get(peer_id)
    }

    /// Number of subscribed peers; drives the gallery layout
    #[must_use]
    pub fn count(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Subscribed peers with their latest record, in subscription order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&WindowGeometry>)> + '_ {
        self.order.iter().map(|p| (p.as_str(), self.latest.get(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_leave_count() {
        let mut peers = RemoteParticipants::new();
        assert!(peers.is_empty());
        peers.join("a");
        peers.join("b");
        peers.join("a");
        assert_eq!(peers.count(), 2);

        assert!(peers.leave("a"));
        assert!(!peers.leave("a"));
        assert_eq!(peers.count(), 1);
    }

    #[test]
    fn test_receive_and_order() {
        let mut peers = RemoteParticipants::new();
        peers.join("b");
        peers.join("a");
        peers.receive("a", WindowGeometry::initial(4, 10.0, 10.0));

        let listed: Vec<_> = peers.iter().map(|(id, g)| (id.to_string(), g.map(|g| g.participant_id))).collect();
        assert_eq!(listed, vec![("b".to_string(), None), ("a".to_string(), Some(4))]);
    }

    #[test]
    fn test_bad_payload_keeps_previous() {
        let mut peers = RemoteParticipants::new();
        peers.join("a");
        peers.receive("a", WindowGeometry::initial(9, 1.0, 1.0));
        assert!(peers.receive_json("a", "{broken").is_err());
        assert_eq!(peers.get("a").map(|g| g.participant_id), Some(9));
    }

    #[test]
    fn test_leave_forgets_record() {
        let mut peers = RemoteParticipants::new();
        peers.join("a");
        peers.receive("a", WindowGeometry::default());
        peers.leave("a");
        assert!(peers.get("a").is_none());
    }
}
