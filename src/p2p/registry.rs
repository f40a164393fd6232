//! Peer registry
//!
//! A deduplicated set of peer network locations. Addresses arrive as
//! full URLs or bare `host:port` strings; only the network location
//! survives registration (scheme, path, and query are discarded).

use std::collections::BTreeSet;
use thiserror::Error;
use url::Url;

/// Registration input errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("cannot derive a network location from {0:?}")]
    Unparseable(String),
}

/// Deduplicated set of peer network locations
#[derive(Debug, Default)]
pub struct NodeRegistry {
    peers: BTreeSet<String>,
}

impl NodeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer address. Duplicate registration is a no-op.
    pub fn register(&mut self, address: &str) -> Result<(), AddressError> {
        let location = network_location(address)?;
        self.peers.insert(location);
        Ok(())
    }

    /// Snapshot of all registered locations, in sorted order
    pub fn peers(&self) -> Vec<String> {
        self.peers.iter().cloned().collect()
    }

    /// Number of registered peers
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

/// Extract `host:port` from an address, tolerating a missing scheme.
///
/// A bare `127.0.0.1:5001` fails strict URL parsing (or parses with the
/// host swallowed into the scheme), so parsing is retried with an
/// `http://` prefix before giving up.
fn network_location(address: &str) -> Result<String, AddressError> {
    let parsed = Url::parse(address)
        .ok()
        .filter(|url| url.host_str().is_some())
        .or_else(|| Url::parse(&format!("http://{address}")).ok())
        .ok_or_else(|| AddressError::Unparseable(address.to_string()))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| AddressError::Unparseable(address.to_string()))?;

    Ok(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_full_url() {
        let mut registry = NodeRegistry::new();
        registry.register("http://127.0.0.1:5001/x?q=1").unwrap();
        assert_eq!(registry.peers(), vec!["127.0.0.1:5001"]);
    }

    #[test]
    fn test_register_bare_host_port() {
        let mut registry = NodeRegistry::new();
        registry.register("127.0.0.1:5001").unwrap();
        assert_eq!(registry.peers(), vec!["127.0.0.1:5001"]);
    }

    #[test]
    fn test_scheme_and_path_do_not_duplicate() {
        let mut registry = NodeRegistry::new();
        registry.register("http://127.0.0.1:5001/x").unwrap();
        registry.register("127.0.0.1:5001").unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_hostname_without_port() {
        let mut registry = NodeRegistry::new();
        registry.register("http://node-a.internal").unwrap();
        assert_eq!(registry.peers(), vec!["node-a.internal"]);
    }

    #[test]
    fn test_bare_hostname_with_port() {
        // "localhost" alone is a syntactically valid scheme; the retry
        // with an http:// prefix must recover the real host.
        let mut registry = NodeRegistry::new();
        registry.register("localhost:5002").unwrap();
        assert_eq!(registry.peers(), vec!["localhost:5002"]);
    }

    #[test]
    fn test_unparseable_address_rejected() {
        let mut registry = NodeRegistry::new();
        let err = registry.register("").unwrap_err();
        assert_eq!(err, AddressError::Unparseable(String::new()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_distinct_ports_are_distinct_peers() {
        let mut registry = NodeRegistry::new();
        registry.register("http://127.0.0.1:5001").unwrap();
        registry.register("http://127.0.0.1:5002").unwrap();
        assert_eq!(registry.len(), 2);
    }
}
