//! Named clients ("Alice", "Bob", ...) exchanging messages through the backend.

use log::debug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("no client named {0}")]
    UnknownClient(String),
    #[error("a client named {0} already exists")]
    DuplicateClient(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord<K> {
    pub name: String,
    pub key_pair: Option<K>,
    pub plaintext: String,
    pub ciphertext: String,
    pub signature: String,
    /// Outcome of the last verification, `None` until one ran.
    pub signature_valid: Option<bool>,
}

impl<K> ClientRecord<K> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            key_pair: None,
            plaintext: String::new(),
            ciphertext: String::new(),
            signature: String::new(),
            signature_valid: None,
        }
    }
}

/// Clients in registration order.
#[derive(Debug, Clone)]
pub struct ClientRegistry<K> {
    clients: Vec<ClientRecord<K>>,
}

impl<K> Default for ClientRegistry<K> {
    fn default() -> Self {
        Self { clients: vec![] }
    }
}

impl<K> ClientRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clients(names: &[&str]) -> Result<Self, StateError> {
        let mut registry = Self::new();
        for name in names {
            registry.register(name)?;
        }
        Ok(registry)
    }

    fn position(&self, name: &str) -> Result<usize, StateError> {
        self.clients
            .iter()
            .position(|client| client.name == name)
            .ok_or_else(|| StateError::UnknownClient(name.to_string()))
    }

    pub fn register(&mut self, name: &str) -> Result<&mut ClientRecord<K>, StateError> {
        if self.clients.iter().any(|client| client.name == name) {
            return Err(StateError::DuplicateClient(name.to_string()));
        }
        self.clients.push(ClientRecord::new(name));
        let last = self.clients.len() - 1;
        Ok(&mut self.clients[last])
    }

    pub fn get(&self, name: &str) -> Result<&ClientRecord<K>, StateError> {
        let index = self.position(name)?;
        Ok(&self.clients[index])
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut ClientRecord<K>, StateError> {
        let index = self.position(name)?;
        Ok(&mut self.clients[index])
    }

    pub fn remove(&mut self, name: &str) -> Result<ClientRecord<K>, StateError> {
        let index = self.position(name)?;
        Ok(self.clients.remove(index))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clients.iter().map(|client| client.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Hands the sender's ciphertext and signature to the receiver. The receiver's
    /// plaintext and verification result belong to the previous message and are reset.
    pub fn send(&mut self, from: &str, to: &str) -> Result<(), StateError> {
        let sender = self.position(from)?;
        let receiver = self.position(to)?;
        let ciphertext = self.clients[sender].ciphertext.clone();
        let signature = self.clients[sender].signature.clone();

        let receiver = &mut self.clients[receiver];
        receiver.ciphertext = ciphertext;
        receiver.signature = signature;
        receiver.plaintext.clear();
        receiver.signature_valid = None;
        debug!("{} sent a message to {}", from, to);
        Ok(())
    }
}
