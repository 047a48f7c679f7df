//! Shared-secret verification for build requests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

/// Storage for identity to secret mappings.
pub trait SecretStore: Send + Sync {
    fn get(&self, identity: &str) -> Option<String>;

    /// Store `secret` unless the identity already has one, returning the
    /// secret in effect afterwards. Must be atomic per identity.
    fn register_if_absent(&self, identity: &str, secret: &str) -> String;
}

/// Process-local secret store.
#[derive(Default)]
pub struct InMemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secrets(secrets: HashMap<String, String>) -> Self {
        Self {
            secrets: RwLock::new(secrets),
        }
    }

    pub fn len(&self) -> usize {
        self.secrets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.read().is_empty()
    }
}

impl SecretStore for InMemorySecretStore {
    fn get(&self, identity: &str) -> Option<String> {
        self.secrets.read().get(identity).cloned()
    }

    fn register_if_absent(&self, identity: &str, secret: &str) -> String {
        self.secrets
            .write()
            .entry(identity.to_string())
            .or_insert_with(|| secret.to_string())
            .clone()
    }
}

/// Checks presented secrets against a [`SecretStore`].
///
/// Unknown identities are rejected unless the verifier is permissive, in
/// which case the presented secret is registered and later requests must
/// repeat it.
#[derive(Clone)]
pub struct SecretVerifier {
    store: Arc<dyn SecretStore>,
    permissive: bool,
}

impl SecretVerifier {
    pub fn new(store: Arc<dyn SecretStore>, permissive: bool) -> Self {
        Self { store, permissive }
    }

    pub fn is_permissive(&self) -> bool {
        self.permissive
    }

    pub fn verify(&self, identity: &str, presented: &str) -> bool {
        match self.store.get(identity) {
            Some(expected) => expected == presented,
            None if self.permissive => {
                let stored = self.store.register_if_absent(identity, presented);
                if stored != presented {
                    debug!(identity, "Lost registration race to a different secret, rejecting");
                    return false;
                }
                warn!(identity, "No secret registered, accepted and remembered presented secret");
                true
            }
            None => {
                debug!(identity, "No secret registered, rejecting");
                false
            }
        }
    }
}
