use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the single slot holding the bearer credential.
pub const CREDENTIAL_KEY: &str = "access_token";

const SERVICE_NAME: &str = "mnada";

/// Single-slot persistence for the bearer credential.
///
/// Absence of a value means the client is anonymous.
pub trait CredentialStore {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, credential: &str) -> Result<()>;
    fn remove(&self) -> Result<()>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for Box<T> {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn save(&self, credential: &str) -> Result<()> {
        (**self).save(credential)
    }

    fn remove(&self) -> Result<()> {
        (**self).remove()
    }
}

/// Which store backs the session, selected in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

/// Stores the credential as a plain file named after the slot.
pub struct FileCredentialStore {
    dir: PathBuf,
    key: String,
}

impl FileCredentialStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            key: CREDENTIAL_KEY.to_string(),
        }
    }

    fn slot_path(&self) -> PathBuf {
        self.dir.join(&self.key)
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<String>> {
        let path = self.slot_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read credential file {}", path.display()))?;
        let credential = contents.trim();
        if credential.is_empty() {
            Ok(None)
        } else {
            Ok(Some(credential.to_string()))
        }
    }

    fn save(&self, credential: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).context("Failed to create credential directory")?;
        std::fs::write(self.slot_path(), credential).context("Failed to write credential file")?;
        debug!(key = %self.key, "Credential saved to file");
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let path = self.slot_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to delete credential file")?;
        }
        Ok(())
    }
}

/// Stores the credential in the OS keychain.
pub struct KeyringCredentialStore {
    key: String,
}

impl KeyringCredentialStore {
    pub fn new() -> Self {
        Self {
            key: CREDENTIAL_KEY.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(SERVICE_NAME, &self.key).context("Failed to create keyring entry")
    }
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(credential) => Ok(Some(credential)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve credential from keychain"),
        }
    }

    fn save(&self, credential: &str) -> Result<()> {
        self.entry()?
            .set_password(credential)
            .context("Failed to store credential in keychain")
    }

    fn remove(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        }
    }
}

/// Keeps the credential for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: &str) -> Self {
        Self {
            slot: Mutex::new(Some(credential.to_string())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.slot
            .lock()
            .map_err(|_| anyhow::anyhow!("Credential slot lock poisoned"))
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, credential: &str) -> Result<()> {
        *self.lock()? = Some(credential.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}
