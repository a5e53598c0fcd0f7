//! Single writer for the shared configuration record

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::{PersistenceBackend, PersistenceError};
use crate::alerts::{AlertStateStore, ValidatorAlertState};
use crate::config::HalfLifeConfig;

pub const CONFIG_KEY: &str = "config.toml";
pub const ALERT_STATE_KEY: &str = "alert-state.json";

/// Owns write access to the backend.
///
/// Every validator task saves through the same coordinator; the lock is held
/// for serialization and write together so saves never interleave. A failed
/// save leaves the caller's in-memory state untouched, and the next save
/// writes the latest state again.
pub struct PersistenceCoordinator {
    backend: Arc<dyn PersistenceBackend>,
    config_key: String,
    state_key: String,
    write_lock: Mutex<()>,
}

impl PersistenceCoordinator {
    pub fn new(backend: Arc<dyn PersistenceBackend>) -> Self {
        Self {
            backend,
            config_key: CONFIG_KEY.to_string(),
            state_key: ALERT_STATE_KEY.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store the configuration under another key (e.g. an existing file name)
    pub fn with_config_key(mut self, key: impl Into<String>) -> Self {
        self.config_key = key.into();
        self
    }

    pub fn with_state_key(mut self, key: impl Into<String>) -> Self {
        self.state_key = key.into();
        self
    }

    pub fn save_config(&self, config: &HalfLifeConfig) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock();

        let text = config
            .to_toml_string()
            .map_err(|e| encode_error(&self.config_key, e))?;
        self.backend.write(&self.config_key, text.as_bytes())
    }

    pub fn load_config(&self) -> Result<Option<HalfLifeConfig>, PersistenceError> {
        let Some(data) = self.backend.read(&self.config_key)? else {
            return Ok(None);
        };

        let text = String::from_utf8(data).map_err(|e| decode_error(&self.config_key, e))?;
        HalfLifeConfig::from_toml_str(&text)
            .map(Some)
            .map_err(|e| decode_error(&self.config_key, e))
    }

    /// Snapshot and write every validator's alert state.
    ///
    /// The snapshot is taken under the write lock, so a save never replaces
    /// a newer snapshot with an older one.
    pub fn save_alert_states(&self, store: &AlertStateStore) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock();

        let states = store.snapshot();
        let ordered: BTreeMap<&String, &ValidatorAlertState> = states.iter().collect();
        let data = serde_json::to_vec_pretty(&ordered).map_err(|e| encode_error(&self.state_key, e))?;
        self.backend.write(&self.state_key, &data)
    }

    /// Previously saved alert states, empty when none were saved
    pub fn load_alert_states(&self) -> Result<HashMap<String, ValidatorAlertState>, PersistenceError> {
        match self.backend.read(&self.state_key)? {
            Some(data) => serde_json::from_slice(&data).map_err(|e| decode_error(&self.state_key, e)),
            None => Ok(HashMap::new()),
        }
    }
}

fn encode_error(key: &str, e: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::Encode {
        key: key.to_string(),
        reason: e.to_string(),
    }
}

fn decode_error(key: &str, e: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::Decode {
        key: key.to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorMonitor;
    use crate::data::AlertType;
    use crate::persistence::{FileBackend, MemoryBackend};
    use tempfile::TempDir;

    fn sample_config() -> HalfLifeConfig {
        HalfLifeConfig {
            validators: vec![ValidatorMonitor {
                name: "val".to_string(),
                rpc: "http://localhost:26657".to_string(),
                discord_status_message_id: Some("99".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_config_roundtrip_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path()).unwrap();
        let coordinator = PersistenceCoordinator::new(Arc::new(backend.clone()));

        assert!(coordinator.load_config().unwrap().is_none());

        coordinator.save_config(&sample_config()).unwrap();
        let text = std::fs::read_to_string(backend.key_path(CONFIG_KEY)).unwrap();
        assert!(text.contains("discord-status-message-id = \"99\""));

        assert_eq!(coordinator.load_config().unwrap(), Some(sample_config()));
    }

    #[test]
    fn test_alert_states_roundtrip() {
        let backend = Arc::new(MemoryBackend::new());
        let coordinator = PersistenceCoordinator::new(backend.clone());
        assert!(coordinator.load_alert_states().unwrap().is_empty());

        let mut state = ValidatorAlertState::default();
        state.alert_type_counts.insert(AlertType::Halt, 4);
        let store = AlertStateStore::new();
        store.replace("val", state.clone());

        coordinator.save_alert_states(&store).unwrap();
        let loaded = coordinator.load_alert_states().unwrap();
        assert_eq!(loaded.get("val"), Some(&state));
        assert!(backend.get(ALERT_STATE_KEY).is_some());
    }

    #[test]
    fn test_failed_write_is_reported_and_next_save_succeeds() {
        let backend = Arc::new(MemoryBackend::new());
        let coordinator = PersistenceCoordinator::new(backend.clone()).with_config_key("halflife.toml");

        backend.set_fail_writes(true);
        assert!(matches!(
            coordinator.save_config(&sample_config()),
            Err(PersistenceError::Io(_))
        ));
        assert!(coordinator.load_config().unwrap().is_none());

        backend.set_fail_writes(false);
        coordinator.save_config(&sample_config()).unwrap();
        assert!(backend.get("halflife.toml").is_some());
    }

    #[test]
    fn test_corrupt_config_is_a_decode_error() {
        let backend = Arc::new(MemoryBackend::new());
        backend.write(CONFIG_KEY, b"validators = 7").unwrap();
        let coordinator = PersistenceCoordinator::new(backend);

        assert!(matches!(
            coordinator.load_config(),
            Err(PersistenceError::Decode { ref key, .. }) if key == CONFIG_KEY
        ));
    }

    #[test]
    fn test_concurrent_saves_do_not_interleave() {
        let backend = Arc::new(MemoryBackend::new());
        let coordinator = Arc::new(PersistenceCoordinator::new(backend.clone()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let coordinator = Arc::clone(&coordinator);
                std::thread::spawn(move || {
                    let mut config = sample_config();
                    config.validators[0].name = format!("val-{}", i);
                    for _ in 0..25 {
                        coordinator.save_config(&config).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(backend.write_count(), 200);
        let config = coordinator.load_config().unwrap().unwrap();
        assert!(config.validators[0].name.starts_with("val-"));
    }
}
