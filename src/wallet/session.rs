use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};

use super::WalletSession;

/// Sessions older than this are discarded on load
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// Single-record JSON store for the connected wallet session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    max_age: Duration,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            path: path.into(),
            max_age,
        }
    }

    /// Store at the platform data directory, e.g. ~/.local/share/kinetifi/session.json
    pub fn open_default(max_age_days: u32) -> Result<Self> {
        Ok(Self::new(
            Self::default_path()?,
            Duration::days(i64::from(max_age_days)),
        ))
    }

    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?
            .join("kinetifi");
        Ok(data_dir.join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session. Corrupt or expired records are removed.
    pub fn load(&self, now: DateTime<Utc>) -> Option<WalletSession> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read session file: {}", e);
                return None;
            }
        };

        let session: WalletSession = match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Discarding unreadable session: {}", e);
                let _ = self.clear();
                return None;
            }
        };

        // A timestamp too far in the past to subtract counts as expired
        let age_ms = now
            .timestamp_millis()
            .checked_sub(session.connected_at)
            .unwrap_or(i64::MAX);
        if age_ms >= self.max_age.num_milliseconds() {
            tracing::info!(
                "Discarding session for {} ({} days old)",
                session.short_address(),
                age_ms / Duration::days(1).num_milliseconds()
            );
            let _ = self.clear();
            return None;
        }

        Some(session)
    }

    pub fn save(&self, session: &WalletSession) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create {}", dir.display()))?;
        }
        let content = serde_json::to_string(session)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Could not write {}", self.path.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Could not remove {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{ChainId, WalletType};

    fn store(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(
            dir.path().join("session.json"),
            Duration::days(DEFAULT_MAX_AGE_DAYS),
        )
    }

    fn session_at(connected_at: DateTime<Utc>) -> WalletSession {
        WalletSession {
            address: WalletType::Coinbase.mock().address.to_string(),
            wallet_type: WalletType::Coinbase,
            chain_id: ChainId::Base,
            connected_at: connected_at.timestamp_millis(),
            ens_name: Some("defi-chad.eth".to_string()),
        }
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(&dir).load(Utc::now()).is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let now = Utc::now();
        let session = session_at(now - Duration::days(2));

        store.save(&session).unwrap();
        assert_eq!(store.load(now), Some(session));
    }

    #[test]
    fn test_expired_session_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let now = Utc::now();

        store.save(&session_at(now - Duration::days(8))).unwrap();
        assert!(store.load(now).is_none());
        assert!(!store.path().exists(), "expired session should be removed");
    }

    #[test]
    fn test_session_at_exact_max_age_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let now = Utc::now();

        store.save(&session_at(now - Duration::days(7))).unwrap();
        assert!(store.load(now).is_none());
    }

    #[test]
    fn test_minimum_timestamp_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let mut session = session_at(Utc::now());
        session.connected_at = i64::MIN;

        store.save(&session).unwrap();
        assert!(store.load(Utc::now()).is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_unlisted_chain_restores_on_ethereum() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let now = Utc::now();
        let record = format!(
            r#"{{"address":"0x1","walletType":"coinbase","chainId":56,"connectedAt":{}}}"#,
            now.timestamp_millis()
        );
        std::fs::write(store.path(), record).unwrap();

        let session = store.load(now).unwrap();
        assert_eq!(session.chain_id, ChainId::Ethereum);
        assert_eq!(session.chain_id.info().name, "Ethereum");
    }

    #[test]
    fn test_corrupt_session_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(store.load(Utc::now()).is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.save(&session_at(Utc::now())).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load(Utc::now()).is_none());
    }
}
