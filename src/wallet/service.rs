use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

use super::{
    ChainId, ChainInfo, ConnectStep, ConnectionStatus, SessionStore, WalletError, WalletSession,
    WalletType,
};
use crate::config::SimulationConfig;

/// Progress and outcomes reported by the simulation tasks
#[derive(Debug, Clone, PartialEq)]
pub enum WalletEvent {
    Step(ConnectStep),
    Connected(WalletSession),
    Failed(WalletError),
    ChainSwitched(ChainId),
}

/// Owns the wallet session and drives the simulated connect flow.
///
/// Long-running operations run on spawned tasks and report back over a
/// channel; state only changes when the owner calls [`poll`](Self::poll) or
/// [`settle`](Self::settle), so there is a single writer.
pub struct WalletService {
    status: ConnectionStatus,
    session: Option<WalletSession>,
    balance: String,
    error: Option<String>,

    // Connect modal
    modal_open: bool,
    selected_wallet: Option<WalletType>,
    step: ConnectStep,

    // Re-entrancy guards
    connecting: bool,
    switching: bool,

    sim: SimulationConfig,
    store: SessionStore,
    rng: StdRng,
    events_tx: mpsc::UnboundedSender<WalletEvent>,
    events_rx: mpsc::UnboundedReceiver<WalletEvent>,
}

impl WalletService {
    pub fn new(sim: SimulationConfig, store: SessionStore) -> Self {
        let rng = match sim.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            status: ConnectionStatus::Disconnected,
            session: None,
            balance: "0".to_string(),
            error: None,
            modal_open: false,
            selected_wallet: None,
            step: ConnectStep::Detect,
            connecting: false,
            switching: false,
            sim,
            store,
            rng,
            events_tx,
            events_rx,
        }
    }

    /// Pick up a persisted session if one exists and has not expired
    pub fn restore(&mut self, now: DateTime<Utc>) -> bool {
        match self.store.load(now) {
            Some(session) => {
                tracing::info!("Restored wallet session for {}", session.display_name());
                self.balance = session.wallet_type.mock().balance.to_string();
                self.session = Some(session);
                self.status = ConnectionStatus::Connected;
                true
            }
            None => false,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn session(&self) -> Option<&WalletSession> {
        self.session.as_ref()
    }

    pub fn balance(&self) -> &str {
        &self.balance
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected && self.session.is_some()
    }

    pub fn is_switching(&self) -> bool {
        self.switching
    }

    /// Active chain of the connected session
    pub fn chain(&self) -> Option<&'static ChainInfo> {
        self.session.as_ref().map(|s| s.chain_id.info())
    }

    pub fn short_address(&self) -> String {
        self.session
            .as_ref()
            .map(|s| s.short_address())
            .unwrap_or_default()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn selected_wallet(&self) -> Option<WalletType> {
        self.selected_wallet
    }

    pub fn step(&self) -> ConnectStep {
        self.step
    }

    /// Start a simulated connect. Returns `AlreadyConnecting` while one is in flight.
    pub fn connect(&mut self, wallet_type: WalletType) -> Result<(), WalletError> {
        if self.connecting {
            return Err(WalletError::AlreadyConnecting);
        }
        self.connecting = true;
        self.error = None;
        self.status = ConnectionStatus::Connecting;
        self.step = ConnectStep::Detect;

        // Connecting again replaces the current wallet
        if self.session.take().is_some() {
            self.balance = "0".to_string();
            if let Err(e) = self.store.clear() {
                tracing::warn!("Failed to clear previous session: {}", e);
            }
        }

        let jitter = if self.sim.approve_jitter_ms > 0 {
            self.rng.random_range(0..self.sim.approve_jitter_ms)
        } else {
            0
        };
        let reject = self.rng.random::<f64>() < self.sim.failure_rate;
        let plan = ConnectPlan {
            detect: self.sim.detect_delay(),
            approve: Duration::from_millis(self.sim.approve_ms + jitter),
            sign: self.sim.sign_delay(),
            reject,
        };

        tracing::info!("Connecting {} wallet", wallet_type.label());
        tokio::spawn(simulate_connect(wallet_type, plan, self.events_tx.clone()));
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if self.connecting {
            tracing::debug!("Ignoring disconnect while a connect is in flight");
            return;
        }
        if let Some(session) = self.session.take() {
            tracing::info!("Disconnected {}", session.display_name());
        }
        self.balance = "0".to_string();
        self.status = ConnectionStatus::Disconnected;
        self.error = None;
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to remove session: {}", e);
        }
    }

    /// Start a simulated chain switch for the current session
    pub fn switch_chain(&mut self, chain_id: ChainId) -> Result<(), WalletError> {
        if self.session.is_none() {
            return Err(WalletError::NotConnected);
        }
        if self.switching {
            return Ok(());
        }
        self.switching = true;

        let delay = self.sim.switch_chain_delay();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(WalletEvent::ChainSwitched(chain_id));
        });
        Ok(())
    }

    pub fn open_connect_modal(&mut self) {
        self.error = None;
        if self.status == ConnectionStatus::Error {
            self.status = ConnectionStatus::Disconnected;
        }
        self.modal_open = true;
    }

    /// Close the connect modal. Refused while a connect is in flight.
    pub fn close_connect_modal(&mut self) -> bool {
        if self.status == ConnectionStatus::Connecting {
            return false;
        }
        self.modal_open = false;
        self.error = None;
        if self.status == ConnectionStatus::Error {
            self.status = ConnectionStatus::Disconnected;
        }
        self.selected_wallet = None;
        self.step = ConnectStep::Detect;
        true
    }

    pub fn select_wallet(&mut self, wallet_type: WalletType) -> Result<(), WalletError> {
        self.selected_wallet = Some(wallet_type);
        self.connect(wallet_type)
    }

    /// Re-run the connect for the wallet picked last
    pub fn retry(&mut self) -> Result<(), WalletError> {
        match self.selected_wallet {
            Some(wallet_type) => self.connect(wallet_type),
            None => Ok(()),
        }
    }

    /// Return the modal to the wallet list
    pub fn back(&mut self) {
        if self.connecting {
            return;
        }
        self.selected_wallet = None;
        self.step = ConnectStep::Detect;
    }

    /// Apply every event reported so far. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait until no connect or chain switch is in flight
    pub async fn settle(&mut self) {
        while self.connecting || self.switching {
            match self.events_rx.recv().await {
                Some(event) => self.apply(event),
                None => break,
            }
        }
    }

    fn apply(&mut self, event: WalletEvent) {
        match event {
            WalletEvent::Step(step) => {
                if self.connecting {
                    self.step = step;
                }
            }
            WalletEvent::Connected(session) => {
                self.connecting = false;
                tracing::info!(
                    "Connected {} as {}",
                    session.wallet_type.label(),
                    session.display_name()
                );
                self.balance = session.wallet_type.mock().balance.to_string();
                self.session = Some(session);
                self.status = ConnectionStatus::Connected;
                self.step = ConnectStep::Done;
                self.persist();
            }
            WalletEvent::Failed(err) => {
                self.connecting = false;
                tracing::warn!("Wallet connection failed: {}", err);
                self.error = Some(err.to_string());
                self.status = ConnectionStatus::Error;
            }
            WalletEvent::ChainSwitched(chain_id) => {
                self.switching = false;
                if let Some(session) = self.session.as_mut() {
                    session.chain_id = chain_id;
                    tracing::info!("Switched to {}", chain_id.info().name);
                    self.persist();
                }
            }
        }
    }

    fn persist(&self) {
        if self.status != ConnectionStatus::Connected {
            return;
        }
        if let Some(session) = &self.session {
            if let Err(e) = self.store.save(session) {
                tracing::warn!("Failed to persist session: {}", e);
            }
        }
    }
}

/// Delays and outcome decided up front for one connect attempt
#[derive(Debug, Clone, Copy)]
struct ConnectPlan {
    detect: Duration,
    approve: Duration,
    sign: Duration,
    reject: bool,
}

async fn simulate_connect(
    wallet_type: WalletType,
    plan: ConnectPlan,
    tx: mpsc::UnboundedSender<WalletEvent>,
) {
    sleep(plan.detect).await;
    let _ = tx.send(WalletEvent::Step(ConnectStep::Approve));

    sleep(plan.approve).await;
    if plan.reject {
        let _ = tx.send(WalletEvent::Failed(WalletError::Rejected));
        return;
    }
    let _ = tx.send(WalletEvent::Step(ConnectStep::Sign));

    sleep(plan.sign).await;
    let mock = wallet_type.mock();
    let session = WalletSession {
        address: mock.address.to_string(),
        wallet_type,
        chain_id: ChainId::Ethereum,
        connected_at: Utc::now().timestamp_millis(),
        ens_name: mock.ens_name.map(String::from),
    };
    let _ = tx.send(WalletEvent::Connected(session));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn service(dir: &tempfile::TempDir, sim: SimulationConfig) -> WalletService {
        let store = SessionStore::new(dir.path().join("session.json"), ChronoDuration::days(7));
        WalletService::new(sim, store)
    }

    fn failing() -> SimulationConfig {
        SimulationConfig {
            failure_rate: 1.0,
            ..SimulationConfig::instant()
        }
    }

    #[tokio::test]
    async fn test_connect_success() {
        let dir = tempfile::tempdir().unwrap();
        let mut wallet = service(&dir, SimulationConfig::instant());
        assert_eq!(wallet.status(), ConnectionStatus::Disconnected);

        wallet.connect(WalletType::Metamask).unwrap();
        assert_eq!(wallet.status(), ConnectionStatus::Connecting);
        assert!(!wallet.is_connected());

        wallet.settle().await;
        assert_eq!(wallet.status(), ConnectionStatus::Connected);
        assert!(wallet.is_connected());
        assert_eq!(wallet.step(), ConnectStep::Done);
        assert_eq!(wallet.balance(), "17.5642");
        assert_eq!(wallet.short_address(), "0x71C4...8eC4");
        assert_eq!(wallet.chain().map(|c| c.name), Some("Ethereum"));

        let session = wallet.session().unwrap();
        assert_eq!(session.ens_name.as_deref(), Some("kinetifi.eth"));
        assert_eq!(session.chain_id, ChainId::Ethereum);
    }

    #[tokio::test]
    async fn test_connect_persists_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut wallet = service(&dir, SimulationConfig::instant());
        wallet.connect(WalletType::Coinbase).unwrap();
        wallet.settle().await;

        let mut restored = service(&dir, SimulationConfig::instant());
        assert!(restored.restore(Utc::now()));
        assert_eq!(restored.status(), ConnectionStatus::Connected);
        assert_eq!(restored.session(), wallet.session());
        assert_eq!(restored.balance(), "24.1205");
    }

    #[tokio::test]
    async fn test_connect_failure_sets_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut wallet = service(&dir, failing());

        wallet.connect(WalletType::Walletconnect).unwrap();
        wallet.settle().await;

        assert_eq!(wallet.status(), ConnectionStatus::Error);
        assert_eq!(wallet.error(), Some("User rejected the connection request."));
        assert!(wallet.session().is_none());
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_connect_is_not_reentrant() {
        let dir = tempfile::tempdir().unwrap();
        let mut wallet = service(&dir, SimulationConfig::instant());

        wallet.connect(WalletType::Metamask).unwrap();
        assert_eq!(
            wallet.connect(WalletType::Coinbase),
            Err(WalletError::AlreadyConnecting)
        );

        wallet.settle().await;
        assert_eq!(wallet.session().unwrap().wallet_type, WalletType::Metamask);
        // Guard released once the attempt finished
        assert!(wallet.connect(WalletType::Coinbase).is_ok());
        wallet.settle().await;
        assert_eq!(wallet.session().unwrap().wallet_type, WalletType::Coinbase);
    }

    #[tokio::test]
    async fn test_error_resets_on_modal_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut wallet = service(&dir, failing());
        wallet.open_connect_modal();
        wallet.select_wallet(WalletType::Metamask).unwrap();
        wallet.settle().await;
        assert_eq!(wallet.status(), ConnectionStatus::Error);

        assert!(wallet.close_connect_modal());
        assert_eq!(wallet.status(), ConnectionStatus::Disconnected);
        assert!(wallet.error().is_none());

        wallet.connect(WalletType::Metamask).unwrap();
        wallet.settle().await;
        wallet.open_connect_modal();
        assert_eq!(wallet.status(), ConnectionStatus::Disconnected);
        assert!(wallet.is_modal_open());
    }

    #[tokio::test]
    async fn test_modal_cannot_close_while_connecting() {
        let dir = tempfile::tempdir().unwrap();
        let mut wallet = service(&dir, SimulationConfig::instant());
        wallet.open_connect_modal();
        wallet.select_wallet(WalletType::Coinbase).unwrap();

        assert!(!wallet.close_connect_modal());
        assert!(wallet.is_modal_open());

        wallet.settle().await;
        // Modal stays open after connecting until dismissed
        assert!(wallet.is_modal_open());
        assert!(wallet.close_connect_modal());
        assert!(!wallet.is_modal_open());
        assert!(wallet.selected_wallet().is_none());
    }

    #[tokio::test]
    async fn test_retry_uses_selected_wallet() {
        let dir = tempfile::tempdir().unwrap();
        let mut wallet = service(&dir, failing());
        wallet.select_wallet(WalletType::Coinbase).unwrap();
        wallet.settle().await;
        assert_eq!(wallet.status(), ConnectionStatus::Error);

        wallet.sim.failure_rate = 0.0;
        wallet.retry().unwrap();
        assert_eq!(wallet.status(), ConnectionStatus::Connecting);
        assert!(wallet.error().is_none());
        wallet.settle().await;
        assert_eq!(wallet.session().unwrap().wallet_type, WalletType::Coinbase);

        wallet.back();
        assert!(wallet.selected_wallet().is_none());
        assert_eq!(wallet.step(), ConnectStep::Detect);
    }

    #[tokio::test]
    async fn test_disconnect_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut wallet = service(&dir, SimulationConfig::instant());
        wallet.connect(WalletType::Metamask).unwrap();
        wallet.settle().await;
        assert!(dir.path().join("session.json").exists());

        wallet.disconnect();
        assert_eq!(wallet.status(), ConnectionStatus::Disconnected);
        assert!(wallet.session().is_none());
        assert_eq!(wallet.balance(), "0");
        assert_eq!(wallet.short_address(), "");
        assert!(wallet.chain().is_none());
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_switch_chain() {
        let dir = tempfile::tempdir().unwrap();
        let mut wallet = service(&dir, SimulationConfig::instant());

        assert_eq!(
            wallet.switch_chain(ChainId::Base),
            Err(WalletError::NotConnected)
        );

        wallet.connect(WalletType::Metamask).unwrap();
        wallet.settle().await;
        wallet.switch_chain(ChainId::Polygon).unwrap();
        assert!(wallet.is_switching());

        wallet.settle().await;
        assert!(!wallet.is_switching());
        assert_eq!(wallet.chain().map(|c| c.symbol), Some("MATIC"));

        let mut restored = service(&dir, SimulationConfig::instant());
        restored.restore(Utc::now());
        assert_eq!(restored.session().unwrap().chain_id, ChainId::Polygon);
    }

    #[tokio::test]
    async fn test_steps_progress_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut wallet = service(&dir, SimulationConfig::instant());
        wallet.connect(WalletType::Walletconnect).unwrap();

        let mut seen = vec![wallet.step()];
        while wallet.status() == ConnectionStatus::Connecting {
            if let Some(event) = wallet.events_rx.recv().await {
                wallet.apply(event);
                seen.push(wallet.step());
            }
        }

        assert_eq!(
            seen,
            vec![
                ConnectStep::Detect,
                ConnectStep::Approve,
                ConnectStep::Sign,
                ConnectStep::Done
            ]
        );
    }

    #[tokio::test]
    async fn test_poll_applies_pending_events() {
        let dir = tempfile::tempdir().unwrap();
        let mut wallet = service(&dir, SimulationConfig::instant());
        assert_eq!(wallet.poll(), 0);

        wallet
            .events_tx
            .send(WalletEvent::Failed(WalletError::Rejected))
            .unwrap();
        assert_eq!(wallet.poll(), 1);
        assert_eq!(wallet.status(), ConnectionStatus::Error);
    }
}
