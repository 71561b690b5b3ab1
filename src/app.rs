use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::AppConfig;
use crate::portfolio::fixtures::{self, POSITIONS, STRATEGIES, TOKENS, TRANSACTIONS};
use crate::portfolio::query::{
    self, AssetSort, Favorites, Inbox, PositionFilter, RiskFilter, TxFilter,
};
use crate::portfolio::{DefiPosition, TimeRange, Token, Transaction, YieldStrategy};
use crate::wallet::{ConnectionStatus, WalletError, WalletService, WalletType, CHAINS};

/// Status messages clear after this many seconds
const STATUS_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Overview,
    Vault,
    Defi,
    Yield,
    History,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Overview,
        View::Vault,
        View::Defi,
        View::Yield,
        View::History,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Overview => "Portfolio Overview",
            View::Vault => "Asset Vault",
            View::Defi => "DeFi Positions",
            View::Yield => "Yield Strategies",
            View::History => "Transaction History",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            View::Overview => "Welcome back! Here's your portfolio at a glance.",
            View::Vault => "View and manage all your crypto assets in one place.",
            View::Defi => "Monitor and manage your decentralized finance positions.",
            View::Yield => "Explore yield farming opportunities across DeFi protocols.",
            View::History => "Review all your on-chain transactions and activity.",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Connect,
    ChainMenu,
    WalletMenu,
    Notifications,
    Send,
    Receive,
    Deposit,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendField {
    Address,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletMenuItem {
    ShowAddress,
    Explorer,
    SwitchWallet,
    Disconnect,
}

impl WalletMenuItem {
    pub const ALL: [WalletMenuItem; 4] = [
        WalletMenuItem::ShowAddress,
        WalletMenuItem::Explorer,
        WalletMenuItem::SwitchWallet,
        WalletMenuItem::Disconnect,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WalletMenuItem::ShowAddress => "Show address",
            WalletMenuItem::Explorer => "View on explorer",
            WalletMenuItem::SwitchWallet => "Switch wallet",
            WalletMenuItem::Disconnect => "Disconnect",
        }
    }
}

pub struct App {
    pub view: View,
    pub popup: Popup,
    pub input_mode: InputMode,
    pub sidebar_collapsed: bool,

    pub wallet: WalletService,
    pub config: AppConfig,

    // Overview: assets table, chart, allocation
    pub asset_search: String,
    pub asset_sort: AssetSort,
    pub favorites: Favorites,
    pub selected_asset: usize,
    pub time_range: TimeRange,
    pub allocation_index: usize,

    // Asset vault
    pub vault_search: String,
    pub hide_balances: bool,
    pub selected_vault: usize,
    pub expanded_token: Option<&'static str>,

    // DeFi positions
    pub position_filter: PositionFilter,
    pub selected_position: usize,

    // Yield strategies
    pub risk_filter: RiskFilter,
    pub sort_by_apy: bool,
    pub selected_strategy: usize,
    pub deposit_target: Option<&'static YieldStrategy>,
    pub deposit_amount: String,

    // Transaction history
    pub tx_filter: TxFilter,
    pub selected_tx: usize,

    // Header menus
    pub inbox: Inbox,
    pub menu_index: usize,
    pub closing_chain_menu: bool,

    // Send dialog
    pub send_address: String,
    pub send_amount: String,
    pub send_field: SendField,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    was_connected: bool,
}

impl App {
    pub fn new(config: AppConfig, wallet: WalletService) -> Self {
        let was_connected = wallet.is_connected();
        Self {
            view: config.default_view,
            popup: Popup::None,
            input_mode: InputMode::Normal,
            sidebar_collapsed: false,

            wallet,

            asset_search: String::new(),
            asset_sort: AssetSort::default(),
            favorites: Favorites::new(config.favorites.iter().cloned()),
            selected_asset: 0,
            time_range: TimeRange::Month,
            allocation_index: 0,

            vault_search: String::new(),
            hide_balances: config.hide_balances,
            selected_vault: 0,
            expanded_token: None,

            position_filter: PositionFilter::All,
            selected_position: 0,

            risk_filter: RiskFilter::All,
            sort_by_apy: true,
            selected_strategy: 0,
            deposit_target: None,
            deposit_amount: String::new(),

            tx_filter: TxFilter::All,
            selected_tx: 0,

            inbox: Inbox::new(fixtures::notifications()),
            menu_index: 0,
            closing_chain_menu: false,

            send_address: String::new(),
            send_amount: String::new(),
            send_field: SendField::Address,

            status_message: None,
            status_message_time: None,

            config,
            was_connected,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    // ── Derived lists ────────────────────────────────────────────────────────

    pub fn visible_assets(&self) -> Vec<&'static Token> {
        query::assets_view(TOKENS, &self.asset_search, self.asset_sort)
    }

    pub fn visible_vault(&self) -> Vec<&'static Token> {
        query::search_tokens(TOKENS, &self.vault_search)
    }

    pub fn visible_positions(&self) -> Vec<&'static DefiPosition> {
        query::filter_positions(POSITIONS, self.position_filter)
    }

    pub fn visible_strategies(&self) -> Vec<&'static YieldStrategy> {
        query::filter_strategies(STRATEGIES, self.risk_filter, self.sort_by_apy)
    }

    pub fn visible_transactions(&self) -> Vec<&'static Transaction> {
        query::filter_transactions(TRANSACTIONS, self.tx_filter)
    }

    /// Token the vault's send/receive dialogs act on
    pub fn vault_token(&self) -> &'static Token {
        self.expanded_token
            .and_then(|id| TOKENS.iter().find(|t| t.id == id))
            .unwrap_or(&TOKENS[0])
    }

    fn list_len(&self) -> usize {
        match self.view {
            View::Overview => self.visible_assets().len(),
            View::Vault => self.visible_vault().len(),
            View::Defi => self.visible_positions().len(),
            View::Yield => self.visible_strategies().len(),
            View::History => self.visible_transactions().len(),
        }
    }

    fn selection_mut(&mut self) -> &mut usize {
        match self.view {
            View::Overview => &mut self.selected_asset,
            View::Vault => &mut self.selected_vault,
            View::Defi => &mut self.selected_position,
            View::Yield => &mut self.selected_strategy,
            View::History => &mut self.selected_tx,
        }
    }

    fn move_down(&mut self) {
        let len = self.list_len();
        let sel = self.selection_mut();
        if len > 0 && *sel + 1 < len {
            *sel += 1;
        }
    }

    fn move_up(&mut self) {
        let sel = self.selection_mut();
        *sel = sel.saturating_sub(1);
    }

    fn switch_view(&mut self, view: View) {
        self.view = view;
        self.input_mode = InputMode::Normal;
    }

    // ── Key handling ─────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        if self.input_mode == InputMode::Search {
            self.handle_search_key(key);
            return Ok(());
        }

        if !self.wallet.is_connected() {
            return self.handle_landing_key(key);
        }

        self.handle_normal_key(key)
    }

    fn handle_landing_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('c') => self.open_connect(),
            KeyCode::Char('?') => self.popup = Popup::Help,
            _ => {}
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Tab => self.switch_view(self.view.next()),
            KeyCode::BackTab => self.switch_view(self.view.prev()),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                self.switch_view(View::ALL[idx]);
            }
            KeyCode::Char('[') => self.sidebar_collapsed = !self.sidebar_collapsed,

            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),

            KeyCode::Char('/') if matches!(self.view, View::Overview | View::Vault) => {
                self.input_mode = InputMode::Search;
            }

            // Header menus
            KeyCode::Char('c') => self.open_menu(Popup::ChainMenu),
            KeyCode::Char('w') => self.open_menu(Popup::WalletMenu),
            KeyCode::Char('n') => self.open_menu(Popup::Notifications),
            KeyCode::Char('?') => self.popup = Popup::Help,

            _ => match self.view {
                View::Overview => self.handle_overview_key(key),
                View::Vault => self.handle_vault_key(key),
                View::Defi => self.handle_defi_key(key),
                View::Yield => self.handle_yield_key(key),
                View::History => self.handle_history_key(key),
            },
        }
        Ok(())
    }

    fn handle_overview_key(&mut self, key: KeyEvent) {
        match key.code {
            // Sort by the next column, or flip the current one
            KeyCode::Char('s') => {
                let next = self.asset_sort.key.next();
                self.asset_sort.toggle(next);
                self.selected_asset = 0;
            }
            KeyCode::Char('o') => {
                let current = self.asset_sort.key;
                self.asset_sort.toggle(current);
                self.selected_asset = 0;
            }
            KeyCode::Char('f') => {
                if let Some(token) = self.visible_assets().get(self.selected_asset).copied() {
                    let starred = self.favorites.toggle(token.id);
                    let change = if starred { "added to" } else { "removed from" };
                    self.config.favorites = self.favorites.to_sorted_vec();
                    match self.config.save() {
                        Ok(()) => self.set_status(format!("{} {} favourites", token.symbol, change)),
                        Err(e) => {
                            tracing::warn!("Failed to save favourites: {}", e);
                            self.set_status(format!(
                                "{} {} favourites until exit ({})",
                                token.symbol, change, e
                            ));
                        }
                    }
                }
            }
            KeyCode::Char('t') => self.time_range = self.time_range.next(),
            KeyCode::Char('a') => {
                self.allocation_index = (self.allocation_index + 1) % fixtures::ALLOCATION.len();
            }
            KeyCode::Char('v') => self.switch_view(View::Defi),
            _ => {}
        }
    }

    fn handle_vault_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(token) = self.visible_vault().get(self.selected_vault).copied() {
                    self.expanded_token = if self.expanded_token == Some(token.id) {
                        None
                    } else {
                        Some(token.id)
                    };
                }
            }
            KeyCode::Char('h') => self.hide_balances = !self.hide_balances,
            KeyCode::Char('s') => {
                self.send_field = SendField::Address;
                self.popup = Popup::Send;
            }
            KeyCode::Char('r') => self.popup = Popup::Receive,
            _ => {}
        }
    }

    fn handle_defi_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('f') | KeyCode::Right => {
                self.position_filter = self.position_filter.next();
                self.selected_position = 0;
            }
            KeyCode::Char('C') => {
                let summary = query::DefiSummary::of(POSITIONS);
                self.set_status(format!(
                    "Claimed {} in fees (simulated)",
                    query::format_usd(summary.total_fees, 2)
                ));
            }
            _ => {}
        }
    }

    fn handle_yield_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('f') | KeyCode::Right => {
                self.risk_filter = self.risk_filter.next();
                self.selected_strategy = 0;
            }
            KeyCode::Char('a') => {
                self.sort_by_apy = !self.sort_by_apy;
                self.selected_strategy = 0;
            }
            KeyCode::Enter => {
                if let Some(strategy) = self.visible_strategies().get(self.selected_strategy).copied() {
                    self.deposit_target = Some(strategy);
                    self.deposit_amount.clear();
                    self.popup = Popup::Deposit;
                }
            }
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('f') | KeyCode::Right => {
                self.tx_filter = self.tx_filter.next();
                self.selected_tx = 0;
            }
            KeyCode::Enter => {
                let tx = self.visible_transactions().get(self.selected_tx).copied();
                if let (Some(tx), Some(chain)) = (tx, self.wallet.chain()) {
                    self.set_status(format!("{}/tx/{}", chain.explorer_url, tx.hash));
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let buffer = match self.view {
            View::Vault => &mut self.vault_search,
            _ => &mut self.asset_search,
        };
        match key.code {
            KeyCode::Esc => {
                buffer.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        }
        self.selected_asset = 0;
        self.selected_vault = 0;
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Connect => self.handle_connect_key(key),
            Popup::ChainMenu => self.handle_chain_menu_key(key),
            Popup::WalletMenu => self.handle_wallet_menu_key(key),
            Popup::Notifications => self.handle_notifications_key(key),
            Popup::Send => self.handle_send_key(key),
            Popup::Receive => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.popup = Popup::None;
                }
            }
            Popup::Deposit => self.handle_deposit_key(key),
            Popup::Help => self.popup = Popup::None,
            Popup::None => {}
        }
        Ok(())
    }

    fn open_menu(&mut self, popup: Popup) {
        self.menu_index = match popup {
            Popup::ChainMenu => self
                .wallet
                .session()
                .and_then(|s| CHAINS.iter().position(|c| c.id == s.chain_id))
                .unwrap_or(0),
            _ => 0,
        };
        self.popup = popup;
    }

    fn menu_down(&mut self, len: usize) {
        if self.menu_index + 1 < len {
            self.menu_index += 1;
        }
    }

    fn menu_up(&mut self) {
        self.menu_index = self.menu_index.saturating_sub(1);
    }

    // ── Connect modal ────────────────────────────────────────────────────────

    pub fn open_connect(&mut self) {
        self.wallet.open_connect_modal();
        self.menu_index = 0;
        self.popup = Popup::Connect;
    }

    fn close_connect(&mut self) {
        if self.wallet.close_connect_modal() {
            self.popup = Popup::None;
        } else {
            self.set_status("Please wait for the wallet to respond");
        }
    }

    fn handle_connect_key(&mut self, key: KeyEvent) {
        match self.wallet.status() {
            ConnectionStatus::Connecting => {
                if key.code == KeyCode::Esc {
                    self.set_status("Please wait for the wallet to respond");
                }
            }
            ConnectionStatus::Connected if self.wallet.selected_wallet().is_some() => {
                // "Enter Dashboard"
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.close_connect();
                }
            }
            ConnectionStatus::Error => match key.code {
                KeyCode::Char('r') | KeyCode::Enter => {
                    let result = self.wallet.retry();
                    self.report(result);
                }
                KeyCode::Char('b') | KeyCode::Backspace => {
                    self.wallet.back();
                    self.menu_index = 0;
                }
                KeyCode::Esc => self.close_connect(),
                _ => {}
            },
            _ => match key.code {
                KeyCode::Char('j') | KeyCode::Down => self.menu_down(WalletType::ALL.len()),
                KeyCode::Char('k') | KeyCode::Up => self.menu_up(),
                KeyCode::Enter => {
                    let wallet_type = WalletType::ALL[self.menu_index.min(WalletType::ALL.len() - 1)];
                    let result = self.wallet.select_wallet(wallet_type);
                    self.report(result);
                }
                KeyCode::Esc => self.close_connect(),
                _ => {}
            },
        }
    }

    fn report(&mut self, result: Result<(), WalletError>) {
        if let Err(e) = result {
            self.set_status(e.to_string());
        }
    }

    // ── Header menus ─────────────────────────────────────────────────────────

    fn handle_chain_menu_key(&mut self, key: KeyEvent) {
        if self.closing_chain_menu {
            return;
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.menu_down(CHAINS.len()),
            KeyCode::Char('k') | KeyCode::Up => self.menu_up(),
            KeyCode::Enter => {
                let chain = &CHAINS[self.menu_index.min(CHAINS.len() - 1)];
                match self.wallet.switch_chain(chain.id) {
                    Ok(()) => self.closing_chain_menu = true,
                    Err(e) => {
                        self.set_status(e.to_string());
                        self.popup = Popup::None;
                    }
                }
            }
            KeyCode::Esc | KeyCode::Char('c') => self.popup = Popup::None,
            _ => {}
        }
    }

    fn handle_wallet_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.menu_down(WalletMenuItem::ALL.len()),
            KeyCode::Char('k') | KeyCode::Up => self.menu_up(),
            KeyCode::Enter => {
                let item = WalletMenuItem::ALL[self.menu_index.min(WalletMenuItem::ALL.len() - 1)];
                self.popup = Popup::None;
                self.activate_wallet_item(item);
            }
            KeyCode::Esc | KeyCode::Char('w') => self.popup = Popup::None,
            _ => {}
        }
    }

    fn activate_wallet_item(&mut self, item: WalletMenuItem) {
        match item {
            WalletMenuItem::ShowAddress => {
                if let Some(session) = self.wallet.session() {
                    let msg = format!("Address: {}", session.address);
                    self.set_status(msg);
                }
            }
            WalletMenuItem::Explorer => {
                if let Some(url) = self.wallet.session().map(|s| s.explorer_url()) {
                    self.set_status(url);
                }
            }
            WalletMenuItem::SwitchWallet => self.open_connect(),
            WalletMenuItem::Disconnect => {
                self.wallet.disconnect();
                self.set_status("Wallet disconnected");
            }
        }
    }

    fn handle_notifications_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.menu_down(self.inbox.items.len()),
            KeyCode::Char('k') | KeyCode::Up => self.menu_up(),
            KeyCode::Enter => {
                if let Some(id) = self.inbox.items.get(self.menu_index).map(|n| n.id) {
                    self.inbox.mark_read(id);
                }
            }
            KeyCode::Char('a') => self.inbox.mark_all_read(),
            KeyCode::Esc | KeyCode::Char('n') => self.popup = Popup::None,
            _ => {}
        }
    }

    // ── Dialogs ──────────────────────────────────────────────────────────────

    fn handle_send_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.popup = Popup::None,
            KeyCode::Tab | KeyCode::BackTab => {
                self.send_field = match self.send_field {
                    SendField::Address => SendField::Amount,
                    SendField::Amount => SendField::Address,
                };
            }
            KeyCode::Backspace => {
                match self.send_field {
                    SendField::Address => self.send_address.pop(),
                    SendField::Amount => self.send_amount.pop(),
                };
            }
            KeyCode::Char(c) => match self.send_field {
                SendField::Address if !c.is_whitespace() => self.send_address.push(c),
                SendField::Amount if c.is_ascii_digit() || c == '.' => self.send_amount.push(c),
                _ => {}
            },
            KeyCode::Enter => {
                if self.send_address.is_empty() || self.send_amount.is_empty() {
                    self.set_status("Enter a recipient and an amount");
                    return;
                }
                let token = self.vault_token();
                let msg = format!(
                    "Sent {} {} to {} (simulated)",
                    self.send_amount, token.symbol, self.send_address
                );
                self.send_address.clear();
                self.send_amount.clear();
                self.popup = Popup::None;
                self.set_status(msg);
            }
            _ => {}
        }
    }

    fn handle_deposit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.deposit_target = None;
                self.deposit_amount.clear();
                self.popup = Popup::None;
            }
            KeyCode::Char('m') => self.deposit_amount = query::MAX_DEPOSIT.to_string(),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => self.deposit_amount.push(c),
            KeyCode::Backspace => {
                self.deposit_amount.pop();
            }
            KeyCode::Enter => {
                let amount: f64 = self.deposit_amount.parse().unwrap_or(0.0);
                if amount <= 0.0 {
                    self.set_status("Enter an amount to deposit");
                    return;
                }
                if let Some(strategy) = self.deposit_target.take() {
                    self.set_status(format!(
                        "Deposited {} into {} (simulated)",
                        query::format_usd(amount, 2),
                        strategy.name
                    ));
                }
                self.deposit_amount.clear();
                self.popup = Popup::None;
            }
            _ => {}
        }
    }

    // ── Periodic update ──────────────────────────────────────────────────────

    pub fn tick(&mut self) {
        self.wallet.poll();

        // Chain menu stays up until the switch lands
        if self.closing_chain_menu && !self.wallet.is_switching() {
            self.closing_chain_menu = false;
            if self.popup == Popup::ChainMenu {
                self.popup = Popup::None;
            }
            if let Some(chain) = self.wallet.chain() {
                self.set_status(format!("Switched to {}", chain.name));
            }
        }

        let connected = self.wallet.is_connected();
        if connected && !self.was_connected {
            self.view = self.config.default_view;
            self.selected_asset = 0;
            self.selected_vault = 0;
            self.expanded_token = None;
        } else if !connected && self.was_connected {
            if !matches!(self.popup, Popup::Connect | Popup::Help) {
                self.popup = Popup::None;
            }
            self.input_mode = InputMode::Normal;
        }
        self.was_connected = connected;

        // Clear status message after timeout
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_TIMEOUT_SECS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::wallet::{ChainId, SessionStore};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, codes: &[KeyCode]) {
        for code in codes {
            app.handle_key(key(*code)).unwrap();
        }
    }

    fn app(dir: &tempfile::TempDir) -> App {
        let mut config = AppConfig::load_from(dir.path().join("config.toml"));
        config.simulation = SimulationConfig::instant();
        app_with(dir, config)
    }

    fn app_with(dir: &tempfile::TempDir, config: AppConfig) -> App {
        let store = SessionStore::new(dir.path().join("session.json"), chrono::Duration::days(7));
        let wallet = WalletService::new(config.simulation.clone(), store);
        App::new(config, wallet)
    }

    async fn connected_app(dir: &tempfile::TempDir) -> App {
        let mut app = app(dir);
        press(&mut app, &[KeyCode::Enter, KeyCode::Enter]);
        app.wallet.settle().await;
        app.tick();
        press(&mut app, &[KeyCode::Enter]);
        app
    }

    #[tokio::test]
    async fn test_favourite_saved_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = connected_app(&dir).await;
        let first = app.visible_assets()[0].id;
        let was_starred = app.favorites.contains(first);

        press(&mut app, &[KeyCode::Char('f')]);
        let saved = AppConfig::load_from(dir.path().join("config.toml"));
        assert_eq!(saved.favorites.contains(&first.to_string()), !was_starred);
    }

    #[tokio::test]
    async fn test_favourite_leaves_broken_config_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let original = "hide_balances = tru\n# my notes\n[theme]\naccent = \"#FF00AA\"\n";
        std::fs::write(&path, original).unwrap();

        let mut config = AppConfig::load_from(path.clone());
        config.simulation = SimulationConfig::instant();
        let mut app = app_with(&dir, config);
        press(&mut app, &[KeyCode::Enter, KeyCode::Enter]);
        app.wallet.settle().await;
        app.tick();
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('f')]);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
        assert!(app.status_message.as_deref().unwrap_or("").contains("until exit"));
    }

    #[tokio::test]
    async fn test_landing_connect_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        assert!(!app.wallet.is_connected());

        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.popup, Popup::Connect);
        assert!(app.wallet.is_modal_open());

        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.wallet.status(), ConnectionStatus::Connecting);

        // Esc is refused while connecting
        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.popup, Popup::Connect);

        app.wallet.settle().await;
        app.tick();
        assert!(app.wallet.is_connected());
        assert_eq!(app.wallet.session().unwrap().wallet_type, WalletType::Coinbase);

        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.view, View::Overview);
    }

    #[tokio::test]
    async fn test_view_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = connected_app(&dir).await;

        press(&mut app, &[KeyCode::Tab]);
        assert_eq!(app.view, View::Vault);
        press(&mut app, &[KeyCode::BackTab, KeyCode::BackTab]);
        assert_eq!(app.view, View::History);
        press(&mut app, &[KeyCode::Char('3')]);
        assert_eq!(app.view, View::Defi);
        press(&mut app, &[KeyCode::Char('1'), KeyCode::Char('v')]);
        assert_eq!(app.view, View::Defi);
    }

    #[tokio::test]
    async fn test_search_and_sort_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = connected_app(&dir).await;

        press(
            &mut app,
            &[KeyCode::Char('/'), KeyCode::Char('u'), KeyCode::Char('n'), KeyCode::Char('i')],
        );
        assert_eq!(app.input_mode, InputMode::Search);
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.input_mode, InputMode::Normal);
        let symbols: Vec<_> = app.visible_assets().iter().map(|t| t.symbol).collect();
        assert_eq!(symbols, vec!["UNI"]);

        press(&mut app, &[KeyCode::Char('/'), KeyCode::Esc]);
        assert_eq!(app.visible_assets().len(), 8);

        press(&mut app, &[KeyCode::Char('s')]);
        assert_eq!(app.asset_sort.key, query::SortKey::Name);
        press(&mut app, &[KeyCode::Char('o')]);
        assert_eq!(app.visible_assets().first().map(|t| t.symbol), Some("AAVE"));
    }

    #[tokio::test]
    async fn test_filters_cycle_views() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = connected_app(&dir).await;

        press(&mut app, &[KeyCode::Char('3'), KeyCode::Char('f')]);
        assert_eq!(app.visible_positions().len(), 4);

        press(&mut app, &[KeyCode::Char('4'), KeyCode::Char('f'), KeyCode::Char('f')]);
        assert_eq!(app.visible_strategies().len(), 2);
        press(&mut app, &[KeyCode::Char('a')]);
        assert!(!app.sort_by_apy);

        press(&mut app, &[KeyCode::Char('5'), KeyCode::Char('f')]);
        assert_eq!(app.visible_transactions().len(), 3);
    }

    #[tokio::test]
    async fn test_deposit_dialog() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = connected_app(&dir).await;

        press(&mut app, &[KeyCode::Char('4'), KeyCode::Enter]);
        assert_eq!(app.popup, Popup::Deposit);
        assert_eq!(app.deposit_target.map(|s| s.name), Some("GLP Vault"));

        press(&mut app, &[KeyCode::Char('m')]);
        assert_eq!(app.deposit_amount, "10000");
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.popup, Popup::None);
        assert!(app.status_message.as_deref().unwrap().contains("$10,000.00"));
    }

    #[tokio::test]
    async fn test_vault_send_dialog() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = connected_app(&dir).await;

        press(&mut app, &[KeyCode::Char('2'), KeyCode::Char('h')]);
        assert!(app.hide_balances);
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.expanded_token, Some("2"));

        press(&mut app, &[KeyCode::Char('s'), KeyCode::Enter]);
        assert_eq!(app.popup, Popup::Send, "empty form is not submitted");

        press(&mut app, &[KeyCode::Char('0'), KeyCode::Char('x'), KeyCode::Tab]);
        press(&mut app, &[KeyCode::Char('5'), KeyCode::Char('x'), KeyCode::Enter]);
        assert_eq!(app.popup, Popup::None);
        assert!(app.send_address.is_empty());
        assert_eq!(
            app.status_message.as_deref(),
            Some("Sent 5 USDC to 0x (simulated)")
        );
    }

    #[tokio::test]
    async fn test_chain_menu_switches_chain() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = connected_app(&dir).await;

        press(&mut app, &[KeyCode::Char('c')]);
        assert_eq!(app.popup, Popup::ChainMenu);
        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Enter]);
        assert!(app.closing_chain_menu);

        app.wallet.settle().await;
        app.tick();
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.wallet.session().unwrap().chain_id, ChainId::Arbitrum);
    }

    #[tokio::test]
    async fn test_wallet_menu_disconnect() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = connected_app(&dir).await;

        press(&mut app, &[KeyCode::Char('w'), KeyCode::Up, KeyCode::Down]);
        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Enter]);
        app.tick();
        assert!(!app.wallet.is_connected());
        assert_eq!(app.wallet.status(), ConnectionStatus::Disconnected);

        // Back on the landing page
        press(&mut app, &[KeyCode::Char('c')]);
        assert_eq!(app.popup, Popup::Connect);
    }

    #[tokio::test]
    async fn test_notifications_popup() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = connected_app(&dir).await;

        press(&mut app, &[KeyCode::Char('n'), KeyCode::Enter]);
        assert_eq!(app.inbox.unread_count(), 2);
        press(&mut app, &[KeyCode::Char('a'), KeyCode::Esc]);
        assert_eq!(app.inbox.unread_count(), 0);
        assert_eq!(app.popup, Popup::None);
    }

    #[tokio::test]
    async fn test_failed_connect_retry_and_close() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.wallet = WalletService::new(
            SimulationConfig {
                failure_rate: 1.0,
                ..SimulationConfig::instant()
            },
            SessionStore::new(dir.path().join("session.json"), chrono::Duration::days(7)),
        );

        press(&mut app, &[KeyCode::Enter, KeyCode::Enter]);
        app.wallet.settle().await;
        assert_eq!(app.wallet.status(), ConnectionStatus::Error);

        press(&mut app, &[KeyCode::Char('r')]);
        assert_eq!(app.wallet.status(), ConnectionStatus::Connecting);
        app.wallet.settle().await;

        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.wallet.status(), ConnectionStatus::Disconnected);
    }
}
