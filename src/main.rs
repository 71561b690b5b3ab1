mod app;
mod config;
mod portfolio;
mod theme;
mod ui;
mod wallet;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::{App, InputMode, Popup};
use config::AppConfig;
use wallet::{ChainId, ConnectionStatus, SessionStore, WalletService, WalletType};

#[derive(Parser, Debug)]
#[command(name = "kinetifi")]
#[command(version = "0.1.0")]
#[command(about = "A terminal DeFi portfolio dashboard with a simulated wallet")]
struct Args {
    /// Output the persisted wallet session as JSON
    #[arg(short, long)]
    status: bool,

    /// Connect a wallet without the TUI (metamask, walletconnect, coinbase)
    #[arg(short, long)]
    connect: Option<String>,

    /// Forget the persisted wallet session
    #[arg(long)]
    disconnect: bool,

    /// Switch the persisted session to another chain id (1, 10, 42161, 137, 8453)
    #[arg(long)]
    chain: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let tui = !args.status && !args.disconnect && args.connect.is_none() && args.chain.is_none();

    init_logging(tui);

    let config = AppConfig::load()?;
    let store = SessionStore::open_default(config.session_max_age_days)?;
    tracing::debug!("Session file: {}", store.path().display());
    let mut wallet = WalletService::new(config.simulation.clone(), store);
    wallet.restore(Utc::now());

    // Handle CLI-only commands
    if args.status {
        return print_status(&wallet);
    }

    if args.disconnect {
        return disconnect_wallet(&mut wallet, &config);
    }

    if let Some(name) = args.connect {
        connect_wallet(&mut wallet, &config, &name).await?;
    }

    if let Some(id) = args.chain {
        return switch_chain(&mut wallet, id).await;
    }

    if !tui {
        return Ok(());
    }

    // Run TUI
    run_tui(config, wallet).await
}

/// TUI mode logs to a file so output does not land on the alternate screen
fn init_logging(tui: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if tui {
        let log_file = dirs::data_dir().and_then(|dir| {
            let dir = dir.join("kinetifi");
            std::fs::create_dir_all(&dir).ok()?;
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("kinetifi.log"))
                .ok()
        });

        if let Some(file) = log_file {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(filter)
                .init();
        }
        return;
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_status(wallet: &WalletService) -> Result<()> {
    let output = match wallet.session() {
        Some(session) => {
            let chain = session.chain_id.info();
            let connected_at = Utc
                .timestamp_millis_opt(session.connected_at)
                .single()
                .map(|t| t.to_rfc3339());
            serde_json::json!({
                "connected": true,
                "wallet": session.wallet_type,
                "address": session.address,
                "shortAddress": session.short_address(),
                "ensName": session.ens_name,
                "balance": wallet.balance(),
                "chain": {
                    "id": chain.id.as_u64(),
                    "name": chain.name,
                    "symbol": chain.symbol,
                    "rpcUrl": chain.rpc_url,
                },
                "explorer": session.explorer_url(),
                "connectedAt": connected_at,
            })
        }
        None => serde_json::json!({ "connected": false }),
    };

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

async fn connect_wallet(wallet: &mut WalletService, config: &AppConfig, name: &str) -> Result<()> {
    let wallet_type: WalletType = name.parse()?;
    wallet.connect(wallet_type)?;
    wallet.settle().await;

    if wallet.status() != ConnectionStatus::Connected {
        let reason = wallet.error().unwrap_or("connection failed").to_string();
        anyhow::bail!("{}: {}", wallet_type.label(), reason);
    }

    let name = wallet
        .session()
        .map(|s| s.display_name())
        .unwrap_or_default();
    println!("Connected {} as {}", wallet_type.label(), name);
    notify(config, &format!("Connected {} as {}", wallet_type.label(), name));
    Ok(())
}

fn disconnect_wallet(wallet: &mut WalletService, config: &AppConfig) -> Result<()> {
    let was_connected = wallet.is_connected();
    wallet.disconnect();
    if was_connected {
        println!("Wallet disconnected");
        notify(config, "Wallet disconnected");
    } else {
        println!("No wallet connected");
    }
    Ok(())
}

async fn switch_chain(wallet: &mut WalletService, id: u64) -> Result<()> {
    let chain_id = ChainId::try_from(id)?;
    wallet
        .switch_chain(chain_id)
        .context("Connect a wallet first with --connect")?;
    wallet.settle().await;
    println!("Switched to {}", chain_id.info().name);
    Ok(())
}

async fn run_tui(config: AppConfig, wallet: WalletService) -> Result<()> {
    ui::init_theme(theme::Theme::load(&config.theme));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(config, wallet);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q')
                            if app.popup == Popup::None && app.input_mode == InputMode::Normal =>
                        {
                            return Ok(())
                        }
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key) {
                                app.set_status(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        // Let the wallet tasks run, then apply what they reported
        tokio::task::yield_now().await;
        app.tick();
    }
}

fn notify(config: &AppConfig, body: &str) {
    if !config.notifications {
        return;
    }
    if let Err(e) = notify_rust::Notification::new()
        .summary("KinetiFi")
        .body(body)
        .icon("wallet")
        .show()
    {
        tracing::debug!("Desktop notification failed: {}", e);
    }
}
