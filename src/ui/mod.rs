mod components;
mod views;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::sync::OnceLock;

use crate::app::{App, InputMode, Popup, SendField, View, WalletMenuItem};
use crate::portfolio::query::{estimated_yield, format_amount, format_usd};
use crate::portfolio::NotificationKind;
use crate::theme::Theme;
use crate::wallet::{ConnectStep, ConnectionStatus, WalletType, CHAINS};
use components::{key_hints, panel, swatch};

// Resolved once at startup from config; falls back to the stock palette
static THEME: OnceLock<Theme> = OnceLock::new();

pub fn init_theme(theme: Theme) {
    let _ = THEME.set(theme);
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn accent_alt() -> Color { theme().accent_alt }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg() -> Color { theme().bg }
fn bg_selected() -> Color { theme().bg_selected }

const SIDEBAR_WIDTH: u16 = 22;
const SIDEBAR_COLLAPSED_WIDTH: u16 = 5;

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    f.render_widget(Block::default().style(Style::default().bg(bg())), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(8),    // Body
            Constraint::Length(1), // Info line
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_header(f, app, chunks[0]);

    if app.wallet.is_connected() {
        let sidebar_width = if app.sidebar_collapsed || area.width < 90 {
            SIDEBAR_COLLAPSED_WIDTH
        } else {
            SIDEBAR_WIDTH
        };
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(20)])
            .split(chunks[1]);

        draw_sidebar(f, app, body[0], sidebar_width == SIDEBAR_COLLAPSED_WIDTH);
        draw_main(f, app, body[1]);
    } else {
        draw_landing(f, app, chunks[1]);
    }

    draw_info_line(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Connect => draw_connect_popup(f, app),
        Popup::ChainMenu => draw_chain_menu(f, app),
        Popup::WalletMenu => draw_wallet_menu(f, app),
        Popup::Notifications => draw_notifications(f, app),
        Popup::Send => draw_send_popup(f, app),
        Popup::Receive => draw_receive_popup(f, app),
        Popup::Deposit => draw_deposit_popup(f, app),
        Popup::Help => draw_help_popup(f),
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let mut left = vec![
        Span::styled(" ◆ ", Style::default().fg(accent())),
        Span::styled("KinetiFi", Style::default().fg(text()).add_modifier(Modifier::BOLD)),
    ];

    let mut right = Vec::new();
    if let Some(session) = app.wallet.session() {
        if area.width > 70 {
            left.push(Span::styled("   / ", Style::default().fg(accent())));
            left.push(Span::styled("Search tokens", Style::default().fg(text_dim())));
        }

        let chain = session.chain_id.info();
        let chain_label = if app.wallet.is_switching() {
            "Switching...".to_string()
        } else {
            chain.name.to_string()
        };
        right.push(swatch(chain.color));
        right.push(Span::styled(chain_label, Style::default().fg(text())));
        right.push(Span::styled(" │ ", Style::default().fg(inactive())));

        let unread = app.inbox.unread_count();
        let bell_color = if unread > 0 { warning() } else { text_dim() };
        right.push(Span::styled(format!("◉ {} ", unread), Style::default().fg(bell_color)));
        right.push(Span::styled("│ ", Style::default().fg(inactive())));

        right.push(Span::styled(
            format!("{} {} ", format_amount(app.wallet.balance().parse().unwrap_or(0.0), 4), chain.symbol),
            Style::default().fg(text_dim()),
        ));
        right.push(Span::styled(
            format!("{} ", session.display_name()),
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        ));
    } else {
        right.push(Span::styled("Not connected ", Style::default().fg(text_dim())));
    }

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    f.render_widget(Paragraph::new(Line::from(left)), halves[0]);
    f.render_widget(
        Paragraph::new(Line::from(right)).alignment(Alignment::Right),
        halves[1],
    );
}

fn view_icon(view: View) -> &'static str {
    match view {
        View::Overview => "◈",
        View::Vault => "▣",
        View::Defi => "⇄",
        View::Yield => "↗",
        View::History => "☰",
    }
}

fn draw_sidebar(f: &mut Frame, app: &App, area: Rect, collapsed: bool) {
    let mut lines = vec![Line::from("")];
    for (i, view) in View::ALL.iter().enumerate() {
        let active = *view == app.view;
        let style = if active {
            Style::default()
                .fg(accent())
                .bg(bg_selected())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(text_dim())
        };
        let label = if collapsed {
            format!(" {} ", view_icon(*view))
        } else {
            let name = match view {
                View::Overview => "Overview",
                View::Vault => "Asset Vault",
                View::Defi => "DeFi Positions",
                View::Yield => "Yield",
                View::History => "History",
            };
            format!(" {} {} {:<14}", i + 1, view_icon(*view), name)
        };
        lines.push(Line::from(Span::styled(label, style)));
    }

    if !collapsed {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" [", Style::default().fg(accent())),
            Span::styled(" collapse", Style::default().fg(inactive())),
        ]));
    }

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(inactive()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_main(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(5)])
        .split(area);

    let mut title = vec![Span::styled(
        format!(" {}", app.view.title()),
        Style::default().fg(text()).add_modifier(Modifier::BOLD),
    )];
    if app.input_mode == InputMode::Search {
        let query = match app.view {
            View::Vault => &app.vault_search,
            _ => &app.asset_search,
        };
        title.push(Span::styled("   Search: ", Style::default().fg(accent())));
        title.push(Span::styled(format!("{}▏", query), Style::default().fg(text())));
    }

    let heading = Paragraph::new(vec![
        Line::from(title),
        Line::from(Span::styled(
            format!(" {}", app.view.subtitle()),
            Style::default().fg(text_dim()),
        )),
    ]);
    f.render_widget(heading, chunks[0]);

    views::draw_view(f, app, chunks[1]);
}

fn draw_landing(f: &mut Frame, app: &App, area: Rect) {
    let features = [
        ("Portfolio tracking", "Net worth, allocation and performance across chains"),
        ("DeFi positions", "Liquidity, lending and staking with health factors"),
        ("Yield strategies", "Compare APYs by risk and simulate deposits"),
        ("Transaction history", "Every swap, transfer and claim in one place"),
    ];

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "KinetiFi",
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Your DeFi portfolio in one dashboard",
            Style::default().fg(text()),
        )),
        Line::from(""),
    ];
    for (title, desc) in features {
        lines.push(Line::from(vec![
            Span::styled("◆ ", Style::default().fg(accent_alt())),
            Span::styled(title, Style::default().fg(text()).add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(Span::styled(desc, Style::default().fg(text_dim()))));
    }
    lines.push(Line::from(""));

    let prompt = if app.wallet.status() == ConnectionStatus::Connecting {
        Line::from(Span::styled("Connecting...", Style::default().fg(warning())))
    } else {
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(text_dim())),
            Span::styled("Enter", Style::default().fg(accent()).add_modifier(Modifier::BOLD)),
            Span::styled(" to connect a wallet", Style::default().fg(text_dim())),
        ])
    };
    lines.push(prompt);

    let landing = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(landing, area);
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Priority: status message > wallet error > ready
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status, Style::default().fg(warning())))
    } else if let Some(error) = app.wallet.error() {
        Line::from(Span::styled(error, Style::default().fg(danger())))
    } else if app.wallet.is_connected() {
        Line::from(Span::styled(
            format!("Connected · {}", app.wallet.short_address()),
            Style::default().fg(text_dim()),
        ))
    } else {
        Line::from(Span::styled("Ready", Style::default().fg(text_dim())))
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn footer_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.input_mode == InputMode::Search {
        return vec![("Enter", "Apply"), ("Esc", "Clear")];
    }
    if !app.wallet.is_connected() {
        return vec![("Enter", "Connect"), ("?", "Help"), ("q", "Quit")];
    }

    let mut hints = vec![("Tab", "View"), ("↑↓", "Nav")];
    hints.extend(match app.view {
        View::Overview => vec![("s", "Sort"), ("f", "Fav"), ("t", "Range"), ("/", "Search")],
        View::Vault => vec![("Enter", "Expand"), ("s", "Send"), ("r", "Receive"), ("h", "Hide")],
        View::Defi => vec![("f", "Filter"), ("C", "Claim")],
        View::Yield => vec![("f", "Risk"), ("a", "APY sort"), ("Enter", "Deposit")],
        View::History => vec![("f", "Filter"), ("Enter", "Explorer")],
    });
    hints.extend([("c", "Chain"), ("w", "Wallet"), ("?", "Help")]);
    hints
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints = footer_hints(app);

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else if area.width < 90 { 6 } else { hints.len() };
    let shown: Vec<_> = hints.into_iter().take(max_hints).collect();

    // Footer is commands legend ONLY - no status messages here
    let footer = Paragraph::new(Line::from(key_hints(&shown))).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

// ── Popups ──────────────────────────────────────────────────────────────────

fn popup_block(title: &str) -> Block<'static> {
    panel(title, true).style(Style::default().bg(bg()))
}

fn menu_line(selected: bool, spans: Vec<Span<'static>>) -> Line<'static> {
    let marker = if selected {
        Span::styled(" ▶ ", Style::default().fg(accent()))
    } else {
        Span::raw("   ")
    };
    let mut all = vec![marker];
    all.extend(spans);
    let line = Line::from(all);
    if selected {
        line.style(Style::default().bg(bg_selected()))
    } else {
        line
    }
}

fn draw_connect_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, popup_area);

    let wallet = &app.wallet;
    let mut lines = vec![Line::from("")];

    match (wallet.status(), wallet.selected_wallet()) {
        (ConnectionStatus::Connecting, Some(wt)) => {
            lines.push(Line::from(Span::styled(
                format!(" Connecting to {}...", wt.label()),
                Style::default().fg(text()).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            for step in ConnectStep::ALL.iter().take(3) {
                let (icon, color) = if *step < wallet.step() {
                    ("✓", success())
                } else if *step == wallet.step() {
                    ("◌", accent())
                } else {
                    ("○", inactive())
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("   {} ", icon), Style::default().fg(color)),
                    Span::styled(step.label(), Style::default().fg(color)),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                " Approve the request in your wallet",
                Style::default().fg(text_dim()),
            )));
        }
        (ConnectionStatus::Error, _) => {
            lines.push(Line::from(Span::styled(
                " Connection failed",
                Style::default().fg(danger()).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(" {}", wallet.error().unwrap_or("Unknown error")),
                Style::default().fg(text()),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(key_hints(&[("r", "Retry"), ("b", "Back"), ("Esc", "Close")])));
        }
        (ConnectionStatus::Connected, Some(_)) => {
            lines.push(Line::from(Span::styled(
                " ✓ Wallet connected",
                Style::default().fg(success()).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            if let Some(session) = wallet.session() {
                lines.push(Line::from(vec![
                    Span::styled(" Account  ", Style::default().fg(text_dim())),
                    Span::styled(session.display_name(), Style::default().fg(accent())),
                ]));
                lines.push(Line::from(vec![
                    Span::styled(" Address  ", Style::default().fg(text_dim())),
                    Span::styled(session.short_address(), Style::default().fg(text())),
                ]));
                lines.push(Line::from(vec![
                    Span::styled(" Balance  ", Style::default().fg(text_dim())),
                    Span::styled(
                        format!("{} {}", wallet.balance(), session.chain_id.info().symbol),
                        Style::default().fg(text()),
                    ),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(key_hints(&[("Enter", "Enter Dashboard")])));
        }
        _ => {
            lines.push(Line::from(Span::styled(
                " Choose a wallet",
                Style::default().fg(text()).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            for (i, wt) in WalletType::ALL.iter().enumerate() {
                let mut spans = vec![Span::styled(
                    wt.label(),
                    Style::default().fg(text()).add_modifier(Modifier::BOLD),
                )];
                if wt.popular() {
                    spans.push(Span::styled(" Popular", Style::default().fg(accent_alt())));
                }
                lines.push(menu_line(i == app.menu_index, spans));
                lines.push(menu_line(
                    i == app.menu_index,
                    vec![Span::styled(wt.description(), Style::default().fg(text_dim()))],
                ));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                " By connecting you agree to the Terms of Service",
                Style::default().fg(inactive()),
            )));
        }
    }

    let content = Paragraph::new(lines)
        .block(popup_block("Connect Wallet"))
        .wrap(Wrap { trim: false });
    f.render_widget(content, popup_area);
}

fn draw_chain_menu(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(40, 40, f.area());
    f.render_widget(Clear, popup_area);

    let current = app.wallet.session().map(|s| s.chain_id);
    let mut lines = vec![Line::from("")];
    for (i, chain) in CHAINS.iter().enumerate() {
        let mut spans = vec![
            swatch(chain.color),
            Span::styled(chain.name, Style::default().fg(text())),
            Span::styled(format!("  {}", chain.symbol), Style::default().fg(text_dim())),
        ];
        if current == Some(chain.id) {
            spans.push(Span::styled("  ✓", Style::default().fg(success())));
        }
        lines.push(menu_line(i == app.menu_index, spans));
    }
    if app.closing_chain_menu {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" Switching network...", Style::default().fg(warning()))));
    }

    let content = Paragraph::new(lines).block(popup_block("Select Network"));
    f.render_widget(content, popup_area);
}

fn draw_wallet_menu(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(45, 40, f.area());
    f.render_widget(Clear, popup_area);

    let mut lines = vec![Line::from("")];
    if let Some(session) = app.wallet.session() {
        lines.push(Line::from(Span::styled(
            format!(" {}", session.display_name()),
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!(" {} · {}", session.wallet_type.label(), session.short_address()),
            Style::default().fg(text_dim()),
        )));
        lines.push(Line::from(""));
    }
    for (i, item) in WalletMenuItem::ALL.iter().enumerate() {
        let color = if *item == WalletMenuItem::Disconnect { danger() } else { text() };
        lines.push(menu_line(
            i == app.menu_index,
            vec![Span::styled(item.label(), Style::default().fg(color))],
        ));
    }

    let content = Paragraph::new(lines).block(popup_block("Wallet"));
    f.render_widget(content, popup_area);
}

fn draw_notifications(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(55, 60, f.area());
    f.render_widget(Clear, popup_area);

    let mut lines = vec![Line::from("")];
    for (i, n) in app.inbox.items.iter().enumerate() {
        let color = match n.kind {
            NotificationKind::Info => accent(),
            NotificationKind::Warning => warning(),
            NotificationKind::Success => success(),
            NotificationKind::Alert => danger(),
        };
        let title_style = if n.read {
            Style::default().fg(text_dim())
        } else {
            Style::default().fg(text()).add_modifier(Modifier::BOLD)
        };
        lines.push(menu_line(
            i == app.menu_index,
            vec![
                Span::styled(if n.read { "  " } else { "● " }, Style::default().fg(color)),
                Span::styled(n.title, title_style),
                Span::styled(format!("  {}", n.time), Style::default().fg(inactive())),
            ],
        ));
        lines.push(Line::from(Span::styled(
            format!("     {}", n.message),
            Style::default().fg(text_dim()),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(key_hints(&[("Enter", "Mark read"), ("a", "Mark all read"), ("Esc", "Close")])));

    let title = format!("Notifications ({} unread)", app.inbox.unread_count());
    let content = Paragraph::new(lines)
        .block(popup_block(&title))
        .wrap(Wrap { trim: false });
    f.render_widget(content, popup_area);
}

fn input_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let border = if focused { accent() } else { inactive() };
    let cursor = if focused { "▏" } else { "" };
    Line::from(vec![
        Span::styled(format!(" {:<10}", label), Style::default().fg(text_dim())),
        Span::styled("[ ", Style::default().fg(border)),
        Span::styled(format!("{}{}", value, cursor), Style::default().fg(text())),
        Span::styled(" ]", Style::default().fg(border)),
    ])
}

fn draw_send_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(55, 35, f.area());
    f.render_widget(Clear, popup_area);

    let token = app.vault_token();
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" Available ", Style::default().fg(text_dim())),
            Span::styled(
                format!("{} {}", format_amount(token.balance, 4), token.symbol),
                Style::default().fg(text()),
            ),
        ]),
        Line::from(""),
        input_line("Recipient", &app.send_address, app.send_field == SendField::Address),
        input_line("Amount", &app.send_amount, app.send_field == SendField::Amount),
        Line::from(""),
        Line::from(key_hints(&[("Tab", "Next field"), ("Enter", "Send"), ("Esc", "Cancel")])),
    ];

    let content = Paragraph::new(lines).block(popup_block(&format!("Send {}", token.symbol)));
    f.render_widget(content, popup_area);
}

fn draw_receive_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(60, 30, f.area());
    f.render_widget(Clear, popup_area);

    let token = app.vault_token();
    let address = app
        .wallet
        .session()
        .map(|s| s.address.clone())
        .unwrap_or_default();
    let chain = app.wallet.chain().map(|c| c.name).unwrap_or("Ethereum");

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" Send only {} on {} to this address", token.symbol, chain),
            Style::default().fg(text_dim()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", address),
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(key_hints(&[("Esc", "Close")])),
    ];

    let content = Paragraph::new(lines)
        .block(popup_block(&format!("Receive {}", token.symbol)))
        .wrap(Wrap { trim: false });
    f.render_widget(content, popup_area);
}

fn draw_deposit_popup(f: &mut Frame, app: &App) {
    let Some(strategy) = app.deposit_target else {
        return;
    };
    let popup_area = centered_rect(55, 40, f.area());
    f.render_widget(Clear, popup_area);

    let yearly = estimated_yield(&app.deposit_amount, strategy.apy);
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" Protocol ", Style::default().fg(text_dim())),
            Span::styled(strategy.protocol, Style::default().fg(text())),
            Span::styled("   APY ", Style::default().fg(text_dim())),
            Span::styled(
                format!("{}%", format_amount(strategy.apy, 2)),
                Style::default().fg(success()).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        input_line("Amount $", &app.deposit_amount, true),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Estimated yearly yield ", Style::default().fg(text_dim())),
            Span::styled(format_usd(yearly, 2), Style::default().fg(success())),
        ]),
        Line::from(""),
        Line::from(key_hints(&[("m", "Max"), ("Enter", "Deposit"), ("Esc", "Cancel")])),
    ];

    let content = Paragraph::new(lines).block(popup_block(&format!("Deposit · {}", strategy.name)));
    f.render_widget(content, popup_area);
}

fn help_key(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), Style::default().fg(accent())),
        Span::raw(action),
    ])
}

fn help_section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        format!("═══ {} ═══", title),
        Style::default().fg(accent_alt()).add_modifier(Modifier::BOLD),
    ))
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 40 { 95 } else { 85 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        help_section("Navigation"),
        help_key("Tab/S-Tab", "Next / previous view"),
        help_key("1-5", "Jump to Overview, Vault, DeFi, Yield, History"),
        help_key("↑/↓ j/k", "Move up/down in lists"),
        help_key("[", "Collapse sidebar"),
        help_key("/", "Search tokens (Overview, Vault)"),
        Line::from(""),
        help_section("Wallet"),
        help_key("c", "Switch network"),
        help_key("w", "Wallet menu: address, explorer, disconnect"),
        help_key("n", "Notifications"),
        Line::from(""),
        help_section("Overview"),
        help_key("s / o", "Sort by next column / flip order"),
        help_key("f", "Star or unstar token"),
        help_key("t", "Cycle chart time range"),
        help_key("a", "Cycle allocation slice"),
        Line::from(""),
        help_section("Views"),
        help_key("Enter", "Expand token, deposit, open in explorer"),
        help_key("f", "Cycle filter (DeFi, Yield, History)"),
        help_key("h", "Hide balances (Vault)"),
        help_key("C", "Claim all fees (DeFi)"),
        Line::from(""),
        help_section("Quick Start"),
        help_key("kinetifi", "Launch this TUI"),
        help_key("--status", "Print session JSON"),
        help_key("--connect", "Connect a wallet headless"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press any key", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" KinetiFi Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent()))
                .style(Style::default().bg(bg())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, SimulationConfig};
    use crate::wallet::{SessionStore, WalletService};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let backend = TestBackend::new(140, 45);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    fn app(dir: &tempfile::TempDir) -> App {
        let config = AppConfig {
            simulation: SimulationConfig::instant(),
            ..AppConfig::default()
        };
        let store = SessionStore::new(dir.path().join("session.json"), chrono::Duration::days(7));
        App::new(config.clone(), WalletService::new(config.simulation, store))
    }

    #[test]
    fn test_centered_rect() {
        let r = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(r, Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn test_landing_renders() {
        let dir = tempfile::tempdir().unwrap();
        let screen = render(&app(&dir));
        assert!(screen.contains("Not connected"));
        assert!(screen.contains("to connect a wallet"));
    }

    #[tokio::test]
    async fn test_every_view_renders() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.wallet.connect(WalletType::Metamask).unwrap();
        app.wallet.settle().await;
        app.tick();

        for view in View::ALL {
            app.view = view;
            let screen = render(&app);
            assert!(screen.contains(view.title()), "{:?} title missing", view);
            assert!(screen.contains("kinetifi.eth"));
        }

        app.view = View::Defi;
        assert!(render(&app).contains("Uniswap V3"));
    }

    #[tokio::test]
    async fn test_popups_render() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.wallet.connect(WalletType::Coinbase).unwrap();
        app.wallet.settle().await;

        for popup in [Popup::ChainMenu, Popup::WalletMenu, Popup::Notifications, Popup::Help] {
            app.popup = popup;
            render(&app);
        }

        app.popup = Popup::ChainMenu;
        assert!(render(&app).contains("Select Network"));
        app.popup = Popup::Notifications;
        assert!(render(&app).contains("3 unread"));
    }
}
