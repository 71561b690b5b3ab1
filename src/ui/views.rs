//! One renderer per dashboard view

use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::components::{
    change_color, filter_chips, health_bar, key_hints, masked, panel, risk_badge, risk_color,
    share_bar, status_span, swatch,
};
use super::{accent, accent_alt, bg_selected, danger, inactive, success, text, text_dim, warning};
use crate::app::{App, View};
use crate::portfolio::fixtures::{self, ALLOCATION, METRICS, POSITIONS, TRANSACTIONS};
use crate::portfolio::query::{
    self, describe_transaction, format_amount, format_change, format_usd, relative_time,
    sparkline_glyphs, DefiSummary, PositionFilter, RiskFilter, SortDir, SortKey, TxFilter,
};
use crate::portfolio::{DefiPosition, TimeRange, TxKind};
use crate::theme::hex_or;

/// Rows the DeFi preview on the overview shows
const DEFI_PREVIEW_LEN: usize = 4;

pub fn draw_view(f: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Overview => draw_overview(f, app, area),
        View::Vault => draw_vault(f, app, area),
        View::Defi => draw_defi(f, app, area),
        View::Yield => draw_yield(f, app, area),
        View::History => draw_history(f, app, area),
    }
}

fn selected_style(selected: bool) -> Style {
    if selected {
        Style::default().bg(bg_selected()).fg(text())
    } else {
        Style::default()
    }
}

fn header_row(cells: Vec<&'static str>) -> Row<'static> {
    Row::new(
        cells
            .into_iter()
            .map(|c| Span::styled(c, Style::default().fg(text_dim()).add_modifier(Modifier::BOLD)))
            .collect::<Vec<_>>(),
    )
}

// ── Overview ────────────────────────────────────────────────────────────────

fn draw_overview(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),      // Metric cards
            Constraint::Percentage(45), // Chart + allocation
            Constraint::Min(6),         // Assets + DeFi preview
        ])
        .split(area);

    draw_metric_cards(f, rows[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[1]);
    draw_performance(f, app, middle[0]);
    draw_allocation(f, app, middle[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[2]);
    draw_assets_table(f, app, bottom[0]);
    draw_defi_preview(f, bottom[1]);
}

fn draw_metric_cards(f: &mut Frame, area: Rect) {
    let constraints: Vec<Constraint> = METRICS
        .iter()
        .map(|_| Constraint::Ratio(1, METRICS.len() as u32))
        .collect();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (card, slot) in METRICS.iter().zip(cards.iter()) {
        let mut value_line = vec![Span::styled(
            card.value,
            Style::default().fg(text()).add_modifier(Modifier::BOLD),
        )];
        if let Some(change) = card.change {
            let color = if card.change_positive { success() } else { danger() };
            value_line.push(Span::styled(format!("  {}", change), Style::default().fg(color)));
        }

        let content = Paragraph::new(vec![
            Line::from(value_line),
            Line::from(Span::styled(card.subtitle, Style::default().fg(text_dim()))),
        ])
        .block(panel(card.title, false));
        f.render_widget(content, *slot);
    }
}

fn draw_performance(f: &mut Frame, app: &App, area: Rect) {
    let points = fixtures::performance(app.time_range);
    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect();

    let min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if min.is_finite() && max > min {
        let pad = (max - min) * 0.1;
        (min - pad, max + pad)
    } else {
        (0.0, 1.0)
    };

    let change = match (points.first(), points.last()) {
        (Some(first), Some(last)) if first.value != 0.0 => {
            (last.value - first.value) / first.value * 100.0
        }
        _ => 0.0,
    };

    let range_tabs: Vec<Span> = TimeRange::ALL
        .iter()
        .flat_map(|r| {
            let style = if *r == app.time_range {
                Style::default().fg(accent()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(inactive())
            };
            vec![Span::styled(r.label(), style), Span::raw(" ")]
        })
        .collect();

    let block = panel("Portfolio Performance", true).title_bottom(Line::from(range_tabs).right_aligned());

    let x_labels: Vec<Span> = match (points.first(), points.last()) {
        (Some(first), Some(last)) => vec![
            Span::styled(first.label, Style::default().fg(text_dim())),
            Span::styled(last.label, Style::default().fg(text_dim())),
        ],
        _ => Vec::new(),
    };

    let dataset = Dataset::default()
        .name(format!("{} {}", app.time_range.label(), format_change(change)))
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(accent()))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, data.len().saturating_sub(1).max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(vec![
                    Span::styled(format_usd(lo, 0), Style::default().fg(text_dim())),
                    Span::styled(format_usd(hi, 0), Style::default().fg(text_dim())),
                ]),
        );

    f.render_widget(chart, area);
}

fn draw_allocation(f: &mut Frame, app: &App, area: Rect) {
    let total: f64 = ALLOCATION.iter().map(|s| s.amount).sum();
    let bar_width = (area.width as usize).saturating_sub(22).clamp(4, 20);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Total ", Style::default().fg(text_dim())),
            Span::styled(
                format_usd(total, 0),
                Style::default().fg(text()).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    for (i, slice) in ALLOCATION.iter().enumerate() {
        let color = hex_or(slice.color, text());
        let focused = i == app.allocation_index;
        let name_style = if focused {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(text())
        };
        lines.push(Line::from(vec![
            Span::styled(if focused { "▶ " } else { "  " }, Style::default().fg(accent())),
            Span::styled(format!("{:<7}", slice.name), name_style),
            share_bar(slice.percent, bar_width, color),
            Span::styled(format!(" {:>3.0}%", slice.percent), Style::default().fg(text_dim())),
        ]));
    }

    if let Some(slice) = ALLOCATION.get(app.allocation_index) {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(slice.name, Style::default().fg(hex_or(slice.color, text()))),
            Span::styled(
                format!(" {}", format_usd(slice.amount, 0)),
                Style::default().fg(text()),
            ),
        ]));
    }

    let content = Paragraph::new(lines).block(panel("Asset Allocation", false));
    f.render_widget(content, area);
}

fn sort_header(app: &App, key: SortKey) -> String {
    if app.asset_sort.key != key {
        return key.label().to_string();
    }
    let arrow = match app.asset_sort.dir {
        SortDir::Asc => "↑",
        SortDir::Desc => "↓",
    };
    format!("{} {}", key.label(), arrow)
}

fn draw_assets_table(f: &mut Frame, app: &App, area: Rect) {
    let assets = app.visible_assets();
    let title = if app.asset_search.is_empty() {
        "Assets".to_string()
    } else {
        format!("Assets · \"{}\"", app.asset_search)
    };

    let header = Row::new(vec![
        Span::raw(""),
        Span::styled(sort_header(app, SortKey::Name), Style::default().fg(text_dim())),
        Span::styled(sort_header(app, SortKey::Price), Style::default().fg(text_dim())),
        Span::styled(sort_header(app, SortKey::Change24h), Style::default().fg(text_dim())),
        Span::styled(sort_header(app, SortKey::Balance), Style::default().fg(text_dim())),
        Span::styled(sort_header(app, SortKey::Value), Style::default().fg(text_dim())),
        Span::styled("7d", Style::default().fg(text_dim())),
    ]);

    let rows: Vec<Row> = if assets.is_empty() {
        vec![Row::new(vec![Span::raw(""), Span::styled(
            "No tokens match your search",
            Style::default().fg(text_dim()),
        )])]
    } else {
        assets
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let star = if app.favorites.contains(token.id) {
                    Span::styled("★", Style::default().fg(warning()))
                } else {
                    Span::styled("☆", Style::default().fg(inactive()))
                };
                let trend = if token.is_up() { success() } else { danger() };
                Row::new(vec![
                    star,
                    Span::styled(format!("{} {}", token.symbol, token.name), Style::default().fg(text())),
                    Span::raw(format_usd(token.price, 2)),
                    Span::styled(format_change(token.change_24h), Style::default().fg(trend)),
                    Span::raw(format_amount(token.balance, 4)),
                    Span::styled(format_usd(token.value, 2), Style::default().fg(text())),
                    Span::styled(sparkline_glyphs(token.sparkline), Style::default().fg(trend)),
                ])
                .style(selected_style(i == app.selected_asset))
            })
            .collect()
    };

    let widths = [
        Constraint::Length(2),
        Constraint::Min(14),
        Constraint::Length(11),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(&title, true));
    f.render_widget(table, area);
}

fn draw_defi_preview(f: &mut Frame, area: Rect) {
    let mut lines = Vec::new();
    for position in POSITIONS.iter().take(DEFI_PREVIEW_LEN) {
        lines.push(Line::from(vec![
            Span::styled(position.protocol, Style::default().fg(text()).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", position.kind.label()), Style::default().fg(text_dim())),
        ]));
        lines.push(Line::from(vec![
            Span::styled(format_usd(position.tvl, 0), Style::default().fg(text())),
            Span::styled(format!("  {}% APY", format_amount(position.apy, 2)), Style::default().fg(success())),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("v", Style::default().fg(accent())),
        Span::styled(" View all positions", Style::default().fg(text_dim())),
    ]));

    let content = Paragraph::new(lines).block(panel("DeFi Positions", false));
    f.render_widget(content, area);
}

// ── Asset vault ─────────────────────────────────────────────────────────────

fn draw_vault(f: &mut Frame, app: &App, area: Rect) {
    let tokens = app.visible_vault();
    let hidden = app.hide_balances;
    let detail_height = if app.expanded_token.is_some() { 7 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(detail_height),
        ])
        .split(area);

    let total = query::total_value(fixtures::TOKENS);
    let summary = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Total Balance  ", Style::default().fg(text_dim())),
            Span::styled(
                masked(format_usd(total, 2), hidden),
                Style::default().fg(text()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("   {} assets", fixtures::TOKENS.len()), Style::default().fg(text_dim())),
        ]),
        Line::from(key_hints(&[("s", "Send"), ("r", "Receive"), ("h", "Hide balances"), ("/", "Search")])),
    ])
    .block(panel("Asset Vault", false));
    f.render_widget(summary, chunks[0]);

    let title = if app.vault_search.is_empty() {
        "Tokens".to_string()
    } else {
        format!("Tokens · \"{}\"", app.vault_search)
    };

    let rows: Vec<Row> = if tokens.is_empty() {
        vec![Row::new(vec![Span::styled("No assets found", Style::default().fg(text_dim()))])]
    } else {
        tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let expanded = app.expanded_token == Some(token.id);
                Row::new(vec![
                    Line::from(vec![
                        Span::styled(if expanded { "▾ " } else { "▸ " }, Style::default().fg(text_dim())),
                        swatch(token.color),
                        Span::styled(token.symbol, Style::default().fg(text()).add_modifier(Modifier::BOLD)),
                        Span::styled(format!(" {}", token.name), Style::default().fg(text_dim())),
                    ]),
                    Line::from(masked(format_amount(token.balance, 4), hidden)),
                    Line::from(masked(format_usd(token.value, 2), hidden)),
                    Line::from(Span::styled(
                        format_change(token.change_24h),
                        Style::default().fg(change_color(token.change_24h)),
                    )),
                ])
                .style(selected_style(i == app.selected_vault))
            })
            .collect()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Min(24),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(9),
        ],
    )
    .header(header_row(vec!["Token", "Balance", "Value", "24h"]))
    .block(panel(&title, true));
    f.render_widget(table, chunks[1]);

    if app.expanded_token.is_some() {
        let token = app.vault_token();
        let detail = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Price     ", Style::default().fg(text_dim())),
                Span::raw(format_usd(token.price, 2)),
            ]),
            Line::from(vec![
                Span::styled("Holdings  ", Style::default().fg(text_dim())),
                Span::raw(masked(
                    format!("{} {}", format_amount(token.balance, 4), token.symbol),
                    hidden,
                )),
            ]),
            Line::from(vec![
                Span::styled("7d trend  ", Style::default().fg(text_dim())),
                Span::styled(
                    sparkline_glyphs(token.sparkline),
                    Style::default().fg(change_color(token.change_24h)),
                ),
            ]),
            Line::from(key_hints(&[("s", "Send"), ("r", "Receive"), ("Enter", "Collapse")])),
        ])
        .block(panel(token.name, false));
        f.render_widget(detail, chunks[2]);
    }
}

// ── DeFi positions ──────────────────────────────────────────────────────────

fn position_detail(position: &DefiPosition) -> String {
    if let Some(pair) = position.pair {
        return pair.to_string();
    }
    match (position.supplied, position.borrowed) {
        (Some(supplied), _) => format!("Supplied {}", format_usd(supplied, 0)),
        (_, Some(borrowed)) => format!("Borrowed {}", format_usd(borrowed, 0)),
        _ => "-".to_string(),
    }
}

fn draw_defi(f: &mut Frame, app: &App, area: Rect) {
    let summary = DefiSummary::of(POSITIONS);
    let positions = app.visible_positions();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(1), Constraint::Min(5)])
        .split(area);

    let stats = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Total TVL ", Style::default().fg(text_dim())),
            Span::styled(format_usd(summary.total_tvl, 0), Style::default().fg(text()).add_modifier(Modifier::BOLD)),
            Span::styled("   Unclaimed ", Style::default().fg(text_dim())),
            Span::styled(format_usd(summary.total_fees, 2), Style::default().fg(success())),
            Span::styled("   Avg APY ", Style::default().fg(text_dim())),
            Span::styled(format!("{:.2}%", summary.average_apy), Style::default().fg(accent())),
            Span::styled("   High risk ", Style::default().fg(text_dim())),
            Span::styled(summary.high_risk.to_string(), Style::default().fg(danger())),
        ]),
        Line::from(key_hints(&[("C", "Claim all"), ("f", "Filter")])),
    ])
    .block(panel(&format!("{} positions", summary.count), false));
    f.render_widget(stats, chunks[0]);

    let chips = filter_chips(
        PositionFilter::ALL.iter().map(|p| p.label()),
        app.position_filter.label(),
    );
    f.render_widget(Paragraph::new(chips), chunks[1]);

    let rows: Vec<Row> = positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let health = match p.health_factor {
                Some(hf) => health_bar(hf, 8),
                None => Line::from(Span::styled("-", Style::default().fg(text_dim()))),
            };
            let fees = match p.unclaimed_fees {
                Some(fees) => Span::styled(format_usd(fees, 2), Style::default().fg(success())),
                None => Span::styled("-", Style::default().fg(text_dim())),
            };
            Row::new(vec![
                Line::from(Span::styled(p.protocol, Style::default().fg(text()).add_modifier(Modifier::BOLD))),
                Line::from(p.kind.label()),
                Line::from(position_detail(p)),
                Line::from(format_usd(p.tvl, 0)),
                Line::from(Span::styled(format!("{}%", format_amount(p.apy, 2)), Style::default().fg(accent()))),
                health,
                Line::from(fees),
                Line::from(risk_badge(p.risk)),
                Line::from(Span::styled(p.chain, Style::default().fg(text_dim()))),
            ])
            .style(selected_style(i == app.selected_position))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(18),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(14),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
        ],
    )
    .header(header_row(vec![
        "Protocol", "Type", "Position", "TVL", "APY", "Health", "Fees", "Risk", "Chain",
    ]))
    .block(panel(app.position_filter.label(), true));
    f.render_widget(table, chunks[2]);
}

// ── Yield strategies ────────────────────────────────────────────────────────

fn draw_yield(f: &mut Frame, app: &App, area: Rect) {
    let strategies = app.visible_strategies();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5), Constraint::Length(6)])
        .split(area);

    let mut chips = filter_chips(
        RiskFilter::ALL.iter().map(|r| r.label()),
        app.risk_filter.label(),
    );
    chips.spans.push(Span::styled("│ ", Style::default().fg(inactive())));
    chips.spans.push(Span::styled(
        if app.sort_by_apy { "Sorted by APY" } else { "Unsorted" },
        Style::default().fg(if app.sort_by_apy { accent() } else { text_dim() }),
    ));
    f.render_widget(Paragraph::new(chips), chunks[0]);

    let rows: Vec<Row> = strategies
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Row::new(vec![
                Line::from(Span::styled(s.name, Style::default().fg(text()).add_modifier(Modifier::BOLD))),
                Line::from(s.protocol),
                Line::from(Span::styled(
                    format!("{}%", format_amount(s.apy, 2)),
                    Style::default().fg(success()).add_modifier(Modifier::BOLD),
                )),
                Line::from(s.tvl),
                Line::from(risk_badge(s.risk)),
                Line::from(Span::styled(s.chain, Style::default().fg(text_dim()))),
                Line::from(Span::styled(s.tokens.join(" · "), Style::default().fg(accent_alt()))),
            ])
            .style(selected_style(i == app.selected_strategy))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(18),
        ],
    )
    .header(header_row(vec!["Strategy", "Protocol", "APY", "TVL", "Risk", "Chain", "Tokens"]))
    .block(panel("Yield Strategies", true));
    f.render_widget(table, chunks[1]);

    let detail = match strategies.get(app.selected_strategy) {
        Some(s) => vec![
            Line::from(Span::styled(s.description, Style::default().fg(text()))),
            Line::from(vec![
                Span::styled("$1,000 earns ", Style::default().fg(text_dim())),
                Span::styled(
                    format!("{}/yr", format_usd(query::estimated_yield("1000", s.apy), 2)),
                    Style::default().fg(success()),
                ),
                Span::styled("  at ", Style::default().fg(text_dim())),
                Span::styled(s.risk.label(), Style::default().fg(risk_color(s.risk))),
                Span::styled(" risk", Style::default().fg(text_dim())),
            ]),
            Line::from(key_hints(&[("Enter", "Deposit"), ("f", "Risk filter"), ("a", "Toggle APY sort")])),
        ],
        None => vec![Line::from(Span::styled(
            "No strategies match this filter",
            Style::default().fg(text_dim()),
        ))],
    };
    let detail = Paragraph::new(detail)
        .wrap(Wrap { trim: true })
        .block(panel("Details", false));
    f.render_widget(detail, chunks[2]);
}

// ── Transaction history ─────────────────────────────────────────────────────

fn tx_kind_color(kind: TxKind) -> ratatui::style::Color {
    match kind {
        TxKind::Receive | TxKind::Claim => success(),
        TxKind::Send => danger(),
        TxKind::Swap => accent(),
        TxKind::Stake | TxKind::Unstake => accent_alt(),
        TxKind::Approve => warning(),
    }
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let txs = app.visible_transactions();
    let now = Utc::now();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let chips = filter_chips(TxFilter::ALL.iter().map(|t| t.label()), app.tx_filter.label());
    f.render_widget(Paragraph::new(chips), chunks[0]);

    let rows: Vec<Row> = if txs.is_empty() {
        vec![Row::new(vec![Span::styled("No transactions", Style::default().fg(text_dim()))])]
    } else {
        txs.iter()
            .enumerate()
            .map(|(i, tx)| {
                let gas = if tx.gas_fee > 0.0 {
                    format_usd(tx.gas_fee, 2)
                } else {
                    "-".to_string()
                };
                Row::new(vec![
                    Line::from(Span::styled(tx.kind.label(), Style::default().fg(tx_kind_color(tx.kind)))),
                    Line::from(describe_transaction(tx)),
                    Line::from(Span::styled(relative_time(tx.timestamp, now), Style::default().fg(text_dim()))),
                    Line::from(status_span(tx.status)),
                    Line::from(gas),
                    Line::from(Span::styled(tx.hash, Style::default().fg(accent()))),
                ])
                .style(selected_style(i == app.selected_tx))
            })
            .collect()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Min(22),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(14),
        ],
    )
    .header(header_row(vec!["Type", "Details", "Time", "Status", "Gas", "Hash"]))
    .block(panel("Transactions", true));
    f.render_widget(table, chunks[1]);

    let total = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} transactions", txs.len()), Style::default().fg(text_dim())),
        Span::styled(" │ total gas ", Style::default().fg(text_dim())),
        Span::styled(
            format_usd(query::total_gas(TRANSACTIONS), 2),
            Style::default().fg(warning()),
        ),
    ]))
    .alignment(Alignment::Right);
    f.render_widget(total, chunks[2]);
}
