//! Small building blocks shared by the dashboard views

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

use super::{accent, danger, inactive, success, text, text_dim, warning};
use crate::portfolio::query::{health_fill, HealthLevel};
use crate::portfolio::{Risk, TxStatus};
use crate::theme::hex_or;

/// Bordered panel; the focused one gets the accent border and a bold title
pub fn panel(title: &str, focused: bool) -> Block<'static> {
    let border_color = if focused { accent() } else { inactive() };
    let title_style = if focused {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(text_dim())
    };

    Block::default()
        .title(Span::styled(format!(" {} ", title), title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

pub fn risk_color(risk: Risk) -> Color {
    match risk {
        Risk::Low => success(),
        Risk::Medium => warning(),
        Risk::High => danger(),
    }
}

pub fn risk_badge(risk: Risk) -> Span<'static> {
    Span::styled(
        format!("● {}", risk.label()),
        Style::default().fg(risk_color(risk)),
    )
}

pub fn status_span(status: TxStatus) -> Span<'static> {
    let color = match status {
        TxStatus::Confirmed => success(),
        TxStatus::Pending => warning(),
        TxStatus::Failed => danger(),
    };
    Span::styled(status.label(), Style::default().fg(color))
}

pub fn change_color(change: f64) -> Color {
    if change >= 0.0 {
        success()
    } else {
        danger()
    }
}

pub fn health_color(health_factor: f64) -> Color {
    match HealthLevel::of(health_factor) {
        HealthLevel::Healthy => success(),
        HealthLevel::Caution => warning(),
        HealthLevel::Danger => danger(),
    }
}

/// `2.45 ██████░░░░` with the bar filled to hf/4
pub fn health_bar(health_factor: f64, width: usize) -> Line<'static> {
    let filled = (health_fill(health_factor) * width as f64).round() as usize;
    let color = health_color(health_factor);
    Line::from(vec![
        Span::styled(
            format!("{:.2} ", health_factor),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled("█".repeat(filled), Style::default().fg(color)),
        Span::styled(
            "░".repeat(width.saturating_sub(filled)),
            Style::default().fg(inactive()),
        ),
    ])
}

/// Horizontal percentage bar for allocation slices
pub fn share_bar(percent: f64, width: usize, color: Color) -> Span<'static> {
    let filled = ((percent / 100.0).clamp(0.0, 1.0) * width as f64).round() as usize;
    Span::styled(
        format!("{}{}", "▰".repeat(filled), "▱".repeat(width.saturating_sub(filled))),
        Style::default().fg(color),
    )
}

/// `[All] Liquidity Lending ...` with the active option highlighted
pub fn filter_chips<'a, I>(labels: I, active: &str) -> Line<'a>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut spans = Vec::new();
    for label in labels {
        if label == active {
            spans.push(Span::styled(
                format!("[{}]", label),
                Style::default().fg(accent()).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(format!(" {} ", label), Style::default().fg(text_dim())));
        }
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Brand-coloured dot in front of a token or chain name
pub fn swatch(hex: &str) -> Span<'static> {
    Span::styled("● ", Style::default().fg(hex_or(hex, text())))
}

/// Replace a figure with dots when balances are hidden
pub fn masked(value: String, hidden: bool) -> String {
    if hidden {
        "••••••".to_string()
    } else {
        value
    }
}

/// `key action │ ` pairs for footers and dialog hints
pub fn key_hints(hints: &[(&'static str, &'static str)]) -> Vec<Span<'static>> {
    hints
        .iter()
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_health_bar_fill() {
        assert_eq!(line_text(&health_bar(2.0, 10)), "2.00 █████░░░░░");
        assert_eq!(line_text(&health_bar(8.0, 4)), "8.00 ████");
    }

    #[test]
    fn test_filter_chips_mark_active() {
        let line = filter_chips(["All", "Low", "High"], "Low");
        assert_eq!(line_text(&line), " All  [Low]  High  ");
    }

    #[test]
    fn test_masked() {
        assert_eq!(masked("$1.00".to_string(), false), "$1.00");
        assert_eq!(masked("$1.00".to_string(), true), "••••••");
    }
}
