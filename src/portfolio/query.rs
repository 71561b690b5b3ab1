//! Filters, sorts and reductions over the portfolio records.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;

use super::{
    DefiPosition, Notification, PositionKind, Risk, Token, Transaction, TxKind, YieldStrategy,
};

// ── Assets ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Price,
    Change24h,
    Balance,
    Value,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Name,
        SortKey::Price,
        SortKey::Change24h,
        SortKey::Balance,
        SortKey::Value,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "Token",
            SortKey::Price => "Price",
            SortKey::Change24h => "24h",
            SortKey::Balance => "Balance",
            SortKey::Value => "Value",
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|k| k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSort {
    pub key: SortKey,
    pub dir: SortDir,
}

impl Default for AssetSort {
    fn default() -> Self {
        Self {
            key: SortKey::Value,
            dir: SortDir::Desc,
        }
    }
}

impl AssetSort {
    /// Same column flips direction; a new column starts descending
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.dir = match self.dir {
                SortDir::Asc => SortDir::Desc,
                SortDir::Desc => SortDir::Asc,
            };
        } else {
            self.key = key;
            self.dir = SortDir::Desc;
        }
    }

    fn compare(&self, a: &Token, b: &Token) -> Ordering {
        let ord = match self.key {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Price => a.price.total_cmp(&b.price),
            SortKey::Change24h => a.change_24h.total_cmp(&b.change_24h),
            SortKey::Balance => a.balance.total_cmp(&b.balance),
            SortKey::Value => a.value.total_cmp(&b.value),
        };
        match self.dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    }
}

/// Case-insensitive substring match on name or symbol; empty query matches everything
pub fn matches_search(token: &Token, query: &str) -> bool {
    let q = query.to_lowercase();
    q.is_empty()
        || token.name.to_lowercase().contains(&q)
        || token.symbol.to_lowercase().contains(&q)
}

pub fn search_tokens<'a>(tokens: &'a [Token], query: &str) -> Vec<&'a Token> {
    tokens.iter().filter(|t| matches_search(t, query)).collect()
}

/// Search then sort. Ties keep fixture order.
pub fn assets_view<'a>(tokens: &'a [Token], query: &str, sort: AssetSort) -> Vec<&'a Token> {
    let mut result = search_tokens(tokens, query);
    result.sort_by(|a, b| sort.compare(a, b));
    result
}

pub fn total_value(tokens: &[Token]) -> f64 {
    tokens.iter().map(|t| t.value).sum()
}

/// Starred token ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Favorites(HashSet<String>);

impl Favorites {
    pub fn new<I: IntoIterator<Item = String>>(ids: I) -> Self {
        Self(ids.into_iter().collect())
    }

    /// Returns whether the id is a favourite afterwards
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.0.iter().cloned().collect();
        ids.sort();
        ids
    }
}

/// Sparkline samples scaled into 0..=1. A flat series maps to all zeros.
pub fn normalize_sparkline(data: &[f64]) -> Vec<f64> {
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    data.iter().map(|v| (v - min) / range).collect()
}

const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn sparkline_glyphs(data: &[f64]) -> String {
    normalize_sparkline(data)
        .into_iter()
        .map(|v| {
            let idx = (v * (SPARK_GLYPHS.len() - 1) as f64).round() as usize;
            SPARK_GLYPHS[idx.min(SPARK_GLYPHS.len() - 1)]
        })
        .collect()
}

// ── DeFi positions ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFilter {
    All,
    Only(PositionKind),
}

impl PositionFilter {
    pub const ALL: [PositionFilter; 5] = [
        PositionFilter::All,
        PositionFilter::Only(PositionKind::Liquidity),
        PositionFilter::Only(PositionKind::Lending),
        PositionFilter::Only(PositionKind::Borrowing),
        PositionFilter::Only(PositionKind::Staking),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PositionFilter::All => "All Positions",
            PositionFilter::Only(kind) => kind.label(),
        }
    }

    pub fn next(&self) -> Self {
        cycle(&Self::ALL, self)
    }

    pub fn matches(&self, position: &DefiPosition) -> bool {
        match self {
            PositionFilter::All => true,
            PositionFilter::Only(kind) => position.kind == *kind,
        }
    }
}

pub fn filter_positions(positions: &[DefiPosition], filter: PositionFilter) -> Vec<&DefiPosition> {
    positions.iter().filter(|p| filter.matches(p)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefiSummary {
    pub count: usize,
    pub total_tvl: f64,
    pub total_fees: f64,
    pub average_apy: f64,
    pub high_risk: usize,
}

impl DefiSummary {
    pub fn of(positions: &[DefiPosition]) -> Self {
        let count = positions.len();
        let average_apy = if count == 0 {
            0.0
        } else {
            positions.iter().map(|p| p.apy).sum::<f64>() / count as f64
        };
        Self {
            count,
            total_tvl: positions.iter().map(|p| p.tvl).sum(),
            total_fees: positions.iter().filter_map(|p| p.unclaimed_fees).sum(),
            average_apy,
            high_risk: positions.iter().filter(|p| p.risk == Risk::High).count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthLevel {
    Healthy,
    Caution,
    Danger,
}

impl HealthLevel {
    pub fn of(health_factor: f64) -> Self {
        if health_factor >= 2.0 {
            HealthLevel::Healthy
        } else if health_factor >= 1.5 {
            HealthLevel::Caution
        } else {
            HealthLevel::Danger
        }
    }
}

/// Health bar fill in 0..=1, saturating at a factor of 4
pub fn health_fill(health_factor: f64) -> f64 {
    (health_factor / 4.0).clamp(0.0, 1.0)
}

// ── Yield strategies ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskFilter {
    All,
    Only(Risk),
}

impl RiskFilter {
    pub const ALL: [RiskFilter; 4] = [
        RiskFilter::All,
        RiskFilter::Only(Risk::Low),
        RiskFilter::Only(Risk::Medium),
        RiskFilter::Only(Risk::High),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RiskFilter::All => "All",
            RiskFilter::Only(risk) => risk.label(),
        }
    }

    pub fn next(&self) -> Self {
        cycle(&Self::ALL, self)
    }
}

pub fn filter_strategies(
    strategies: &[YieldStrategy],
    filter: RiskFilter,
    sort_by_apy: bool,
) -> Vec<&YieldStrategy> {
    let mut result: Vec<&YieldStrategy> = strategies
        .iter()
        .filter(|s| match filter {
            RiskFilter::All => true,
            RiskFilter::Only(risk) => s.risk == risk,
        })
        .collect();
    if sort_by_apy {
        result.sort_by(|a, b| b.apy.total_cmp(&a.apy));
    }
    result
}

/// Amount the deposit dialog's MAX button fills in
pub const MAX_DEPOSIT: &str = "10000";

/// Yearly yield for a typed deposit amount. Unparsable input counts as zero.
pub fn estimated_yield(amount: &str, apy: f64) -> f64 {
    let amount: f64 = amount.trim().parse().unwrap_or(0.0);
    if !amount.is_finite() {
        return 0.0;
    }
    amount * apy / 100.0
}

// ── Transactions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxFilter {
    All,
    Only(TxKind),
}

impl TxFilter {
    pub const ALL: [TxFilter; 7] = [
        TxFilter::All,
        TxFilter::Only(TxKind::Swap),
        TxFilter::Only(TxKind::Send),
        TxFilter::Only(TxKind::Receive),
        TxFilter::Only(TxKind::Stake),
        TxFilter::Only(TxKind::Claim),
        TxFilter::Only(TxKind::Approve),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TxFilter::All => "All",
            TxFilter::Only(kind) => kind.label(),
        }
    }

    pub fn next(&self) -> Self {
        cycle(&Self::ALL, self)
    }
}

pub fn filter_transactions(txs: &[Transaction], filter: TxFilter) -> Vec<&Transaction> {
    txs.iter()
        .filter(|tx| match filter {
            TxFilter::All => true,
            TxFilter::Only(kind) => tx.kind == kind,
        })
        .collect()
}

pub fn total_gas(txs: &[Transaction]) -> f64 {
    txs.iter().map(|tx| tx.gas_fee).sum()
}

pub fn describe_transaction(tx: &Transaction) -> String {
    let token = tx.token.unwrap_or("?");
    match tx.kind {
        TxKind::Swap => format!(
            "{} {} → {} {}",
            format_amount(tx.amount_from.unwrap_or(0.0), 4),
            tx.token_from.unwrap_or("?"),
            format_amount(tx.amount_to.unwrap_or(0.0), 4),
            tx.token_to.unwrap_or("?"),
        ),
        TxKind::Approve => format!("{} (Unlimited)", token),
        _ => format!("{} {}", format_amount(tx.amount.unwrap_or(0.0), 4), token),
    }
}

/// "Just now", "5h ago", "3d ago", then "Feb 14"
pub fn relative_time(timestamp: &str, now: DateTime<Utc>) -> String {
    let date = match DateTime::parse_from_rfc3339(timestamp) {
        Ok(d) => d.with_timezone(&Utc),
        Err(_) => return timestamp.to_string(),
    };
    let hours = (now - date).num_hours();
    let days = hours / 24;

    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        date.format("%b %-d").to_string()
    }
}

// ── Notifications ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Inbox {
    pub items: Vec<Notification>,
}

impl Inbox {
    pub fn new(items: Vec<Notification>) -> Self {
        Self { items }
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub fn mark_read(&mut self, id: &str) {
        if let Some(n) = self.items.iter_mut().find(|n| n.id == id) {
            n.read = true;
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.items {
            n.read = true;
        }
    }
}

// ── Formatting ──────────────────────────────────────────────────────────────

/// `$57,036.59` style with a fixed number of decimals
pub fn format_usd(value: f64, decimals: usize) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(&format!("{:.*}", decimals, value.abs())))
}

/// Up to `max_decimals` fraction digits, trailing zeros trimmed, grouped
pub fn format_amount(value: f64, max_decimals: usize) -> String {
    let mut s = format!("{:.*}", max_decimals, value.abs());
    if s.contains('.') {
        s = s.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    let sign = if value < 0.0 && s != "0" { "-" } else { "" };
    format!("{}{}", sign, group_thousands(&s))
}

/// `+4.2%` / `-1.3%`
pub fn format_change(change: f64) -> String {
    let sign = if change > 0.0 { "+" } else { "" };
    format!("{}{}%", sign, format_amount(change, 2))
}

fn group_thousands(number: &str) -> String {
    let (int_part, frac_part) = match number.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (number, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: &T) -> T {
    let idx = all.iter().position(|x| x == current).unwrap_or(0);
    all[(idx + 1) % all.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::fixtures::{self, POSITIONS, STRATEGIES, TOKENS, TRANSACTIONS};
    use chrono::TimeZone;

    fn symbols(tokens: &[&Token]) -> Vec<&'static str> {
        tokens.iter().map(|t| t.symbol).collect()
    }

    #[test]
    fn test_default_sort_is_value_desc() {
        let view = assets_view(TOKENS, "", AssetSort::default());
        assert_eq!(
            symbols(&view),
            vec!["ETH", "USDC", "WBTC", "LINK", "AAVE", "UNI", "LDO", "ARB"]
        );
    }

    #[test]
    fn test_search_matches_name_or_symbol() {
        let sort = AssetSort::default();
        assert_eq!(symbols(&assets_view(TOKENS, "coin", sort)), vec!["USDC", "WBTC"]);
        assert_eq!(symbols(&assets_view(TOKENS, "ARB", sort)), vec!["ARB"]);
        assert!(assets_view(TOKENS, "doge", sort).is_empty());
    }

    #[test]
    fn test_search_whitespace_is_literal() {
        let sort = AssetSort::default();
        let mut spaced = symbols(&assets_view(TOKENS, " ", sort));
        spaced.sort();
        assert_eq!(spaced, vec!["LDO", "USDC", "WBTC"]);
        assert!(assets_view(TOKENS, " link", sort).is_empty());
    }

    #[test]
    fn test_sort_toggle() {
        let mut sort = AssetSort::default();
        sort.toggle(SortKey::Value);
        assert_eq!(sort.dir, SortDir::Asc);

        sort.toggle(SortKey::Name);
        assert_eq!(sort, AssetSort { key: SortKey::Name, dir: SortDir::Desc });

        sort.toggle(SortKey::Name);
        let view = assets_view(TOKENS, "", sort);
        assert_eq!(view.first().map(|t| t.name), Some("Aave"));
        assert_eq!(view.last().map(|t| t.name), Some("Wrapped Bitcoin"));
    }

    #[test]
    fn test_sort_is_reversible() {
        let asc = AssetSort { key: SortKey::Change24h, dir: SortDir::Asc };
        let desc = AssetSort { key: SortKey::Change24h, dir: SortDir::Desc };
        let mut up = assets_view(TOKENS, "", asc);
        let down = assets_view(TOKENS, "", desc);
        up.reverse();
        assert_eq!(symbols(&up), symbols(&down));
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let tied = [TOKENS[5], TOKENS[6], TOKENS[7]]
            .map(|t| Token { price: 1.0, ..t });
        let asc = assets_view(&tied, "", AssetSort { key: SortKey::Price, dir: SortDir::Asc });
        let desc = assets_view(&tied, "", AssetSort { key: SortKey::Price, dir: SortDir::Desc });
        assert_eq!(symbols(&asc), vec!["UNI", "LDO", "ARB"]);
        assert_eq!(symbols(&desc), vec!["UNI", "LDO", "ARB"]);
    }

    #[test]
    fn test_favorites_toggle() {
        let mut favs = Favorites::new(["1".to_string(), "3".to_string()]);
        assert!(favs.contains("1"));
        assert!(!favs.toggle("1"));
        assert!(favs.toggle("2"));
        assert_eq!(favs.to_sorted_vec(), vec!["2", "3"]);
    }

    #[test]
    fn test_sparkline_normalization() {
        let eth = normalize_sparkline(TOKENS[0].sparkline);
        assert_eq!(eth.first().copied(), Some(0.0));
        assert_eq!(eth.last().copied(), Some(1.0));

        let flat = normalize_sparkline(TOKENS[1].sparkline);
        assert!(flat.iter().all(|v| *v == 0.0));
        assert_eq!(sparkline_glyphs(TOKENS[1].sparkline), "▁▁▁▁▁▁▁▁");
        assert_eq!(sparkline_glyphs(&[0.0, 1.0]), "▁█");
    }

    #[test]
    fn test_position_filter_returns_exact_subset() {
        for filter in PositionFilter::ALL {
            let filtered = filter_positions(POSITIONS, filter);
            let expected: Vec<&DefiPosition> =
                POSITIONS.iter().filter(|p| filter.matches(p)).collect();
            assert_eq!(filtered, expected);
        }
        let liquidity = filter_positions(POSITIONS, PositionFilter::Only(PositionKind::Liquidity));
        assert_eq!(
            liquidity.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec!["1", "4", "6", "8"]
        );
        assert_eq!(filter_positions(POSITIONS, PositionFilter::All).len(), 8);
    }

    #[test]
    fn test_defi_summary() {
        let summary = DefiSummary::of(POSITIONS);
        assert_eq!(summary.count, 8);
        assert_eq!(summary.total_tvl, 98500.0);
        assert!((summary.total_fees - 617.0).abs() < 1e-9);
        assert!((summary.average_apy - 8.6625).abs() < 1e-9);
        assert_eq!(summary.high_risk, 1);

        let empty = DefiSummary::of(&[]);
        assert_eq!(empty.average_apy, 0.0);
    }

    #[test]
    fn test_health_levels() {
        assert_eq!(HealthLevel::of(2.45), HealthLevel::Healthy);
        assert_eq!(HealthLevel::of(2.0), HealthLevel::Healthy);
        assert_eq!(HealthLevel::of(1.7), HealthLevel::Caution);
        assert_eq!(HealthLevel::of(1.2), HealthLevel::Danger);
        assert_eq!(health_fill(2.0), 0.5);
        assert_eq!(health_fill(9.0), 1.0);
    }

    #[test]
    fn test_strategy_filter_and_sort() {
        let all = filter_strategies(STRATEGIES, RiskFilter::All, true);
        let apys: Vec<f64> = all.iter().map(|s| s.apy).collect();
        assert_eq!(apys, vec![22.4, 18.5, 8.5, 5.8, 4.2, 3.9]);

        let unsorted = filter_strategies(STRATEGIES, RiskFilter::All, false);
        assert_eq!(unsorted.first().map(|s| s.name), Some("ETH Staking"));

        let medium = filter_strategies(STRATEGIES, RiskFilter::Only(Risk::Medium), true);
        assert_eq!(
            medium.iter().map(|s| s.name).collect::<Vec<_>>(),
            vec!["LP Farming", "Leveraged Yield"]
        );
    }

    #[test]
    fn test_estimated_yield() {
        assert!((estimated_yield(MAX_DEPOSIT, 22.4) - 2240.0).abs() < 1e-9);
        assert_eq!(estimated_yield("abc", 5.0), 0.0);
        assert_eq!(estimated_yield("", 5.0), 0.0);
    }

    #[test]
    fn test_transaction_filter() {
        let swaps = filter_transactions(TRANSACTIONS, TxFilter::Only(TxKind::Swap));
        assert_eq!(swaps.iter().map(|t| t.id).collect::<Vec<_>>(), vec!["1", "5", "8"]);
        assert_eq!(filter_transactions(TRANSACTIONS, TxFilter::All).len(), 8);
        assert!(filter_transactions(TRANSACTIONS, TxFilter::Only(TxKind::Unstake)).is_empty());
        assert!((total_gas(TRANSACTIONS) - 53.45).abs() < 1e-9);
    }

    #[test]
    fn test_describe_transaction() {
        assert_eq!(describe_transaction(&TRANSACTIONS[0]), "2.5 ETH → 8,114.55 USDC");
        assert_eq!(describe_transaction(&TRANSACTIONS[5]), "USDC (Unlimited)");
        assert_eq!(describe_transaction(&TRANSACTIONS[3]), "0.15 WBTC");
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2026, 2, 15, 0, 0, 0).unwrap();
        assert_eq!(relative_time("2026-02-14T23:30:00Z", now), "Just now");
        assert_eq!(relative_time("2026-02-14T18:15:00Z", now), "5h ago");
        assert_eq!(relative_time("2026-02-12T20:10:00Z", now), "2d ago");
        assert_eq!(relative_time("2026-02-01T10:00:00Z", now), "Feb 1");
        assert_eq!(relative_time("garbage", now), "garbage");
    }

    #[test]
    fn test_inbox() {
        let mut inbox = Inbox::new(fixtures::notifications());
        assert_eq!(inbox.unread_count(), 3);
        inbox.mark_read("2");
        assert_eq!(inbox.unread_count(), 2);
        inbox.mark_read("missing");
        assert_eq!(inbox.unread_count(), 2);
        inbox.mark_all_read();
        assert_eq!(inbox.unread_count(), 0);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_usd(57036.59, 2), "$57,036.59");
        assert_eq!(format_usd(98500.0, 0), "$98,500");
        assert_eq!(format_usd(617.0, 2), "$617.00");
        assert_eq!(format_usd(1234567.891, 2), "$1,234,567.89");
        assert_eq!(format_amount(0.2987, 4), "0.2987");
        assert_eq!(format_amount(42750.0, 4), "42,750");
        assert_eq!(format_amount(999999.0, 4), "999,999");
        assert_eq!(format_change(4.2), "+4.2%");
        assert_eq!(format_change(-1.3), "-1.3%");
        assert_eq!(format_change(0.0), "0%");
    }

    #[test]
    fn test_filters_cycle() {
        assert_eq!(PositionFilter::All.next(), PositionFilter::Only(PositionKind::Liquidity));
        assert_eq!(PositionFilter::Only(PositionKind::Staking).next(), PositionFilter::All);
        assert_eq!(RiskFilter::Only(Risk::High).next(), RiskFilter::All);
        assert_eq!(TxFilter::Only(TxKind::Approve).next(), TxFilter::All);
        assert_eq!(SortKey::Value.next(), SortKey::Name);
    }
}
