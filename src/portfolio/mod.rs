//! Portfolio records and the canned data the dashboard renders.

pub mod fixtures;
pub mod query;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub price: f64,
    pub change_24h: f64,
    pub balance: f64,
    pub value: f64,
    pub color: &'static str,
    /// Last 8 price samples, oldest first
    pub sparkline: &'static [f64],
}

impl Token {
    pub fn is_up(&self) -> bool {
        self.change_24h >= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionKind {
    Liquidity,
    Lending,
    Borrowing,
    Staking,
}

impl PositionKind {
    pub fn label(&self) -> &'static str {
        match self {
            PositionKind::Liquidity => "Liquidity",
            PositionKind::Lending => "Lending",
            PositionKind::Borrowing => "Borrowing",
            PositionKind::Staking => "Staking",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Risk {
    Low,
    Medium,
    High,
}

impl Risk {
    pub fn label(&self) -> &'static str {
        match self {
            Risk::Low => "Low",
            Risk::Medium => "Medium",
            Risk::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefiPosition {
    pub id: &'static str,
    pub protocol: &'static str,
    pub kind: PositionKind,
    pub pair: Option<&'static str>,
    pub supplied: Option<f64>,
    pub borrowed: Option<f64>,
    pub apy: f64,
    pub health_factor: Option<f64>,
    pub unclaimed_fees: Option<f64>,
    pub tvl: f64,
    pub chain: &'static str,
    pub risk: Risk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxKind {
    Swap,
    Send,
    Receive,
    Approve,
    Stake,
    Unstake,
    Claim,
}

impl TxKind {
    pub fn label(&self) -> &'static str {
        match self {
            TxKind::Swap => "Swap",
            TxKind::Send => "Send",
            TxKind::Receive => "Receive",
            TxKind::Approve => "Approve",
            TxKind::Stake => "Stake",
            TxKind::Unstake => "Unstake",
            TxKind::Claim => "Claim",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Confirmed,
    Pending,
    Failed,
}

impl TxStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TxStatus::Confirmed => "Confirmed",
            TxStatus::Pending => "Pending",
            TxStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transaction {
    pub id: &'static str,
    pub kind: TxKind,
    pub token_from: Option<&'static str>,
    pub token_to: Option<&'static str>,
    pub amount_from: Option<f64>,
    pub amount_to: Option<f64>,
    pub token: Option<&'static str>,
    pub amount: Option<f64>,
    /// RFC 3339
    pub timestamp: &'static str,
    pub hash: &'static str,
    pub status: TxStatus,
    pub gas_fee: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
    Alert,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: &'static str,
    pub title: &'static str,
    pub message: &'static str,
    pub kind: NotificationKind,
    pub time: &'static str,
    pub read: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldStrategy {
    pub id: &'static str,
    pub name: &'static str,
    pub protocol: &'static str,
    pub apy: f64,
    pub tvl: &'static str,
    pub risk: Risk,
    pub chain: &'static str,
    pub description: &'static str,
    pub tokens: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationSlice {
    pub name: &'static str,
    /// Share of the portfolio in percent
    pub percent: f64,
    pub amount: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformancePoint {
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: &'static str,
    pub change: Option<&'static str>,
    pub change_positive: bool,
    pub subtitle: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Quarter,
    Year,
    All,
}

impl TimeRange {
    pub const ALL: [TimeRange; 6] = [
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Quarter,
        TimeRange::Year,
        TimeRange::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Day => "24H",
            TimeRange::Week => "7D",
            TimeRange::Month => "30D",
            TimeRange::Quarter => "90D",
            TimeRange::Year => "1Y",
            TimeRange::All => "ALL",
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|r| r == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}
