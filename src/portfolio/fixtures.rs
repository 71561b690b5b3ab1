use super::{
    AllocationSlice, DefiPosition, MetricCard, Notification, NotificationKind, PerformancePoint,
    PositionKind, Risk, TimeRange, Token, Transaction, TxKind, TxStatus, YieldStrategy,
};

pub const TOKENS: &[Token] = &[
    Token {
        id: "1",
        name: "Ethereum",
        symbol: "ETH",
        price: 3245.82,
        change_24h: 4.2,
        balance: 17.56,
        value: 57036.59,
        color: "#627EEA",
        sparkline: &[3100.0, 3150.0, 3120.0, 3180.0, 3200.0, 3170.0, 3220.0, 3245.0],
    },
    Token {
        id: "2",
        name: "USD Coin",
        symbol: "USDC",
        price: 1.00,
        change_24h: 0.01,
        balance: 42750.00,
        value: 42750.00,
        color: "#2775CA",
        sparkline: &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    },
    Token {
        id: "3",
        name: "Wrapped Bitcoin",
        symbol: "WBTC",
        price: 95420.50,
        change_24h: 2.8,
        balance: 0.2987,
        value: 28502.16,
        color: "#F7931A",
        sparkline: &[93000.0, 93500.0, 94200.0, 93800.0, 94800.0, 95100.0, 94900.0, 95420.0],
    },
    Token {
        id: "4",
        name: "Chainlink",
        symbol: "LINK",
        price: 18.42,
        change_24h: -1.3,
        balance: 245.5,
        value: 4522.11,
        color: "#2A5ADA",
        sparkline: &[19.2, 18.9, 18.6, 18.8, 18.5, 18.3, 18.5, 18.42],
    },
    Token {
        id: "5",
        name: "Aave",
        symbol: "AAVE",
        price: 285.30,
        change_24h: 5.7,
        balance: 12.8,
        value: 3651.84,
        color: "#B6509E",
        sparkline: &[265.0, 270.0, 275.0, 272.0, 280.0, 278.0, 283.0, 285.0],
    },
    Token {
        id: "6",
        name: "Uniswap",
        symbol: "UNI",
        price: 12.85,
        change_24h: -0.8,
        balance: 180.0,
        value: 2313.00,
        color: "#FF007A",
        sparkline: &[13.2, 13.0, 12.9, 13.1, 12.8, 12.9, 12.85, 12.85],
    },
    Token {
        id: "7",
        name: "Lido DAO",
        symbol: "LDO",
        price: 2.34,
        change_24h: 3.1,
        balance: 850.0,
        value: 1989.00,
        color: "#00A3FF",
        sparkline: &[2.2, 2.25, 2.28, 2.3, 2.27, 2.31, 2.33, 2.34],
    },
    Token {
        id: "8",
        name: "Arbitrum",
        symbol: "ARB",
        price: 1.42,
        change_24h: 6.2,
        balance: 1200.0,
        value: 1704.00,
        color: "#28A0F0",
        sparkline: &[1.3, 1.32, 1.35, 1.33, 1.38, 1.4, 1.41, 1.42],
    },
];

pub const POSITIONS: &[DefiPosition] = &[
    DefiPosition {
        id: "1",
        protocol: "Uniswap V3",
        kind: PositionKind::Liquidity,
        pair: Some("ETH/USDC"),
        supplied: None,
        borrowed: None,
        apy: 18.5,
        health_factor: None,
        unclaimed_fees: Some(342.50),
        tvl: 24500.0,
        chain: "Ethereum",
        risk: Risk::Medium,
    },
    DefiPosition {
        id: "2",
        protocol: "Aave V3",
        kind: PositionKind::Lending,
        pair: None,
        supplied: Some(15000.0),
        borrowed: None,
        apy: 4.2,
        health_factor: Some(2.45),
        unclaimed_fees: None,
        tvl: 15000.0,
        chain: "Ethereum",
        risk: Risk::Low,
    },
    DefiPosition {
        id: "3",
        protocol: "Aave V3",
        kind: PositionKind::Borrowing,
        pair: None,
        supplied: None,
        borrowed: Some(5200.0),
        apy: 3.8,
        health_factor: Some(2.45),
        unclaimed_fees: None,
        tvl: 5200.0,
        chain: "Ethereum",
        risk: Risk::Low,
    },
    DefiPosition {
        id: "4",
        protocol: "Curve Finance",
        kind: PositionKind::Liquidity,
        pair: Some("stETH/ETH"),
        supplied: None,
        borrowed: None,
        apy: 5.8,
        health_factor: None,
        unclaimed_fees: Some(128.90),
        tvl: 18200.0,
        chain: "Ethereum",
        risk: Risk::Low,
    },
    DefiPosition {
        id: "5",
        protocol: "Lido",
        kind: PositionKind::Staking,
        pair: None,
        supplied: Some(8500.0),
        borrowed: None,
        apy: 3.9,
        health_factor: None,
        unclaimed_fees: None,
        tvl: 8500.0,
        chain: "Ethereum",
        risk: Risk::Low,
    },
    DefiPosition {
        id: "6",
        protocol: "GMX",
        kind: PositionKind::Liquidity,
        pair: Some("GLP Pool"),
        supplied: None,
        borrowed: None,
        apy: 22.4,
        health_factor: None,
        unclaimed_fees: Some(89.20),
        tvl: 6800.0,
        chain: "Arbitrum",
        risk: Risk::High,
    },
    DefiPosition {
        id: "7",
        protocol: "Compound V3",
        kind: PositionKind::Lending,
        pair: None,
        supplied: Some(8000.0),
        borrowed: None,
        apy: 3.5,
        health_factor: Some(3.12),
        unclaimed_fees: None,
        tvl: 8000.0,
        chain: "Ethereum",
        risk: Risk::Low,
    },
    DefiPosition {
        id: "8",
        protocol: "Balancer V2",
        kind: PositionKind::Liquidity,
        pair: Some("wstETH/WETH"),
        supplied: None,
        borrowed: None,
        apy: 7.2,
        health_factor: None,
        unclaimed_fees: Some(56.40),
        tvl: 12300.0,
        chain: "Ethereum",
        risk: Risk::Medium,
    },
];

const fn transfer(
    id: &'static str,
    kind: TxKind,
    token: &'static str,
    amount: f64,
    timestamp: &'static str,
    hash: &'static str,
    status: TxStatus,
    gas_fee: f64,
) -> Transaction {
    Transaction {
        id,
        kind,
        token_from: None,
        token_to: None,
        amount_from: None,
        amount_to: None,
        token: Some(token),
        amount: Some(amount),
        timestamp,
        hash,
        status,
        gas_fee,
    }
}

const fn swap(
    id: &'static str,
    from: (&'static str, f64),
    to: (&'static str, f64),
    timestamp: &'static str,
    hash: &'static str,
    status: TxStatus,
    gas_fee: f64,
) -> Transaction {
    Transaction {
        id,
        kind: TxKind::Swap,
        token_from: Some(from.0),
        token_to: Some(to.0),
        amount_from: Some(from.1),
        amount_to: Some(to.1),
        token: None,
        amount: None,
        timestamp,
        hash,
        status,
        gas_fee,
    }
}

pub const TRANSACTIONS: &[Transaction] = &[
    swap("1", ("ETH", 2.5), ("USDC", 8114.55), "2026-02-14T22:30:00Z", "0x8f3a...b2c1", TxStatus::Confirmed, 12.45),
    transfer("2", TxKind::Stake, "ETH", 5.0, "2026-02-14T18:15:00Z", "0x4d2e...a8f3", TxStatus::Confirmed, 8.20),
    transfer("3", TxKind::Claim, "UNI", 45.2, "2026-02-13T14:22:00Z", "0x7b1c...d4e2", TxStatus::Confirmed, 5.80),
    transfer("4", TxKind::Receive, "WBTC", 0.15, "2026-02-13T09:45:00Z", "0x2a9f...c7b4", TxStatus::Confirmed, 0.0),
    swap("5", ("USDC", 3000.0), ("AAVE", 10.52), "2026-02-12T20:10:00Z", "0x5e8d...f1a6", TxStatus::Confirmed, 15.30),
    transfer("6", TxKind::Approve, "USDC", 999999.0, "2026-02-12T20:08:00Z", "0x1c4b...e9d3", TxStatus::Confirmed, 3.10),
    transfer("7", TxKind::Send, "ETH", 1.2, "2026-02-11T16:30:00Z", "0x9a3e...b5c8", TxStatus::Confirmed, 6.50),
    swap("8", ("ARB", 500.0), ("ETH", 0.22), "2026-02-10T11:20:00Z", "0x6d7f...a2e1", TxStatus::Pending, 2.10),
];

pub fn notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: "1",
            title: "Price Alert",
            message: "ETH has crossed $3,200. Your target price has been reached.",
            kind: NotificationKind::Success,
            time: "5m ago",
            read: false,
        },
        Notification {
            id: "2",
            title: "Health Factor Warning",
            message: "Your Aave V3 position health factor is approaching 2.0. Consider adding collateral.",
            kind: NotificationKind::Warning,
            time: "1h ago",
            read: false,
        },
        Notification {
            id: "3",
            title: "Yield Opportunity",
            message: "New high-yield pool available on Curve: stETH/ETH at 8.2% APY.",
            kind: NotificationKind::Info,
            time: "3h ago",
            read: false,
        },
        Notification {
            id: "4",
            title: "Transaction Confirmed",
            message: "Your swap of 2.5 ETH to USDC has been confirmed on-chain.",
            kind: NotificationKind::Success,
            time: "5h ago",
            read: true,
        },
        Notification {
            id: "5",
            title: "Gas Price Drop",
            message: "Ethereum gas prices have dropped to 12 Gwei. Good time for transactions.",
            kind: NotificationKind::Info,
            time: "8h ago",
            read: true,
        },
    ]
}

pub const STRATEGIES: &[YieldStrategy] = &[
    YieldStrategy {
        id: "1",
        name: "ETH Staking",
        protocol: "Lido",
        apy: 3.9,
        tvl: "$14.2B",
        risk: Risk::Low,
        chain: "Ethereum",
        description: "Stake ETH and receive stETH while earning staking rewards.",
        tokens: &["ETH", "stETH"],
    },
    YieldStrategy {
        id: "2",
        name: "Stable Yield",
        protocol: "Aave V3",
        apy: 4.2,
        tvl: "$8.5B",
        risk: Risk::Low,
        chain: "Ethereum",
        description: "Supply USDC to earn lending interest with minimal risk.",
        tokens: &["USDC"],
    },
    YieldStrategy {
        id: "3",
        name: "LP Farming",
        protocol: "Uniswap V3",
        apy: 18.5,
        tvl: "$3.2B",
        risk: Risk::Medium,
        chain: "Ethereum",
        description: "Provide concentrated liquidity to ETH/USDC pair.",
        tokens: &["ETH", "USDC"],
    },
    YieldStrategy {
        id: "4",
        name: "GLP Vault",
        protocol: "GMX",
        apy: 22.4,
        tvl: "$420M",
        risk: Risk::High,
        chain: "Arbitrum",
        description: "Earn fees from perpetual trading as a liquidity provider.",
        tokens: &["GLP"],
    },
    YieldStrategy {
        id: "5",
        name: "Curve Pool",
        protocol: "Curve Finance",
        apy: 5.8,
        tvl: "$2.1B",
        risk: Risk::Low,
        chain: "Ethereum",
        description: "Provide liquidity to the stETH/ETH pool for stable yields.",
        tokens: &["stETH", "ETH"],
    },
    YieldStrategy {
        id: "6",
        name: "Leveraged Yield",
        protocol: "Compound V3",
        apy: 8.5,
        tvl: "$1.8B",
        risk: Risk::Medium,
        chain: "Ethereum",
        description: "Supply and borrow in a loop for enhanced COMP rewards.",
        tokens: &["USDC", "COMP"],
    },
];

pub const ALLOCATION: &[AllocationSlice] = &[
    AllocationSlice { name: "ETH", percent: 40.0, amount: 57000.0, color: "#627EEA" },
    AllocationSlice { name: "USDC", percent: 30.0, amount: 42750.0, color: "#2775CA" },
    AllocationSlice { name: "WBTC", percent: 20.0, amount: 28500.0, color: "#F7931A" },
    AllocationSlice { name: "Others", percent: 10.0, amount: 14250.0, color: "#00D4FF" },
];

pub const METRICS: &[MetricCard] = &[
    MetricCard {
        title: "Net Worth",
        value: "$142,500",
        change: Some("+$4,720"),
        change_positive: true,
        subtitle: "vs. last week",
    },
    MetricCard {
        title: "24h Change",
        value: "+3.4%",
        change: Some("+$4,845"),
        change_positive: true,
        subtitle: "across all assets",
    },
    MetricCard {
        title: "Active DeFi Positions",
        value: "8",
        change: None,
        change_positive: true,
        subtitle: "across 5 protocols",
    },
    MetricCard {
        title: "Estimated APY",
        value: "12.4%",
        change: Some("Medium Risk"),
        change_positive: true,
        subtitle: "weighted average",
    },
];

const fn p(label: &'static str, value: f64) -> PerformancePoint {
    PerformancePoint { label, value }
}

const PERFORMANCE_DAY: &[PerformancePoint] = &[
    p("00:00", 139800.0), p("04:00", 140200.0), p("08:00", 139500.0), p("12:00", 141000.0),
    p("16:00", 140800.0), p("20:00", 141500.0), p("Now", 142500.0),
];

const PERFORMANCE_WEEK: &[PerformancePoint] = &[
    p("Feb 8", 136500.0), p("Feb 9", 137800.0), p("Feb 10", 138200.0), p("Feb 11", 137500.0),
    p("Feb 12", 139100.0), p("Feb 13", 140800.0), p("Feb 14", 142500.0),
];

const PERFORMANCE_MONTH: &[PerformancePoint] = &[
    p("Jan 15", 125000.0), p("Jan 17", 128500.0), p("Jan 19", 126200.0), p("Jan 21", 131000.0),
    p("Jan 23", 129800.0), p("Jan 25", 133500.0), p("Jan 27", 130200.0), p("Jan 29", 135800.0),
    p("Jan 31", 132400.0), p("Feb 02", 137200.0), p("Feb 04", 134100.0), p("Feb 06", 138900.0),
    p("Feb 08", 136500.0), p("Feb 10", 140200.0), p("Feb 12", 139100.0), p("Feb 14", 142500.0),
];

const PERFORMANCE_QUARTER: &[PerformancePoint] = &[
    p("Nov", 98000.0), p("Dec 1", 105000.0), p("Dec 15", 112000.0), p("Jan 1", 118000.0),
    p("Jan 15", 125000.0), p("Feb 1", 135000.0), p("Feb 14", 142500.0),
];

const PERFORMANCE_YEAR: &[PerformancePoint] = &[
    p("Mar", 52000.0), p("May", 68000.0), p("Jul", 85000.0), p("Sep", 78000.0),
    p("Nov", 98000.0), p("Jan", 125000.0), p("Feb", 142500.0),
];

const PERFORMANCE_ALL: &[PerformancePoint] = &[
    p("2024", 25000.0), p("Q2", 42000.0), p("Q3", 58000.0), p("Q4", 78000.0),
    p("2025", 95000.0), p("Q2", 118000.0), p("Now", 142500.0),
];

pub fn performance(range: TimeRange) -> &'static [PerformancePoint] {
    match range {
        TimeRange::Day => PERFORMANCE_DAY,
        TimeRange::Week => PERFORMANCE_WEEK,
        TimeRange::Month => PERFORMANCE_MONTH,
        TimeRange::Quarter => PERFORMANCE_QUARTER,
        TimeRange::Year => PERFORMANCE_YEAR,
        TimeRange::All => PERFORMANCE_ALL,
    }
}
