//! Simulated wallet connection: chain registry, mock wallets, session record
//! and the connect/disconnect/switch-chain state machine.

pub mod service;
pub mod session;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub use service::WalletService;
pub use session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    Metamask,
    Walletconnect,
    Coinbase,
}

impl WalletType {
    pub const ALL: [WalletType; 3] = [
        WalletType::Metamask,
        WalletType::Walletconnect,
        WalletType::Coinbase,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WalletType::Metamask => "MetaMask",
            WalletType::Walletconnect => "WalletConnect",
            WalletType::Coinbase => "Coinbase Wallet",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WalletType::Metamask => "Connect using browser extension",
            WalletType::Walletconnect => "Scan with mobile wallet",
            WalletType::Coinbase => "Connect using Coinbase Wallet",
        }
    }

    pub fn popular(&self) -> bool {
        matches!(self, WalletType::Metamask)
    }

    pub fn mock(&self) -> &'static MockWallet {
        match self {
            WalletType::Metamask => &MOCK_WALLETS[0],
            WalletType::Walletconnect => &MOCK_WALLETS[1],
            WalletType::Coinbase => &MOCK_WALLETS[2],
        }
    }
}

impl std::str::FromStr for WalletType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metamask" => Ok(WalletType::Metamask),
            "walletconnect" => Ok(WalletType::Walletconnect),
            "coinbase" => Ok(WalletType::Coinbase),
            other => anyhow::bail!(
                "Unknown wallet '{}' (expected metamask, walletconnect or coinbase)",
                other
            ),
        }
    }
}

/// Canned account returned by the simulated connect for each wallet type
#[derive(Debug)]
pub struct MockWallet {
    pub address: &'static str,
    pub ens_name: Option<&'static str>,
    pub balance: &'static str,
}

const MOCK_WALLETS: [MockWallet; 3] = [
    MockWallet {
        address: "0x71C4a3bF8e5c1D2F9eA7b6C8d4E3f2A1b08eC4",
        ens_name: Some("kinetifi.eth"),
        balance: "17.5642",
    },
    MockWallet {
        address: "0x9aB2d8E7fC3a1b5D6e4F0c8A7B9d2E1f3C5a6B8",
        ens_name: None,
        balance: "12.3891",
    },
    MockWallet {
        address: "0x3dF7a2C8b1E9d4F6a5B0c7D8e2F1a3B5c6D7e8F",
        ens_name: Some("defi-chad.eth"),
        balance: "24.1205",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Progress of a connect attempt, shown as a checklist in the connect modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConnectStep {
    Detect,
    Approve,
    Sign,
    Done,
}

impl ConnectStep {
    pub const ALL: [ConnectStep; 4] = [
        ConnectStep::Detect,
        ConnectStep::Approve,
        ConnectStep::Sign,
        ConnectStep::Done,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConnectStep::Detect => "Detecting wallet",
            ConnectStep::Approve => "Requesting approval",
            ConnectStep::Sign => "Verifying signature",
            ConnectStep::Done => "Connected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum ChainId {
    Ethereum,
    Optimism,
    Arbitrum,
    Polygon,
    Base,
}

impl ChainId {
    pub fn as_u64(&self) -> u64 {
        match self {
            ChainId::Ethereum => 1,
            ChainId::Optimism => 10,
            ChainId::Arbitrum => 42161,
            ChainId::Polygon => 137,
            ChainId::Base => 8453,
        }
    }

    pub fn info(&self) -> &'static ChainInfo {
        match self {
            ChainId::Ethereum => &CHAINS[0],
            ChainId::Optimism => &CHAINS[1],
            ChainId::Arbitrum => &CHAINS[2],
            ChainId::Polygon => &CHAINS[3],
            ChainId::Base => &CHAINS[4],
        }
    }
}

impl TryFrom<u64> for ChainId {
    type Error = WalletError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(ChainId::Ethereum),
            10 => Ok(ChainId::Optimism),
            42161 => Ok(ChainId::Arbitrum),
            137 => Ok(ChainId::Polygon),
            8453 => Ok(ChainId::Base),
            other => Err(WalletError::UnknownChain(other)),
        }
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.as_u64()
    }
}

#[derive(Debug)]
pub struct ChainInfo {
    pub id: ChainId,
    pub name: &'static str,
    pub symbol: &'static str,
    pub rpc_url: &'static str,
    pub explorer_url: &'static str,
    pub color: &'static str,
}

/// Supported networks, in menu order
pub const CHAINS: [ChainInfo; 5] = [
    ChainInfo {
        id: ChainId::Ethereum,
        name: "Ethereum",
        symbol: "ETH",
        rpc_url: "https://eth-mainnet.g.alchemy.com",
        explorer_url: "https://etherscan.io",
        color: "#627EEA",
    },
    ChainInfo {
        id: ChainId::Optimism,
        name: "Optimism",
        symbol: "ETH",
        rpc_url: "https://mainnet.optimism.io",
        explorer_url: "https://optimistic.etherscan.io",
        color: "#FF0420",
    },
    ChainInfo {
        id: ChainId::Arbitrum,
        name: "Arbitrum",
        symbol: "ETH",
        rpc_url: "https://arb1.arbitrum.io/rpc",
        explorer_url: "https://arbiscan.io",
        color: "#28A0F0",
    },
    ChainInfo {
        id: ChainId::Polygon,
        name: "Polygon",
        symbol: "MATIC",
        rpc_url: "https://polygon-rpc.com",
        explorer_url: "https://polygonscan.com",
        color: "#8247E5",
    },
    ChainInfo {
        id: ChainId::Base,
        name: "Base",
        symbol: "ETH",
        rpc_url: "https://mainnet.base.org",
        explorer_url: "https://basescan.org",
        color: "#0052FF",
    },
];

/// The persisted record of the currently connected mock wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSession {
    pub address: String,
    pub wallet_type: WalletType,
    #[serde(deserialize_with = "chain_id_or_ethereum")]
    pub chain_id: ChainId,
    /// Milliseconds since the Unix epoch
    pub connected_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ens_name: Option<String>,
}

/// A stored session on a network we no longer list is kept and shown on Ethereum
fn chain_id_or_ethereum<'de, D>(deserializer: D) -> Result<ChainId, D::Error>
where
    D: Deserializer<'de>,
{
    let id = u64::deserialize(deserializer)?;
    Ok(ChainId::try_from(id).unwrap_or_else(|e| {
        tracing::warn!("{}, falling back to Ethereum", e);
        ChainId::Ethereum
    }))
}

impl WalletSession {
    /// `0x71C4...eC4` style abbreviation
    pub fn short_address(&self) -> String {
        let chars: Vec<char> = self.address.chars().collect();
        if chars.len() <= 10 {
            return self.address.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }

    pub fn display_name(&self) -> String {
        self.ens_name.clone().unwrap_or_else(|| self.short_address())
    }

    pub fn explorer_url(&self) -> String {
        format!("{}/address/{}", self.chain_id.info().explorer_url, self.address)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WalletError {
    #[error("User rejected the connection request.")]
    Rejected,
    #[error("A connection attempt is already in progress")]
    AlreadyConnecting,
    #[error("No wallet connected")]
    NotConnected,
    #[error("Unsupported chain id {0}")]
    UnknownChain(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(address: &str, ens: Option<&str>) -> WalletSession {
        WalletSession {
            address: address.to_string(),
            wallet_type: WalletType::Walletconnect,
            chain_id: ChainId::Ethereum,
            connected_at: 0,
            ens_name: ens.map(String::from),
        }
    }

    #[test]
    fn test_short_address() {
        let s = session("0x9aB2d8E7fC3a1b5D6e4F0c8A7B9d2E1f3C5a6B8", None);
        assert_eq!(s.short_address(), "0x9aB2...a6B8");
        assert_eq!(s.display_name(), "0x9aB2...a6B8");

        let short = session("0x1234", None);
        assert_eq!(short.short_address(), "0x1234");
    }

    #[test]
    fn test_display_name_prefers_ens() {
        let s = session("0x71C4a3bF8e5c1D2F9eA7b6C8d4E3f2A1b08eC4", Some("kinetifi.eth"));
        assert_eq!(s.display_name(), "kinetifi.eth");
    }

    #[test]
    fn test_chain_id_round_trip() {
        for chain in &CHAINS {
            assert_eq!(ChainId::try_from(chain.id.as_u64()), Ok(chain.id));
            assert_eq!(chain.id.info().name, chain.name);
        }
        assert_eq!(ChainId::try_from(56), Err(WalletError::UnknownChain(56)));
    }

    #[test]
    fn test_session_json_shape() {
        let s = WalletSession {
            address: "0xabc".to_string(),
            wallet_type: WalletType::Metamask,
            chain_id: ChainId::Arbitrum,
            connected_at: 1_700_000_000_000,
            ens_name: None,
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["walletType"], "metamask");
        assert_eq!(json["chainId"], 42161);
        assert_eq!(json["connectedAt"], 1_700_000_000_000i64);
        assert!(json.get("ensName").is_none());

        let bsc = r#"{"address":"0x1","walletType":"metamask","chainId":56,"connectedAt":0}"#;
        let s: WalletSession = serde_json::from_str(bsc).unwrap();
        assert_eq!(s.chain_id, ChainId::Ethereum);

        let bad = r#"{"address":"0x1","walletType":"metamask","chainId":"one","connectedAt":0}"#;
        assert!(serde_json::from_str::<WalletSession>(bad).is_err());
    }

    #[test]
    fn test_wallet_type_from_str() {
        assert_eq!("MetaMask".parse::<WalletType>().unwrap(), WalletType::Metamask);
        assert_eq!("coinbase".parse::<WalletType>().unwrap(), WalletType::Coinbase);
        assert!("phantom".parse::<WalletType>().is_err());
    }

    #[test]
    fn test_mock_wallets() {
        assert_eq!(WalletType::Metamask.mock().ens_name, Some("kinetifi.eth"));
        assert_eq!(WalletType::Walletconnect.mock().ens_name, None);
        assert_eq!(WalletType::Coinbase.mock().balance, "24.1205");
    }
}
