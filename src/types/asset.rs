use serde::Serialize;

/// A tradable crypto asset known to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Asset {
    /// Display name used in requests and responses (e.g. "Bitcoin").
    pub name: &'static str,
    /// Base symbol (e.g. "BTC").
    pub symbol: &'static str,
    /// Yahoo Finance ticker (e.g. "BTC-USD").
    pub ticker: &'static str,
}

impl Asset {
    /// Look up a catalog asset by name or symbol, ignoring case.
    pub fn lookup(query: &str) -> Option<&'static Asset> {
        let query = query.trim();
        SUPPORTED_ASSETS.iter().find(|a| {
            a.name.eq_ignore_ascii_case(query) || a.symbol.eq_ignore_ascii_case(query)
        })
    }

    /// Model file name for this asset (e.g. "btc.json").
    pub fn model_file(&self) -> String {
        format!("{}.json", self.symbol.to_lowercase())
    }
}

/// Every asset a model can be bound to.
pub const SUPPORTED_ASSETS: &[Asset] = &[
    Asset { name: "Bitcoin", symbol: "BTC", ticker: "BTC-USD" },
    Asset { name: "Ethereum", symbol: "ETH", ticker: "ETH-USD" },
    Asset { name: "BNB", symbol: "BNB", ticker: "BNB-USD" },
    Asset { name: "Solana", symbol: "SOL", ticker: "SOL-USD" },
    Asset { name: "Dogecoin", symbol: "DOGE", ticker: "DOGE-USD" },
];
