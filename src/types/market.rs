use serde::{Deserialize, Serialize};

/// Percent price changes over rolling windows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h6: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    #[serde(default)]
    pub h24: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Liquidity {
    #[serde(default)]
    pub usd: f64,
}

/// Buy/sell transaction counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TxnCounts {
    pub buys: u64,
    pub sells: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Txns {
    pub h24: TxnCounts,
}

/// Point-in-time market data for the token, as served by the dex endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    /// USD price, transmitted as a decimal string.
    pub price_usd: String,
    pub price_change_24h: f64,
    #[serde(default)]
    pub price_change: PriceChange,
    #[serde(default)]
    pub volume: Volume,
    #[serde(default)]
    pub liquidity: Liquidity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txns: Option<Txns>,
}

impl MarketSnapshot {
    /// Parsed USD price, if the string is a finite number.
    pub fn price(&self) -> Option<f64> {
        self.price_usd
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
    }

    /// Share of buys among 24h transactions, in percent.
    /// Missing or empty transaction counts read as an even 50%.
    pub fn buy_ratio(&self) -> f64 {
        match self.txns {
            Some(Txns { h24 }) if h24.buys > 0 || h24.sells > 0 => {
                let buys = h24.buys as f64;
                buys / (buys + h24.sells as f64) * 100.0
            }
            _ => 50.0,
        }
    }

    /// 24h volume relative to a baseline.
    pub fn volume_ratio(&self, baseline: f64) -> f64 {
        if baseline > 0.0 {
            self.volume.h24 / baseline
        } else {
            0.0
        }
    }

    /// Pool liquidity relative to a baseline.
    pub fn liquidity_ratio(&self, baseline: f64) -> f64 {
        if baseline > 0.0 {
            self.liquidity.usd / baseline
        } else {
            0.0
        }
    }

    /// Short-term acceleration: the 1h change minus the average hourly
    /// change over 6h. `None` when either window is missing.
    pub fn momentum(&self) -> Option<f64> {
        let h1 = self.price_change.h1?;
        let h6 = self.price_change.h6?;
        Some(h1 - h6 / 6.0)
    }
}
