use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mexican Stock Exchange (BMV) candidates. Static, no discovery.
pub const BMV_UNIVERSE: &[&str] = &[
    "WALMEX.MX",
    "AMXB.MX",
    "GFNORTEO.MX",
    "GMEXICOB.MX",
    "FEMSAUBD.MX",
    "CEMEXCPO.MX",
    "TLEVISACPO.MX",
    "ASURB.MX",
    "GAPB.MX",
    "ALPEKA.MX",
    "BBAJIOO.MX",
    "AC.MX",
    "GRUMAB.MX",
    "PINFRA.MX",
    "OMAB.MX",
    "LABB.MX",
];

/// Used when the S&P 500 constituent list cannot be fetched.
pub const US_FALLBACK_UNIVERSE: &[&str] =
    &["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META"];

/// Market whose universe is scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    /// Mexico (BMV), static list
    Mex,
    /// United States (S&P 500), discovered dynamically
    Us,
}

impl Market {
    /// Whether the universe is a fixed list rather than fetched.
    pub fn is_static(&self) -> bool {
        matches!(self, Market::Mex)
    }

    /// The list to fall back on when discovery fails (the full list for static markets).
    pub fn fallback_universe(&self) -> Vec<String> {
        let list = match self {
            Market::Mex => BMV_UNIVERSE,
            Market::Us => US_FALLBACK_UNIVERSE,
        };
        list.iter().map(|s| s.to_string()).collect()
    }
}

impl FromStr for Market {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mex" | "mx" | "bmv" | "mexico" => Ok(Market::Mex),
            "us" | "usa" | "eeuu" | "sp500" => Ok(Market::Us),
            _ => anyhow::bail!("Invalid market: {}. Must be 'MEX' or 'US'", s),
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::Mex => write!(f, "MEX"),
            Market::Us => write!(f, "US"),
        }
    }
}
