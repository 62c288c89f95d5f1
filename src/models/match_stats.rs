//! Per-match statistics as received from FACEIT and after normalization.
//!
//! FACEIT encodes every stat as a string (`"Kills": "21"`, `"K/D Ratio": "1.4"`),
//! and occasionally as a bare JSON number. [`MatchStatRecord`] keeps those loose
//! values as they arrived; [`MatchStats`] is the strictly typed form produced
//! once at ingress. Arithmetic only ever happens on `MatchStats`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::MatchResult;

/// A field that failed normalization.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid value for {field}: {value:?}")]
pub struct RecordError {
    pub field: &'static str,
    pub value: String,
}

impl RecordError {
    fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// A loosely typed scalar from the upstream JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseValue {
    fn describe(&self) -> String {
        match self {
            LooseValue::Int(i) => i.to_string(),
            LooseValue::Float(f) => f.to_string(),
            LooseValue::Text(s) => s.clone(),
        }
    }

    /// Parse as a non-negative integer count.
    pub fn to_count(&self, field: &'static str) -> Result<u32, RecordError> {
        let bad = || RecordError::new(field, self.describe());
        match self {
            LooseValue::Int(i) => u32::try_from(*i).map_err(|_| bad()),
            LooseValue::Float(f) => {
                if f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64 {
                    Ok(*f as u32)
                } else {
                    Err(bad())
                }
            }
            LooseValue::Text(s) => s.trim().parse::<u32>().map_err(|_| bad()),
        }
    }

    /// Parse as a non-negative, finite decimal.
    pub fn to_ratio(&self, field: &'static str) -> Result<f64, RecordError> {
        let value = match self {
            LooseValue::Int(i) => *i as f64,
            LooseValue::Float(f) => *f,
            LooseValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| RecordError::new(field, s.clone()))?,
        };
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(RecordError::new(field, self.describe()))
        }
    }

    /// Parse as an integer-like result code.
    pub fn to_code(&self, field: &'static str) -> Result<i64, RecordError> {
        let bad = || RecordError::new(field, self.describe());
        match self {
            LooseValue::Int(i) => Ok(*i),
            LooseValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(*f as i64),
            LooseValue::Float(_) => Err(bad()),
            LooseValue::Text(s) => s.trim().parse::<i64>().map_err(|_| bad()),
        }
    }
}

impl From<&str> for LooseValue {
    fn from(s: &str) -> Self {
        LooseValue::Text(s.to_string())
    }
}

/// One match's statistics for one player, exactly as FACEIT sent them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStatRecord {
    #[serde(rename = "Kills", default)]
    pub kills: Option<LooseValue>,

    #[serde(rename = "Deaths", default)]
    pub deaths: Option<LooseValue>,

    #[serde(rename = "Assists", default)]
    pub assists: Option<LooseValue>,

    #[serde(rename = "MVPs", default)]
    pub mvps: Option<LooseValue>,

    #[serde(rename = "Headshots", default)]
    pub headshots: Option<LooseValue>,

    #[serde(rename = "K/D Ratio", default)]
    pub kd_ratio: Option<LooseValue>,

    #[serde(rename = "K/R Ratio", default)]
    pub kr_ratio: Option<LooseValue>,

    #[serde(rename = "Result", default)]
    pub result: Option<LooseValue>,

    #[serde(rename = "Match Id", default)]
    pub match_id: Option<String>,
}

fn required<'a>(
    value: &'a Option<LooseValue>,
    field: &'static str,
) -> Result<&'a LooseValue, RecordError> {
    value
        .as_ref()
        .ok_or_else(|| RecordError::new(field, "<missing>"))
}

/// Strictly typed per-match statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchStats {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub mvps: u32,
    pub headshots: u32,
    pub kd_ratio: f64,
    pub kr_ratio: f64,
    pub result: MatchResult,
    pub match_id: String,
}

impl MatchStats {
    /// Headshots per kill, or `None` when the player had no kills.
    pub fn headshot_ratio(&self) -> Option<f64> {
        if self.kills == 0 {
            None
        } else {
            Some(self.headshots as f64 / self.kills as f64)
        }
    }
}

impl TryFrom<&MatchStatRecord> for MatchStats {
    type Error = RecordError;

    fn try_from(raw: &MatchStatRecord) -> Result<Self, Self::Error> {
        let kills = required(&raw.kills, "Kills")?.to_count("Kills")?;
        let headshots = required(&raw.headshots, "Headshots")?.to_count("Headshots")?;
        if headshots > kills {
            return Err(RecordError::new(
                "Headshots",
                format!("{} exceeds {} kills", headshots, kills),
            ));
        }

        Ok(Self {
            kills,
            deaths: required(&raw.deaths, "Deaths")?.to_count("Deaths")?,
            assists: required(&raw.assists, "Assists")?.to_count("Assists")?,
            mvps: required(&raw.mvps, "MVPs")?.to_count("MVPs")?,
            headshots,
            kd_ratio: required(&raw.kd_ratio, "K/D Ratio")?.to_ratio("K/D Ratio")?,
            kr_ratio: required(&raw.kr_ratio, "K/R Ratio")?.to_ratio("K/R Ratio")?,
            result: MatchResult::from_code(required(&raw.result, "Result")?.to_code("Result")?),
            match_id: raw.match_id.clone().unwrap_or_default(),
        })
    }
}
