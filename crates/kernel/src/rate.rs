use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Upper bound on ticks per second.
///
/// Serialized as a number, or `null` for unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateCap {
    Fps(u32),
    Unbounded,
}

impl RateCap {
    /// Minimum wall-clock time per tick, `None` when unbounded.
    pub fn frame_budget(self) -> Option<Duration> {
        match self {
            Self::Fps(fps) if fps > 0 => Some(Duration::from_secs_f64(1.0 / fps as f64)),
            _ => None,
        }
    }

    pub fn is_unbounded(self) -> bool {
        self.frame_budget().is_none()
    }
}

impl fmt::Display for RateCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fps(fps) => write!(f, "{fps}"),
            Self::Unbounded => f.write_str("INF"),
        }
    }
}

/// Errors from building a rate-cap table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateCapError {
    #[error("rate-cap table is empty")]
    Empty,
    #[error("rate cap of 0 fps at position {0}; use null for unbounded")]
    ZeroFps(usize),
}

/// Fixed ordered list of allowed rate caps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RateCap>", into = "Vec<RateCap>")]
pub struct RateCapTable {
    caps: Vec<RateCap>,
}

impl RateCapTable {
    pub fn new(caps: Vec<RateCap>) -> Result<Self, RateCapError> {
        if caps.is_empty() {
            return Err(RateCapError::Empty);
        }
        if let Some(pos) = caps.iter().position(|c| *c == RateCap::Fps(0)) {
            return Err(RateCapError::ZeroFps(pos));
        }
        Ok(Self { caps })
    }

    pub fn len(&self) -> usize {
        self.caps.len()
    }

    /// Never true: construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.caps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<RateCap> {
        self.caps.get(index).copied()
    }

    /// Index of the first unbounded entry, if any.
    pub fn unbounded_index(&self) -> Option<usize> {
        self.caps.iter().position(|c| c.is_unbounded())
    }

    pub fn as_slice(&self) -> &[RateCap] {
        &self.caps
    }
}

impl Default for RateCapTable {
    fn default() -> Self {
        Self {
            caps: vec![
                RateCap::Fps(30),
                RateCap::Fps(60),
                RateCap::Fps(120),
                RateCap::Fps(144),
                RateCap::Fps(200),
                RateCap::Fps(240),
                RateCap::Unbounded,
            ],
        }
    }
}

impl TryFrom<Vec<RateCap>> for RateCapTable {
    type Error = RateCapError;

    fn try_from(caps: Vec<RateCap>) -> Result<Self, Self::Error> {
        Self::new(caps)
    }
}

impl From<RateCapTable> for Vec<RateCap> {
    fn from(table: RateCapTable) -> Self {
        table.caps
    }
}
