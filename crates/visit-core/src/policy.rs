use serde::{Deserialize, Serialize};

use crate::error::{Result, VisitError};

/// First hour of the day at which scans are considered normal.
pub const DEFAULT_OPENS_AT: u32 = 6;
/// Hour from which scans are considered late.
pub const DEFAULT_CLOSES_AT: u32 = 23;

/// Building opening hours used to classify scans.
///
/// A scan is allowed when `opens_at <= hour < closes_at`, both measured on the
/// local wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    pub opens_at: u32,
    pub closes_at: u32,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            opens_at: DEFAULT_OPENS_AT,
            closes_at: DEFAULT_CLOSES_AT,
        }
    }
}

impl AccessPolicy {
    /// Build a policy and check it with [`validate`](Self::validate).
    pub fn new(opens_at: u32, closes_at: u32) -> Result<Self> {
        let policy = Self {
            opens_at,
            closes_at,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Require `opens_at < closes_at <= 24`.
    pub fn validate(&self) -> Result<()> {
        if self.closes_at > 24 {
            return Err(VisitError::InvalidPolicy(format!(
                "closes_at {} is past midnight",
                self.closes_at
            )));
        }
        if self.opens_at >= self.closes_at {
            return Err(VisitError::InvalidPolicy(format!(
                "opens_at {} >= closes_at {}",
                self.opens_at, self.closes_at
            )));
        }
        Ok(())
    }

    /// `true` when `hour` falls outside the allowed window.
    pub fn is_outside(&self, hour: u32) -> bool {
        hour < self.opens_at || hour >= self.closes_at
    }

    /// `true` when `hour` is in the early-morning part of the forbidden window.
    pub fn is_before_opening(&self, hour: u32) -> bool {
        hour < self.opens_at
    }
}
