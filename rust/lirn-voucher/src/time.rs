//! Caller-supplied time.
//!
//! Verification never reads a clock. Whatever environment is checking a
//! voucher (a chain's block time, a service's wall clock, a test) supplies
//! the current [`Timestamp`] explicitly, which keeps verification
//! deterministic and reproducible.

use lirn_abi::Uint256;
use serde::{Deserialize, Serialize};
use std::{fmt, time::SystemTime};

/// Seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// A timestamp `seconds` after the Unix epoch.
    #[must_use]
    pub const fn from_unix(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Seconds since the Unix epoch.
    #[must_use]
    pub const fn to_unix(&self) -> u64 {
        self.0
    }

    /// Whether this instant falls strictly before `expiration`.
    ///
    /// A voucher is valid up to, but not including, its expiration instant.
    #[must_use]
    pub fn is_before(&self, expiration: &Uint256) -> bool {
        Uint256::from(self.0) < *expiration
    }
}

impl From<u64> for Timestamp {
    fn from(seconds: u64) -> Self {
        Self(seconds)
    }
}

impl From<Timestamp> for Uint256 {
    fn from(value: Timestamp) -> Self {
        Uint256::from(value.0)
    }
}

/// Times before the epoch are rejected.
impl TryFrom<SystemTime> for Timestamp {
    type Error = std::time::SystemTimeError;

    fn try_from(time: SystemTime) -> Result<Self, Self::Error> {
        Ok(Self(time.duration_since(SystemTime::UNIX_EPOCH)?.as_secs()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn it_is_strictly_before_expiration() {
        let expiration = Uint256::from(1_667_060_841u64);
        assert!(Timestamp::from_unix(1_667_060_840).is_before(&expiration));
        assert!(!Timestamp::from_unix(1_667_060_841).is_before(&expiration));
        assert!(!Timestamp::from_unix(1_667_060_842).is_before(&expiration));
    }

    #[test]
    fn it_is_before_expirations_beyond_u64() {
        assert!(Timestamp::from_unix(u64::MAX).is_before(&Uint256::MAX));
        assert!(!Timestamp::from_unix(0).is_before(&Uint256::ZERO));
    }

    #[test]
    fn it_converts_from_system_time() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_664_219_311);
        assert_eq!(
            Timestamp::try_from(time).ok(),
            Some(Timestamp::from_unix(1_664_219_311))
        );

        let before_epoch = SystemTime::UNIX_EPOCH - Duration::from_secs(1);
        assert!(Timestamp::try_from(before_epoch).is_err());
    }
}
