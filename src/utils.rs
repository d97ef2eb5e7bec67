use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use time::OffsetDateTime;

use crate::error::Result;

pub fn unix_timestamp() -> Result<u64> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    u64::try_from(now).map_err(|_| "system clock is before 1970".into())
}

/// Splits a CAIP-2 chain id into namespace and reference
///
/// `chia:testnet` becomes `("chia", Some("testnet"))`.
pub fn split_chain_id(chain_id: &str) -> (&str, Option<&str>) {
    match chain_id.split_once(':') {
        Some((namespace, reference)) => (namespace, Some(reference)),
        None => (chain_id, None),
    }
}

/// Holds a busy flag up until dropped, so the flag also comes back down when
/// the future owning the guard is cancelled.
#[derive(Debug)]
pub(crate) struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    pub(crate) fn raise(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self {
            flag: Arc::clone(flag),
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_guard_lowers_flag_on_drop() {
        let flag = Arc::new(AtomicBool::new(false));
        let guard = BusyGuard::raise(&flag);
        assert!(flag.load(Ordering::SeqCst));
        drop(guard);
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_split_chain_id() {
        assert_eq!(split_chain_id("chia:mainnet"), ("chia", Some("mainnet")));
        assert_eq!(split_chain_id("chia"), ("chia", None));
    }

    #[test]
    fn test_unix_timestamp_is_recent() {
        // 2023-01-01
        assert!(unix_timestamp().unwrap() > 1_672_531_200);
    }
}
