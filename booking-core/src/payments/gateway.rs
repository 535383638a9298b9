//! Mock payment provider
//!
//! Approves every charge except a deny-listed instrument fingerprint and
//! issues provider-style transaction ids. A real gateway integration is out
//! of scope; this mirrors the provider sandbox's declined-card rule.

use rand::Rng;

/// Instrument fingerprints ending in this suffix are declined
const DECLINED_SUFFIX: &str = "4444";

#[derive(Debug, Clone)]
pub struct ChargeOutcome {
    pub transaction_id: String,
    pub approved: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MockGateway;

impl MockGateway {
    pub fn charge(&self, instrument_fingerprint: &str) -> ChargeOutcome {
        let transaction_id = format!(
            "mock_txn_{}",
            rand::thread_rng().gen_range(100_000..1_000_000)
        );
        if instrument_fingerprint.ends_with(DECLINED_SUFFIX) {
            ChargeOutcome {
                transaction_id,
                approved: false,
                message: "payment declined by issuer".into(),
            }
        } else {
            ChargeOutcome {
                transaction_id,
                approved: true,
                message: "payment completed".into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_listed_fingerprint_is_declined() {
        let gateway = MockGateway;
        assert!(!gateway.charge("4444").approved);
        assert!(gateway.charge("1234").approved);
    }

    #[test]
    fn transaction_ids_carry_the_mock_prefix() {
        let outcome = MockGateway.charge("1234");
        assert!(outcome.transaction_id.starts_with("mock_txn_"));
    }
}
