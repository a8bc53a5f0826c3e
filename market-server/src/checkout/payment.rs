//! Payment reference minting and the stubbed gateway redirect
//!
//! References correlate a gateway transaction with exactly one order. The
//! format is collision-resistant by construction and backed by a uniqueness
//! constraint on the orders table as defense in depth.

use rand::Rng;
use shared::util::{now_millis, to_base36};

/// Prefix for gateway-initialized payment references
pub const PAYMENT_REF_PREFIX: &str = "PSK";

/// Mint a payment reference: `<prefix>-<millis>-<random base36>`
pub fn generate_payment_ref(prefix: &str) -> String {
    let ts = now_millis();
    let rand: u64 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{}-{}-{}", prefix, ts, to_base36(rand))
}

/// Stubbed gateway redirect handle for a fresh initialization
///
/// The production gateway is not integrated here; the front-end treats this
/// as an opaque redirect target.
pub fn mock_authorization_url(reference: &str) -> String {
    format!("about:blank#paystack-mock-{reference}")
}

/// Stubbed gateway redirect handle for a re-initialization
pub fn mock_reinit_url(reference: &str) -> String {
    format!("about:blank#paystack-reinit-{reference}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_format() {
        let reference = generate_payment_ref(PAYMENT_REF_PREFIX);
        let parts: Vec<&str> = reference.splitn(3, '-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "PSK");
        assert!(parts[1].parse::<i64>().unwrap() > 0);
        assert!(!parts[2].is_empty());
        assert!(parts[2].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_references_distinct() {
        let a = generate_payment_ref(PAYMENT_REF_PREFIX);
        let b = generate_payment_ref(PAYMENT_REF_PREFIX);
        assert_ne!(a, b);
    }

    #[test]
    fn test_mock_urls_embed_reference() {
        let url = mock_authorization_url("PSK-1-abc");
        assert!(url.contains("PSK-1-abc"));
        let url = mock_reinit_url("PSK-1-abc");
        assert!(url.contains("reinit"));
        assert!(url.contains("PSK-1-abc"));
    }
}
