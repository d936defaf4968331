//! Property-Based Tests — Domain Layer Invariants
//!
//! Uses `proptest` to verify that the conversion policy and address
//! parsing maintain their invariants across random inputs.

use proptest::prelude::*;

use bitmon_rewards_api::domain::conversion::{
    to_base_units, ConversionPolicy, ConversionQuote,
};
use bitmon_rewards_api::domain::player::{PlayerAddress, PointCategory};
use bitmon_rewards_api::domain::points::PointBalance;

// ── Conversion Policy Properties ────────────────────────────

proptest! {
    /// Floor-division identity: units * rate + remainder == balance,
    /// and the remainder is always below the rate.
    #[test]
    fn conversion_identity_holds(
        pvp in 0u64..10_000_000,
        pvp_rate in 1u64..100_000,
    ) {
        let policy = ConversionPolicy::new(pvp_rate, 5000);
        let quote = policy.quote(PointBalance { pvp, pve: 0 });

        match quote {
            ConversionQuote::Eligible { units, remainder, .. } => {
                prop_assert!(pvp >= pvp_rate);
                prop_assert_eq!(units * pvp_rate + remainder, pvp);
                prop_assert!(remainder < pvp_rate);
                prop_assert!(units >= 1);
            }
            ConversionQuote::Ineligible => {
                prop_assert!(pvp < pvp_rate);
            }
        }
    }

    /// PvP is always preferred when it reaches its rate, regardless of
    /// how large the PvE balance is.
    #[test]
    fn pvp_preference_is_absolute(
        pvp in 1000u64..1_000_000,
        pve in 0u64..1_000_000_000,
    ) {
        let policy = ConversionPolicy::default();
        let quote = policy.quote(PointBalance { pvp, pve });
        match quote {
            ConversionQuote::Eligible { category, .. } => {
                prop_assert_eq!(category, PointCategory::Pvp);
            }
            ConversionQuote::Ineligible => prop_assert!(false, "pvp >= rate must be eligible"),
        }
    }

    /// Adding points never makes an eligible balance ineligible.
    #[test]
    fn eligibility_is_monotonic(
        pvp in 0u64..100_000,
        extra in 0u64..100_000,
    ) {
        let policy = ConversionPolicy::default();
        let before = policy.quote(PointBalance { pvp, pve: 0 });
        let after = policy.quote(PointBalance { pvp: pvp + extra, pve: 0 });

        if matches!(before, ConversionQuote::Eligible { .. }) {
            prop_assert!(
                matches!(after, ConversionQuote::Eligible { .. }),
                "eligible balance became ineligible after adding points"
            );
        }
    }

    /// Base-unit scaling at 18 decimals never silently truncates: it
    /// either multiplies exactly or reports overflow.
    #[test]
    fn base_unit_scaling_is_exact(units in 0u64..1_000_000_000) {
        let scaled = to_base_units(units, 18).unwrap();
        prop_assert_eq!(scaled, u128::from(units) * 1_000_000_000_000_000_000u128);
        prop_assert_eq!(scaled % 1_000_000_000_000_000_000u128, 0);
    }
}

// ── Address Parsing Properties ──────────────────────────────

proptest! {
    /// Any 40-hex-digit payload parses, normalizes to lowercase, and
    /// re-parses to the same value (idempotent normalization).
    #[test]
    fn address_parse_normalizes_idempotently(bytes in proptest::array::uniform20(0u8..)) {
        let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
        let raw = format!("0x{hex}");

        let parsed = PlayerAddress::parse(&raw).unwrap();
        prop_assert_eq!(parsed.as_str(), format!("0x{}", hex.to_ascii_lowercase()));

        let reparsed = PlayerAddress::parse(parsed.as_str()).unwrap();
        prop_assert_eq!(parsed, reparsed);
    }

    /// Payloads of the wrong length never parse.
    #[test]
    fn address_wrong_length_rejected(len in 0usize..80) {
        prop_assume!(len != 40);
        let raw = format!("0x{}", "a".repeat(len));
        prop_assert!(PlayerAddress::parse(&raw).is_err());
    }
}
