//! ============================================================================
//! Reward Tiers - Eligibility scoring and tier classification
//! ============================================================================
//! Pure mapping from a wallet's total on-chain transaction count to a reward
//! tier. No I/O, no failure modes.
//! ============================================================================

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Every 6 on-chain transactions count as one eligible transaction
pub const ELIGIBLE_TX_DIVISOR: u64 = 6;

/// A wallet must exceed this many eligible transactions to qualify
pub const MIN_ELIGIBLE_TX: u64 = 100;

/// Reward tier derived from the eligible transaction count.
/// Bands are inclusive and non-overlapping; on the wire a tier is its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// 101-250 eligible transactions
    Tier1,
    /// 251-400 eligible transactions
    Tier2,
    /// 401-550 eligible transactions
    Tier3,
    /// 551-700 eligible transactions
    Tier4,
    /// 701-850 eligible transactions
    Tier5,
    /// 851+ eligible transactions
    Tier6,
}

impl Tier {
    /// Determine the tier for an eligible transaction count.
    /// Returns None below the qualification threshold.
    pub fn from_eligible_count(eligible_tx: u64) -> Option<Self> {
        match eligible_tx {
            101..=250 => Some(Tier::Tier1),
            251..=400 => Some(Tier::Tier2),
            401..=550 => Some(Tier::Tier3),
            551..=700 => Some(Tier::Tier4),
            701..=850 => Some(Tier::Tier5),
            851.. => Some(Tier::Tier6),
            _ => None,
        }
    }

    /// Tier number as reported to callers (1-6)
    pub fn number(self) -> u8 {
        match self {
            Tier::Tier1 => 1,
            Tier::Tier2 => 2,
            Tier::Tier3 => 3,
            Tier::Tier4 => 4,
            Tier::Tier5 => 5,
            Tier::Tier6 => 6,
        }
    }

    /// Inverse of [`Tier::number`]
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Tier::Tier1),
            2 => Some(Tier::Tier2),
            3 => Some(Tier::Tier3),
            4 => Some(Tier::Tier4),
            5 => Some(Tier::Tier5),
            6 => Some(Tier::Tier6),
            _ => None,
        }
    }

    /// Minimum eligible transaction count for this tier
    pub fn min_eligible_tx(self) -> u64 {
        match self {
            Tier::Tier1 => 101,
            Tier::Tier2 => 251,
            Tier::Tier3 => 401,
            Tier::Tier4 => 551,
            Tier::Tier5 => 701,
            Tier::Tier6 => 851,
        }
    }
}

// Tiers travel as plain integers in API payloads and stored records.
impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TierVisitor;

        impl Visitor<'_> for TierVisitor {
            type Value = Tier;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a tier number between 1 and 6")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Tier, E> {
                u8::try_from(v)
                    .ok()
                    .and_then(Tier::from_number)
                    .ok_or_else(|| E::custom(format!("invalid tier number: {}", v)))
            }
        }

        deserializer.deserialize_u64(TierVisitor)
    }
}

/// Outcome of one eligibility classification.
/// Computed once per check, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    /// Total on-chain transactions found for the wallet
    pub total_tx: u64,
    /// total_tx / 6, floor division
    pub total_eligible_tx: u64,
    pub eligible: bool,
    /// Reward tier, absent when the wallet does not qualify
    pub tier: Option<Tier>,
}

/// Classify a total transaction count into an eligibility decision.
pub fn classify(total_tx: u64) -> EligibilityResult {
    let total_eligible_tx = total_tx / ELIGIBLE_TX_DIVISOR;
    let eligible = total_eligible_tx > MIN_ELIGIBLE_TX;
    let tier = if eligible {
        Tier::from_eligible_count(total_eligible_tx)
    } else {
        None
    };

    EligibilityResult {
        total_tx,
        total_eligible_tx,
        eligible,
        tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_threshold_is_ineligible() {
        // floor(605 / 6) = 100, which is not > 100
        for total_tx in [0, 1, 5, 6, 600, 605] {
            let result = classify(total_tx);
            assert!(!result.eligible, "totalTx {} should be ineligible", total_tx);
            assert_eq!(result.tier, None);
        }
    }

    #[test]
    fn test_first_eligible_count() {
        let result = classify(606);
        assert_eq!(result.total_eligible_tx, 101);
        assert!(result.eligible);
        assert_eq!(result.tier, Some(Tier::Tier1));
    }

    #[test]
    fn test_band_boundaries() {
        let cases = [
            (250, Some(Tier::Tier1)),
            (251, Some(Tier::Tier2)),
            (400, Some(Tier::Tier2)),
            (401, Some(Tier::Tier3)),
            (550, Some(Tier::Tier3)),
            (551, Some(Tier::Tier4)),
            (700, Some(Tier::Tier4)),
            (701, Some(Tier::Tier5)),
            (850, Some(Tier::Tier5)),
            (851, Some(Tier::Tier6)),
            (10_000, Some(Tier::Tier6)),
        ];
        for (eligible_tx, expected) in cases {
            // Feed a totalTx that floors to exactly this eligible count
            let result = classify(eligible_tx * ELIGIBLE_TX_DIVISOR);
            assert_eq!(result.total_eligible_tx, eligible_tx);
            assert_eq!(result.tier, expected, "eligible count {}", eligible_tx);
        }
    }

    #[test]
    fn test_tier_monotonic_in_total_tx() {
        let mut last_tier = 0u8;
        for total_tx in 0..=6000u64 {
            let tier = classify(total_tx).tier.map(Tier::number).unwrap_or(0);
            assert!(
                tier >= last_tier,
                "tier decreased at totalTx {}: {} -> {}",
                total_tx,
                last_tier,
                tier
            );
            last_tier = tier;
        }
    }

    #[test]
    fn test_end_to_end_examples() {
        let zero = classify(0);
        assert_eq!(zero.total_eligible_tx, 0);
        assert!(!zero.eligible);
        assert_eq!(zero.tier, None);

        let whale = classify(5106);
        assert_eq!(whale.total_eligible_tx, 851);
        assert!(whale.eligible);
        assert_eq!(whale.tier, Some(Tier::Tier6));
    }

    #[test]
    fn test_tier_number_round_trip() {
        for n in 1..=6u8 {
            assert_eq!(Tier::from_number(n).unwrap().number(), n);
        }
        assert_eq!(Tier::from_number(0), None);
        assert_eq!(Tier::from_number(7), None);
    }

    #[test]
    fn test_tier_serializes_as_integer() {
        let result = classify(606);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["tier"], serde_json::json!(1));

        let ineligible = classify(0);
        let json = serde_json::to_value(&ineligible).unwrap();
        assert_eq!(json["tier"], serde_json::Value::Null);

        let parsed: EligibilityResult =
            serde_json::from_value(serde_json::to_value(&result).unwrap()).unwrap();
        assert_eq!(parsed, result);
    }
}
