//! # Delivery Charges
//!
//! Distance-tiered extra charge added to an order at checkout. Partners
//! configure a short ascending list of tiers; anything past the last tier
//! pays the last tier plus a per-started-km surcharge.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeTier {
    pub up_to_km: f64,
    pub charge: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargePolicy {
    /// Ascending by `up_to_km`.
    pub tiers: Vec<ChargeTier>,
    /// Charged per started km past the last tier bound.
    pub per_extra_km: u32,
}

impl Default for ChargePolicy {
    fn default() -> Self {
        Self {
            tiers: vec![
                ChargeTier { up_to_km: 4.0, charge: 20 },
                ChargeTier { up_to_km: 8.0, charge: 40 },
                ChargeTier { up_to_km: 12.0, charge: 60 },
            ],
            per_extra_km: 10,
        }
    }
}

impl ChargePolicy {
    /// Extra charge for a delivery over `distance_km`. Zero or negative
    /// distances pay the base tier; an empty policy charges nothing.
    pub fn extra_charge(&self, distance_km: f64) -> u32 {
        let Some(last) = self.tiers.last() else {
            return 0;
        };

        let distance_km = distance_km.max(0.0);
        for tier in &self.tiers {
            if distance_km <= tier.up_to_km {
                return tier.charge;
            }
        }

        // The cast saturates for absurd distances; keep the arithmetic
        // saturating too so the quote stays total instead of overflowing.
        let extra_km = (distance_km - last.up_to_km).ceil() as u32;
        last.charge.saturating_add(extra_km.saturating_mul(self.per_extra_km))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_bounds() {
        let policy = ChargePolicy::default();

        assert_eq!(policy.extra_charge(0.0), 20);
        assert_eq!(policy.extra_charge(3.9), 20);
        assert_eq!(policy.extra_charge(4.0), 20);
        assert_eq!(policy.extra_charge(4.1), 40);
        assert_eq!(policy.extra_charge(8.0), 40);
        assert_eq!(policy.extra_charge(12.0), 60);
    }

    #[test]
    fn test_beyond_last_tier() {
        let policy = ChargePolicy::default();

        // 12.5 km: one started km past the 12 km bound.
        assert_eq!(policy.extra_charge(12.5), 70);
        assert_eq!(policy.extra_charge(13.0), 70);
        assert_eq!(policy.extra_charge(15.0), 90);
    }

    #[test]
    fn test_huge_distance_saturates() {
        let policy = ChargePolicy::default();

        assert_eq!(policy.extra_charge(1.0e30), u32::MAX);
        assert_eq!(policy.extra_charge(f64::MAX), u32::MAX);
    }

    #[test]
    fn test_negative_distance_pays_base() {
        assert_eq!(ChargePolicy::default().extra_charge(-2.0), 20);
    }

    #[test]
    fn test_empty_policy_is_free() {
        let policy = ChargePolicy { tiers: vec![], per_extra_km: 10 };
        assert_eq!(policy.extra_charge(7.0), 0);
    }
}
