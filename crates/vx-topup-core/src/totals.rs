use serde::{Deserialize, Serialize};

/// 2.9% expressed in basis points.
pub const DEFAULT_FEE_BPS: u32 = 290;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: u64,
    pub fee: u64,
    pub total: u64,
}

impl Totals {
    pub fn for_amount(amount: u64, fee_bps: u32) -> Self {
        let fee = processing_fee(amount, fee_bps);
        Self {
            subtotal: amount,
            fee,
            total: amount.saturating_add(fee),
        }
    }
}

/// `amount * fee_bps / 10_000`, rounded half up.
pub fn processing_fee(amount: u64, fee_bps: u32) -> u64 {
    let scaled = u128::from(amount) * u128::from(fee_bps) + 5_000;
    u64::try_from(scaled / 10_000).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn preset_fifty_thousand_totals() {
        let totals = Totals::for_amount(50_000, DEFAULT_FEE_BPS);
        assert_eq!(
            totals,
            Totals {
                subtotal: 50_000,
                fee: 1_450,
                total: 51_450,
            }
        );
    }

    #[test]
    fn fee_matches_rounded_float_rate() {
        for amount in [0, 1, 17, 500, 1_500, 7_500, 10_000, 33_333, 1_000_000, 100_000_000] {
            let expected = (amount as f64 * 0.029).round() as u64;
            assert_eq!(processing_fee(amount, DEFAULT_FEE_BPS), expected, "amount {amount}");
        }
    }

    #[test]
    fn zero_amount_has_zero_totals() {
        assert_eq!(Totals::for_amount(0, DEFAULT_FEE_BPS), Totals::default());
    }

    proptest! {
        #[test]
        fn fee_is_within_half_a_rupiah(amount in 0u64..=100_000_000) {
            let fee = processing_fee(amount, DEFAULT_FEE_BPS);
            let exact_thousandths = amount * 29;
            prop_assert!((fee * 1_000).abs_diff(exact_thousandths) <= 500);

            let totals = Totals::for_amount(amount, DEFAULT_FEE_BPS);
            prop_assert_eq!(totals.total, amount + fee);
        }
    }
}
