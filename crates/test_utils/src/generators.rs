//! Property-Based Test Generators
//!
//! proptest strategies that stay inside the fee calculator's accepted
//! ranges: non-negative amounts in cents and tax percents up to 100.

use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_quote::FeeInputs;
use domain_submission::YesNo;

/// Non-negative dollar amounts with cents, up to 10 million
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Positive premiums, at least one dollar
pub fn premium_strategy() -> impl Strategy<Value = Decimal> {
    (100i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Tax percents with up to three decimals, 0 to 100
pub fn tax_percent_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000i64).prop_map(|thousandths| Decimal::new(thousandths, 3))
}

/// Fee inputs with every optional fee independently present or absent
pub fn fee_inputs_strategy() -> impl Strategy<Value = FeeInputs> {
    (
        premium_strategy(),
        proptest::option::of(tax_percent_strategy()),
        proptest::option::of(amount_strategy()),
        proptest::option::of(amount_strategy()),
    )
        .prop_map(|(carrier_quote, premium_tax_percent, policy_fee, broker_fee)| FeeInputs {
            carrier_quote,
            premium_tax_percent,
            policy_fee,
            broker_fee,
        })
}

/// An answer with an occasional explanation
pub fn yes_no_strategy() -> impl Strategy<Value = YesNo> {
    (any::<bool>(), proptest::option::of("[a-z ]{1,40}")).prop_map(|(yes, explanation)| {
        let answer = if yes { YesNo::yes() } else { YesNo::no() };
        match explanation {
            Some(text) => answer.explained(text),
            None => answer,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertions::assert_fee_invariant;
    use domain_quote::FeeSchedule;

    proptest! {
        #[test]
        fn generated_inputs_always_calculate(inputs in fee_inputs_strategy()) {
            let fees = FeeSchedule::calculate(inputs).unwrap();
            assert_fee_invariant(&fees);
        }

        #[test]
        fn amounts_have_at_most_two_decimals(amount in amount_strategy()) {
            prop_assert!(amount.scale() <= 2);
            prop_assert!(!amount.is_sign_negative());
        }
    }
}
