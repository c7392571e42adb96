//! Custom Test Assertions
//!
//! Domain-aware assertions with messages that show the amounts and stages
//! involved instead of a bare `left != right`.

use rust_decimal::Decimal;

use core_kernel::Usd;
use domain_quote::{FeeSchedule, Quote};
use domain_submission::{Submission, WorkflowGates};

/// Asserts an amount to the cent
pub fn assert_usd_eq(actual: Usd, expected: Decimal) {
    assert_eq!(
        actual.amount().round_dp(2),
        expected.round_dp(2),
        "Amount mismatch: actual={actual}, expected={}",
        Usd::new(expected)
    );
}

/// Asserts final = premium + tax + policy fee + broker fee
pub fn assert_fee_invariant(fees: &FeeSchedule) {
    let sum = fees.carrier_quote() + fees.premium_tax_amount() + fees.policy_fee() + fees.broker_fee();
    assert_eq!(
        fees.final_amount(),
        sum,
        "Final amount {} does not equal the sum of its parts {}",
        fees.final_amount(),
        sum
    );
    assert!(
        !fees.final_amount().amount().is_sign_negative(),
        "Final amount is negative: {}",
        fees.final_amount()
    );
}

/// Asserts the quote's stored total matches its fee breakdown
pub fn assert_quote_total(quote: &Quote, expected: Decimal) {
    assert_fee_invariant(quote.fees());
    assert_usd_eq(quote.final_amount(), expected);
}

/// Asserts the bind stage by its wire name, e.g. `"SIGNED"`
pub fn assert_stage(submission: &Submission, expected: &str) {
    assert_eq!(
        submission.workflow().name(),
        expected,
        "Submission {} is in stage {:?}",
        submission.id(),
        submission.workflow()
    );
}

/// Asserts the four action gates as `[generate, esign, pay, bind]`
pub fn assert_gates(gates: &WorkflowGates, expected: [bool; 4]) {
    let actual = [gates.can_generate_documents, gates.can_esign, gates.can_pay, gates.can_bind];
    assert_eq!(
        actual, expected,
        "Gates [generate, esign, pay, bind] mismatch: {gates:?}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FeeFixtures;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_schedule_satisfies_invariant() {
        let fees = FeeSchedule::calculate(FeeFixtures::inputs()).unwrap();
        assert_fee_invariant(&fees);
        assert_usd_eq(fees.final_amount(), dec!(1200));
    }

    #[test]
    #[should_panic(expected = "Amount mismatch")]
    fn test_usd_mismatch_panics() {
        assert_usd_eq(Usd::new(dec!(10.004)), dec!(10.01));
    }
}
