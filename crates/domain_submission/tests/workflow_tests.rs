//! Gate evaluation and bind stage tests

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::{EnvelopeId, Usd};
use domain_quote::QuoteStatus;

use domain_submission::{
    evaluate_gates, BindStage, PaymentMethod, PaymentRecord, PaymentStatus, WorkflowError, WorkflowSnapshot,
};

fn payment() -> PaymentRecord {
    PaymentRecord {
        amount: Usd::new(dec!(1200)),
        method: PaymentMethod::Ach,
        transaction_id: "MOCK-1700000000000-abcdefghi".to_string(),
        paid_at: Utc::now(),
    }
}

/// Every reachable stage, in workflow order
fn all_stages() -> Vec<BindStage> {
    let envelope = EnvelopeId::new();
    let preparing = BindStage::Preparing;
    let awaiting = preparing.send_for_signature(envelope, Utc::now()).unwrap();
    let signed = awaiting.complete_signature(envelope, Utc::now()).unwrap();
    let paid = signed.record_payment(payment()).unwrap();
    let requested = paid.request_bind(Utc::now()).unwrap();
    let bound = requested.approve_bind(Utc::now()).unwrap();
    vec![preparing, awaiting, signed, paid, requested, bound]
}

fn snapshot_for(stage: &BindStage, documents_generated: usize) -> WorkflowSnapshot {
    WorkflowSnapshot {
        quote_status: QuoteStatus::Approved,
        has_finance_plan: false,
        documents_generated,
        esign_completed: stage.esign_completed(),
        payment_status: stage.payment_status(),
        bind_requested: stage.bind_requested(),
        bind_approved: stage.bind_approved(),
    }
}

fn quote_status() -> impl Strategy<Value = QuoteStatus> {
    prop_oneof![
        Just(QuoteStatus::Entered),
        Just(QuoteStatus::Posted),
        Just(QuoteStatus::Approved),
        Just(QuoteStatus::BindRequested),
        Just(QuoteStatus::Bound),
    ]
}

prop_compose! {
    fn any_snapshot()(
        quote_status in quote_status(),
        has_finance_plan in any::<bool>(),
        documents_generated in 0usize..5,
        esign_completed in any::<bool>(),
        paid in any::<bool>(),
        bind_requested in any::<bool>(),
        bind_approved in any::<bool>(),
    ) -> WorkflowSnapshot {
        WorkflowSnapshot {
            quote_status,
            has_finance_plan,
            documents_generated,
            esign_completed,
            payment_status: if paid { PaymentStatus::Paid } else { PaymentStatus::Pending },
            bind_requested,
            bind_approved,
        }
    }
}

// ============================================================================
// Gate Property Tests
// ============================================================================

mod gate_tests {
    use super::*;

    proptest! {
        #[test]
        fn can_pay_iff_signed_and_unpaid(s in any_snapshot()) {
            let gates = evaluate_gates(&s);
            prop_assert_eq!(gates.can_pay, s.esign_completed && s.payment_status != PaymentStatus::Paid);
        }

        #[test]
        fn can_bind_iff_signed_paid_and_not_requested(s in any_snapshot()) {
            let gates = evaluate_gates(&s);
            prop_assert_eq!(
                gates.can_bind,
                s.esign_completed && s.payment_status == PaymentStatus::Paid && !s.bind_requested
            );
        }

        #[test]
        fn can_esign_needs_every_required_document(s in any_snapshot()) {
            let gates = evaluate_gates(&s);
            let required = if s.has_finance_plan { 3 } else { 2 };
            prop_assert_eq!(gates.required_documents, required);
            prop_assert_eq!(gates.can_esign, s.documents_generated >= required && !s.esign_completed);
        }

        #[test]
        fn can_generate_only_for_approved_unsigned(s in any_snapshot()) {
            let gates = evaluate_gates(&s);
            prop_assert_eq!(
                gates.can_generate_documents,
                s.quote_status == QuoteStatus::Approved && !s.esign_completed
            );
        }
    }

    #[test]
    fn test_unsigned_pending_submission() {
        let gates = evaluate_gates(&snapshot_for(&BindStage::Preparing, 2));
        assert!(!gates.can_bind);
        assert!(!gates.can_pay);
        assert!(gates.can_esign);
    }

    #[test]
    fn test_gates_over_every_reachable_stage() {
        let expected = [
            // (can_esign, can_pay, can_bind)
            (true, false, false),
            (true, false, false),
            (false, true, false),
            (false, false, true),
            (false, false, false),
            (false, false, false),
        ];
        for (stage, (esign, pay, bind)) in all_stages().iter().zip(expected) {
            let gates = evaluate_gates(&snapshot_for(stage, 2));
            assert_eq!(gates.can_esign, esign, "can_esign at {}", stage.name());
            assert_eq!(gates.can_pay, pay, "can_pay at {}", stage.name());
            assert_eq!(gates.can_bind, bind, "can_bind at {}", stage.name());
        }
    }
}

// ============================================================================
// Bind Stage Tests
// ============================================================================

mod stage_tests {
    use super::*;

    #[test]
    fn test_payment_never_applies_before_signature() {
        for stage in &all_stages()[..2] {
            let err = stage.record_payment(payment()).unwrap_err();
            assert!(matches!(err, WorkflowError::EsignRequiredForPayment));
            assert_eq!(stage.payment_status(), PaymentStatus::Pending);
        }
    }

    #[test]
    fn test_second_payment_rejected() {
        for stage in &all_stages()[3..] {
            assert!(matches!(stage.record_payment(payment()), Err(WorkflowError::AlreadyPaid)));
        }
    }

    #[test]
    fn test_bind_request_messages() {
        let stages = all_stages();
        assert_eq!(
            stages[0].request_bind(Utc::now()).unwrap_err().to_string(),
            "E-Signature must be completed before requesting bind"
        );
        assert_eq!(
            stages[2].request_bind(Utc::now()).unwrap_err().to_string(),
            "Payment must be completed before requesting bind"
        );
        assert_eq!(
            stages[4].request_bind(Utc::now()).unwrap_err().to_string(),
            "Bind has already been requested"
        );
    }

    #[test]
    fn test_approve_requires_pending_request() {
        let stages = all_stages();
        assert!(matches!(stages[3].approve_bind(Utc::now()), Err(WorkflowError::BindNotRequested)));
        assert!(matches!(stages[5].approve_bind(Utc::now()), Err(WorkflowError::BindAlreadyApproved)));
    }

    #[test]
    fn test_resend_replaces_envelope() {
        let first = EnvelopeId::new();
        let second = EnvelopeId::new();
        let stage = BindStage::Preparing
            .send_for_signature(first, Utc::now())
            .and_then(|s| s.send_for_signature(second, Utc::now()))
            .unwrap();

        assert_eq!(stage.envelope_id(), Some(second));
        assert!(stage.complete_signature(first, Utc::now()).is_err());
        assert!(stage.complete_signature(second, Utc::now()).is_ok());
    }

    #[test]
    fn test_stage_serializes_with_tag() {
        let json = serde_json::to_value(&all_stages()[3]).unwrap();
        assert_eq!(json["stage"], "PAID");
        assert_eq!(json["payment"]["method"], "ach");
    }
}
