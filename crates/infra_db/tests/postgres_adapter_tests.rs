//! Postgres workflow adapter tests
//!
//! These start a Postgres container and are ignored by default:
//! `cargo test -p infra_db -- --ignored`

use rust_decimal_macros::dec;
use std::sync::Arc;

use core_kernel::{HealthCheckable, PortError, SubmissionId, Usd};
use domain_quote::QuoteStatus;
use domain_submission::{
    QuoteQuery, SubmissionQuery, SubmissionStatus, WorkflowError, WorkflowPort, DUPLICATE_QUOTE,
};
use infra_db::PostgresWorkflowAdapter;
use test_utils::{
    assert_quote_total, assert_stage, db_test, ApplicationFixtures, CarrierFixtures, SubmissionBuilder,
    WorkflowScenario,
};

async fn scenario(adapter: &PostgresWorkflowAdapter) -> WorkflowScenario {
    WorkflowScenario::over(Arc::new(adapter.clone()))
        .await
        .expect("carrier insert")
}

// ============================================================================
// Round Trips
// ============================================================================

mod roundtrip_tests {
    use super::*;

    db_test!(test_submission_roundtrip_keeps_form_and_contact, |db| {
        let adapter = db.adapter();
        let submission = SubmissionBuilder::new()
            .with_application(ApplicationFixtures::full_form())
            .build();

        adapter.insert_submission(&submission, None).await.unwrap();
        let loaded = adapter.get_submission(submission.id()).await.unwrap();

        assert_eq!(loaded.id(), submission.id());
        assert_eq!(loaded.client_contact(), submission.client_contact());
        assert_eq!(loaded.application(), submission.application());
        assert_eq!(loaded.status(), SubmissionStatus::Submitted);
        assert_eq!(loaded.version(), 1);
        assert_stage(&loaded, "PREPARING");
    });

    db_test!(test_quote_fees_are_recomputed_on_read, |db| {
        let adapter = db.adapter();
        let scenario = scenario(&adapter).await;
        let (_, quote) = scenario.approved().await.unwrap();

        let loaded = adapter.get_quote(quote.id()).await.unwrap();
        assert_quote_total(&loaded, dec!(1200));
        assert_eq!(loaded.status(), QuoteStatus::Approved);
        assert_eq!(loaded.coverage(), quote.coverage());
    });

    db_test!(test_carriers_listed_by_name, |db| {
        let adapter = db.adapter();
        let b = CarrierFixtures::sutton();
        let mut a = CarrierFixtures::random();
        a.name = format!("Aardvark {}", a.name);
        adapter.insert_carrier(&b).await.unwrap();
        adapter.insert_carrier(&a).await.unwrap();

        let carriers = adapter.list_carriers().await.unwrap();
        assert_eq!(carriers.len(), 2);
        assert_eq!(carriers[0].id, a.id);
        assert_eq!(carriers[1].wholesale_fee_percent, b.wholesale_fee_percent);
    });

    db_test!(test_missing_submission_is_not_found, |db| {
        let err = db.adapter().get_submission(SubmissionId::new()).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound { ref entity_type, .. } if entity_type == "Submission"));
    });
}

// ============================================================================
// Concurrency and Constraints
// ============================================================================

mod constraint_tests {
    use super::*;

    db_test!(test_stale_submission_save_is_conflict, |db| {
        let adapter = db.adapter();
        let submission = SubmissionBuilder::new().build();
        adapter.insert_submission(&submission, None).await.unwrap();

        let mut first = adapter.get_submission(submission.id()).await.unwrap();
        let mut second = first.clone();

        first.route().unwrap();
        adapter.save_submission(&first, None).await.unwrap();

        second.decline(Some("out of appetite".to_string())).unwrap();
        let err = adapter.save_submission(&second, None).await.unwrap_err();
        assert!(err.is_conflict());

        let stored = adapter.get_submission(submission.id()).await.unwrap();
        assert_eq!(stored.version(), 2);
        assert_eq!(stored.status(), SubmissionStatus::Routed);
    });

    db_test!(test_second_quote_from_same_carrier_is_rejected, |db| {
        let adapter = db.adapter();
        let scenario = scenario(&adapter).await;
        let submission = scenario.submission().await.unwrap();

        scenario
            .service
            .enter_quote(scenario.quote_for(&submission).enter_request())
            .await
            .unwrap();
        let err = scenario
            .service
            .enter_quote(scenario.quote_for(&submission).with_carrier_quote(dec!(900)).enter_request())
            .await
            .unwrap_err();

        assert!(err.to_string().contains(DUPLICATE_QUOTE));
        assert!(matches!(err, WorkflowError::Port(PortError::Validation { .. })));

        let quotes = adapter
            .find_quotes(QuoteQuery::for_submission(submission.id()))
            .await
            .unwrap();
        assert_eq!(quotes.len(), 1);
    });
}

// ============================================================================
// Workflow Over Postgres
// ============================================================================

mod workflow_tests {
    use super::*;

    db_test!(test_full_bind_persists_both_records, |db| {
        let adapter = db.adapter();
        let scenario = scenario(&adapter).await;
        let (submission, quote) = scenario.bind_requested().await.unwrap();

        let bound = scenario.service.approve_bind(submission.id()).await.unwrap();
        assert_stage(&bound, "BOUND");

        let stored_quote = adapter.get_quote(quote.id()).await.unwrap();
        let stored_submission = adapter.get_submission(submission.id()).await.unwrap();
        assert_eq!(stored_quote.status(), QuoteStatus::Bound);
        assert!(stored_submission.workflow().bind_approved());
        assert_eq!(
            stored_submission.workflow().payment().map(|p| p.amount),
            Some(Usd::new(dec!(1200)))
        );
    });

    db_test!(test_bind_request_queue_uses_derived_flag, |db| {
        let adapter = db.adapter();
        let scenario = scenario(&adapter).await;
        let (requested, _) = scenario.bind_requested().await.unwrap();
        scenario.signed().await.unwrap();

        let queue = adapter.find_submissions(SubmissionQuery::bind_requests()).await.unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id(), requested.id());
    });

    db_test!(test_health_check_reports_healthy, |db| {
        use core_kernel::{AdapterHealth, HealthCheckable};

        let result = db.adapter().health_check().await;
        assert_eq!(result.status, AdapterHealth::Healthy);
        assert_eq!(result.adapter_id, "postgres-workflow-adapter");
    });
}
