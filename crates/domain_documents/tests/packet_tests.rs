//! Document template and assembler tests

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::sync::Arc;

use core_kernel::{AgencyId, Usd, UserId};
use domain_documents::{
    render_finance_agreement, render_html, render_proposal, AgencyProfile, ApplicationPacket, DocumentAssembler,
    DocumentError, DocumentSources, FixedPdfRenderer, PAGE_COUNT, PAGE_TITLES,
};
use domain_quote::{Carrier, FeeInputs, FinancePlan, NewQuote, Quote, QuoteCoverage, QuoteLimits};
use domain_submission::{
    ApplicantDetails, ApplicationForm, ClientContact, ContractPractices, CoverageRequest, DocumentType, NewSubmission,
    Submission, WorkExperience, YesNo,
};

const UNDERLINED_YES: &str = r#"<span style="text-decoration: underline;">Yes</span>"#;

fn carrier() -> Carrier {
    Carrier::new("Sutton Specialty Insurance Company", "quotes@sutton.test", dec!(0)).unwrap()
}

fn submission_with(application: ApplicationForm) -> Submission {
    Submission::create(NewSubmission {
        agency_id: AgencyId::new(),
        created_by: UserId::new(),
        client_contact: ClientContact {
            name: "Dana Reyes".to_string(),
            email: "dana@acme.test".to_string(),
            phone: "555-0100".to_string(),
            ..Default::default()
        },
        application,
        draft: false,
    })
    .unwrap()
}

fn minimal_application() -> ApplicationForm {
    ApplicationForm {
        applicant: ApplicantDetails {
            company_name: "Acme Builders".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn quote_for(submission: &Submission, carrier: &Carrier, coverage: QuoteCoverage, plan: Option<FinancePlan>) -> Quote {
    Quote::enter(NewQuote {
        submission_id: submission.id(),
        carrier_id: carrier.id,
        fees: FeeInputs::new(dec!(1000))
            .tax_percent(dec!(5))
            .policy_fee(dec!(50))
            .broker_fee(dec!(100)),
        coverage,
        finance_plan: plan,
        entered_by: UserId::new(),
    })
    .unwrap()
}

fn finance_plan() -> FinancePlan {
    FinancePlan {
        provider: "Imperial PFS".to_string(),
        down_payment: Usd::new(dec!(300)),
        installments: 9,
        installment_amount: Usd::new(dec!(100)),
    }
}

fn packet_html(application: ApplicationForm) -> String {
    let submission = submission_with(application);
    let carrier = carrier();
    let quote = quote_for(&submission, &carrier, QuoteCoverage::default(), None);
    ApplicationPacket::from_sources(&submission, &quote, &carrier, &AgencyProfile::default()).render_html()
}

// ============================================================================
// Packet Structure Tests
// ============================================================================

mod structure_tests {
    use super::*;

    #[test]
    fn test_twelve_page_markers_in_order() {
        let html = packet_html(minimal_application());

        let mut last = 0;
        for page in 1..=PAGE_COUNT {
            let marker = format!("Page {page} of 12");
            let at = html[last..]
                .find(&marker)
                .unwrap_or_else(|| panic!("missing or out of order: {marker}"));
            last += at + marker.len();
            assert_eq!(html.matches(&marker).count(), 1, "{marker} appears more than once");
        }
        assert_eq!(html.matches(r#"<div class="page""#).count(), PAGE_COUNT);
    }

    #[test]
    fn test_section_titles_in_order() {
        let html = packet_html(minimal_application());
        let positions: Vec<usize> = PAGE_TITLES
            .iter()
            .map(|title| {
                let escaped = title.replace('&', "&amp;");
                html.find(&format!(r#"data-section="{escaped}""#))
                    .unwrap_or_else(|| panic!("missing section {title}"))
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_output_is_minified() {
        let html = packet_html(minimal_application());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>"));
        assert!(!html.contains('\n'));
        assert!(!html.contains("> <"));
        assert!(!html.contains("  "));
        assert!(!html.contains("<!--"));
    }

    #[test]
    fn test_application_id_is_short_submission_id() {
        let submission = submission_with(minimal_application());
        let carrier = carrier();
        let quote = quote_for(&submission, &carrier, QuoteCoverage::default(), None);
        let packet = ApplicationPacket::from_sources(&submission, &quote, &carrier, &AgencyProfile::default());

        assert_eq!(packet.application_id.len(), 7);
        assert!(submission.id().as_uuid().simple().to_string().starts_with(&packet.application_id));
        assert!(packet
            .render_html()
            .contains(&format!("{}P12", packet.application_id)));
    }
}

// ============================================================================
// Fallback Tests
// ============================================================================

mod fallback_tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_printed_defaults() {
        let submission = submission_with(minimal_application());
        let carrier = carrier();
        let quote = quote_for(&submission, &carrier, QuoteCoverage::default(), None);
        let packet = ApplicationPacket::from_sources(&submission, &quote, &carrier, &AgencyProfile::default());

        assert_eq!(packet.fein, "N/A");
        assert_eq!(packet.gross_receipts, "$0.00");
        assert_eq!(packet.total_payroll, "$0.00");
        assert_eq!(packet.aggregate_limit, "$1,000,000");
        assert_eq!(packet.occurrence_limit, "$1,000,000");
        assert_eq!(packet.fire_legal_limit, "$50,000");
        assert_eq!(packet.med_pay_limit, "$5,000");
        assert_eq!(packet.self_insured_retention, "$2,500");
        assert_eq!(packet.terrorism_premium, "$126.66");
        assert_eq!(packet.payment_option, "3rd Party Finance");
        assert_eq!(packet.policy_endorsements, "Blanket AI + PW + WOS");
        assert_eq!(packet.program_name, "Standard GL A-Rated");
        assert_eq!(packet.other_business_names, "No");
        assert_eq!(packet.field_employees, "0");
        // contact falls back to the submission's client contact
        assert_eq!(packet.contact_person, "Dana Reyes");
        assert_eq!(packet.applicant_email, "dana@acme.test");
    }

    #[test]
    fn test_quote_values_take_precedence() {
        let mut application = minimal_application();
        application.coverage = CoverageRequest {
            general_liability_limit: Some("$500,000".to_string()),
            effective_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            ..Default::default()
        };
        let submission = submission_with(application);
        let carrier = carrier();
        let coverage = QuoteCoverage {
            limits: QuoteLimits {
                general_liability: Some("$2,000,000".to_string()),
                ..Default::default()
            },
            endorsements: vec!["Blanket AI".to_string(), "WOS".to_string()],
            policy_number: Some("SSI-1001".to_string()),
            ..Default::default()
        };
        let quote = quote_for(&submission, &carrier, coverage, None);
        let packet = ApplicationPacket::from_sources(&submission, &quote, &carrier, &AgencyProfile::default());

        assert_eq!(packet.occurrence_limit, "$2,000,000");
        assert_eq!(packet.aggregate_limit, "$2,000,000");
        assert_eq!(packet.policy_endorsements, "Blanket AI + WOS");
        assert_eq!(packet.coverage_dates, "03/01/2026 - 03/01/2027");
        assert_eq!(packet.form_date, "03/01/2026");
        assert_eq!(packet.policy_number.as_deref(), Some("SSI-1001"));
    }

    #[test]
    fn test_invoice_uses_recomputed_fees() {
        let html = packet_html(minimal_application());
        assert!(html.contains("$1,000.00"));
        assert!(html.contains("$50.00"));
        assert!(html.contains("$100.00"));
        assert!(html.contains("$1,200.00"));
        assert!(html.contains("TOTAL TO RETAIN"));
    }

    #[test]
    fn test_unsigned_lines_are_blank() {
        let html = packet_html(minimal_application());
        assert!(html.contains("_________________________"));
        assert!(html.contains("TBD-AppID"));
    }
}

// ============================================================================
// Yes/No and Escaping Tests
// ============================================================================

mod answer_tests {
    use super::*;

    #[test]
    fn test_yes_answer_is_underlined_with_explanation() {
        let mut application = minimal_application();
        application.work_experience = WorkExperience {
            roofing: Some(YesNo::yes().explained("Repairs only")),
            ..Default::default()
        };
        let html = packet_html(application);

        let roofing = html.find("roofing operations").unwrap();
        let rest = &html[roofing..];
        let explanation = rest.find("Repairs only").unwrap();
        assert!(rest[..explanation].contains(UNDERLINED_YES));
    }

    #[test]
    fn test_choices_stay_separated_after_minify() {
        let html = packet_html(minimal_application());
        assert!(html.contains("</span>&nbsp;<span"));
        assert!(!html.contains("Yes</span><span"));
    }

    #[test]
    fn test_unanswered_experience_defaults_to_no() {
        let html = packet_html(minimal_application());
        assert!(!html.contains(r#"If "Yes", please explain:"#));
    }

    #[test]
    fn test_contract_follow_ups_only_with_written_contract() {
        let html = packet_html(minimal_application());
        assert!(!html.contains("Does the contract identify a start date"));

        let mut application = minimal_application();
        application.contracts = ContractPractices {
            written_contract: Some(YesNo::yes()),
            contract_has_set_price: Some(YesNo::no().explained("Time and materials")),
            ..Default::default()
        };
        let html = packet_html(application);
        assert!(html.contains("Does the contract identify a start date"));
        assert!(html.contains("Time and materials"));
        assert!(html.contains(r#"If "No", please explain:"#));
    }

    #[test]
    fn test_values_are_escaped() {
        let mut application = minimal_application();
        application.applicant.company_name = r#"Smith & Sons <script>"Build"</script>"#.to_string();
        application.applicant.dba = Some("O'Neil".to_string());
        let html = packet_html(application);

        assert!(html.contains("Smith &amp; Sons &lt;script&gt;&quot;Build&quot;&lt;/script&gt;"));
        assert!(html.contains("O&#39;Neil"));
        assert!(!html.contains("<script>"));
    }
}

// ============================================================================
// Proposal and Finance Agreement Tests
// ============================================================================

mod supporting_document_tests {
    use super::*;

    #[test]
    fn test_proposal_lists_fee_breakdown() {
        let submission = submission_with(minimal_application());
        let carrier = carrier();
        let quote = quote_for(&submission, &carrier, QuoteCoverage::default(), None);
        let html = render_proposal(&submission, &quote, &carrier, &AgencyProfile::default());

        assert!(html.contains("Carrier Premium"));
        assert!(html.contains("Premium Tax (5%)"));
        assert!(html.contains("$1,200.00"));
        assert!(html.contains("Sutton Specialty Insurance Company"));
        assert!(!html.contains("Premium Financing:"));
    }

    #[test]
    fn test_finance_agreement_requires_plan() {
        let submission = submission_with(minimal_application());
        let carrier = carrier();
        let quote = quote_for(&submission, &carrier, QuoteCoverage::default(), None);
        assert!(matches!(
            render_finance_agreement(&submission, &quote),
            Err(DocumentError::NoFinancePlan)
        ));

        let sources = DocumentSources {
            submission: &submission,
            quote: &quote,
            carrier: &carrier,
            agency: &AgencyProfile::default(),
        };
        assert!(matches!(
            render_html(DocumentType::FinanceAgreement, &sources),
            Err(DocumentError::NotApplicable(DocumentType::FinanceAgreement))
        ));
    }

    #[test]
    fn test_finance_agreement_terms() {
        let submission = submission_with(minimal_application());
        let carrier = carrier();
        let quote = quote_for(&submission, &carrier, QuoteCoverage::default(), Some(finance_plan()));
        let html = render_finance_agreement(&submission, &quote).unwrap();

        assert!(html.contains("Imperial PFS"));
        assert!(html.contains("$300.00"));
        assert!(html.contains("$1,200.00"));
    }
}

// ============================================================================
// Assembler Tests
// ============================================================================

mod assembler_tests {
    use super::*;

    #[tokio::test]
    async fn test_render_pdf_passes_packet_to_renderer() {
        let submission = submission_with(minimal_application());
        let carrier = carrier();
        let quote = quote_for(&submission, &carrier, QuoteCoverage::default(), None);
        let agency = AgencyProfile::default();
        let renderer = Arc::new(FixedPdfRenderer::new());
        let assembler = DocumentAssembler::new(renderer.clone());

        let sources = DocumentSources {
            submission: &submission,
            quote: &quote,
            carrier: &carrier,
            agency: &agency,
        };
        let pdf = assembler.render_pdf(DocumentType::CarrierForm, &sources).await.unwrap();

        assert_eq!(pdf, FixedPdfRenderer::PDF);
        let rendered = renderer.rendered();
        assert_eq!(rendered.len(), 1);
        assert!(rendered[0].contains("Page 12 of 12"));
    }

    #[tokio::test]
    async fn test_renderer_failure_surfaces_as_render_error() {
        let submission = submission_with(minimal_application());
        let carrier = carrier();
        let quote = quote_for(&submission, &carrier, QuoteCoverage::default(), None);
        let agency = AgencyProfile::default();
        let assembler = DocumentAssembler::new(Arc::new(FixedPdfRenderer::failing()));

        let sources = DocumentSources {
            submission: &submission,
            quote: &quote,
            carrier: &carrier,
            agency: &agency,
        };
        let err = assembler.render_pdf(DocumentType::Proposal, &sources).await.unwrap_err();
        assert!(err.is_render());
    }
}
