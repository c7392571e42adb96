//! One-page quote proposal with the fee breakdown

use domain_quote::{Carrier, Quote};
use domain_submission::Submission;

use crate::agency::AgencyProfile;
use crate::html::{escape, field_row, minify};
use crate::packet::{print_date, DEFAULT_CARRIER, NOT_AVAILABLE};
use crate::pages::document;

fn fee_table(quote: &Quote) -> String {
    let rows: String = quote
        .fees()
        .line_items()
        .iter()
        .map(|item| {
            format!(
                r#"<tr><td>{}</td><td class="amount">{}</td></tr>"#,
                escape(&item.label),
                item.amount
            )
        })
        .collect();
    format!(
        r#"<table class="fee-table">{rows}<tr class="total"><td>Total</td><td class="amount">{}</td></tr></table>"#,
        quote.final_amount()
    )
}

/// Renders the proposal for a quote
pub fn render_proposal(submission: &Submission, quote: &Quote, carrier: &Carrier, agency: &AgencyProfile) -> String {
    let coverage = quote.coverage();
    let limits = &coverage.limits;
    let or_na = |value: Option<&str>| value.filter(|v| !v.trim().is_empty()).unwrap_or(NOT_AVAILABLE).to_string();

    let period = match (coverage.effective_date, coverage.expiration_date) {
        (Some(from), Some(to)) => format!("{} - {}", print_date(from), print_date(to)),
        _ => NOT_AVAILABLE.to_string(),
    };
    let carrier_name = if carrier.name.trim().is_empty() {
        DEFAULT_CARRIER
    } else {
        carrier.name.as_str()
    };
    let endorsements = if coverage.endorsements.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        coverage.endorsements.join(", ")
    };
    let finance = quote
        .finance_plan()
        .map(|plan| field_row("Premium Financing:", &format!("Available through {}", plan.provider)))
        .unwrap_or_default();
    let notes = coverage
        .special_notes
        .as_deref()
        .map(|n| format!(r#"<div class="section-title">Notes</div><p>{}</p>"#, escape(n)))
        .unwrap_or_default();

    let body = format!(
        r#"
        <div class="page">
          <div class="sidebar">
            <div class="logo">C&amp;C</div>
            <div class="sidebar-title">Proposal</div>
            <div class="applicant-label">{agency}</div>
          </div>
          <div class="main-content">
            <div class="section-title">Insurance Proposal</div>
            {prepared_for}{contact}{submission}
            <div class="section-title">Coverage</div>
            {carrier_row}{status}{period_row}{gl}{aggregate}{deductible}{endorsement_row}{finance}
            <div class="section-title">Premium &amp; Fees</div>
            {fees}
            {notes}
            <p>This proposal is valid for the quoted coverage only. Coverage is not bound until the application is signed, payment is received and the carrier approves the bind request.</p>
          </div>
        </div>
        "#,
        agency = escape(&agency.name),
        prepared_for = field_row("Prepared for:", &submission.application().applicant.company_name),
        contact = field_row("Contact:", &submission.client_contact().name),
        submission = field_row("Submission:", &submission.id().to_string()),
        carrier_row = field_row("Carrier:", carrier_name),
        status = field_row("Quote Status:", quote.status().as_str()),
        period_row = field_row("Policy Period:", &period),
        gl = field_row("General Liability:", &or_na(limits.general_liability.as_deref())),
        aggregate = field_row("Aggregate:", &or_na(limits.aggregate_limit.as_deref())),
        deductible = field_row("Deductible:", &or_na(limits.deductible.as_deref())),
        endorsement_row = field_row("Endorsements:", &endorsements),
        fees = fee_table(quote),
    );

    minify(&document(&format!("Proposal - {}", quote.id()), &body))
}
