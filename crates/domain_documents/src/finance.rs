//! Premium finance agreement

use domain_quote::Quote;
use domain_submission::Submission;

use crate::error::DocumentError;
use crate::html::{escape, field_row, minify, signature_line};
use crate::pages::document;

/// Renders the finance agreement for a quote that carries a finance plan
///
/// # Errors
///
/// [`DocumentError::NoFinancePlan`] when the quote is paid in full
pub fn render_finance_agreement(submission: &Submission, quote: &Quote) -> Result<String, DocumentError> {
    let plan = quote.finance_plan().ok_or(DocumentError::NoFinancePlan)?;
    let applicant = &submission.application().applicant.company_name;

    let body = format!(
        r#"
        <div class="page">
          <div class="sidebar">
            <div class="logo">C&amp;C</div>
            <div class="sidebar-title">Premium Finance Agreement</div>
          </div>
          <div class="main-content">
            <div class="section-title">Premium Finance Agreement</div>
            {insured}{provider}{total_premium}{down}{installments}{installment}{payable}
            <p>The insured named above requests that {provider_name} pay the premium for the policy described in the accompanying proposal. In consideration of that payment, the insured agrees to pay the down payment and each installment when due. The finance company may cancel the policy for non-payment as permitted by law, and any unearned premium returned on cancellation is assigned to the finance company.</p>
            {signature}{date}
          </div>
        </div>
        "#,
        insured = field_row("Insured:", applicant),
        provider = field_row("Finance Company:", &plan.provider),
        total_premium = field_row("Total Premium and Fees:", &quote.final_amount().to_string()),
        down = field_row("Down Payment:", &plan.down_payment.to_string()),
        installments = field_row("Number of Installments:", &plan.installments.to_string()),
        installment = field_row("Installment Amount:", &plan.installment_amount.to_string()),
        payable = field_row("Total of Payments:", &plan.total_payable().to_string()),
        provider_name = escape(&plan.provider),
        signature = signature_line("Signature of Insured", None),
        date = signature_line("Date", None),
    );

    Ok(minify(&document(&format!("Finance Agreement - {}", quote.id()), &body)))
}
