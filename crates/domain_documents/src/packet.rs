//! The 12-page carrier application packet
//!
//! [`ApplicationPacket::from_sources`] flattens a submission, its quote, the
//! carrier and the producing agency into the printable values of the packet.
//! Every gap gets the fallback printed on the paper form ("N/A", "$0.00",
//! the standard limits), so rendering itself never branches on missing data
//! except for the yes/no follow-ups.
//!
//! ```rust,ignore
//! let packet = ApplicationPacket::from_sources(&submission, &quote, &carrier, &agency);
//! let html = packet.render_html();
//! let pdf = renderer.render(&html).await?;
//! ```

use chrono::{NaiveDate, Utc};

use core_kernel::Usd;
use domain_quote::{Carrier, Quote};
use domain_submission::{ContractPractices, Signatures, Submission, WorkExperience};

use crate::agency::AgencyProfile;
use crate::html::minify;
use crate::pages;

pub const PAGE_COUNT: usize = 12;

/// Section titles in print order
pub const PAGE_TITLES: [&str; PAGE_COUNT] = [
    "Bind Request Checklist",
    "Insurance Application",
    "Current Exposures & Work Performed",
    "Work Experience",
    "Written Contract & Policy Endorsements",
    "Notice & Policy Exclusions",
    "Application Agreement",
    "Terrorism Coverage Disclosure Notice",
    "Disclosure of Premium",
    "Surplus Lines Compliance Certification",
    "Loss Warranty Letter",
    "Invoice Statement",
];

pub(crate) const DEFAULT_CARRIER: &str = "Sutton Specialty Insurance Company";
const DEFAULT_QUOTE_TYPE: &str = "General Liability";
const DEFAULT_COVERAGE_TYPE: &str = "Manuscript Occurrence";
const DEFAULT_LIMIT: &str = "$1,000,000";
const DEFAULT_FIRE_LEGAL: &str = "$50,000";
const DEFAULT_MED_PAY: &str = "$5,000";
const DEFAULT_SIR: &str = "$2,500";
const DEFAULT_PAYMENT_OPTION: &str = "3rd Party Finance";
const DEFAULT_ENDORSEMENTS: &str = "Blanket AI + PW + WOS";
const DEFAULT_TERRORISM_PREMIUM: &str = "$126.66";
const DEFAULT_PROGRAM: &str = "Standard GL A-Rated";
pub(crate) const NOT_AVAILABLE: &str = "N/A";
pub(crate) const ZERO_DOLLARS: &str = "$0.00";

/// Printed date format on every page
pub(crate) fn print_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

pub(crate) fn money_or_zero(amount: Option<Usd>) -> String {
    amount.map_or_else(|| ZERO_DOLLARS.to_string(), |a| a.to_string())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Printable values of the application packet
///
/// Text fields hold raw values; the page templates escape on output.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationPacket {
    pub application_id: String,
    pub submission_id: String,
    pub form_date: String,

    pub agency: AgencyProfile,

    pub company_name: String,
    pub dba: Option<String>,
    pub contact_person: String,
    pub applicant_address: String,
    pub applicant_city: String,
    pub applicant_state: String,
    pub applicant_zip: String,
    pub applicant_phone: String,
    pub applicant_email: String,
    pub fein: String,
    pub entity_type: String,
    pub years_in_business: u32,
    pub years_experience_in_trades: u32,
    pub states_of_operation: String,
    pub works_in_five_boroughs: bool,
    pub other_business_names: String,
    pub payment_option: String,

    pub quote_type: String,
    pub carrier_name: String,
    pub coverage_type: String,
    pub coverage_dates: String,

    pub aggregate_limit: String,
    pub occurrence_limit: String,
    pub fire_legal_limit: String,
    pub med_pay_limit: String,
    pub self_insured_retention: String,

    pub class_code: String,
    pub gross_receipts: String,
    pub subcontracting_costs: String,
    pub material_costs: String,
    pub total_payroll: String,
    pub field_employees: String,

    pub work_description: String,
    pub residential_percent: u8,
    pub commercial_percent: u8,
    pub new_construction_percent: u8,
    pub remodel_percent: u8,
    pub max_interior_stories: u32,
    pub max_exterior_stories: u32,
    pub max_exterior_depth_below_grade: u32,
    pub performs_ocip_work: Option<bool>,
    pub losses_in_last_5_years: u32,

    pub work_experience: WorkExperience,
    pub contracts: ContractPractices,
    pub policy_endorsements: String,

    pub signatures: Signatures,
    pub applicant_signature_date: String,
    pub producer_signature_date: String,
    pub rejection_statement_date: Option<String>,
    pub surplus_lines_date: String,
    pub loss_warranty_date: String,
    pub loss_warranty_title: Option<String>,

    pub terrorism_premium: String,
    pub policy_number: Option<String>,

    pub program_name: String,
    pub premium: String,
    pub state_tax: String,
    pub policy_fee: String,
    pub broker_fee: String,
    pub total_cost: String,
}

impl ApplicationPacket {
    pub fn from_sources(submission: &Submission, quote: &Quote, carrier: &Carrier, agency: &AgencyProfile) -> Self {
        let form = submission.application();
        let applicant = &form.applicant;
        let coverage = &form.coverage;
        let exposures = &form.exposures;
        let contact = submission.client_contact();
        let limits = &quote.coverage().limits;
        let fees = quote.fees();

        let form_date = print_date(coverage.effective_date.unwrap_or_else(|| Utc::now().date_naive()));
        let dated = |date: Option<NaiveDate>| date.map(print_date).unwrap_or_else(|| form_date.clone());

        let coverage_dates = match (quote.coverage().effective_date, quote.coverage().expiration_date) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => coverage.coverage_period(),
        }
        .map(|(from, to)| format!("{} - {}", print_date(from), print_date(to)))
        .unwrap_or_default();

        let general_liability = non_empty(limits.general_liability.as_deref())
            .or_else(|| non_empty(coverage.general_liability_limit.as_deref()))
            .unwrap_or_else(|| DEFAULT_LIMIT.to_string());

        let endorsements = if quote.coverage().endorsements.is_empty() {
            non_empty(coverage.policy_endorsements.as_deref()).unwrap_or_else(|| DEFAULT_ENDORSEMENTS.to_string())
        } else {
            quote.coverage().endorsements.join(" + ")
        };

        let states_of_operation = if applicant.states_of_operation.is_empty() {
            applicant.state.clone().unwrap_or_default()
        } else {
            applicant.states_of_operation.join(", ")
        };

        let submission_uuid = submission.id().as_uuid().simple().to_string();

        Self {
            application_id: submission_uuid.chars().take(7).collect(),
            submission_id: submission.id().to_string(),
            form_date: form_date.clone(),

            agency: agency.clone(),

            company_name: applicant.company_name.clone(),
            dba: non_empty(applicant.dba.as_deref()),
            contact_person: applicant.contact_name().unwrap_or_else(|| contact.name.clone()),
            applicant_address: applicant
                .street_line()
                .unwrap_or_else(|| contact.business_address.street.clone()),
            applicant_city: applicant
                .city
                .clone()
                .unwrap_or_else(|| contact.business_address.city.clone()),
            applicant_state: applicant
                .state
                .clone()
                .unwrap_or_else(|| contact.business_address.state.clone()),
            applicant_zip: applicant
                .zip_code
                .clone()
                .unwrap_or_else(|| contact.business_address.zip.clone()),
            applicant_phone: applicant.phone.clone().unwrap_or_else(|| contact.phone.clone()),
            applicant_email: applicant.email.clone().unwrap_or_else(|| contact.email.clone()),
            fein: non_empty(applicant.company_fein.as_deref())
                .or_else(|| non_empty(contact.ein.as_deref()))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            entity_type: applicant.entity_type.clone().unwrap_or_default(),
            years_in_business: applicant.years_in_business.unwrap_or(0),
            years_experience_in_trades: applicant.years_experience_in_trades.unwrap_or(0),
            states_of_operation,
            works_in_five_boroughs: applicant.works_in_five_boroughs.unwrap_or(false),
            other_business_names: non_empty(applicant.other_business_names.as_deref())
                .unwrap_or_else(|| "No".to_string()),
            payment_option: non_empty(coverage.payment_option.as_deref())
                .unwrap_or_else(|| DEFAULT_PAYMENT_OPTION.to_string()),

            quote_type: DEFAULT_QUOTE_TYPE.to_string(),
            carrier_name: non_empty(Some(carrier.name.as_str())).unwrap_or_else(|| DEFAULT_CARRIER.to_string()),
            coverage_type: DEFAULT_COVERAGE_TYPE.to_string(),
            coverage_dates,

            aggregate_limit: non_empty(limits.aggregate_limit.as_deref()).unwrap_or_else(|| general_liability.clone()),
            occurrence_limit: general_liability,
            fire_legal_limit: non_empty(limits.fire_legal_limit.as_deref())
                .or_else(|| non_empty(coverage.fire_legal_limit.as_deref()))
                .unwrap_or_else(|| DEFAULT_FIRE_LEGAL.to_string()),
            med_pay_limit: non_empty(limits.medical_expense_limit.as_deref())
                .or_else(|| non_empty(coverage.medical_expense_limit.as_deref()))
                .unwrap_or_else(|| DEFAULT_MED_PAY.to_string()),
            self_insured_retention: non_empty(limits.deductible.as_deref())
                .or_else(|| non_empty(coverage.deductible.as_deref()))
                .unwrap_or_else(|| DEFAULT_SIR.to_string()),

            class_code: exposures.class_description().unwrap_or_default().to_string(),
            gross_receipts: money_or_zero(exposures.estimated_gross_receipts),
            subcontracting_costs: money_or_zero(exposures.estimated_subcontracting_costs),
            material_costs: money_or_zero(exposures.estimated_material_costs),
            total_payroll: money_or_zero(exposures.total_payroll_amount),
            field_employees: exposures.field_headcount(),

            work_description: exposures.carrier_approved_description.clone().unwrap_or_default(),
            residential_percent: exposures.residential_percent.unwrap_or(0),
            commercial_percent: exposures.commercial_percent.unwrap_or(0),
            new_construction_percent: exposures.new_construction_percent.unwrap_or(0),
            remodel_percent: exposures.remodel_percent.unwrap_or(0),
            max_interior_stories: exposures.max_interior_stories.unwrap_or(0),
            max_exterior_stories: exposures.max_exterior_stories.unwrap_or(0),
            max_exterior_depth_below_grade: exposures.max_exterior_depth_below_grade.unwrap_or(0),
            performs_ocip_work: exposures.performs_ocip_work,
            losses_in_last_5_years: exposures.losses_in_last_5_years.unwrap_or(0),

            work_experience: form.work_experience.clone(),
            contracts: form.contracts.clone(),
            policy_endorsements: endorsements,

            applicant_signature_date: dated(form.signatures.applicant_signature_date),
            producer_signature_date: dated(form.signatures.producer_signature_date),
            rejection_statement_date: form.signatures.rejection_statement_date.map(print_date),
            surplus_lines_date: dated(form.signatures.surplus_lines_date),
            loss_warranty_date: dated(form.signatures.loss_warranty_date),
            loss_warranty_title: non_empty(form.signatures.loss_warranty_title.as_deref())
                .or_else(|| non_empty(form.signatures.applicant_title.as_deref())),
            signatures: form.signatures.clone(),

            terrorism_premium: coverage
                .terrorism_coverage_premium
                .map_or_else(|| DEFAULT_TERRORISM_PREMIUM.to_string(), |p| p.to_string()),
            policy_number: non_empty(quote.coverage().policy_number.as_deref()),

            program_name: non_empty(coverage.program_name.as_deref()).unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
            premium: fees.carrier_quote().to_string(),
            state_tax: fees.premium_tax_amount().to_string(),
            policy_fee: fees.policy_fee().to_string(),
            broker_fee: fees.broker_fee().to_string(),
            total_cost: fees.final_amount().to_string(),
        }
    }

    /// The complete minified HTML document
    pub fn render_html(&self) -> String {
        let body: String = [
            pages::bind_request_checklist(self),
            pages::insurance_application(self),
            pages::exposures_and_work_performed(self),
            pages::work_experience(self),
            pages::written_contract(self),
            pages::notice_and_exclusions(self),
            pages::application_agreement(self),
            pages::terrorism_disclosure(self),
            pages::disclosure_of_premium(self),
            pages::surplus_lines_certification(self),
            pages::loss_warranty_letter(self),
            pages::invoice_statement(self),
        ]
        .concat();

        minify(&pages::document(
            &format!("Application Packet - {}", self.application_id),
            &body,
        ))
    }
}
