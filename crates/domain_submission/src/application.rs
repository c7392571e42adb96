//! Typed application form
//!
//! The agency's submit form is stored as one JSON document. Every field the
//! packet or the quote reads is declared here with an explicit `Option`, so a
//! missing answer is a `None` rather than an absent key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::Usd;

use crate::error::WorkflowError;

/// A yes/no answer with an optional explanation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YesNo {
    pub answer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl YesNo {
    pub fn yes() -> Self {
        Self {
            answer: true,
            explanation: None,
        }
    }

    pub fn no() -> Self {
        Self::default()
    }

    pub fn explained(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

/// The complete application submitted by an agency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationForm {
    #[validate(nested)]
    pub applicant: ApplicantDetails,
    #[validate(nested)]
    pub coverage: CoverageRequest,
    #[validate(nested)]
    pub exposures: ExposureProfile,
    pub work_experience: WorkExperience,
    pub contracts: ContractPractices,
    pub signatures: Signatures,
}

impl ApplicationForm {
    /// Runs field validation plus the cross-field money rules
    ///
    /// # Errors
    ///
    /// [`WorkflowError::Validation`] naming the offending fields
    pub fn check(&self) -> Result<(), WorkflowError> {
        self.validate()?;

        let money = [
            ("coverage.brokerFee", self.coverage.broker_fee),
            ("exposures.estimatedGrossReceipts", self.exposures.estimated_gross_receipts),
            ("exposures.estimatedSubcontractingCosts", self.exposures.estimated_subcontracting_costs),
            ("exposures.estimatedMaterialCosts", self.exposures.estimated_material_costs),
            ("exposures.totalPayrollAmount", self.exposures.total_payroll_amount),
        ];
        let negative: Vec<&str> = money
            .iter()
            .filter(|(_, amount)| amount.is_some_and(|a| a.is_negative()))
            .map(|(field, _)| *field)
            .collect();
        if !negative.is_empty() {
            return Err(WorkflowError::validation(format!(
                "Amounts must not be negative: {}",
                negative.join(", ")
            )));
        }

        if let (Some(from), Some(to)) = (self.coverage.effective_date, self.coverage.expiration_date) {
            if to <= from {
                return Err(WorkflowError::validation(
                    "coverage.expirationDate must be after coverage.effectiveDate",
                ));
            }
        }
        Ok(())
    }

    /// Broker fee the agency asked for, zero when not given
    pub fn broker_fee(&self) -> Usd {
        self.coverage.broker_fee.unwrap_or(Usd::ZERO)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicantDetails {
    #[validate(length(min = 1, message = "companyName is required"))]
    pub company_name: String,
    pub dba: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub street_address: Option<String>,
    pub apt_suite: Option<String>,
    pub city: Option<String>,
    #[validate(length(equal = 2, message = "state must be a two-letter code"))]
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(rename = "companyFEIN")]
    pub company_fein: Option<String>,
    pub entity_type: Option<String>,
    pub other_business_names: Option<String>,
    pub years_in_business: Option<u32>,
    pub years_experience_in_trades: Option<u32>,
    pub states_of_operation: Vec<String>,
    #[serde(rename = "workIn5Boroughs")]
    pub works_in_five_boroughs: Option<bool>,
}

impl ApplicantDetails {
    /// "First Last", or `None` when neither part is present
    pub fn contact_name(&self) -> Option<String> {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!name.is_empty()).then_some(name)
    }

    /// Street line with the suite appended
    pub fn street_line(&self) -> Option<String> {
        let street = self.street_address.as_deref()?.trim();
        if street.is_empty() {
            return None;
        }
        Some(match self.apt_suite.as_deref().map(str::trim) {
            Some(suite) if !suite.is_empty() => format!("{street}, {suite}"),
            _ => street.to_string(),
        })
    }
}

/// Requested coverage and the agency's commission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverageRequest {
    pub effective_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub general_liability_limit: Option<String>,
    pub fire_legal_limit: Option<String>,
    pub medical_expense_limit: Option<String>,
    pub deductible: Option<String>,
    pub payment_option: Option<String>,
    pub policy_endorsements: Option<String>,
    pub program_name: Option<String>,
    /// Agency broker fee carried onto the quote when it is entered
    pub broker_fee: Option<Usd>,
    pub terrorism_coverage_premium: Option<Usd>,
}

impl CoverageRequest {
    /// Coverage period; expiration defaults to one year after the effective date
    pub fn coverage_period(&self) -> Option<(NaiveDate, NaiveDate)> {
        let from = self.effective_date?;
        let to = self
            .expiration_date
            .or_else(|| from.checked_add_months(chrono::Months::new(12)))?;
        Some((from, to))
    }
}

/// Current exposures and the kind of work performed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ExposureProfile {
    pub estimated_gross_receipts: Option<Usd>,
    pub estimated_subcontracting_costs: Option<Usd>,
    pub estimated_material_costs: Option<Usd>,
    pub total_payroll_amount: Option<Usd>,
    pub active_owners_in_field: Option<u32>,
    pub field_employees: Option<u32>,
    pub carrier_approved_description: Option<String>,
    pub class_codes: Vec<String>,
    #[validate(range(max = 100))]
    pub residential_percent: Option<u8>,
    #[validate(range(max = 100))]
    pub commercial_percent: Option<u8>,
    #[validate(range(max = 100))]
    pub new_construction_percent: Option<u8>,
    #[validate(range(max = 100))]
    pub remodel_percent: Option<u8>,
    pub max_interior_stories: Option<u32>,
    pub max_exterior_stories: Option<u32>,
    pub max_exterior_depth_below_grade: Option<u32>,
    #[serde(rename = "performOCIPWork")]
    pub performs_ocip_work: Option<bool>,
    pub losses_in_last_5_years: Option<u32>,
}

impl ExposureProfile {
    /// Field headcount as printed on the application, e.g. "Owner + 3"
    pub fn field_headcount(&self) -> String {
        let employees = self.field_employees.unwrap_or(0);
        if self.active_owners_in_field.unwrap_or(0) > 0 {
            format!("Owner + {employees}")
        } else {
            employees.to_string()
        }
    }

    /// Carrier-approved description, falling back to the first class code
    pub fn class_description(&self) -> Option<&str> {
        self.carrier_approved_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .or_else(|| self.class_codes.first().map(String::as_str))
    }
}

/// Work experience questionnaire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub hazardous_work: Option<YesNo>,
    pub medical_facilities_work: Option<YesNo>,
    pub structural_work: Option<YesNo>,
    pub tract_home_work: Option<YesNo>,
    pub condo_construction: Option<YesNo>,
    pub condo_repair_only: Option<YesNo>,
    pub roofing: Option<YesNo>,
    pub waterproofing: Option<YesNo>,
    pub heavy_equipment: Option<YesNo>,
    pub over_5000_sq_ft: Option<YesNo>,
    pub commercial_over_20000_sq_ft: Option<YesNo>,
    pub licensing_action: Option<YesNo>,
    pub license_used_by_others: Option<YesNo>,
    pub judgements_or_liens: Option<YesNo>,
    pub lawsuits_filed: Option<YesNo>,
    pub aware_of_potential_claims: Option<YesNo>,
}

/// Written contract and subcontractor practices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractPractices {
    pub written_contract: Option<YesNo>,
    pub contract_has_start_date: Option<YesNo>,
    pub contract_has_scope_of_work: Option<YesNo>,
    pub contract_identifies_subcontracted_trades: Option<YesNo>,
    pub contract_has_set_price: Option<YesNo>,
    pub contract_signed_by_all_parties: Option<YesNo>,
    pub subcontracts_work: Option<YesNo>,
    pub collects_certificates_from_subs: Option<YesNo>,
    pub requires_subs_equal_limits: Option<YesNo>,
    pub requires_subs_additional_insured: Option<YesNo>,
    pub standard_agreement_with_subs: Option<YesNo>,
    pub agreement_has_hold_harmless: Option<YesNo>,
    pub requires_subs_workers_comp: Option<YesNo>,
}

/// Signature blocks captured on the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Signatures {
    pub applicant_signature: Option<String>,
    pub applicant_signature_date: Option<NaiveDate>,
    pub applicant_title: Option<String>,
    pub producer_signature: Option<String>,
    pub producer_signature_date: Option<NaiveDate>,
    pub rejection_statement_signature: Option<String>,
    pub rejection_statement_printed_name: Option<String>,
    pub rejection_statement_date: Option<NaiveDate>,
    pub surplus_lines_signature: Option<String>,
    pub surplus_lines_date: Option<NaiveDate>,
    pub loss_warranty_signature: Option<String>,
    pub loss_warranty_company_signature: Option<String>,
    pub loss_warranty_title: Option<String>,
    pub loss_warranty_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn minimal() -> ApplicationForm {
        ApplicationForm {
            applicant: ApplicantDetails {
                company_name: "Acme Builders".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_form_is_valid() {
        assert!(minimal().check().is_ok());
    }

    #[test]
    fn test_missing_company_name_rejected() {
        let err = ApplicationForm::default().check().unwrap_err();
        assert!(err.to_string().contains("applicant."));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut form = minimal();
        form.applicant.email = Some("not-an-email".to_string());
        assert!(form.check().is_err());
    }

    #[test]
    fn test_percent_over_100_rejected() {
        let mut form = minimal();
        form.exposures.residential_percent = Some(120);
        assert!(form.check().is_err());
    }

    #[test]
    fn test_negative_broker_fee_rejected() {
        let mut form = minimal();
        form.coverage.broker_fee = Some(Usd::new(dec!(-1)));
        let err = form.check().unwrap_err();
        assert!(err.to_string().contains("coverage.brokerFee"));
    }

    #[test]
    fn test_field_headcount() {
        let mut exposures = ExposureProfile::default();
        assert_eq!(exposures.field_headcount(), "0");
        exposures.field_employees = Some(3);
        exposures.active_owners_in_field = Some(1);
        assert_eq!(exposures.field_headcount(), "Owner + 3");
    }

    #[test]
    fn test_coverage_period_defaults_to_one_year() {
        let coverage = CoverageRequest {
            effective_date: NaiveDate::from_ymd_opt(2024, 2, 29),
            ..Default::default()
        };
        let (from, to) = coverage.coverage_period().unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_deserializes_camel_case_payload() {
        let form: ApplicationForm = serde_json::from_value(serde_json::json!({
            "applicant": {
                "companyName": "Acme",
                "companyFEIN": "12-3456789",
                "workIn5Boroughs": true,
                "statesOfOperation": ["TX", "OK"]
            },
            "coverage": { "brokerFee": 150.0 },
            "workExperience": { "roofing": { "answer": true, "explanation": "Repairs only" } }
        }))
        .unwrap();

        assert_eq!(form.applicant.company_fein.as_deref(), Some("12-3456789"));
        assert_eq!(form.applicant.works_in_five_boroughs, Some(true));
        assert_eq!(form.broker_fee(), Usd::new(dec!(150)));
        assert_eq!(
            form.work_experience.roofing,
            Some(YesNo::yes().explained("Repairs only"))
        );
        assert!(form.work_experience.hazardous_work.is_none());
    }

    #[test]
    fn test_contact_name_and_street_line() {
        let applicant = ApplicantDetails {
            first_name: Some("Dana".to_string()),
            last_name: Some(" ".to_string()),
            street_address: Some("1 Main St".to_string()),
            apt_suite: Some("Suite 4".to_string()),
            ..Default::default()
        };
        assert_eq!(applicant.contact_name().as_deref(), Some("Dana"));
        assert_eq!(applicant.street_line().as_deref(), Some("1 Main St, Suite 4"));
    }
}
