//! Pre-built Test Fixtures
//!
//! Predictable values for the bind portal entities. The reference quote
//! (1000 premium, 5% tax, 50 policy fee, 100 broker fee) totals 1200.

use chrono::NaiveDate;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{AgencyId, Usd, UserId};
use domain_quote::{Carrier, FeeInputs, FinancePlan, QuoteCoverage, QuoteLimits};
use domain_submission::{
    ApplicantDetails, ApplicationForm, BusinessAddress, ClientContact, ContractPractices, CoverageRequest,
    ExposureProfile, Signer, WorkExperience, YesNo,
};

/// Fee inputs and amounts
pub struct FeeFixtures;

impl FeeFixtures {
    pub fn carrier_quote() -> Decimal {
        dec!(1000)
    }

    pub fn tax_percent() -> Decimal {
        dec!(5)
    }

    pub fn policy_fee() -> Decimal {
        dec!(50)
    }

    pub fn broker_fee() -> Decimal {
        dec!(100)
    }

    /// 1000 + 5% + 50 + 100
    pub fn final_amount() -> Usd {
        Usd::new(dec!(1200))
    }

    pub fn inputs() -> FeeInputs {
        FeeInputs::new(Self::carrier_quote())
            .tax_percent(Self::tax_percent())
            .policy_fee(Self::policy_fee())
            .broker_fee(Self::broker_fee())
    }

    /// Premium only; every optional fee omitted
    pub fn premium_only() -> FeeInputs {
        FeeInputs::new(Self::carrier_quote())
    }
}

/// Carriers
pub struct CarrierFixtures;

impl CarrierFixtures {
    pub fn sutton() -> Carrier {
        Carrier::new("Sutton Specialty Insurance Company", "quotes@sutton.test", dec!(0))
            .expect("fixture carrier is valid")
            .with_states(["CA", "NV", "AZ"])
            .with_industries(["Construction"])
    }

    /// Carrier with a random name, for tests that need several
    pub fn random() -> Carrier {
        let name: String = CompanyName().fake();
        Carrier::new(format!("{name} Insurance"), SafeEmail().fake::<String>(), dec!(2.5))
            .expect("fixture carrier is valid")
    }
}

/// Insured contact and application forms
pub struct ApplicationFixtures;

impl ApplicationFixtures {
    pub fn contact() -> ClientContact {
        ClientContact {
            name: "Dana Reyes".to_string(),
            email: "dana@acme.test".to_string(),
            phone: "555-0100".to_string(),
            ein: Some("12-3456789".to_string()),
            business_address: BusinessAddress {
                street: "100 Market St".to_string(),
                city: "San Diego".to_string(),
                state: "CA".to_string(),
                zip: "92101".to_string(),
            },
        }
    }

    pub fn random_contact() -> ClientContact {
        let first: String = FirstName().fake();
        let last: String = LastName().fake();
        ClientContact {
            name: format!("{first} {last}"),
            email: SafeEmail().fake(),
            phone: "555-0199".to_string(),
            ..Default::default()
        }
    }

    /// Only the company name filled in
    pub fn minimal_form() -> ApplicationForm {
        ApplicationForm {
            applicant: ApplicantDetails {
                company_name: "Acme Builders".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// A form with every section answered
    pub fn full_form() -> ApplicationForm {
        ApplicationForm {
            applicant: ApplicantDetails {
                company_name: "Acme Builders".to_string(),
                dba: Some("Acme Remodeling".to_string()),
                first_name: Some("Dana".to_string()),
                last_name: Some("Reyes".to_string()),
                street_address: Some("100 Market St".to_string()),
                apt_suite: Some("Suite 4".to_string()),
                city: Some("San Diego".to_string()),
                state: Some("CA".to_string()),
                zip_code: Some("92101".to_string()),
                phone: Some("555-0100".to_string()),
                email: Some("dana@acme.test".to_string()),
                company_fein: Some("12-3456789".to_string()),
                entity_type: Some("LLC".to_string()),
                years_in_business: Some(12),
                years_experience_in_trades: Some(20),
                states_of_operation: vec!["CA".to_string()],
                works_in_five_boroughs: Some(false),
                ..Default::default()
            },
            coverage: CoverageRequest {
                effective_date: NaiveDate::from_ymd_opt(2026, 3, 1),
                expiration_date: NaiveDate::from_ymd_opt(2027, 3, 1),
                general_liability_limit: Some("$1,000,000".to_string()),
                fire_legal_limit: Some("$100,000".to_string()),
                medical_expense_limit: Some("$5,000".to_string()),
                deductible: Some("$1,000".to_string()),
                broker_fee: Some(Usd::new(FeeFixtures::broker_fee())),
                ..Default::default()
            },
            exposures: ExposureProfile {
                estimated_gross_receipts: Some(Usd::new(dec!(850000))),
                total_payroll_amount: Some(Usd::new(dec!(240000))),
                active_owners_in_field: Some(1),
                field_employees: Some(3),
                class_codes: vec!["91342 Carpentry".to_string()],
                residential_percent: Some(80),
                commercial_percent: Some(20),
                ..Default::default()
            },
            work_experience: WorkExperience {
                roofing: Some(YesNo::no()),
                lawsuits_filed: Some(YesNo::yes().explained("Settled 2019 slip and fall")),
                ..Default::default()
            },
            contracts: ContractPractices {
                written_contract: Some(YesNo::yes()),
                contract_has_start_date: Some(YesNo::yes()),
                subcontracts_work: Some(YesNo::no()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn signer() -> Signer {
        Signer {
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
            email: "dana@acme.test".to_string(),
        }
    }
}

/// Quote-side value objects
pub struct QuoteFixtures;

impl QuoteFixtures {
    pub fn coverage() -> QuoteCoverage {
        QuoteCoverage {
            limits: QuoteLimits {
                general_liability: Some("$1,000,000".to_string()),
                aggregate_limit: Some("$2,000,000".to_string()),
                ..Default::default()
            },
            effective_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            expiration_date: NaiveDate::from_ymd_opt(2027, 3, 1),
            policy_number: Some("SSI-2026-0001".to_string()),
            ..Default::default()
        }
    }

    /// 300 down and 9 installments of 100
    pub fn finance_plan() -> FinancePlan {
        FinancePlan {
            provider: "Imperial PFS".to_string(),
            down_payment: Usd::new(dec!(300)),
            installments: 9,
            installment_amount: Usd::new(dec!(100)),
        }
    }
}

/// Fresh identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn agency_id() -> AgencyId {
        AgencyId::new()
    }

    pub fn user_id() -> UserId {
        UserId::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_quote::FeeSchedule;

    #[test]
    fn test_reference_fees_total_1200() {
        let fees = FeeSchedule::calculate(FeeFixtures::inputs()).unwrap();
        assert_eq!(fees.final_amount(), FeeFixtures::final_amount());
    }

    #[test]
    fn test_forms_pass_validation() {
        ApplicationFixtures::minimal_form().check().unwrap();
        ApplicationFixtures::full_form().check().unwrap();
    }

    #[test]
    fn test_random_contact_has_email() {
        assert!(ApplicationFixtures::random_contact().email.contains('@'));
    }
}
