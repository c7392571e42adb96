//! Page templates of the application packet
//!
//! One function per page, in print order. Every page ends with its
//! "Page N of 12" marker; every substituted value goes through [`escape`].

use domain_submission::YesNo;

use crate::html::{escape, field_row, signature_line, yes_no, yes_no_flag, BLANK_LINE};
use crate::packet::{ApplicationPacket, PAGE_COUNT, PAGE_TITLES, ZERO_DOLLARS};
use crate::styles::PRINT_CSS;

/// Wraps rendered pages in a complete HTML document
pub(crate) fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>{}</title><style>{}</style></head><body>{}</body></html>"#,
        escape(title),
        PRINT_CSS,
        body
    )
}

/// Sidebar, content column and page marker shared by every page
fn page(p: &ApplicationPacket, number: usize, audience: &str, content: String) -> String {
    let title = PAGE_TITLES[number - 1];
    let app_id = escape(&p.application_id);
    format!(
        r#"
        <div class="page" data-section="{title}">
          <div class="sidebar">
            <div class="logo">C&amp;C</div>
            <div class="sidebar-title">{title}</div>
            <div class="qr-text">{app_id}</div>
            <div class="qr-page">{app_id}P{number}</div>
            <div class="applicant-label">{audience}</div>
          </div>
          <div class="main-content">
            {content}
            <div class="page-number">Page {number} of {PAGE_COUNT}</div>
          </div>
        </div>
        "#,
        title = escape(title),
    )
}

fn section(title: &str) -> String {
    format!(r#"<div class="section-title">{title}</div>"#)
}

fn paragraphs(texts: &[&str]) -> String {
    texts.iter().map(|t| format!("<p>{t}</p>")).collect()
}

fn initial_line(label: &str) -> String {
    format!(r#"<div class="initial-line">{label}Initial: {BLANK_LINE}</div>"#)
}

/// When a follow-up explanation is printed
#[derive(Clone, Copy)]
enum ExplainOn {
    Yes,
    No,
    Never,
}

/// A yes/no question with its explanation line
fn question(text: &str, answer: Option<&YesNo>, default: bool, explain_on: ExplainOn) -> String {
    let selected = answer.map_or(default, |a| a.answer);
    let explanation = match (explain_on, selected) {
        (ExplainOn::Yes, true) => Some(r#"If "Yes", please explain:"#),
        (ExplainOn::No, false) => Some(r#"If "No", please explain:"#),
        _ => None,
    }
    .map(|label| {
        let text = answer.and_then(|a| a.explanation.as_deref()).unwrap_or("");
        format!(
            r#"<div class="explanation-field"><strong>{label}</strong> {}</div>"#,
            escape(text)
        )
    })
    .unwrap_or_default();

    format!(
        r#"<div class="question-item"><div class="question-text"><strong>{text}</strong></div><div class="yes-no-options">{}</div>{explanation}</div>"#,
        yes_no(answer, default)
    )
}

fn experience_question(text: &str, answer: &Option<YesNo>) -> String {
    question(text, answer.as_ref(), false, ExplainOn::Yes)
}

fn practice_question(text: &str, answer: &Option<YesNo>) -> String {
    question(text, answer.as_ref(), true, ExplainOn::No)
}

fn answered_yes(answer: &Option<YesNo>) -> bool {
    answer.as_ref().is_some_and(|a| a.answer)
}

// ============================================================================
// Page 1
// ============================================================================

pub(crate) fn bind_request_checklist(p: &ApplicationPacket) -> String {
    let items = [
        "Signed Application",
        "Signed Loss Warranty Letter",
        "Signed Terrorism Coverage Disclosure Notice",
        "Signed Surplus Lines Affidavit",
        "Copy of Applicant Contractor License (If Applicable)",
        "Signed Invoice Statement",
        "Signed Finance Agreement",
    ];
    let checklist: String = items
        .iter()
        .map(|item| format!(r#"<div class="checklist-item">&#9744; {item}</div>"#))
        .collect();

    page(
        p,
        1,
        "Producer",
        format!(
            r#"
            <div class="header-info">
              <div class="broker-name">{agency}</div>
              <div class="applicant-name">{company}</div>
              <div class="application-id">Application ID: {app_id}</div>
            </div>
            <p>Thank you for your business. In order to expedite your request efficiently, we will need you to submit the following documents:</p>
            <div class="checklist">{checklist}</div>
            <p>Please submit complete and approved apps by visiting the application detail page for App {app_id} and uploading the above documents.</p>
            "#,
            agency = escape(&p.agency.name),
            company = escape(&p.company_name),
            app_id = escape(&p.application_id),
        ),
    )
}

// ============================================================================
// Page 2
// ============================================================================

pub(crate) fn insurance_application(p: &ApplicationPacket) -> String {
    let agency = &p.agency;
    let dba = p
        .dba
        .as_deref()
        .map(|d| format!(r#"<div class="field-value">DBA {}</div>"#, escape(d)))
        .unwrap_or_default();

    let content = format!(
        r#"
        <div class="header-section">
          <div class="agency-name">{agency_name}</div>
          <div>{agency_contact}</div>
          <div>{agency_street}</div>
          <div>{agency_city}</div>
          <div>{agency_phone}</div>
          <div>email: {agency_email}</div>
        </div>
        <div class="application-id-section"><strong>General Liability Application ID:</strong> {app_id}</div>
        {date}
        {insured_title}
        <div class="field-value">{company}</div>
        {dba}
        <div class="field-value">{contact}</div>
        <div class="field-value">{address}</div>
        <div class="field-value">{city}, {state} {zip}</div>
        <div class="field-value">{phone}</div>
        <div class="field-value">email: {email}</div>
        {quote_title}
        {quote_type}{carrier}{coverage_type}{dates}
        {applicant_title}
        {mailing}{fein}{entity}{years}{experience}{states}{boroughs}{other_names}{payment}
        {coverages_title}
        {aggregate}{occurrence}{products}{personal}{fire}{med}{sir}
        {class_title}
        <div class="field-value-large">{class_code}</div>
        {receipts_title}
        <div class="field-value-large">{gross}</div>
        "#,
        agency_name = escape(&agency.name),
        agency_contact = escape(&agency.contact_name),
        agency_street = escape(&agency.street),
        agency_city = escape(&agency.city_line()),
        agency_phone = escape(&agency.phone),
        agency_email = escape(&agency.email),
        app_id = escape(&p.application_id),
        date = field_row("Date", &p.form_date),
        insured_title = section("Insured Information"),
        company = escape(&p.company_name),
        contact = escape(&p.contact_person),
        address = escape(&p.applicant_address),
        city = escape(&p.applicant_city),
        state = escape(&p.applicant_state),
        zip = escape(&p.applicant_zip),
        phone = escape(&p.applicant_phone),
        email = escape(&p.applicant_email),
        quote_title = section("Quote Information"),
        quote_type = field_row("Type:", &p.quote_type),
        carrier = field_row("Carrier:", &p.carrier_name),
        coverage_type = field_row("Coverage Type:", &p.coverage_type),
        dates = field_row("Desired Coverage Dates:", &p.coverage_dates),
        applicant_title = section("Applicant Information"),
        mailing = field_row("Mailing Address:", &p.applicant_address),
        fein = field_row("FEIN:", &p.fein),
        entity = field_row("Entity of Company:", &p.entity_type),
        years = field_row("Years in Business:", &p.years_in_business.to_string()),
        experience = field_row(
            "Years of experience in the Trades for which you are applying for insurance:",
            &p.years_experience_in_trades.to_string()
        ),
        states = field_row(
            "States in which you do business that for which you are currently applying for insurance:",
            &p.states_of_operation
        ),
        boroughs = field_row(
            "Will any of your work be performed in the 5 boroughs:",
            if p.works_in_five_boroughs { "Yes" } else { "No" }
        ),
        other_names = field_row(
            "Are there any other business names which you have used in the past or are currently using in addition to that for which you're currently applying for insurance?",
            &p.other_business_names
        ),
        payment = field_row("Payment Option Details:", &p.payment_option),
        coverages_title = section("General Liability Coverages"),
        aggregate = field_row("Aggregate:", &p.aggregate_limit),
        occurrence = field_row("Occurrence:", &p.occurrence_limit),
        products = field_row("Products/Completed Operations:", &p.aggregate_limit),
        personal = field_row("Personal/Advertising Injury:", &p.occurrence_limit),
        fire = field_row("Fire Legal:", &p.fire_legal_limit),
        med = field_row("Med Pay:", &p.med_pay_limit),
        sir = field_row("Self-Insured Retention:", &p.self_insured_retention),
        class_title = section("Class Code"),
        class_code = escape(&p.class_code),
        receipts_title = section("Gross Receipts"),
        gross = escape(&p.gross_receipts),
    );
    page(p, 2, "Applicant", content)
}

// ============================================================================
// Page 3
// ============================================================================

pub(crate) fn exposures_and_work_performed(p: &ApplicationPacket) -> String {
    let ocip = p.performs_ocip_work;
    let content = format!(
        r#"
        {exposures_title}
        {gross}{subs}{materials}{payroll}{employees}
        <div class="footnote">* For purposes of this application, "Employee" is defined as an individual working for you (the applicant), which receives a W-2 tax form or you withhold &amp; pay employment related taxes for that individual.</div>
        {work_title}
        <div class="work-description"><strong>Complete Descriptions of operations that for which you are currently applying for insurance:</strong>
          <div class="description-text">{description}</div>
        </div>
        {residential}{commercial}{new_construction}{remodel}
        {interior}{exterior}{depth}
        <div class="question-item"><strong>Will you perform OCIP (Wrap-up) work:</strong> {ocip}</div>
        {losses}
        "#,
        exposures_title = section("Current Exposures"),
        gross = field_row("Estimated Total Gross Receipts:", &p.gross_receipts),
        subs = field_row("Estimated Sub Contracting Costs:", &p.subcontracting_costs),
        materials = field_row("Estimated Material Costs:", &p.material_costs),
        payroll = field_row("Estimated Total Payroll:", &p.total_payroll),
        employees = field_row("Number of Field Employees*:", &p.field_employees),
        work_title = section("Work Performed"),
        description = escape(&p.work_description),
        residential = field_row(
            "Percentage of Residential work performed:",
            &format!("{}%", p.residential_percent)
        ),
        commercial = field_row(
            "Percentage of Commercial work performed:",
            &format!("{}%", p.commercial_percent)
        ),
        new_construction = field_row(
            "Percentage of New (Ground Up) work performed:",
            &format!("{}%", p.new_construction_percent)
        ),
        remodel = field_row(
            "Percentage of Remodel/Service/Repair work performed:",
            &format!("{}%", p.remodel_percent)
        ),
        interior = field_row("Maximum # of Interior Stories:", &p.max_interior_stories.to_string()),
        exterior = field_row("Maximum # of Exterior Stories:", &p.max_exterior_stories.to_string()),
        depth = field_row(
            "Maximum Exterior Depth Below Grade in Feet:",
            &p.max_exterior_depth_below_grade.to_string()
        ),
        ocip = yes_no_flag(ocip),
        losses = field_row("Number of losses in the last 5 years:", &p.losses_in_last_5_years.to_string()),
    );
    page(p, 3, "Applicant", content)
}

// ============================================================================
// Page 4
// ============================================================================

pub(crate) fn work_experience(p: &ApplicationPacket) -> String {
    let w = &p.work_experience;
    let questions = [
        experience_question(
            "Will you or do you perform or subcontract any work involving the following: blasting operations, hazardous waste, asbestos, mold, PCBs, oil fields, dams/levees, bridges, quarries, railroads, earthquake retrofitting, fuel tanks, pipelines, or foundation repair?",
            &w.hazardous_work,
        ),
        experience_question(
            "Will you or do you perform or subcontract any work involving the following: medical facilities, hospitals, churches or other house of worship, museums, historic buildings, airports, schools/playgrounds/recreational facilities?",
            &w.medical_facilities_work,
        ),
        experience_question("Will you perform structural work?", &w.structural_work),
        experience_question(
            "Will you perform work in new tract home developments of 25 or more units?",
            &w.tract_home_work,
        ),
        experience_question(
            "Will any of your work involve the construction of or be for new condominiums/townhouses/multi-unit residences?",
            &w.condo_construction,
        ),
        experience_question(
            "Will you perform repair only for individual unit owners of condominiums/townhouses/multi-unit residences?",
            &w.condo_repair_only,
        ),
        experience_question(
            "Will you perform or subcontract any roofing operations, work on the roof or deck work on roofs?",
            &w.roofing,
        ),
        experience_question("Does your company perform any waterproofing?", &w.waterproofing),
        experience_question(
            "Do you use motorized or heavy equipment in any of your operations?",
            &w.heavy_equipment,
        ),
        experience_question(
            "Will you perform work (new/remodel) on single family residences, in which the dwelling exceeds 5,000 square feet?",
            &w.over_5000_sq_ft,
        ),
        experience_question(
            "Will you perform work on commercial buildings over 20,000 square feet?",
            &w.commercial_over_20000_sq_ft,
        ),
        experience_question(
            "Has any licensing authority taken any action against you, your company or any affiliates?",
            &w.licensing_action,
        ),
        experience_question(
            "Have you allowed or will you allow your license to be used by any other contractor?",
            &w.license_used_by_others,
        ),
        experience_question(
            "Has the applicant or business owner ever had any judgements or liens filed against them or filed for bankruptcy?",
            &w.judgements_or_liens,
        ),
        experience_question(
            "Has any lawsuit ever been filed or any claim otherwise been made against your company? (For the purposes of this application, a claim means a receipt of a demand for money, services or arbitration.)",
            &w.lawsuits_filed,
        ),
        experience_question(
            "Is your company aware of any facts, circumstances, incidents, situations, damages or accidents that a reasonably prudent person might expect to give rise to a claim or lawsuit, whether valid or not, which might directly or indirectly involve the company?",
            &w.aware_of_potential_claims,
        ),
    ]
    .concat();

    page(p, 4, "Applicant", format!("{}{questions}", section("Work Experience")))
}

// ============================================================================
// Page 5
// ============================================================================

pub(crate) fn written_contract(p: &ApplicationPacket) -> String {
    let c = &p.contracts;
    let mut content = section("Written Contract");

    content.push_str(&question(
        "Do you have a written contract for all work you perform?",
        c.written_contract.as_ref(),
        false,
        ExplainOn::Never,
    ));
    if answered_yes(&c.written_contract) {
        content.push_str(r#"<div class="sub-question-header">If "Yes", answer the following questions:</div>"#);
        content.push_str(&practice_question(
            "Does the contract identify a start date for the work?",
            &c.contract_has_start_date,
        ));
        content.push_str(&practice_question(
            "Does the contract identify a precise scope of work?",
            &c.contract_has_scope_of_work,
        ));
        content.push_str(&practice_question(
            "Does the contract identify all subcontracted trades (if any)?",
            &c.contract_identifies_subcontracted_trades,
        ));
        content.push_str(&practice_question("Does the contract provide a set price?", &c.contract_has_set_price));
        content.push_str(&practice_question(
            "Is the contract signed by all parties to the contract?",
            &c.contract_signed_by_all_parties,
        ));
    }

    content.push_str(&question(
        "Do you subcontract work?",
        c.subcontracts_work.as_ref(),
        false,
        ExplainOn::Never,
    ));
    if answered_yes(&c.subcontracts_work) {
        content.push_str(r#"<div class="sub-question-header">If "Yes", answer the following questions:</div>"#);
        content.push_str(&practice_question(
            "Do you always collect certificates of insurance from subcontractors?",
            &c.collects_certificates_from_subs,
        ));
        content.push_str(&practice_question(
            "Do you require subcontractors to have insurance limits equal to your own?",
            &c.requires_subs_equal_limits,
        ));
        content.push_str(&practice_question(
            "Do you always require subcontractors to name you as additional insured?",
            &c.requires_subs_additional_insured,
        ));
        content.push_str(&practice_question(
            "Do you have a standard formal agreement with subcontractors?",
            &c.standard_agreement_with_subs,
        ));
        if c.standard_agreement_with_subs.as_ref().map_or(true, |a| a.answer) {
            content.push_str(&practice_question(
                r#"If "Yes", does it have a hold harmless/indemnification agreement in your favor?"#,
                &c.agreement_has_hold_harmless,
            ));
        }
        content.push_str(&practice_question(
            "Do you require subcontractors to carry Worker's Compensation?",
            &c.requires_subs_workers_comp,
        ));
    }

    content.push_str(&section("Policy Endorsements"));
    content.push_str(&format!(
        r#"<div class="policy-endorsements-content">{}</div>"#,
        escape(&p.policy_endorsements)
    ));
    page(p, 5, "Applicant", content)
}

// ============================================================================
// Page 6
// ============================================================================

pub(crate) fn notice_and_exclusions(p: &ApplicationPacket) -> String {
    let audit = format!(
        "Please note that your policy is subject to audit. Audits are routinely performed and specifically provided for in the policy. The initial premium is regarded as a deposit premium only since the underwriters are relying on the accuracy of the information provided by the insured. This includes the estimated gross receipts. Thus, the audit is necessary to verify the financial information provided since the premium is based upon these representations. {} policies are audited by Zoom Professional Services. Zoom is the authorized representative in regard to your policy audit. We appreciate your anticipated cooperation.",
        escape(&p.carrier_name)
    );
    let content = format!(
        "{}{}{}{}{}{}",
        section("Notice"),
        paragraphs(&[
            "This is a quotation only. No coverage is in effect until an application is approved and policy binder is received. This policy is issued by your insurance company. Nothing is bound until final underwriting approval. Your insurance company may not be subject to all of the insurance laws and regulations of your state. State insurance insolvency guaranty funds may not be available. Therefore please consult with your insurance agent for further information.",
            audit.as_str(),
        ]),
        initial_line(""),
        section("Policy Exclusions"),
        paragraphs(&[
            "<strong>Section I, Coverage A, Bodily Injury and Property Damage Liability:</strong> Expected or Intended Injury; Action Over; Worker's Compensation and Similar Laws; Aircraft, Auto or Watercraft; Mobile Equipment; Exterior Insulation and Finish Systems (\"EIFS\"); Assault and Battery; Professional Services; Damage to Property; Damage to Your Product; Damage to Your Work; Damage to Impaired Property; Recall of Products; Subsidence, Movement, or Vibration of Land; Deleterious Substances; Open Structure \"Water\" Damage; Explosives; Communicable Disease; Abuse or Molestation; Prior Work and Prior Products; Wrap Up.",
            "<strong>Common Policy Exclusions:</strong> Past Work or Construction Projects; Buildings and Structures Exceeding Three Stories; Water or Fire Damage Liability; Hospital, Medical or Care Facilities; Material Misrepresentation; Overspray; Fall from Heights; Independent Contractors/Subcontractors Sublimit; Collapse; Undisclosed Waterproofing Operations; Abandoned Work; Tract Home Project.",
            "<strong>Coverage B, Personal and Advertising Injury:</strong> Knowing Violation of Rights of Another; Material Published with Knowledge of Falsity; Material Published Prior to Policy Period; Infringement of Copyright, Patent, Trademark or Trade Secret; Common Policy Exclusions.",
            "<strong>Coverage C, Medical Payments:</strong> Any Insured; Hired Person; Workers Compensation and Similar Laws; Athletic Activities; Products-Completed Operations Hazard.",
            "<strong>Section II. Common Policy Exclusions:</strong> Breach of Contract/Contractual Liability; Employer's Liability; Pollution; Multi-Unit Structures; War or Terrorism; Employment Practices; Cross Suits; Unlicensed Contractors; Prior Knowledge; Punitive Damages, Fines or Penalties; Liquor Liability; Roofing Operations; Cyber.",
            "Please refer to the policy for a complete list of exclusions. This list is subject to change and may differ from prior policy years.",
        ]),
        initial_line("* I have read and understand the policy exclusions identified above. "),
    );
    page(p, 6, "Applicant", content)
}

// ============================================================================
// Page 7
// ============================================================================

pub(crate) fn application_agreement(p: &ApplicationPacket) -> String {
    let s = &p.signatures;
    let clauses = [
        "The undersigned Applicant warrants that the above statements and particulars, together with any attached or appended documents or materials (\"this Application\"), are true and complete and do not misrepresent, misstate or omit any material facts. The undersigned Applicant understands that any misrepresentation or omission of any information in any part of this Application shall constitute grounds for immediate cancellation of coverage and denial of claims, if any. The Applicant agrees to notify the Company of any material changes in the answers to the questions on this Application which may arise prior to the effective date of any policy issued pursuant to this Application.",
        "The applicant acknowledges that explanation of the terms, conditions and provisions of the policy of insurance are provided solely by the applicant's agent, broker or producer and NOT the Company. The applicant understands the agent, broker or producer has no authority to act on behalf of the insurance company.",
        "Applicant acknowledges that this policy is subject to a self-insured retention. The total limit of liability as stated in the policy declarations shall apply in excess of the self-insured retention. Complete satisfaction of the SIR by the applicant is a \"condition precedent\" to Company's duty to defend and/or indemnify.",
        "If you are applying for a \"claims made\" policy then please note that policy provides coverage only for \"claims made\" and reported to the company in writing during the policy period. Thus there is NO retroactive coverage.",
        "Applicants must strictly comply with all applicable state and/or other governmental licensing requirements and regulations. Should an applicant's license become suspended, revoked or inactive at any time during the policy period, then NO coverage will be afforded under the policy.",
    ];
    let mut content = section("Application Agreement");
    for clause in clauses {
        content.push_str(&format!("<p>{clause}</p>"));
        content.push_str(&initial_line(""));
    }
    content.push_str(&paragraphs(&[
        "<strong>* Deposit Premium &amp; Fees are fully earned.</strong>",
        "We will compute all premiums for this policy in accordance with our rules and rates. Premium shown in this policy as advance premium is a deposit premium only and is based upon the information provided by the applicant and or its agent. This information is subject to audit.",
    ]));
    content.push_str(&signature_line("Signature of Applicant", s.applicant_signature.as_deref()));
    content.push_str(&signature_line("Date", Some(&p.applicant_signature_date)));
    content.push_str(&signature_line("Title (Owner, Officer, Partner)", s.applicant_title.as_deref()));
    content.push_str(&signature_line(
        "Signature of Producer (Agent or Broker)",
        s.producer_signature.as_deref(),
    ));
    content.push_str(&signature_line("Date", Some(&p.producer_signature_date)));
    page(p, 7, "Applicant", content)
}

// ============================================================================
// Page 8
// ============================================================================

pub(crate) fn terrorism_disclosure(p: &ApplicationPacket) -> String {
    let carrier = escape(&p.carrier_name);
    let content = format!(
        r#"
        <div class="carrier-header">
          <div class="carrier-name-large">{carrier}</div>
          <div>THIS ENDORSEMENT CHANGES THE POLICY. PLEASE READ IT CAREFULLY</div>
          <div>COMMERCIAL GENERAL LIABILITY POLICY</div>
        </div>
        {title}
        {provided}
        <p>The Terrorism Risk Insurance Act of 2002 and amendments thereto (collectively referred to as the "Act") established a program within the Department of the Treasury, under which the federal government shares, with the insurance industry, the risk of loss from future terrorist attacks.</p>
        <p>In accordance with the Act we are required to offer you coverage for losses resulting from an act of terrorism that is certified under the federal program as an act of terrorism. <strong>This offer does not include coverage for incidents of nuclear, biological, chemical, or radiological terrorism which will be excluded from your policy.</strong> You may accept or reject this offer.</p>
        <p>Your premium <strong>will include</strong> the additional premium for terrorism as stated in the section of this Notice titled <strong>DISCLOSURE OF PREMIUM.</strong></p>
        {federal}
        <p>Where coverage is provided by this policy for losses resulting from certified acts of terrorism, such losses may be partially reimbursed by the United States government under a formula established by federal law. Under the formula, the United States government generally <strong>reimburses 80% beginning on January 1, 2020</strong> of covered terrorism losses exceeding the statutorily established deductible paid by the insurance company providing the coverage.</p>
        {cap}
        <p><strong>The Terrorism Risk Insurance Act, As Amended, Contains A $100 Billion Cap That Limits U.S. Government Reimbursement As Well As Insurers' Liability For Losses Resulting From Certified Acts Of Terrorism When The Amount Of Such Losses In Any One Calendar Year Exceeds $100 Billion.</strong></p>
        "#,
        title = section("Terrorism Coverage Disclosure Notice"),
        provided = section("Terrorism Coverage Provided Under This Policy"),
        federal = section("Disclosure of Federal Participation in Payment of Terrorism Losses"),
        cap = section("Disclosure of Cap on Annual Liability"),
    );
    page(p, 8, "Applicant", content)
}

// ============================================================================
// Page 9
// ============================================================================

pub(crate) fn disclosure_of_premium(p: &ApplicationPacket) -> String {
    let s = &p.signatures;
    let content = format!(
        r#"
        <div class="carrier-name-large">{carrier}</div>
        {title}
        <p><strong>Your premium for terrorism coverage is:</strong> {premium}</p>
        <p>Premium charged is for the policy period up to your policy expiration.</p>
        <p><strong>You may choose to reject the offer by signing the statement below and returning it to us.</strong> Your policy will be changed to exclude the described coverage. If you chose to accept this offer, this form does not have to be returned.</p>
        {rejection}
        <p>I hereby decline to purchase coverage for certified acts of terrorism. I understand that an exclusion of certain terrorism losses will be made part of this policy.</p>
        <div class="signature-field"><div class="signature-label">Member/Insured: <strong>{company}</strong></div></div>
        {signature}{date}{printed}
        "#,
        carrier = escape(&p.carrier_name),
        title = section("Disclosure of Premium"),
        premium = escape(&p.terrorism_premium),
        rejection = section("Rejection Statement"),
        company = escape(&p.company_name),
        signature = signature_line("Member/Insured Signature:", s.rejection_statement_signature.as_deref()),
        date = signature_line("Date:", p.rejection_statement_date.as_deref()),
        printed = signature_line("Printed Name/Title:", s.rejection_statement_printed_name.as_deref()),
    );
    page(p, 9, "Applicant", content)
}

// ============================================================================
// Page 10
// ============================================================================

pub(crate) fn surplus_lines_certification(p: &ApplicationPacket) -> String {
    let content = format!(
        "{}{}{}{}{}",
        section("Surplus Lines Compliance Certification"),
        paragraphs(&[
            "I, the retail or producing resident or non-resident licensed producer/agent/broker, affirm I have expressly advised the insured prior to placement of the insurance that I was unable to obtain the full amount or kind of insurance necessary to protect the desired risk(s) from authorized insurers, as required by the risk state, currently writing this type of coverage in this State.",
            "In addition, I confirm that coverage was not procured for the purpose of securing a lower premium rate than would be accepted by an authorized insurer nor to secure any other competitive advantage.",
            "Under the penalty of suspension or revocation of my producer/agent/broker's license, the facts contained in this certification are true and correct.",
        ]),
        signature_line(
            &format!("Policy Number (TBD-AppID {})", escape(&p.application_id)),
            p.policy_number.as_deref(),
        ),
        signature_line(
            "Signature of Licensed Retail/Producing Agent/Broker",
            p.signatures.surplus_lines_signature.as_deref(),
        ),
        signature_line("Date", Some(&p.surplus_lines_date)),
    );
    page(p, 10, "Producer", content)
}

// ============================================================================
// Page 11
// ============================================================================

pub(crate) fn loss_warranty_letter(p: &ApplicationPacket) -> String {
    let s = &p.signatures;
    let content = format!(
        r#"
        <div class="header-section">
          <div class="applicant-name-large">{company}</div>
          <div>{address}</div>
          <div>{city}, {state} {zip}</div>
          <div>{phone}</div>
          <div>email: {email}</div>
          <div>Quote ID: {app_id}</div>
        </div>
        <p>During the last Five (5) years, we warrant that with respect to the insurance being applied for:</p>
        <ol>
          <li>I/ we have not sustained a loss</li>
          <li>Have not had a claim made against us</li>
          <li>Have not been denied coverage or had coverage canceled by an insurance company</li>
          <li>Have no knowledge or a reason to anticipate a claims or loss.</li>
        </ol>
        <p>If my business is less than five (5) years old, the above referenced warranty applies to work performed through all my prior business entities whether as an owner or an employee.</p>
        <p>The undersigned Applicant further authorizes the Insurer or its representative to obtain directly or on Applicant's behalf, any and all loss runs or other such information identifying any claim, action or loss against the undersigned Applicant or the denial of coverage or cancelation of insurance.</p>
        <p>I understand that this warranty and authorization for release of information as provided above will be incorporated into the insurance contract.</p>
        {company_signature}{date}{signature}{title}
        "#,
        company = escape(&p.company_name),
        address = escape(&p.applicant_address),
        city = escape(&p.applicant_city),
        state = escape(&p.applicant_state),
        zip = escape(&p.applicant_zip),
        phone = escape(&p.applicant_phone),
        email = escape(&p.applicant_email),
        app_id = escape(&p.application_id),
        company_signature = signature_line(
            &format!("Company/ Member: <strong>{}</strong>", escape(&p.company_name)),
            s.loss_warranty_company_signature.as_deref()
        ),
        date = signature_line("Date", Some(&p.loss_warranty_date)),
        signature = signature_line(
            "Signature of Partner, Officer, Principal or Owner",
            s.loss_warranty_signature.as_deref()
        ),
        title = signature_line("Title", p.loss_warranty_title.as_deref()),
    );
    page(p, 11, "Applicant", content)
}

// ============================================================================
// Page 12
// ============================================================================

fn invoice_row(label: &str, value: &str) -> String {
    format!(
        r#"<div class="invoice-row"><div class="invoice-label">{label}</div><div class="invoice-value">{}</div></div>"#,
        escape(value)
    )
}

fn invoice_total(label: &str, value: &str) -> String {
    format!(
        r#"<div class="invoice-row-total"><div class="invoice-label">{label}</div><div class="invoice-value">{}</div></div>"#,
        escape(value)
    )
}

pub(crate) fn invoice_statement(p: &ApplicationPacket) -> String {
    let rows = [
        field_row("Program:", &p.program_name),
        field_row("Applicant Name:", &p.company_name),
        field_row("Application ID:", &p.application_id),
        section("Total Cost of Policy*"),
        invoice_row("Premium", &p.premium),
        invoice_row("State Tax", &p.state_tax),
        invoice_row("Association Dues", ZERO_DOLLARS),
        invoice_row("Policy Fee", &p.policy_fee),
        invoice_row("Inspection Fee", ZERO_DOLLARS),
        invoice_row("Broker Fee", &p.broker_fee),
        invoice_total("TOTAL COST OF POLICY*", &p.total_cost),
        section("Total Deposit"),
        invoice_row("Deposit Premium", ZERO_DOLLARS),
        invoice_row("Deposit Fees", ZERO_DOLLARS),
        invoice_total("TOTAL DEPOSIT", ZERO_DOLLARS),
        invoice_total("TOTAL TO RETAIN", ZERO_DOLLARS),
        section("Total to be Sent"),
        invoice_total("MAKE CHECK PAYABLE FOR", &p.total_cost),
        field_row("Payment Option:", &p.payment_option),
        "<p>* The binding of this insurance policy is an agreement to the above-referenced prices and its terms and conditions.</p>"
            .to_string(),
        signature_line("Signature of Producer", p.signatures.producer_signature.as_deref()),
    ];
    page(p, 12, "Producer", rows.concat())
}
