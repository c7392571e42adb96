/// Print stylesheet shared by every generated document
pub const PRINT_CSS: &str = r#"
@page { size: Letter; margin: 0; }
* { box-sizing: border-box; }
body { margin: 0; font-family: Helvetica, Arial, sans-serif; font-size: 9pt; color: #1f2937; line-height: 1.4; }
.page { display: flex; width: 8.5in; min-height: 11in; position: relative; page-break-after: always; }
.page:last-child { page-break-after: auto; }
.sidebar { width: 1.6in; background: #0f2a4a; color: #fff; padding: 0.3in 0.15in; text-align: center; }
.logo { font-size: 20pt; font-weight: 700; letter-spacing: 1px; }
.sidebar-title { margin-top: 0.4in; font-size: 12pt; font-weight: 600; }
.qr-text, .qr-page { font-family: monospace; font-size: 8pt; margin-top: 0.05in; }
.applicant-label { margin-top: 0.2in; font-size: 8pt; text-transform: uppercase; }
.main-content { flex: 1; padding: 0.4in 0.45in 0.6in; }
.section-title { font-size: 10pt; font-weight: 700; margin: 0.15in 0 0.05in; text-transform: uppercase; border-bottom: 1px solid #cbd5e1; }
.field-row { margin: 0.03in 0; }
.question-item { margin: 0.08in 0; }
.yes-no-options span { margin-right: 0.15in; }
.explanation-field { margin-left: 0.2in; font-style: italic; }
.signature-field { margin-top: 0.15in; }
.signature-label { font-size: 8pt; color: #475569; }
.signature-line { border-bottom: 1px solid #1f2937; min-height: 0.25in; }
.initial-line { margin-top: 0.1in; text-align: right; }
.invoice-row, .invoice-row-total { display: flex; justify-content: space-between; padding: 0.03in 0; }
.invoice-row-total { border-top: 1px solid #1f2937; font-weight: 700; }
.fee-table { width: 100%; border-collapse: collapse; margin-top: 0.1in; }
.fee-table td { padding: 0.05in 0; border-bottom: 1px solid #e2e8f0; }
.fee-table td.amount { text-align: right; }
.fee-table tr.total td { font-weight: 700; border-top: 2px solid #1f2937; }
.page-number { position: absolute; bottom: 0.3in; right: 0.45in; font-size: 8pt; color: #64748b; }
"#;
