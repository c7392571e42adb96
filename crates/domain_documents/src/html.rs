//! HTML helpers shared by the document templates

use domain_submission::YesNo;

/// Escapes text for use in element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const UNDERLINED_YES: &str = r#"<span style="text-decoration: underline;">Yes</span>&nbsp;<span>No</span>"#;
const UNDERLINED_NO: &str = r#"<span>Yes</span>&nbsp;<span style="text-decoration: underline;">No</span>"#;

/// Both choices, the selected one underlined
///
/// An unanswered question renders as `default`.
pub fn yes_no(answer: Option<&YesNo>, default: bool) -> &'static str {
    if answer.map_or(default, |a| a.answer) {
        UNDERLINED_YES
    } else {
        UNDERLINED_NO
    }
}

/// Same as [`yes_no`] for a plain flag
pub fn yes_no_flag(answer: Option<bool>) -> &'static str {
    if answer.unwrap_or(false) {
        UNDERLINED_YES
    } else {
        UNDERLINED_NO
    }
}

/// `<strong>label</strong> value` row with the value escaped
pub fn field_row(label: &str, value: &str) -> String {
    format!(
        r#"<div class="field-row"><strong>{}</strong> {}</div>"#,
        label,
        escape(value)
    )
}

/// A signature line, blank when nothing was captured
pub fn signature_line(label: &str, value: Option<&str>) -> String {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .map(escape)
        .unwrap_or_else(|| BLANK_LINE.to_string());
    format!(
        r#"<div class="signature-field"><div class="signature-label">{label}</div><div class="signature-line">{value}</div></div>"#
    )
}

pub const BLANK_LINE: &str = "_________________________";

/// Strips comments, collapses whitespace and drops whitespace between tags
pub fn minify(html: &str) -> String {
    let mut without_comments = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find("<!--") {
        without_comments.push_str(&rest[..start]);
        rest = match rest[start..].find("-->") {
            Some(end) => &rest[start + end + 3..],
            None => "",
        };
    }
    without_comments.push_str(rest);

    let mut collapsed = String::with_capacity(without_comments.len());
    let mut pending_space = false;
    for c in without_comments.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            // whitespace between two tags is dropped entirely
            if !(c == '<' && collapsed.ends_with('>')) && !collapsed.is_empty() {
                collapsed.push(' ');
            }
            pending_space = false;
        }
        collapsed.push(c);
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape(r#"<b>"Smith & Sons'"</b>"#),
            "&lt;b&gt;&quot;Smith &amp; Sons&#39;&quot;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_yes_no_underlines_selected() {
        assert!(yes_no(Some(&YesNo::yes()), false).starts_with(r#"<span style="text-decoration: underline;">Yes"#));
        assert!(yes_no(Some(&YesNo::no()), true).ends_with(r#"<span style="text-decoration: underline;">No</span>"#));
        assert_eq!(yes_no(None, true), UNDERLINED_YES);
        assert_eq!(yes_no_flag(None), UNDERLINED_NO);
    }

    #[test]
    fn test_minify() {
        let html = "<div>\n  <!-- note -->\n  <p>Hello   world</p>\n</div>\n";
        assert_eq!(minify(html), "<div><p>Hello world</p></div>");
    }

    #[test]
    fn test_minify_keeps_choices_apart() {
        let html = format!("<td>\n  {}\n</td>", yes_no_flag(Some(true)));
        assert_eq!(
            minify(&html),
            r#"<td><span style="text-decoration: underline;">Yes</span>&nbsp;<span>No</span></td>"#
        );
    }

    #[test]
    fn test_minify_keeps_text_spacing() {
        assert_eq!(minify("<b>Date</b>  01/02/2026"), "<b>Date</b> 01/02/2026");
        assert_eq!(minify("<!-- unterminated"), "");
    }

    #[test]
    fn test_blank_signature_line() {
        assert!(signature_line("Date", None).contains(BLANK_LINE));
        assert!(signature_line("Date", Some("  ")).contains(BLANK_LINE));
        assert!(signature_line("Name", Some("A&B")).contains("A&amp;B"));
    }
}
