use askama::Template;

use crate::submission::Submission;

/// `[<label>] <subject> – <name>`
pub fn render_subject(site_label: &str, s: &Submission) -> String {
    format!("[{site_label}] {} – {}", s.subject, s.name)
}

struct DetailRow<'a> {
    label: &'static str,
    value: &'a str,
    /// Empty when the value is not a link.
    href: String,
}

#[derive(Template)]
#[template(path = "email/contact.html")]
struct ContactCardTemplate<'a> {
    rows: Vec<DetailRow<'a>>,
    message_lines: Vec<&'a str>,
    photo_urls: &'a [String],
    time: String,
    source: &'a str,
    ip: &'a str,
    user_agent: &'a str,
}

/// Rows of the "Contact Details" card. Email and phone only when given;
/// partner fields follow in canonical order.
fn detail_rows(s: &Submission) -> Vec<DetailRow<'_>> {
    let mut rows = vec![DetailRow { label: "Name", value: &s.name, href: String::new() }];

    if !s.email.is_empty() {
        rows.push(DetailRow { label: "Email", value: &s.email, href: format!("mailto:{}", s.email) });
    }
    if !s.phone.is_empty() {
        rows.push(DetailRow { label: "Phone", value: &s.phone, href: format!("tel:{}", s.phone) });
    }
    rows.push(DetailRow { label: "Service", value: &s.subject, href: String::new() });

    for (field, value) in &s.extras {
        rows.push(DetailRow { label: field.label(), value, href: String::new() });
    }

    rows
}

pub fn render_html(s: &Submission) -> Result<String, String> {
    let template = ContactCardTemplate {
        rows: detail_rows(s),
        message_lines: s.message.split('\n').collect(),
        photo_urls: &s.photo_urls,
        time: s.timestamp_rfc3339(),
        source: &s.source,
        ip: &s.ip,
        user_agent: &s.user_agent,
    };
    template
        .render()
        .map_err(|e| format!("Failed to render contact email: {e}"))
}

pub fn render_text(s: &Submission) -> String {
    let mut out = format!("NEW WEBSITE CONTACT - {}\n\nCONTACT DETAILS:\nName: {}\n", s.subject, s.name);

    if !s.email.is_empty() {
        out.push_str(&format!("Email: {}\n", s.email));
    }
    if !s.phone.is_empty() {
        out.push_str(&format!("Phone: {}\n", s.phone));
    }
    out.push_str(&format!("Service: {}\n", s.subject));
    for (field, value) in &s.extras {
        out.push_str(&format!("{}: {value}\n", field.label()));
    }

    out.push_str(&format!("\nMESSAGE:\n{}\n", s.message));

    if !s.photo_urls.is_empty() {
        out.push_str(&format!("\nPHOTOS ({}):\n", s.photo_urls.len()));
        for url in &s.photo_urls {
            out.push_str(&format!("{url}\n"));
        }
    }

    out.push_str(&format!(
        "\n---\nSubmission Details:\nTime: {}\nSource: {}\nIP: {}\n",
        s.timestamp_rfc3339(),
        s.source,
        s.ip
    ));

    out
}
