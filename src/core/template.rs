//! HTML templating for rendered documents
//!
//! Builds the markup handed to the document renderer: one fragment per
//! objection, a page wrapper naming the plan, and the consolidated summary.
//! Absent optional values render as "not provided". All interpolated text is
//! HTML-escaped; citizen-supplied comments must not become markup.

use crate::domain::{AttachmentMeta, GeoPoint, Objection, Plan};
use std::fmt::Write;

const NOT_PROVIDED: &str = "not provided";

/// Escapes text for safe interpolation into HTML
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn optional(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => escape_html(v),
        _ => NOT_PROVIDED.to_string(),
    }
}

fn coordinate(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => NOT_PROVIDED.to_string(),
    }
}

fn location_cell(location: Option<&GeoPoint>) -> String {
    let (lat, lng) = match location {
        Some(point) => (coordinate(point.lat), coordinate(point.lng)),
        None => (NOT_PROVIDED.to_string(), NOT_PROVIDED.to_string()),
    };
    format!("Latitude: {lat}, Longitude: {lng}")
}

/// Builds the HTML fragment for one objection
///
/// The fragment holds the objection table (date, category, comment,
/// location), the submitter sub-table, and a table of attachment filenames
/// when any resolved attachments exist. The same fragment is reused inside
/// the consolidated summary.
pub fn objection_fragment(objection: &Objection, attachments: &[&AttachmentMeta]) -> String {
    let mut html = String::new();

    // Writes into a String cannot fail.
    let _ = write!(
        html,
        "<table>\n\
         <tr><td>Date:</td><td>{date}</td></tr>\n\
         <tr><td>Category:</td><td>{category}</td></tr>\n\
         <tr><td>Content:</td><td>{comment}</td></tr>\n\
         <tr><td>Location:</td><td>{location}</td></tr>\n\
         </table>\n\
         <p>Objecting person:</p>\n\
         <table>\n\
         <tr><td>Name:</td><td>{name}</td></tr>\n\
         <tr><td>Institution:</td><td>{institution}</td></tr>\n\
         <tr><td>Department:</td><td>{department}</td></tr>\n\
         <tr><td>Phone:</td><td>{phone}</td></tr>\n\
         <tr><td>Email:</td><td>{email}</td></tr>\n\
         </table>\n",
        date = objection.created_at.format("%Y-%m-%d %H:%M UTC"),
        category = optional(objection.category.as_deref()),
        comment = escape_html(&objection.comment),
        location = location_cell(objection.location.as_ref()),
        name = optional(objection.submitter.name.as_deref()),
        institution = optional(objection.submitter.institution.as_deref()),
        department = optional(objection.submitter.department.as_deref()),
        phone = optional(objection.submitter.phone.as_deref()),
        email = optional(objection.submitter.email.as_deref()),
    );

    if !attachments.is_empty() {
        html.push_str("<p>Attached files:</p>\n<table>\n");
        for attachment in attachments {
            let _ = writeln!(
                html,
                "<tr><td>{}</td></tr>",
                escape_html(&attachment.filename)
            );
        }
        html.push_str("</table>\n");
    }

    html
}

fn plan_header(plan: &Plan, intro: &str) -> String {
    format!(
        "<h1>Citizen input report</h1>\n\
         <p>{intro}</p>\n\
         <table>\n\
         <tr><td>Title:</td><td>{title}</td></tr>\n\
         <tr><td>Layer name:</td><td>{layer}</td></tr>\n\
         <tr><td>MoLG ID:</td><td>{external}</td></tr>\n\
         </table>\n",
        title = escape_html(&plan.title),
        layer = escape_html(&plan.layer_name),
        external = escape_html(&plan.external_id),
    )
}

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

/// Builds the full document for one objection
pub fn objection_document(plan: &Plan, fragment: &str) -> String {
    let mut body = plan_header(plan, "This objection was filed against the DMP:");
    body.push_str("<h2>Objection</h2>\n");
    body.push_str(fragment);
    page(&body)
}

/// Builds the consolidated summary document
///
/// Fragments appear in assembler order, each preceded by an
/// "Objection #N" heading with 1-based numbering.
pub fn summary_document(plan: &Plan, fragments: &[String]) -> String {
    let mut body = plan_header(
        plan,
        "This report contains all objections filed against the DMP:",
    );
    for (index, fragment) in fragments.iter().enumerate() {
        let _ = writeln!(body, "<h2>Objection #{}</h2>", index + 1);
        body.push_str(fragment);
    }
    page(&body)
}
