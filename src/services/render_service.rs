//! Printable CV page.
//!
//! The output is a standalone HTML document laid out on a fixed A4 sheet
//! (210 x 297 mm, 20 mm margins). The contact line always has three
//! segments, `address | mobile | email`, and keeps empty ones so the layout
//! never shifts between candidates. The same document and branding always
//! produce byte-identical output.

use crate::models::cv::{CvDocument, EducationEntry, ExperienceEntry};
use crate::models::settings::AppSettings;

const PAGE_STYLE: &str = r#"@page { size: 210mm 297mm; margin: 0; }
body { margin: 0; background: #ffffff; }
.page { position: relative; box-sizing: border-box; width: 210mm; height: 297mm; padding: 20mm; overflow: hidden; font-family: "Times New Roman", Times, serif; color: #000000; }
.watermark { position: absolute; inset: 0; z-index: 0; display: flex; align-items: center; justify-content: center; pointer-events: none; }
.watermark img { width: 400px; opacity: 0.08; filter: grayscale(100%); }
.content { position: relative; z-index: 1; }
.header { border-bottom: 2px solid #1e3a8a; padding-bottom: 4mm; margin-bottom: 6mm; }
.header h1 { margin: 0; font-size: 24pt; color: #1e3a8a; text-transform: uppercase; }
.contact { font-size: 10pt; }
.section { margin-bottom: 6mm; }
.section h2 { font-size: 12pt; color: #1e3a8a; border-bottom: 1px solid #cbd5e1; margin: 0 0 2mm 0; }
.entry { margin-bottom: 4mm; }
.entry-head { display: flex; justify-content: space-between; align-items: baseline; }
.role { font-weight: bold; }
.dates { font-size: 9pt; color: #475569; }
.company { font-size: 10pt; font-style: italic; }
.row { display: flex; justify-content: space-between; font-size: 10pt; }
p { margin: 0; white-space: pre-wrap; }"#;

pub fn render_cv(doc: &CvDocument, branding: &AppSettings) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(&doc.full_name)));
    html.push_str(&format!("<style>\n{}\n</style>\n", PAGE_STYLE));
    html.push_str("</head>\n<body>\n<div class=\"page\">\n");

    // Watermark goes first so everything after it paints on top.
    html.push_str(&format!(
        "<div class=\"watermark\"><img src=\"{}\" alt=\"{}\"></div>\n",
        escape(&branding.logo_url),
        escape(&branding.agency_name)
    ));

    html.push_str("<div class=\"content\">\n");
    render_header(&mut html, doc);
    if !doc.summary.is_empty() {
        html.push_str("<div class=\"section\">\n<h2>SUMMARY</h2>\n");
        html.push_str(&format!("<p>{}</p>\n</div>\n", escape(&doc.summary)));
    }
    if !doc.experiences.is_empty() {
        html.push_str("<div class=\"section\">\n<h2>EXPERIENCE</h2>\n");
        for entry in &doc.experiences {
            render_experience(&mut html, entry);
        }
        html.push_str("</div>\n");
    }
    let educations = sorted_educations(&doc.educations);
    if !educations.is_empty() {
        html.push_str("<div class=\"section\">\n<h2>EDUCATION</h2>\n");
        for entry in educations {
            render_education(&mut html, entry);
        }
        html.push_str("</div>\n");
    }
    if !doc.skills.is_empty() {
        html.push_str("<div class=\"section\">\n<h2>SKILLS</h2>\n");
        html.push_str(&format!("<p>{}</p>\n</div>\n", escape(&doc.skills)));
    }
    html.push_str("</div>\n</div>\n</body>\n</html>\n");
    html
}

/// `address | mobile | email`, empty segments included.
pub fn contact_line(doc: &CvDocument) -> String {
    [
        doc.address.as_str(),
        doc.mobile.as_str(),
        doc.email.as_deref().unwrap_or(""),
    ]
    .join(" | ")
}

/// Highest qualification first; equal levels keep their stored order.
pub fn sorted_educations(educations: &[EducationEntry]) -> Vec<&EducationEntry> {
    let mut sorted: Vec<&EducationEntry> = educations.iter().collect();
    sorted.sort_by(|a, b| b.level.rank().cmp(&a.level.rank()));
    sorted
}

fn render_header(html: &mut String, doc: &CvDocument) {
    html.push_str("<div class=\"header\">\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(&doc.full_name)));
    html.push_str(&format!(
        "<div class=\"contact\">{}</div>\n",
        escape(&contact_line(doc))
    ));
    html.push_str("</div>\n");
}

fn render_experience(html: &mut String, entry: &ExperienceEntry) {
    let end = entry.effective_end_date().unwrap_or("Present");
    html.push_str("<div class=\"entry\">\n<div class=\"entry-head\">");
    html.push_str(&format!(
        "<span class=\"role\">{}</span><span class=\"dates\">{} &ndash; {}</span>",
        escape(&entry.role),
        escape(&entry.start_date),
        escape(end)
    ));
    html.push_str("</div>\n");
    html.push_str(&format!(
        "<div class=\"company\">{}</div>\n<p>{}</p>\n</div>\n",
        escape(&entry.company),
        escape(&entry.responsibilities)
    ));
}

fn render_education(html: &mut String, entry: &EducationEntry) {
    html.push_str(&format!(
        "<div class=\"row\"><span><b>{}</b> ({})</span><span>{}, {}</span></div>\n",
        escape(&entry.degree),
        entry.level.label(),
        escape(&entry.board),
        escape(&entry.year)
    ));
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
