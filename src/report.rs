//! Human-readable rendering of changelog entries.
//!
//! Two renderings of the same entry: markdown for the terminal and
//! changelog files, HTML for a mail-ready notification body. Neither
//! sends anything anywhere; delivery is the operator's concern.

use crate::extract::Record;
use crate::store::ChangelogEntry;

const TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Render an entry as a markdown report.
pub fn render_markdown(entry: &ChangelogEntry) -> String {
    let mut md = String::new();
    md.push_str("## Zmiany na liście sankcyjnej\n\n");
    md.push_str(&format!(
        "**Data sprawdzenia:** {}\n\n",
        entry.timestamp.format(TIMESTAMP_FMT)
    ));
    md.push_str(&format!(
        "**Dodano:** {} | **Usunięto:** {} | **Zmodyfikowano:** {}\n",
        entry.added_count, entry.removed_count, entry.modified_count
    ));

    if !entry.added.is_empty() {
        md.push_str("\n### ➕ Dodane wpisy\n\n");
        for record in &entry.added {
            push_record_md(&mut md, record);
        }
    }

    if !entry.removed.is_empty() {
        md.push_str("\n### ➖ Usunięte wpisy\n\n");
        for record in &entry.removed {
            push_record_md(&mut md, record);
        }
    }

    if !entry.modified.is_empty() {
        md.push_str("\n### ✏️ Zmodyfikowane wpisy\n\n");
        for modified in &entry.modified {
            md.push_str(&format!("- **{}**\n", modified.id));
            for (field, change) in &modified.changes {
                md.push_str(&format!(
                    "  - {}: {} -> {}\n",
                    field,
                    display_value(&change.old),
                    display_value(&change.new)
                ));
            }
        }
    }

    md
}

fn push_record_md(md: &mut String, record: &Record) {
    md.push_str(&format!("- **{}**\n", record.id));
    for (field, value) in &record.fields {
        if !value.is_empty() {
            md.push_str(&format!("  - {field}: {value}\n"));
        }
    }
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(puste)"
    } else {
        value
    }
}

/// Render an entry as an HTML notification body.
///
/// Mirrors the markdown structure: green additions, red removals, orange
/// modifications with the old value struck through.
pub fn render_html(entry: &ChangelogEntry, source_url: &str) -> String {
    let mut html = vec![
        "<html><body>".to_string(),
        "<h2>Wykryto zmiany na liście sankcyjnej</h2>".to_string(),
        format!(
            "<p><strong>Data sprawdzenia:</strong> {}</p>",
            entry.timestamp.format(TIMESTAMP_FMT)
        ),
        format!(
            "<p><strong>Dodano:</strong> {} | <strong>Usunięto:</strong> {} | \
             <strong>Zmodyfikowano:</strong> {}</p>",
            entry.added_count, entry.removed_count, entry.modified_count
        ),
        "<hr>".to_string(),
    ];

    if !entry.added.is_empty() {
        html.push("<h3 style='color: green;'>➕ Dodane wpisy:</h3>".to_string());
        html.push("<ul>".to_string());
        for record in &entry.added {
            push_record_html(&mut html, record);
        }
        html.push("</ul>".to_string());
    }

    if !entry.removed.is_empty() {
        html.push("<h3 style='color: red;'>➖ Usunięte wpisy:</h3>".to_string());
        html.push("<ul>".to_string());
        for record in &entry.removed {
            push_record_html(&mut html, record);
        }
        html.push("</ul>".to_string());
    }

    if !entry.modified.is_empty() {
        html.push("<h3 style='color: orange;'>✏️ Zmodyfikowane wpisy:</h3>".to_string());
        html.push("<ul>".to_string());
        for modified in &entry.modified {
            html.push(format!("<li><strong>{}</strong><br>", escape(&modified.id)));
            for (field, change) in &modified.changes {
                html.push(format!(
                    "&nbsp;&nbsp;{}: <span style='color:red;text-decoration:line-through'>{}</span> \
                     → <span style='color:green'>{}</span><br>",
                    escape(field),
                    escape(&change.old),
                    escape(&change.new)
                ));
            }
            html.push("</li>".to_string());
        }
        html.push("</ul>".to_string());
    }

    html.push(format!(
        "<hr><p><small>Źródło: <a href='{source_url}'>{source_url}</a></small></p>"
    ));
    html.push("</body></html>".to_string());

    html.join("\n")
}

fn push_record_html(html: &mut Vec<String>, record: &Record) {
    html.push(format!("<li><strong>{}</strong><br>", escape(&record.id)));
    for (field, value) in &record.fields {
        if !value.is_empty() {
            html.push(format!("&nbsp;&nbsp;{}: {}<br>", escape(field), escape(value)));
        }
    }
    html.push("</li>".to_string());
}

/// Minimal HTML escaping for field values.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_diff;
    use crate::store::ChangelogEntry;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, fields: &[(&str, &str)]) -> Record {
        let mut r = Record::new();
        r.id = id.to_string();
        for (k, v) in fields {
            r.fields.insert((*k).to_string(), (*v).to_string());
        }
        r
    }

    fn sample_entry() -> ChangelogEntry {
        let old = vec![
            record("1|X", &[("nazwa", "X"), ("status", "active")]),
            record("2|Y", &[("nazwa", "Y")]),
        ];
        let new = vec![
            record("1|X", &[("nazwa", "X"), ("status", "removed")]),
            record("3|Z", &[("nazwa", "Z"), ("uwagi", "")]),
        ];
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 15, 6, 30, 0).unwrap();
        ChangelogEntry::new(compute_diff(&old, &new), timestamp)
    }

    #[test]
    fn markdown_lists_all_three_sections() {
        let md = render_markdown(&sample_entry());
        assert!(md.contains("Dodane wpisy"));
        assert!(md.contains("Usunięte wpisy"));
        assert!(md.contains("Zmodyfikowane wpisy"));
        assert!(md.contains("**3|Z**"));
        assert!(md.contains("**2|Y**"));
        assert!(md.contains("status: active -> removed"));
        assert!(md.contains("2024-03-15T06:30:00Z"));
    }

    #[test]
    fn markdown_skips_empty_field_values() {
        let md = render_markdown(&sample_entry());
        assert!(!md.contains("uwagi"));
    }

    #[test]
    fn html_marks_old_values_struck_through() {
        let html = render_html(&sample_entry(), "https://example.com/lista");
        assert!(html.contains("line-through'>active</span>"));
        assert!(html.contains("color:green'>removed</span>"));
        assert!(html.contains("https://example.com/lista"));
    }

    #[test]
    fn html_escapes_field_values() {
        let new = vec![record("1|<X>", &[("nazwa", "A & B")])];
        let entry = ChangelogEntry::new(compute_diff(&[], &new), Utc::now());
        let html = render_html(&entry, "https://example.com");
        assert!(html.contains("1|&lt;X&gt;"));
        assert!(html.contains("A &amp; B"));
    }
}
