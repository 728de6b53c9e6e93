//! Rendering of generated badges and lists into downloadable documents.

use std::fmt::{self, Write};

use crate::badge::{Badge, BadgeSheet};
use crate::error::RenderError;
use crate::lists::{attendee_list, guest_list, to_csv};

/// Output document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Badges,
    AttendeeList,
    GuestList,
}

impl Template {
    pub const ALL: [Template; 3] = [Template::Badges, Template::AttendeeList, Template::GuestList];

    /// File name the artifact is saved and served under.
    pub fn file_name(self) -> &'static str {
        match self {
            Template::Badges => "badges.html",
            Template::AttendeeList => "attendees.csv",
            Template::GuestList => "guests.csv",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Template::Badges => "text/html; charset=utf-8",
            Template::AttendeeList | Template::GuestList => "text/csv; charset=utf-8",
        }
    }
}

/// Turns a badge sheet into document bytes.
pub trait Renderer {
    fn render(&self, template: Template, sheet: &BadgeSheet) -> Result<Vec<u8>, RenderError>;
}

/// Renders badges as one printable HTML page and the lists as CSV.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    /// URL prefix prepended to the logo file name.
    pub logo_base: String,
}

impl HtmlRenderer {
    pub fn new(logo_base: impl Into<String>) -> Self {
        Self {
            logo_base: logo_base.into(),
        }
    }

    fn render_badges(&self, sheet: &BadgeSheet) -> Result<String, fmt::Error> {
        let mut html = String::new();
        let title = escape(&sheet.competition);
        write!(
            html,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{} badges</title>\n<style>{}</style>\n</head>\n<body>\n",
            title, BADGE_CSS
        )?;
        for badge in &sheet.badges {
            self.render_badge(&mut html, sheet, badge)?;
        }
        html.push_str("</body>\n</html>\n");
        Ok(html)
    }

    fn render_badge(&self, html: &mut String, sheet: &BadgeSheet, badge: &Badge) -> fmt::Result {
        html.push_str("<div class=\"badge\">\n<section class=\"front\">\n");
        if let Some(logo) = &sheet.logo {
            writeln!(
                html,
                "<img class=\"logo\" src=\"{}{}\" alt=\"logo\">",
                escape(&self.logo_base),
                escape(logo)
            )?;
        }
        writeln!(html, "<h1>{}</h1>", escape(&badge.name))?;
        let id = badge
            .registrant_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        writeln!(
            html,
            "<p class=\"ids\">ID {} &middot; WCA ID {}</p>\n<p class=\"country\">{}</p>",
            id,
            escape(&badge.wca_id),
            escape(&badge.country)
        )?;
        if !badge.roles.is_empty() {
            html.push_str("<ul class=\"roles\">\n");
            for role in &badge.roles {
                writeln!(html, "<li>{}</li>", escape(role))?;
            }
            html.push_str("</ul>\n");
        }
        html.push_str("</section>\n<section class=\"back\">\n");
        for (day, entries) in badge.agenda.days() {
            writeln!(html, "<h2>{}</h2>\n<table>", escape(day))?;
            for entry in entries.values() {
                writeln!(
                    html,
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape(&entry.time),
                    escape(&entry.event),
                    escape(entry.role)
                )?;
            }
            html.push_str("</table>\n");
        }
        html.push_str("</section>\n</div>\n");
        Ok(())
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, template: Template, sheet: &BadgeSheet) -> Result<Vec<u8>, RenderError> {
        let bytes = match template {
            Template::Badges => self.render_badges(sheet)?.into_bytes(),
            Template::AttendeeList => to_csv(&attendee_list(sheet))?,
            Template::GuestList => to_csv(&guest_list(sheet))?,
        };
        tracing::debug!(?template, bytes = bytes.len(), "Rendered document");
        Ok(bytes)
    }
}

const BADGE_CSS: &str = "\
body{font-family:sans-serif;margin:0}\
.badge{display:flex;page-break-inside:avoid;border:1px dashed #999;margin:4mm}\
.front,.back{width:90mm;min-height:120mm;padding:4mm;box-sizing:border-box}\
.logo{max-width:40mm;max-height:25mm}\
h1{font-size:16pt;margin:2mm 0}\
h2{font-size:10pt;margin:2mm 0 1mm}\
table{font-size:8pt;border-collapse:collapse;width:100%}\
td{padding:0 1mm}\
.roles{font-size:8pt;padding-left:4mm}";

/// Escapes text for HTML element and attribute content.
fn escape(text: &str) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<b>\"Tom & Jerry's\"</b>"), "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;");
    }

    #[test]
    fn empty_sheet_renders_page_shell() {
        let sheet = BadgeSheet {
            competition: "Cube <Open>".to_string(),
            ..BadgeSheet::default()
        };
        let html = String::from_utf8(HtmlRenderer::default().render(Template::Badges, &sheet).unwrap()).unwrap();
        assert!(html.contains("<title>Cube &lt;Open&gt; badges</title>"));
        assert!(!html.contains("class=\"badge\""));
    }

    #[test]
    fn badge_front_carries_logo_identity_and_roles() {
        let sheet = BadgeSheet {
            competition: "Cube Open".to_string(),
            logo: Some("logo.png".to_string()),
            badges: vec![Badge {
                registrant_id: Some(7),
                name: "Ada <Lovelace>".to_string(),
                wca_id: "2015LOVE01".to_string(),
                country: "United Kingdom".to_string(),
                guests: 0,
                agenda: Default::default(),
                roles: ["C : Competitor".to_string()].into_iter().collect(),
            }],
            ..BadgeSheet::default()
        };
        let html = HtmlRenderer::new("/static/").render_badges(&sheet).unwrap();
        assert!(html.contains("<img class=\"logo\" src=\"/static/logo.png\" alt=\"logo\">"));
        assert!(html.contains("<h1>Ada &lt;Lovelace&gt;</h1>"));
        assert!(html.contains("ID 7 &middot; WCA ID 2015LOVE01"));
        assert!(html.contains("<li>C : Competitor</li>"));
        assert!(html.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn template_file_names() {
        let names: Vec<&str> = Template::ALL.iter().map(|t| t.file_name()).collect();
        assert_eq!(names, vec!["badges.html", "attendees.csv", "guests.csv"]);
    }
}
