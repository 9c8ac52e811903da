//! Sitemap of native documentation pages.

use chrono::{DateTime, SecondsFormat, Utc};

pub const DEFAULT_DOCS_URL: &str = "https://docs.fivem.net/natives/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<DateTime<Utc>>,
}

/// Page URL of a native: `{base}?_{hash}`.
pub fn native_url(base: &str, hash: &str) -> String {
    format!("{base}?_{hash}")
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    for entry in entries {
        out.push_str("<url><loc>");
        out.push_str(&escape_xml(&entry.loc));
        out.push_str("</loc>");
        if let Some(lastmod) = entry.lastmod {
            out.push_str("<lastmod>");
            out.push_str(&lastmod.to_rfc3339_opts(SecondsFormat::Millis, true));
            out.push_str("</lastmod>");
        }
        out.push_str("</url>");
    }
    out.push_str("</urlset>");
    out
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn renders_urls_with_lastmod() {
        let lastmod = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let entries = vec![
            SitemapEntry { loc: native_url(DEFAULT_DOCS_URL, "0x43A66C31C68491C0"), lastmod: Some(lastmod) },
            SitemapEntry { loc: native_url("https://x/?a=1&b=", "0x1"), lastmod: None },
        ];
        let xml = render_sitemap(&entries);
        assert!(xml.contains(
            "<url><loc>https://docs.fivem.net/natives/?_0x43A66C31C68491C0</loc><lastmod>2024-03-01T12:30:00.000Z</lastmod></url>"
        ));
        assert!(xml.contains("<loc>https://x/?a=1&amp;b=?_0x1</loc></url>"));
        assert!(xml.ends_with("</urlset>"));
    }
}
