//! User-authored markdown to sanitized HTML.
//!
//! About-texts are rendered on other users' pages, so raw HTML embedded
//! in the source is never passed through: the compiler escapes it, and
//! dangerous link protocols are dropped. This is a security invariant,
//! not a style preference.

use markdown::{Options as MarkdownOptions, to_html_with_options};

/// Render an about-text to HTML safe to embed in another user's page.
///
/// GFM extensions (tables, strikethrough) are on; raw HTML and dangerous
/// protocols stay off. Headings deeper than level 3 are clamped to `<h3>`
/// and every anchor is forced to open in a new tab with a safe `rel`.
pub fn render_about(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let options = markdown_options();
    let html = to_html_with_options(trimmed, &options).unwrap_or_default();

    force_anchor_attributes(&clamp_headings(&html))
}

fn markdown_options() -> MarkdownOptions {
    // Options::gfm() leaves allow_dangerous_html and
    // allow_dangerous_protocol disabled. Keep it that way.
    MarkdownOptions::gfm()
}

/// Rewrite `<h4>`..`<h6>` (and their closing tags) to `<h3>`.
fn clamp_headings(html: &str) -> String {
    let mut out = html.to_string();
    for level in ["4", "5", "6"] {
        out = out
            .replace(&format!("<h{}>", level), "<h3>")
            .replace(&format!("</h{}>", level), "</h3>");
    }
    out
}

/// Force `target="_blank"` and a safe `rel` on every anchor.
///
/// The renderer itself never emits those attributes, but the guard keeps
/// re-rendering stored HTML from ever duplicating them.
fn force_anchor_attributes(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find("<a ") {
        let after_start = &rest[start..];
        let Some(end) = after_start.find('>') else {
            break;
        };

        out.push_str(&rest[..start]);

        let tag = &after_start[..end];
        out.push_str(tag);
        if !has_attribute(tag, "target") {
            out.push_str(" target=\"_blank\"");
        }
        if !has_attribute(tag, "rel") {
            out.push_str(" rel=\"nofollow noopener noreferrer\"");
        }
        out.push('>');

        rest = &after_start[end + 1..];
    }

    out.push_str(rest);
    out
}

/// True when `name=` appears as an attribute of the opening tag, i.e.
/// after whitespace outside any quoted value. A plain substring check
/// would also match `target=`/`rel=` inside an href query string.
fn has_attribute(tag: &str, name: &str) -> bool {
    let mut in_quotes = false;
    for (index, ch) in tag.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c.is_ascii_whitespace() && !in_quotes => {
                let rest = &tag[index + 1..];
                if rest.starts_with(name) && rest[name.len()..].starts_with('=') {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::render_about;

    #[test]
    fn renders_basic_markdown() {
        let html = render_about("# Hello\n\nSome **bold** text.");

        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn raw_script_tags_never_appear_unescaped() {
        let html = render_about("before <script>alert(1)</script> after");

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn javascript_links_are_neutralized() {
        let html = render_about("[click](javascript:alert(1))");

        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn anchors_open_in_new_tab_exactly_once() {
        let html = render_about("[a](https://example.com) and [b](https://example.org)");

        assert_eq!(html.matches("target=\"_blank\"").count(), 2);
        assert_eq!(html.matches("rel=\"nofollow noopener noreferrer\"").count(), 2);
        for anchor in html.split("<a ").skip(1) {
            let tag = anchor.split('>').next().unwrap();
            assert_eq!(tag.matches("target=").count(), 1);
        }
    }

    #[test]
    fn query_parameters_resembling_attributes_do_not_suppress_forcing() {
        let html = render_about("[a](https://example.com/?target=abc&rel=x)");

        assert_eq!(html.matches("target=\"_blank\"").count(), 1);
        assert_eq!(html.matches("rel=\"nofollow noopener noreferrer\"").count(), 1);
    }

    #[test]
    fn deep_headings_clamp_to_level_three() {
        let html = render_about("#### Deep\n\n###### Deeper");

        assert!(!html.contains("<h4>"));
        assert!(!html.contains("<h6>"));
        assert_eq!(html.matches("<h3>").count(), 2);
    }

    #[test]
    fn gfm_tables_and_strikethrough_render() {
        let html = render_about("| a | b |\n| - | - |\n| 1 | 2 |\n\n~~gone~~");

        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(render_about("   \n  "), "");
    }
}
