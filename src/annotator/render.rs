//! HTML rendering of linked tokens, and its inverse for visible text.

use std::sync::LazyLock;

use regex::Regex;

/// Everything the annotator emits that is not visible text: tags, and the
/// reading inside `<rt>`.
static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<rt>.*?</rt>|</?(?:a|ruby)\b[^>]*>").expect("valid regex"));

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// `<a href="URL"><ruby>SURFACE<rt>READING</rt></ruby></a>`
pub(crate) fn render_link(href: &str, surface: &str, reading: &str) -> String {
    format!(
        "<a href=\"{}\"><ruby>{}<rt>{}</rt></ruby></a>",
        escape_html(href),
        escape_html(surface),
        escape_html(reading)
    )
}

/// Visible text of annotated output: markup and readings removed, entities decoded.
pub fn strip_markup(annotated: &str) -> String {
    unescape_html(&MARKUP.replace_all(annotated, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_link_shape() {
        assert_eq!(
            render_link("https://jisho.org/search/雨", "雨", "アメ"),
            "<a href=\"https://jisho.org/search/雨\"><ruby>雨<rt>アメ</rt></ruby></a>"
        );
    }

    #[test]
    fn test_escaping_survives_strip() {
        let rendered = format!(
            "{}{}",
            render_link("https://jisho.org/search/A&B", "A&B", "<x>"),
            escape_html("\"1 < 2\"")
        );
        assert!(!rendered.contains("<x>"));
        assert_eq!(strip_markup(&rendered), "A&B\"1 < 2\"");
    }

    #[test]
    fn test_strip_empty_reading() {
        let rendered = render_link("u", "今日", "");
        assert_eq!(strip_markup(&rendered), "今日");
    }
}
