//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Truncate a string to `length` characters and append `omission`.
///
/// Counts Unicode scalar values, so multi-byte text is never split inside a
/// character. Strings within the limit are returned unchanged.
///
/// # Examples
/// ```ignore
/// truncate("Hello World", 5, "...") // -> "Hello..."
/// ```
pub fn truncate(s: &str, length: usize, omission: &str) -> String {
    match s.char_indices().nth(length) {
        None => s.to_string(),
        Some((byte_idx, _)) => format!("{}{}", &s[..byte_idx], omission),
    }
}

/// Render an opening tag with an optional class attribute
pub fn open_tag(name: &str, class: Option<&str>) -> String {
    match class {
        Some(class) => format!(r#"<{} class="{}">"#, name, html_escape(class)),
        None => format!("<{}>", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5, "..."), "Hello...");
        assert_eq!(truncate("Hi", 10, "..."), "Hi");
        assert_eq!(truncate("exact", 5, "..."), "exact");
    }

    #[test]
    fn test_truncate_multibyte() {
        let text = "café crème brûlée 🍮🍮🍮";
        let out = truncate(text, 19, "...");
        assert_eq!(out, "café crème brûlée 🍮...");
        assert_eq!(out.chars().count(), 22);
    }

    #[test]
    fn test_open_tag() {
        assert_eq!(open_tag("p", None), "<p>");
        assert_eq!(open_tag("ul", Some("list-disc")), r#"<ul class="list-disc">"#);
    }
}
