//! Server-rendered HTML pages.

pub mod dashboard;
pub mod error;
pub mod home;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #f3f4f6; color: #1f2937; margin: 0; }
main { max-width: 72rem; margin: 0 auto; padding: 2rem 1rem; }
.card { background: #fff; border-radius: 0.75rem; box-shadow: 0 4px 12px rgba(0,0,0,.08); padding: 1.5rem; margin-bottom: 1.5rem; }
.narrow { max-width: 42rem; margin: 0 auto; }
.center { text-align: center; }
h1 { margin: 0 0 .5rem; }
.muted { color: #6b7280; }
label { display: block; font-size: .875rem; margin: .75rem 0 .25rem; }
input[type=url], input[type=text] { width: 100%; box-sizing: border-box; padding: .5rem .75rem; border: 1px solid #d1d5db; border-radius: .375rem; }
button, .button { display: inline-block; border: 0; border-radius: .375rem; padding: .5rem 1rem; background: #3b82f6; color: #fff; cursor: pointer; text-decoration: none; font-size: .875rem; }
button.danger { background: #ef4444; }
.error { margin-top: 1rem; padding: .75rem; background: #fee2e2; color: #b91c1c; border-radius: .375rem; }
.notice { margin-top: 1rem; padding: .75rem; background: #dcfce7; color: #166534; border-radius: .375rem; }
.result { margin-top: 1.5rem; padding: 1rem; background: #f0fdf4; border: 1px solid #bbf7d0; border-radius: .375rem; }
.break { word-break: break-all; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: .75rem 1rem; border-bottom: 1px solid #e5e7eb; vertical-align: top; }
th { font-size: .75rem; text-transform: uppercase; color: #6b7280; }
details { margin-top: .5rem; }
code { background: #f3f4f6; padding: .125rem .375rem; border-radius: .25rem; }
"#;

/// Wraps `body` in the shared page chrome.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<main>\n{}\n</main>\n</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    )
}

/// Escapes text for use in HTML content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encodes a query parameter value.
pub fn encode_query_value(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn encodes_query_values() {
        assert_eq!(encode_query_value("a b&c=d"), "a+b%26c%3Dd");
    }
}
