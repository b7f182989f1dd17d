use super::{escape, layout};
use snip_core::Link;

/// What the home page shows besides the form.
#[derive(Debug, Default)]
pub struct HomeView<'a> {
    pub error: Option<&'a str>,
    /// Value to refill the URL input with.
    pub submitted_url: Option<&'a str>,
    pub submitted_path: Option<&'a str>,
    pub created: Option<(&'a Link, String)>,
}

pub fn render(view: &HomeView<'_>) -> String {
    let mut body = String::from(
        "<div class=\"narrow\">\n<div class=\"center\">\n<h1>Short Link Service</h1>\n\
         <p class=\"muted\">Create short links for easy sharing</p>\n</div>\n<div class=\"card\">\n",
    );

    body.push_str(&format!(
        "<form method=\"post\" action=\"/\">\n\
         <label for=\"url\">Enter URL to shorten</label>\n\
         <input type=\"url\" name=\"url\" id=\"url\" value=\"{}\" required placeholder=\"https://example.com\">\n\
         <label for=\"customPath\">Custom path (optional)</label>\n\
         <input type=\"text\" name=\"customPath\" id=\"customPath\" value=\"{}\" pattern=\"[A-Za-z0-9_\\-]+\" placeholder=\"my-link\">\n\
         <p><button type=\"submit\">Shorten URL</button></p>\n</form>\n",
        escape(view.submitted_url.unwrap_or_default()),
        escape(view.submitted_path.unwrap_or_default()),
    ));

    if let Some(error) = view.error {
        body.push_str(&format!("<div class=\"error\">{}</div>\n", escape(error)));
    }

    if let Some((link, short_url)) = &view.created {
        let short_url = escape(short_url);
        body.push_str(&format!(
            "<div class=\"result\">\n<h3>Your short link:</h3>\n\
             <p><a class=\"break\" id=\"short-url\" href=\"{0}\" target=\"_blank\">{0}</a> \
             <button type=\"button\" onclick=\"copyShortUrl(this)\" data-url=\"{0}\">Copy</button></p>\n\
             <p class=\"muted\">Original: <span class=\"break\">{1}</span></p>\n</div>\n\
             <script>\nfunction copyShortUrl(button) {{\n\
             navigator.clipboard.writeText(button.dataset.url).then(function () {{\n\
             button.textContent = 'Copied!';\n\
             setTimeout(function () {{ button.textContent = 'Copy'; }}, 2000);\n\
             }});\n}}\n</script>\n",
            short_url,
            escape(&link.original_url),
        ));
    }

    body.push_str("</div>\n<p class=\"center\"><a href=\"/dashboard\">Go to Dashboard</a></p>\n</div>");
    layout("Short Link Service", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use snip_core::LinkId;

    #[test]
    fn refills_form_and_shows_error() {
        let html = render(&HomeView {
            error: Some("Invalid URL format"),
            submitted_url: Some("nope\"><script>"),
            ..Default::default()
        });

        assert!(html.contains("Invalid URL format"));
        assert!(html.contains("value=\"nope&quot;&gt;&lt;script&gt;\""));
    }

    #[test]
    fn shows_created_link() {
        let link = Link::new(
            LinkId::new("abc123").unwrap(),
            "https://example.com/page",
            Timestamp::UNIX_EPOCH,
        );
        let html = render(&HomeView {
            created: Some((&link, "http://localhost/s/abc123".to_string())),
            ..Default::default()
        });

        assert!(html.contains("href=\"http://localhost/s/abc123\""));
        assert!(html.contains("https://example.com/page"));
        assert!(html.contains("Copy"));
    }
}
