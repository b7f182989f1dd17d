use serde::Deserialize;

/// Fields of the shorten form on the home page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkForm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub custom_path: String,
}

impl CreateLinkForm {
    pub fn url(&self) -> &str {
        self.url.trim()
    }

    /// The requested custom id, if one was typed in.
    pub fn custom_path(&self) -> Option<&str> {
        Some(self.custom_path.trim()).filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub proxy: Option<String>,
}

impl RedirectQuery {
    pub fn proxy_enabled(&self) -> bool {
        self.proxy.as_deref() == Some("true")
    }
}
