use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub accesscode: Option<String>,
}

/// Raw fields posted by the dashboard's row forms.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardForm {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub id: String,
    pub new_id: Option<String>,
    pub new_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardAction {
    Delete { id: String },
    UpdateId { id: String, new_id: String },
    UpdateUrl { id: String, new_url: String },
}

impl TryFrom<DashboardForm> for DashboardAction {
    type Error = String;

    fn try_from(form: DashboardForm) -> Result<Self, Self::Error> {
        let id = form.id.trim().to_string();
        if id.is_empty() {
            return Err("Link id is required".to_string());
        }

        match form.action.as_str() {
            "delete" => Ok(DashboardAction::Delete { id }),
            "updateId" => match form.new_id.map(|v| v.trim().to_string()) {
                Some(new_id) if !new_id.is_empty() => Ok(DashboardAction::UpdateId { id, new_id }),
                _ => Err("New link id is required".to_string()),
            },
            "updateUrl" => match form.new_url.map(|v| v.trim().to_string()) {
                Some(new_url) if !new_url.is_empty() => {
                    Ok(DashboardAction::UpdateUrl { id, new_url })
                }
                _ => Err("URL is required".to_string()),
            },
            other => Err(format!("Unknown action: {}", other)),
        }
    }
}
