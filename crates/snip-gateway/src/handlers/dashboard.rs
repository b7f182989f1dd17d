use crate::error::{AppError, Result};
use crate::model::{DashboardAction, DashboardForm, DashboardQuery};
use crate::state::{Access, AppState};
use crate::views::dashboard::{self, Banner, DashboardView};
use axum::extract::rejection::FormRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use snip_core::LinkId;
use tracing::{debug, info};

/// Result of a dashboard form post, shown above the table.
enum Outcome {
    Done(&'static str),
    Rejected(StatusCode, String),
}

pub async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response> {
    let code = authorize(&state, &query)?;
    render(&state, code, StatusCode::OK, None).await
}

pub async fn dashboard_action_handler(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
    form: std::result::Result<Form<DashboardForm>, FormRejection>,
) -> Result<Response> {
    let code = authorize(&state, &query)?;

    let outcome = match form {
        Ok(Form(form)) => match DashboardAction::try_from(form) {
            Ok(action) => apply(&state, action).await?,
            Err(message) => Outcome::Rejected(StatusCode::BAD_REQUEST, message),
        },
        Err(rejection) => Outcome::Rejected(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match outcome {
        Outcome::Done(notice) => {
            render(&state, code, StatusCode::OK, Some(Banner::Notice(notice))).await
        }
        Outcome::Rejected(status, message) => {
            debug!(status = %status, message = %message, "dashboard action rejected");
            render(&state, code, status, Some(Banner::Error(&message))).await
        }
    }
}

fn authorize<'a>(state: &AppState, query: &'a DashboardQuery) -> Result<&'a str> {
    let provided = query.accesscode.as_deref();
    match state.check_access(provided) {
        Access::Granted => Ok(provided.unwrap_or_default()),
        Access::Denied => Err(AppError::AccessDenied),
        Access::Unconfigured => Err(AppError::DashboardUnconfigured),
    }
}

async fn apply(state: &AppState, action: DashboardAction) -> Result<Outcome> {
    let shortener = state.shortener();

    let result = match action {
        DashboardAction::Delete { id } => {
            let Some(id) = parse_id(&id) else {
                return Ok(not_found());
            };
            // Deleting an id that is already gone is not an error.
            shortener.delete_link(&id).await.map(|removed| {
                info!(id = %id, removed, "dashboard delete");
                Some("Link deleted")
            })
        }
        DashboardAction::UpdateId { id, new_id } => {
            let Some(id) = parse_id(&id) else {
                return Ok(not_found());
            };
            shortener
                .update_link_id(&id, &new_id)
                .await
                .map(|renamed| renamed.map(|_| "Link ID updated"))
        }
        DashboardAction::UpdateUrl { id, new_url } => {
            let Some(id) = parse_id(&id) else {
                return Ok(not_found());
            };
            shortener
                .update_link_url(&id, &new_url)
                .await
                .map(|updated| updated.map(|_| "Link URL updated"))
        }
    };

    match result {
        Ok(Some(notice)) => Ok(Outcome::Done(notice)),
        Ok(None) => Ok(not_found()),
        Err(err) if err.is_validation() => {
            Ok(Outcome::Rejected(StatusCode::BAD_REQUEST, err.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

fn parse_id(raw: &str) -> Option<LinkId> {
    LinkId::new(raw).ok()
}

fn not_found() -> Outcome {
    Outcome::Rejected(StatusCode::NOT_FOUND, "Link not found".to_string())
}

async fn render(
    state: &AppState,
    access_code: &str,
    status: StatusCode,
    banner: Option<Banner<'_>>,
) -> Result<Response> {
    let links = state
        .shortener()
        .get_all_links_newest_first()
        .await
        .map_err(AppError::from)?;

    let page = dashboard::render(&DashboardView {
        links: &links,
        access_code,
        banner,
    });
    Ok((status, Html(page)).into_response())
}
