use crate::error::Result;
use crate::model::CreateLinkForm;
use crate::state::AppState;
use crate::views::home::{self, HomeView};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use tracing::{debug, info};

pub async fn home_handler() -> Html<String> {
    Html(home::render(&HomeView::default()))
}

pub async fn create_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CreateLinkForm>,
) -> Result<Response> {
    if form.url().is_empty() {
        let page = home::render(&HomeView {
            error: Some("URL is required"),
            submitted_path: form.custom_path(),
            ..Default::default()
        });
        return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
    }

    match state
        .shortener()
        .create_link(form.url(), form.custom_path())
        .await
    {
        Ok(link) => {
            let short_url = link.id.short_url(&state.base_url(&headers));
            info!(id = %link.id, short_url = %short_url, "short link created");

            let page = home::render(&HomeView {
                created: Some((&link, short_url)),
                ..Default::default()
            });
            Ok(Html(page).into_response())
        }
        Err(err) if err.is_validation() => {
            debug!(error = %err, "rejected shorten request");
            let message = err.to_string();
            let page = home::render(&HomeView {
                error: Some(&message),
                submitted_url: Some(form.url()),
                submitted_path: form.custom_path(),
                ..Default::default()
            });
            Ok((StatusCode::BAD_REQUEST, Html(page)).into_response())
        }
        Err(err) => Err(err.into()),
    }
}
