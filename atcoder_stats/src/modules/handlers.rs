use crate::modules::user_page::{
    render::{minify_page, render_page},
    PageLocation, UserPage, UserPageService,
};
use axum::{
    extract::{Extension, OriginalUri, Path},
    http::{header::COOKIE, HeaderMap, StatusCode},
    response::Html,
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

static USER_ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Za-z_]+$").unwrap());

#[derive(Debug, Serialize, Deserialize, Validate, PartialEq, Eq, Clone)]
pub struct UserPageParameter {
    #[validate(length(min = 1, max = 64), regex = "USER_ID_PATTERN")]
    pub user_id: String,
}

async fn load_page(
    params: &UserPageParameter,
    uri: &axum::http::Uri,
    headers: &HeaderMap,
    service: &UserPageService,
) -> UserPage {
    if let Err(rejection) = params.validate() {
        tracing::info!(
            "Validation error: [{}]",
            format!("{}", rejection).replace('\n', ", ")
        );
        return UserPage::NotFound {
            user_id: params.user_id.clone(),
        };
    }

    let cookie = headers
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    let location = PageLocation {
        path: uri.path(),
        query: uri.query(),
    };

    service.build(&params.user_id, &location, cookie).await
}

pub async fn user_page(
    Path(params): Path<UserPageParameter>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Extension(service): Extension<Arc<UserPageService>>,
) -> (StatusCode, Html<String>) {
    let page = load_page(&params, &uri, &headers, &service).await;
    let status = match page {
        UserPage::NotFound { .. } => StatusCode::NOT_FOUND,
        UserPage::Loading { .. } | UserPage::Dashboard(_) => StatusCode::OK,
    };

    (status, Html(minify_page(&render_page(&page))))
}

pub async fn user_page_json(
    Path(params): Path<UserPageParameter>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Extension(service): Extension<Arc<UserPageService>>,
) -> (StatusCode, Json<UserPage>) {
    let page = load_page(&params, &uri, &headers, &service).await;
    let status = match page {
        UserPage::NotFound { .. } => StatusCode::NOT_FOUND,
        UserPage::Loading { .. } => StatusCode::ACCEPTED,
        UserPage::Dashboard(_) => StatusCode::OK,
    };

    (status, Json(page))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub async fn readiness(Extension(service): Extension<Arc<UserPageService>>) -> StatusCode {
    match service.client().contest_map().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!("contest catalog is not available: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
