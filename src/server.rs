use std::convert::Infallible;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::error::BotError;
use crate::service::registration_service::RegistrationService;
use crate::store::FileStore;

#[derive(Debug, Deserialize)]
pub struct RegisterQuery {
    token: Option<String>,
    group: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(rename = "Error")]
    error: String,
}

/// The registration endpoint: any method on `/`, credentials and payload
/// in the query string, exactly as admins have always called it.
pub fn routes(
    store: Arc<FileStore>,
    admin_token: String,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::query::<RegisterQuery>())
        .and(with_store(store))
        .and(with_admin_token(admin_token))
        .and_then(handle_register)
}

fn with_store(
    store: Arc<FileStore>,
) -> impl Filter<Extract = (Arc<FileStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn with_admin_token(
    admin_token: String,
) -> impl Filter<Extract = (String,), Error = Infallible> + Clone {
    warp::any().map(move || admin_token.clone())
}

async fn handle_register(
    query: RegisterQuery,
    store: Arc<FileStore>,
    admin_token: String,
) -> Result<warp::reply::Response, Rejection> {
    let result = RegistrationService::register(
        store.as_ref(),
        &admin_token,
        query.token.as_deref(),
        query.group.as_deref(),
    )
    .await;

    let response = match result {
        Ok(message) => warp::reply::with_status(message, StatusCode::OK).into_response(),
        Err(error) => {
            let status = match error {
                BotError::Authentication => StatusCode::UNAUTHORIZED,
                BotError::Validation => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let body = warp::reply::json(&ErrorBody {
                error: error.to_string(),
            });
            warp::reply::with_status(body, status).into_response()
        }
    };
    Ok(response)
}
