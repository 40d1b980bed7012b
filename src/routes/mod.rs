/// Test app with the production route tree over the given state.
#[cfg(test)]
macro_rules! init_app {
    ($state:expr) => {{
        let state: actix_web::web::Data<crate::AppState> = $state;
        let json = crate::routes::json_config(state.config.max_image_bytes);
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(state)
                .app_data(json)
                .configure(crate::routes::configure),
        )
        .await
    }};
}

pub mod auth;
pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

use actix_web::{web, HttpResponse};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Health probes plus the `/api` tree.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(path_config())
        .route("/health", web::get().to(health_check))
        .route("/health/db", web::get().to(health_check_db))
        .service(web::scope("/api").configure(create_routes));
}

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").configure(auth::create_routes))
        .service(web::scope("/users").configure(users::create_routes))
        .service(web::scope("/tags").configure(tags::create_routes))
        .service(web::scope("/ingredients").configure(ingredients::create_routes))
        .service(web::scope("/recipes").configure(recipes::create_routes));
}

/// Malformed bodies get the same `{"errors": ...}` shape as validation failures.
/// Base64 inflates images by a third, so the body limit leaves room for that.
pub fn json_config(max_image_bytes: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(max_image_bytes / 3 * 4 + 64 * 1024)
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

// Non-numeric ids cannot name anything
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_, _| AppError::NotFound("Not found".to_string()).into())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": true }))
}

async fn health_check_db(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    sqlx::query("SELECT 1").execute(state.db.pool()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": true })))
}

#[cfg(test)]
pub(crate) mod test_app {
    use actix_web::{body::MessageBody, dev::Service, dev::ServiceResponse, http::StatusCode, test};

    /// Runs a request through the app and returns the status and JSON body.
    /// Empty bodies come back as `Value::Null`.
    pub async fn call_json<S, R, B>(app: &S, req: R) -> (StatusCode, serde_json::Value)
    where
        S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        match test::try_call_service(app, req).await {
            Ok(resp) => {
                let status = resp.status();
                let bytes = test::read_body(resp).await;
                (status, serde_json::from_slice(&bytes).unwrap_or_default())
            }
            // errors raised by middleware never reach a handler
            Err(e) => {
                let resp = e.error_response();
                let status = resp.status();
                let bytes = actix_web::body::to_bytes(resp.into_body())
                    .await
                    .unwrap_or_default();
                (status, serde_json::from_slice(&bytes).unwrap_or_default())
            }
        }
    }
}
