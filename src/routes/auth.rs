use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::{AuthMiddleware, AuthUser},
    models::{TokenLoginRequest, TokenResponse},
    services::AuthService,
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/token/login").route(web::post().to(login)))
        .service(
            web::resource("/token/logout")
                .wrap(AuthMiddleware::required())
                .route(web::post().to(logout)),
        );
}

/// POST /token/login - Exchange email and password for a token
async fn login(
    state: web::Data<AppState>,
    form: web::Json<TokenLoginRequest>,
) -> AppResult<HttpResponse> {
    form.validate()?;

    let auth_token = AuthService::new(&state.db)
        .login(
            &form.email,
            &form.password,
            &state.config.secret_key,
            &state.config.jwt_expires_in,
        )
        .await?;

    Ok(HttpResponse::Ok().json(TokenResponse { auth_token }))
}

/// POST /token/logout - Tokens are stateless, so this only confirms the caller
async fn logout(auth_user: AuthUser) -> HttpResponse {
    tracing::debug!("User {} logged out", auth_user.id);
    HttpResponse::NoContent().finish()
}
