use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    middleware::{AuthMiddleware, AuthUser},
    models::{CreateUserRequest, SetPasswordRequest, User, UserCreatedResponse, UserResponse},
    services::{AuthService, SubscriptionService, UserService},
    utils::{
        pagination::{Page, PageParams},
        query::QueryParams,
    },
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .wrap(AuthMiddleware::optional())
            .route(web::get().to(list_users))
            .route(web::post().to(register)),
    )
    .service(
        web::resource("/me")
            .wrap(AuthMiddleware::required())
            .route(web::get().to(get_me)),
    )
    .service(
        web::resource("/set_password")
            .wrap(AuthMiddleware::required())
            .route(web::post().to(set_password)),
    )
    .service(
        web::resource("/subscriptions")
            .wrap(AuthMiddleware::required())
            .route(web::get().to(list_subscriptions)),
    )
    .service(
        web::resource("/{id}")
            .wrap(AuthMiddleware::optional())
            .route(web::get().to(get_user)),
    )
    .service(
        web::resource("/{id}/subscribe")
            .wrap(AuthMiddleware::required())
            .route(web::post().to(subscribe))
            .route(web::delete().to(unsubscribe)),
    );
}

/// Profile of `user` as seen by `viewer`.
async fn user_response(state: &AppState, user: User, viewer: Option<&User>) -> AppResult<UserResponse> {
    let is_subscribed = match viewer {
        Some(viewer) if viewer.id != user.id => {
            SubscriptionService::new(&state.db)
                .is_subscribed(viewer.id, user.id)
                .await?
        }
        _ => false,
    };

    Ok(UserResponse::from_user(user, is_subscribed))
}

/// GET / - Paginated user list
async fn list_users(
    state: web::Data<AppState>,
    req: HttpRequest,
    auth_user: Option<AuthUser>,
) -> AppResult<HttpResponse> {
    let params = PageParams::from_query(
        &QueryParams::from_request(&req),
        state.config.page_size,
        state.config.max_page_size,
    )?;

    let user_service = UserService::new(&state.db);
    let count = user_service.count_users().await?;
    params.check_in_range(count)?;

    let viewer = auth_user.as_deref();
    let mut results = Vec::new();
    for user in user_service.list_users(params.offset(), params.limit).await? {
        results.push(user_response(&state, user, viewer).await?);
    }

    Ok(HttpResponse::Ok().json(Page::new(results, count, params, &req)))
}

/// POST / - Register a new account
async fn register(
    state: web::Data<AppState>,
    form: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let user = UserService::new(&state.db).create_user(&form).await?;

    Ok(HttpResponse::Created().json(UserCreatedResponse::from(user)))
}

/// GET /me - The caller's own profile
async fn get_me(auth_user: AuthUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse::from_user(auth_user.user, false)))
}

/// POST /set_password - Change the caller's password
async fn set_password(
    state: web::Data<AppState>,
    auth_user: AuthUser,
    form: web::Json<SetPasswordRequest>,
) -> AppResult<HttpResponse> {
    form.validate()?;

    AuthService::new(&state.db)
        .change_password(&auth_user.user, &form.current_password, &form.new_password)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /{id} - A single profile
async fn get_user(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth_user: Option<AuthUser>,
) -> AppResult<HttpResponse> {
    let user = UserService::new(&state.db)
        .get_user_by_id(id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let response = user_response(&state, user, auth_user.as_deref()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Checked before any write.
fn recipes_limit(params: &QueryParams) -> AppResult<Option<i64>> {
    match params.get_i64("recipes_limit")? {
        Some(limit) if limit < 0 => Err(AppError::Validation(
            "recipes_limit must not be negative".to_string(),
        )),
        limit => Ok(limit),
    }
}

/// GET /subscriptions - Authors the caller follows, with their recipes
async fn list_subscriptions(
    state: web::Data<AppState>,
    req: HttpRequest,
    auth_user: AuthUser,
) -> AppResult<HttpResponse> {
    let query = QueryParams::from_request(&req);
    let params = PageParams::from_query(&query, state.config.page_size, state.config.max_page_size)?;
    let limit = recipes_limit(&query)?;

    let service = SubscriptionService::new(&state.db);
    let count = service.count_subscriptions(auth_user.id).await?;
    params.check_in_range(count)?;

    let mut results = Vec::new();
    for author in service
        .list_authors(auth_user.id, params.offset(), params.limit)
        .await?
    {
        results.push(
            service
                .build_payload(author, limit, &state.config.media_url)
                .await?,
        );
    }

    Ok(HttpResponse::Ok().json(Page::new(results, count, params, &req)))
}

/// POST /{id}/subscribe - Follow an author
async fn subscribe(
    state: web::Data<AppState>,
    req: HttpRequest,
    id: web::Path<i64>,
    auth_user: AuthUser,
) -> AppResult<HttpResponse> {
    let limit = recipes_limit(&QueryParams::from_request(&req))?;

    let service = SubscriptionService::new(&state.db);
    let author = service.subscribe(auth_user.id, id.into_inner()).await?;
    let payload = service
        .build_payload(author, limit, &state.config.media_url)
        .await?;

    Ok(HttpResponse::Created().json(payload))
}

/// DELETE /{id}/subscribe - Stop following an author
async fn unsubscribe(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth_user: AuthUser,
) -> AppResult<HttpResponse> {
    SubscriptionService::new(&state.db)
        .unsubscribe(auth_user.id, id.into_inner())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
