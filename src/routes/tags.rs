use actix_web::{web, HttpResponse};

use crate::{
    error::{AppError, AppResult},
    middleware::{AdminUser, AuthMiddleware},
    models::TagForm,
    services::TagService,
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .wrap(AuthMiddleware::optional())
            .route(web::get().to(list_tags))
            .route(web::post().to(create_tag)),
    )
    .service(web::resource("/{id}").route(web::get().to(get_tag)));
}

/// GET / - All tags, unpaginated
async fn list_tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = TagService::new(&state.db).list_tags().await?;
    Ok(HttpResponse::Ok().json(tags))
}

/// POST / - Admin only
async fn create_tag(
    state: web::Data<AppState>,
    admin: AdminUser,
    form: web::Json<TagForm>,
) -> AppResult<HttpResponse> {
    let tag = TagService::new(&state.db).create_tag(&form).await?;
    tracing::info!("Tag {} created by {}", tag.slug, admin.username);

    Ok(HttpResponse::Created().json(tag))
}

/// GET /{id}
async fn get_tag(state: web::Data<AppState>, id: web::Path<i64>) -> AppResult<HttpResponse> {
    let tag = TagService::new(&state.db)
        .get_tag_by_id(id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;

    Ok(HttpResponse::Ok().json(tag))
}
