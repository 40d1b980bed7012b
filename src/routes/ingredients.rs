use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    error::{AppError, AppResult},
    middleware::{AdminUser, AuthMiddleware},
    models::IngredientForm,
    services::IngredientService,
    utils::query::QueryParams,
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .wrap(AuthMiddleware::optional())
            .route(web::get().to(list_ingredients))
            .route(web::post().to(create_ingredient)),
    )
    .service(web::resource("/{id}").route(web::get().to(get_ingredient)));
}

/// GET /?name=<prefix> - Catalogue search
async fn list_ingredients(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let params = QueryParams::from_request(&req);

    let ingredients = IngredientService::new(&state.db)
        .list_ingredients(params.get("name"))
        .await?;

    Ok(HttpResponse::Ok().json(ingredients))
}

/// POST / - Admin only
async fn create_ingredient(
    state: web::Data<AppState>,
    _admin: AdminUser,
    form: web::Json<IngredientForm>,
) -> AppResult<HttpResponse> {
    let ingredient = IngredientService::new(&state.db)
        .create_ingredient(&form)
        .await?;

    Ok(HttpResponse::Created().json(ingredient))
}

/// GET /{id}
async fn get_ingredient(state: web::Data<AppState>, id: web::Path<i64>) -> AppResult<HttpResponse> {
    let ingredient = IngredientService::new(&state.db)
        .get_ingredient_by_id(id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ingredient))
}
