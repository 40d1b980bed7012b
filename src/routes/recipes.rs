use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpRequest, HttpResponse,
};

use crate::{
    error::{AppError, AppResult},
    middleware::{AuthMiddleware, AuthUser},
    models::{shopping_list_filename, Recipe, RecipeFilter, RecipeForm, RecipeSummary, User},
    services::{MembershipService, RecipeList, RecipeService, ShoppingListService},
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
            .route(web::get().to(list_recipes))
            .route(web::post().to(create_recipe)),
    )
    .service(
        web::resource("/download_shopping_cart")
            .wrap(AuthMiddleware::required())
            .route(web::get().to(download_shopping_cart)),
    )
    .service(
        web::resource("/{id}")
            .wrap(AuthMiddleware::optional())
            .route(web::get().to(get_recipe))
            .route(web::put().to(update_recipe))
            .route(web::patch().to(update_recipe))
            .route(web::delete().to(delete_recipe)),
    )
    .service(
        web::resource("/{id}/favorite")
            .wrap(AuthMiddleware::required())
            .route(web::post().to(add_favorite))
            .route(web::delete().to(remove_favorite)),
    )
    .service(
        web::resource("/{id}/shopping_cart")
            .wrap(AuthMiddleware::required())
            .route(web::post().to(add_to_cart))
            .route(web::delete().to(remove_from_cart)),
    );
}

async fn load_recipe(state: &AppState, id: i64) -> AppResult<Recipe> {
    RecipeService::new(&state.db)
        .get_recipe_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))
}

fn ensure_can_modify(user: &User, recipe: &Recipe) -> AppResult<()> {
    if recipe.author_id != user.id && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Only the author can change this recipe".to_string(),
        ));
    }
    Ok(())
}

/// GET / - Paginated recipes, newest first
///
/// Filters: `author`, repeated `tags` slugs (any match), and for signed-in
/// callers `is_favorited` / `is_in_shopping_cart`.
async fn list_recipes(
    state: web::Data<AppState>,
    req: HttpRequest,
    auth_user: Option<AuthUser>,
) -> AppResult<HttpResponse> {
    let query = QueryParams::from_request(&req);
    let params = PageParams::from_query(&query, state.config.page_size, state.config.max_page_size)?;

    let is_favorited = query.get_flag("is_favorited")?;
    let is_in_shopping_cart = query.get_flag("is_in_shopping_cart")?;

    let viewer = auth_user.as_deref();
    let viewer_id = viewer.map(|user| user.id);
    let filter = RecipeFilter {
        author_id: query.get_i64("author")?,
        tag_slugs: query.get_all("tags").into_iter().map(str::to_string).collect(),
        favorited_by: viewer_id.filter(|_| is_favorited),
        in_cart_of: viewer_id.filter(|_| is_in_shopping_cart),
    };

    let service = RecipeService::new(&state.db);
    let count = service.count_recipes(&filter).await?;
    params.check_in_range(count)?;

    let mut results = Vec::new();
    for recipe in service
        .list_recipes(&filter, params.offset(), params.limit)
        .await?
    {
        results.push(
            service
                .to_response(recipe, viewer, &state.config.media_url)
                .await?,
        );
    }

    Ok(HttpResponse::Ok().json(Page::new(results, count, params, &req)))
}

/// POST / - Create a recipe authored by the caller
async fn create_recipe(
    state: web::Data<AppState>,
    auth_user: AuthUser,
    form: web::Json<RecipeForm>,
) -> AppResult<HttpResponse> {
    let service = RecipeService::new(&state.db);
    let recipe = service
        .create_recipe(auth_user.id, &form, &state.media)
        .await?;

    let response = service
        .to_response(recipe, Some(&auth_user.user), &state.config.media_url)
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// GET /{id}
async fn get_recipe(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth_user: Option<AuthUser>,
) -> AppResult<HttpResponse> {
    let recipe = load_recipe(&state, id.into_inner()).await?;

    let response = RecipeService::new(&state.db)
        .to_response(recipe, auth_user.as_deref(), &state.config.media_url)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// PUT|PATCH /{id} - Author or admin only
async fn update_recipe(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth_user: AuthUser,
    form: web::Json<RecipeForm>,
) -> AppResult<HttpResponse> {
    let recipe = load_recipe(&state, id.into_inner()).await?;
    ensure_can_modify(&auth_user, &recipe)?;

    let service = RecipeService::new(&state.db);
    let updated = service.update_recipe(&recipe, &form, &state.media).await?;

    let response = service
        .to_response(updated, Some(&auth_user.user), &state.config.media_url)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// DELETE /{id} - Author or admin only
async fn delete_recipe(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth_user: AuthUser,
) -> AppResult<HttpResponse> {
    let recipe = load_recipe(&state, id.into_inner()).await?;
    ensure_can_modify(&auth_user, &recipe)?;

    RecipeService::new(&state.db)
        .delete_recipe(&recipe, &state.media)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn add_to_list(
    state: &AppState,
    list: RecipeList,
    user_id: i64,
    recipe_id: i64,
) -> AppResult<HttpResponse> {
    let recipe = MembershipService::new(&state.db, list)
        .add(user_id, recipe_id)
        .await?;

    Ok(HttpResponse::Created().json(RecipeSummary::from_recipe(&recipe, &state.config.media_url)))
}

async fn remove_from_list(
    state: &AppState,
    list: RecipeList,
    user_id: i64,
    recipe_id: i64,
) -> AppResult<HttpResponse> {
    load_recipe(state, recipe_id).await?;
    MembershipService::new(&state.db, list)
        .remove(user_id, recipe_id)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /{id}/favorite
async fn add_favorite(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth_user: AuthUser,
) -> AppResult<HttpResponse> {
    add_to_list(&state, RecipeList::Favorite, auth_user.id, id.into_inner()).await
}

/// DELETE /{id}/favorite
async fn remove_favorite(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth_user: AuthUser,
) -> AppResult<HttpResponse> {
    remove_from_list(&state, RecipeList::Favorite, auth_user.id, id.into_inner()).await
}

/// POST /{id}/shopping_cart
async fn add_to_cart(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth_user: AuthUser,
) -> AppResult<HttpResponse> {
    add_to_list(&state, RecipeList::ShoppingCart, auth_user.id, id.into_inner()).await
}

/// DELETE /{id}/shopping_cart
async fn remove_from_cart(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth_user: AuthUser,
) -> AppResult<HttpResponse> {
    remove_from_list(&state, RecipeList::ShoppingCart, auth_user.id, id.into_inner()).await
}

/// GET /download_shopping_cart - Aggregated cart as a text attachment
async fn download_shopping_cart(
    state: web::Data<AppState>,
    auth_user: AuthUser,
) -> AppResult<HttpResponse> {
    let text = ShoppingListService::new(&state.db)
        .render(auth_user.id)
        .await?;

    Ok(HttpResponse::Ok()
        .content_type(mime::TEXT_PLAIN_UTF_8)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(shopping_list_filename(
                &auth_user.username,
            ))],
        })
        .body(text))
}
