use crate::auth::{CurrentUser, MaybeUser};
use axum::extract::{Path, Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use recipe_app::domain::{
    Comment, Direction, NewComment, Ratings, Recipe, RecipeDraft, RecipeFilters, RecipeId,
    RecipeWithVote, User, UserProfile, VoteResult,
};
use recipe_app::infrastructure::security::InputSanitizer;
use recipe_app::AppContext;
use recipe_errors::AppError;
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/users", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/me/saved/{id}", put(save_recipe).delete(unsave_recipe))
        .route("/recipes", get(search_recipes).post(submit_recipe))
        .route("/recipes/top", get(top_rated))
        .route("/recipes/{id}", get(get_recipe))
        .route("/recipes/{id}/votes", post(vote_recipe))
        .route("/recipes/{id}/comments", post(comment_recipe))
        .route("/recipes/{id}/ratings", post(rate_recipe))
        .route("/categories", get(list_categories))
        .route("/pending", get(list_pending))
        .route("/pending/{id}", get(get_pending))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(ctx)
}

const DEFAULT_TOP_LIMIT: usize = 4;

#[derive(Deserialize)]
struct TopQuery {
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct RegisterRequest {
    username: String,
    email: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
}

#[derive(Serialize)]
struct SubmitResponse {
    id: RecipeId,
}

#[derive(Deserialize)]
struct VoteRequest {
    direction: String,
}

#[derive(Deserialize)]
struct CommentRequest {
    text: String,
}

#[derive(Deserialize)]
struct RateRequest {
    rating: f64,
}

async fn register(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = ctx.users.register(&req.username, &req.email)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<User>, AppError> {
    ctx.users.login(&req.username).map(Json)
}

async fn me(State(ctx): State<AppContext>, CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(ctx.profile(user))
}

async fn save_recipe(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let id = RecipeId::new(id);
    if !ctx.store.is_approved(&id) {
        return Err(AppError::NotFound(format!("approved recipe {id}")));
    }
    ctx.users.save_recipe(&user.id, id).map(Json)
}

async fn unsave_recipe(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    ctx.users.unsave_recipe(&user.id, &RecipeId::new(id)).map(Json)
}

async fn submit_recipe(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<RecipeDraft>,
) -> Result<impl IntoResponse, AppError> {
    ctx.rate_limiter.check_rate_limit(&user.id)?;

    let draft = InputSanitizer::sanitize_draft(RecipeDraft {
        submitted_by: user.username.clone(),
        ..draft
    })?;
    let id = ctx.store.submit(draft)?;
    ctx.users.record_submission(&user.id, id.clone())?;

    Ok((StatusCode::CREATED, Json(SubmitResponse { id })))
}

async fn search_recipes(
    State(ctx): State<AppContext>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<Recipe>>, AppError> {
    let (query, filters) = parse_search(raw.as_deref())?;
    Ok(Json(ctx.store.search(&query, &filters)))
}

async fn top_rated(State(ctx): State<AppContext>, Query(q): Query<TopQuery>) -> Json<Vec<Recipe>> {
    Json(ctx.store.top_rated(q.limit.unwrap_or(DEFAULT_TOP_LIMIT)))
}

async fn list_categories(State(ctx): State<AppContext>) -> Json<Vec<String>> {
    Json(ctx.store.categories())
}

async fn get_recipe(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, AppError> {
    let id = RecipeId::new(id);
    ctx.store
        .get_by_id(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("recipe {id}")))
}

async fn vote_recipe(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<VoteResult>, AppError> {
    let direction: Direction = req.direction.trim().parse()?;
    ctx.rate_limiter.check_rate_limit(&user.id)?;

    ctx.store
        .vote(&user.id, &RecipeId::new(id), direction)
        .map(Json)
}

async fn comment_recipe(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<Comment>, AppError> {
    ctx.rate_limiter.check_rate_limit(&user.id)?;

    let id = RecipeId::new(id);
    if !ctx.store.is_approved(&id) {
        return Err(AppError::NotFound(format!("approved recipe {id}")));
    }
    let text = InputSanitizer::sanitize_comment(&req.text)?;
    let comment = NewComment {
        user_id: user.id,
        username: user.username,
        text,
    };
    ctx.store.comment(&id, comment).map(Json)
}

async fn rate_recipe(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<RateRequest>,
) -> Result<Json<Ratings>, AppError> {
    ctx.store.rate(&RecipeId::new(id), req.rating).map(Json)
}

async fn list_pending(State(ctx): State<AppContext>) -> Json<Vec<Recipe>> {
    Json(ctx.store.list_pending())
}

async fn get_pending(
    State(ctx): State<AppContext>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<String>,
) -> Result<Json<RecipeWithVote>, AppError> {
    let id = RecipeId::new(id);
    ctx.store
        .get_pending_with_vote(&id, user.as_ref().map(|u| &u.id))
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("pending recipe {id}")))
}

/// Reads `query`, `category`, `difficulty`, `maxPrepTime` and any number of
/// `ingredient` parameters. Blank values are treated as absent. The text
/// query is matched as given; every other value is trimmed.
fn parse_search(raw: Option<&str>) -> Result<(String, RecipeFilters), AppError> {
    let mut query = String::new();
    let mut filters = RecipeFilters::default();

    for (key, raw_value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        let value = raw_value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "query" => query = raw_value.into_owned(),
            "category" => filters.category = Some(value.to_string()),
            "difficulty" => filters.difficulty = Some(value.parse()?),
            "maxPrepTime" => {
                let minutes = value
                    .parse()
                    .map_err(|_| AppError::Validation(format!("maxPrepTime must be minutes, got {value:?}")))?;
                filters.max_prep_time = Some(minutes);
            }
            "ingredient" => filters.ingredients.push(value.to_string()),
            _ => {}
        }
    }

    Ok((query, filters))
}
