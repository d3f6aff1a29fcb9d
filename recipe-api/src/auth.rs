use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use recipe_app::domain::{User, UserId};
use recipe_app::AppContext;
use recipe_errors::AppError;

/// Header carrying the mock session's user id.
pub const USER_HEADER: &str = "x-user-id";

/// The logged-in user. Rejects with 401 when the header is missing or unknown.
pub struct CurrentUser(pub User);

/// The logged-in user, if any.
pub struct MaybeUser(pub Option<User>);

fn resolve(parts: &Parts, ctx: &AppContext) -> Option<User> {
    let raw = parts.headers.get(USER_HEADER)?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }
    ctx.users.find(&UserId::new(raw))
}

impl FromRequestParts<AppContext> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, ctx: &AppContext) -> Result<Self, Self::Rejection> {
        resolve(parts, ctx).map(CurrentUser).ok_or(AppError::Unauthorized)
    }
}

impl FromRequestParts<AppContext> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, ctx: &AppContext) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve(parts, ctx)))
    }
}
