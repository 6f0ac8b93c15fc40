// GET / handler

use warp::reply::Response;

use crate::context::{reject, RequestContext};
use crate::templates;

/// Timeline for logged-in users, landing page for everyone else
pub async fn homepage(ctx: RequestContext) -> Result<Response, warp::Rejection> {
    let Some(user_id) = ctx.user.as_ref().map(|user| user.id) else {
        return Ok(ctx.render(templates::home_anon));
    };

    let db = ctx.db();
    let profile = db
        .user_profile(user_id)
        .await
        .map_err(reject)?
        .ok_or_else(warp::reject::not_found)?;
    let timeline = db.timeline(user_id).await.map_err(reject)?;
    let liked_ids = db.liked_message_ids(user_id).await.map_err(reject)?;

    Ok(ctx.render(|page| templates::home(page, &profile, &timeline, &liked_ids)))
}
