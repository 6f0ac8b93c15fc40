// /users routes: listing, profiles, follows, likes, profile editing

use warp::reply::Response;

use crate::context::{reject, RequestContext};
use crate::db::{self, WarblerDb};
use crate::forms::{SearchQuery, UserEditForm};
use crate::models::UserProfile;
use crate::session::FlashCategory;
use crate::templates;

async fn following_ids(db: &WarblerDb, user_id: Option<i32>) -> Result<Vec<i32>, warp::Rejection> {
    match user_id {
        Some(user_id) => Ok(db
            .following(user_id)
            .await
            .map_err(reject)?
            .into_iter()
            .map(|user| user.id)
            .collect()),
        None => Ok(Vec::new()),
    }
}

async fn load_profile(db: &WarblerDb, user_id: i32) -> Result<UserProfile, warp::Rejection> {
    db.user_profile(user_id)
        .await
        .map_err(reject)?
        .ok_or_else(warp::reject::not_found)
}

/// GET /users, GET /users?q=
pub async fn list(ctx: RequestContext, query: SearchQuery) -> Result<Response, warp::Rejection> {
    let viewer_id = ctx.user.as_ref().map(|user| user.id);
    let q = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let users = ctx.db().search_users(q).await.map_err(reject)?;
    let following = following_ids(ctx.db(), viewer_id).await?;

    Ok(ctx.render(|page| templates::users_index(page, &users, q, &following)))
}

/// GET /users/<id>
pub async fn show(user_id: i32, ctx: RequestContext) -> Result<Response, warp::Rejection> {
    let viewer_id = ctx.user.as_ref().map(|user| user.id);
    let db = ctx.db();

    let profile = load_profile(db, user_id).await?;
    let messages = db.user_messages(user_id).await.map_err(reject)?;
    let (is_following, liked_ids) = match viewer_id {
        Some(viewer_id) => (
            db.is_following(viewer_id, user_id).await.map_err(reject)?,
            db.liked_message_ids(viewer_id).await.map_err(reject)?,
        ),
        None => (false, Vec::new()),
    };

    Ok(ctx.render(|page| templates::user_show(page, &profile, &messages, is_following, &liked_ids)))
}

/// GET /users/<id>/following
pub async fn show_following(user_id: i32, ctx: RequestContext) -> Result<Response, warp::Rejection> {
    let Some(viewer_id) = ctx.user.as_ref().map(|user| user.id) else {
        return Ok(ctx.unauthorized());
    };
    let db = ctx.db();

    let profile = load_profile(db, user_id).await?;
    let users = db.following(user_id).await.map_err(reject)?;
    let viewer_following = following_ids(db, Some(viewer_id)).await?;
    let is_following = viewer_following.contains(&user_id);

    Ok(ctx.render(|page| {
        templates::follow_list(page, &profile, "Following", &users, is_following, &viewer_following)
    }))
}

/// GET /users/<id>/followers
pub async fn show_followers(user_id: i32, ctx: RequestContext) -> Result<Response, warp::Rejection> {
    let Some(viewer_id) = ctx.user.as_ref().map(|user| user.id) else {
        return Ok(ctx.unauthorized());
    };
    let db = ctx.db();

    let profile = load_profile(db, user_id).await?;
    let users = db.followers(user_id).await.map_err(reject)?;
    let viewer_following = following_ids(db, Some(viewer_id)).await?;
    let is_following = viewer_following.contains(&user_id);

    Ok(ctx.render(|page| {
        templates::follow_list(page, &profile, "Followers", &users, is_following, &viewer_following)
    }))
}

/// GET /users/<id>/likes
pub async fn show_likes(user_id: i32, ctx: RequestContext) -> Result<Response, warp::Rejection> {
    let Some(viewer_id) = ctx.user.as_ref().map(|user| user.id) else {
        return Ok(ctx.unauthorized());
    };
    let db = ctx.db();

    let profile = load_profile(db, user_id).await?;
    let messages = db.liked_messages(user_id).await.map_err(reject)?;
    let liked_ids = db.liked_message_ids(viewer_id).await.map_err(reject)?;
    let is_following = db.is_following(viewer_id, user_id).await.map_err(reject)?;

    Ok(ctx.render(|page| templates::likes(page, &profile, &messages, is_following, &liked_ids)))
}

/// POST /users/follow/<id>
pub async fn follow(follow_id: i32, mut ctx: RequestContext) -> Result<Response, warp::Rejection> {
    let Some(user_id) = ctx.user.as_ref().map(|user| user.id) else {
        return Ok(ctx.unauthorized());
    };

    if ctx.db().get_user(follow_id).await.map_err(reject)?.is_none() {
        return Err(warp::reject::not_found());
    }

    let result = ctx.db().follow(user_id, follow_id).await;
    match result {
        Ok(()) => tracing::info!(user_id, follow_id, "user followed"),
        Err(db::Error::Validation(reason)) => ctx.flash(reason, FlashCategory::Warning),
        Err(err) => return Err(reject(err)),
    }

    Ok(ctx.redirect(&format!("/users/{}/following", user_id)))
}

/// POST /users/stop-following/<id>
pub async fn stop_following(follow_id: i32, ctx: RequestContext) -> Result<Response, warp::Rejection> {
    let Some(user_id) = ctx.user.as_ref().map(|user| user.id) else {
        return Ok(ctx.unauthorized());
    };

    if ctx.db().get_user(follow_id).await.map_err(reject)?.is_none() {
        return Err(warp::reject::not_found());
    }

    ctx.db().unfollow(user_id, follow_id).await.map_err(reject)?;
    tracing::info!(user_id, follow_id, "user unfollowed");

    Ok(ctx.redirect(&format!("/users/{}/following", user_id)))
}

/// GET /users/profile
pub async fn edit_form(ctx: RequestContext) -> Result<Response, warp::Rejection> {
    let Some(user) = ctx.user.clone() else {
        return Ok(ctx.unauthorized());
    };
    Ok(ctx.render(|page| templates::edit_profile(page, &user, &[])))
}

/// POST /users/profile
///
/// Changes are applied only when the current password checks out.
pub async fn edit(mut ctx: RequestContext, form: UserEditForm) -> Result<Response, warp::Rejection> {
    let Some(user) = ctx.user.clone() else {
        return Ok(ctx.unauthorized());
    };

    if let Err(errors) = form.validate() {
        return Ok(ctx.render(|page| templates::edit_profile(page, &user, &errors)));
    }

    let password = form.password.as_deref().unwrap_or_default();
    let authenticated = ctx
        .db()
        .authenticate(&user.username, password)
        .await
        .map_err(reject)?;
    if authenticated.is_none() {
        ctx.flash("Wrong password, please try again.", FlashCategory::Danger);
        return Ok(ctx.redirect("/"));
    }

    let result = ctx.db().update_user(user.id, &form.to_edit()).await;
    match result {
        Ok(updated) => {
            tracing::info!(user_id = updated.id, "profile updated");
            Ok(ctx.redirect(&format!("/users/{}", updated.id)))
        }
        Err(err) if err.is_integrity() => {
            ctx.flash("Username or email already taken", FlashCategory::Danger);
            Ok(ctx.render(|page| templates::edit_profile(page, &user, &[])))
        }
        Err(err) => Err(reject(err)),
    }
}

/// POST /users/delete
pub async fn delete(mut ctx: RequestContext) -> Result<Response, warp::Rejection> {
    let Some(user_id) = ctx.user.as_ref().map(|user| user.id) else {
        return Ok(ctx.unauthorized());
    };

    ctx.db().delete_user(user_id).await.map_err(reject)?;
    ctx.session.logout();
    ctx.user = None;

    Ok(ctx.redirect("/signup"))
}
