// /messages routes: compose, show, delete, like

use warp::reply::Response;

use crate::context::{reject, Forbidden, RequestContext};
use crate::forms::MessageForm;
use crate::templates;

pub async fn new_form(ctx: RequestContext) -> Result<Response, warp::Rejection> {
    if ctx.user.is_none() {
        return Ok(ctx.unauthorized());
    }
    Ok(ctx.render(|page| templates::message_new(page, None, &[])))
}

/// POST /messages/new
pub async fn create(ctx: RequestContext, form: MessageForm) -> Result<Response, warp::Rejection> {
    let Some(user_id) = ctx.user.as_ref().map(|user| user.id) else {
        return Ok(ctx.unauthorized());
    };

    let text = match form.validate() {
        Ok(text) => text,
        Err(errors) => {
            return Ok(ctx.render(|page| templates::message_new(page, form.text.as_deref(), &errors)))
        }
    };

    let message = ctx.db().create_message(user_id, text).await.map_err(reject)?;
    tracing::info!(message_id = message.id, user_id, "message posted");

    Ok(ctx.redirect(&format!("/users/{}", user_id)))
}

/// GET /messages/<id>
pub async fn show(message_id: i32, ctx: RequestContext) -> Result<Response, warp::Rejection> {
    let db = ctx.db();
    let message = db
        .get_message(message_id)
        .await
        .map_err(reject)?
        .ok_or_else(warp::reject::not_found)?;
    let author = db
        .get_user(message.user_id)
        .await
        .map_err(reject)?
        .ok_or_else(warp::reject::not_found)?;

    let liked = match &ctx.user {
        Some(user) => db
            .liked_message_ids(user.id)
            .await
            .map_err(reject)?
            .contains(&message.id),
        None => false,
    };

    Ok(ctx.render(|page| templates::message_show(page, &message, &author, liked)))
}

/// POST /messages/<id>/delete
///
/// Only the author may delete a message; anyone else gets "Access unauthorized."
pub async fn delete(message_id: i32, ctx: RequestContext) -> Result<Response, warp::Rejection> {
    let Some(user_id) = ctx.user.as_ref().map(|user| user.id) else {
        return Ok(ctx.unauthorized());
    };

    let message = ctx
        .db()
        .get_message(message_id)
        .await
        .map_err(reject)?
        .ok_or_else(warp::reject::not_found)?;

    if message.user_id != user_id {
        return Ok(ctx.unauthorized());
    }

    ctx.db().delete_message(message.id).await.map_err(reject)?;
    tracing::info!(message_id, user_id, "message deleted");

    Ok(ctx.redirect(&format!("/users/{}", user_id)))
}

/// POST /messages/<id>/like
///
/// Toggles the like. Users cannot like their own messages.
pub async fn toggle_like(message_id: i32, ctx: RequestContext) -> Result<Response, warp::Rejection> {
    let Some(user_id) = ctx.user.as_ref().map(|user| user.id) else {
        return Ok(ctx.unauthorized());
    };

    let message = ctx
        .db()
        .get_message(message_id)
        .await
        .map_err(reject)?
        .ok_or_else(warp::reject::not_found)?;

    if message.user_id == user_id {
        return Err(warp::reject::custom(Forbidden));
    }

    let liked = ctx.db().toggle_like(user_id, message.id).await.map_err(reject)?;
    tracing::info!(message_id, user_id, liked, "like toggled");

    Ok(ctx.redirect("/"))
}
