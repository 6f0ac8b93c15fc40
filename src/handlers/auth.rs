// GET/POST /signup, GET/POST /login, GET /logout

use warp::reply::Response;

use crate::context::{reject, RequestContext};
use crate::forms::{LoginForm, SignupForm};
use crate::session::FlashCategory;
use crate::templates;

pub async fn signup_form(ctx: RequestContext) -> Result<Response, warp::Rejection> {
    Ok(ctx.render(|page| templates::signup_form(page, None, None, &[])))
}

pub async fn signup(mut ctx: RequestContext, form: SignupForm) -> Result<Response, warp::Rejection> {
    if let Err(errors) = form.validate() {
        return Ok(ctx.render(|page| {
            templates::signup_form(page, form.username.as_deref(), form.email.as_deref(), &errors)
        }));
    }

    let result = ctx
        .db()
        .signup(
            form.username.as_deref().map(str::trim),
            form.email.as_deref().map(str::trim),
            form.password.as_deref(),
            form.image_url.as_deref(),
        )
        .await;

    match result {
        Ok(user) => {
            ctx.session.login(user.id);
            Ok(ctx.redirect("/"))
        }
        Err(err) if err.is_integrity() => {
            tracing::info!(error = %err, "signup rejected");
            ctx.flash("Username already taken", FlashCategory::Danger);
            Ok(ctx.render(|page| {
                templates::signup_form(page, form.username.as_deref(), form.email.as_deref(), &[])
            }))
        }
        Err(err) => Err(reject(err)),
    }
}

pub async fn login_form(ctx: RequestContext) -> Result<Response, warp::Rejection> {
    Ok(ctx.render(|page| templates::login_form(page, None, &[])))
}

pub async fn login(mut ctx: RequestContext, form: LoginForm) -> Result<Response, warp::Rejection> {
    if let Err(errors) = form.validate() {
        return Ok(ctx.render(|page| templates::login_form(page, form.username.as_deref(), &errors)));
    }

    let username = form.username.as_deref().unwrap_or_default().trim();
    let password = form.password.as_deref().unwrap_or_default();

    let user = ctx.db().authenticate(username, password).await.map_err(reject)?;
    match user {
        Some(user) => {
            tracing::info!(user_id = user.id, "user logged in");
            ctx.session.login(user.id);
            ctx.flash(format!("Hello, {}!", user.username), FlashCategory::Success);
            Ok(ctx.redirect("/"))
        }
        None => {
            ctx.flash("Invalid credentials.", FlashCategory::Danger);
            Ok(ctx.render(|page| templates::login_form(page, Some(username), &[])))
        }
    }
}

pub async fn logout(mut ctx: RequestContext) -> Result<Response, warp::Rejection> {
    ctx.session.logout();
    ctx.user = None;
    ctx.flash("You have been logged out.", FlashCategory::Success);
    Ok(ctx.redirect("/login"))
}
