// Route definitions and rejection handling

use std::convert::Infallible;
use std::path::PathBuf;

use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::context::{AppState, Forbidden, RequestContext, ServerError};
use crate::forms::{LoginForm, MessageForm, SearchQuery, SignupForm, UserEditForm};
use crate::handlers;
use crate::session::SESSION_COOKIE;
use crate::templates::{self, PageContext};

/// Decode the session cookie and resolve the current user
pub fn with_context(
    state: AppState,
) -> impl Filter<Extract = (RequestContext,), Error = Rejection> + Clone {
    warp::cookie::optional::<String>(SESSION_COOKIE)
        .and_then(move |cookie: Option<String>| RequestContext::load(state.clone(), cookie))
}

/// Urlencoded form body; a missing or empty body decodes to the form's defaults
/// so the handler still gets to run its session check.
fn form<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send + 'static,
{
    warp::body::form()
}

pub fn configure_routes(
    state: AppState,
    static_dir: PathBuf,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    let ctx = with_context(state);

    // GET /
    let home = warp::path::end()
        .and(warp::get())
        .and(ctx.clone())
        .and_then(handlers::homepage);

    // GET/POST /signup, GET/POST /login, GET /logout
    let signup_form = warp::path!("signup")
        .and(warp::get())
        .and(ctx.clone())
        .and_then(handlers::auth::signup_form);
    let signup = warp::path!("signup")
        .and(warp::post())
        .and(ctx.clone())
        .and(form::<SignupForm>())
        .and_then(handlers::auth::signup);
    let login_form = warp::path!("login")
        .and(warp::get())
        .and(ctx.clone())
        .and_then(handlers::auth::login_form);
    let login = warp::path!("login")
        .and(warp::post())
        .and(ctx.clone())
        .and(form::<LoginForm>())
        .and_then(handlers::auth::login);
    let logout = warp::path!("logout")
        .and(warp::get())
        .and(ctx.clone())
        .and_then(handlers::auth::logout);

    let auth = signup_form
        .or(signup)
        .unify()
        .or(login_form)
        .unify()
        .or(login)
        .unify()
        .or(logout)
        .unify();

    // /users
    let users_list = warp::path!("users")
        .and(warp::get())
        .and(ctx.clone())
        .and(warp::query::<SearchQuery>())
        .and_then(handlers::users::list);
    let users_show = warp::path!("users" / i32)
        .and(warp::get())
        .and(ctx.clone())
        .and_then(handlers::users::show);
    let users_following = warp::path!("users" / i32 / "following")
        .and(warp::get())
        .and(ctx.clone())
        .and_then(handlers::users::show_following);
    let users_followers = warp::path!("users" / i32 / "followers")
        .and(warp::get())
        .and(ctx.clone())
        .and_then(handlers::users::show_followers);
    let users_likes = warp::path!("users" / i32 / "likes")
        .and(warp::get())
        .and(ctx.clone())
        .and_then(handlers::users::show_likes);
    let users_follow = warp::path!("users" / "follow" / i32)
        .and(warp::post())
        .and(ctx.clone())
        .and_then(handlers::users::follow);
    let users_stop_following = warp::path!("users" / "stop-following" / i32)
        .and(warp::post())
        .and(ctx.clone())
        .and_then(handlers::users::stop_following);
    let users_edit_form = warp::path!("users" / "profile")
        .and(warp::get())
        .and(ctx.clone())
        .and_then(handlers::users::edit_form);
    let users_edit = warp::path!("users" / "profile")
        .and(warp::post())
        .and(ctx.clone())
        .and(form::<UserEditForm>())
        .and_then(handlers::users::edit);
    let users_delete = warp::path!("users" / "delete")
        .and(warp::post())
        .and(ctx.clone())
        .and_then(handlers::users::delete);

    let users = users_list
        .or(users_show)
        .unify()
        .or(users_following)
        .unify()
        .or(users_followers)
        .unify()
        .or(users_likes)
        .unify()
        .or(users_follow)
        .unify()
        .or(users_stop_following)
        .unify()
        .or(users_edit_form)
        .unify()
        .or(users_edit)
        .unify()
        .or(users_delete)
        .unify();

    // /messages
    let messages_new_form = warp::path!("messages" / "new")
        .and(warp::get())
        .and(ctx.clone())
        .and_then(handlers::messages::new_form);
    let messages_create = warp::path!("messages" / "new")
        .and(warp::post())
        .and(ctx.clone())
        .and(form::<MessageForm>())
        .and_then(handlers::messages::create);
    let messages_show = warp::path!("messages" / i32)
        .and(warp::get())
        .and(ctx.clone())
        .and_then(handlers::messages::show);
    let messages_delete = warp::path!("messages" / i32 / "delete")
        .and(warp::post())
        .and(ctx.clone())
        .and_then(handlers::messages::delete);
    let messages_like = warp::path!("messages" / i32 / "like")
        .and(warp::post())
        .and(ctx)
        .and_then(handlers::messages::toggle_like);

    let messages = messages_new_form
        .or(messages_create)
        .unify()
        .or(messages_show)
        .unify()
        .or(messages_delete)
        .unify()
        .or(messages_like)
        .unify();

    let static_files = warp::path("static")
        .and(warp::fs::dir(static_dir))
        .map(|file: warp::fs::File| file.into_response());

    home.or(auth)
        .unify()
        .or(users)
        .unify()
        .or(messages)
        .unify()
        .or(static_files)
        .unify()
        .recover(handle_rejection)
        .with(warp::trace::request())
}

/// Turn rejections into rendered error pages
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Sorry, we couldn't find that page.")
    } else if err.find::<Forbidden>().is_some() {
        (StatusCode::FORBIDDEN, "You can't do that.")
    } else if let Some(ServerError(e)) = err.find::<ServerError>() {
        tracing::error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong.")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.")
    } else {
        tracing::debug!(rejection = ?err, "bad request");
        (StatusCode::BAD_REQUEST, "Bad request.")
    };

    let page = PageContext {
        current_user: None,
        flashes: Vec::new(),
    };
    let mut response = warp::reply::html(templates::error_page(&page, status.as_u16(), message))
        .into_response();
    *response.status_mut() = status;
    Ok(response)
}
