// Per-request state: the decoded session, the logged-in user, and response helpers

use warp::http::header::{HeaderValue, LOCATION, SET_COOKIE};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

use crate::db::{self, WarblerDb};
use crate::models::User;
use crate::session::{FlashCategory, Session, SessionKey};
use crate::templates::PageContext;

pub const UNAUTHORIZED_MESSAGE: &str = "Access unauthorized.";

/// Shared application state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub db: WarblerDb,
    pub session_key: SessionKey,
}

impl AppState {
    pub fn new(db: WarblerDb, session_key: SessionKey) -> Self {
        Self { db, session_key }
    }
}

/// A db failure surfaced through warp's rejection system
#[derive(Debug)]
pub struct ServerError(pub db::Error);

impl warp::reject::Reject for ServerError {}

/// The current user may not perform this action
#[derive(Debug)]
pub struct Forbidden;

impl warp::reject::Reject for Forbidden {}

/// Map a db error onto a rejection; not-found errors become 404s
pub fn reject(err: db::Error) -> warp::Rejection {
    match err {
        db::Error::NotFound(_) => warp::reject::not_found(),
        err => warp::reject::custom(ServerError(err)),
    }
}

pub struct RequestContext {
    pub state: AppState,
    pub session: Session,
    /// The session's user, if it still exists
    pub user: Option<User>,
}

impl RequestContext {
    /// Decode the session cookie and look up its user
    ///
    /// A session naming a user id that no longer exists counts as logged out.
    pub async fn load(state: AppState, cookie: Option<String>) -> Result<Self, warp::Rejection> {
        let session = state.session_key.load(cookie.as_deref());

        let user = match session.curr_user {
            Some(user_id) => {
                let user = state.db.get_user(user_id).await.map_err(reject)?;
                if user.is_none() {
                    tracing::debug!(user_id, "session names a missing user");
                }
                user
            }
            None => None,
        };

        Ok(Self {
            state,
            session,
            user,
        })
    }

    pub fn db(&self) -> &WarblerDb {
        &self.state.db
    }

    pub fn flash(&mut self, message: impl Into<String>, category: FlashCategory) {
        self.session.flash(message, category);
    }

    /// Render a 200 page, consuming pending flashes
    pub fn render<F>(mut self, page: F) -> Response
    where
        F: FnOnce(&PageContext<'_>) -> String,
    {
        let flashes = self.session.take_flashes();
        let html = page(&PageContext {
            current_user: self.user.as_ref(),
            flashes,
        });

        let response = warp::reply::html(html).into_response();
        self.finish(response)
    }

    /// 302 to `location`, keeping flashes for the next page
    pub fn redirect(self, location: &str) -> Response {
        let mut response = warp::reply().into_response();
        *response.status_mut() = StatusCode::FOUND;
        let location =
            HeaderValue::from_str(location).unwrap_or_else(|_| HeaderValue::from_static("/"));
        response.headers_mut().insert(LOCATION, location);
        self.finish(response)
    }

    /// Flash "Access unauthorized." and send the browser home
    pub fn unauthorized(mut self) -> Response {
        tracing::warn!(
            session_user = ?self.session.curr_user,
            "rejected request without an authorized user"
        );
        self.flash(UNAUTHORIZED_MESSAGE, FlashCategory::Danger);
        self.redirect("/")
    }

    fn finish(self, mut response: Response) -> Response {
        match self
            .state
            .session_key
            .set_cookie_header(&self.session)
            .and_then(|cookie| HeaderValue::from_str(&cookie).ok())
        {
            Some(cookie) => {
                response.headers_mut().append(SET_COOKIE, cookie);
            }
            None => tracing::error!("failed to encode session cookie"),
        }
        response
    }
}
