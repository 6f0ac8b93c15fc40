// Server-rendered HTML pages

use std::fmt::Write;

use crate::models::{Message, TimelineMessage, User, UserProfile};
use crate::session::Flash;

/// Everything the layout needs besides the page body
pub struct PageContext<'a> {
    pub current_user: Option<&'a User>,
    pub flashes: Vec<Flash>,
}

/// Escape text for use in HTML bodies and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make a URL safe inside a quoted CSS `url('...')` in a style attribute
///
/// Quotes, parentheses, backslashes and whitespace are percent-encoded so the
/// value can never close the `url()` token, then the result is HTML-escaped.
pub fn css_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '\'' | '"' | '(' | ')' | '\\' | '<' | '>' | ';' => percent_encode(&mut out, c),
            c if c.is_whitespace() || c.is_control() => percent_encode(&mut out, c),
            c => out.push(c),
        }
    }
    escape(&out)
}

fn percent_encode(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    for byte in c.encode_utf8(&mut buf).bytes() {
        let _ = write!(out, "%{:02X}", byte);
    }
}

fn format_timestamp(message: &Message) -> String {
    message.timestamp.format("%d %B %Y").to_string()
}

pub fn layout(title: &str, ctx: &PageContext<'_>, body: &str) -> String {
    let mut nav = String::new();
    match ctx.current_user {
        Some(user) => {
            let _ = write!(
                nav,
                r#"<li><a href="/users/{id}"><img src="{img}" alt="{name}"></a></li>
<li><a href="/messages/new">New Message</a></li>
<li><a href="/logout">Log out</a></li>"#,
                id = user.id,
                img = escape(&user.image_url),
                name = escape(&user.username),
            );
        }
        None => {
            nav.push_str(
                r#"<li><a href="/signup">Sign up</a></li>
<li><a href="/login">Log in</a></li>"#,
            );
        }
    }

    let mut flashes = String::new();
    for flash in &ctx.flashes {
        let _ = writeln!(
            flashes,
            r#"<div class="alert alert-{}">{}</div>"#,
            flash.category,
            escape(&flash.message)
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title}</title>
<link rel="stylesheet" href="/static/stylesheets/style.css">
</head>
<body>
<nav class="navbar">
<a href="/" class="navbar-brand">Warbler</a>
<form action="/users" class="navbar-form">
<input name="q" placeholder="Search Warbler" id="search">
<button type="submit">Search</button>
</form>
<ul class="nav">
{nav}
</ul>
</nav>
<div class="container">
{flashes}{body}
</div>
</body>
</html>"#,
        title = escape(title),
        nav = nav,
        flashes = flashes,
        body = body,
    )
}

fn error_list(errors: &[String]) -> String {
    let mut out = String::new();
    for error in errors {
        let _ = writeln!(out, r#"<span class="text-danger">{}</span>"#, escape(error));
    }
    out
}

fn input(name: &str, kind: &str, placeholder: &str, value: Option<&str>) -> String {
    format!(
        r#"<input type="{kind}" name="{name}" placeholder="{placeholder}" value="{value}">"#,
        kind = kind,
        name = name,
        placeholder = escape(placeholder),
        value = escape(value.unwrap_or("")),
    )
}

fn like_button(message_id: i32, liked: bool) -> String {
    format!(
        r#"<form method="POST" action="/messages/{id}/like" class="messages-like">
<button class="btn {class}">&#9733;</button>
</form>"#,
        id = message_id,
        class = if liked { "liked" } else { "not-liked" },
    )
}

fn message_item(
    item: &TimelineMessage,
    viewer: Option<&User>,
    liked_ids: &[i32],
) -> String {
    let mut out = String::new();
    let message = &item.message;
    let _ = write!(
        out,
        r#"<li class="list-group-item">
<a href="/messages/{id}" class="message-link"></a>
<a href="/users/{user_id}"><img src="{img}" alt="" class="timeline-image"></a>
<div class="message-area">
<a href="/users/{user_id}">@{username}</a>
<span class="text-muted">{ts}</span>
<p>{text}</p>
</div>"#,
        id = message.id,
        user_id = message.user_id,
        img = escape(&item.image_url),
        username = escape(&item.username),
        ts = format_timestamp(message),
        text = escape(&message.text),
    );
    if let Some(viewer) = viewer {
        if viewer.id != message.user_id {
            out.push_str(&like_button(message.id, liked_ids.contains(&message.id)));
        }
    }
    out.push_str("\n</li>\n");
    out
}

fn follow_button(target: &User, viewer: Option<&User>, following_ids: &[i32]) -> String {
    match viewer {
        Some(viewer) if viewer.id != target.id => {
            if following_ids.contains(&target.id) {
                format!(
                    r#"<form method="POST" action="/users/stop-following/{}"><button class="btn btn-primary">Unfollow</button></form>"#,
                    target.id
                )
            } else {
                format!(
                    r#"<form method="POST" action="/users/follow/{}"><button class="btn btn-outline-primary">Follow</button></form>"#,
                    target.id
                )
            }
        }
        _ => String::new(),
    }
}

fn user_card(user: &User, viewer: Option<&User>, following_ids: &[i32]) -> String {
    format!(
        r#"<div class="card user-card">
<a href="/users/{id}" class="card-link">
<img src="{img}" alt="Image for {name}" class="card-image">
<p>@{name}</p>
</a>
{button}
<p class="card-bio">{bio}</p>
</div>
"#,
        id = user.id,
        img = escape(&user.image_url),
        name = escape(&user.username),
        button = follow_button(user, viewer, following_ids),
        bio = escape(user.bio.as_deref().unwrap_or("")),
    )
}

fn profile_header(profile: &UserProfile, viewer: Option<&User>, is_following: bool) -> String {
    let user = &profile.user;
    let following_ids: Vec<i32> = if is_following { vec![user.id] } else { vec![] };
    let actions = match viewer {
        Some(viewer) if viewer.id == user.id => r#"<a href="/users/profile" class="btn btn-outline-secondary">Edit Profile</a>
<form method="POST" action="/users/delete" class="form-inline"><button class="btn btn-outline-danger">Delete Profile</button></form>"#
            .to_string(),
        _ => follow_button(user, viewer, &following_ids),
    };

    format!(
        r#"<div id="warbler-hero" class="full-width" style="background-image: url('{header}')"></div>
<img src="{img}" alt="Image for {name}" id="profile-avatar">
<div class="profile-header">
<h4 id="sidebar-username">@{name}</h4>
<p>{bio}</p>
<p class="user-location">{location}</p>
<ul class="user-stats">
<li class="stat"><p class="small">Messages</p><h4><a href="/users/{id}">{messages}</a></h4></li>
<li class="stat"><p class="small">Following</p><h4><a href="/users/{id}/following">{following}</a></h4></li>
<li class="stat"><p class="small">Followers</p><h4><a href="/users/{id}/followers">{followers}</a></h4></li>
<li class="stat"><p class="small">Likes</p><h4><a href="/users/{id}/likes">{likes}</a></h4></li>
</ul>
{actions}
</div>
"#,
        header = css_url(&user.header_image_url),
        img = escape(&user.image_url),
        name = escape(&user.username),
        bio = escape(user.bio.as_deref().unwrap_or("")),
        location = escape(user.location.as_deref().unwrap_or("")),
        id = user.id,
        messages = profile.message_count,
        following = profile.following_count,
        followers = profile.followers_count,
        likes = profile.likes_count,
        actions = actions,
    )
}

pub fn home_anon(ctx: &PageContext<'_>) -> String {
    layout(
        "Warbler",
        ctx,
        r#"<div class="home-hero">
<h1>What's Happening?</h1>
<h4>New to Warbler?</h4>
<a href="/signup" class="btn btn-primary">Sign up now</a>
</div>"#,
    )
}

pub fn home(
    ctx: &PageContext<'_>,
    profile: &UserProfile,
    timeline: &[TimelineMessage],
    liked_ids: &[i32],
) -> String {
    let user = &profile.user;
    let mut body = format!(
        r#"<aside class="col-md-4" id="home-aside">
<div class="card user-card">
<a href="/users/{id}"><img src="{img}" alt="Image for {name}" class="card-image"><p>@{name}</p></a>
<ul class="user-stats">
<li class="stat"><p class="small">Messages</p><h4><a href="/users/{id}">{messages}</a></h4></li>
<li class="stat"><p class="small">Following</p><h4><a href="/users/{id}/following">{following}</a></h4></li>
<li class="stat"><p class="small">Followers</p><h4><a href="/users/{id}/followers">{followers}</a></h4></li>
</ul>
</div>
</aside>
<div class="col-lg-6" id="home-timeline">
<ul class="list-group" id="messages">
"#,
        id = user.id,
        img = escape(&user.image_url),
        name = escape(&user.username),
        messages = profile.message_count,
        following = profile.following_count,
        followers = profile.followers_count,
    );
    for item in timeline {
        body.push_str(&message_item(item, ctx.current_user, liked_ids));
    }
    body.push_str("</ul>\n</div>");
    layout("Warbler", ctx, &body)
}

pub fn signup_form(ctx: &PageContext<'_>, username: Option<&str>, email: Option<&str>, errors: &[String]) -> String {
    let body = format!(
        r#"<div class="auth-form">
<h2 class="join-message">Join Warbler today.</h2>
{errors}<form method="POST" id="user_form">
{username}
{email}
{password}
{image}
<button class="btn btn-primary">Sign me up!</button>
</form>
</div>"#,
        errors = error_list(errors),
        username = input("username", "text", "Username", username),
        email = input("email", "text", "E-mail", email),
        password = input("password", "password", "Password", None),
        image = input("image_url", "text", "(Optional) Image URL", None),
    );
    layout("Sign up", ctx, &body)
}

pub fn login_form(ctx: &PageContext<'_>, username: Option<&str>, errors: &[String]) -> String {
    let body = format!(
        r#"<div class="auth-form">
<h2 class="join-message">Welcome back.</h2>
{errors}<form method="POST" id="user_form">
{username}
{password}
<button class="btn btn-primary">Log in</button>
</form>
</div>"#,
        errors = error_list(errors),
        username = input("username", "text", "Username", username),
        password = input("password", "password", "Password", None),
    );
    layout("Log in", ctx, &body)
}

pub fn users_index(
    ctx: &PageContext<'_>,
    users: &[User],
    query: Option<&str>,
    following_ids: &[i32],
) -> String {
    let mut body = String::new();
    if users.is_empty() {
        let _ = write!(
            body,
            r#"<h3>Sorry, no users found{}</h3>"#,
            query
                .map(|q| format!(" matching \"{}\"", escape(q)))
                .unwrap_or_default()
        );
    } else {
        body.push_str(r#"<div class="row justify-content-end">"#);
        for user in users {
            body.push_str(&user_card(user, ctx.current_user, following_ids));
        }
        body.push_str("</div>");
    }
    layout("Users", ctx, &body)
}

pub fn user_show(
    ctx: &PageContext<'_>,
    profile: &UserProfile,
    messages: &[Message],
    is_following: bool,
    liked_ids: &[i32],
) -> String {
    let mut body = profile_header(profile, ctx.current_user, is_following);
    body.push_str(r#"<ul class="list-group" id="messages">"#);
    body.push('\n');
    for message in messages {
        let item = TimelineMessage {
            message: message.clone(),
            username: profile.user.username.clone(),
            image_url: profile.user.image_url.clone(),
        };
        body.push_str(&message_item(&item, ctx.current_user, liked_ids));
    }
    body.push_str("</ul>");
    layout(&format!("@{}", profile.user.username), ctx, &body)
}

/// Followers or following list under a profile header
pub fn follow_list(
    ctx: &PageContext<'_>,
    profile: &UserProfile,
    heading: &str,
    users: &[User],
    is_following: bool,
    following_ids: &[i32],
) -> String {
    let mut body = profile_header(profile, ctx.current_user, is_following);
    let _ = write!(body, "<h3>{}</h3>\n<div class=\"row\">\n", escape(heading));
    for user in users {
        body.push_str(&user_card(user, ctx.current_user, following_ids));
    }
    body.push_str("</div>");
    layout(&format!("@{} {}", profile.user.username, heading), ctx, &body)
}

pub fn likes(
    ctx: &PageContext<'_>,
    profile: &UserProfile,
    messages: &[TimelineMessage],
    is_following: bool,
    liked_ids: &[i32],
) -> String {
    let mut body = profile_header(profile, ctx.current_user, is_following);
    body.push_str("<h3>Likes</h3>\n<ul class=\"list-group\" id=\"messages\">\n");
    for item in messages {
        body.push_str(&message_item(item, ctx.current_user, liked_ids));
    }
    body.push_str("</ul>");
    layout(&format!("@{} likes", profile.user.username), ctx, &body)
}

pub fn edit_profile(ctx: &PageContext<'_>, user: &User, errors: &[String]) -> String {
    let body = format!(
        r#"<div class="auth-form">
<h2 class="join-message">Edit Your Profile.</h2>
{errors}<form method="POST" id="user_form">
{username}
{email}
{image}
{header}
<textarea name="bio" placeholder="(Optional) Tell us about yourself">{bio}</textarea>
{location}
<p>To confirm changes, enter your password:</p>
{password}
<button class="btn btn-success">Edit this user!</button>
<a href="/users/{id}" class="btn btn-outline-secondary">Cancel</a>
</form>
</div>"#,
        errors = error_list(errors),
        username = input("username", "text", "Username", Some(&user.username)),
        email = input("email", "text", "E-mail", Some(&user.email)),
        image = input("image_url", "text", "(Optional) Image URL", Some(&user.image_url)),
        header = input(
            "header_image_url",
            "text",
            "(Optional) Header Image URL",
            Some(&user.header_image_url)
        ),
        bio = escape(user.bio.as_deref().unwrap_or("")),
        location = input("location", "text", "(Optional) Location", user.location.as_deref()),
        password = input("password", "password", "Password", None),
        id = user.id,
    );
    layout("Edit Profile", ctx, &body)
}

pub fn message_new(ctx: &PageContext<'_>, text: Option<&str>, errors: &[String]) -> String {
    let body = format!(
        r#"<div class="new-message">
{errors}<form method="POST">
<textarea name="text" placeholder="What's happening?" maxlength="140">{text}</textarea>
<button class="btn btn-outline-success">Add my message!</button>
</form>
</div>"#,
        errors = error_list(errors),
        text = escape(text.unwrap_or("")),
    );
    layout("New Message", ctx, &body)
}

pub fn message_show(
    ctx: &PageContext<'_>,
    message: &Message,
    author: &User,
    liked: bool,
) -> String {
    let actions = match ctx.current_user {
        Some(viewer) if viewer.id == author.id => format!(
            r#"<form method="POST" action="/messages/{}/delete"><button class="btn btn-outline-danger">Delete</button></form>"#,
            message.id
        ),
        Some(_) => like_button(message.id, liked),
        None => String::new(),
    };
    let body = format!(
        r#"<div class="message-show">
<a href="/users/{user_id}"><img src="{img}" alt="" class="timeline-image"></a>
<div class="message-heading">
<a href="/users/{user_id}">@{username}</a>
{actions}
</div>
<p class="single-message">{text}</p>
<span class="text-muted">{ts}</span>
</div>"#,
        user_id = author.id,
        img = escape(&author.image_url),
        username = escape(&author.username),
        actions = actions,
        text = escape(&message.text),
        ts = format_timestamp(message),
    );
    layout("Message", ctx, &body)
}

/// Page for 4xx/5xx responses
pub fn error_page(ctx: &PageContext<'_>, status: u16, message: &str) -> String {
    let body = format!(
        r#"<div class="not-found">
<h1>{status}</h1>
<p>{message}</p>
<a href="/">Go home</a>
</div>"#,
        status = status,
        message = escape(message),
    );
    layout(message, ctx, &body)
}
