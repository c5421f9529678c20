//! Server-rendered pages.
//!
//! Pages are plain `format!` templates. Every value coming from the
//! database or the request goes through [`text`] or [`attr`].

mod articles;
mod auth;
mod categories;
mod organizations;
pub use articles::{article_form, articles_index};
pub use auth::{login_page, register_page};
pub use categories::{categories_index, category_form};
pub use organizations::{home_page, invite_page, join_page};

use crate::models::{ActiveContext, Capability};
use chrono::NaiveDateTime;
use htmlescape::{encode_attribute, encode_minimal};

pub fn text(s: &str) -> String {
    encode_minimal(s)
}

pub fn attr(s: &str) -> String {
    encode_attribute(s)
}

pub fn timestamp(t: &NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Wraps `body` in the page chrome. `context` is `None` for guests.
pub fn layout(title: &str, context: Option<&ActiveContext>, body: &str) -> String {
    let nav = match context {
        Some(context) => {
            let workspace = match &context.organization_name {
                Some(name) => format!("<span class=\"navbar-text\">{}</span>", text(name)),
                None => String::new(),
            };
            let categories = if context.can(Capability::ManageCategories) {
                "<a class=\"nav-link\" href=\"/categories\">Categories</a>"
            } else {
                ""
            };
            format!(
                concat!(
                    "<nav class=\"navbar\">",
                    "<a class=\"nav-link\" href=\"/home\">Home</a>",
                    "<a class=\"nav-link\" href=\"/articles\">Articles</a>",
                    "{categories}",
                    "<a class=\"nav-link\" href=\"/invite\">Invite</a>",
                    "{workspace}",
                    "<form action=\"/logout\" method=\"POST\" style=\"display: inline\">",
                    "<input type=\"submit\" class=\"btn btn-link\" value=\"Logout\" />",
                    "</form>",
                    "</nav>"
                ),
                categories = categories,
                workspace = workspace,
            )
        }
        None => concat!(
            "<nav class=\"navbar\">",
            "<a class=\"nav-link\" href=\"/login\">Login</a>",
            "<a class=\"nav-link\" href=\"/register\">Register</a>",
            "</nav>"
        )
        .to_owned(),
    };
    format!(
        concat!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n",
            "<title>{title}</title>\n</head>\n<body>\n{nav}\n",
            "<div class=\"container\">\n<div class=\"card\">\n",
            "<div class=\"card-header\">{title}</div>\n",
            "<div class=\"card-body\">\n{body}\n</div>\n</div>\n</div>\n</body>\n</html>\n"
        ),
        title = text(title),
        nav = nav,
        body = body,
    )
}

pub fn welcome_page() -> String {
    layout(
        "Welcome",
        None,
        "<p>Write articles together with your organization.</p>",
    )
}
