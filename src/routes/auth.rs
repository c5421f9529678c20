use super::{empty_string_as_none, html, with_conn};
use crate::auth;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, Query, TOKEN_COOKIE};
use crate::models::{Membership, Role, Session, User};
use crate::views;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::{self, ContentType};
use actix_web::{get, post, web, HttpResponse};
use actix_web_validator::Form;
use diesel::prelude::*;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct LoginForm {
    #[validate(email)]
    email: String,
    #[validate(length(min = 1))]
    password: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct RegisterQuery {
    organization_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = 255))]
    name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 8))]
    password: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    organization_id: Option<i32>,
}

fn signed_in(token: String, location: &str) -> HttpResponse {
    let cookie = Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish()
}

#[get("/login")]
pub async fn login_form() -> HttpResponse {
    html(views::login_page(None))
}

#[post("/login")]
pub async fn login(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    form: Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let LoginForm { email, password } = form.into_inner();
    let session = with_conn(pool, move |conn| {
        let user = match User::find_by_email(conn, &email)? {
            Some(user) if user.verify_password(&password) => user,
            _ => return Ok(None),
        };
        Ok(Some(Session::create(conn, &user)?))
    })
    .await?;
    let session = match session {
        Some(session) => session,
        None => {
            warn!("failed login attempt");
            return Ok(HttpResponse::Unauthorized()
                .content_type(ContentType::html())
                .body(views::login_page(Some(
                    "These credentials do not match our records.",
                ))));
        }
    };
    let token = auth::issue_token(
        &config.jwt_secret,
        session.user_id,
        session.id,
        config.token_ttl_hours,
    )?;
    info!("user {} signed in (session {})", session.user_id, session.id);
    Ok(signed_in(token, "/home"))
}

#[post("/logout")]
pub async fn logout(current: CurrentUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let session_id = current.session.id;
    with_conn(pool, move |conn| Ok(Session::delete(conn, session_id)?)).await?;
    let mut cookie = Cookie::build(TOKEN_COOKIE, "").path("/").finish();
    cookie.make_removal();
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login"))
        .cookie(cookie)
        .finish())
}

#[get("/register")]
pub async fn register_form(query: Option<Query<RegisterQuery>>) -> HttpResponse {
    let organization_id = query.and_then(|q| q.into_inner().organization_id);
    html(views::register_page(organization_id))
}

/// Registers an account. An `organization_id` from an invite link makes the
/// new user a regular member of that organization.
#[post("/register")]
pub async fn register(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    form: Form<RegisterForm>,
) -> AppResult<HttpResponse> {
    let RegisterForm {
        name,
        email,
        password,
        organization_id,
    } = form.into_inner();
    let session = with_conn(pool, move |conn| {
        conn.transaction::<_, AppError, _>(|conn| {
            let organization = match organization_id {
                Some(id) => Some(User::find(conn, id)?.ok_or_else(|| {
                    AppError::not_found(format!("No organization found with id: {}", id))
                })?),
                None => None,
            };
            if User::find_by_email(conn, &email)?.is_some() {
                return Err(AppError::bad_request("The email has already been taken"));
            }
            let user = User::create(conn, &name, &email, &password, Role::User)?;
            if let Some(organization) = &organization {
                Membership::join(conn, user.id, organization.id, Role::User)?;
            }
            Ok(Session::create(conn, &user)?)
        })
    })
    .await?;
    let token = auth::issue_token(
        &config.jwt_secret,
        session.user_id,
        session.id,
        config.token_ttl_hours,
    )?;
    info!("user {} registered", session.user_id);
    Ok(signed_in(token, "/home"))
}
