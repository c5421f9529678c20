use crate::auth;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ActiveContext, Capability, Session, User};
use actix_web::http::header;
use actix_web::{dev, web, web::Data, FromRequest, HttpRequest};
use anyhow::anyhow;
use futures::future::LocalBoxFuture;
use log::debug;

pub const TOKEN_COOKIE: &str = "token";

/// The signed-in user, their session and the context resolved from it.
/// Extracting it fails with [`AppError::Unauthenticated`] when there is no
/// valid token or the session is gone.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
    pub context: ActiveContext,
}

impl CurrentUser {
    pub fn load(conn: &mut diesel::SqliteConnection, user_id: i32, session_id: i32) -> AppResult<Self> {
        let user = User::find(conn, user_id)?.ok_or(AppError::Unauthenticated)?;
        let mut session = Session::find(conn, session_id, user.id)?.ok_or(AppError::Unauthenticated)?;
        let context = ActiveContext::resolve(conn, &user, &mut session)?;
        Ok(Self {
            user,
            session,
            context,
        })
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.context.can(capability)
    }

    pub fn authorize(&self, capability: Capability) -> AppResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!("{} is not allowed", capability)))
        }
    }
}

/// A bearer `Authorization` header wins over the `token` cookie.
fn token_from_request(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_owned())
        .or_else(|| req.cookie(TOKEN_COOKIE).map(|c| c.value().to_owned()))
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, AppError>>;

    fn from_request(req: &HttpRequest, _payload: &mut dev::Payload) -> Self::Future {
        let token = token_from_request(req);
        let pool = req.app_data::<Data<DbPool>>().cloned();
        let config = req.app_data::<Data<Config>>().cloned();
        Box::pin(async move {
            let token = token.ok_or(AppError::Unauthenticated)?;
            let (pool, config) = match (pool, config) {
                (Some(pool), Some(config)) => (pool, config),
                _ => return Err(AppError::Internal(anyhow!("application data is not configured"))),
            };
            let claims = auth::decode_token(&config.jwt_secret, &token).map_err(|e| {
                debug!("rejecting token: {}", e);
                AppError::Unauthenticated
            })?;
            web::block(move || {
                let mut conn = pool.get()?;
                CurrentUser::load(&mut conn, claims.sub, claims.sid)
            })
            .await?
        })
    }
}
