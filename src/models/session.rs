//! Login sessions and the organization context they carry.
//!
//! A session row remembers which organization the user is currently working
//! in. [`ActiveContext::resolve`] turns a user and their session into the
//! effective role and owner id used by every article read and write.

use crate::models::permission::{self, Capability};
use crate::models::{Membership, OwnerScope, Role, User};
use crate::schema::sessions;
use anyhow::{anyhow, Result};
use chrono::prelude::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::debug;
use serde::Serialize;

#[derive(Serialize, Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = sessions)]
pub struct Session {
    pub id: i32,
    pub user_id: i32,
    pub organization_id: Option<i32>,
    pub organization_name: Option<String>,
    pub organization_role_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl Session {
    pub fn create(conn: &mut SqliteConnection, user: &User) -> Result<Self> {
        let session = diesel::insert_into(sessions::table)
            .values((
                sessions::user_id.eq(user.id),
                sessions::created_at.eq(Utc::now().naive_utc()),
            ))
            .returning(Session::as_returning())
            .get_result(conn)?;
        Ok(session)
    }

    pub fn find(conn: &mut SqliteConnection, id: i32, user_id: i32) -> Result<Option<Self>> {
        let session = sessions::table
            .find(id)
            .filter(sessions::user_id.eq(user_id))
            .select(Session::as_select())
            .first(conn)
            .optional()?;
        Ok(session)
    }

    pub fn delete(conn: &mut SqliteConnection, id: i32) -> Result<()> {
        diesel::delete(sessions::table.find(id)).execute(conn)?;
        Ok(())
    }

    /// Makes `organization` the active workspace. All three fields are
    /// written by one statement.
    pub fn activate(
        &mut self,
        conn: &mut SqliteConnection,
        organization: &User,
        role: Role,
    ) -> Result<()> {
        diesel::update(sessions::table.find(self.id))
            .set((
                sessions::organization_id.eq(Some(organization.id)),
                sessions::organization_name.eq(Some(organization.name.as_str())),
                sessions::organization_role_id.eq(Some(role.id())),
            ))
            .execute(conn)?;
        self.organization_id = Some(organization.id);
        self.organization_name = Some(organization.name.clone());
        self.organization_role_id = Some(role.id());
        Ok(())
    }
}

/// Who the current request acts as.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ActiveContext {
    pub user_id: i32,
    pub role: Role,
    /// Owner id for articles: the active organization anchor, or the user.
    pub organization_id: i32,
    pub organization_name: Option<String>,
}

impl ActiveContext {
    /// Derives the context from what is already stored, without touching
    /// the database.
    pub fn from_parts(user: &User, session: &Session) -> Result<Self> {
        if session.user_id != user.id {
            return Err(anyhow!(
                "Session {} does not belong to user {}",
                session.id,
                user.id
            ));
        }
        let role = match session.organization_role_id {
            Some(role_id) => Role::from_id(role_id)?,
            None => user.role()?,
        };
        Ok(Self {
            user_id: user.id,
            role,
            organization_id: session.organization_id.unwrap_or(user.id),
            organization_name: session.organization_name.clone(),
        })
    }

    /// Resolves the context and, when the session has no organization yet
    /// and the user belongs to exactly one, persists that organization in
    /// the session. Once persisted, later calls do not look at memberships.
    pub fn resolve(
        conn: &mut SqliteConnection,
        user: &User,
        session: &mut Session,
    ) -> Result<Self> {
        if session.organization_id.is_none() {
            let memberships = Membership::for_user(conn, user.id)?;
            if let [membership] = memberships.as_slice() {
                let organization = User::find(conn, membership.organization_id)?.ok_or_else(
                    || anyhow!("Organization {} not found", membership.organization_id),
                )?;
                debug!(
                    "session {}: adopting organization {} for user {}",
                    session.id, organization.id, user.id
                );
                session.activate(conn, &organization, membership.role()?)?;
            }
        }
        Self::from_parts(user, session)
    }

    pub fn can(&self, capability: Capability) -> bool {
        permission::allows(self.role, capability)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins read everything; everyone else only their organization's
    /// articles. Publishers are scoped like plain users.
    pub fn article_scope(&self) -> OwnerScope {
        if self.is_admin() {
            OwnerScope::All
        } else {
            OwnerScope::Owner(self.organization_id)
        }
    }

    pub fn owns(&self, owner_id: i32) -> bool {
        self.organization_id == owner_id
    }
}
