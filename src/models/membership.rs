use crate::models::{Role, User};
use crate::schema::{organization_user, users};
use anyhow::Result;
use diesel::prelude::*;
use serde::Serialize;

/// A row of `organization_user`: `user_id` belongs to the organization
/// anchored by the user `organization_id`.
#[derive(Serialize, Queryable, Selectable, Insertable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = organization_user)]
#[diesel(primary_key(user_id, organization_id))]
pub struct Membership {
    pub user_id: i32,
    pub organization_id: i32,
    pub role_id: i32,
}

impl Membership {
    pub fn role(&self) -> Result<Role> {
        Role::from_id(self.role_id)
    }

    pub fn find(
        conn: &mut SqliteConnection,
        user_id: i32,
        organization_id: i32,
    ) -> Result<Option<Self>> {
        let membership = organization_user::table
            .find((user_id, organization_id))
            .select(Membership::as_select())
            .first(conn)
            .optional()?;
        Ok(membership)
    }

    pub fn for_user(conn: &mut SqliteConnection, user_id: i32) -> Result<Vec<Self>> {
        let memberships = organization_user::table
            .filter(organization_user::user_id.eq(user_id))
            .order(organization_user::organization_id.asc())
            .select(Membership::as_select())
            .load(conn)?;
        Ok(memberships)
    }

    /// Memberships of `user_id` paired with their anchor users.
    pub fn organizations_of(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> Result<Vec<(Self, User)>> {
        let rows = organization_user::table
            .inner_join(users::table.on(users::id.eq(organization_user::organization_id)))
            .filter(organization_user::user_id.eq(user_id))
            .order(users::name.asc())
            .select((Membership::as_select(), User::as_select()))
            .load(conn)?;
        Ok(rows)
    }

    /// Attaches `user_id` to the organization, or changes the role of an
    /// existing membership.
    pub fn join(
        conn: &mut SqliteConnection,
        user_id: i32,
        organization_id: i32,
        role: Role,
    ) -> Result<Self> {
        let membership = Membership {
            user_id,
            organization_id,
            role_id: role.id(),
        };
        diesel::insert_into(organization_user::table)
            .values(&membership)
            .on_conflict((organization_user::user_id, organization_user::organization_id))
            .do_update()
            .set(organization_user::role_id.eq(role.id()))
            .execute(conn)?;
        Ok(membership)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[test]
    fn test_join_and_rejoin() {
        let pool = create_test_pool();
        let mut conn = pool.get().unwrap();
        conn.test_transaction::<_, anyhow::Error, _>(|conn| {
            let anchor = User::create(conn, "acme", "acme@example.com", "pw", Role::User)?;
            let member = User::create(conn, "bob", "bob@example.com", "pw", Role::User)?;

            Membership::join(conn, member.id, anchor.id, Role::Publisher)?;
            let found = Membership::find(conn, member.id, anchor.id)?.expect("must exist");
            assert_eq!(found.role()?, Role::Publisher);

            Membership::join(conn, member.id, anchor.id, Role::User)?;
            let memberships = Membership::for_user(conn, member.id)?;
            assert_eq!(memberships.len(), 1);
            assert_eq!(memberships[0].role()?, Role::User);

            let organizations = member.organizations(conn)?;
            assert_eq!(organizations.len(), 1);
            assert_eq!(organizations[0].1.name, "acme");
            Ok(())
        });
    }
}
