use crate::models::{Membership, Role};
use crate::schema::users;
use anyhow::{anyhow, Result};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::prelude::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Serialize, Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    pub fn find(conn: &mut SqliteConnection, id: i32) -> Result<Option<Self>> {
        let user = users::table
            .find(id)
            .select(User::as_select())
            .first(conn)
            .optional()?;
        Ok(user)
    }

    pub fn find_by_email(conn: &mut SqliteConnection, email: &str) -> Result<Option<Self>> {
        let user = users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(conn)
            .optional()?;
        Ok(user)
    }

    pub fn create(
        conn: &mut SqliteConnection,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Self> {
        if Self::find_by_email(conn, email)?.is_some() {
            return Err(anyhow!("User with email {} already exists", email));
        }
        let now = Utc::now().naive_utc();
        let password_hash = hash_password(password)?;
        let new_user = NewUser {
            name,
            email,
            password_hash: &password_hash,
            role_id: role.id(),
            created_at: now,
            updated_at: now,
        };
        let user = diesel::insert_into(users::table)
            .values(new_user)
            .returning(User::as_returning())
            .get_result(conn)?;
        Ok(user)
    }

    /// The role stored on the account itself, ignoring any organization.
    pub fn role(&self) -> Result<Role> {
        Role::from_id(self.role_id)
    }

    pub fn verify_password(&self, password: &str) -> bool {
        let parsed_hash = match PasswordHash::new(&self.password_hash) {
            Ok(hash) => hash,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    pub fn organizations(&self, conn: &mut SqliteConnection) -> Result<Vec<(Membership, User)>> {
        Membership::organizations_of(conn, self.id)
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[test]
    fn test_create_and_verify() {
        let pool = create_test_pool();
        let mut conn = pool.get().unwrap();
        conn.test_transaction::<_, anyhow::Error, _>(|conn| {
            let user = User::create(conn, "alice", "alice@example.com", "secret", Role::User)?;
            assert_eq!(user.role()?, Role::User);
            assert!(user.verify_password("secret"));
            assert!(!user.verify_password("Secret"));
            let found = User::find_by_email(conn, "alice@example.com")?.expect("must exist");
            assert_eq!(found.id, user.id);
            Ok(())
        });
    }

    #[test]
    fn test_duplicate_email_is_rejected() {
        let pool = create_test_pool();
        let mut conn = pool.get().unwrap();
        conn.test_transaction::<_, anyhow::Error, _>(|conn| {
            User::create(conn, "alice", "alice@example.com", "secret", Role::User)?;
            let again = User::create(conn, "other", "alice@example.com", "secret", Role::Admin);
            assert!(again.is_err());
            Ok(())
        });
    }
}
