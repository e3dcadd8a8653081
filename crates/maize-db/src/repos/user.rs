//! User repository.
//!
//! Users are created by registration or by first-login provisioning. Subject
//! id and email are UNIQUE; collisions surface as
//! [`DatabaseError::UniqueViolation`] so the identity resolver can reconcile
//! concurrent first logins.

use maize_core::entities::{NewUser, User};
use maize_core::enums::UserRole;
use maize_core::ids::PREFIX_USER;

use crate::error::DatabaseError;
use crate::helpers::{
    fmt_datetime, get_bool, get_opt_string, now, parse_datetime, parse_enum,
    parse_optional_datetime,
};
use crate::service::MaizeService;
use crate::updates::UserUpdate;

const USER_COLUMNS: &str = "id, subject_id, name, email, photo_url, role, phone, location, bio, \
     is_active, last_login, created_at, updated_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    let role: String = row.get(5)?;
    let last_login = get_opt_string(row, 10)?;
    let created_at: String = row.get(11)?;
    let updated_at: String = row.get(12)?;
    Ok(User {
        id: row.get(0)?,
        subject_id: get_opt_string(row, 1)?,
        name: row.get(2)?,
        email: get_opt_string(row, 3)?,
        photo_url: get_opt_string(row, 4)?,
        role: parse_enum(&role)?,
        phone: get_opt_string(row, 6)?,
        location: get_opt_string(row, 7)?,
        bio: get_opt_string(row, 8)?,
        is_active: get_bool(row, 9)?,
        last_login: parse_optional_datetime(last_login.as_deref())?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

impl MaizeService {
    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::UniqueViolation` when the subject id or email is
    /// already taken.
    pub async fn create_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        let id = self.db().generate_id(PREFIX_USER).await?;
        let now = now();
        let email = new
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        self.db()
            .conn()
            .execute(
                "INSERT INTO users (id, subject_id, name, email, photo_url, role, is_active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)",
                libsql::params![
                    id.as_str(),
                    new.subject_id.as_deref(),
                    new.name.as_str(),
                    email.as_deref(),
                    new.photo_url.as_deref(),
                    UserRole::default().as_str(),
                    fmt_datetime(now),
                ],
            )
            .await
            .map_err(DatabaseError::from_write)?;

        Ok(User {
            id,
            subject_id: new.subject_id,
            name: new.name,
            email,
            photo_url: new.photo_url,
            role: UserRole::default(),
            phone: None,
            location: None,
            bio: None,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        self.find_user_where("id = ?1", id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_user_by_subject(&self, subject_id: &str) -> Result<Option<User>, DatabaseError> {
        self.find_user_where("subject_id = ?1", subject_id).await
    }

    /// Case-insensitive email lookup.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        self.find_user_where("email = ?1", email.trim()).await
    }

    async fn find_user_where(&self, clause: &str, value: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {clause}");
        let mut rows = self.db().conn().query(&sql, [value]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Apply a profile update. Returns `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the update fails.
    pub async fn update_user(
        &self,
        id: &str,
        update: &UserUpdate,
    ) -> Result<Option<User>, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        let fields = [
            ("name", update.name.as_deref()),
            ("photo_url", update.photo_url.as_deref()),
            ("phone", update.phone.as_deref()),
            ("location", update.location.as_deref()),
            ("bio", update.bio.as_deref()),
        ];
        for (column, value) in fields {
            if let Some(value) = value {
                sets.push(format!("{column} = ?{idx}"));
                params.push(value.into());
                idx += 1;
            }
        }

        if sets.is_empty() {
            return self.find_user(id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(fmt_datetime(now()).into());
        idx += 1;
        params.push(id.into());

        let sql = format!("UPDATE users SET {} WHERE id = ?{idx}", sets.join(", "));
        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await
            .map_err(DatabaseError::from_write)?;
        if changed == 0 {
            return Ok(None);
        }
        self.find_user(id).await
    }

    /// Stamp `last_login` with the current time.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the user does not exist.
    pub async fn touch_last_login(&self, id: &str) -> Result<User, DatabaseError> {
        let stamp = fmt_datetime(now());
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE users SET last_login = ?1, updated_at = ?1 WHERE id = ?2",
                libsql::params![stamp, id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.find_user(id).await?.ok_or(DatabaseError::NoResult)
    }
}
