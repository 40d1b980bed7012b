use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{CreateUserRequest, User, ROLE_ADMIN, ROLE_USER};
use crate::utils::password::{check_password_strength, hash_password};
use crate::utils::time::current_timestamp_seconds;
use crate::utils::validation::validate_username;
use validator::Validate;

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, password_hash, role, created_at";

pub struct UserService<'a> {
    db: &'a Database,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a Database) -> Self {
        UserService { db }
    }

    pub async fn get_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let result = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {} FROM "user" WHERE id = ?"#,
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(result)
    }

    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {} FROM "user" WHERE email = ?"#,
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(result)
    }

    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {} FROM "user" WHERE username = ?"#,
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(result)
    }

    /// Users ordered by username.
    pub async fn list_users(&self, offset: i64, limit: i64) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {} FROM "user" ORDER BY username LIMIT ? OFFSET ?"#,
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db.pool)
        .await?;

        Ok(users)
    }

    pub async fn count_users(&self) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM "user""#)
            .fetch_one(&self.db.pool)
            .await?;

        Ok(count)
    }

    /// Registers a user. The very first account becomes an admin.
    pub async fn create_user(&self, form: &CreateUserRequest) -> AppResult<User> {
        form.validate()?;
        validate_username(&form.username)?;
        check_password_strength(&form.password, &[form.username.as_str(), form.email.as_str()])?;

        let email = form.email.trim().to_lowercase();

        if self.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::Validation(
                "A user with that email already exists".to_string(),
            ));
        }
        if self.get_user_by_username(&form.username).await?.is_some() {
            return Err(AppError::Validation(
                "A user with that username already exists".to_string(),
            ));
        }

        let role = if self.count_users().await? == 0 {
            ROLE_ADMIN
        } else {
            ROLE_USER
        };
        let password_hash = hash_password(&form.password)?;
        let now = current_timestamp_seconds();

        let id = sqlx::query(
            r#"
            INSERT INTO "user" (email, username, first_name, last_name, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&email)
        .bind(&form.username)
        .bind(&form.first_name)
        .bind(&form.last_name)
        .bind(&password_hash)
        .bind(role)
        .bind(now)
        .execute(&self.db.pool)
        .await?
        .last_insert_rowid();

        tracing::info!("Registered user {} ({}) with role {}", form.username, id, role);

        self.get_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create user".to_string()))
    }

    pub async fn update_password(&self, id: i64, new_password: &str) -> AppResult<()> {
        let password_hash = hash_password(new_password)?;

        let result = sqlx::query(r#"UPDATE "user" SET password_hash = ? WHERE id = ?"#)
            .bind(password_hash)
            .bind(id)
            .execute(&self.db.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}
