use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::services::UserService;
use crate::utils::auth::create_jwt;
use crate::utils::password::{check_password_strength, verify_password};

pub struct AuthService<'a> {
    db: &'a Database,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a Database) -> Self {
        AuthService { db }
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        let user = UserService::new(self.db)
            .get_user_by_email(&email.trim().to_lowercase())
            .await?;

        match user {
            Some(user) if verify_password(password, &user.password_hash)? => Ok(Some(user)),
            _ => Ok(None),
        }
    }

    /// Checks the credentials and issues a signed token for the account.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        secret: &str,
        expires_in: &str,
    ) -> AppResult<String> {
        let user = self
            .authenticate(email, password)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        tracing::debug!("Issuing token for user {}", user.id);
        create_jwt(user.id, secret, expires_in)
    }

    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        if !verify_password(current_password, &user.password_hash)? {
            return Err(AppError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }
        check_password_strength(new_password, &[user.username.as_str(), user.email.as_str()])?;

        UserService::new(self.db)
            .update_password(user.id, new_password)
            .await?;

        tracing::info!("Password changed for user {}", user.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_user, TEST_PASSWORD};
    use crate::utils::auth::verify_jwt;

    #[actix_web::test]
    async fn test_login_issues_token_for_valid_credentials() {
        let db = Database::in_memory().await.unwrap();
        let user = create_user(&db, "chef").await;
        let service = AuthService::new(&db);

        let token = service
            .login("CHEF@example.com", TEST_PASSWORD, "secret", "1h")
            .await
            .unwrap();
        assert_eq!(verify_jwt(&token, "secret").unwrap().sub, user.id);

        assert!(matches!(
            service.login("chef@example.com", "wrong-password", "secret", "1h").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("nobody@example.com", TEST_PASSWORD, "secret", "1h").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[actix_web::test]
    async fn test_change_password_requires_current_password() {
        let db = Database::in_memory().await.unwrap();
        let user = create_user(&db, "chef").await;
        let service = AuthService::new(&db);

        assert!(service
            .change_password(&user, "not-it", "Fresh-passw0rd")
            .await
            .is_err());

        service
            .change_password(&user, TEST_PASSWORD, "Fresh-passw0rd")
            .await
            .unwrap();
        assert!(service
            .authenticate("chef@example.com", "Fresh-passw0rd")
            .await
            .unwrap()
            .is_some());
    }
}
