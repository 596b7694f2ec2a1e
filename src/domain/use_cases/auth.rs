use std::fmt::Write;
use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::constants::{DEFAULT_ADMIN_PASSWORD, RESET_TOKEN_TTL_MINUTES};
use crate::entities::token::AuthResponse;
use crate::entities::user::{
    AuthenticatedUser, ForgotPasswordRequest, InitAdminRequest, LoginUser, NewUser,
    ResetPasswordRequest, User,
};
use crate::errors::{AppError, AuthError};
use crate::infrastructure::mail::{password_reset_email, Mailer};
use crate::interfaces::repositories::user::UserRepository;
use crate::repositories::token::TokenServiceRepository;

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub user_repo: R,
    pub token_service: T,
    pub mailer: Arc<dyn Mailer>,
    pub frontend_url: String,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub fn new(user_repo: R, token_service: T, mailer: Arc<dyn Mailer>, frontend_url: String) -> Self {
        AuthHandler {
            user_repo,
            token_service,
            mailer,
            frontend_url,
        }
    }

    /// Logs in with a username or email; unknown users and wrong passwords look the same.
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AppError> {
        request.validate()?;
        let identifier = request
            .identifier()
            .ok_or_else(|| AppError::invalid_field("username", "Username or email is required"))?;

        let user = self.user_repo.get_user_by_identifier(identifier)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|e| {
                tracing::warn!("Stored password hash unusable for user {}: {}", user.id, e);
                AuthError::InvalidCredentials
            })?;
        if !is_password_valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let response = self.create_auth_response(user)?;

        tracing::info!(user_id = response.user.id, "User logged in successfully");
        Ok(response)
    }

    pub fn create_auth_response(&self, user: User) -> Result<AuthResponse, AuthError> {
        let token = self.token_service.create_jwt(&user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        Ok(AuthResponse { token, user: user.into() })
    }

    /// Resolves a bearer token to the user it was issued for. Tokens of deleted users fail.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = self.token_service.decode_jwt(token)?.claims;
        let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

        let user = self.user_repo.get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(user.into())
    }

    /// Creates the first admin account. Refused once any user exists.
    pub async fn init_admin(&self, request: InitAdminRequest) -> Result<AuthResponse, AppError> {
        let new_user = request.into_new_user();
        new_user.validate()?;

        if self.user_repo.count_users().await? > 0 {
            return Err(AuthError::UsersAlreadyExist.into());
        }

        let password_hash = hash_password(&new_user.password)?;
        let insert = new_user.prepare_for_insert(password_hash);

        let user = self.user_repo.create_first_user(&insert)
            .await?
            .ok_or(AuthError::UsersAlreadyExist)?;

        if new_user.password == DEFAULT_ADMIN_PASSWORD {
            tracing::warn!(
                username = %user.username,
                "Admin created with the default password; change it immediately"
            );
        }
        tracing::info!(user_id = user.id, "Initial admin user created");

        Ok(self.create_auth_response(user)?)
    }

    /// Admin-only account creation.
    pub async fn register(&self, request: NewUser) -> Result<AuthenticatedUser, AppError> {
        request.validate()?;

        let password_hash = hash_password(&request.password)?;
        let insert = request.prepare_for_insert(password_hash);
        let user = self.user_repo.create_user(&insert).await?;

        tracing::info!(user_id = user.id, role = ?user.role, "User registered");
        Ok(user.into())
    }

    pub async fn delete_user_by_username(&self, username: &str) -> Result<(), AppError> {
        if !self.user_repo.delete_user_by_username(username).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        tracing::info!(username, "User deleted");
        Ok(())
    }

    /// Issues a reset token when the email is known. Callers always get the same answer.
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> Result<(), AppError> {
        request.validate()?;

        let Some(user) = self.user_repo.get_user_by_email(request.email.trim()).await? else {
            tracing::info!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = generate_reset_token();
        let expires = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        self.user_repo.set_reset_token(user.id, &token, expires).await?;

        let link = format!(
            "{}/admin/reset-password?token={}",
            self.frontend_url.trim_end_matches('/'),
            urlencoding::encode(&token)
        );

        if let Err(e) = self.mailer.send(&password_reset_email(&user.email, &link)).await {
            tracing::error!(user_id = user.id, "Failed to send password reset email: {:#}", e);
        }

        Ok(())
    }

    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), AppError> {
        request.validate()?;

        let password_hash = hash_password(&request.password)?;
        let consumed = self.user_repo
            .reset_password_with_token(request.token.trim(), &password_hash)
            .await?;

        if !consumed {
            return Err(AuthError::InvalidOrExpiredResetToken.into());
        }

        tracing::info!("Password reset completed");
        Ok(())
    }
}

/// 32 random bytes, hex encoded.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().fold(String::with_capacity(64), |mut hex, b| {
        let _ = write!(hex, "{b:02x}");
        hex
    })
}
