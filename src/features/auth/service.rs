use chrono::Utc;
use salvo::async_trait;

use crate::{
    core::{
        dtos::auth::{login_dto::LoginDto, register_dto::RegisterDto},
        entities::models::NewUser,
        types::{errors::auth_error::AuthError, responses::auth_response::AuthResponse},
        utils::{
            bcrypt_utils::{hash_password, verify_password},
            jwt_utils::JwtUtils,
        },
    },
    features::user::repository::UserRepository,
};

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(
        &self,
        data: RegisterDto,
        jwt_utils: JwtUtils,
    ) -> Result<AuthResponse, AuthError>;

    async fn login(&self, data: LoginDto, jwt_utils: JwtUtils) -> Result<AuthResponse, AuthError>;

    async fn refresh_token(
        &self,
        jwt_utils: JwtUtils,
        user_id: i32,
        username: &str,
    ) -> Result<AuthResponse, AuthError>;
}

#[derive(Debug, Clone)]
pub struct AuthServiceImpl<U: UserRepository> {
    user_repository: U,
}

impl<U: UserRepository> AuthServiceImpl<U> {
    pub fn new(user_repository: U) -> Self {
        Self { user_repository }
    }
}

#[async_trait]
impl<U: UserRepository + Send + Sync> AuthService for AuthServiceImpl<U> {
    async fn register(
        &self,
        data: RegisterDto,
        jwt_utils: JwtUtils,
    ) -> Result<AuthResponse, AuthError> {
        // Username uniqueness first; an absent email never collides.
        let username_taken = self
            .user_repository
            .exists_username(&data.username)
            .await
            .map_err(|err| AuthError::UnexpectedError(err.to_string()))?;

        if username_taken {
            return Err(AuthError::UsernameTaken(data.username));
        }

        if let Some(email) = data.email.as_deref() {
            let email_taken = self
                .user_repository
                .exists_email(email)
                .await
                .map_err(|err| AuthError::UnexpectedError(err.to_string()))?;

            if email_taken {
                return Err(AuthError::EmailTaken(email.to_string()));
            }
        }

        let password_hash = hash_password(&data.password);
        let now = Utc::now().naive_utc();

        let new_user = NewUser {
            username: &data.username,
            email: data.email.as_deref(),
            password_hash: &password_hash,
            avatar_url: data.avatar_url.as_deref(),
            created_at: now,
            is_online: Some(false),
            last_activity: Some(now),
        };

        let user = self
            .user_repository
            .create_user(new_user)
            .await
            .map_err(|_| AuthError::UnexpectedError("Failed to create user".to_string()))?;

        let token = jwt_utils.generate_token(&user.id.to_string(), &user.username);
        let refresh_token = jwt_utils.generate_refresh_token(&user.id.to_string(), &user.username);

        Ok(AuthResponse {
            token,
            refresh_token,
            user: Some(user),
        })
    }

    async fn login(&self, data: LoginDto, jwt_utils: JwtUtils) -> Result<AuthResponse, AuthError> {
        let user = self
            .user_repository
            .get_user_by_username(&data.username)
            .await
            .map_err(|_| AuthError::InvalidCredentials)?;

        if !verify_password(&data.password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        // Presence stub: stamped on login, never read back.
        let now = Utc::now().naive_utc();
        let _ = self.user_repository.set_presence(user.id, true, now).await;

        let token = jwt_utils.generate_token(&user.id.to_string(), &user.username);
        let refresh_token = jwt_utils.generate_refresh_token(&user.id.to_string(), &user.username);

        Ok(AuthResponse {
            token,
            refresh_token,
            user: Some(user),
        })
    }

    async fn refresh_token(
        &self,
        jwt_utils: JwtUtils,
        user_id: i32,
        username: &str,
    ) -> Result<AuthResponse, AuthError> {
        let token = jwt_utils.generate_token(&user_id.to_string(), username);
        let refresh_token = jwt_utils.generate_refresh_token(&user_id.to_string(), username);

        Ok(AuthResponse {
            token,
            refresh_token,
            user: None,
        })
    }
}
