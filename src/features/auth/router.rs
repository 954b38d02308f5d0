use salvo::oapi::extract::JsonBody;
use salvo::prelude::*;

use crate::core::dtos::auth::{login_dto::LoginDto, register_dto::RegisterDto};
use crate::core::types::errors::auth_error::AuthError;
use crate::core::types::responses::auth_response::AuthResponse;
use crate::core::types::responses::current_user_response::CurrentUserResponse;
use crate::core::utils::jwt_utils::JwtUtils;
use crate::features::user::repository::UserRepositoryImpl;

use super::service::{AuthService, AuthServiceImpl};

pub fn get_auth_router(jwt_utils: JwtUtils) -> Router {
    let current_user_router = Router::with_hoop(jwt_utils.auth_middleware())
        .path("current-user")
        .get(current_user);

    Router::new()
        .path("auth")
        .push(Router::with_path("register").post(register))
        .push(Router::with_path("login").post(login))
        .push(Router::with_hoop(jwt_utils.refresh_token_middleware()).get(refresh_token))
        .push(current_user_router)
}

/// Register a new account
#[endpoint(tags("auth"), status_codes(201, 409, 500))]
async fn register(
    _res: &mut Response,
    data: JsonBody<RegisterDto>,
    depot: &mut Depot,
) -> Result<AuthResponse, AuthError> {
    let auth_service = depot
        .obtain::<AuthServiceImpl<UserRepositoryImpl>>()
        .unwrap();
    let jwt_utils = depot.obtain::<JwtUtils>().unwrap();

    let auth_response = auth_service.register(data.0, jwt_utils.clone()).await?;

    Ok(auth_response)
}

/// Log in with username and password
#[endpoint(tags("auth"), status_codes(201, 401, 500))]
async fn login(
    _res: &mut Response,
    data: JsonBody<LoginDto>,
    depot: &mut Depot,
) -> Result<AuthResponse, AuthError> {
    let auth_service = depot
        .obtain::<AuthServiceImpl<UserRepositoryImpl>>()
        .unwrap();
    let jwt_utils = depot.obtain::<JwtUtils>().unwrap();

    let auth_response = auth_service.login(data.0, jwt_utils.clone()).await?;

    Ok(auth_response)
}

/// Renew token
#[endpoint(tags("auth"), status_codes(200, 401, 500))]
async fn refresh_token(_res: &mut Response, depot: &mut Depot) -> Result<AuthResponse, AuthError> {
    let user_id = depot.get::<String>("user_id").unwrap();
    let username = depot.get::<String>("username").unwrap();
    let auth_service = depot
        .obtain::<AuthServiceImpl<UserRepositoryImpl>>()
        .unwrap();
    let jwt_utils = depot.obtain::<JwtUtils>().unwrap();

    let auth_response = auth_service
        .refresh_token(jwt_utils.clone(), user_id.parse().unwrap(), username)
        .await?;

    Ok(auth_response)
}

/// Username the current session was opened with
#[endpoint(tags("auth"), status_codes(200, 401))]
async fn current_user(
    _res: &mut Response,
    depot: &mut Depot,
) -> Result<CurrentUserResponse, AuthError> {
    let username = depot.get::<String>("username").unwrap();

    Ok(CurrentUserResponse {
        username: username.clone(),
    })
}
