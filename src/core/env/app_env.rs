use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppEnv {
    pub app_port: u16,
    pub db_uri: DbUri,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone)]
pub struct DbUri(pub String);

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub jwt_token: String,
    pub refresh_token: String,
    pub token_expires_in_seconds: i64,
    pub refresh_token_expires_in_seconds: i64,
}

impl AppEnv {
    pub fn new() -> Self {
        dotenv().ok();

        Self {
            app_port: Self::get_env("APP_PORT", 8080),
            db_uri: DbUri(env::var("DATABASE_URL").expect("DATABASE_URL must be set")),
            jwt: JwtConfig {
                jwt_token: env::var("AUTH_JWT_SECRET").expect("AUTH_JWT_SECRET must be set"),
                refresh_token: env::var("AUTH_REFRESH_SECRET")
                    .expect("AUTH_REFRESH_SECRET must be set"),
                token_expires_in_seconds: Self::get_dur_env("AUTH_JWT_TOKEN_EXPIRES_IN", 86_400), // a day
                refresh_token_expires_in_seconds: Self::get_dur_env(
                    "AUTH_REFRESH_TOKEN_EXPIRES_IN",
                    31_536_000, // a year
                ),
            },
        }
    }

    fn get_env(var: &str, default: u16) -> u16 {
        env::var(var)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_dur_env(var: &str, default: i64) -> i64 {
        env::var(var)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
