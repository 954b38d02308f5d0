use chrono::NaiveDateTime;
use diesel::{
    ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper,
    dsl::{exists, insert_into},
    r2d2::{ConnectionManager, Pool, PooledConnection},
    select, update,
};
use salvo::async_trait;

use crate::core::{
    database::schema::users,
    entities::models::{NewUser, User},
    types::errors::{general::GeneralError, user_error::UserError},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser<'_>) -> Result<User, UserError>;

    async fn get_user_by_username(&self, username: &str) -> Result<User, UserError>;

    async fn exists_username(&self, username: &str) -> Result<bool, UserError>;

    async fn exists_email(&self, email: &str) -> Result<bool, UserError>;

    async fn set_presence(
        &self,
        user_id: i32,
        is_online: bool,
        at: NaiveDateTime,
    ) -> Result<(), UserError>;
}

#[derive(Debug, Clone)]
pub struct UserRepositoryImpl {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl UserRepositoryImpl {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, GeneralError> {
        self.pool.get().map_err(|_| GeneralError::DbConnectionError)
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create_user(&self, user: NewUser<'_>) -> Result<User, UserError> {
        let mut conn = self.get_conn()?;

        let new_user = insert_into(users::table)
            .values(&user)
            .returning(User::as_select())
            .get_result(&mut conn);

        match new_user {
            Ok(user) => Ok(user),
            Err(_) => Err(UserError::UnexpectedError(
                "Failed to create user".to_string(),
            )),
        }
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, UserError> {
        let mut conn = self.get_conn()?;

        let user = users::table
            .filter(users::username.eq(username))
            .first::<User>(&mut conn);

        match user {
            Ok(user) => Ok(user),
            Err(_) => Err(UserError::UserNameNotFound(username.to_string())),
        }
    }

    async fn exists_username(&self, username: &str) -> Result<bool, UserError> {
        let mut conn = self.get_conn()?;

        select(exists(
            users::table.filter(users::username.eq(username)),
        ))
        .get_result::<bool>(&mut conn)
        .map_err(|_| UserError::UnexpectedError("Failed to check username".to_string()))
    }

    async fn exists_email(&self, email: &str) -> Result<bool, UserError> {
        let mut conn = self.get_conn()?;

        select(exists(users::table.filter(users::email.eq(email))))
            .get_result::<bool>(&mut conn)
            .map_err(|_| UserError::UnexpectedError("Failed to check email".to_string()))
    }

    async fn set_presence(
        &self,
        user_id: i32,
        is_online: bool,
        at: NaiveDateTime,
    ) -> Result<(), UserError> {
        let mut conn = self.get_conn()?;

        update(users::table)
            .filter(users::id.eq(user_id))
            .set((
                users::is_online.eq(Some(is_online)),
                users::last_activity.eq(Some(at)),
            ))
            .execute(&mut conn)
            .map_err(|_| UserError::UnexpectedError("Failed to update presence".to_string()))?;

        Ok(())
    }
}
