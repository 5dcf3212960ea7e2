//! Users service.

use async_trait::async_trait;
use bcrypt::{DEFAULT_COST, hash, verify};
use mockall::automock;

use crate::{
    database::Db,
    domain::users::{
        errors::UsersServiceError,
        models::{NewUser, Password, User, UserUpdate, UserUuid},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    #[tracing::instrument(
        name = "users.service.register",
        skip(self, user),
        fields(user_uuid = %user.uuid, is_admin = user.is_admin),
        err
    )]
    async fn register(&self, user: NewUser) -> Result<User, UsersServiceError> {
        let password_hash = hash(user.password.as_str(), DEFAULT_COST)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_user(
                &mut tx,
                user.uuid,
                &user.name,
                &user.email,
                &password_hash,
                user.is_admin,
            )
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(name = "users.service.login", skip(self, email, password), err)]
    async fn login(&self, email: &str, password: Password) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .find_user_by_email(&mut tx, email)
            .await?
            .ok_or(UsersServiceError::NotFound)?;

        tx.commit().await?;

        if !verify(password.as_str(), &user.password_hash)? {
            return Err(UsersServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let users = self.repository.list_users(&mut tx).await?;

        tx.commit().await?;

        Ok(users)
    }

    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
        caller_is_admin: bool,
    ) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut current = self.repository.get_user(&mut tx, user).await?;

        if let Some(name) = update.name {
            current.name = name;
        }

        if let Some(email) = update.email {
            current.email = email;
        }

        if let Some(password) = update.password {
            current.password_hash = hash(password.as_str(), DEFAULT_COST)?;
        }

        // Only admins may grant or revoke the admin flag.
        if caller_is_admin && let Some(is_admin) = update.is_admin {
            current.is_admin = is_admin;
        }

        let updated = self.repository.update_user(&mut tx, &current).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.repository.get_user(&mut tx, user).await?;

        if current.is_admin {
            return Err(UsersServiceError::AdminUndeletable);
        }

        let rows_affected = self.repository.delete_user(&mut tx, user).await?;

        if rows_affected == 0 {
            return Err(UsersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn count_users(&self) -> Result<u64, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let count = self.repository.count_users(&mut tx).await?;

        tx.commit().await?;

        Ok(count)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Create a user with a bcrypt-hashed password.
    async fn register(&self, user: NewUser) -> Result<User, UsersServiceError>;

    /// Verify credentials and return the matching user.
    ///
    /// Unknown emails are `NotFound`; a wrong password is
    /// `InvalidCredentials`.
    async fn login(&self, email: &str, password: Password) -> Result<User, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError>;

    /// Retrieve all users, newest first.
    async fn list_users(&self) -> Result<Vec<User>, UsersServiceError>;

    /// Apply a partial update. The admin flag only changes when
    /// `caller_is_admin` is set.
    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
        caller_is_admin: bool,
    ) -> Result<User, UsersServiceError>;

    /// Delete a non-admin user.
    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError>;

    /// Count all users.
    async fn count_users(&self) -> Result<u64, UsersServiceError>;
}
