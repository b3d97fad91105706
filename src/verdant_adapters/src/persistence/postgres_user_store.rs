use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use verdant_core::{
    Email, EmailAddress, EmailConfirmation, PasswordHash, PasswordResetConfirmation, User,
    UserId, UserParts, UserStore, UserStoreError, Username,
};

#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresUserStore { pool }
    }

    async fn load_user(&self, id: Uuid) -> Result<User, UserStoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT id, username, password_hash, password_reset_key,
                       password_reset_created_at, created_at, version
                FROM users
                WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        let Some(row) = row else {
            return Err(UserStoreError::UserNotFound);
        };

        let emails = sqlx::query_as::<_, EmailRow>(
            r#"
                SELECT address, verified, is_primary, verified_at,
                       confirmation_key, confirmation_created_at
                FROM user_emails
                WHERE user_id = $1
                ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        row.into_user(emails)
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&self, user: User) -> Result<(), UserStoreError> {
        let parts = user.into_parts();
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            r#"
                INSERT INTO users (id, username, password_hash, password_reset_key,
                                   password_reset_created_at, created_at, version)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(parts.id.as_uuid())
        .bind(parts.username.as_str())
        .bind(parts.password_hash.as_ref().expose_secret())
        .bind(parts.password_reset.as_ref().map(|c| c.key().to_string()))
        .bind(parts.password_reset.as_ref().map(|c| c.created_at()))
        .bind(parts.created_at)
        .bind(version_to_db(parts.version)?)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        insert_emails(&mut tx, parts.id.as_uuid(), &parts.emails).await?;

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        self.load_user(id.as_uuid()).await
    }

    #[tracing::instrument(name = "Retrieving user by email from PostgreSQL", skip_all)]
    async fn get_user_by_email(&self, address: &EmailAddress) -> Result<User, UserStoreError> {
        let user_id: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM user_emails WHERE address = $1")
                .bind(address.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(unexpected)?;

        let Some(user_id) = user_id else {
            return Err(UserStoreError::UserNotFound);
        };

        self.load_user(user_id).await
    }

    #[tracing::instrument(name = "Updating user in PostgreSQL", skip_all)]
    async fn update_user(&self, user: User) -> Result<(), UserStoreError> {
        let parts = user.into_parts();
        let id = parts.id.as_uuid();
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let result = sqlx::query(
            r#"
                UPDATE users
                SET username = $2,
                    password_hash = $3,
                    password_reset_key = $4,
                    password_reset_created_at = $5,
                    version = version + 1
                WHERE id = $1 AND version = $6
            "#,
        )
        .bind(id)
        .bind(parts.username.as_str())
        .bind(parts.password_hash.as_ref().expose_secret())
        .bind(parts.password_reset.as_ref().map(|c| c.key().to_string()))
        .bind(parts.password_reset.as_ref().map(|c| c.created_at()))
        .bind(version_to_db(parts.version)?)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(unexpected)?;

            return Err(match exists {
                Some(_) => UserStoreError::VersionConflict,
                None => UserStoreError::UserNotFound,
            });
        }

        sqlx::query("DELETE FROM user_emails WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        insert_emails(&mut tx, id, &parts.emails).await?;

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }
}

async fn insert_emails(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    emails: &[Email],
) -> Result<(), UserStoreError> {
    for (position, email) in emails.iter().enumerate() {
        let position = i32::try_from(position).map_err(|e| unexpected(e.to_string()))?;

        sqlx::query(
            r#"
                INSERT INTO user_emails (address, user_id, verified, is_primary, verified_at,
                                         confirmation_key, confirmation_created_at, position)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(email.address().as_str())
        .bind(user_id)
        .bind(email.verified())
        .bind(email.primary())
        .bind(email.verified_at())
        .bind(email.confirmation().map(|c| c.key().to_string()))
        .bind(email.confirmation().map(|c| c.created_at()))
        .bind(position)
        .execute(&mut **tx)
        .await
        .map_err(map_write_error)?;
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    password_reset_key: Option<String>,
    password_reset_created_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    version: i64,
}

#[derive(sqlx::FromRow)]
struct EmailRow {
    address: String,
    verified: bool,
    is_primary: bool,
    verified_at: Option<DateTime<Utc>>,
    confirmation_key: Option<String>,
    confirmation_created_at: Option<DateTime<Utc>>,
}

impl UserRow {
    fn into_user(self, emails: Vec<EmailRow>) -> Result<User, UserStoreError> {
        let emails = emails
            .into_iter()
            .map(EmailRow::into_email)
            .collect::<Result<Vec<_>, _>>()?;

        let password_reset = match (self.password_reset_key, self.password_reset_created_at) {
            (Some(key), Some(created_at)) => {
                Some(PasswordResetConfirmation::issued_at(key, created_at))
            }
            _ => None,
        };

        let parts = UserParts {
            id: UserId::from(self.id),
            username: Username::try_from(self.username).map_err(unexpected)?,
            password_hash: PasswordHash::new(Secret::from(self.password_hash)),
            emails,
            password_reset,
            created_at: self.created_at,
            version: u64::try_from(self.version).map_err(unexpected)?,
        };

        User::from_parts(parts).map_err(unexpected)
    }
}

impl EmailRow {
    fn into_email(self) -> Result<Email, UserStoreError> {
        let confirmation = match (self.confirmation_key, self.confirmation_created_at) {
            (Some(key), Some(created_at)) => Some(EmailConfirmation::issued_at(key, created_at)),
            _ => None,
        };

        Email::restore(
            EmailAddress::try_from(self.address).map_err(unexpected)?,
            self.verified,
            self.is_primary,
            confirmation,
            self.verified_at,
        )
        .map_err(unexpected)
    }
}

fn version_to_db(version: u64) -> Result<i64, UserStoreError> {
    i64::try_from(version).map_err(unexpected)
}

fn unexpected(e: impl ToString) -> UserStoreError {
    UserStoreError::UnexpectedError(e.to_string())
}

fn map_write_error(e: sqlx::Error) -> UserStoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.constraint().is_some() {
            return UserStoreError::UserAlreadyExists;
        }
    }
    UserStoreError::UnexpectedError(e.to_string())
}
