use crate::database::{comments, reviews, users, SqlitePool};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use domain::{DomainError, Role, User, UserRepository};

// Database model - separate from domain entity
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct UserModel {
    id: i32,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    bio: String,
    role: String,
    is_superuser: bool,
    confirmation_salt: String,
    last_login: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
struct NewUserModel {
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    bio: String,
    role: String,
    is_superuser: bool,
    confirmation_salt: String,
    last_login: Option<NaiveDateTime>,
}

// A role string outside the closed set is a configuration error, so the
// conversion is fallible rather than defaulting.
fn to_domain(model: UserModel) -> Result<User, DomainError> {
    Ok(User {
        id: Some(model.id),
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        bio: model.bio,
        role: Role::parse(&model.role)?,
        is_superuser: model.is_superuser,
        confirmation_salt: model.confirmation_salt,
        last_login: model.last_login.map(|at| at.and_utc()),
    })
}

impl From<&User> for NewUserModel {
    fn from(user: &User) -> Self {
        NewUserModel {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            bio: user.bio.clone(),
            role: user.role.to_string(),
            is_superuser: user.is_superuser,
            confirmation_salt: user.confirmation_salt.clone(),
            last_login: user.last_login.map(|at| at.naive_utc()),
        }
    }
}

fn map_save_error(err: diesel::result::Error, user: &User) -> DomainError {
    match err {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DomainError::IdentityConflict(format!(
                "username '{}' or email '{}' is already in use",
                user.username, user.email
            ))
        }
        other => DomainError::RepositoryError(other.to_string()),
    }
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            users::table
                .filter(users::id.eq(id))
                .select(UserModel::as_select())
                .first::<UserModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        result.map(to_domain).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let username = username.to_string();
        let result = tokio::task::spawn_blocking(move || {
            users::table
                .filter(users::username.eq(username))
                .select(UserModel::as_select())
                .first::<UserModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        result.map(to_domain).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let email = email.to_string();
        let result = tokio::task::spawn_blocking(move || {
            users::table
                .filter(users::email.eq(email))
                .select(UserModel::as_select())
                .first::<UserModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        result.map(to_domain).transpose()
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let new_user = NewUserModel::from(user);
        let user_for_errors = user.clone();

        let result = tokio::task::spawn_blocking(move || {
            diesel::insert_into(users::table)
                .values(&new_user)
                .execute(&mut conn)?;

            // SQLite doesn't support RETURNING, so we insert and then fetch
            users::table
                .order(users::id.desc())
                .select(UserModel::as_select())
                .first::<UserModel>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| map_save_error(e, &user_for_errors))?;

        to_domain(result)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let user_id = user.id.ok_or_else(|| {
            DomainError::ValidationError("User ID is required for updates".to_string())
        })?;

        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let changes = NewUserModel::from(user);
        let user_for_errors = user.clone();

        let result = tokio::task::spawn_blocking(move || {
            diesel::update(users::table.filter(users::id.eq(user_id)))
                .set((
                    users::username.eq(changes.username),
                    users::email.eq(changes.email),
                    users::first_name.eq(changes.first_name),
                    users::last_name.eq(changes.last_name),
                    users::bio.eq(changes.bio),
                    users::role.eq(changes.role),
                    users::is_superuser.eq(changes.is_superuser),
                    users::confirmation_salt.eq(changes.confirmation_salt),
                    users::last_login.eq(changes.last_login),
                ))
                .execute(&mut conn)?;

            users::table
                .filter(users::id.eq(user_id))
                .select(UserModel::as_select())
                .first::<UserModel>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| map_save_error(e, &user_for_errors))?;

        to_domain(result)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                // Comments under the user's reviews go first, then the
                // user's own comments and reviews, then the record.
                let review_ids = reviews::table
                    .filter(reviews::author_id.eq(id))
                    .select(reviews::id);
                diesel::delete(comments::table.filter(comments::review_id.eq_any(review_ids)))
                    .execute(conn)?;
                diesel::delete(comments::table.filter(comments::author_id.eq(id)))
                    .execute(conn)?;
                diesel::delete(reviews::table.filter(reviews::author_id.eq(id))).execute(conn)?;
                diesel::delete(users::table.filter(users::id.eq(id))).execute(conn)?;
                Ok(())
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            users::table
                .order(users::id.asc())
                .select(UserModel::as_select())
                .load::<UserModel>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        result.into_iter().map(to_domain).collect()
    }
}
