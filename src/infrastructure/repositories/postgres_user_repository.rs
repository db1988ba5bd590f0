use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::repositories::{PageRequest, UserFilter, UserPage, UserRepository};
use crate::domain::user::value_objects::{
    Department, Email, Name, Phone, DEPARTMENT_RULE, EMAIL_RULE, NAME_RULE, PHONE_RULE,
};
use crate::domain::user::{NewUser, User, UserChanges, UserError, UserId, UserResult};

const USER_COLUMNS: &str =
    "id, name, email, phone, department, is_active, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    department: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let invalid = |e: String| UserError::InvalidRecord(format!("user {}: {}", r.id, e));
        Ok(User::from_persistence(
            UserId::from(r.id),
            Name::new(&r.name).map_err(invalid)?,
            Email::new(&r.email).map_err(invalid)?,
            Phone::new(&r.phone).map_err(invalid)?,
            Department::new(&r.department).map_err(invalid)?,
            r.is_active,
            r.created_at,
            r.updated_at,
        ))
    }
}

/// PostgreSQL implementation of UserRepository
///
/// Email uniqueness and field formats are enforced again by the table's
/// UNIQUE and CHECK constraints; violations are mapped back onto the domain
/// error taxonomy.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations in `migrations/`
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
        builder.push(" WHERE TRUE");

        if let Some(is_active) = filter.is_active {
            builder.push(" AND is_active = ").push_bind(is_active);
        }

        if let Some(department) = filter.department_term() {
            builder
                .push(" AND department ILIKE ")
                .push_bind(like_pattern(department))
                .push(" ESCAPE '\\'");
        }

        if let Some(term) = filter.search_term() {
            let pattern = like_pattern(term);
            builder
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR email ILIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR department ILIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }
    }
}

/// Wraps `term` for a literal substring match under `ESCAPE '\'`
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Maps constraint violations onto the domain error taxonomy
fn map_write_error(e: sqlx::Error, email: &str) -> UserError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return UserError::DuplicateKey(email.to_string());
        }
        if db.is_check_violation() {
            let message = match db.constraint() {
                Some(c) if c.contains("name") => NAME_RULE.to_string(),
                Some(c) if c.contains("email") => EMAIL_RULE.to_string(),
                Some(c) if c.contains("phone") => PHONE_RULE.to_string(),
                Some(c) if c.contains("department") => DEPARTMENT_RULE.to_string(),
                _ => db.message().to_string(),
            };
            return UserError::validation(message);
        }
    }
    UserError::Database(e)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, new_user: NewUser) -> UserResult<User> {
        let user = User::create(new_user);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (
                id, name, email, phone, department, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id().as_uuid())
        .bind(user.name().as_str())
        .bind(user.email().as_str())
        .bind(user.phone().as_str())
        .bind(user.department().as_str())
        .bind(user.is_active())
        .bind(user.created_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, user.email().as_str()))?;

        tracing::debug!(user_id = %row.id, "user created");
        row.try_into()
    }

    async fn find(&self, filter: &UserFilter, page: PageRequest) -> UserResult<UserPage> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        Self::push_filter(&mut count, filter);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));
        Self::push_filter(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = select
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(UserPage {
            users: rows
                .into_iter()
                .map(User::try_from)
                .collect::<UserResult<Vec<_>>>()?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn find_by_id(&self, id: UserId) -> UserResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn update_by_id(&self, id: UserId, changes: UserChanges) -> UserResult<Option<User>> {
        let email = changes.email.as_ref().map(Email::as_str);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                department = COALESCE($5, department),
                is_active = COALESCE($6, is_active),
                updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(changes.name.as_ref().map(Name::as_str))
        .bind(email)
        .bind(changes.phone.as_ref().map(Phone::as_str))
        .bind(changes.department.as_ref().map(Department::as_str))
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, email.unwrap_or_default()))?;

        row.map(User::try_from).transpose()
    }

    async fn delete_by_id(&self, id: UserId) -> UserResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}
