//! `PostgreSQL` user directory.

use super::{
    TaskPgPool,
    models::{GroupRow, UserRow},
    schema::{annotation_groups, annotators},
};
use crate::task::{
    domain::{Group, GroupId, Role, User, UserId},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Text;

/// `PostgreSQL`-backed directory of annotators and groups.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: TaskPgPool,
}

impl PostgresUserDirectory {
    /// Creates a directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserDirectoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserDirectoryError::persistence)?
    }

    /// Adds a group, replacing the name of an existing one.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Persistence`] when the write fails.
    pub async fn insert_group(&self, group: Group) -> UserDirectoryResult<()> {
        let row = GroupRow {
            id: group.id().value(),
            name: group.name().to_owned(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(annotation_groups::table)
                .values(&row)
                .on_conflict(annotation_groups::id)
                .do_update()
                .set(annotation_groups::name.eq(&row.name))
                .execute(connection)
                .map_err(UserDirectoryError::persistence)?;
            Ok(())
        })
        .await
    }

    /// Adds a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::DuplicateEmail`] when the email is taken.
    pub async fn insert_user(&self, user: User) -> UserDirectoryResult<()> {
        let email = user.email().to_owned();
        let row = UserRow {
            id: user.id().value(),
            name: user.name().to_owned(),
            email: user.email().to_owned(),
            role: user.role().as_str().to_owned(),
            group_id: user.group_id().value(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(annotators::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if info.constraint_name() == Some("idx_annotators_email_unique") =>
                    {
                        UserDirectoryError::DuplicateEmail(email.clone())
                    }
                    _ => UserDirectoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_email(&self, email: &str) -> UserDirectoryResult<Option<User>> {
        let lookup = email.trim().to_owned();
        self.run_blocking(move |connection| {
            let row = diesel::sql_query(concat!(
                "SELECT id, name, email, role, group_id FROM annotators ",
                "WHERE LOWER(email) = LOWER($1) LIMIT 1",
            ))
            .bind::<Text, _>(lookup)
            .get_result::<UserRow>(connection)
            .optional()
            .map_err(UserDirectoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = annotators::table
                .find(id.value())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_group(&self, id: GroupId) -> UserDirectoryResult<Option<Group>> {
        self.run_blocking(move |connection| {
            let row = annotation_groups::table
                .find(id.value())
                .select(GroupRow::as_select())
                .first::<GroupRow>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            Ok(row.map(|group| Group::new(GroupId::new(group.id), group.name)))
        })
        .await
    }
}

fn row_to_user(row: UserRow) -> UserDirectoryResult<User> {
    let role = Role::try_from(row.role.as_str()).map_err(UserDirectoryError::persistence)?;
    Ok(User::new(
        UserId::new(row.id),
        row.name,
        row.email,
        role,
        GroupId::new(row.group_id),
    ))
}
