pub mod comment_repository;
pub mod post_repository;
pub mod user_repository;

/// SQLSTATE for `unique_violation`.
pub(crate) const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for `foreign_key_violation`.
pub(crate) const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Field message for a reference to a row that does not exist.
pub(crate) fn missing_pk_message(id: uuid::Uuid) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}

pub(crate) fn sql_state(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned())
}
