//! Query helpers shared by the stores.

use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, Select, SqlErr,
};

use crate::errors::{AppError, AppResult};
use crate::types::PageRequest;

/// `lower(column) LIKE '%needle%'`, with LIKE metacharacters in `needle`
/// matched literally.
pub fn contains_ci<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let escaped = needle
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(format!("%{}%", escaped)).escape('\\'))
}

/// Count and fetch one page of `select`.
pub async fn fetch_page<E, C>(
    db: &C,
    select: Select<E>,
    page: PageRequest,
) -> AppResult<(Vec<E::Model>, u64)>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
    C: sea_orm::ConnectionTrait,
{
    let paginator = select.paginate(db, page.limit());
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page.page).await?;
    Ok((rows, total))
}

/// Map an update that matched no row to `None`.
pub fn updated<T>(result: Result<T, DbErr>) -> AppResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Report a unique-index violation as a conflict with `message`.
pub fn conflict_on_duplicate(err: DbErr, message: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(message),
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryFilter, QueryTrait};

    use crate::infra::repositories::entities::user;

    #[test]
    fn test_contains_ci_lowercases_needle() {
        let sql = user::Entity::find()
            .filter(contains_ci(user::Column::Name, "50%_Off"))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LOWER("name") LIKE"#), "{}", sql);
        assert!(sql.contains("ESCAPE"), "{}", sql);
        assert!(sql.contains("off"), "{}", sql);
        assert!(!sql.contains("Off"), "{}", sql);
    }

    #[test]
    fn test_other_db_errors_stay_database_errors() {
        let err = conflict_on_duplicate(DbErr::Custom("boom".to_string()), "taken");
        assert!(matches!(err, AppError::Database(_)));
    }
}
