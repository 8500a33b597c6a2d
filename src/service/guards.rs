//! Checks shared by every service: referenced records exist, codes are not
//! taken, and the active flag toggle.

use std::str::FromStr;

use chrono::{SubsecRound, Utc};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::model::ActiveFlag;
use crate::store::{Filter, Record, Store};

/// Loads a record or fails with `<Label> not found`.
pub async fn ensure_exists<R: Record>(store: &Store, id: &str) -> ApiResult<R> {
    store
        .find::<R>(id)
        .await?
        .ok_or_else(|| ApiError::not_found(R::LABEL))
}

/// Like [`ensure_exists`], but an absent or empty id is accepted.
pub async fn ensure_optional<R: Record>(store: &Store, id: Option<&str>) -> ApiResult<Option<R>> {
    match id.filter(|id| !id.is_empty()) {
        Some(id) => ensure_exists::<R>(store, id).await.map(Some),
        None => Ok(None),
    }
}

/// Verifies every id with one batched lookup.
pub async fn ensure_all_exist<R: Record>(store: &Store, ids: &[String]) -> ApiResult<()> {
    let found = store.find_by_ids::<R>(ids.iter().cloned()).await?;
    match ids.iter().find(|id| !found.contains_key(id.as_str())) {
        Some(missing) => Err(ApiError::NotFound(format!("{} {} not found", R::LABEL, missing))),
        None => Ok(()),
    }
}

/// Fails with Conflict when another record of `R` already uses `code` in
/// `field`. `current_id` is the record being updated, if any.
pub async fn ensure_code_available<R: Record>(
    store: &Store,
    field: &'static str,
    code: &str,
    current_id: Option<&str>,
) -> ApiResult<()> {
    let existing = store.find_first::<R>(Filter::new().eq(field, code)).await?;
    match existing {
        Some(r) if Some(r.id()) != current_id => Err(ApiError::code_taken(R::LABEL)),
        _ => Ok(()),
    }
}

/// Flips `is_active` and nothing else.
pub async fn toggle_active<R: ActiveFlag>(store: &Store, id: &str) -> ApiResult<R> {
    let mut record = ensure_exists::<R>(store, id).await?;
    let flag = record.active_mut();
    *flag = !*flag;
    store.update(&record).await?;
    info!(table = R::TABLE, id, "Toggled active flag");
    Ok(record)
}

/// Deletes a record, Not Found when it does not exist.
pub async fn delete_record<R: Record>(store: &Store, id: &str) -> ApiResult<()> {
    if store.delete::<R>(id).await? {
        info!(table = R::TABLE, id, "Deleted record");
        Ok(())
    } else {
        Err(ApiError::not_found(R::LABEL))
    }
}

/// Parses a case-insensitive enum query parameter.
pub fn parse_filter<E: FromStr>(name: &str, raw: &str) -> ApiResult<E> {
    E::from_str(raw.trim()).map_err(|_| ApiError::BadRequest(format!("Invalid {}: {}", name, raw)))
}

/// Values of an optional "all"-aware query parameter; `all` means no filter.
pub fn unless_all(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// Current time at the millisecond precision records are stored with.
pub fn now() -> chrono::DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::location::Location;
    use crate::model::project::ProjectStatus;

    fn location(id: &str, code: &str) -> Location {
        let now = now();
        Location {
            id: id.into(),
            branch_name: format!("Branch {}", code),
            branch_code: code.into(),
            address: None,
            city: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[actix_web::test]
    async fn code_check_ignores_the_record_itself() {
        let store = Store::in_memory();
        store.create(&location("a", "HO")).await.unwrap();

        assert!(ensure_code_available::<Location>(&store, "branch_code", "HO", Some("a")).await.is_ok());
        assert!(matches!(
            ensure_code_available::<Location>(&store, "branch_code", "HO", None).await,
            Err(ApiError::Conflict(_))
        ));
        assert!(ensure_code_available::<Location>(&store, "branch_code", "BR", None).await.is_ok());
    }

    #[actix_web::test]
    async fn all_exist_reports_the_missing_id() {
        let store = Store::in_memory();
        store.create(&location("a", "HO")).await.unwrap();

        assert!(ensure_all_exist::<Location>(&store, &["a".into()]).await.is_ok());
        match ensure_all_exist::<Location>(&store, &["a".into(), "zz".into()]).await {
            Err(ApiError::NotFound(msg)) => assert!(msg.contains("zz")),
            other => panic!("unexpected {:?}", other.err()),
        }
    }

    #[actix_web::test]
    async fn optional_reference_accepts_empty() {
        let store = Store::in_memory();
        assert!(ensure_optional::<Location>(&store, None).await.unwrap().is_none());
        assert!(ensure_optional::<Location>(&store, Some("")).await.unwrap().is_none());
        assert!(ensure_optional::<Location>(&store, Some("nope")).await.is_err());
    }

    #[actix_web::test]
    async fn toggle_flips_only_the_flag() {
        let store = Store::in_memory();
        let original = location("a", "HO");
        store.create(&original).await.unwrap();

        let toggled: Location = toggle_active(&store, "a").await.unwrap();
        assert!(!toggled.is_active);
        assert_eq!(toggled.branch_code, original.branch_code);
        assert_eq!(toggled.updated_at, original.updated_at);

        let back: Location = toggle_active(&store, "a").await.unwrap();
        assert!(back.is_active);
    }

    #[test]
    fn filters_parse_case_insensitively() {
        assert_eq!(parse_filter::<ProjectStatus>("status", "on_hold").unwrap(), ProjectStatus::OnHold);
        assert!(parse_filter::<ProjectStatus>("status", "bogus").is_err());
        assert_eq!(unless_all(Some("ALL")), None);
        assert_eq!(unless_all(Some("IN")), Some("IN"));
    }
}
