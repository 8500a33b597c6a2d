use tracing::info;

use crate::error::ApiResult;
use crate::model::leave_policy::{CreateLeavePolicy, LeavePolicy, UpdateLeavePolicy};
use crate::store::{Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_code_available, ensure_exists, now, toggle_active};

#[derive(Clone)]
pub struct LeavePolicyService {
    store: Store,
}

impl LeavePolicyService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateLeavePolicy) -> ApiResult<LeavePolicy> {
        ensure_code_available::<LeavePolicy>(&self.store, "policy_code", &dto.policy_code, None).await?;

        let now = now();
        let policy = LeavePolicy {
            id: new_id(),
            policy_name: dto.policy_name,
            policy_code: dto.policy_code,
            leave_type: dto.leave_type,
            days_per_year: dto.days_per_year,
            carry_forward_allowed: dto.carry_forward_allowed.unwrap_or(false),
            description: dto.description,
            is_active: dto.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.store.create(&policy).await?;

        info!(id = %policy.id, code = %policy.policy_code, "Leave policy created");
        Ok(policy)
    }

    pub async fn list(&self, is_active: Option<bool>) -> ApiResult<Vec<LeavePolicy>> {
        Ok(self
            .store
            .find_many(Query::new(Filter::new().eq_opt("is_active", is_active)).newest_first("created_at"))
            .await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<LeavePolicy> {
        ensure_exists(&self.store, id).await
    }

    pub async fn update(&self, id: &str, dto: UpdateLeavePolicy) -> ApiResult<LeavePolicy> {
        let current: LeavePolicy = ensure_exists(&self.store, id).await?;
        if let Some(code) = dto.policy_code.as_deref().filter(|c| *c != current.policy_code) {
            ensure_code_available::<LeavePolicy>(&self.store, "policy_code", code, Some(id)).await?;
        }

        let mut updated = apply_patch(&current, &dto)?;
        updated.updated_at = now();
        self.store.update(&updated).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<LeavePolicy>(&self.store, id).await
    }

    pub async fn toggle_active(&self, id: &str) -> ApiResult<LeavePolicy> {
        toggle_active(&self.store, id).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn annual(code: &str) -> CreateLeavePolicy {
        CreateLeavePolicy {
            policy_name: "Annual Leave".into(),
            policy_code: code.into(),
            leave_type: "ANNUAL".into(),
            days_per_year: 20,
            carry_forward_allowed: Some(true),
            description: None,
            is_active: None,
        }
    }

    #[actix_web::test]
    async fn toggle_keeps_other_fields() {
        let service = LeavePolicyService::new(Store::in_memory());
        let policy = service.create(annual("AL")).await.unwrap();
        let toggled = service.toggle_active(&policy.id).await.unwrap();

        assert!(!toggled.is_active);
        assert_eq!(toggled.days_per_year, 20);
        assert_eq!(toggled.updated_at, policy.updated_at);
    }
}
