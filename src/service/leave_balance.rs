use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::model::employee::EmployeeMaster;
use crate::model::leave_balance::{
    CreateLeaveBalance, LeaveBalance, LeaveBalanceQuery, LeaveBalanceResponse, UpdateLeaveBalance,
};
use crate::model::leave_policy::LeavePolicy;
use crate::store::{Filter, Query, Store, StoreError, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_exists, now};

const DUPLICATE_PERIOD: &str = "Leave balance already exists for this employee, policy and year";

#[derive(Clone)]
pub struct LeaveBalanceService {
    store: Store,
}

impl LeaveBalanceService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateLeaveBalance) -> ApiResult<LeaveBalanceResponse> {
        ensure_exists::<EmployeeMaster>(&self.store, &dto.employee_master_id).await?;
        ensure_exists::<LeavePolicy>(&self.store, &dto.leave_policy_id).await?;

        let existing = self
            .store
            .find_first::<LeaveBalance>(
                Filter::new()
                    .eq("employee_master_id", dto.employee_master_id.as_str())
                    .eq("leave_policy_id", dto.leave_policy_id.as_str())
                    .eq("year", dto.year),
            )
            .await?;
        if existing.is_some() {
            return Err(ApiError::Conflict(DUPLICATE_PERIOD.into()));
        }

        let now = now();
        let balance = LeaveBalance {
            id: new_id(),
            employee_master_id: dto.employee_master_id,
            leave_policy_id: dto.leave_policy_id,
            year: dto.year,
            total_allocated: dto.total_allocated,
            used: dto.used.unwrap_or(0),
            carry_forward: dto.carry_forward.unwrap_or(0),
            created_at: now,
            updated_at: now,
        };
        self.store.create(&balance).await.map_err(|e| match e {
            StoreError::Conflict(_) => ApiError::Conflict(DUPLICATE_PERIOD.into()),
            other => other.into(),
        })?;

        info!(id = %balance.id, year = balance.year, "Leave balance allocated");
        Ok(balance.into())
    }

    pub async fn list(&self, query: LeaveBalanceQuery) -> ApiResult<Vec<LeaveBalanceResponse>> {
        let filter = Filter::new()
            .eq_opt("employee_master_id", query.employee_master_id.filter(|v| !v.is_empty()))
            .eq_opt("year", query.year);
        let balances: Vec<LeaveBalance> = self
            .store
            .find_many(Query::new(filter).newest_first("created_at"))
            .await?;
        Ok(balances.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: &str) -> ApiResult<LeaveBalanceResponse> {
        let balance: LeaveBalance = ensure_exists(&self.store, id).await?;
        Ok(balance.into())
    }

    pub async fn update(&self, id: &str, dto: UpdateLeaveBalance) -> ApiResult<LeaveBalanceResponse> {
        let current: LeaveBalance = ensure_exists(&self.store, id).await?;
        let mut updated = apply_patch(&current, &dto)?;
        updated.updated_at = now();
        self.store.update(&updated).await?;
        Ok(updated.into())
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<LeaveBalance>(&self.store, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::employee::{EmployeeService, tests::new_employee};
    use crate::service::leave_policy::{LeavePolicyService, tests::annual};

    async fn setup() -> (LeaveBalanceService, CreateLeaveBalance) {
        let store = Store::in_memory();
        let employee = EmployeeService::new(store.clone())
            .create(new_employee("Ann", "Lee", None))
            .await
            .unwrap()
            .employee;
        let policy = LeavePolicyService::new(store.clone()).create(annual("AL")).await.unwrap();
        let dto = CreateLeaveBalance {
            employee_master_id: employee.id,
            leave_policy_id: policy.id,
            year: 2025,
            total_allocated: 20,
            used: Some(4),
            carry_forward: Some(3),
        };
        (LeaveBalanceService::new(store), dto)
    }

    #[actix_web::test]
    async fn available_is_derived() {
        let (service, dto) = setup().await;
        let created = service.create(dto).await.unwrap();
        assert_eq!(created.available, 19);

        let updated = service
            .update(&created.balance.id, UpdateLeaveBalance { used: Some(10), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.available, 13);
    }

    #[actix_web::test]
    async fn one_balance_per_employee_policy_year() {
        let (service, dto) = setup().await;
        let again = CreateLeaveBalance { total_allocated: 5, used: None, carry_forward: None, ..dto.clone() };
        let next_year = CreateLeaveBalance { year: 2026, ..again.clone() };
        service.create(dto).await.unwrap();

        assert!(matches!(service.create(again).await, Err(ApiError::Conflict(_))));
        service.create(next_year).await.unwrap();

        let only_2026 = service
            .list(LeaveBalanceQuery { year: Some(2026), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(only_2026.len(), 1);
    }
}
