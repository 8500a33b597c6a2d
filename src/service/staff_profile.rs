use tracing::info;

use crate::error::ApiResult;
use crate::model::employee::EmployeeMaster;
use crate::model::staff_profile::StaffProfile;
use crate::store::{Filter, Store, StoreError, new_id};

use super::guards::{ensure_exists, now};

#[derive(Clone)]
pub struct StaffProfileService {
    store: Store,
}

impl StaffProfileService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Returns the staff profile projected from `master`, creating it on
    /// first use. Matched by employee code; idempotent.
    pub async fn ensure_for_master(&self, master: &EmployeeMaster) -> ApiResult<StaffProfile> {
        if let Some(existing) = self.find_by_code(&master.employee_code).await? {
            return Ok(existing);
        }

        let profile = StaffProfile::project(master, new_id(), now());
        match self.store.create(&profile).await {
            Ok(()) => {
                info!(
                    staff_profile_id = %profile.id,
                    employee_code = %profile.employee_code,
                    "Staff profile projected from employee master"
                );
                Ok(profile)
            }
            // Lost a race with a concurrent projection; use the winner.
            Err(StoreError::Conflict(_)) => match self.find_by_code(&master.employee_code).await? {
                Some(existing) => Ok(existing),
                None => Err(StoreError::Conflict("uq_staff_profiles_code".into()).into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    pub async fn ensure_for_master_id(&self, master_id: &str) -> ApiResult<StaffProfile> {
        let master: EmployeeMaster = ensure_exists(&self.store, master_id).await?;
        self.ensure_for_master(&master).await
    }

    async fn find_by_code(&self, code: &str) -> ApiResult<Option<StaffProfile>> {
        Ok(self
            .store
            .find_first(Filter::new().eq("employee_code", code))
            .await?)
    }
}
