use tracing::info;

use crate::error::ApiResult;
use crate::model::employee::EmployeeMaster;
use crate::model::salary_template::{
    CreateSalaryTemplate, SalaryTemplate, SalaryTemplateResponse, UpdateSalaryTemplate,
};
use crate::store::{Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_code_available, ensure_exists, now, toggle_active};

#[derive(Clone)]
pub struct SalaryTemplateService {
    store: Store,
}

impl SalaryTemplateService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateSalaryTemplate) -> ApiResult<SalaryTemplateResponse> {
        ensure_code_available::<SalaryTemplate>(&self.store, "template_code", &dto.template_code, None)
            .await?;

        let now = now();
        let template = SalaryTemplate {
            id: new_id(),
            template_name: dto.template_name,
            template_code: dto.template_code,
            template_type: dto.template_type,
            description: dto.description,
            components: dto.components,
            is_active: dto.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.store.create(&template).await?;

        info!(
            id = %template.id,
            code = %template.template_code,
            components = template.components.len(),
            "Salary template created"
        );
        Ok(SalaryTemplateResponse { template, employee_count: 0 })
    }

    pub async fn list(&self, is_active: Option<bool>) -> ApiResult<Vec<SalaryTemplateResponse>> {
        let templates: Vec<SalaryTemplate> = self
            .store
            .find_many(Query::new(Filter::new().eq_opt("is_active", is_active)).newest_first("created_at"))
            .await?;

        let ids: Vec<String> = templates.iter().map(|t| t.id.clone()).collect();
        let employees: Vec<EmployeeMaster> = self
            .store
            .find_many(Query::new(Filter::new().is_in("salary_template_id", ids)))
            .await?;

        Ok(templates
            .into_iter()
            .map(|template| {
                let employee_count = employees
                    .iter()
                    .filter(|e| e.salary_template_id.as_deref() == Some(template.id.as_str()))
                    .count() as u64;
                SalaryTemplateResponse { template, employee_count }
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> ApiResult<SalaryTemplateResponse> {
        let template: SalaryTemplate = ensure_exists(&self.store, id).await?;
        self.respond(template).await
    }

    pub async fn update(&self, id: &str, dto: UpdateSalaryTemplate) -> ApiResult<SalaryTemplateResponse> {
        let current: SalaryTemplate = ensure_exists(&self.store, id).await?;
        if let Some(code) = dto.template_code.as_deref().filter(|c| *c != current.template_code) {
            ensure_code_available::<SalaryTemplate>(&self.store, "template_code", code, Some(id)).await?;
        }

        let mut updated = apply_patch(&current, &dto)?;
        updated.updated_at = now();
        self.store.update(&updated).await?;
        self.respond(updated).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<SalaryTemplate>(&self.store, id).await
    }

    pub async fn toggle_active(&self, id: &str) -> ApiResult<SalaryTemplate> {
        toggle_active(&self.store, id).await
    }

    async fn respond(&self, template: SalaryTemplate) -> ApiResult<SalaryTemplateResponse> {
        let employee_count = self
            .store
            .count::<EmployeeMaster>(Filter::new().eq("salary_template_id", template.id.as_str()))
            .await?;
        Ok(SalaryTemplateResponse { template, employee_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::model::salary_template::{CalculationType, ComponentType, ComponentValue, SalaryComponent};
    use crate::service::employee::{EmployeeService, tests::new_employee};

    fn dto(code: &str) -> CreateSalaryTemplate {
        CreateSalaryTemplate {
            template_name: "Staff".into(),
            template_code: code.into(),
            template_type: "monthly".into(),
            description: "Default staff structure".into(),
            components: vec![SalaryComponent {
                name: "Basic".into(),
                component_type: ComponentType::Earning,
                calculation_type: CalculationType::PercentageOfCtc,
                value: Some(ComponentValue::Number(50.0)),
                is_taxable: None,
                is_active: None,
            }],
            is_active: None,
        }
    }

    #[actix_web::test]
    async fn duplicate_code_conflicts_and_existing_unchanged() {
        let service = SalaryTemplateService::new(Store::in_memory());
        let first = service.create(dto("STD")).await.unwrap();

        let mut second = dto("STD");
        second.template_name = "Other".into();
        assert!(matches!(service.create(second).await, Err(ApiError::Conflict(_))));

        let stored = service.get(&first.template.id).await.unwrap();
        assert_eq!(stored.template.template_name, "Staff");
    }

    #[actix_web::test]
    async fn employee_count_reflects_references() {
        let store = Store::in_memory();
        let service = SalaryTemplateService::new(store.clone());
        let template = service.create(dto("STD")).await.unwrap().template;

        let employees = EmployeeService::new(store);
        let mut a = new_employee("Ann", "Lee", None);
        a.salary_template_id = Some(template.id.clone());
        employees.create(a).await.unwrap();
        employees.create(new_employee("Bo", "Ray", None)).await.unwrap();

        assert_eq!(service.get(&template.id).await.unwrap().employee_count, 1);
        assert_eq!(service.list(Some(true)).await.unwrap()[0].employee_count, 1);
    }

    #[actix_web::test]
    async fn components_replace_on_update() {
        let service = SalaryTemplateService::new(Store::in_memory());
        let created = service.create(dto("STD")).await.unwrap().template;

        let updated = service
            .update(
                &created.id,
                UpdateSalaryTemplate { components: Some(vec![]), ..Default::default() },
            )
            .await
            .unwrap();
        assert!(updated.template.components.is_empty());
        assert_eq!(updated.template.template_code, "STD");
    }
}
