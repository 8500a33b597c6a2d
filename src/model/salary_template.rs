use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    Earning,
    Deduction,
    Contribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationType {
    PercentageOfCtc,
    PercentageOfBasic,
    FixedAmount,
    BalancingAmount,
    SlabBased,
    AsPerState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Taxable {
    Yes,
    No,
    Partially,
}

/// A percentage or amount, or a text marker such as `"Auto"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ComponentValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SalaryComponent {
    #[validate(length(min = 1, message = "component name is required"))]
    #[schema(example = "Basic")]
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub calculation_type: CalculationType,
    pub value: Option<ComponentValue>,
    pub is_taxable: Option<Taxable>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalaryTemplate {
    pub id: String,
    #[schema(example = "Standard Staff")]
    pub template_name: String,
    #[schema(example = "STD-01")]
    pub template_code: String,
    #[schema(example = "monthly")]
    pub template_type: String,
    pub description: String,
    pub components: Vec<SalaryComponent>,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(SalaryTemplate, "salary_templates", "Salary template", active);

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateSalaryTemplate {
    #[validate(length(min = 1, message = "template_name is required"))]
    pub template_name: String,
    #[validate(length(min = 1, max = 64, message = "template_code must be 1-64 characters"))]
    pub template_code: String,
    #[validate(length(min = 1, message = "template_type is required"))]
    pub template_type: String,
    pub description: String,
    #[validate(nested)]
    pub components: Vec<SalaryComponent>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateSalaryTemplate {
    #[validate(length(min = 1))]
    pub template_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub template_code: Option<String>,
    #[validate(length(min = 1))]
    pub template_type: Option<String>,
    pub description: Option<String>,
    #[validate(nested)]
    pub components: Option<Vec<SalaryComponent>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SalaryTemplateResponse {
    #[serde(flatten)]
    pub template: SalaryTemplate,
    /// Employees whose master record references this template.
    pub employee_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn component_value_accepts_number_or_text() {
        let c: SalaryComponent = serde_json::from_value(json!({
            "name": "HRA",
            "type": "earning",
            "calculation_type": "percentage-of-basic",
            "value": 40,
            "is_taxable": "partially"
        }))
        .unwrap();
        assert_eq!(c.value, Some(ComponentValue::Number(40.0)));
        assert_eq!(c.calculation_type, CalculationType::PercentageOfBasic);

        let c: SalaryComponent = serde_json::from_value(json!({
            "name": "PT",
            "type": "deduction",
            "calculation_type": "as-per-state",
            "value": "As per state"
        }))
        .unwrap();
        assert_eq!(c.value, Some(ComponentValue::Text("As per state".into())));
    }

    #[test]
    fn unknown_component_type_is_rejected() {
        let parsed = serde_json::from_value::<SalaryComponent>(json!({
            "name": "Bonus",
            "type": "perk",
            "calculation_type": "fixed-amount"
        }));
        assert!(parsed.is_err());
    }
}
