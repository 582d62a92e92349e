use std::sync::Arc;

use serde::Serialize;

use super::domain::{ApplicationId, ApplicationStatus, PlanType};
use super::repository::{
    ApplicationDetail, ApplicationRepository, Page, PageRequest, RepositoryError,
};

/// Read-side service projecting applications for the admin console.
pub struct ApplicationListService<R> {
    repository: Arc<R>,
}

impl<R> ApplicationListService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// List applications joined with customer and plan data, oldest
    /// first, projected to the display shape.
    pub fn list(
        &self,
        filter: Option<PlanType>,
        page: PageRequest,
    ) -> Result<Page<ApplicationSummary>, RepositoryError> {
        let page = self.repository.list(filter, page)?;
        Ok(page.map(ApplicationSummary::from_detail))
    }
}

/// Display projection returned by `GET /api/applications`. `order_id`
/// appears only for completed applications that hold a provider order id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationSummary {
    pub id: ApplicationId,
    pub customer_full_name: String,
    pub address: String,
    pub plan_type: PlanType,
    pub plan_name: String,
    pub state: String,
    pub plan_monthly_cost: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

impl ApplicationSummary {
    pub fn from_detail(detail: ApplicationDetail) -> Self {
        let ApplicationDetail {
            application,
            customer,
            plan,
        } = detail;

        let order_id = match (application.status, application.order_id) {
            (ApplicationStatus::Complete, Some(order_id)) => Some(order_id),
            _ => None,
        };

        Self {
            id: application.id,
            customer_full_name: customer.full_name(),
            address: application.address_1,
            plan_type: plan.plan_type,
            plan_name: plan.name,
            state: application.state,
            plan_monthly_cost: format_monthly_cost(plan.monthly_cost),
            order_id,
        }
    }
}

/// Render a cost in cents as a dollar string with thousands separators,
/// e.g. 104999 -> "1,049.99".
pub fn format_monthly_cost(cents: u32) -> String {
    format!("{}.{:02}", group_thousands(cents / 100), cents % 100)
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
