use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::workflows::applications::domain::{
    Application, ApplicationId, ApplicationStatus, Customer, CustomerId, Plan, PlanId, PlanType,
};
use crate::workflows::applications::repository::{
    ApplicationDetail, ApplicationRepository, OrderOutcome, Page, PageRequest, RepositoryError,
    PAGE_SIZE,
};
use crate::workflows::orders::gateway::{GatewayError, OrderGateway, OrderRequest, OrderResponse};
use crate::workflows::orders::queue::{OrderJob, OrderJobQueue, QueueError};

/// Application in `order` status on an NBN plan with every field filled
/// in, ready for a successful placement.
pub(super) fn order_ready_detail(id: u64) -> ApplicationDetail {
    let customer = Customer {
        id: CustomerId(id),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
    };
    let plan = Plan {
        id: PlanId(1),
        plan_type: PlanType::Nbn,
        name: "Sample Plan".to_string(),
        monthly_cost: 7900,
    };
    let application = Application {
        id: ApplicationId(id),
        customer_id: customer.id,
        plan_id: plan.id,
        address_1: "123 Main St".to_string(),
        address_2: "Apt 4".to_string(),
        city: "Sydney".to_string(),
        state: "NSW".to_string(),
        postcode: "2000".to_string(),
        status: ApplicationStatus::Order,
        order_id: None,
        created_at: Utc
            .with_ymd_and_hms(2026, 3, 1, 9, id as u32 % 60, 0)
            .single()
            .expect("valid timestamp"),
    };
    ApplicationDetail {
        application,
        customer,
        plan,
    }
}

pub(super) fn mobile_order_detail(id: u64) -> ApplicationDetail {
    let mut detail = order_ready_detail(id);
    detail.plan.plan_type = PlanType::Mobile;
    detail.plan.name = "Mobile Plan".to_string();
    detail
}

pub(super) fn successful_response() -> OrderResponse {
    OrderResponse {
        status: OrderResponse::SUCCESSFUL.to_string(),
        id: Some("ORD000000000000".to_string()),
    }
}

pub(super) fn failed_response() -> OrderResponse {
    OrderResponse {
        status: "Failed".to_string(),
        id: None,
    }
}

pub(super) fn sample_request() -> OrderRequest {
    OrderRequest {
        address_1: "123 Main St".to_string(),
        address_2: "Apt 4".to_string(),
        city: "Sydney".to_string(),
        state: "NSW".to_string(),
        postcode: "2000".to_string(),
        plan_name: "Sample Plan".to_string(),
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) rows: Mutex<Vec<ApplicationDetail>>,
}

impl MemoryRepository {
    pub(super) fn with_rows(rows: Vec<ApplicationDetail>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
        })
    }

    pub(super) fn application(&self, id: u64) -> Application {
        let rows = self.rows.lock().expect("repository mutex poisoned");
        rows.iter()
            .find(|row| row.application.id == ApplicationId(id))
            .map(|row| row.application.clone())
            .expect("application present")
    }
}

impl ApplicationRepository for MemoryRepository {
    fn list(
        &self,
        filter: Option<PlanType>,
        page: PageRequest,
    ) -> Result<Page<ApplicationDetail>, RepositoryError> {
        let rows = self.rows.lock().expect("repository mutex poisoned");
        let mut matching: Vec<ApplicationDetail> = rows
            .iter()
            .filter(|row| filter.map_or(true, |plan_type| row.plan.plan_type == plan_type))
            .cloned()
            .collect();
        matching.sort_by_key(|row| row.application.created_at);

        let total = matching.len() as u64;
        let start = (u64::from(page.number.saturating_sub(1)) * u64::from(PAGE_SIZE)).min(total);
        let data = matching
            .into_iter()
            .skip(start as usize)
            .take(PAGE_SIZE as usize)
            .collect();
        Ok(Page::new(data, page.number, PAGE_SIZE, total))
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationDetail>, RepositoryError> {
        let rows = self.rows.lock().expect("repository mutex poisoned");
        Ok(rows.iter().find(|row| row.application.id == *id).cloned())
    }

    fn ready_for_order(&self) -> Result<Vec<ApplicationId>, RepositoryError> {
        let rows = self.rows.lock().expect("repository mutex poisoned");
        Ok(rows
            .iter()
            .filter(|row| {
                row.application.status == ApplicationStatus::Order
                    && row.plan.plan_type == PlanType::Nbn
            })
            .map(|row| row.application.id)
            .collect())
    }

    fn record_outcome(
        &self,
        id: &ApplicationId,
        outcome: OrderOutcome,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("repository mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.application.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        match outcome {
            OrderOutcome::Completed { order_id } => {
                row.application.status = ApplicationStatus::Complete;
                row.application.order_id = Some(order_id);
            }
            OrderOutcome::Failed => {
                row.application.status = ApplicationStatus::OrderFailed;
                row.application.order_id = None;
            }
        }
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn list(
        &self,
        _filter: Option<PlanType>,
        _page: PageRequest,
    ) -> Result<Page<ApplicationDetail>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationDetail>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn ready_for_order(&self) -> Result<Vec<ApplicationId>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_outcome(
        &self,
        _id: &ApplicationId,
        _outcome: OrderOutcome,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Gateway returning the same canned response for every request.
pub(super) struct StaticGateway {
    pub(super) response: OrderResponse,
}

#[async_trait]
impl OrderGateway for StaticGateway {
    async fn place(&self, _request: &OrderRequest) -> Result<OrderResponse, GatewayError> {
        Ok(self.response.clone())
    }
}

#[derive(Default)]
pub(super) struct RecordingQueue {
    jobs: Mutex<Vec<OrderJob>>,
}

impl RecordingQueue {
    pub(super) fn jobs(&self) -> Vec<OrderJob> {
        self.jobs.lock().expect("queue mutex poisoned").clone()
    }
}

impl OrderJobQueue for RecordingQueue {
    fn enqueue(&self, job: OrderJob) -> Result<(), QueueError> {
        self.jobs.lock().expect("queue mutex poisoned").push(job);
        Ok(())
    }
}
