use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::workflows::applications::domain::{
    Application, ApplicationId, ApplicationStatus, Customer, CustomerId, Plan, PlanId, PlanType,
};
use crate::workflows::applications::listing::ApplicationListService;
use crate::workflows::applications::repository::{
    ApplicationDetail, ApplicationRepository, OrderOutcome, Page, PageRequest, RepositoryError,
    PAGE_SIZE,
};
use crate::workflows::applications::router::ApplicationRouterState;
use crate::workflows::orders::queue::{OrderDispatcher, OrderJob, OrderJobQueue, QueueError};

pub(super) fn customer(id: u64, first_name: &str, last_name: &str) -> Customer {
    Customer {
        id: CustomerId(id),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

pub(super) fn plan(id: u64, plan_type: PlanType, name: &str, monthly_cost: u32) -> Plan {
    Plan {
        id: PlanId(id),
        plan_type,
        name: name.to_string(),
        monthly_cost,
    }
}

/// Application created at 09:{minute} so tests can control listing order.
pub(super) fn application(
    id: u64,
    customer: &Customer,
    plan: &Plan,
    status: ApplicationStatus,
    minute: u32,
) -> Application {
    Application {
        id: ApplicationId(id),
        customer_id: customer.id,
        plan_id: plan.id,
        address_1: "123 Main St".to_string(),
        address_2: "Apt 4".to_string(),
        city: "Melbourne".to_string(),
        state: "VIC".to_string(),
        postcode: "3000".to_string(),
        status,
        order_id: None,
        created_at: Utc
            .with_ymd_and_hms(2026, 3, 1, 9, minute, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn nbn_detail(id: u64, status: ApplicationStatus, minute: u32) -> ApplicationDetail {
    let customer = customer(id, "John", "Doe");
    let plan = plan(1, PlanType::Nbn, "NBN Plan", 4999);
    let application = application(id, &customer, &plan, status, minute);
    ApplicationDetail {
        application,
        customer,
        plan,
    }
}

pub(super) fn mobile_detail(id: u64, status: ApplicationStatus, minute: u32) -> ApplicationDetail {
    let customer = customer(id, "Jane", "Citizen");
    let plan = plan(2, PlanType::Mobile, "Mobile Plan", 2900);
    let application = application(id, &customer, &plan, status, minute);
    ApplicationDetail {
        application,
        customer,
        plan,
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

pub(super) fn router_state(
    repository: Arc<MemoryRepository>,
    queue: Arc<RecordingQueue>,
) -> Arc<ApplicationRouterState<MemoryRepository, RecordingQueue>> {
    Arc::new(ApplicationRouterState {
        listing: ApplicationListService::new(repository.clone()),
        dispatcher: OrderDispatcher::new(repository, queue),
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
