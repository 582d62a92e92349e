use serde::Serialize;

use super::domain::{Application, ApplicationId, Customer, Plan, PlanType};

/// Page size used by the application listing.
pub const PAGE_SIZE: u32 = 10;

/// Joined application row handed to the listing and order services.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationDetail {
    pub application: Application,
    pub customer: Customer,
    pub plan: Plan,
}

/// Terminal result of a single order attempt. `Completed` carries the
/// provider order id; `Failed` leaves the order id unset, so the
/// order_id-iff-Complete invariant holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    Completed { order_id: String },
    Failed,
}

/// One-based page selector for the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { number: 1 }
    }
}

/// Length-aware page of results, serialized the way the admin console
/// paginator expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u32,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, current_page: u32, per_page: u32, total: u64) -> Self {
        let last_page = ((total.max(1) + u64::from(per_page) - 1) / u64::from(per_page)) as u32;
        Self {
            current_page,
            per_page,
            total,
            last_page,
            data,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

/// Storage seam so the listing and order services can be exercised
/// without a live database.
pub trait ApplicationRepository: Send + Sync {
    /// Joined applications ordered oldest-created first, optionally
    /// filtered by plan type.
    fn list(
        &self,
        filter: Option<PlanType>,
        page: PageRequest,
    ) -> Result<Page<ApplicationDetail>, RepositoryError>;

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationDetail>, RepositoryError>;

    /// Ids of applications in `order` status whose plan type is NBN.
    fn ready_for_order(&self) -> Result<Vec<ApplicationId>, RepositoryError>;

    /// Persist the outcome of one order attempt for one application.
    fn record_outcome(
        &self,
        id: &ApplicationId,
        outcome: OrderOutcome,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("application not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
