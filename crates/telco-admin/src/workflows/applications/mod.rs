//! Customer application catalogue: the domain model, the storage seam,
//! the listing projection, and the HTTP endpoints the admin console
//! consumes.

pub mod domain;
pub mod listing;
pub mod repository;
pub mod router;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, Customer, CustomerId, Plan, PlanId, PlanType,
    UnknownPlanType,
};
pub use listing::{format_monthly_cost, ApplicationListService, ApplicationSummary};
pub use repository::{
    ApplicationDetail, ApplicationRepository, OrderOutcome, Page, PageRequest, RepositoryError,
    PAGE_SIZE,
};
pub use router::{application_router, ApplicationRouterState, ListApplicationsQuery};
