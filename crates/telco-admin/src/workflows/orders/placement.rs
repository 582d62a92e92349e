use std::sync::Arc;

use super::gateway::{GatewayError, OrderGateway, OrderRequest, OrderResponse};
use crate::workflows::applications::domain::ApplicationId;
use crate::workflows::applications::repository::{
    ApplicationDetail, ApplicationRepository, OrderOutcome, RepositoryError,
};

/// Places the NBN order for a single application and records the
/// terminal outcome on its row.
pub struct NbnOrderService<R, G: ?Sized> {
    repository: Arc<R>,
    gateway: Arc<G>,
}

impl<R, G> NbnOrderService<R, G>
where
    R: ApplicationRepository + 'static,
    G: OrderGateway + ?Sized + 'static,
{
    pub fn new(repository: Arc<R>, gateway: Arc<G>) -> Self {
        Self {
            repository,
            gateway,
        }
    }

    /// Validate the application fields, call the provider, and persist
    /// the outcome. Validation and transport failures propagate to the
    /// job runner without touching the application row.
    pub async fn place_order(&self, id: &ApplicationId) -> Result<OrderOutcome, OrderError> {
        let detail = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        let request = order_request(&detail)?;
        let response = self.gateway.place(&request).await?;

        let outcome = order_outcome(response);
        self.repository.record_outcome(id, outcome.clone())?;
        Ok(outcome)
    }
}

/// Build the provider payload, rejecting applications with blank fields.
fn order_request(detail: &ApplicationDetail) -> Result<OrderRequest, MissingFieldError> {
    let application = &detail.application;
    Ok(OrderRequest {
        address_1: required(&application.address_1, "address_1")?,
        address_2: required(&application.address_2, "address_2")?,
        city: required(&application.city, "city")?,
        state: required(&application.state, "state")?,
        postcode: required(&application.postcode, "postcode")?,
        plan_name: required(&detail.plan.name, "plan_name")?,
    })
}

fn required(value: &str, field: &'static str) -> Result<String, MissingFieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MissingFieldError { field });
    }
    Ok(trimmed.to_string())
}

/// Only a confirmed response carrying an order id completes the order;
/// everything else, including "Successful" without an id, is a failed
/// order so a Complete row always holds an order id.
fn order_outcome(response: OrderResponse) -> OrderOutcome {
    match (response.is_successful(), response.id) {
        (true, Some(order_id)) => OrderOutcome::Completed { order_id },
        _ => OrderOutcome::Failed,
    }
}

/// A required application field was missing or blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("the {field} field is required")]
pub struct MissingFieldError {
    pub field: &'static str,
}

/// Error raised by the order placement service.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] MissingFieldError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
