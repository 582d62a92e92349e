use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use super::gateway::OrderGateway;
use super::placement::NbnOrderService;
use crate::workflows::applications::domain::ApplicationId;
use crate::workflows::applications::repository::{ApplicationRepository, RepositoryError};

/// One queued unit of work: place the NBN order for one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderJob {
    pub application_id: ApplicationId,
}

/// Queue seam so dispatch can be asserted without a running worker.
pub trait OrderJobQueue: Send + Sync {
    fn enqueue(&self, job: OrderJob) -> Result<(), QueueError>;
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("order queue closed")]
    Closed,
}

/// tokio mpsc backed queue feeding the in-process order worker.
#[derive(Clone)]
pub struct MpscOrderQueue {
    sender: UnboundedSender<OrderJob>,
}

impl MpscOrderQueue {
    /// Build the queue with the receiver half the worker drains.
    pub fn channel() -> (Self, UnboundedReceiver<OrderJob>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl OrderJobQueue for MpscOrderQueue {
    fn enqueue(&self, job: OrderJob) -> Result<(), QueueError> {
        self.sender.send(job).map_err(|_| QueueError::Closed)
    }
}

/// Finds applications ready to order and queues one job per application.
pub struct OrderDispatcher<R, Q> {
    repository: Arc<R>,
    queue: Arc<Q>,
}

impl<R, Q> OrderDispatcher<R, Q>
where
    R: ApplicationRepository + 'static,
    Q: OrderJobQueue + 'static,
{
    pub fn new(repository: Arc<R>, queue: Arc<Q>) -> Self {
        Self { repository, queue }
    }

    /// Enqueue one order job per application in `order` status on an
    /// NBN plan, returning how many were queued.
    pub fn dispatch(&self) -> Result<usize, DispatchError> {
        let ids = self.repository.ready_for_order()?;
        let count = ids.len();
        for application_id in ids {
            self.queue.enqueue(OrderJob { application_id })?;
        }
        Ok(count)
    }
}

/// Error raised while queueing order jobs.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Drain the queue, placing one order per job. A failed job is logged
/// and the worker moves on; the loop ends once every sender is dropped.
pub async fn run_order_worker<R, G>(
    mut jobs: UnboundedReceiver<OrderJob>,
    service: Arc<NbnOrderService<R, G>>,
) where
    R: ApplicationRepository + 'static,
    G: OrderGateway + ?Sized + 'static,
{
    while let Some(job) = jobs.recv().await {
        match service.place_order(&job.application_id).await {
            Ok(outcome) => {
                info!(application_id = %job.application_id, ?outcome, "nbn order processed");
            }
            Err(err) => {
                error!(application_id = %job.application_id, error = %err, "nbn order job failed");
            }
        }
    }
}
