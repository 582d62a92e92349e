//! NBN order automation: the provider gateway, the order placement
//! service, and the dispatch queue feeding the background worker.

pub mod gateway;
pub mod placement;
pub mod queue;

#[cfg(test)]
mod tests;

pub use gateway::{
    B2bOrderGateway, FixtureOrderGateway, GatewayError, OrderGateway, OrderRequest, OrderResponse,
};
pub use placement::{MissingFieldError, NbnOrderService, OrderError};
pub use queue::{
    run_order_worker, DispatchError, MpscOrderQueue, OrderDispatcher, OrderJob, OrderJobQueue,
    QueueError,
};
