use crate::infra::{seed_sample_data, InMemoryApplicationRepository};
use clap::Args;
use std::sync::Arc;
use telco_admin::config::AppConfig;
use telco_admin::error::AppError;
use telco_admin::workflows::applications::{ApplicationListService, PageRequest};
use telco_admin::workflows::orders::{
    run_order_worker, FixtureOrderGateway, MpscOrderQueue, NbnOrderService, OrderDispatcher,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Fixture response file to replay (defaults to NBN_RESPONSE_FILE)
    #[arg(long)]
    pub(crate) response_file: Option<String>,
}

/// Seed sample applications, dispatch the eligible ones, drain the order
/// queue against the fixture gateway, and print the resulting listing.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(response_file) = args.response_file {
        config.nbn.response_file = response_file;
    }

    let repository = Arc::new(InMemoryApplicationRepository::default());
    seed_sample_data(&repository);

    let (queue, jobs) = MpscOrderQueue::channel();
    let dispatcher = OrderDispatcher::new(repository.clone(), Arc::new(queue));
    let queued = dispatcher.dispatch()?;
    println!(
        "queued {queued} nbn order jobs against {}",
        config.nbn.fixture_path().display()
    );

    // Dropping the dispatcher closes the channel so the worker exits
    // once the queued jobs are processed.
    drop(dispatcher);

    let gateway = Arc::new(FixtureOrderGateway::from_config(&config.nbn));
    let order_service = Arc::new(NbnOrderService::new(repository.clone(), gateway));
    run_order_worker(jobs, order_service).await;

    let listing = ApplicationListService::new(repository);
    let page = listing.list(None, PageRequest::default())?;

    println!("applications after processing:");
    for summary in &page.data {
        let order_id = summary.order_id.as_deref().unwrap_or("-");
        println!(
            "  #{} {} | {} {} | {} | ${}/mo | order: {order_id}",
            summary.id,
            summary.customer_full_name,
            summary.plan_type.label(),
            summary.plan_name,
            summary.state,
            summary.plan_monthly_cost,
        );
    }

    Ok(())
}
