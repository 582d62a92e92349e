use chrono::{TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use telco_admin::workflows::applications::{
    Application, ApplicationDetail, ApplicationId, ApplicationRepository, ApplicationStatus,
    Customer, CustomerId, OrderOutcome, Page, PageRequest, Plan, PlanId, PlanType, RepositoryError,
    PAGE_SIZE,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Hash-map backed repository standing in for the relational schema:
/// applications carry foreign keys into the customer and plan tables.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    customers: Arc<Mutex<HashMap<CustomerId, Customer>>>,
    plans: Arc<Mutex<HashMap<PlanId, Plan>>>,
    applications: Arc<Mutex<Vec<Application>>>,
}

impl InMemoryApplicationRepository {
    pub(crate) fn insert_customer(&self, customer: Customer) {
        let mut customers = self.customers.lock().expect("customer mutex poisoned");
        customers.insert(customer.id, customer);
    }

    pub(crate) fn insert_plan(&self, plan: Plan) {
        let mut plans = self.plans.lock().expect("plan mutex poisoned");
        plans.insert(plan.id, plan);
    }

    pub(crate) fn insert_application(&self, application: Application) {
        let mut applications = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        applications.push(application);
    }

    fn join(&self, application: &Application) -> Result<ApplicationDetail, RepositoryError> {
        let customers = self.customers.lock().expect("customer mutex poisoned");
        let customer = customers
            .get(&application.customer_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::Unavailable(format!(
                    "application {} references a missing customer",
                    application.id
                ))
            })?;
        let plans = self.plans.lock().expect("plan mutex poisoned");
        let plan = plans.get(&application.plan_id).cloned().ok_or_else(|| {
            RepositoryError::Unavailable(format!(
                "application {} references a missing plan",
                application.id
            ))
        })?;
        Ok(ApplicationDetail {
            application: application.clone(),
            customer,
            plan,
        })
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn list(
        &self,
        filter: Option<PlanType>,
        page: PageRequest,
    ) -> Result<Page<ApplicationDetail>, RepositoryError> {
        let applications = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        let mut rows = Vec::with_capacity(applications.len());
        for application in applications.iter() {
            rows.push(self.join(application)?);
        }
        drop(applications);

        if let Some(plan_type) = filter {
            rows.retain(|row| row.plan.plan_type == plan_type);
        }
        rows.sort_by_key(|row| row.application.created_at);

        let total = rows.len() as u64;
        let start = (u64::from(page.number.saturating_sub(1)) * u64::from(PAGE_SIZE)).min(total);
        let data = rows
            .into_iter()
            .skip(start as usize)
            .take(PAGE_SIZE as usize)
            .collect();
        Ok(Page::new(data, page.number, PAGE_SIZE, total))
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationDetail>, RepositoryError> {
        let applications = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        let application = match applications.iter().find(|row| row.id == *id) {
            Some(application) => application.clone(),
            None => return Ok(None),
        };
        drop(applications);
        Ok(Some(self.join(&application)?))
    }

    // Lock order is applications then customers then plans, everywhere;
    // `list` holds applications while `join` takes the other two.
    fn ready_for_order(&self) -> Result<Vec<ApplicationId>, RepositoryError> {
        let applications = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        let plans = self.plans.lock().expect("plan mutex poisoned");
        Ok(applications
            .iter()
            .filter(|application| {
                application.status == ApplicationStatus::Order
                    && plans
                        .get(&application.plan_id)
                        .map_or(false, |plan| plan.plan_type == PlanType::Nbn)
            })
            .map(|application| application.id)
            .collect())
    }

    fn record_outcome(
        &self,
        id: &ApplicationId,
        outcome: OrderOutcome,
    ) -> Result<(), RepositoryError> {
        let mut applications = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        let application = applications
            .iter_mut()
            .find(|row| row.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        match outcome {
            OrderOutcome::Completed { order_id } => {
                application.status = ApplicationStatus::Complete;
                application.order_id = Some(order_id);
            }
            OrderOutcome::Failed => {
                application.status = ApplicationStatus::OrderFailed;
                application.order_id = None;
            }
        }
        Ok(())
    }
}

/// Seed a small fleet of customers, plans, and applications so the demo
/// and a locally served instance have something to show.
pub(crate) fn seed_sample_data(repository: &InMemoryApplicationRepository) {
    let plans = [
        Plan {
            id: PlanId(1),
            plan_type: PlanType::Nbn,
            name: "NBN Fast 100".to_string(),
            monthly_cost: 7900,
        },
        Plan {
            id: PlanId(2),
            plan_type: PlanType::Opticomm,
            name: "Opticomm Home".to_string(),
            monthly_cost: 8500,
        },
        Plan {
            id: PlanId(3),
            plan_type: PlanType::Mobile,
            name: "Mobile 40GB".to_string(),
            monthly_cost: 2900,
        },
    ];
    for plan in plans {
        repository.insert_plan(plan);
    }

    let people = [
        (1, "John", "Doe"),
        (2, "Jane", "Citizen"),
        (3, "Sam", "Nguyen"),
        (4, "Priya", "Sharma"),
    ];
    for (id, first_name, last_name) in people {
        repository.insert_customer(Customer {
            id: CustomerId(id),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        });
    }

    let rows = [
        (1, 1, 1, "12 Wattle St", ApplicationStatus::Order),
        (2, 2, 1, "87 Banksia Ave", ApplicationStatus::Order),
        (3, 3, 2, "5 Harbour Rd", ApplicationStatus::Order),
        (4, 4, 3, "220 Collins St", ApplicationStatus::Pending),
        (5, 1, 1, "9 Acacia Ct", ApplicationStatus::Pending),
    ];
    for (minute, (id, customer_id, plan_id, address_1, status)) in rows.into_iter().enumerate() {
        repository.insert_application(Application {
            id: ApplicationId(id),
            customer_id: CustomerId(customer_id),
            plan_id: PlanId(plan_id),
            address_1: address_1.to_string(),
            address_2: "Unit 1".to_string(),
            city: "Melbourne".to_string(),
            state: "VIC".to_string(),
            postcode: "3000".to_string(),
            status,
            order_id: None,
            created_at: Utc
                .with_ymd_and_hms(2026, 3, 1, 9, minute as u32, 0)
                .single()
                .expect("valid timestamp"),
        });
    }
}
