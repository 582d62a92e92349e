use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier wrapper for customer applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub u64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(pub u64);

/// Service offerings an application can be lodged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Nbn,
    Opticomm,
    Mobile,
}

impl PlanType {
    pub const fn label(self) -> &'static str {
        match self {
            PlanType::Nbn => "nbn",
            PlanType::Opticomm => "opticomm",
            PlanType::Mobile => "mobile",
        }
    }
}

impl FromStr for PlanType {
    type Err = UnknownPlanType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nbn" => Ok(Self::Nbn),
            "opticomm" => Ok(Self::Opticomm),
            "mobile" => Ok(Self::Mobile),
            _ => Err(UnknownPlanType {
                value: value.to_string(),
            }),
        }
    }
}

/// Rejection raised when a plan-type filter value is not one of the
/// supported offerings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown plan type '{value}', expected one of nbn, opticomm, mobile")]
pub struct UnknownPlanType {
    pub value: String,
}

/// Lifecycle status tracked for each application. `Order` marks an
/// application waiting for the automated NBN order; `Complete` and
/// `OrderFailed` are the terminal outcomes of that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Order,
    Complete,
    OrderFailed,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Order => "order",
            ApplicationStatus::Complete => "complete",
            ApplicationStatus::OrderFailed => "order_failed",
        }
    }
}

/// Read-only customer reference data joined into the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Immutable plan reference data. `monthly_cost` is in integer cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub plan_type: PlanType,
    pub name: String,
    pub monthly_cost: u32,
}

/// A customer's request for telecom service. Created outside this
/// workflow; the order placer is the only mutation path here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub customer_id: CustomerId,
    pub plan_id: PlanId,
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub status: ApplicationStatus,
    pub order_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
