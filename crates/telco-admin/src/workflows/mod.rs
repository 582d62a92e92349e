//! Workflow modules: the customer application catalogue and the NBN
//! order automation pipeline built on top of it.

pub mod applications;
pub mod orders;
