//! Command and result types for the domain services.
//!
//! Every service operation takes a command struct and returns a result
//! struct, keeping the request-handler layer free of positional-argument
//! plumbing. Mutating commands carry an explicit `acting_user_id`; the
//! permission check itself happens outside this core, but the acting user is
//! never ambient state.

pub mod allocation;
pub mod recurring_task;
pub mod task;
