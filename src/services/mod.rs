// Business logic services

pub mod agent_client;
pub mod errors;
pub mod health_calculations;
pub mod plan_assembler;
pub mod plan_service;
pub mod profile_service;
pub mod prompts;
pub mod response_decoder;

pub use agent_client::AgentClient;
pub use errors::PlanError;
pub use plan_service::PlanService;
pub use profile_service::ProfileService;
