//! Budget Domain
//!
//! Compares the monthly and yearly cost of running a small company's IT on
//! owned servers, rented rack space and public cloud.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ ScenarioBuilder  │  ← as_is / minimal_cloud / hybrid
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐   ┌──────────────────┐
//! │   Cost engine    │ ← │ TariffLookup     │  ← PricingCatalog or any source
//! └────────┬─────────┘   └──────────────────┘
//!          │
//! ┌────────▼─────────┐
//! │     Models       │  ← InfraSpec, workloads, deployment, licenses
//! └──────────────────┘
//! ```
//!
//! Inputs come from YAML (see [`loader`]); the cost constants live in
//! [`CostPolicy`].

pub mod capacity;
pub mod config;
pub mod drafter;
pub mod engine;
pub mod error;
pub mod loader;
pub mod migration;
pub mod models;
pub mod pricing;
pub mod samples;
pub mod scenario;
pub mod schema;

// Re-export commonly used types
pub use capacity::{CapacityReductionPolicy, CapacityShift, ProportionalVcpu, RetainOnPrem};
pub use config::{CapacityStrategy, CostPolicy, UnpricedMigration};
pub use drafter::{InfraDrafter, KeywordDrafter};
pub use error::{BudgetError, BudgetResult};
pub use loader::{
    infra_spec_from_str, infra_spec_to_yaml, parse_infra_spec, parse_pricing_catalog,
    pricing_catalog_from_str,
};
pub use migration::MigrationRule;
pub use models::{
    Availability, BackupSpec, CloudUsage, ColocationUnit, CompanyProfile, CurrentDeployment,
    InfraSpec, IopsProfile, License, LicenseMetric, OnPremServer, Workload, WorkloadType,
};
pub use pricing::{CloudProfile, ColocationTariff, ElectricityTariff, PricingCatalog, TariffLookup};
pub use scenario::{
    CostBreakdown, CostCategory, MigrationSummary, MissingTariff, ScenarioBuilder, ScenarioCost,
    ScenarioKind, TariffKind,
};
pub use schema::{SchemaFormat, SchemaTarget};
