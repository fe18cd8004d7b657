//! Named cost policy applied uniformly by every calculation path.

use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumString};
use validator::Validate;

use crate::capacity::{CapacityReductionPolicy, ProportionalVcpu, RetainOnPrem};

pub const DEFAULT_HOURS_PER_MONTH: u32 = 720;
pub const DEFAULT_AMORTIZATION_MONTHS: u32 = 36;
pub const DEFAULT_CLOUD_PROFILE: &str = "ru_cloud_gp";

/// What happens to an eligible workload when the migration cloud profile is
/// missing from the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UnpricedMigration {
    /// The workload stays on-prem: it is neither billed in the cloud nor
    /// counted toward the on-prem reduction.
    #[default]
    Exclude,
    /// Legacy behavior: its vCPUs still shrink on-prem costs although no cloud
    /// cost is added, which understates the scenario total.
    Reduce,
}

/// Built-in capacity reduction strategies selectable from configuration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CapacityStrategy {
    #[default]
    ProportionalVcpu,
    RetainOnPrem,
}

impl CapacityStrategy {
    pub fn policy(&self) -> Arc<dyn CapacityReductionPolicy> {
        match self {
            CapacityStrategy::ProportionalVcpu => Arc::new(ProportionalVcpu),
            CapacityStrategy::RetainOnPrem => Arc::new(RetainOnPrem),
        }
    }
}

/// Cost model constants.
///
/// Environment variables:
/// - `BUDGET_HOURS_PER_MONTH` (default 720)
/// - `BUDGET_AMORTIZATION_MONTHS` (default 36, `0` disables amortization)
/// - `BUDGET_DEFAULT_CLOUD_PROFILE` (default `ru_cloud_gp`)
/// - `BUDGET_MIGRATED_EGRESS_GB` (default 0)
/// - `BUDGET_UNPRICED_MIGRATION` (`exclude` | `reduce`, default `exclude`)
/// - `BUDGET_CAPACITY_STRATEGY` (`proportional_vcpu` | `retain_on_prem`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct CostPolicy {
    /// Metering hours for electricity and cloud compute
    #[validate(range(min = 1, max = 744))]
    pub hours_per_month: u32,
    /// Capex amortization horizon
    pub amortization_months: u32,
    /// Cloud profile used to price migrated workloads
    #[validate(length(min = 1))]
    pub default_cloud_profile: String,
    /// Assumed monthly egress per migrated workload
    pub migrated_egress_gb: u32,
    pub unpriced_migration: UnpricedMigration,
    pub capacity_strategy: CapacityStrategy,
}

impl Default for CostPolicy {
    fn default() -> Self {
        Self {
            hours_per_month: DEFAULT_HOURS_PER_MONTH,
            amortization_months: DEFAULT_AMORTIZATION_MONTHS,
            default_cloud_profile: DEFAULT_CLOUD_PROFILE.to_string(),
            migrated_egress_gb: 0,
            unpriced_migration: UnpricedMigration::default(),
            capacity_strategy: CapacityStrategy::default(),
        }
    }
}

impl FromEnv for CostPolicy {
    fn from_env() -> Result<Self, ConfigError> {
        let policy = Self {
            hours_per_month: env_parse("BUDGET_HOURS_PER_MONTH", DEFAULT_HOURS_PER_MONTH)?,
            amortization_months: env_parse(
                "BUDGET_AMORTIZATION_MONTHS",
                DEFAULT_AMORTIZATION_MONTHS,
            )?,
            default_cloud_profile: env_or_default(
                "BUDGET_DEFAULT_CLOUD_PROFILE",
                DEFAULT_CLOUD_PROFILE,
            ),
            migrated_egress_gb: env_parse("BUDGET_MIGRATED_EGRESS_GB", 0)?,
            unpriced_migration: env_parse(
                "BUDGET_UNPRICED_MIGRATION",
                UnpricedMigration::default(),
            )?,
            capacity_strategy: env_parse(
                "BUDGET_CAPACITY_STRATEGY",
                CapacityStrategy::default(),
            )?,
        };

        policy.ensure_valid()?;
        Ok(policy)
    }
}

impl CostPolicy {
    pub fn hours(&self) -> f64 {
        f64::from(self.hours_per_month)
    }

    /// Re-check field ranges, e.g. after command-line overrides
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 6] = [
        "BUDGET_HOURS_PER_MONTH",
        "BUDGET_AMORTIZATION_MONTHS",
        "BUDGET_DEFAULT_CLOUD_PROFILE",
        "BUDGET_MIGRATED_EGRESS_GB",
        "BUDGET_UNPRICED_MIGRATION",
        "BUDGET_CAPACITY_STRATEGY",
    ];

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars_unset(VARS, || {
            let policy = CostPolicy::from_env().unwrap();
            assert_eq!(policy, CostPolicy::default());
            assert_eq!(policy.hours_per_month, 720);
            assert_eq!(policy.amortization_months, 36);
            assert_eq!(policy.default_cloud_profile, "ru_cloud_gp");
            assert_eq!(policy.unpriced_migration, UnpricedMigration::Exclude);
            assert_eq!(policy.capacity_strategy, CapacityStrategy::ProportionalVcpu);
        });
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("BUDGET_HOURS_PER_MONTH", Some("730")),
                ("BUDGET_AMORTIZATION_MONTHS", Some("60")),
                ("BUDGET_DEFAULT_CLOUD_PROFILE", Some("yc_standard")),
                ("BUDGET_MIGRATED_EGRESS_GB", Some("100")),
                ("BUDGET_UNPRICED_MIGRATION", Some("reduce")),
                ("BUDGET_CAPACITY_STRATEGY", Some("retain_on_prem")),
            ],
            || {
                let policy = CostPolicy::from_env().unwrap();
                assert_eq!(policy.hours_per_month, 730);
                assert_eq!(policy.amortization_months, 60);
                assert_eq!(policy.default_cloud_profile, "yc_standard");
                assert_eq!(policy.migrated_egress_gb, 100);
                assert_eq!(policy.unpriced_migration, UnpricedMigration::Reduce);
                assert_eq!(policy.capacity_strategy, CapacityStrategy::RetainOnPrem);
            },
        );
    }

    #[test]
    fn test_from_env_rejects_unknown_strategy() {
        temp_env::with_var("BUDGET_UNPRICED_MIGRATION", Some("ignore"), || {
            let err = CostPolicy::from_env().unwrap_err();
            assert!(err.to_string().contains("BUDGET_UNPRICED_MIGRATION"));
        });
    }

    #[test]
    fn test_from_env_rejects_zero_hours() {
        temp_env::with_var("BUDGET_HOURS_PER_MONTH", Some("0"), || {
            let err = CostPolicy::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)));
        });
    }

    #[test]
    fn test_capacity_strategy_builds_named_policy() {
        assert_eq!(CapacityStrategy::ProportionalVcpu.policy().name(), "proportional_vcpu");
        assert_eq!(CapacityStrategy::RetainOnPrem.policy().name(), "retain_on_prem");
    }
}
