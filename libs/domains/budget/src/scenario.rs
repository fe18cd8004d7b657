//! Scenario builder: evaluates the cost engine over a full infrastructure
//! description and produces the `as_is`, `minimal_cloud` and `hybrid`
//! scenarios.
//!
//! Every scenario is a pure function of `(InfraSpec, TariffLookup,
//! CostPolicy)`; call order is irrelevant and concurrent evaluation over the
//! same inputs yields identical results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::{debug, warn};

use crate::capacity::{CapacityReductionPolicy, CapacityShift, effective_factor};
use crate::config::{CostPolicy, UnpricedMigration};
use crate::engine::{
    CloudDemand, cloud_monthly, colocation_unit_monthly, excess_power_watts,
    on_prem_server_monthly,
};
use crate::migration::MigrationRule;
use crate::models::InfraSpec;
use crate::pricing::TariffLookup;

/// Named scenario
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScenarioKind {
    /// Current, unmigrated infrastructure
    AsIs,
    /// Stateless web workloads move to the cloud
    MinimalCloud,
    /// Everything without regulatory flags moves to the cloud
    Hybrid,
}

impl ScenarioKind {
    /// Eligibility rule of a migration scenario; `None` for `as_is`
    pub fn migration_rule(&self) -> Option<MigrationRule> {
        match self {
            ScenarioKind::AsIs => None,
            ScenarioKind::MinimalCloud => Some(MigrationRule::StatelessWeb),
            ScenarioKind::Hybrid => Some(MigrationRule::Unregulated),
        }
    }
}

/// Breakdown category
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CostCategory {
    HardwareAmortization,
    Electricity,
    Colocation,
    Cloud,
    Licenses,
}

impl CostCategory {
    /// Categories scaled down when capacity moves off-prem
    pub const ON_PREM: [CostCategory; 3] = [
        CostCategory::HardwareAmortization,
        CostCategory::Electricity,
        CostCategory::Colocation,
    ];
}

/// Monthly cost per category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct CostBreakdown {
    pub hardware_amortization: f64,
    pub electricity: f64,
    pub colocation: f64,
    pub cloud: f64,
    pub licenses: f64,
}

impl CostBreakdown {
    pub fn get(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::HardwareAmortization => self.hardware_amortization,
            CostCategory::Electricity => self.electricity,
            CostCategory::Colocation => self.colocation,
            CostCategory::Cloud => self.cloud,
            CostCategory::Licenses => self.licenses,
        }
    }

    fn slot(&mut self, category: CostCategory) -> &mut f64 {
        match category {
            CostCategory::HardwareAmortization => &mut self.hardware_amortization,
            CostCategory::Electricity => &mut self.electricity,
            CostCategory::Colocation => &mut self.colocation,
            CostCategory::Cloud => &mut self.cloud,
            CostCategory::Licenses => &mut self.licenses,
        }
    }

    pub fn add(&mut self, category: CostCategory, amount: f64) {
        *self.slot(category) += amount;
    }

    pub fn iter(&self) -> impl Iterator<Item = (CostCategory, f64)> + '_ {
        CostCategory::iter().map(move |c| (c, self.get(c)))
    }

    /// Multiply the on-prem categories by `factor`
    pub fn scale_on_prem(&mut self, factor: f64) {
        for category in CostCategory::ON_PREM {
            *self.slot(category) *= factor;
        }
    }

    /// electricity + colocation + cloud + licenses
    pub fn opex(&self) -> f64 {
        self.electricity + self.colocation + self.cloud + self.licenses
    }

    /// Monthly share of amortized capital
    pub fn capex_monthly(&self) -> f64 {
        self.hardware_amortization
    }
}

/// Which tariff table had no entry
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TariffKind {
    Electricity,
    Colocation,
    CloudProfile,
}

/// A lookup miss that zeroed part of a resource's cost
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct MissingTariff {
    pub kind: TariffKind,
    /// Region or profile code that was looked up
    pub key: String,
    /// Resource whose cost was affected
    pub resource: String,
}

/// What a migration scenario moved
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct MigrationSummary {
    /// Eligible workloads priced in the cloud
    pub migrated_workloads: Vec<String>,
    /// vCPUs counted toward the on-prem reduction
    pub migrated_vcpus: u64,
    /// vCPUs of all declared workloads
    pub total_vcpus: u64,
    /// Fraction removed from the on-prem categories
    pub reduction_factor: f64,
    /// Eligible workloads with no cloud profile to price them
    pub unpriced_workloads: Vec<String>,
}

/// Result of one scenario evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioCost {
    pub scenario_name: ScenarioKind,
    pub total_monthly_rub: f64,
    pub total_yearly_rub: f64,
    pub capex_yearly_amortized: f64,
    pub opex_monthly: f64,
    pub details: CostBreakdown,
    pub migration: MigrationSummary,
    pub missing_tariffs: Vec<MissingTariff>,
}

impl ScenarioCost {
    /// Derive the totals from a breakdown
    pub fn new(
        scenario_name: ScenarioKind,
        details: CostBreakdown,
        migration: MigrationSummary,
        missing_tariffs: Vec<MissingTariff>,
    ) -> Self {
        let opex_monthly = details.opex();
        let capex_monthly = details.capex_monthly();
        let total_monthly_rub = opex_monthly + capex_monthly;

        Self {
            scenario_name,
            total_monthly_rub,
            total_yearly_rub: total_monthly_rub * 12.0,
            capex_yearly_amortized: capex_monthly * 12.0,
            opex_monthly,
            details,
            migration,
            missing_tariffs,
        }
    }

    pub fn capex_monthly(&self) -> f64 {
        self.capex_yearly_amortized / 12.0
    }
}

/// Priced current deployment
#[derive(Debug, Clone, Default)]
struct Footprint {
    details: CostBreakdown,
    missing: Vec<MissingTariff>,
}

/// Evaluates scenarios over one `(InfraSpec, TariffLookup)` pair
pub struct ScenarioBuilder<'a, P: TariffLookup + ?Sized> {
    infra: &'a InfraSpec,
    pricing: &'a P,
    policy: CostPolicy,
    capacity: Arc<dyn CapacityReductionPolicy>,
}

impl<'a, P: TariffLookup + ?Sized> ScenarioBuilder<'a, P> {
    /// Builder using the capacity strategy named in `policy`
    pub fn new(infra: &'a InfraSpec, pricing: &'a P, policy: CostPolicy) -> Self {
        let capacity = policy.capacity_strategy.policy();
        Self {
            infra,
            pricing,
            policy,
            capacity,
        }
    }

    /// Swap in a custom capacity reduction estimate
    pub fn with_capacity_policy(mut self, capacity: Arc<dyn CapacityReductionPolicy>) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn policy(&self) -> &CostPolicy {
        &self.policy
    }

    pub fn capacity_policy(&self) -> &dyn CapacityReductionPolicy {
        self.capacity.as_ref()
    }

    /// All scenarios in report order: as_is, minimal_cloud, hybrid
    pub fn build_all(&self) -> Vec<ScenarioCost> {
        ScenarioKind::iter().map(|kind| self.scenario(kind)).collect()
    }

    pub fn scenario(&self, kind: ScenarioKind) -> ScenarioCost {
        match kind.migration_rule() {
            None => self.as_is(),
            Some(rule) => self.migrated(kind, rule),
        }
    }

    pub fn as_is(&self) -> ScenarioCost {
        let kind = ScenarioKind::AsIs;
        let footprint = self.current_footprint();
        let migration = MigrationSummary {
            total_vcpus: self.infra.total_workload_vcpus(),
            ..MigrationSummary::default()
        };
        let cost = ScenarioCost::new(kind, footprint.details, migration, footprint.missing);
        debug!(
            scenario = %kind,
            total_monthly_rub = cost.total_monthly_rub,
            "Scenario evaluated"
        );
        cost
    }

    pub fn minimal_cloud(&self) -> ScenarioCost {
        self.migrated(ScenarioKind::MinimalCloud, MigrationRule::StatelessWeb)
    }

    pub fn hybrid(&self) -> ScenarioCost {
        self.migrated(ScenarioKind::Hybrid, MigrationRule::Unregulated)
    }

    /// Price every declared server, rack and cloud allocation plus licenses.
    /// Missing tariffs zero the affected component; nothing is skipped.
    fn current_footprint(&self) -> Footprint {
        let mut footprint = Footprint::default();
        let deployment = &self.infra.current_deployment;

        for server in &deployment.on_prem_servers {
            let tariff = self.pricing.lookup_electricity(&server.region);
            if tariff.is_none() {
                footprint.miss(TariffKind::Electricity, &server.region, &server.name);
            }
            let cost = on_prem_server_monthly(server, tariff.as_ref(), &self.policy);
            footprint
                .details
                .add(CostCategory::HardwareAmortization, cost.amortization);
            footprint.details.add(CostCategory::Electricity, cost.electricity);
        }

        for (idx, unit) in deployment.colocation_units.iter().enumerate() {
            let resource = format!("colocation[{idx}]");
            let Some(tariff) = self.pricing.lookup_colocation(&unit.dc_region) else {
                footprint.miss(TariffKind::Colocation, &unit.dc_region, &resource);
                continue;
            };
            // Only power above the included allowance is billed by kWh.
            let electricity = if excess_power_watts(unit, &tariff) > 0 {
                let found = self.pricing.lookup_electricity(&unit.dc_region);
                if found.is_none() {
                    footprint.miss(TariffKind::Electricity, &unit.dc_region, &resource);
                }
                found
            } else {
                None
            };
            let cost = colocation_unit_monthly(unit, &tariff, electricity.as_ref(), &self.policy);
            footprint.details.add(CostCategory::Colocation, cost.total());
        }

        for (idx, usage) in deployment.cloud_usage.iter().enumerate() {
            match self.pricing.lookup_cloud_profile(&usage.provider_profile) {
                Some(profile) => {
                    let cost = cloud_monthly(&profile, CloudDemand::from(usage), &self.policy);
                    footprint.details.add(CostCategory::Cloud, cost);
                }
                None => footprint.miss(
                    TariffKind::CloudProfile,
                    &usage.provider_profile,
                    &format!("cloud_usage[{idx}]"),
                ),
            }
        }

        for license in &self.infra.licenses {
            footprint
                .details
                .add(CostCategory::Licenses, license.monthly_cost());
        }

        footprint
    }

    /// Shared mechanism of the migration scenarios: add cloud cost for
    /// eligible workloads and shrink on-prem categories by the capacity
    /// policy's factor.
    fn migrated(&self, kind: ScenarioKind, rule: MigrationRule) -> ScenarioCost {
        let Footprint {
            mut details,
            mut missing,
        } = self.current_footprint();

        let profile_code = &self.policy.default_cloud_profile;
        let profile = self.pricing.lookup_cloud_profile(profile_code);

        let mut migration = MigrationSummary {
            total_vcpus: self.infra.total_workload_vcpus(),
            ..MigrationSummary::default()
        };
        let mut cloud_cost = 0.0;

        for workload in rule.eligible(&self.infra.workloads) {
            match &profile {
                Some(profile) => {
                    let demand = CloudDemand::for_workload(workload, self.policy.migrated_egress_gb);
                    cloud_cost += cloud_monthly(profile, demand, &self.policy);
                    migration.migrated_vcpus += u64::from(workload.vcpus);
                    migration.migrated_workloads.push(workload.name.clone());
                }
                None => {
                    if self.policy.unpriced_migration == UnpricedMigration::Reduce {
                        migration.migrated_vcpus += u64::from(workload.vcpus);
                    }
                    migration.unpriced_workloads.push(workload.name.clone());
                }
            }
        }

        if !migration.unpriced_workloads.is_empty() {
            warn!(
                scenario = %kind,
                profile = %profile_code,
                workloads = migration.unpriced_workloads.len(),
                policy = %self.policy.unpriced_migration,
                "Cloud profile for migration not found in pricing catalog"
            );
            missing.push(MissingTariff {
                kind: TariffKind::CloudProfile,
                key: profile_code.clone(),
                resource: format!("{kind} migration"),
            });
        }

        let shift = CapacityShift::new(migration.migrated_vcpus, migration.total_vcpus);
        migration.reduction_factor = effective_factor(self.capacity.as_ref(), &shift);

        details.scale_on_prem(1.0 - migration.reduction_factor);
        details.add(CostCategory::Cloud, cloud_cost);

        let cost = ScenarioCost::new(kind, details, migration, missing);
        debug!(
            scenario = %kind,
            rule = %rule,
            capacity_policy = self.capacity.name(),
            migrated_vcpus = cost.migration.migrated_vcpus,
            reduction_factor = cost.migration.reduction_factor,
            total_monthly_rub = cost.total_monthly_rub,
            "Scenario evaluated"
        );
        cost
    }
}

impl Footprint {
    fn miss(&mut self, kind: TariffKind, key: &str, resource: &str) {
        warn!(kind = %kind, key = key, resource = resource, "Tariff not found, component priced at zero");
        self.missing.push(MissingTariff {
            kind,
            key: key.to_string(),
            resource: resource.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Availability, CompanyProfile, CurrentDeployment, IopsProfile, OnPremServer, Workload,
        WorkloadType,
    };
    use crate::pricing::{CloudProfile, ElectricityTariff, MockTariffLookup};

    fn infra() -> InfraSpec {
        InfraSpec {
            company_profile: CompanyProfile {
                name: "Test".to_string(),
                industry: None,
                size_class: None,
                region: "Moscow".to_string(),
                has_pd: true,
                has_pd_special: false,
                has_kii: false,
            },
            workloads: vec![
                Workload {
                    name: "site".to_string(),
                    kind: WorkloadType::Web,
                    vcpus: 2,
                    ram_gb: 4,
                    storage_gb: 50,
                    iops_profile: IopsProfile::Low,
                    availability: Availability::Basic,
                    contains_pd: false,
                    contains_pd_special: false,
                    kii_related: false,
                    backup: None,
                },
                Workload {
                    name: "crm-db".to_string(),
                    kind: WorkloadType::Db,
                    vcpus: 6,
                    ram_gb: 16,
                    storage_gb: 200,
                    iops_profile: IopsProfile::High,
                    availability: Availability::Standard,
                    contains_pd: true,
                    contains_pd_special: false,
                    kii_related: false,
                    backup: None,
                },
            ],
            current_deployment: CurrentDeployment {
                on_prem_servers: vec![OnPremServer {
                    name: "srv1".to_string(),
                    vcpus: 8,
                    ram_gb: 32,
                    storage_gb: 1000,
                    power_watts: 300,
                    region: "Moscow".to_string(),
                    age_years: 2,
                    capex_rub: 360_000.0,
                }],
                ..CurrentDeployment::default()
            },
            licenses: vec![],
        }
    }

    fn mock_pricing(with_profile: bool) -> MockTariffLookup {
        let mut mock = MockTariffLookup::new();
        mock.expect_lookup_electricity().returning(|region| {
            (region == "Moscow").then(|| ElectricityTariff {
                region: region.to_string(),
                tariff_rub_per_kwh: 5.0,
                updated_at: None,
                comment: None,
            })
        });
        mock.expect_lookup_colocation().returning(|_| None);
        mock.expect_lookup_cloud_profile().returning(move |code| {
            (with_profile && code == "ru_cloud_gp").then(|| CloudProfile {
                code: code.to_string(),
                vcpu_price_rub_per_hour: 1.0,
                ram_price_rub_per_gb_hour: 0.5,
                storage_price_rub_per_gb_month: 10.0,
                egress_price_rub_per_gb: 0.0,
            })
        });
        mock
    }

    #[test]
    fn test_as_is_uses_lookup_contract() {
        let infra = infra();
        let pricing = mock_pricing(true);
        let cost = ScenarioBuilder::new(&infra, &pricing, CostPolicy::default()).as_is();

        assert_eq!(cost.scenario_name, ScenarioKind::AsIs);
        assert_eq!(cost.details.hardware_amortization, 10_000.0);
        assert_eq!(cost.details.electricity, 1080.0);
        assert_eq!(cost.total_monthly_rub, 11_080.0);
        assert!(cost.missing_tariffs.is_empty());
    }

    #[test]
    fn test_minimal_cloud_moves_web_and_scales_on_prem() {
        let infra = infra();
        let pricing = mock_pricing(true);
        let cost = ScenarioBuilder::new(&infra, &pricing, CostPolicy::default()).minimal_cloud();

        assert_eq!(cost.migration.migrated_workloads, vec!["site".to_string()]);
        assert_eq!(cost.migration.migrated_vcpus, 2);
        assert_eq!(cost.migration.total_vcpus, 8);
        assert_eq!(cost.migration.reduction_factor, 0.25);
        assert_eq!(cost.details.hardware_amortization, 7500.0);
        assert_eq!(cost.details.electricity, 810.0);
        assert_eq!(cost.details.cloud, 3380.0);
    }

    #[test]
    fn test_unpriced_migration_excluded_by_default() {
        let infra = infra();
        let pricing = mock_pricing(false);
        let builder = ScenarioBuilder::new(&infra, &pricing, CostPolicy::default());
        let as_is = builder.as_is();
        let minimal = builder.minimal_cloud();

        assert_eq!(minimal.migration.migrated_vcpus, 0);
        assert_eq!(minimal.migration.reduction_factor, 0.0);
        assert_eq!(minimal.migration.unpriced_workloads, vec!["site".to_string()]);
        assert_eq!(minimal.details, as_is.details);
        assert_eq!(minimal.missing_tariffs.len(), 1);
        assert_eq!(minimal.missing_tariffs[0].kind, TariffKind::CloudProfile);
    }

    #[test]
    fn test_unpriced_migration_reduce_keeps_legacy_behavior() {
        let infra = infra();
        let pricing = mock_pricing(false);
        let policy = CostPolicy {
            unpriced_migration: UnpricedMigration::Reduce,
            ..CostPolicy::default()
        };
        let minimal = ScenarioBuilder::new(&infra, &pricing, policy).minimal_cloud();

        assert_eq!(minimal.migration.migrated_vcpus, 2);
        assert_eq!(minimal.migration.reduction_factor, 0.25);
        assert_eq!(minimal.details.cloud, 0.0);
        assert!(minimal.migration.migrated_workloads.is_empty());
    }

    #[test]
    fn test_cost_breakdown_iter_covers_all_categories() {
        let breakdown = CostBreakdown {
            hardware_amortization: 1.0,
            electricity: 2.0,
            colocation: 3.0,
            cloud: 4.0,
            licenses: 5.0,
        };
        let values: Vec<f64> = breakdown.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(breakdown.opex(), 14.0);
        assert_eq!(breakdown.capex_monthly(), 1.0);
    }

    #[test]
    fn test_scale_on_prem_leaves_cloud_and_licenses() {
        let mut breakdown = CostBreakdown {
            hardware_amortization: 100.0,
            electricity: 50.0,
            colocation: 20.0,
            cloud: 10.0,
            licenses: 5.0,
        };
        breakdown.scale_on_prem(0.5);
        assert_eq!(breakdown.hardware_amortization, 50.0);
        assert_eq!(breakdown.electricity, 25.0);
        assert_eq!(breakdown.colocation, 10.0);
        assert_eq!(breakdown.cloud, 10.0);
        assert_eq!(breakdown.licenses, 5.0);
    }

    #[test]
    fn test_scenario_kind_names() {
        assert_eq!(ScenarioKind::AsIs.to_string(), "as_is");
        assert_eq!(ScenarioKind::MinimalCloud.to_string(), "minimal_cloud");
        assert_eq!(CostCategory::HardwareAmortization.to_string(), "hardware_amortization");
    }
}
