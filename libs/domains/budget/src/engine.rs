//! Per-resource monthly cost functions.
//!
//! Pure functions of a resource, its matching tariffs and the cost policy.
//! A missing electricity tariff zeroes only the electricity component.
//! Quantities are unsigned, so inputs are non-negative by construction;
//! money fields are validated on load.

use crate::config::CostPolicy;
use crate::models::{CloudUsage, ColocationUnit, OnPremServer, Workload};
use crate::pricing::{CloudProfile, ColocationTariff, ElectricityTariff};

/// Straight-line amortization. A zero horizon yields zero.
pub fn monthly_amortization(capex_rub: f64, amortization_months: u32) -> f64 {
    if amortization_months == 0 {
        return 0.0;
    }
    capex_rub / f64::from(amortization_months)
}

/// Metered electricity for a constant draw
pub fn monthly_energy_cost(power_watts: u32, hours_per_month: f64, tariff_rub_per_kwh: f64) -> f64 {
    (f64::from(power_watts) / 1000.0) * hours_per_month * tariff_rub_per_kwh
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ServerCost {
    pub amortization: f64,
    pub electricity: f64,
}

impl ServerCost {
    pub fn total(&self) -> f64 {
        self.amortization + self.electricity
    }
}

/// Monthly cost of one owned server: amortized capex plus electricity at the
/// region tariff (zero when the tariff is missing).
pub fn on_prem_server_monthly(
    server: &OnPremServer,
    electricity: Option<&ElectricityTariff>,
    policy: &CostPolicy,
) -> ServerCost {
    let amortization = monthly_amortization(server.capex_rub, policy.amortization_months);
    let electricity = electricity
        .map(|t| monthly_energy_cost(server.power_watts, policy.hours(), t.tariff_rub_per_kwh))
        .unwrap_or(0.0);

    ServerCost {
        amortization,
        electricity,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColocationCost {
    /// Rack units times the per-unit price
    pub rent: f64,
    /// Electricity for draw above the included allowance
    pub extra_power: f64,
}

impl ColocationCost {
    pub fn total(&self) -> f64 {
        self.rent + self.extra_power
    }
}

/// Draw above `units * included_power_watts`, never negative
pub fn excess_power_watts(unit: &ColocationUnit, tariff: &ColocationTariff) -> u32 {
    let included = u64::from(unit.units) * u64::from(tariff.included_power_watts);
    u64::from(unit.power_watts).saturating_sub(included) as u32
}

/// Monthly cost of one colocation contract. Excess power is billed at the
/// data center region's electricity tariff, or zero when that is missing.
pub fn colocation_unit_monthly(
    unit: &ColocationUnit,
    tariff: &ColocationTariff,
    electricity: Option<&ElectricityTariff>,
    policy: &CostPolicy,
) -> ColocationCost {
    let rent = f64::from(unit.units) * tariff.price_rub_per_u_per_month;
    let extra_power = electricity
        .map(|t| {
            monthly_energy_cost(
                excess_power_watts(unit, tariff),
                policy.hours(),
                t.tariff_rub_per_kwh,
            )
        })
        .unwrap_or(0.0);

    ColocationCost { rent, extra_power }
}

/// Resource quantities priced against a cloud profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CloudDemand {
    pub vcpus: u32,
    pub ram_gb: u32,
    pub storage_gb: u32,
    pub egress_gb: u32,
}

impl CloudDemand {
    /// Demand of a workload moved to the cloud, with the assumed egress
    pub fn for_workload(workload: &Workload, egress_gb: u32) -> Self {
        Self {
            vcpus: workload.vcpus,
            ram_gb: workload.ram_gb,
            storage_gb: workload.storage_gb,
            egress_gb,
        }
    }
}

impl From<&CloudUsage> for CloudDemand {
    fn from(usage: &CloudUsage) -> Self {
        Self {
            vcpus: usage.vcpus,
            ram_gb: usage.ram_gb,
            storage_gb: usage.storage_gb,
            egress_gb: usage.egress_gb,
        }
    }
}

/// `(vcpu * vcpu_price + ram * ram_price) * hours + storage * storage_price + egress * egress_price`
pub fn cloud_monthly(profile: &CloudProfile, demand: CloudDemand, policy: &CostPolicy) -> f64 {
    let compute = (f64::from(demand.vcpus) * profile.vcpu_price_rub_per_hour
        + f64::from(demand.ram_gb) * profile.ram_price_rub_per_gb_hour)
        * policy.hours();
    let storage = f64::from(demand.storage_gb) * profile.storage_price_rub_per_gb_month;
    let egress = f64::from(demand.egress_gb) * profile.egress_price_rub_per_gb;

    compute + storage + egress
}
