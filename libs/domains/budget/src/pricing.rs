//! Pricing catalog: electricity, colocation and cloud tariffs.
//!
//! Lookups match region names and profile codes case-insensitively
//! (Unicode lowercase) and ignore surrounding whitespace, so `"Москва"`,
//! `"москва"` and `" МОСКВА "` are the same key. When a catalog declares the
//! same key twice, the first entry wins.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

use crate::models::validate_money;

/// Electricity price for a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct ElectricityTariff {
    #[validate(length(min = 1))]
    pub region: String,
    #[validate(custom(function = "validate_money"))]
    pub tariff_rub_per_kwh: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Rack rental price for a region, with a per-unit power allowance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct ColocationTariff {
    #[validate(length(min = 1))]
    pub region: String,
    #[validate(custom(function = "validate_money"))]
    pub price_rub_per_u_per_month: f64,
    /// Power included with each rented unit
    #[serde(default)]
    pub included_power_watts: u32,
    #[serde(default)]
    pub included_bandwidth_mbps: u32,
}

/// Cloud provider price profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct CloudProfile {
    #[validate(length(min = 1))]
    pub code: String,
    #[serde(alias = "vCPU_price_rub_per_hour")]
    #[validate(custom(function = "validate_money"))]
    pub vcpu_price_rub_per_hour: f64,
    #[validate(custom(function = "validate_money"))]
    pub ram_price_rub_per_gb_hour: f64,
    #[validate(custom(function = "validate_money"))]
    pub storage_price_rub_per_gb_month: f64,
    #[serde(default)]
    #[validate(custom(function = "validate_money"))]
    pub egress_price_rub_per_gb: f64,
}

/// Lookup contract used by the cost engine.
///
/// A `None` result is a soft condition: callers degrade the affected cost
/// component to zero instead of failing.
#[cfg_attr(test, mockall::automock)]
pub trait TariffLookup: Send + Sync {
    fn lookup_electricity(&self, region: &str) -> Option<ElectricityTariff>;

    fn lookup_colocation(&self, region: &str) -> Option<ColocationTariff>;

    fn lookup_cloud_profile(&self, code: &str) -> Option<CloudProfile>;
}

/// In-memory pricing catalog. Read-only after load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct PricingCatalog {
    #[serde(default)]
    #[validate(nested)]
    pub electricity: Vec<ElectricityTariff>,
    #[serde(default)]
    #[validate(nested)]
    pub colocation: Vec<ColocationTariff>,
    #[serde(default)]
    #[validate(nested)]
    pub cloud_profiles: Vec<CloudProfile>,
}

/// Case-insensitive, whitespace-trimmed key comparison
pub fn keys_match(a: &str, b: &str) -> bool {
    a.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .eq(b.trim().chars().flat_map(char::to_lowercase))
}

fn normalized(key: &str) -> String {
    key.trim().to_lowercase()
}

fn duplicates<'a>(section: &str, keys: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.filter(|k| !seen.insert(normalized(k)))
        .map(|k| format!("{section}: duplicate key '{k}', first entry wins"))
        .collect()
}

impl PricingCatalog {
    pub fn get_electricity_tariff(&self, region: &str) -> Option<&ElectricityTariff> {
        self.electricity.iter().find(|t| keys_match(&t.region, region))
    }

    pub fn get_colocation_tariff(&self, region: &str) -> Option<&ColocationTariff> {
        self.colocation.iter().find(|t| keys_match(&t.region, region))
    }

    pub fn get_cloud_profile(&self, code: &str) -> Option<&CloudProfile> {
        self.cloud_profiles.iter().find(|p| keys_match(&p.code, code))
    }

    /// Keys declared more than once (only the first is ever used)
    pub fn duplicate_keys(&self) -> Vec<String> {
        let mut out = duplicates("electricity", self.electricity.iter().map(|t| t.region.as_str()));
        out.extend(duplicates(
            "colocation",
            self.colocation.iter().map(|t| t.region.as_str()),
        ));
        out.extend(duplicates(
            "cloud_profiles",
            self.cloud_profiles.iter().map(|p| p.code.as_str()),
        ));
        out
    }
}

impl TariffLookup for PricingCatalog {
    fn lookup_electricity(&self, region: &str) -> Option<ElectricityTariff> {
        self.get_electricity_tariff(region).cloned()
    }

    fn lookup_colocation(&self, region: &str) -> Option<ColocationTariff> {
        self.get_colocation_tariff(region).cloned()
    }

    fn lookup_cloud_profile(&self, code: &str) -> Option<CloudProfile> {
        self.get_cloud_profile(code).cloned()
    }
}
