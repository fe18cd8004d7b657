//! Infrastructure specification: company profile, workload demand and the
//! currently deployed footprint (on-prem, colocation, cloud, licenses).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use validator::Validate;

/// Money amounts must be finite and non-negative.
pub(crate) fn validate_money(value: f64) -> Result<(), validator::ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(validator::ValidationError::new("invalid_money_amount"));
    }
    Ok(())
}

/// Workload category
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
    Default,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkloadType {
    Web,
    Db,
    #[serde(rename = "1c")]
    #[strum(serialize = "1c")]
    OneC,
    Bitrix,
    Email,
    Vpn,
    #[default]
    Other,
}

/// Storage IOPS tier
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
    Default,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IopsProfile {
    #[default]
    Low,
    Medium,
    High,
}

/// Availability target, written as a quoted percentage in YAML (`"99.9"`)
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
    Default,
    JsonSchema,
)]
pub enum Availability {
    /// 99.5%
    #[default]
    #[serde(rename = "99.5")]
    #[strum(serialize = "99.5")]
    Basic,
    /// 99.9%
    #[serde(rename = "99.9")]
    #[strum(serialize = "99.9")]
    Standard,
    /// 99.95%
    #[serde(rename = "99.95")]
    #[strum(serialize = "99.95")]
    High,
    /// 99.99%
    #[serde(rename = "99.99")]
    #[strum(serialize = "99.99")]
    Critical,
}

/// License billing metric
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
    Default,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LicenseMetric {
    #[default]
    User,
    Socket,
    Vm,
}

/// Company identity and regulatory flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct CompanyProfile {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_class: Option<String>,
    #[validate(length(min = 1))]
    pub region: String,
    /// Handles personal data (152-FZ)
    #[serde(default)]
    pub has_pd: bool,
    /// Handles special-category personal data
    #[serde(default)]
    pub has_pd_special: bool,
    /// Critical information infrastructure (187-FZ)
    #[serde(default)]
    pub has_kii: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct BackupSpec {
    #[serde(default)]
    pub daily_full: bool,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_retention_days() -> u32 {
    30
}

/// A named unit of compute demand. Never priced directly; only once a
/// scenario maps it to a deployment target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct Workload {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WorkloadType,
    pub vcpus: u32,
    pub ram_gb: u32,
    pub storage_gb: u32,
    #[serde(default)]
    pub iops_profile: IopsProfile,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub contains_pd: bool,
    #[serde(default)]
    pub contains_pd_special: bool,
    #[serde(default)]
    pub kii_related: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub backup: Option<BackupSpec>,
}

impl Workload {
    /// Any regulatory flag that restricts where this workload may run
    pub fn is_regulated(&self) -> bool {
        self.contains_pd || self.contains_pd_special || self.kii_related
    }
}

/// Owned physical server. `age_years` is informational; amortization uses
/// the policy-wide horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct OnPremServer {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub vcpus: u32,
    pub ram_gb: u32,
    pub storage_gb: u32,
    pub power_watts: u32,
    #[validate(length(min = 1))]
    pub region: String,
    #[serde(default)]
    pub age_years: u32,
    #[validate(custom(function = "validate_money"))]
    pub capex_rub: f64,
}

/// Rented rack space in a data center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct ColocationUnit {
    #[validate(length(min = 1))]
    pub dc_region: String,
    pub units: u32,
    pub power_watts: u32,
    #[serde(default)]
    pub bandwidth_mbps: u32,
}

/// Existing cloud allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct CloudUsage {
    #[validate(length(min = 1))]
    pub provider_profile: String,
    pub vcpus: u32,
    pub ram_gb: u32,
    pub storage_gb: u32,
    #[serde(default)]
    pub region: String,
    /// Monthly egress volume
    #[serde(default)]
    pub egress_gb: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct CurrentDeployment {
    #[serde(default)]
    #[validate(nested)]
    pub on_prem_servers: Vec<OnPremServer>,
    #[serde(default)]
    #[validate(nested)]
    pub colocation_units: Vec<ColocationUnit>,
    #[serde(default)]
    #[validate(nested)]
    pub cloud_usage: Vec<CloudUsage>,
}

/// Recurring software cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct License {
    #[validate(length(min = 1, max = 255))]
    pub product: String,
    #[serde(default)]
    pub metric: LicenseMetric,
    #[serde(default)]
    pub seats: u32,
    #[validate(custom(function = "validate_money"))]
    pub cost_rub_per_year: f64,
}

impl License {
    pub fn monthly_cost(&self) -> f64 {
        self.cost_rub_per_year / 12.0
    }
}

/// Full infrastructure description consumed by the scenario builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct InfraSpec {
    #[validate(nested)]
    pub company_profile: CompanyProfile,
    #[serde(default)]
    #[validate(nested)]
    pub workloads: Vec<Workload>,
    #[serde(default)]
    #[validate(nested)]
    pub current_deployment: CurrentDeployment,
    #[serde(default)]
    #[validate(nested)]
    pub licenses: Vec<License>,
}

impl InfraSpec {
    /// Sum of declared workload vCPUs
    pub fn total_workload_vcpus(&self) -> u64 {
        self.workloads.iter().map(|w| u64::from(w.vcpus)).sum()
    }

    /// Non-fatal inconsistencies between regulatory flags.
    ///
    /// These are reported to the user but do not block a calculation.
    pub fn consistency_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let profile = &self.company_profile;

        if profile.has_pd_special && !profile.has_pd {
            warnings.push(
                "company_profile: has_pd_special is set but has_pd is not".to_string(),
            );
        }

        for (idx, w) in self.workloads.iter().enumerate() {
            if w.contains_pd_special && !w.contains_pd {
                warnings.push(format!(
                    "workloads[{idx}] '{}': contains_pd_special is set but contains_pd is not",
                    w.name
                ));
            }
            if (w.contains_pd || w.contains_pd_special) && !profile.has_pd {
                warnings.push(format!(
                    "workloads[{idx}] '{}': holds personal data but company_profile.has_pd is false",
                    w.name
                ));
            }
            if w.kii_related && !profile.has_kii {
                warnings.push(format!(
                    "workloads[{idx}] '{}': kii_related but company_profile.has_kii is false",
                    w.name
                ));
            }
        }

        warnings
    }
}
