//! YAML loading and validation of infrastructure and pricing documents.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use validator::Validate;

use crate::error::{BudgetError, BudgetResult};
use crate::models::InfraSpec;
use crate::pricing::PricingCatalog;

const INLINE: &str = "<inline>";

fn read(path: &Path) -> BudgetResult<String> {
    fs::read_to_string(path).map_err(|e| BudgetError::io(path, e))
}

fn parse<T>(yaml: &str, context: &str) -> BudgetResult<T>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_yaml_ng::from_str(yaml).map_err(|e| BudgetError::yaml(context, e))?;
    value.validate()?;
    Ok(value)
}

/// Parse and validate an infrastructure description
pub fn infra_spec_from_str(yaml: &str) -> BudgetResult<InfraSpec> {
    parse_infra(yaml, INLINE)
}

/// Read, parse and validate an infrastructure YAML file
pub fn parse_infra_spec(path: impl AsRef<Path>) -> BudgetResult<InfraSpec> {
    let path = path.as_ref();
    parse_infra(&read(path)?, &path.display().to_string())
}

fn parse_infra(yaml: &str, context: &str) -> BudgetResult<InfraSpec> {
    let infra: InfraSpec = parse(yaml, context)?;
    for warning in infra.consistency_warnings() {
        warn!(source = context, "{}", warning);
    }
    debug!(
        source = context,
        workloads = infra.workloads.len(),
        servers = infra.current_deployment.on_prem_servers.len(),
        colocation = infra.current_deployment.colocation_units.len(),
        cloud = infra.current_deployment.cloud_usage.len(),
        licenses = infra.licenses.len(),
        "Loaded infrastructure spec"
    );
    Ok(infra)
}

/// Parse and validate a pricing catalog
pub fn pricing_catalog_from_str(yaml: &str) -> BudgetResult<PricingCatalog> {
    parse_pricing(yaml, INLINE)
}

/// Read, parse and validate a pricing YAML file
pub fn parse_pricing_catalog(path: impl AsRef<Path>) -> BudgetResult<PricingCatalog> {
    let path = path.as_ref();
    parse_pricing(&read(path)?, &path.display().to_string())
}

fn parse_pricing(yaml: &str, context: &str) -> BudgetResult<PricingCatalog> {
    let catalog: PricingCatalog = parse(yaml, context)?;
    for duplicate in catalog.duplicate_keys() {
        warn!(source = context, "{}", duplicate);
    }
    debug!(
        source = context,
        electricity = catalog.electricity.len(),
        colocation = catalog.colocation.len(),
        cloud_profiles = catalog.cloud_profiles.len(),
        "Loaded pricing catalog"
    );
    Ok(catalog)
}

/// Serialize an infrastructure description back to YAML
pub fn infra_spec_to_yaml(infra: &InfraSpec) -> BudgetResult<String> {
    serde_yaml_ng::to_string(infra).map_err(|e| BudgetError::yaml("serialize infra spec", e))
}
