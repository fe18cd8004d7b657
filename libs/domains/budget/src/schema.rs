//! JSON Schema export for the input documents, so editors and CI can validate
//! `infra.yaml` and `pricing.yaml` before they reach the engine.

use schemars::{Schema, schema_for};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{BudgetError, BudgetResult};
use crate::models::InfraSpec;
use crate::pricing::PricingCatalog;

/// Which document a schema describes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SchemaTarget {
    #[default]
    Infra,
    Pricing,
}

/// Output encoding of an exported schema
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SchemaFormat {
    #[default]
    Json,
    Yaml,
}

pub fn infra_schema() -> Schema {
    schema_for!(InfraSpec)
}

pub fn pricing_schema() -> Schema {
    schema_for!(PricingCatalog)
}

pub fn schema(target: SchemaTarget) -> Schema {
    match target {
        SchemaTarget::Infra => infra_schema(),
        SchemaTarget::Pricing => pricing_schema(),
    }
}

/// Render a schema as pretty JSON or YAML
pub fn render_schema(target: SchemaTarget, format: SchemaFormat) -> BudgetResult<String> {
    let schema = schema(target);
    match format {
        SchemaFormat::Json => Ok(serde_json::to_string_pretty(&schema)?),
        SchemaFormat::Yaml => serde_yaml_ng::to_string(&schema)
            .map_err(|e| BudgetError::yaml(format!("{target} schema"), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn as_json(schema: &Schema) -> Value {
        serde_json::to_value(schema).unwrap()
    }

    #[test]
    fn test_infra_schema_lists_top_level_sections() {
        let value = as_json(&infra_schema());
        let properties = value["properties"].as_object().unwrap();

        for key in ["company_profile", "workloads", "current_deployment", "licenses"] {
            assert!(properties.contains_key(key), "missing {key}");
        }
        let required: Vec<&str> = value["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"company_profile"));
    }

    #[test]
    fn test_infra_schema_uses_yaml_field_names() {
        let rendered = render_schema(SchemaTarget::Infra, SchemaFormat::Json).unwrap();
        assert!(rendered.contains("\"type\""));
        assert!(rendered.contains("\"1c\""));
        assert!(rendered.contains("\"99.95\""));
    }

    #[test]
    fn test_pricing_schema_lists_tariff_tables() {
        let value = as_json(&pricing_schema());
        let properties = value["properties"].as_object().unwrap();

        assert!(properties.contains_key("electricity"));
        assert!(properties.contains_key("colocation"));
        assert!(properties.contains_key("cloud_profiles"));
    }

    #[test]
    fn test_yaml_rendering() {
        let rendered = render_schema(SchemaTarget::Pricing, SchemaFormat::Yaml).unwrap();
        assert!(rendered.contains("cloud_profiles"));
        assert!(!rendered.trim_start().starts_with('{'));
    }

    #[test]
    fn test_target_names() {
        assert_eq!("pricing".parse::<SchemaTarget>().unwrap(), SchemaTarget::Pricing);
        assert_eq!(SchemaFormat::Yaml.to_string(), "yaml");
    }
}
