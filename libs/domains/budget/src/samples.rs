//! Starter documents written by `init-sample`.

pub const INFRA_YAML: &str = include_str!("../samples/infra.yaml");
pub const PRICING_YAML: &str = include_str!("../samples/pricing.yaml");

pub const INFRA_FILE_NAME: &str = "infra.yaml";
pub const PRICING_FILE_NAME: &str = "pricing.yaml";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{infra_spec_from_str, pricing_catalog_from_str};

    #[test]
    fn test_samples_load_cleanly() {
        let infra = infra_spec_from_str(INFRA_YAML).unwrap();
        let pricing = pricing_catalog_from_str(PRICING_YAML).unwrap();

        assert!(infra.consistency_warnings().is_empty());
        assert!(pricing.duplicate_keys().is_empty());
        assert_eq!(infra.workloads.len(), 3);
    }
}
