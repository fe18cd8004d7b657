//! Migration eligibility rules per scenario.

use strum::Display;

use crate::models::{Workload, WorkloadType};

/// Which workloads a scenario moves to the cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MigrationRule {
    /// Public web workloads without personal data or KII ties
    StatelessWeb,
    /// Everything not flagged PD, PD-special or KII, regardless of type
    Unregulated,
}

impl MigrationRule {
    pub fn is_eligible(&self, workload: &Workload) -> bool {
        match self {
            MigrationRule::StatelessWeb => {
                workload.kind == WorkloadType::Web
                    && !workload.contains_pd
                    && !workload.kii_related
            }
            MigrationRule::Unregulated => !workload.is_regulated(),
        }
    }

    pub fn eligible<'a>(&self, workloads: &'a [Workload]) -> impl Iterator<Item = &'a Workload> {
        let rule = *self;
        workloads.iter().filter(move |w| rule.is_eligible(w))
    }
}
