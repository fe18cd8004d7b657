//! Free-text to infrastructure drafting.
//!
//! A drafter turns an owner's description ("у нас сайт и 1С, персональные
//! данные клиентов") into an [`InfraSpec`] skeleton that is then edited by
//! hand. The built-in [`KeywordDrafter`] is deterministic; a model-backed
//! implementation can be plugged in behind the same trait.

use crate::models::{
    Availability, BackupSpec, CompanyProfile, CurrentDeployment, InfraSpec, IopsProfile, Workload,
    WorkloadType,
};

/// Produces an infrastructure draft from a description
pub trait InfraDrafter: Send + Sync {
    fn draft(&self, text: &str) -> InfraSpec;
}

/// Recognized workload templates: keywords, then the workload they produce
struct Template {
    keywords: &'static [&'static str],
    build: fn() -> Workload,
}

const PD_KEYWORDS: &[&str] = &["персональные данные", "персональных данных", "пдн", "personal data"];

const TEMPLATES: &[Template] = &[
    Template {
        keywords: &["сайт", "web", "веб"],
        build: website,
    },
    Template {
        // Cyrillic and Latin spellings of 1C
        keywords: &["1с", "1c"],
        build: one_c,
    },
    Template {
        keywords: &["почта", "почты", "email", "e-mail", "mail"],
        build: mail,
    },
    Template {
        keywords: &["vpn", "впн"],
        build: vpn,
    },
];

fn workload(name: &str, kind: WorkloadType, vcpus: u32, ram_gb: u32, storage_gb: u32) -> Workload {
    Workload {
        name: name.to_string(),
        kind,
        vcpus,
        ram_gb,
        storage_gb,
        iops_profile: IopsProfile::Low,
        availability: Availability::Basic,
        contains_pd: false,
        contains_pd_special: false,
        kii_related: false,
        backup: None,
    }
}

fn website() -> Workload {
    workload("website", WorkloadType::Web, 2, 4, 20)
}

fn one_c() -> Workload {
    Workload {
        iops_profile: IopsProfile::Medium,
        availability: Availability::Standard,
        contains_pd: true,
        backup: Some(BackupSpec {
            daily_full: true,
            retention_days: 30,
        }),
        ..workload("1c-server", WorkloadType::OneC, 4, 16, 200)
    }
}

fn mail() -> Workload {
    Workload {
        contains_pd: true,
        ..workload("mail-server", WorkloadType::Email, 2, 8, 500)
    }
}

fn vpn() -> Workload {
    workload("vpn-gateway", WorkloadType::Vpn, 1, 2, 10)
}

/// Deterministic keyword matcher over a lowercased description
#[derive(Debug, Clone)]
pub struct KeywordDrafter {
    pub company_name: String,
    pub default_region: String,
}

impl Default for KeywordDrafter {
    fn default() -> Self {
        Self {
            company_name: "Generated Company".to_string(),
            default_region: "Moscow".to_string(),
        }
    }
}

impl KeywordDrafter {
    pub fn new(default_region: impl Into<String>) -> Self {
        Self {
            default_region: default_region.into(),
            ..Self::default()
        }
    }
}

fn mentions(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

impl InfraDrafter for KeywordDrafter {
    fn draft(&self, text: &str) -> InfraSpec {
        let text = text.to_lowercase();
        let has_pd = mentions(&text, PD_KEYWORDS);

        let workloads = TEMPLATES
            .iter()
            .filter(|t| mentions(&text, t.keywords))
            .map(|t| {
                let mut w = (t.build)();
                // Only flag PD on templates that typically hold it when the
                // owner says the company processes it.
                w.contains_pd &= has_pd;
                w
            })
            .collect();

        InfraSpec {
            company_profile: CompanyProfile {
                name: self.company_name.clone(),
                industry: Some("generic".to_string()),
                size_class: Some("10-50".to_string()),
                region: self.default_region.clone(),
                has_pd,
                has_pd_special: false,
                has_kii: false,
            },
            workloads,
            current_deployment: CurrentDeployment::default(),
            licenses: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn kinds(infra: &InfraSpec) -> Vec<WorkloadType> {
        infra.workloads.iter().map(|w| w.kind).collect()
    }

    #[test]
    fn test_empty_text_gives_empty_draft() {
        let infra = KeywordDrafter::default().draft("");
        assert!(infra.workloads.is_empty());
        assert!(!infra.company_profile.has_pd);
        assert_eq!(infra.company_profile.region, "Moscow");
    }

    #[test]
    fn test_recognizes_site_and_1c() {
        let infra = KeywordDrafter::default().draft("Небольшой САЙТ и бухгалтерия в 1С");
        assert_eq!(kinds(&infra), vec![WorkloadType::Web, WorkloadType::OneC]);
    }

    #[test]
    fn test_latin_1c_and_mail_and_vpn() {
        let infra = KeywordDrafter::default().draft("1C server, corporate email, VPN for remote staff");
        assert_eq!(
            kinds(&infra),
            vec![WorkloadType::OneC, WorkloadType::Email, WorkloadType::Vpn]
        );
    }

    #[test]
    fn test_personal_data_flags_profile_and_workloads() {
        let infra = KeywordDrafter::default().draft("Храним персональные данные клиентов в 1С, есть сайт");

        assert!(infra.company_profile.has_pd);
        let one_c = infra.workloads.iter().find(|w| w.kind == WorkloadType::OneC).unwrap();
        assert!(one_c.contains_pd);
        let site = infra.workloads.iter().find(|w| w.kind == WorkloadType::Web).unwrap();
        assert!(!site.contains_pd);
    }

    #[test]
    fn test_without_personal_data_nothing_is_flagged() {
        let infra = KeywordDrafter::default().draft("1С и почта");
        assert!(infra.workloads.iter().all(|w| !w.contains_pd));
        assert!(infra.consistency_warnings().is_empty());
    }

    #[test]
    fn test_draft_is_valid_and_uses_region() {
        let infra = KeywordDrafter::new("Татарстан").draft("сайт, 1с, почта, vpn, персональные данные");
        assert!(infra.validate().is_ok());
        assert!(infra.consistency_warnings().is_empty());
        assert_eq!(infra.company_profile.region, "Татарстан");
        assert_eq!(infra.workloads.len(), 4);
    }

    #[test]
    fn test_draft_is_deterministic() {
        let drafter = KeywordDrafter::default();
        let text = "сайт и 1с";
        assert_eq!(drafter.draft(text), drafter.draft(text));
    }
}
