//! Capacity reduction strategies.
//!
//! The infrastructure model does not know which server hosts which workload,
//! so the on-prem saving from a migration can only be estimated. A strategy
//! turns the vCPU shift of a scenario into a factor in `[0, 1]` that scales
//! down the hardware amortization, electricity and colocation categories.

/// vCPU demand moved by a migration scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapacityShift {
    /// vCPUs counted as leaving on-prem
    pub migrated_vcpus: u64,
    /// vCPUs of all declared workloads
    pub total_vcpus: u64,
}

impl CapacityShift {
    pub fn new(migrated_vcpus: u64, total_vcpus: u64) -> Self {
        Self {
            migrated_vcpus,
            total_vcpus,
        }
    }
}

/// Estimation strategy for how much on-prem cost a migration sheds
pub trait CapacityReductionPolicy: Send + Sync {
    /// Stable identifier for logs and reports
    fn name(&self) -> &'static str;

    /// Fraction of on-prem cost removed. Values outside `[0, 1]` are clamped
    /// by the caller; non-finite values are treated as zero.
    fn reduction_factor(&self, shift: &CapacityShift) -> f64;
}

/// Linear approximation: on-prem cost shrinks in proportion to the share of
/// workload vCPUs moved to the cloud. Assumes perfect consolidation of the
/// remaining hardware, so it is an optimistic estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalVcpu;

impl CapacityReductionPolicy for ProportionalVcpu {
    fn name(&self) -> &'static str {
        "proportional_vcpu"
    }

    fn reduction_factor(&self, shift: &CapacityShift) -> f64 {
        if shift.total_vcpus == 0 {
            return 0.0;
        }
        shift.migrated_vcpus as f64 / shift.total_vcpus as f64
    }
}

/// Pessimistic estimate: every existing server and rack stays, so a
/// migration only adds cloud cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetainOnPrem;

impl CapacityReductionPolicy for RetainOnPrem {
    fn name(&self) -> &'static str {
        "retain_on_prem"
    }

    fn reduction_factor(&self, _shift: &CapacityShift) -> f64 {
        0.0
    }
}

/// Apply a policy and bring its answer into `[0, 1]`
pub fn effective_factor(policy: &dyn CapacityReductionPolicy, shift: &CapacityShift) -> f64 {
    let factor = policy.reduction_factor(shift);
    if factor.is_finite() {
        factor.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl CapacityReductionPolicy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn reduction_factor(&self, _shift: &CapacityShift) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_proportional_factor() {
        let factor = ProportionalVcpu.reduction_factor(&CapacityShift::new(2, 8));
        assert_eq!(factor, 0.25);
    }

    #[test]
    fn test_proportional_zero_total_is_zero() {
        assert_eq!(ProportionalVcpu.reduction_factor(&CapacityShift::new(0, 0)), 0.0);
        assert_eq!(ProportionalVcpu.reduction_factor(&CapacityShift::new(4, 0)), 0.0);
    }

    #[test]
    fn test_retain_on_prem_never_reduces() {
        assert_eq!(RetainOnPrem.reduction_factor(&CapacityShift::new(8, 8)), 0.0);
    }

    #[test]
    fn test_effective_factor_clamps() {
        let shift = CapacityShift::new(1, 2);
        assert_eq!(effective_factor(&Fixed(1.7), &shift), 1.0);
        assert_eq!(effective_factor(&Fixed(-0.3), &shift), 0.0);
        assert_eq!(effective_factor(&Fixed(f64::NAN), &shift), 0.0);
        assert_eq!(effective_factor(&Fixed(0.4), &shift), 0.4);
    }
}
