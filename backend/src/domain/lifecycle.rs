//! # Lifecycle State Machine
//!
//! Pure transition rules for contracts, tasks and rewards. Nothing here
//! touches storage; services pass in the status they just read.
//!
//! ```text
//! contract: active -> completed | terminated      (either role)
//! task:     pending -> completed | failed         (child: completed only)
//! reward:   available -> claimed -> completed     (child claims, parent confirms)
//! ```
//!
//! Task and reward writes are additionally gated on the owning contract
//! being `active`, checked before any role rule.

use shared::{ContractStatus, RewardStatus, Role, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleViolation {
    #[error("contract not active")]
    ContractNotActive,

    #[error("{role} cannot set {entity} status to '{requested}'")]
    RoleMismatch {
        entity: &'static str,
        role: Role,
        requested: &'static str,
    },

    #[error("only the parent can edit {entity} details")]
    DetailsLocked { entity: &'static str },

    #[error("{entity} cannot move from '{from}' to '{to}'")]
    IllegalTransition {
        entity: &'static str,
        from: &'static str,
        to: &'static str,
    },
}

impl LifecycleViolation {
    /// Role mismatches are reported as forbidden rather than as state errors
    pub fn is_role_mismatch(&self) -> bool {
        matches!(
            self,
            LifecycleViolation::RoleMismatch { .. } | LifecycleViolation::DetailsLocked { .. }
        )
    }
}

/// A status enum with role-aware transition rules
pub trait Lifecycle: Copy + Eq {
    const ENTITY: &'static str;

    fn name(self) -> &'static str;

    /// Decide whether `role` may move an entity from `current` to `requested`
    fn check(current: Self, requested: Self, role: Role) -> Result<(), LifecycleViolation>;
}

/// Entry point used by the services
pub fn check_transition<S: Lifecycle>(
    current: S,
    requested: S,
    role: Role,
) -> Result<(), LifecycleViolation> {
    S::check(current, requested, role)
}

pub fn ensure_contract_active(status: ContractStatus) -> Result<(), LifecycleViolation> {
    if status == ContractStatus::Active {
        Ok(())
    } else {
        Err(LifecycleViolation::ContractNotActive)
    }
}

/// Titles, descriptions, dates and point values belong to the parent
pub fn ensure_details_editable(entity: &'static str, role: Role) -> Result<(), LifecycleViolation> {
    match role {
        Role::Parent => Ok(()),
        Role::Child => Err(LifecycleViolation::DetailsLocked { entity }),
    }
}

fn illegal<S: Lifecycle>(from: S, to: S) -> LifecycleViolation {
    LifecycleViolation::IllegalTransition {
        entity: S::ENTITY,
        from: from.name(),
        to: to.name(),
    }
}

fn role_mismatch<S: Lifecycle>(role: Role, requested: S) -> LifecycleViolation {
    LifecycleViolation::RoleMismatch {
        entity: S::ENTITY,
        role,
        requested: requested.name(),
    }
}

impl Lifecycle for ContractStatus {
    const ENTITY: &'static str = "contract";

    fn name(self) -> &'static str {
        self.as_str()
    }

    fn check(current: Self, requested: Self, _role: Role) -> Result<(), LifecycleViolation> {
        use ContractStatus::*;

        match (current, requested) {
            (from, to) if from == to => Ok(()),
            (Active, Completed) | (Active, Terminated) => Ok(()),
            (from, to) => Err(illegal(from, to)),
        }
    }
}

impl Lifecycle for TaskStatus {
    const ENTITY: &'static str = "task";

    fn name(self) -> &'static str {
        self.as_str()
    }

    fn check(current: Self, requested: Self, role: Role) -> Result<(), LifecycleViolation> {
        use TaskStatus::*;

        match role {
            Role::Parent => Ok(()),
            Role::Child => match (current, requested) {
                (_, Pending) | (_, Failed) => Err(role_mismatch(role, requested)),
                (Pending, Completed) | (Completed, Completed) => Ok(()),
                (from, to) => Err(illegal(from, to)),
            },
        }
    }
}

impl Lifecycle for RewardStatus {
    const ENTITY: &'static str = "reward";

    fn name(self) -> &'static str {
        self.as_str()
    }

    fn check(current: Self, requested: Self, role: Role) -> Result<(), LifecycleViolation> {
        use RewardStatus::*;

        let (allowed, from) = match role {
            Role::Child => (Claimed, Available),
            Role::Parent => (Completed, Claimed),
        };

        if requested != allowed {
            return Err(role_mismatch(role, requested));
        }
        if current != from {
            return Err(illegal(current, requested));
        }
        Ok(())
    }
}
