//! # Authorization Policy
//!
//! Pure decision function over `(role, action, resource, link)`. No I/O.
//!
//! Evaluation order:
//!
//! 1. Create and delete are parent-only for every resource. A child gets
//!    `Forbidden` here, before the resource is even looked at, so the answer
//!    is the same whether or not the target exists.
//! 2. Contract creation needs no link.
//! 3. Creating or deleting a task/reward, and deleting a contract, need the
//!    caller to own the contract (`Owner`).
//! 4. Reads and updates need the caller to be either party (`Owner` or
//!    `Target`).
//!
//! Anything failing steps 2-4 is `NotFound`, never `Forbidden`, so another
//! family's resources are indistinguishable from ones that do not exist.

use shared::Role;

use crate::domain::errors::DomainError;
use crate::domain::identity::Identity;
use crate::domain::models::contract::Contract;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Contract,
    Task,
    Reward,
}

impl Resource {
    pub fn noun(&self) -> &'static str {
        match self {
            Resource::Contract => "contract",
            Resource::Task => "task",
            Resource::Reward => "reward",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// How the caller relates to the contract a request touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractLink {
    /// Caller is the contract's parent
    Owner,
    /// Caller is the contract's child
    Target,
    /// Contract exists but belongs to someone else
    Unrelated,
    /// No live contract with that id
    Missing,
}

impl ContractLink {
    /// A parent can only ever be `parent_id` and a child only `child_id`,
    /// so the role decides which column is compared.
    pub fn resolve(identity: &Identity, contract: Option<&Contract>) -> Self {
        let Some(contract) = contract else {
            return ContractLink::Missing;
        };

        match identity.role {
            Role::Parent if contract.parent_id == identity.subject_id => ContractLink::Owner,
            Role::Child if contract.child_id == identity.subject_id => ContractLink::Target,
            _ => ContractLink::Unrelated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    NotFound,
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    /// Turn a decision into the error the service boundary reports
    pub fn enforce(self, action: Action, resource: Resource) -> Result<(), DomainError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(Denial::NotFound) => Err(DomainError::NotFound(resource.noun())),
            Decision::Deny(Denial::Forbidden) => Err(DomainError::Forbidden(format!(
                "only a parent can {} {}s",
                action.verb(),
                resource.noun()
            ))),
        }
    }

    /// `enforce` for creating a task or reward: when the owning contract is
    /// missing or foreign, the error names the contract, not the new item.
    pub fn enforce_create_within_contract(self, resource: Resource) -> Result<(), DomainError> {
        match self {
            Decision::Deny(Denial::NotFound) => Err(DomainError::NotFound(Resource::Contract.noun())),
            other => other.enforce(Action::Create, resource),
        }
    }
}

impl Action {
    fn verb(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

/// Whether the action is reserved to the parent role
pub fn requires_parent(action: Action) -> bool {
    matches!(action, Action::Create | Action::Delete)
}

pub fn authorize(role: Role, action: Action, resource: Resource, link: ContractLink) -> Decision {
    if requires_parent(action) && role != Role::Parent {
        return Decision::Deny(Denial::Forbidden);
    }

    let allowed = match (action, resource) {
        (Action::Create, Resource::Contract) => true,
        (Action::Create, _) | (Action::Delete, _) => link == ContractLink::Owner,
        (Action::Read, _) | (Action::Update, _) => {
            matches!(link, ContractLink::Owner | ContractLink::Target)
        }
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny(Denial::NotFound)
    }
}

/// Row filter for listings: parents see their own contracts, children the
/// contracts made for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility {
    pub subject_id: String,
    pub role: Role,
}

impl Visibility {
    pub fn of(identity: &Identity) -> Self {
        Self {
            subject_id: identity.subject_id.clone(),
            role: identity.role,
        }
    }

    /// Contract column compared against `subject_id`
    pub fn contract_column(&self) -> &'static str {
        match self.role {
            Role::Parent => "parent_id",
            Role::Child => "child_id",
        }
    }
}
