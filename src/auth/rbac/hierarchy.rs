//! Role hierarchy used for management delegation

use super::types::Role;
use crate::utils::error::{Result, StoreRateError};
use std::collections::{HashMap, HashSet};

/// Total order over roles; a higher rank carries more authority
#[derive(Debug, Clone)]
pub struct RoleHierarchy {
    ranks: HashMap<Role, u8>,
}

impl RoleHierarchy {
    /// Build a hierarchy from explicit ranks
    ///
    /// Ranks must be positive and pairwise distinct.
    pub fn new(ranks: impl IntoIterator<Item = (Role, u8)>) -> Result<Self> {
        let ranks: HashMap<Role, u8> = ranks.into_iter().collect();

        let mut seen = HashSet::new();
        for (role, rank) in &ranks {
            if *rank == 0 {
                return Err(StoreRateError::config(format!(
                    "Role {} must have a positive rank",
                    role
                )));
            }
            if !seen.insert(*rank) {
                return Err(StoreRateError::config(format!(
                    "Rank {} is assigned to more than one role",
                    rank
                )));
            }
        }

        Ok(Self { ranks })
    }

    pub fn rank(&self, role: Role) -> Option<u8> {
        self.ranks.get(&role).copied()
    }

    /// Rank of a raw role name; unknown names have no rank
    pub fn rank_of(&self, role: &str) -> Option<u8> {
        Role::parse(role).and_then(|role| self.rank(role))
    }

    /// `a` strictly outranks `b`; undefined ranks never outrank anything
    pub fn outranks(&self, a: Role, b: Role) -> bool {
        match (self.rank(a), self.rank(b)) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }

    /// The role with the highest rank
    pub fn top(&self) -> Option<Role> {
        self.ranks
            .iter()
            .max_by_key(|(_, rank)| **rank)
            .map(|(role, _)| *role)
    }
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self {
            ranks: HashMap::from([
                (Role::SystemAdmin, 3),
                (Role::StoreOwner, 2),
                (Role::NormalUser, 1),
            ]),
        }
    }
}
