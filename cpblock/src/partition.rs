//! Block and role assignments for every node.

use serde::Serialize;
use std::collections::HashMap;

/// Core (x = 1) or periphery (x = 0) role of a node within its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    /// x = 0
    Periphery,
    /// x = 1
    Core,
}

impl Role {
    /// Both roles in candidate order `{0, 1}`
    pub const ALL: [Role; 2] = [Role::Periphery, Role::Core];

    /// Column index into `[periphery, core]` pairs
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Role::Periphery => 0,
            Role::Core => 1,
        }
    }

    /// The flag `x` as a number
    #[inline]
    pub fn x(self) -> f64 {
        match self {
            Role::Periphery => 0.0,
            Role::Core => 1.0,
        }
    }

    /// `x_a + x_b - x_a x_b`: whether a pair with these roles is scored
    #[inline]
    pub fn either_core(self, other: Role) -> bool {
        self == Role::Core || other == Role::Core
    }
}

/// Assignment `(c_i, x_i)` for every node `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    /// Block id `c_i` of each node
    pub block: Vec<usize>,
    /// Role `x_i` of each node
    pub role: Vec<Role>,
}

impl Partition {
    /// Every node in its own block, all core.
    pub fn singletons(n: usize) -> Self {
        Partition {
            block: (0..n).collect(),
            role: vec![Role::Core; n],
        }
    }

    /// Build from explicit block ids and core flags.
    pub fn from_parts(block: Vec<usize>, is_core: &[bool]) -> Self {
        debug_assert_eq!(block.len(), is_core.len());
        let role = is_core
            .iter()
            .map(|&c| if c { Role::Core } else { Role::Periphery })
            .collect();
        Partition { block, role }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.block.len()
    }

    /// Whether there are no nodes
    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    /// Assignment of node `i`
    #[inline]
    pub fn get(&self, i: usize) -> (usize, Role) {
        (self.block[i], self.role[i])
    }

    /// Overwrite the assignment of node `i`
    #[inline]
    pub fn set(&mut self, i: usize, block: usize, role: Role) {
        self.block[i] = block;
        self.role[i] = role;
    }

    /// One past the largest block id (zero if empty)
    pub fn block_bound(&self) -> usize {
        self.block.iter().max().map(|&b| b + 1).unwrap_or(0)
    }

    /// Number of distinct block ids in use
    pub fn num_blocks(&self) -> usize {
        let mut used = vec![false; self.block_bound()];
        for &b in &self.block {
            used[b] = true;
        }
        used.iter().filter(|&&u| u).count()
    }

    /// Indices of nodes holding the core role
    pub fn core_nodes(&self) -> Vec<usize> {
        self.role
            .iter()
            .enumerate()
            .filter(|(_, r)| **r == Role::Core)
            .map(|(i, _)| i)
            .collect()
    }

    /// Members of each block, indexed by block id
    pub fn block_members(&self) -> Vec<Vec<usize>> {
        let mut members = vec![vec![]; self.block_bound()];
        for (i, &b) in self.block.iter().enumerate() {
            members[b].push(i);
        }
        members
    }

    /// Compact block ids to `0..K` in order of first appearance.
    ///
    /// Roles are untouched. Applying it twice gives the same result.
    pub fn relabel(&mut self) {
        let mut relabel_map: HashMap<usize, usize> = HashMap::new();
        for b in self.block.iter_mut() {
            let next = relabel_map.len();
            *b = *relabel_map.entry(*b).or_insert(next);
        }
    }

    /// Relabeled copy
    pub fn relabeled(&self) -> Self {
        let mut ret = self.clone();
        ret.relabel();
        ret
    }
}
