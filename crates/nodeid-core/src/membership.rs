//! Cluster membership view: member aliases and oldest-node selection.
//!
//! The oldest member is the one with the lowest join order. Ties on join
//! order break on the identity string. The answer only changes when a
//! member joins or leaves.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::id::NodeId;

/// One member of the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member identity
    pub id: NodeId,
    /// Display alias
    pub alias: String,
    /// Registration order; lower joined earlier
    pub join_order: u64,
}

impl Member {
    /// Create a member record.
    pub fn new(id: NodeId, alias: impl Into<String>, join_order: u64) -> Self {
        Self {
            id,
            alias: alias.into(),
            join_order,
        }
    }

    fn seniority(&self) -> (u64, &NodeId) {
        (self.join_order, &self.id)
    }
}

/// Immutable-by-default view of known members, keyed by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    members: BTreeMap<NodeId, Member>,
}

impl Membership {
    /// Empty membership.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-node membership: the node is its own alias and the oldest.
    #[must_use]
    pub fn single(id: NodeId) -> Self {
        let mut membership = Self::new();
        let alias = id.to_string();
        membership.join(Member::new(id, alias, 0));
        membership
    }

    /// Add a member. Returns true if the member was new.
    ///
    /// Re-joining a known id updates its alias but keeps the original join
    /// order, so seniority only moves on a real join or leave.
    pub fn join(&mut self, member: Member) -> bool {
        match self.members.entry(member.id.clone()) {
            Entry::Occupied(mut known) => {
                known.get_mut().alias = member.alias;
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(member);
                true
            }
        }
    }

    /// Remove a member.
    pub fn leave(&mut self, id: &NodeId) -> Option<Member> {
        self.members.remove(id)
    }

    /// Look up a member by identity.
    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&Member> {
        self.members.get(id)
    }

    /// Number of known members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if no members are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The member with the earliest join order.
    #[must_use]
    pub fn oldest(&self) -> Option<&Member> {
        self.members.values().min_by(|a, b| a.seniority().cmp(&b.seniority()))
    }

    /// True iff `id` is a member and no other member joined earlier.
    #[must_use]
    pub fn is_oldest(&self, id: &NodeId) -> bool {
        self.oldest().is_some_and(|m| &m.id == id)
    }

    /// Identity to alias mapping.
    #[must_use]
    pub fn aliases(&self) -> HashMap<String, String> {
        self.members
            .values()
            .map(|m| (m.id.to_string(), m.alias.clone()))
            .collect()
    }

    /// All member identities.
    #[must_use]
    pub fn member_ids(&self) -> BTreeSet<NodeId> {
        self.members.keys().cloned().collect()
    }
}
