//! Builds the role hierarchy: the reflexive-transitive closure of simple
//! role subsumption, plus the two chain indices the completion engine needs
//! to propagate existential edges in constant time per lookup.

use crate::entities::PropertyId;
use crate::normalize::{NormalizedOntology, NormalizedStatement};
use crate::store::{PairStore, TripletStore};

/// `subsumers_r` is reflexive and transitive: every role subsumes itself,
/// and `r ⊑ s ⊑ q` implies `r ⊑ q`.
///
/// `chain_left` stores `r ∘ s ⊑ q` triples indexed by `r` (the left operand
/// of the chain), yielding `(s, q)` pairs - used when an edge labelled `r`
/// is the *first* leg of a chain. `chain_right` stores the same axioms
/// indexed by `s` (the right operand), yielding `(r, q)` pairs - used when
/// an edge labelled `s` is the *second* leg.
#[derive(Debug, Clone, Default)]
pub struct RoleHierarchy {
    pub subsumers_r: PairStore<PropertyId, PropertyId>,
    pub chain_left: TripletStore<PropertyId, PropertyId, PropertyId>,
    pub chain_right: TripletStore<PropertyId, PropertyId, PropertyId>,
}

pub fn build_role_hierarchy(norm: &NormalizedOntology) -> RoleHierarchy {
    let mut subsumers_r: PairStore<PropertyId, PropertyId> = PairStore::default();

    for p in norm.entities.property_ids() {
        subsumers_r.add(p, p);
    }
    for stmt in &norm.statements {
        if let NormalizedStatement::SubProperty(r, s) = stmt {
            subsumers_r.add(*r, *s);
        }
    }

    // Transitive closure by repeated relational join: (r,s) and (s,t) in the
    // store imply (r,t). Fixpoint loop rather than a graph-search traversal
    // to keep this a direct use of PairStore's own API.
    loop {
        let mut additions = Vec::new();
        for &(r, s) in subsumers_r.iter() {
            for t in subsumers_r.pairs_with_first(s) {
                if !subsumers_r.contains(r, t) {
                    additions.push((r, t));
                }
            }
        }
        if additions.is_empty() {
            break;
        }
        for (r, t) in additions {
            subsumers_r.add(r, t);
        }
    }

    let mut chain_left: TripletStore<PropertyId, PropertyId, PropertyId> = TripletStore::default();
    let mut chain_right: TripletStore<PropertyId, PropertyId, PropertyId> = TripletStore::default();
    for stmt in &norm.statements {
        if let NormalizedStatement::RoleChain(r, s, q) = stmt {
            chain_left.add(*r, *s, *q);
            chain_right.add(*s, *r, *q);
        }
    }

    RoleHierarchy { subsumers_r, chain_left, chain_right }
}
