//! ABox saturation: given the class-subsumption result, compute the full set
//! of derivable class assertions and object-property assertions.
//!
//! Class-assertion closure is a direct projection through `subsumers_c`.
//! Property-assertion closure is its own small fixpoint over the role
//! hierarchy's chain axioms, seeded from the asserted facts widened by
//! simple role subsumption.

use crate::entities::{ClassId, IndividualId, PropertyId};
use crate::normalize::{NormalizedOntology, NormalizedStatement};
use crate::rbox::RoleHierarchy;
use crate::store::{PairStore, TripletStore};

#[derive(Debug, Clone, Default)]
pub struct SaturatedAbox {
    pub class_assertions: Vec<(IndividualId, ClassId)>,
    pub object_property_assertions: Vec<(PropertyId, IndividualId, IndividualId)>,
}

pub fn saturate(
    norm: &NormalizedOntology,
    rbox: &RoleHierarchy,
    subsumers_c: &PairStore<ClassId, ClassId>,
) -> SaturatedAbox {
    let class_assertions = saturate_class_assertions(norm, subsumers_c);
    let object_property_assertions = saturate_property_assertions(norm, rbox);
    SaturatedAbox { class_assertions, object_property_assertions }
}

/// For every asserted `ClassAssertion(C, i)`, emits `(i, D)` for every `D`
/// that `C` is derived to subsume, excluding classes minted during
/// normalization (those are implementation artifacts with no meaning in the
/// original ontology's namespace).
fn saturate_class_assertions(
    norm: &NormalizedOntology,
    subsumers_c: &PairStore<ClassId, ClassId>,
) -> Vec<(IndividualId, ClassId)> {
    let mut out = Vec::new();
    for stmt in &norm.statements {
        if let NormalizedStatement::ClassAssertion(cls, ind) = stmt {
            for d in subsumers_c.pairs_with_first(*cls) {
                if norm.is_original_class(d) {
                    out.push((*ind, d));
                }
            }
        }
    }
    out
}

/// Widens every asserted `ObjectPropertyAssertion(r, a, b)` by role
/// subsumption, then saturates under the role-chain axioms to a fixpoint.
/// The chain step is careful to keep the three individuals distinct
/// (`a`, `m`, `b`) rather than reusing one variable for both the middle and
/// an endpoint, and to project the derived property `q` through
/// `subsumers_r` again (`q ⊑ q'`) before recording it - collapsing either of
/// those keeps the closure from reaching facts that are genuinely entailed.
fn saturate_property_assertions(
    norm: &NormalizedOntology,
    rbox: &RoleHierarchy,
) -> Vec<(PropertyId, IndividualId, IndividualId)> {
    let mut s: TripletStore<PropertyId, IndividualId, IndividualId> = TripletStore::default();

    for stmt in &norm.statements {
        if let NormalizedStatement::ObjectPropertyAssertion(r, a, b) = stmt {
            for q in rbox.subsumers_r.pairs_with_first(*r) {
                s.add(q, *a, *b);
            }
        }
    }

    let chains: Vec<(PropertyId, PropertyId, PropertyId)> = norm
        .statements
        .iter()
        .filter_map(|st| match st {
            NormalizedStatement::RoleChain(r, s2, q) => Some((*r, *s2, *q)),
            _ => None,
        })
        .collect();

    loop {
        let mut additions = Vec::new();
        for (r, s2, q) in &chains {
            for (a, m) in s.triples_with_first(*r) {
                for b in s.triples_with_first_two(*s2, m) {
                    for qp in rbox.subsumers_r.pairs_with_first(*q) {
                        if !s.contains(qp, a, b) {
                            additions.push((qp, a, b));
                        }
                    }
                }
            }
        }
        if additions.is_empty() {
            break;
        }
        for (p, a, b) in additions {
            s.add(p, a, b);
        }
    }

    s.iter()
        .filter(|(p, _, _)| norm.is_original_property(*p))
        .map(|&(p, a, b)| (p, a, b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassExpr, Ontology, RoleExpr, Statement};
    use crate::normalize::normalize;
    use crate::reasoning::completion::classify;

    #[test]
    fn class_assertion_closure_follows_subsumption() {
        let mut o = Ontology::new();
        let person = o.intern_class("http://ex.org/Person").unwrap();
        let agent = o.intern_class("http://ex.org/Agent").unwrap();
        let alice = o.intern_individual("http://ex.org/alice").unwrap();
        o.add_statement(Statement::SubClassOf(ClassExpr::Class(person), ClassExpr::Class(agent)));
        o.add_statement(Statement::ClassAssertion(ClassExpr::Class(person), alice));

        let norm = normalize(&o).unwrap();
        let rbox = crate::rbox::build_role_hierarchy(&norm);
        let completion = classify(&norm, &rbox);
        let abox = saturate(&norm, &rbox, &completion.subsumers_c);

        assert!(abox.class_assertions.contains(&(alice, person)));
        assert!(abox.class_assertions.contains(&(alice, agent)));
        assert!(abox.class_assertions.contains(&(alice, norm.thing)));
    }

    #[test]
    fn property_assertion_closure_follows_chains() {
        let mut o = Ontology::new();
        let has_parent = o.intern_property("http://ex.org/hasParent").unwrap();
        let has_ancestor = o.intern_property("http://ex.org/hasAncestor").unwrap();
        let alice = o.intern_individual("http://ex.org/alice").unwrap();
        let bob = o.intern_individual("http://ex.org/bob").unwrap();
        let carol = o.intern_individual("http://ex.org/carol").unwrap();
        o.add_statement(Statement::SubObjectPropertyOf(
            RoleExpr::Chain(vec![has_parent, has_parent]),
            has_ancestor,
        ));
        o.add_statement(Statement::ObjectPropertyAssertion(has_parent, alice, bob));
        o.add_statement(Statement::ObjectPropertyAssertion(has_parent, bob, carol));

        let norm = normalize(&o).unwrap();
        let rbox = crate::rbox::build_role_hierarchy(&norm);
        let completion = classify(&norm, &rbox);
        let abox = saturate(&norm, &rbox, &completion.subsumers_c);

        assert!(abox.object_property_assertions.contains(&(has_ancestor, alice, carol)));
    }

    /// Re-saturating over facts that are *already* the output of a previous
    /// saturation pass must not derive anything new: this builds a second
    /// ontology whose TBox/RBox match the first but whose ABox is exactly
    /// the first pass's saturated `ClassAssertion`/`ObjectPropertyAssertion`
    /// tables, then checks the second pass's tables contain the same facts
    /// and no more. Calling `saturate` twice on the same *unsaturated* input
    /// (as a naive idempotence test would) proves nothing, since `saturate`
    /// is a pure function of its arguments either way.
    #[test]
    fn saturation_is_idempotent_over_already_saturated_facts() {
        let mut o = Ontology::new();
        let person = o.intern_class("http://ex.org/Person").unwrap();
        let agent = o.intern_class("http://ex.org/Agent").unwrap();
        let has_parent = o.intern_property("http://ex.org/hasParent").unwrap();
        let has_grandparent = o.intern_property("http://ex.org/hasGrandparent").unwrap();
        let alice = o.intern_individual("http://ex.org/alice").unwrap();
        let bob = o.intern_individual("http://ex.org/bob").unwrap();
        let carol = o.intern_individual("http://ex.org/carol").unwrap();

        o.add_statement(Statement::SubClassOf(ClassExpr::Class(person), ClassExpr::Class(agent)));
        o.add_statement(Statement::SubObjectPropertyOf(
            RoleExpr::Chain(vec![has_parent, has_parent]),
            has_grandparent,
        ));
        o.add_statement(Statement::ClassAssertion(ClassExpr::Class(person), alice));
        o.add_statement(Statement::ObjectPropertyAssertion(has_parent, alice, bob));
        o.add_statement(Statement::ObjectPropertyAssertion(has_parent, bob, carol));

        let norm = normalize(&o).unwrap();
        let rbox = crate::rbox::build_role_hierarchy(&norm);
        let completion = classify(&norm, &rbox);
        let first = saturate(&norm, &rbox, &completion.subsumers_c);

        // Same TBox/RBox, but the ABox is the first pass's own output.
        let mut o2 = Ontology::new();
        let person2 = o2.intern_class("http://ex.org/Person").unwrap();
        let agent2 = o2.intern_class("http://ex.org/Agent").unwrap();
        let has_parent2 = o2.intern_property("http://ex.org/hasParent").unwrap();
        let has_grandparent2 = o2.intern_property("http://ex.org/hasGrandparent").unwrap();
        o2.add_statement(Statement::SubClassOf(ClassExpr::Class(person2), ClassExpr::Class(agent2)));
        o2.add_statement(Statement::SubObjectPropertyOf(
            RoleExpr::Chain(vec![has_parent2, has_parent2]),
            has_grandparent2,
        ));
        for (ind, cls) in &first.class_assertions {
            let ind_id = o2.intern_individual(norm.entities.individual_iri(*ind)).unwrap();
            let cls_id = o2.intern_class(norm.entities.class_iri(*cls)).unwrap();
            o2.add_statement(Statement::ClassAssertion(ClassExpr::Class(cls_id), ind_id));
        }
        for (p, a, b) in &first.object_property_assertions {
            let p_id = o2.intern_property(norm.entities.property_iri(*p)).unwrap();
            let a_id = o2.intern_individual(norm.entities.individual_iri(*a)).unwrap();
            let b_id = o2.intern_individual(norm.entities.individual_iri(*b)).unwrap();
            o2.add_statement(Statement::ObjectPropertyAssertion(p_id, a_id, b_id));
        }

        let norm2 = normalize(&o2).unwrap();
        let rbox2 = crate::rbox::build_role_hierarchy(&norm2);
        let completion2 = classify(&norm2, &rbox2);
        let second = saturate(&norm2, &rbox2, &completion2.subsumers_c);

        let class_facts = |ont: &NormalizedOntology, facts: &[(IndividualId, ClassId)]| {
            facts
                .iter()
                .map(|(i, c)| (ont.entities.individual_iri(*i).to_string(), ont.entities.class_iri(*c).to_string()))
                .collect::<std::collections::HashSet<_>>()
        };
        let property_facts = |ont: &NormalizedOntology, facts: &[(PropertyId, IndividualId, IndividualId)]| {
            facts
                .iter()
                .map(|(p, a, b)| {
                    (
                        ont.entities.property_iri(*p).to_string(),
                        ont.entities.individual_iri(*a).to_string(),
                        ont.entities.individual_iri(*b).to_string(),
                    )
                })
                .collect::<std::collections::HashSet<_>>()
        };

        assert_eq!(class_facts(&norm, &first.class_assertions), class_facts(&norm2, &second.class_assertions));
        assert_eq!(
            property_facts(&norm, &first.object_property_assertions),
            property_facts(&norm2, &second.object_property_assertions)
        );
    }
}
