//! End-to-end scenarios exercising the full pipeline (normalize -> role
//! hierarchy -> class-subsumption completion -> ABox saturation -> query)
//! together, as opposed to each module's own unit tests which exercise a
//! single stage in isolation.

use el_reasoner::model::{ClassExpr, RoleExpr, Statement};
use el_reasoner::normalize::{normalize, NormalizedStatement};
use el_reasoner::rbox::build_role_hierarchy;
use el_reasoner::reasoning::abox::saturate;
use el_reasoner::reasoning::completion::classify;
use el_reasoner::reasoning::query::{answer_query, Query, Term};
use el_reasoner::{Ontology, Reasoner};

#[test]
fn subclass_transitivity_end_to_end() {
    let mut o = Ontology::new();
    let a = o.intern_class("http://ex.org/A").unwrap();
    let b = o.intern_class("http://ex.org/B").unwrap();
    let c = o.intern_class("http://ex.org/C").unwrap();
    o.add_statement(Statement::SubClassOf(ClassExpr::Class(a), ClassExpr::Class(b)));
    o.add_statement(Statement::SubClassOf(ClassExpr::Class(b), ClassExpr::Class(c)));

    let reasoner = Reasoner::build(o).unwrap();
    assert!(reasoner.is_subclass_of("http://ex.org/A", "http://ex.org/C").unwrap());
}

#[test]
fn equivalence_symmetry_end_to_end() {
    let mut o = Ontology::new();
    let a = o.intern_class("http://ex.org/A").unwrap();
    let b = o.intern_class("http://ex.org/B").unwrap();
    o.add_statement(Statement::EquivalentClasses(vec![ClassExpr::Class(a), ClassExpr::Class(b)]));

    let reasoner = Reasoner::build(o).unwrap();
    assert!(reasoner.is_subclass_of("http://ex.org/A", "http://ex.org/B").unwrap());
    assert!(reasoner.is_subclass_of("http://ex.org/B", "http://ex.org/A").unwrap());
}

#[test]
fn existential_propagation_through_derived_subsumer_end_to_end() {
    let mut o = Ontology::new();
    let woman = o.intern_class("http://ex.org/Woman").unwrap();
    let mother = o.intern_class("http://ex.org/Mother").unwrap();
    let person = o.intern_class("http://ex.org/Person").unwrap();
    let has_child = o.intern_property("http://ex.org/hasChild").unwrap();
    let alice = o.intern_individual("http://ex.org/alice").unwrap();

    o.add_statement(Statement::SubClassOf(ClassExpr::Class(woman), ClassExpr::Class(mother)));
    o.add_statement(Statement::SubClassOf(
        ClassExpr::Class(mother),
        ClassExpr::SomeValuesFrom(has_child, Box::new(ClassExpr::Class(person))),
    ));
    o.add_statement(Statement::ClassAssertion(ClassExpr::Class(woman), alice));

    let reasoner = Reasoner::build(o).unwrap();
    assert!(reasoner.is_subclass_of("http://ex.org/Woman", "http://ex.org/Mother").unwrap());

    // Alice is asserted a Woman; Woman ⊑ Mother is a *derived* (not
    // asserted) subsumer, and Mother ⊑ ∃hasChild.Person must still
    // propagate through it, so Alice's saturated class assertions include
    // Mother even though only `Woman(alice)` was ever asserted.
    let abox = reasoner.saturated_abox();
    let alice_id = reasoner.ontology().entities().find_individual("http://ex.org/alice").unwrap();
    let mother_id = reasoner.ontology().entities().find_class("http://ex.org/Mother").unwrap();
    assert!(abox.class_assertions.contains(&(alice_id, mother_id)));
}

#[test]
fn role_chain_derives_transitive_fact_end_to_end() {
    let mut o = Ontology::new();
    let has_parent = o.intern_property("http://ex.org/hasParent").unwrap();
    let has_grandparent = o.intern_property("http://ex.org/hasGrandparent").unwrap();
    let alice = o.intern_individual("http://ex.org/alice").unwrap();
    let bob = o.intern_individual("http://ex.org/bob").unwrap();
    let carol = o.intern_individual("http://ex.org/carol").unwrap();

    o.add_statement(Statement::SubObjectPropertyOf(
        RoleExpr::Chain(vec![has_parent, has_parent]),
        has_grandparent,
    ));
    o.add_statement(Statement::ObjectPropertyAssertion(has_parent, alice, bob));
    o.add_statement(Statement::ObjectPropertyAssertion(has_parent, bob, carol));

    let reasoner = Reasoner::build(o).unwrap();
    let abox = reasoner.saturated_abox();
    let alice_id = reasoner.ontology().entities().find_individual("http://ex.org/alice").unwrap();
    let carol_id = reasoner.ontology().entities().find_individual("http://ex.org/carol").unwrap();
    let has_grandparent_id = reasoner.ontology().entities().find_property("http://ex.org/hasGrandparent").unwrap();
    assert!(abox.object_property_assertions.contains(&(has_grandparent_id, alice_id, carol_id)));
}

#[test]
fn typed_bgp_query_end_to_end() {
    let mut o = Ontology::new();
    let person = o.intern_class("http://ex.org/Person").unwrap();
    let agent = o.intern_class("http://ex.org/Agent").unwrap();
    let alice = o.intern_individual("http://ex.org/alice").unwrap();
    o.add_statement(Statement::SubClassOf(ClassExpr::Class(person), ClassExpr::Class(agent)));
    o.add_statement(Statement::ClassAssertion(ClassExpr::Class(person), alice));

    let reasoner = Reasoner::build(o).unwrap();
    let query = Query {
        projection: vec!["x".into()],
        triples: vec![(
            Term::Variable("x".into()),
            Term::IRIRef(el_reasoner::model::RDF_TYPE_IRI.into()),
            Term::IRIRef("http://ex.org/Agent".into()),
        )],
        ..Default::default()
    };
    let rows = reasoner.answer_query(&query).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("x").unwrap(), "http://ex.org/alice");
}

#[test]
fn length_four_chain_normalizes_to_three_length_two_chains() {
    let mut o = Ontology::new();
    let r1 = o.intern_property("http://ex.org/r1").unwrap();
    let r2 = o.intern_property("http://ex.org/r2").unwrap();
    let r3 = o.intern_property("http://ex.org/r3").unwrap();
    let r4 = o.intern_property("http://ex.org/r4").unwrap();
    let target = o.intern_property("http://ex.org/target").unwrap();
    o.add_statement(Statement::SubObjectPropertyOf(RoleExpr::Chain(vec![r1, r2, r3, r4]), target));

    let norm = normalize(&o).unwrap();
    let chains: Vec<_> = norm
        .statements
        .iter()
        .filter_map(|s| match s {
            NormalizedStatement::RoleChain(a, b, c) => Some((*a, *b, *c)),
            _ => None,
        })
        .collect();
    assert_eq!(chains.len(), 3);
    let u1 = chains[0].2;
    let u2 = chains[1].2;
    assert_eq!(chains[0], (r1, r2, u1));
    assert_eq!(chains[1], (u1, r3, u2));
    assert_eq!(chains[2], (u2, r4, target));
}

#[test]
fn full_pipeline_is_reproducible_when_rerun_on_the_same_ontology() {
    let mut o = Ontology::new();
    let a = o.intern_class("http://ex.org/A").unwrap();
    let b = o.intern_class("http://ex.org/B").unwrap();
    let i = o.intern_individual("http://ex.org/i").unwrap();
    o.add_statement(Statement::SubClassOf(ClassExpr::Class(a), ClassExpr::Class(b)));
    o.add_statement(Statement::ClassAssertion(ClassExpr::Class(a), i));

    let norm1 = normalize(&o).unwrap();
    let rbox1 = build_role_hierarchy(&norm1);
    let completion1 = classify(&norm1, &rbox1);
    let abox1 = saturate(&norm1, &rbox1, &completion1.subsumers_c);

    let norm2 = normalize(&o).unwrap();
    let rbox2 = build_role_hierarchy(&norm2);
    let completion2 = classify(&norm2, &rbox2);
    let abox2 = saturate(&norm2, &rbox2, &completion2.subsumers_c);

    assert_eq!(abox1.class_assertions.len(), abox2.class_assertions.len());
    assert_eq!(completion1.subsumers_c.len(), completion2.subsumers_c.len());

    let _ = answer_query(
        &Query::default(),
        &norm1.entities,
        &abox1,
    );
}
