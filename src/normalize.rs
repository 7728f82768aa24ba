//! Normalization rewrites an arbitrary EL ontology into eight flat normal
//! forms (NF-A through NF-H) by repeatedly applying eight shape-directed
//! rewrite rules to a work queue until no rule fires. Each rule either
//! leaves a statement alone (it is already in normal form and gets
//! classified) or replaces it with one or more simpler statements that are
//! themselves re-queued, so later rules never need to special-case partially
//! rewritten input.

use std::collections::VecDeque;

use itertools::Itertools;

use crate::entities::{ClassId, Entities, IndividualId, PropertyId};
use crate::error::{OwlError, OwlResult};
use crate::model::{ClassExpr, Ontology, RoleExpr, Statement};

/// A statement in one of the eight normal forms. Every statement produced by
/// `normalize` is one of these variants; the completion engine and the ABox
/// saturator only ever see normal-form statements, never raw `Statement`s.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormalizedStatement {
    /// NF-A: `A ⊑ B`
    SubClassAtomic(ClassId, ClassId),
    /// NF-B: `C1 ⊓ ... ⊓ Cn ⊑ D`
    ConjunctionSubClass(Vec<ClassId>, ClassId),
    /// NF-C: `A ⊑ ∃r.B`
    SubExistential(ClassId, PropertyId, ClassId),
    /// NF-D: `∃r.A ⊑ B`
    ExistentialSubClass(PropertyId, ClassId, ClassId),
    /// NF-E: `r ⊑ s`
    SubProperty(PropertyId, PropertyId),
    /// NF-F: `r ∘ s ⊑ q`
    RoleChain(PropertyId, PropertyId, PropertyId),
    /// NF-G: `ClassAssertion(A, i)`
    ClassAssertion(ClassId, IndividualId),
    /// NF-H: `ObjectPropertyAssertion(r, i, j)`
    ObjectPropertyAssertion(PropertyId, IndividualId, IndividualId),
}

/// The output of normalization: the (possibly extended) entity arena plus
/// the flat normal-form statements, with enough bookkeeping to tell an
/// original entity apart from one minted during rewriting.
#[derive(Debug, Clone)]
pub struct NormalizedOntology {
    pub entities: Entities,
    pub statements: Vec<NormalizedStatement>,
    pub thing: ClassId,
    original_classes: usize,
    original_properties: usize,
    original_individuals: usize,
}

impl NormalizedOntology {
    pub fn is_original_class(&self, id: ClassId) -> bool {
        (id.0 as usize) < self.original_classes
    }
    pub fn is_original_property(&self, id: PropertyId) -> bool {
        (id.0 as usize) < self.original_properties
    }
    pub fn is_original_individual(&self, id: IndividualId) -> bool {
        (id.0 as usize) < self.original_individuals
    }
}

pub fn normalize(ontology: &Ontology) -> OwlResult<NormalizedOntology> {
    let mut entities = ontology.entities().clone();
    let original_classes = entities.class_count();
    let original_properties = entities.property_count();
    let original_individuals = entities.individual_count();
    let thing = ontology.thing_class();

    let mut queue: VecDeque<Statement> = ontology.statements().iter().cloned().collect();
    let mut normalized = Vec::new();

    while let Some(stmt) = queue.pop_front() {
        match rewrite_step(&stmt, &mut entities) {
            Some(replacements) => queue.extend(replacements),
            None => normalized.push(classify(stmt)?),
        }
    }

    Ok(NormalizedOntology {
        entities,
        statements: normalized,
        thing,
        original_classes,
        original_properties,
        original_individuals,
    })
}

/// Tries rules 1 through 8 in order, returning the replacement statements of
/// the first rule that matches, or `None` if `stmt` is already in one of the
/// eight normal forms.
fn rewrite_step(stmt: &Statement, ent: &mut Entities) -> Option<Vec<Statement>> {
    match stmt {
        // Rule 1: chain-split. A chain of length > 2 is split, via n-2
        // fresh intermediate roles, into a sequence of length-2 chains.
        Statement::SubObjectPropertyOf(RoleExpr::Chain(rs), target) if rs.len() > 2 => {
            Some(chain_split(rs, *target, ent))
        }

        // Rule 2: equivalence-split. An n-way equivalence becomes the full
        // set of ordered pairwise sub-statements.
        Statement::EquivalentClasses(exprs) => Some(equivalence_split_classes(exprs)),
        Statement::EquivalentObjectProperties(props) => Some(equivalence_split_properties(props)),

        // Rule 3: conjunction-on-rhs. `A ⊑ B1 ⊓ ... ⊓ Bn` becomes n separate
        // sub-statements, one per conjunct.
        Statement::SubClassOf(lhs, ClassExpr::Intersection(rhss)) if rhss.len() >= 2 => {
            Some(rhss.iter().map(|b| Statement::SubClassOf(lhs.clone(), b.clone())).collect())
        }

        // Rule 4: complex-to-complex. Neither side is atomic: introduce a
        // fresh atomic class as an alias for the left side.
        Statement::SubClassOf(lhs, rhs) if !lhs.is_atomic() && !rhs.is_atomic() => {
            let x = ClassExpr::Class(ent.mint_class());
            Some(vec![
                Statement::SubClassOf(lhs.clone(), x.clone()),
                Statement::SubClassOf(x, rhs.clone()),
            ])
        }

        // Rule 5: conjunction-on-lhs with a non-atomic conjunct. Every
        // complex conjunct is aliased to a fresh atomic class first.
        Statement::SubClassOf(ClassExpr::Intersection(cs), rhs) if cs.iter().any(|c| !c.is_atomic()) => {
            let mut out = Vec::new();
            let mut new_cs = Vec::with_capacity(cs.len());
            for c in cs {
                if c.is_atomic() {
                    new_cs.push(c.clone());
                } else {
                    let x = ent.mint_class();
                    out.push(Statement::SubClassOf(c.clone(), ClassExpr::Class(x)));
                    new_cs.push(ClassExpr::Class(x));
                }
            }
            out.push(Statement::SubClassOf(ClassExpr::Intersection(new_cs), rhs.clone()));
            Some(out)
        }

        // Rule 6: non-atomic filler on an existential on the left.
        Statement::SubClassOf(ClassExpr::SomeValuesFrom(r, filler), rhs) if !filler.is_atomic() => {
            let x = ent.mint_class();
            Some(vec![
                Statement::SubClassOf((**filler).clone(), ClassExpr::Class(x)),
                Statement::SubClassOf(
                    ClassExpr::SomeValuesFrom(*r, Box::new(ClassExpr::Class(x))),
                    rhs.clone(),
                ),
            ])
        }

        // Rule 7: non-atomic filler on an existential on the right.
        Statement::SubClassOf(lhs, ClassExpr::SomeValuesFrom(r, filler)) if !filler.is_atomic() => {
            let x = ent.mint_class();
            Some(vec![
                Statement::SubClassOf((**filler).clone(), ClassExpr::Class(x)),
                Statement::SubClassOf(
                    lhs.clone(),
                    ClassExpr::SomeValuesFrom(*r, Box::new(ClassExpr::Class(x))),
                ),
            ])
        }

        // Rule 8: a class assertion against a non-atomic class expression.
        Statement::ClassAssertion(c, ind) if !c.is_atomic() => {
            let x = ent.mint_class();
            Some(vec![
                Statement::SubClassOf(ClassExpr::Class(x), c.clone()),
                Statement::ClassAssertion(ClassExpr::Class(x), *ind),
            ])
        }

        _ => None,
    }
}

fn equivalence_split_classes(exprs: &[ClassExpr]) -> Vec<Statement> {
    exprs.iter().permutations(2).map(|pair| Statement::SubClassOf(pair[0].clone(), pair[1].clone())).collect()
}

fn equivalence_split_properties(props: &[PropertyId]) -> Vec<Statement> {
    props
        .iter()
        .permutations(2)
        .map(|pair| Statement::SubObjectPropertyOf(RoleExpr::Property(*pair[0]), *pair[1]))
        .collect()
}

/// Splits an n-ary chain `r_1 ∘ r_2 ∘ ... ∘ r_n ⊑ target` into n-1 length-2
/// chains, introducing fresh roles `u_1, ..., u_{n-2}` for the running
/// left-to-right composition: `r1∘r2⊑u1`, `u1∘r3⊑u2`, ..., `u_{n-2}∘r_n⊑target`.
fn chain_split(rs: &[PropertyId], target: PropertyId, ent: &mut Entities) -> Vec<Statement> {
    let n = rs.len();
    debug_assert!(n > 2);
    let fresh: Vec<PropertyId> = (0..n - 2).map(|_| ent.mint_property()).collect();

    let mut out = Vec::with_capacity(n - 1);
    out.push(Statement::SubObjectPropertyOf(RoleExpr::Chain(vec![rs[0], rs[1]]), fresh[0]));
    for k in 1..n - 2 {
        out.push(Statement::SubObjectPropertyOf(RoleExpr::Chain(vec![fresh[k - 1], rs[k + 1]]), fresh[k]));
    }
    out.push(Statement::SubObjectPropertyOf(RoleExpr::Chain(vec![fresh[n - 3], rs[n - 1]]), target));
    out
}

/// Classifies a statement that no rule rewrote further into its normal form.
/// Reaching the catch-all arm means `rewrite_step` let through a shape that
/// isn't actually flat, which is a bug in the rule set, not recoverable
/// input - hence a dedicated error variant rather than a panic.
fn classify(stmt: Statement) -> OwlResult<NormalizedStatement> {
    match stmt {
        Statement::SubClassOf(ClassExpr::Class(a), ClassExpr::Class(b)) => {
            Ok(NormalizedStatement::SubClassAtomic(a, b))
        }
        Statement::SubClassOf(ClassExpr::Intersection(cs), ClassExpr::Class(b))
            if cs.len() >= 2 && cs.iter().all(ClassExpr::is_atomic) =>
        {
            let ids = cs.iter().map(|c| c.as_atomic().unwrap()).collect();
            Ok(NormalizedStatement::ConjunctionSubClass(ids, b))
        }
        Statement::SubClassOf(ClassExpr::Class(a), ClassExpr::SomeValuesFrom(r, filler))
            if filler.is_atomic() =>
        {
            Ok(NormalizedStatement::SubExistential(a, r, filler.as_atomic().unwrap()))
        }
        Statement::SubClassOf(ClassExpr::SomeValuesFrom(r, filler), ClassExpr::Class(b))
            if filler.is_atomic() =>
        {
            Ok(NormalizedStatement::ExistentialSubClass(r, filler.as_atomic().unwrap(), b))
        }
        Statement::SubObjectPropertyOf(RoleExpr::Property(p), q) => Ok(NormalizedStatement::SubProperty(p, q)),
        Statement::SubObjectPropertyOf(RoleExpr::Chain(chain), q) if chain.len() == 2 => {
            Ok(NormalizedStatement::RoleChain(chain[0], chain[1], q))
        }
        Statement::ClassAssertion(ClassExpr::Class(a), ind) => Ok(NormalizedStatement::ClassAssertion(a, ind)),
        Statement::ObjectPropertyAssertion(p, a, b) => Ok(NormalizedStatement::ObjectPropertyAssertion(p, a, b)),
        other => Err(OwlError::NormalizationInvariantViolation(format!("{other:?}"))),
    }
}
