//! The EL profile data model: class and role expressions, the six kinds of
//! statement an ontology can assert, and the `Ontology` container itself.

use crate::entities::{ClassId, Entities, Entity, EntityKind, IndividualId, PropertyId};
use crate::error::{OwlError, OwlResult};
use crate::iri;
use indexmap::IndexMap;

/// `owl:Thing`, implicitly a superclass of every class. Every `Ontology`
/// interns it during construction so `thing_class()` is always valid.
pub const OWL_THING_IRI: &str = "http://www.w3.org/2002/07/owl#Thing";

/// `rdf:type`, the predicate a class-assertion triple pattern projects to in
/// conjunctive queries.
pub const RDF_TYPE_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// A class expression. The EL profile admits only atomic classes,
/// conjunctions of two or more class expressions, and existential
/// restrictions - this sealed set is exhaustively matched everywhere a
/// `ClassExpr` is consumed, so adding a disjunction or a cardinality
/// restriction would be a compile error at every call site, not a silent gap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassExpr {
    Class(ClassId),
    Intersection(Vec<ClassExpr>),
    SomeValuesFrom(PropertyId, Box<ClassExpr>),
}

impl ClassExpr {
    pub fn is_atomic(&self) -> bool {
        matches!(self, ClassExpr::Class(_))
    }

    pub fn as_atomic(&self) -> Option<ClassId> {
        match self {
            ClassExpr::Class(c) => Some(*c),
            _ => None,
        }
    }
}

/// A role (object property) expression: either a single property, or a
/// chain of two or more properties composed left to right.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleExpr {
    Property(PropertyId),
    Chain(Vec<PropertyId>),
}

/// The six statement kinds an EL ontology can assert. `EquivalentClasses`
/// and `EquivalentObjectProperties` are kept as distinct variants (rather
/// than a single generic "equivalence" case over a mixed vector) precisely
/// so that normalization's equivalence-split rule can never accidentally
/// pair a class with a property - the match arms are exhaustive over two
/// disjoint types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    SubClassOf(ClassExpr, ClassExpr),
    EquivalentClasses(Vec<ClassExpr>),
    SubObjectPropertyOf(RoleExpr, PropertyId),
    EquivalentObjectProperties(Vec<PropertyId>),
    ClassAssertion(ClassExpr, IndividualId),
    ObjectPropertyAssertion(PropertyId, IndividualId, IndividualId),
}

/// A mutable ontology under construction: an entity arena, the statements
/// asserted over it, and a prefix table for IRI abbreviation.
#[derive(Debug, Clone)]
pub struct Ontology {
    entities: Entities,
    statements: Vec<Statement>,
    prefixes: IndexMap<String, String>,
    thing: ClassId,
}

impl Default for Ontology {
    fn default() -> Self {
        Self::new()
    }
}

impl Ontology {
    pub fn new() -> Self {
        let mut entities = Entities::default();
        let thing = entities.intern_class(OWL_THING_IRI);
        Ontology { entities, statements: Vec::new(), prefixes: IndexMap::new(), thing }
    }

    pub fn thing_class(&self) -> ClassId {
        self.thing
    }

    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut Entities {
        &mut self.entities
    }

    pub fn intern_entity(&mut self, kind: EntityKind, iri_str: &str) -> OwlResult<Entity> {
        iri::validate(iri_str)?;
        Ok(self.entities.intern_entity(kind, iri_str))
    }

    pub fn mint_entity(&mut self, kind: EntityKind) -> Entity {
        self.entities.mint_entity(kind)
    }

    pub fn add_statement(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn add_prefix(&mut self, prefix: &str, iri: &str) -> OwlResult<()> {
        if let Some(existing) = self.prefixes.get(prefix) {
            if existing != iri {
                return Err(OwlError::PrefixConflict {
                    prefix: prefix.to_string(),
                    existing: existing.clone(),
                    attempted: iri.to_string(),
                });
            }
            return Ok(());
        }
        self.prefixes.insert(prefix.to_string(), iri.to_string());
        Ok(())
    }

    pub fn prefix(&self, name: &str) -> Option<&str> {
        self.prefixes.get(name).map(String::as_str)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn tbox_size(&self) -> usize {
        self.statements
            .iter()
            .filter(|s| matches!(s, Statement::SubClassOf(..) | Statement::EquivalentClasses(_)))
            .count()
    }

    pub fn rbox_size(&self) -> usize {
        self.statements
            .iter()
            .filter(|s| {
                matches!(s, Statement::SubObjectPropertyOf(..) | Statement::EquivalentObjectProperties(_))
            })
            .count()
    }

    pub fn abox_size(&self) -> usize {
        self.statements
            .iter()
            .filter(|s| matches!(s, Statement::ClassAssertion(..) | Statement::ObjectPropertyAssertion(..)))
            .count()
    }
}

/// Convenience used in doc examples and by callers that build IRI-keyed
/// class expressions directly without going through a parser.
impl Ontology {
    pub fn intern_class(&mut self, iri_str: &str) -> OwlResult<ClassId> {
        iri::validate(iri_str)?;
        Ok(self.entities.intern_class(iri_str))
    }
    pub fn intern_property(&mut self, iri_str: &str) -> OwlResult<PropertyId> {
        iri::validate(iri_str)?;
        Ok(self.entities.intern_property(iri_str))
    }
    pub fn intern_individual(&mut self, iri_str: &str) -> OwlResult<IndividualId> {
        iri::validate(iri_str)?;
        Ok(self.entities.intern_individual(iri_str))
    }
}
