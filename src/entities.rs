//! Entity interning: classes, object properties, and individuals are never
//! stored as owned IRI strings in the hot reasoning path. Each is interned
//! once into an arena and referred to everywhere else by a small `Copy`
//! handle (`ClassId`, `PropertyId`, `IndividualId`). This keeps the
//! completion engine's per-node queues and indices working over `u32`s
//! instead of hashing strings on every lookup.

use std::sync::Arc;

use indexmap::IndexMap;

/// The three kinds of named entity the model distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Class,
    ObjectProperty,
    Individual,
}

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);
    };
}

entity_id!(ClassId);
entity_id!(PropertyId);
entity_id!(IndividualId);

/// A kind-tagged handle, used by the generic `Ontology::intern_entity` /
/// `mint_entity` API where the caller doesn't statically know which kind of
/// entity it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    pub kind: EntityKind,
    pub id: u32,
}

impl From<ClassId> for Entity {
    fn from(c: ClassId) -> Self {
        Entity { kind: EntityKind::Class, id: c.0 }
    }
}
impl From<PropertyId> for Entity {
    fn from(p: PropertyId) -> Self {
        Entity { kind: EntityKind::ObjectProperty, id: p.0 }
    }
}
impl From<IndividualId> for Entity {
    fn from(i: IndividualId) -> Self {
        Entity { kind: EntityKind::Individual, id: i.0 }
    }
}

impl Entity {
    pub fn as_class(self) -> Option<ClassId> {
        (self.kind == EntityKind::Class).then_some(ClassId(self.id))
    }
    pub fn as_property(self) -> Option<PropertyId> {
        (self.kind == EntityKind::ObjectProperty).then_some(PropertyId(self.id))
    }
    pub fn as_individual(self) -> Option<IndividualId> {
        (self.kind == EntityKind::Individual).then_some(IndividualId(self.id))
    }
}

/// A bidirectional IRI <-> small-integer-id map for a single entity kind.
#[derive(Debug, Clone, Default)]
struct Interner {
    by_iri: IndexMap<Arc<str>, u32>,
    by_id: Vec<Arc<str>>,
}

impl Interner {
    fn intern(&mut self, iri: &str) -> u32 {
        if let Some(&id) = self.by_iri.get(iri) {
            return id;
        }
        let id = self.by_id.len() as u32;
        let arc: Arc<str> = Arc::from(iri);
        self.by_iri.insert(arc.clone(), id);
        self.by_id.push(arc);
        id
    }

    /// Mints a fresh IRI `{prefix}{n}` for the smallest `n >= 1` not already
    /// interned under this prefix.
    fn mint(&mut self, prefix: &str) -> u32 {
        let mut n: u64 = 1;
        loop {
            let candidate = format!("{prefix}{n}");
            if !self.by_iri.contains_key(candidate.as_str()) {
                return self.intern(&candidate);
            }
            n += 1;
        }
    }

    fn find(&self, iri: &str) -> Option<u32> {
        self.by_iri.get(iri).copied()
    }

    fn iri(&self, id: u32) -> &str {
        &self.by_id[id as usize]
    }

    fn len(&self) -> usize {
        self.by_id.len()
    }

    fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        0..self.by_id.len() as u32
    }
}

/// The entity arena shared by an ontology and everything derived from it
/// (normalization and saturation only ever append to this arena, never
/// remove from it, so ids minted early in the pipeline stay valid until the
/// end).
#[derive(Debug, Clone, Default)]
pub struct Entities {
    classes: Interner,
    properties: Interner,
    individuals: Interner,
}

impl Entities {
    pub fn intern_class(&mut self, iri: &str) -> ClassId {
        ClassId(self.classes.intern(iri))
    }
    pub fn intern_property(&mut self, iri: &str) -> PropertyId {
        PropertyId(self.properties.intern(iri))
    }
    pub fn intern_individual(&mut self, iri: &str) -> IndividualId {
        IndividualId(self.individuals.intern(iri))
    }

    pub fn mint_class(&mut self) -> ClassId {
        ClassId(self.classes.mint("C_"))
    }
    pub fn mint_property(&mut self) -> PropertyId {
        PropertyId(self.properties.mint("OP_"))
    }
    pub fn mint_individual(&mut self) -> IndividualId {
        IndividualId(self.individuals.mint("I_"))
    }

    pub fn find_class(&self, iri: &str) -> Option<ClassId> {
        self.classes.find(iri).map(ClassId)
    }
    pub fn find_property(&self, iri: &str) -> Option<PropertyId> {
        self.properties.find(iri).map(PropertyId)
    }
    pub fn find_individual(&self, iri: &str) -> Option<IndividualId> {
        self.individuals.find(iri).map(IndividualId)
    }

    pub fn class_iri(&self, id: ClassId) -> &str {
        self.classes.iri(id.0)
    }
    pub fn property_iri(&self, id: PropertyId) -> &str {
        self.properties.iri(id.0)
    }
    pub fn individual_iri(&self, id: IndividualId) -> &str {
        self.individuals.iri(id.0)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
    pub fn individual_count(&self) -> usize {
        self.individuals.len()
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.classes.ids().map(ClassId)
    }
    pub fn property_ids(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.properties.ids().map(PropertyId)
    }
    pub fn individual_ids(&self) -> impl Iterator<Item = IndividualId> + '_ {
        self.individuals.ids().map(IndividualId)
    }

    /// Generic entry point used by callers that only know the entity's
    /// `EntityKind` at runtime (e.g. a parser dispatching on an RDF node's
    /// declared type).
    pub fn intern_entity(&mut self, kind: EntityKind, iri: &str) -> Entity {
        match kind {
            EntityKind::Class => self.intern_class(iri).into(),
            EntityKind::ObjectProperty => self.intern_property(iri).into(),
            EntityKind::Individual => self.intern_individual(iri).into(),
        }
    }

    pub fn mint_entity(&mut self, kind: EntityKind) -> Entity {
        match kind {
            EntityKind::Class => self.mint_class().into(),
            EntityKind::ObjectProperty => self.mint_property().into(),
            EntityKind::Individual => self.mint_individual().into(),
        }
    }

    pub fn entities_of(&self, kind: EntityKind) -> Vec<Entity> {
        match kind {
            EntityKind::Class => self.class_ids().map(Entity::from).collect(),
            EntityKind::ObjectProperty => self.property_ids().map(Entity::from).collect(),
            EntityKind::Individual => self.individual_ids().map(Entity::from).collect(),
        }
    }
}
