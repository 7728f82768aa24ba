//! # el-reasoner
//!
//! A description-logic reasoning engine for the OWL 2 EL profile.
//!
//! The pipeline runs in five stages, each implemented in its own module:
//!
//! ```text
//! Ontology --normalize--> NormalizedOntology --build_role_hierarchy--> RoleHierarchy
//!                                |                                          |
//!                                +-----------------+------------------------+
//!                                                  v
//!                                     class-subsumption completion
//!                                                  |
//!                                                  v
//!                                           ABox saturation
//!                                                  |
//!                                                  v
//!                                         conjunctive query answering
//! ```
//!
//! [`Reasoner::build`] runs all five stages once and caches the result;
//! every other method on it is a read-only lookup.
//!
//! ```
//! use el_reasoner::model::{ClassExpr, Ontology, Statement};
//! use el_reasoner::Reasoner;
//!
//! let mut ontology = Ontology::new();
//! let person = ontology.intern_class("http://example.org/Person").unwrap();
//! let agent = ontology.intern_class("http://example.org/Agent").unwrap();
//! ontology.add_statement(Statement::SubClassOf(ClassExpr::Class(person), ClassExpr::Class(agent)));
//!
//! let reasoner = Reasoner::build(ontology).unwrap();
//! assert!(reasoner.is_subclass_of("http://example.org/Person", "http://example.org/Agent").unwrap());
//! ```

pub mod entities;
pub mod error;
pub mod iri;
pub mod model;
pub mod normalize;
pub mod rbox;
pub mod reasoner;
pub mod reasoning;
pub mod store;

pub use entities::{ClassId, EntityKind, IndividualId, PropertyId};
pub use error::{OwlError, OwlResult};
pub use model::{ClassExpr, Ontology, RoleExpr, Statement};
pub use reasoner::Reasoner;
