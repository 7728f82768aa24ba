//! The top-level `Reasoner`: runs the full pipeline (normalize, build role
//! hierarchy, complete class subsumption, saturate the ABox) once at
//! construction time and answers lookups and queries against the cached
//! result. Each phase's wall-clock cost is recorded so callers can tell
//! which stage dominates on a given ontology.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::entities::{ClassId, PropertyId};
use crate::error::{OwlError, OwlResult};
use crate::model::Ontology;
use crate::normalize::{normalize, NormalizedOntology};
use crate::rbox::{build_role_hierarchy, RoleHierarchy};
use crate::reasoning::abox::{saturate, SaturatedAbox};
use crate::reasoning::completion::classify;
use crate::reasoning::query::{answer_query, Query, Row};
use crate::store::PairStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTimings {
    pub normalization: Duration,
    pub role_hierarchy: Duration,
    pub class_subsumption: Duration,
    pub abox_saturation: Duration,
}

impl PhaseTimings {
    pub fn total(&self) -> Duration {
        self.normalization + self.role_hierarchy + self.class_subsumption + self.abox_saturation
    }
}

/// A fully-reasoned ontology. Construction is the only place the pipeline
/// runs; every other method is a read-only lookup against cached tables.
pub struct Reasoner {
    original: Ontology,
    #[allow(dead_code)]
    normalized: NormalizedOntology,
    role_hierarchy: RoleHierarchy,
    class_subsumers: PairStore<ClassId, ClassId>,
    saturated_abox: SaturatedAbox,
    timings: PhaseTimings,
}

impl Reasoner {
    pub fn build(ontology: Ontology) -> OwlResult<Self> {
        let mut timings = PhaseTimings::default();

        let t0 = Instant::now();
        let normalized = normalize(&ontology)?;
        timings.normalization = t0.elapsed();
        debug!("normalization produced {} statements", normalized.statements.len());

        let t1 = Instant::now();
        let role_hierarchy = build_role_hierarchy(&normalized);
        timings.role_hierarchy = t1.elapsed();
        debug!("role hierarchy closure has {} pairs", role_hierarchy.subsumers_r.len());

        let t2 = Instant::now();
        let completion = classify(&normalized, &role_hierarchy);
        timings.class_subsumption = t2.elapsed();
        info!("class subsumption derived {} subsumer pairs", completion.subsumers_c.len());

        let t3 = Instant::now();
        let saturated_abox = saturate(&normalized, &role_hierarchy, &completion.subsumers_c);
        timings.abox_saturation = t3.elapsed();
        info!(
            "ABox saturation derived {} class assertions, {} property assertions",
            saturated_abox.class_assertions.len(),
            saturated_abox.object_property_assertions.len()
        );

        Ok(Reasoner {
            original: ontology,
            normalized,
            role_hierarchy,
            class_subsumers: completion.subsumers_c,
            saturated_abox,
            timings,
        })
    }

    pub fn is_subclass_of(&self, sub_iri: &str, super_iri: &str) -> OwlResult<bool> {
        let sub = self.lookup_class(sub_iri)?;
        let sup = self.lookup_class(super_iri)?;
        Ok(self.class_subsumers.contains(sub, sup))
    }

    pub fn is_subproperty_of(&self, sub_iri: &str, super_iri: &str) -> OwlResult<bool> {
        let sub = self.lookup_property(sub_iri)?;
        let sup = self.lookup_property(super_iri)?;
        Ok(self.role_hierarchy.subsumers_r.contains(sub, sup))
    }

    pub fn answer_query(&self, query: &Query) -> OwlResult<Vec<Row>> {
        answer_query(query, self.original.entities(), &self.saturated_abox)
    }

    pub fn class_subsumers(&self) -> &PairStore<ClassId, ClassId> {
        &self.class_subsumers
    }

    pub fn object_property_subsumers(&self) -> &PairStore<PropertyId, PropertyId> {
        &self.role_hierarchy.subsumers_r
    }

    pub fn saturated_abox(&self) -> &SaturatedAbox {
        &self.saturated_abox
    }

    pub fn timings(&self) -> PhaseTimings {
        self.timings
    }

    pub fn ontology(&self) -> &Ontology {
        &self.original
    }

    fn lookup_class(&self, iri: &str) -> OwlResult<ClassId> {
        self.original.entities().find_class(iri).ok_or_else(|| OwlError::UnknownClass(iri.to_string()))
    }

    fn lookup_property(&self, iri: &str) -> OwlResult<PropertyId> {
        self.original.entities().find_property(iri).ok_or_else(|| OwlError::UnknownProperty(iri.to_string()))
    }
}
