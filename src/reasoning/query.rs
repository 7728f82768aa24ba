//! Conjunctive query answering over the saturated ABox: a basic graph
//! pattern (a conjunction of triple patterns) is translated into a sequence
//! of relational-algebra scan/join steps over two virtual tables,
//! `ClassAssertion(individual, class)` and
//! `ObjectPropertyAssertion(property, subject, object)`, then evaluated with
//! a nested-loop join.

use std::collections::HashMap as StdHashMap;

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

use crate::entities::Entities;
use crate::error::{OwlError, OwlResult};
use crate::model::RDF_TYPE_IRI;
use crate::reasoning::abox::SaturatedAbox;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Variable(String),
    IRIRef(String),
    PrefixedName(String, String),
    Literal { value: String, datatype: Option<String>, lang: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// A parsed conjunctive query, already resolved down to variables and IRIs -
/// parsing SPARQL surface syntax is outside this crate's scope.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub prefixes: StdHashMap<String, String>,
    pub projection: Vec<String>,
    pub distinct: bool,
    pub reduced: bool,
    pub triples: Vec<(Term, Term, Term)>,
    pub order_by: Vec<(String, SortDir)>,
    pub limit: u64,
    pub offset: u64,
}

pub type Row = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    ClassAssertion,
    ObjectPropertyAssertion,
}

#[derive(Debug, Clone)]
enum TermSlot {
    Bound(String),
    Join(String),
    Filter(String),
}

#[derive(Debug, Clone)]
struct ScanNode {
    table: Table,
    predicate_fixed: Option<String>,
    predicate_slot: Option<TermSlot>,
    subject_slot: TermSlot,
    object_slot: TermSlot,
}

struct Tables {
    class_assertion: Vec<(String, String)>,
    object_property_assertion: Vec<(String, String, String)>,
}

fn build_tables(entities: &Entities, abox: &SaturatedAbox) -> Tables {
    let class_assertion = abox
        .class_assertions
        .iter()
        .map(|(i, c)| (entities.individual_iri(*i).to_string(), entities.class_iri(*c).to_string()))
        .collect();
    let object_property_assertion = abox
        .object_property_assertions
        .iter()
        .map(|(p, a, b)| {
            (
                entities.property_iri(*p).to_string(),
                entities.individual_iri(*a).to_string(),
                entities.individual_iri(*b).to_string(),
            )
        })
        .collect();
    Tables { class_assertion, object_property_assertion }
}

fn resolve_iri(term: &Term, query: &Query) -> OwlResult<Option<String>> {
    match term {
        Term::IRIRef(iri) => Ok(Some(iri.clone())),
        Term::PrefixedName(prefix, local) => {
            let base = query.prefixes.get(prefix).ok_or_else(|| OwlError::UnknownPrefix(prefix.clone()))?;
            Ok(Some(format!("{base}{local}")))
        }
        Term::Literal { .. } => Err(OwlError::LiteralsUnsupported),
        Term::Variable(_) => Ok(None),
    }
}

fn slot_for(v: String, seen: &mut IndexSet<String>) -> TermSlot {
    if seen.contains(&v) {
        TermSlot::Join(v)
    } else {
        seen.insert(v.clone());
        TermSlot::Bound(v)
    }
}

fn resolve_term(term: &Term, query: &Query, seen: &mut IndexSet<String>) -> OwlResult<TermSlot> {
    if let Term::Variable(v) = term {
        return Ok(slot_for(v.clone(), seen));
    }
    let iri = resolve_iri(term, query)?.expect("non-variable term resolves to an IRI");
    Ok(TermSlot::Filter(iri))
}

fn translate(query: &Query) -> OwlResult<(Vec<ScanNode>, Vec<String>)> {
    let mut seen: IndexSet<String> = IndexSet::new();
    let mut scans = Vec::with_capacity(query.triples.len());

    for (s, p, o) in &query.triples {
        let (table, predicate_fixed, predicate_slot) = match p {
            Term::Variable(v) => (Table::ObjectPropertyAssertion, None, Some(slot_for(v.clone(), &mut seen))),
            other => {
                let iri = resolve_iri(other, query)?.expect("non-variable predicate resolves to an IRI");
                if iri == RDF_TYPE_IRI {
                    (Table::ClassAssertion, None, None)
                } else {
                    (Table::ObjectPropertyAssertion, Some(iri), None)
                }
            }
        };
        let subject_slot = resolve_term(s, query, &mut seen)?;
        let object_slot = resolve_term(o, query, &mut seen)?;
        scans.push(ScanNode { table, predicate_fixed, predicate_slot, subject_slot, object_slot });
    }

    Ok((scans, seen.into_iter().collect()))
}

fn apply_slot(row: &mut Row, slot: &TermSlot, value: &str) -> bool {
    match slot {
        TermSlot::Bound(v) => {
            row.insert(v.clone(), value.to_string());
            true
        }
        TermSlot::Join(v) => row.get(v).map(|existing| existing == value).unwrap_or(false),
        TermSlot::Filter(s) => s == value,
    }
}

fn eval_scan(rows: Vec<Row>, node: &ScanNode, tables: &Tables) -> Vec<Row> {
    let mut out = Vec::new();
    match node.table {
        Table::ClassAssertion => {
            for row in &rows {
                for (ind, cls) in &tables.class_assertion {
                    let mut new_row = row.clone();
                    if !apply_slot(&mut new_row, &node.subject_slot, ind) {
                        continue;
                    }
                    if !apply_slot(&mut new_row, &node.object_slot, cls) {
                        continue;
                    }
                    out.push(new_row);
                }
            }
        }
        Table::ObjectPropertyAssertion => {
            for row in &rows {
                for (p, left, right) in &tables.object_property_assertion {
                    if let Some(fixed) = &node.predicate_fixed {
                        if fixed != p {
                            continue;
                        }
                    }
                    let mut new_row = row.clone();
                    if let Some(pslot) = &node.predicate_slot {
                        if !apply_slot(&mut new_row, pslot, p) {
                            continue;
                        }
                    }
                    if !apply_slot(&mut new_row, &node.subject_slot, left) {
                        continue;
                    }
                    if !apply_slot(&mut new_row, &node.object_slot, right) {
                        continue;
                    }
                    out.push(new_row);
                }
            }
        }
    }
    out
}

pub fn answer_query(query: &Query, entities: &Entities, abox: &SaturatedAbox) -> OwlResult<Vec<Row>> {
    let tables = build_tables(entities, abox);
    let (scans, all_vars) = translate(query)?;

    let mut rows = vec![Row::new()];
    for scan in &scans {
        rows = eval_scan(rows, scan, &tables);
    }

    for (var, _) in &query.order_by {
        if !all_vars.contains(var) {
            return Err(OwlError::UnsupportedExpressionInOrderBy(var.clone()));
        }
    }

    let projection = if query.projection.is_empty() { all_vars } else { query.projection.clone() };
    let mut result_rows: Vec<Row> = rows
        .into_iter()
        .map(|r| {
            let mut out = Row::new();
            for v in &projection {
                if let Some(val) = r.get(v) {
                    out.insert(v.clone(), val.clone());
                }
            }
            out
        })
        .collect();

    if !query.order_by.is_empty() {
        result_rows.sort_by(|a, b| {
            for (var, dir) in &query.order_by {
                let av = a.get(var).map(String::as_str).unwrap_or("");
                let bv = b.get(var).map(String::as_str).unwrap_or("");
                let ord = av.cmp(bv);
                let ord = if *dir == SortDir::Desc { ord.reverse() } else { ord };
                if ord != std::cmp::Ordering::Equal {
                    return ord;
                }
            }
            std::cmp::Ordering::Equal
        });
    }

    if query.distinct || query.reduced {
        result_rows = result_rows
            .into_iter()
            .unique_by(|r| r.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Vec<_>>())
            .collect();
    }

    let offset = query.offset as usize;
    let after_offset: Vec<Row> =
        if offset >= result_rows.len() { Vec::new() } else { result_rows.split_off(offset) };
    let limited = if query.limit == 0 {
        after_offset
    } else {
        after_offset.into_iter().take(query.limit as usize).collect()
    };
    Ok(limited)
}
