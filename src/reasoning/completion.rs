//! The class-subsumption completion engine: an EL+ forward-chaining
//! fixpoint computation over a labelled graph. Nodes are atomic classes;
//! node labels are their derived subsumers; edges are labelled with an
//! object property and represent a derived existential restriction between
//! two classes (`A --r--> B` means `A ⊑ ∃r.B` has been derived, not merely
//! asserted).
//!
//! Work is driven by per-node FIFO instruction queues rather than native
//! recursion - `LabelEdge`'s chain propagation can in principle re-trigger
//! itself arbitrarily deep, so it is written as an explicit work stack
//! instead of a function that calls itself.

use hashbrown::{HashMap, HashSet};
use std::collections::VecDeque;

use crate::entities::{ClassId, PropertyId};
use crate::normalize::{NormalizedOntology, NormalizedStatement};
use crate::rbox::RoleHierarchy;
use crate::store::PairStore;

/// A derived existential-restriction edge store, indexed both by source and
/// by target so the engine can efficiently ask "what classes does A have an
/// edge to" (propagating a new node label across outgoing edges) and "what
/// classes have an edge into B" (propagating into a node whose label just
/// grew).
#[derive(Debug, Clone, Default)]
struct EdgeIndex {
    set: HashSet<(ClassId, ClassId, PropertyId)>,
    out_by_source: HashMap<ClassId, Vec<(ClassId, PropertyId)>>,
    in_by_target: HashMap<ClassId, Vec<(ClassId, PropertyId)>>,
}

impl EdgeIndex {
    fn add(&mut self, a: ClassId, b: ClassId, p: PropertyId) -> bool {
        if self.set.insert((a, b, p)) {
            self.out_by_source.entry(a).or_default().push((b, p));
            self.in_by_target.entry(b).or_default().push((a, p));
            true
        } else {
            false
        }
    }

    fn contains(&self, a: ClassId, b: ClassId, p: PropertyId) -> bool {
        self.set.contains(&(a, b, p))
    }

    fn incoming(&self, b: ClassId) -> &[(ClassId, PropertyId)] {
        self.in_by_target.get(&b).map(Vec::as_slice).unwrap_or(&[])
    }

    fn sources_with(&self, b: ClassId, p: PropertyId) -> impl Iterator<Item = ClassId> + '_ {
        self.incoming(b).iter().filter(move |(_, lp)| *lp == p).map(|(c, _)| *c)
    }

    fn targets_with(&self, a: ClassId, p: PropertyId) -> impl Iterator<Item = ClassId> + '_ {
        self.out_by_source
            .get(&a)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter(move |(_, lp)| *lp == p)
            .map(|(c, _)| *c)
    }
}

#[derive(Debug, Clone)]
enum Instruction {
    LabelNode { new_label: ClassId, requires: Vec<ClassId> },
    LabelEdge { to: ClassId, label: PropertyId },
}

/// What class-subsumption completion derives: the subsumer relation and the
/// existential-restriction edges that witnessed it, exposed mainly for
/// inspection and testing - ABox saturation only needs `subsumers_c`.
pub struct CompletionResult {
    pub subsumers_c: PairStore<ClassId, ClassId>,
    pub edges: Vec<(ClassId, ClassId, PropertyId)>,
}

struct Engine<'a> {
    norm: &'a NormalizedOntology,
    rbox: &'a RoleHierarchy,
    subsumers_c: PairStore<ClassId, ClassId>,
    edges: EdgeIndex,
    queues: HashMap<ClassId, VecDeque<Instruction>>,
    pending: VecDeque<ClassId>,
    in_pending: HashSet<ClassId>,

    /// NF-A and NF-B axioms indexed by each conjunct `C`: `(all conjuncts, D)`.
    nf_b_by_conjunct: HashMap<ClassId, Vec<(Vec<ClassId>, ClassId)>>,
    /// NF-D axioms indexed by `(r, filler)`: the set of `D` with `∃r.filler ⊑ D`.
    nf_d_by_filler: HashMap<(PropertyId, ClassId), Vec<ClassId>>,
    /// NF-C axioms indexed by lhs `A`: the set of `(r, C)` with `A ⊑ ∃r.C`.
    nf_c_by_lhs: HashMap<ClassId, Vec<(PropertyId, ClassId)>>,
}

impl<'a> Engine<'a> {
    fn new(norm: &'a NormalizedOntology, rbox: &'a RoleHierarchy) -> Self {
        let mut nf_b_by_conjunct: HashMap<ClassId, Vec<(Vec<ClassId>, ClassId)>> = HashMap::new();
        let mut nf_d_by_filler: HashMap<(PropertyId, ClassId), Vec<ClassId>> = HashMap::new();
        let mut nf_c_by_lhs: HashMap<ClassId, Vec<(PropertyId, ClassId)>> = HashMap::new();

        for stmt in &norm.statements {
            match stmt {
                NormalizedStatement::SubClassAtomic(a, b) => {
                    nf_b_by_conjunct.entry(*a).or_default().push((vec![*a], *b));
                }
                NormalizedStatement::ConjunctionSubClass(cs, d) => {
                    for c in cs {
                        nf_b_by_conjunct.entry(*c).or_default().push((cs.clone(), *d));
                    }
                }
                NormalizedStatement::ExistentialSubClass(r, a, d) => {
                    nf_d_by_filler.entry((*r, *a)).or_default().push(*d);
                }
                NormalizedStatement::SubExistential(a, r, c) => {
                    nf_c_by_lhs.entry(*a).or_default().push((*r, *c));
                }
                _ => {}
            }
        }

        Engine {
            norm,
            rbox,
            subsumers_c: PairStore::default(),
            edges: EdgeIndex::default(),
            queues: HashMap::new(),
            pending: VecDeque::new(),
            in_pending: HashSet::new(),
            nf_b_by_conjunct,
            nf_d_by_filler,
            nf_c_by_lhs,
        }
    }

    fn enqueue(&mut self, node: ClassId, instr: Instruction) {
        self.queues.entry(node).or_default().push_back(instr);
        if self.in_pending.insert(node) {
            self.pending.push_back(node);
        }
    }

    /// Triggered whenever a new label `B` is added to node `A`: checks every
    /// NF-A/NF-B axiom with `B` as one of its conjuncts.
    fn seed_node_if(&mut self, b: ClassId, a: ClassId) {
        if let Some(axioms) = self.nf_b_by_conjunct.get(&b).cloned() {
            for (conjuncts, d) in axioms {
                let requires: Vec<ClassId> = conjuncts.into_iter().filter(|c| *c != b).collect();
                self.enqueue(a, Instruction::LabelNode { new_label: d, requires });
            }
        }
    }

    /// Triggered when an edge `A --q--> B` is derived: checks every NF-D
    /// axiom `∃q.B ⊑ D`.
    fn seed_node(&mut self, q: PropertyId, b: ClassId, a: ClassId) {
        if let Some(ds) = self.nf_d_by_filler.get(&(q, b)).cloned() {
            for d in ds {
                self.enqueue(a, Instruction::LabelNode { new_label: d, requires: Vec::new() });
            }
        }
    }

    /// Triggered whenever a new label `B` is added to node `A`: checks every
    /// NF-C axiom `B ⊑ ∃r.C`, scheduling the derived edge `A --r--> C`. This
    /// must fire on every label addition, not only during initial axiom
    /// scanning, so that existential restrictions reachable only through a
    /// *derived* (non-asserted) subsumer still propagate.
    fn seed_edge(&mut self, b: ClassId, a: ClassId) {
        if let Some(list) = self.nf_c_by_lhs.get(&b).cloned() {
            for (p, c) in list {
                self.enqueue(a, Instruction::LabelEdge { to: c, label: p });
            }
        }
    }

    fn apply_label_node(&mut self, a: ClassId, b: ClassId, requires: &[ClassId]) {
        if self.subsumers_c.contains(a, b) {
            return;
        }
        if !self.subsumers_c.contains_all(a, requires) {
            return;
        }
        self.subsumers_c.add(a, b);
        self.seed_node_if(b, a);
        self.seed_edge(b, a);

        let incoming: Vec<(ClassId, PropertyId)> = self.edges.incoming(a).to_vec();
        for (c, p) in incoming {
            self.seed_node(p, b, c);
        }
    }

    fn apply_label_edge(&mut self, a: ClassId, b: ClassId, p: PropertyId) {
        if self.edges.contains(a, b, p) {
            return;
        }
        let mut stack = vec![(a, b, p)];
        while let Some((a, b, p)) = stack.pop() {
            let supers: Vec<PropertyId> = self.rbox.subsumers_r.pairs_with_first(p).collect();
            for q in supers {
                if self.edges.contains(a, b, q) {
                    continue;
                }
                self.edges.add(a, b, q);

                let labels: Vec<ClassId> = self.subsumers_c.pairs_with_first(b).collect();
                for c in labels {
                    self.seed_node(q, c, a);
                }

                // q is the right operand of some chain r∘q⊑result: a
                // preceding edge C--r-->A extends to C--result-->B.
                let right_chains: Vec<(PropertyId, PropertyId)> =
                    self.rbox.chain_right.triples_with_first(q).collect();
                for (r, result) in right_chains {
                    let sources: Vec<ClassId> = self.edges.sources_with(a, r).collect();
                    for c in sources {
                        if !self.edges.contains(c, b, result) {
                            stack.push((c, b, result));
                        }
                    }
                }

                // q is the left operand of some chain q∘s⊑result: a
                // following edge B--s-->C extends to A--result-->C.
                let left_chains: Vec<(PropertyId, PropertyId)> =
                    self.rbox.chain_left.triples_with_first(q).collect();
                for (s, result) in left_chains {
                    let targets: Vec<ClassId> = self.edges.targets_with(b, s).collect();
                    for c in targets {
                        if !self.edges.contains(a, c, result) {
                            stack.push((a, c, result));
                        }
                    }
                }
            }
        }
    }

    fn run(mut self) -> CompletionResult {
        let thing = self.norm.thing;
        let classes: Vec<ClassId> = self.norm.entities.class_ids().collect();
        for a in &classes {
            self.apply_label_node(*a, *a, &[]);
            if *a != thing {
                self.apply_label_node(*a, thing, &[]);
            }
        }

        while let Some(node) = self.pending.pop_front() {
            let instr = self.queues.get_mut(&node).and_then(VecDeque::pop_front);
            match instr {
                Some(Instruction::LabelNode { new_label, requires }) => {
                    self.apply_label_node(node, new_label, &requires);
                }
                Some(Instruction::LabelEdge { to, label }) => {
                    self.apply_label_edge(node, to, label);
                }
                None => {}
            }
            let has_more = self.queues.get(&node).map(|q| !q.is_empty()).unwrap_or(false);
            if has_more {
                self.pending.push_back(node);
            } else {
                self.in_pending.remove(&node);
            }
        }

        let edges = self.edges.set.into_iter().collect();
        CompletionResult { subsumers_c: self.subsumers_c, edges }
    }
}

pub fn classify(norm: &NormalizedOntology, rbox: &RoleHierarchy) -> CompletionResult {
    Engine::new(norm, rbox).run()
}
