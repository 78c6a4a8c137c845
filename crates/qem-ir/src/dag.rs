//! DAG-based circuit representation.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex as PetNodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// Node index type for the circuit DAG.
///
/// Indices are stable: removing a node never renumbers the others.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a wire.
    In(WireId),
    /// Output node for a wire.
    Out(WireId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

/// An edge in the circuit DAG representing a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge represents.
    pub wire: WireId,
}

/// Wires touched by an instruction: qubits first, then classical bits.
fn instruction_wires(inst: &Instruction) -> impl Iterator<Item = WireId> + '_ {
    inst.qubits
        .iter()
        .copied()
        .map(WireId::Qubit)
        .chain(inst.clbits.iter().copied().map(WireId::Clbit))
}

/// Normalize a finite phase into `[0, 2π)`.
///
/// Non-finite input is passed through unchanged.
pub fn normalize_phase(phase: f64) -> f64 {
    debug_assert!(phase.is_finite(), "phase must be finite, got {phase}");
    let p = phase.rem_euclid(TAU);
    if p >= TAU { 0.0 } else { p }
}

/// DAG-based circuit representation.
///
/// The circuit is a directed acyclic graph where:
/// - Nodes are input nodes, output nodes, or operation nodes
/// - Edges represent wires (quantum or classical)
/// - Each wire runs from exactly one input node to exactly one output node,
///   passing through the operations on that wire in temporal order
///
/// The graph is a [`StableDiGraph`], so a pass may snapshot node indices
/// and then substitute them one by one without the remaining indices moving.
#[derive(Debug, Clone)]
pub struct CircuitDag {
    /// The underlying graph.
    graph: StableDiGraph<DagNode, DagEdge, u32>,
    /// Map from wire to its input node.
    inputs: FxHashMap<WireId, NodeIndex>,
    /// Map from wire to its output node.
    outputs: FxHashMap<WireId, NodeIndex>,
    /// Qubits in insertion order.
    qubits: Vec<QubitId>,
    /// Classical bits in insertion order.
    clbits: Vec<ClbitId>,
    /// Global phase of the circuit, in `[0, 2π)`.
    global_phase: f64,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::default(),
            inputs: FxHashMap::default(),
            outputs: FxHashMap::default(),
            qubits: vec![],
            clbits: vec![],
            global_phase: 0.0,
        }
    }

    fn add_wire(&mut self, wire: WireId) -> bool {
        if self.inputs.contains_key(&wire) {
            return false;
        }
        let in_node = self.graph.add_node(DagNode::In(wire));
        let out_node = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(in_node, out_node, DagEdge { wire });
        self.inputs.insert(wire, in_node);
        self.outputs.insert(wire, out_node);
        true
    }

    /// Add a qubit to the circuit.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.add_wire(WireId::Qubit(qubit)) {
            self.qubits.push(qubit);
        }
    }

    /// Add a classical bit to the circuit.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if self.add_wire(WireId::Clbit(clbit)) {
            self.clbits.push(clbit);
        }
    }

    /// Check arity, operand existence and duplicate qubits.
    #[allow(clippy::cast_possible_truncation)]
    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let op = instruction.name();

        if let InstructionKind::Gate(gate) = instruction.kind {
            let expected = gate.num_qubits();
            let got = instruction.qubits.len() as u32;
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate,
                    expected,
                    got,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if !self.inputs.contains_key(&WireId::Qubit(qubit)) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    op,
                });
            }
        }

        for &clbit in &instruction.clbits {
            if !self.inputs.contains_key(&WireId::Clbit(clbit)) {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    op,
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    op,
                });
            }
        }

        Ok(())
    }

    /// Find the neighbor of `node` along `wire` in direction `dir`.
    fn wire_neighbor(&self, node: NodeIndex, wire: WireId, dir: Direction) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, dir)
            .find(|e| e.weight().wire == wire)
            .map(|e| match dir {
                Direction::Incoming => e.source(),
                Direction::Outgoing => e.target(),
            })
    }

    /// Apply an instruction at the end of the circuit.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        self.validate(&instruction)?;

        // Locate the current last node on every wire before touching the graph.
        let mut fronts = Vec::with_capacity(instruction.qubits.len() + instruction.clbits.len());
        for wire in instruction_wires(&instruction) {
            let out_node = self.outputs[&wire];
            let edge = self
                .graph
                .edges_directed(out_node, Direction::Incoming)
                .find(|e| e.weight().wire == wire)
                .map(|e| (e.id(), e.source()))
                .ok_or_else(|| {
                    IrError::InvalidDag(format!("Output node of wire {wire:?} has no predecessor"))
                })?;
            fronts.push((wire, out_node, edge));
        }

        let op_node = self.graph.add_node(DagNode::Op(instruction));
        for (wire, out_node, (edge_id, prev_node)) in fronts {
            self.graph.remove_edge(edge_id);
            self.graph.add_edge(prev_node, op_node, DagEdge { wire });
            self.graph.add_edge(op_node, out_node, DagEdge { wire });
        }

        Ok(op_node)
    }

    /// Replace an operation node with a sequence of instructions.
    ///
    /// Every replacement instruction must act only on wires of the replaced
    /// node. The replacement is spliced between the node's predecessors and
    /// successors on each wire, in the given order; wires of the old node
    /// not touched by the replacement are reconnected directly. An empty
    /// replacement deletes the node.
    ///
    /// All checks run before the graph is modified, so on error the DAG is
    /// left exactly as it was.
    pub fn substitute_node(
        &mut self,
        node: NodeIndex,
        replacement: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<Vec<NodeIndex>> {
        let old = match self.graph.node_weight(node) {
            Some(DagNode::Op(inst)) => inst,
            Some(_) => {
                return Err(IrError::InvalidDag(
                    "Cannot substitute a wire boundary node".into(),
                ));
            }
            None => return Err(IrError::InvalidNode),
        };
        let old_name = old.name();
        let wires: Vec<WireId> = instruction_wires(old).collect();

        let replacement: Vec<Instruction> = replacement.into_iter().collect();
        for inst in &replacement {
            self.validate(inst)?;
            if instruction_wires(inst).any(|w| !wires.contains(&w)) {
                return Err(IrError::SubstitutionMismatch {
                    node: old_name.to_string(),
                    instruction: inst.name().to_string(),
                });
            }
        }

        let mut links = Vec::with_capacity(wires.len());
        for &wire in &wires {
            let pred = self.wire_neighbor(node, wire, Direction::Incoming);
            let succ = self.wire_neighbor(node, wire, Direction::Outgoing);
            match (pred, succ) {
                (Some(p), Some(s)) => links.push((wire, p, s)),
                _ => {
                    return Err(IrError::InvalidDag(format!(
                        "Node {node:?} is not linked on wire {wire:?}"
                    )));
                }
            }
        }

        self.graph.remove_node(node);

        let mut front: FxHashMap<WireId, NodeIndex> =
            links.iter().map(|&(wire, pred, _)| (wire, pred)).collect();
        let mut new_nodes = Vec::with_capacity(replacement.len());
        for inst in replacement {
            let inst_wires: Vec<WireId> = instruction_wires(&inst).collect();
            let new_node = self.graph.add_node(DagNode::Op(inst));
            for wire in inst_wires {
                let prev = front[&wire];
                self.graph.add_edge(prev, new_node, DagEdge { wire });
                front.insert(wire, new_node);
            }
            new_nodes.push(new_node);
        }
        for (wire, _, succ) in links {
            self.graph.add_edge(front[&wire], succ, DagEdge { wire });
        }

        Ok(new_nodes)
    }

    /// Remove an operation node, reconnecting its wires.
    pub fn remove_op(&mut self, node: NodeIndex) -> IrResult<Instruction> {
        let inst = self
            .get_instruction(node)
            .cloned()
            .ok_or(IrError::InvalidNode)?;
        self.substitute_node(node, std::iter::empty())?;
        Ok(inst)
    }

    /// Iterate over operations in topological order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        petgraph::algo::toposort(&self.graph, None)
            .expect("DAG must be acyclic: cycle detected in circuit graph")
            .into_iter()
            .filter_map(|idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
    }

    /// Iterate over operation nodes in index order.
    pub fn op_nodes(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
    }

    /// Clone all instructions in topological order.
    pub fn instructions(&self) -> Vec<Instruction> {
        self.topological_ops().map(|(_, inst)| inst.clone()).collect()
    }

    /// Operations on one qubit, in wire order.
    pub fn ops_on_qubit(&self, qubit: QubitId) -> Vec<&Instruction> {
        let wire = WireId::Qubit(qubit);
        let mut ops = vec![];
        let Some(&start) = self.inputs.get(&wire) else {
            return ops;
        };
        let mut current = self.wire_neighbor(start, wire, Direction::Outgoing);
        while let Some(node) = current {
            match &self.graph[node] {
                DagNode::Op(inst) => ops.push(inst),
                _ => break,
            }
            current = self.wire_neighbor(node, wire, Direction::Outgoing);
        }
        ops
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    /// Count operations by name.
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for (_, inst) in self.op_nodes() {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Count occurrences of one gate type.
    pub fn count_gate(&self, gate: StandardGate) -> usize {
        self.op_nodes()
            .filter(|(_, inst)| inst.is_gate_of(gate))
            .count()
    }

    /// The only node that follows `node` on all of its wires, if there is one.
    fn sole_successor(&self, node: NodeIndex) -> Option<NodeIndex> {
        let mut targets = self.graph.edges_directed(node, Direction::Outgoing).map(|e| e.target());
        let first = targets.next()?;
        targets.all(|t| t == first).then_some(first)
    }

    /// The only node that precedes `node` on all of its wires, if there is one.
    fn sole_predecessor(&self, node: NodeIndex) -> Option<NodeIndex> {
        let mut sources = self.graph.edges_directed(node, Direction::Incoming).map(|e| e.source());
        let first = sources.next()?;
        sources.all(|s| s == first).then_some(first)
    }

    /// Collect runs of `gate`.
    ///
    /// A run is a maximal chain of `gate` nodes in which each node is the
    /// sole successor of the previous one and has it as sole predecessor.
    /// Every occurrence of `gate` belongs to exactly one run. Runs are
    /// returned in topological order of their first node, so flattening them
    /// gives the encounter order of all occurrences.
    pub fn collect_runs(&self, gate: StandardGate) -> Vec<Vec<NodeIndex>> {
        let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut runs = vec![];

        for (idx, inst) in self.topological_ops() {
            if !inst.is_gate_of(gate) || visited.contains(&idx) {
                continue;
            }
            visited.insert(idx);
            let mut run = vec![idx];
            let mut current = idx;
            while let Some(next) = self.sole_successor(current) {
                let extends = !visited.contains(&next)
                    && self.get_instruction(next).is_some_and(|i| i.is_gate_of(gate))
                    && self.sole_predecessor(next) == Some(current);
                if !extends {
                    break;
                }
                visited.insert(next);
                run.push(next);
                current = next;
            }
            runs.push(run);
        }

        runs
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the number of operations.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph
            .node_count()
            .saturating_sub(2 * (self.qubits.len() + self.clbits.len()))
    }

    /// Calculate the circuit depth.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());
        let mut max_depth = 0usize;

        for node in petgraph::algo::toposort(&self.graph, None)
            .expect("DAG must be acyclic: cycle detected in circuit graph")
        {
            let max_pred_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);
            let node_depth = max_pred_depth + usize::from(self.graph[node].is_op());
            max_depth = max_depth.max(node_depth);
            depths.insert(node, node_depth);
        }

        max_depth
    }

    /// Iterate over qubits in insertion order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubits.iter().copied()
    }

    /// Iterate over classical bits in insertion order.
    pub fn clbits(&self) -> impl Iterator<Item = ClbitId> + '_ {
        self.clbits.iter().copied()
    }

    /// Get the global phase, in `[0, 2π)`.
    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// Set the global phase.
    pub fn set_global_phase(&mut self, phase: f64) -> IrResult<()> {
        if !phase.is_finite() {
            return Err(IrError::NonFinitePhase(phase));
        }
        self.global_phase = normalize_phase(phase);
        Ok(())
    }

    /// Add to the global phase, modulo 2π.
    ///
    /// A non-finite `phase` is rejected and the current phase is kept.
    pub fn add_global_phase(&mut self, phase: f64) -> IrResult<()> {
        if !phase.is_finite() {
            return Err(IrError::NonFinitePhase(phase));
        }
        self.global_phase = normalize_phase(self.global_phase + phase);
        Ok(())
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &StableDiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks that the graph is acyclic, that every wire forms a single path
    /// from its input node to its output node, and that every operation node
    /// sits on exactly the wires its instruction names.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("Graph contains a cycle".into()));
        }

        let mut on_wire: FxHashMap<NodeIndex, usize> = FxHashMap::default();
        for (&wire, &in_node) in &self.inputs {
            let out_node = *self.outputs.get(&wire).ok_or_else(|| {
                IrError::InvalidDag(format!("Wire {wire:?} has an In node but no Out node"))
            })?;

            let mut current = in_node;
            let mut steps = 0;
            while current != out_node {
                current = self
                    .wire_neighbor(current, wire, Direction::Outgoing)
                    .ok_or_else(|| {
                        IrError::InvalidDag(format!(
                            "Wire {wire:?} is broken: no outgoing edge from node {current:?}"
                        ))
                    })?;
                if current != out_node {
                    *on_wire.entry(current).or_insert(0) += 1;
                }
                steps += 1;
                if steps > self.graph.node_count() {
                    return Err(IrError::InvalidDag(format!(
                        "Wire {wire:?} does not terminate"
                    )));
                }
            }
        }

        for idx in self.graph.node_indices() {
            if let DagNode::Op(inst) = &self.graph[idx] {
                let expected = inst.qubits.len() + inst.clbits.len();
                let visits = on_wire.get(&idx).copied().unwrap_or(0);
                let incoming = self.graph.edges_directed(idx, Direction::Incoming).count();
                let outgoing = self.graph.edges_directed(idx, Direction::Outgoing).count();
                if visits != expected || incoming != expected || outgoing != expected {
                    return Err(IrError::InvalidDag(format!(
                        "Operation '{}' at {idx:?} is attached to {visits} wires, expected {expected}",
                        inst.name()
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for CircuitDag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn two_qubit_dag() -> CircuitDag {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));
        dag
    }

    fn names(ops: &[&Instruction]) -> Vec<&'static str> {
        ops.iter().map(|i| i.name()).collect()
    }

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new();
        assert_eq!(dag.num_qubits(), 0);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_bell_state_depth() {
        let mut dag = two_qubit_dag();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();

        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 2);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_gate_arity_mismatch() {
        let mut dag = two_qubit_dag();
        let result = dag.apply(Instruction::gate(StandardGate::CX, [QubitId(0)]));
        match result {
            Err(IrError::QubitCountMismatch {
                gate,
                expected,
                got,
            }) => {
                assert_eq!(gate, StandardGate::CX);
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("Expected QubitCountMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut dag = two_qubit_dag();
        let result = dag.apply(Instruction::two_qubit_gate(
            StandardGate::CZ,
            QubitId(1),
            QubitId(1),
        ));
        assert!(matches!(result, Err(IrError::DuplicateQubit { .. })));
    }

    #[test]
    fn test_qubit_not_found_with_context() {
        let mut dag = two_qubit_dag();
        let result = dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(99),
        ));
        match result {
            Err(IrError::QubitNotFound { qubit, op }) => {
                assert_eq!(qubit, QubitId(99));
                assert_eq!(op, "cx");
            }
            other => panic!("Expected QubitNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_substitute_preserves_wire_order() {
        let mut dag = two_qubit_dag();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        let cx = dag
            .apply(Instruction::two_qubit_gate(
                StandardGate::CX,
                QubitId(0),
                QubitId(1),
            ))
            .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::S, QubitId(1)))
            .unwrap();

        let new_nodes = dag
            .substitute_node(
                cx,
                [
                    Instruction::single_qubit_gate(StandardGate::X, QubitId(0)),
                    Instruction::single_qubit_gate(StandardGate::Z, QubitId(1)),
                    Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)),
                    Instruction::single_qubit_gate(StandardGate::Y, QubitId(0)),
                ],
            )
            .unwrap();

        assert_eq!(new_nodes.len(), 4);
        assert_eq!(dag.num_ops(), 6);
        assert_eq!(names(&dag.ops_on_qubit(QubitId(0))), ["h", "x", "cx", "y"]);
        assert_eq!(names(&dag.ops_on_qubit(QubitId(1))), ["z", "cx", "s"]);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_substitute_keeps_other_indices_valid() {
        let mut dag = two_qubit_dag();
        let first = dag
            .apply(Instruction::two_qubit_gate(
                StandardGate::CZ,
                QubitId(0),
                QubitId(1),
            ))
            .unwrap();
        let second = dag
            .apply(Instruction::two_qubit_gate(
                StandardGate::CZ,
                QubitId(0),
                QubitId(1),
            ))
            .unwrap();

        dag.substitute_node(first, vec![]).unwrap();
        assert!(dag.get_instruction(first).is_none());
        assert_eq!(
            dag.get_instruction(second).map(Instruction::name),
            Some("cz")
        );
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_substitute_rejects_foreign_wire_atomically() {
        let mut dag = CircuitDag::new();
        for q in 0..3 {
            dag.add_qubit(QubitId(q));
        }
        let cx = dag
            .apply(Instruction::two_qubit_gate(
                StandardGate::CX,
                QubitId(0),
                QubitId(1),
            ))
            .unwrap();
        let before = dag.instructions();

        let result = dag.substitute_node(
            cx,
            [
                Instruction::single_qubit_gate(StandardGate::X, QubitId(0)),
                Instruction::single_qubit_gate(StandardGate::X, QubitId(2)),
            ],
        );

        assert!(matches!(
            result,
            Err(IrError::SubstitutionMismatch { .. })
        ));
        assert_eq!(dag.instructions(), before);
        assert_eq!(dag.get_instruction(cx).map(Instruction::name), Some("cx"));
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_substitute_invalid_node() {
        let mut dag = two_qubit_dag();
        let result = dag.substitute_node(NodeIndex::new(42), vec![]);
        assert!(matches!(result, Err(IrError::InvalidNode)));
    }

    #[test]
    fn test_remove_op_with_measurement() {
        let mut dag = two_qubit_dag();
        dag.add_clbit(ClbitId(0));
        let h = dag
            .apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::measure(QubitId(0), ClbitId(0)))
            .unwrap();

        let removed = dag.remove_op(h).unwrap();
        assert_eq!(removed.name(), "h");
        assert_eq!(names(&dag.ops_on_qubit(QubitId(0))), ["measure"]);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_collect_runs_groups_adjacent_gates() {
        let mut dag = CircuitDag::new();
        for q in 0..3 {
            dag.add_qubit(QubitId(q));
        }
        let cx = |a, b| Instruction::two_qubit_gate(StandardGate::CX, QubitId(a), QubitId(b));
        dag.apply(cx(0, 1)).unwrap();
        dag.apply(cx(0, 1)).unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(cx(0, 1)).unwrap();
        dag.apply(cx(1, 2)).unwrap();

        let runs = dag.collect_runs(StandardGate::CX);
        let lengths: Vec<usize> = runs.iter().map(Vec::len).collect();
        assert_eq!(lengths.iter().sum::<usize>(), 4);
        assert_eq!(lengths[0], 2);
        assert_eq!(dag.count_gate(StandardGate::CX), 4);
        assert_eq!(dag.count_ops()["cx"], 4);
        assert!(dag.collect_runs(StandardGate::ECR).is_empty());
    }

    #[test]
    fn test_global_phase_wraps() {
        let mut dag = CircuitDag::new();
        dag.add_global_phase(PI).unwrap();
        assert!((dag.global_phase() - PI).abs() < 1e-15);
        dag.add_global_phase(PI).unwrap();
        assert!(dag.global_phase().abs() < 1e-12);
        dag.set_global_phase(-PI / 2.0).unwrap();
        assert!((dag.global_phase() - 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_op_nodes_skip_boundary_nodes() {
        let mut dag = two_qubit_dag();
        let h = dag
            .apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();

        let ops: Vec<_> = dag.op_nodes().collect();
        assert_eq!(ops.len(), dag.num_ops());
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().any(|&(idx, inst)| idx == h && inst.is_gate_of(StandardGate::H)));
        assert_eq!(
            dag.op_nodes()
                .filter(|(_, inst)| inst.is_gate_of(StandardGate::CX))
                .count(),
            dag.count_gate(StandardGate::CX)
        );
    }

    #[test]
    fn test_non_finite_phase_keeps_accumulated_phase() {
        let mut dag = CircuitDag::new();
        dag.add_global_phase(PI / 4.0).unwrap();

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                dag.add_global_phase(bad),
                Err(IrError::NonFinitePhase(_))
            ));
            assert!(matches!(
                dag.set_global_phase(bad),
                Err(IrError::NonFinitePhase(_))
            ));
        }
        assert!((dag.global_phase() - PI / 4.0).abs() < 1e-15);
    }
}
