//! Generator node tree.
//!
//! Nodes live in a [`GeneratorTree`] arena and are addressed by [`NodeId`]
//! handles. A handle carries the slot generation it was issued for, so a
//! handle to a destroyed node is rejected instead of aliasing whatever later
//! reuses the slot. Composites refer to their children by id and never own
//! them: every node is destroyed on its own, in any order. Evaluating a
//! composite whose subtree holds a destroyed node reports that node as stale.
//! Dropping the tree releases every node at once.
use std::fmt;

use log::debug;
use noise::NoiseFn;

use super::ridged::{octave_count, Ridged};
use super::simplex::simplex;
use crate::error::PlanetError;

/// Opaque handle to a node in a [`GeneratorTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Child references of a ridged multifractal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RidgedInputs {
    pub basis: NodeId,
    pub octaves: NodeId,
    pub lacunarity: NodeId,
    pub gain: NodeId,
    pub offset: NodeId,
    pub h: NodeId,
    pub weight: NodeId,
    pub freq: NodeId,
}

impl RidgedInputs {
    fn ids(&self) -> [NodeId; 8] {
        [
            self.basis,
            self.octaves,
            self.lacunarity,
            self.gain,
            self.offset,
            self.h,
            self.weight,
            self.freq,
        ]
    }
}

/// A scalar field evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Constant(f64),
    Simplex,
    RidgedMultifractal(RidgedInputs),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Constant(_) => "constant",
            Node::Simplex => "simplex",
            Node::RidgedMultifractal(_) => "ridged multifractal",
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena of generator nodes.
#[derive(Debug, Default)]
pub struct GeneratorTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl GeneratorTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    pub fn constant(&mut self, value: f64) -> NodeId {
        self.insert(Node::Constant(value))
    }

    pub fn simplex(&mut self) -> NodeId {
        self.insert(Node::Simplex)
    }

    /// Create a ridged multifractal node over eight existing nodes.
    ///
    /// The same child may appear in several slots or under several composites.
    #[allow(clippy::too_many_arguments)]
    pub fn ridged_multifractal(
        &mut self,
        basis: NodeId,
        octaves: NodeId,
        lacunarity: NodeId,
        gain: NodeId,
        offset: NodeId,
        h: NodeId,
        weight: NodeId,
        freq: NodeId,
    ) -> Result<NodeId, PlanetError> {
        let inputs = RidgedInputs { basis, octaves, lacunarity, gain, offset, h, weight, freq };
        for child in inputs.ids() {
            self.node(child)?;
        }
        Ok(self.insert(Node::RidgedMultifractal(inputs)))
    }

    /// Release one node. Its children are untouched and stay owned by the
    /// caller; parents that still refer to it fail to evaluate until they are
    /// destroyed as well.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), PlanetError> {
        let slot = self.slot_mut(id)?;
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        debug!("destroyed generator node {id}, {} live", self.len());
        Ok(())
    }

    pub fn get(&self, id: NodeId) -> Result<&Node, PlanetError> {
        self.node(id)
    }

    pub fn constant_value(&self, id: NodeId) -> Result<f64, PlanetError> {
        match self.node(id)? {
            Node::Constant(v) => Ok(*v),
            other => Err(PlanetError::NotConstant { node: id, kind: other.kind() }),
        }
    }

    pub fn set_constant_value(&mut self, id: NodeId, value: f64) -> Result<(), PlanetError> {
        let slot = self.slot_mut(id)?;
        match slot.node.as_mut() {
            Some(Node::Constant(v)) => {
                *v = value;
                Ok(())
            }
            Some(other) => Err(PlanetError::NotConstant { node: id, kind: other.kind() }),
            None => Err(PlanetError::StaleNode(id)),
        }
    }

    /// Evaluate the field rooted at `id` at `(x, y, z)`.
    ///
    /// Fails with [`PlanetError::StaleNode`] naming the first destroyed node
    /// found in the subtree.
    pub fn evaluate(&self, id: NodeId, x: f64, y: f64, z: f64) -> Result<f64, PlanetError> {
        self.check_subtree(id)?;
        Ok(self.sample(id, x, y, z))
    }

    /// Borrow the field rooted at `id` as a [`NoiseFn`]. The whole subtree is
    /// checked once here; the borrow keeps it alive afterwards.
    pub fn field(&self, id: NodeId) -> Result<Field<'_>, PlanetError> {
        self.check_subtree(id)?;
        Ok(Field { tree: self, root: id })
    }

    fn check_subtree(&self, id: NodeId) -> Result<(), PlanetError> {
        if let Node::RidgedMultifractal(inputs) = self.node(id)? {
            for child in inputs.ids() {
                self.check_subtree(child)?;
            }
        }
        Ok(())
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let kind = node.kind();
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, node: Some(node) });
                NodeId { index, generation: 0 }
            }
        };
        debug!("created {kind} node {id}");
        id
    }

    fn slot(&self, id: NodeId) -> Result<&Slot, PlanetError> {
        match self.slots.get(id.index as usize) {
            Some(slot) if slot.generation == id.generation && slot.node.is_some() => Ok(slot),
            _ => Err(PlanetError::StaleNode(id)),
        }
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut Slot, PlanetError> {
        match self.slots.get_mut(id.index as usize) {
            Some(slot) if slot.generation == id.generation && slot.node.is_some() => Ok(slot),
            _ => Err(PlanetError::StaleNode(id)),
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node, PlanetError> {
        self.slot(id)?.node.as_ref().ok_or(PlanetError::StaleNode(id))
    }

    /// Evaluate a node whose subtree passed `check_subtree`. Mutation needs
    /// `&mut self`, so nothing can be destroyed between the check and here.
    fn sample(&self, id: NodeId, x: f64, y: f64, z: f64) -> f64 {
        match self.slots[id.index as usize].node.as_ref() {
            Some(Node::Constant(v)) => *v,
            Some(Node::Simplex) => simplex(x, y, z),
            Some(Node::RidgedMultifractal(inputs)) => {
                let octaves = octave_count(self.sample(inputs.octaves, x, y, z));
                let params = Ridged {
                    lacunarity: self.sample(inputs.lacunarity, x, y, z),
                    gain: self.sample(inputs.gain, x, y, z),
                    offset: self.sample(inputs.offset, x, y, z),
                    h: self.sample(inputs.h, x, y, z),
                    weight: self.sample(inputs.weight, x, y, z),
                    freq: self.sample(inputs.freq, x, y, z),
                };
                let basis = inputs.basis;
                params.sample_with(|bx, by, bz| self.sample(basis, bx, by, bz), octaves, x, y, z)
            }
            None => unreachable!("sampled destroyed node {id} past the subtree check"),
        }
    }
}

/// A validated, borrowed view of one node's field.
///
/// While a `Field` exists the tree cannot be mutated, so evaluation is
/// infallible.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    tree: &'a GeneratorTree,
    root: NodeId,
}

impl Field<'_> {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self.tree.sample(self.root, x, y, z)
    }
}

impl NoiseFn<f64, 3> for Field<'_> {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.sample(point[0], point[1], point[2])
    }
}
