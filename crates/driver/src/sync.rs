use crate::world::{PhysicsWorld, RenderableWorld};
use vitrine_common::{BodyId, NodeId};

/// A registered relation between one render node and one simulation body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPair {
    pub node: NodeId,
    pub body: BodyId,
}

/// The physics-to-render bridge.
///
/// Pairs enter only through explicit registration at object-creation time
/// and leave together; the copy is one-directional, simulation -> render.
/// Copies run in registration order.
#[derive(Debug, Clone, Default)]
pub struct SyncRegistry {
    pairs: Vec<SyncPair>,
}

impl SyncRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pair. Returns false (and changes nothing) if the exact pair
    /// is already registered.
    pub fn register(&mut self, node: NodeId, body: BodyId) -> bool {
        let pair = SyncPair { node, body };
        if self.pairs.contains(&pair) {
            return false;
        }
        self.pairs.push(pair);
        true
    }

    /// Remove a pair, deregistering both sides at once. Returns whether the
    /// pair was present.
    pub fn unregister(&mut self, node: NodeId, body: BodyId) -> bool {
        let pair = SyncPair { node, body };
        let before = self.pairs.len();
        self.pairs.retain(|p| *p != pair);
        self.pairs.len() != before
    }

    pub fn pairs(&self) -> &[SyncPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Copy each registered body's transform onto its render node.
    ///
    /// A pair whose body no longer exists violates the registration contract;
    /// it is dropped with a warning rather than left as a node that silently
    /// stops updating.
    pub fn copy_transforms<P, W>(&mut self, physics: &P, world: &mut W)
    where
        P: PhysicsWorld + ?Sized,
        W: RenderableWorld + ?Sized,
    {
        self.pairs.retain(|pair| match physics.body_transform(pair.body) {
            Some(transform) => {
                world.set_node_transform(pair.node, transform);
                true
            }
            None => {
                tracing::warn!(?pair.node, ?pair.body, "sync pair references a dead body, dropping");
                false
            }
        });
    }
}
