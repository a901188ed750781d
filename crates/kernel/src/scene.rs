use std::collections::{BTreeMap, BTreeSet};

use dodgecoin_common::NodeId;

use crate::deferred::{DeferredCall, DeferredQueue};

/// An event record produced by every structural mutation of the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// Node was added under `parent` (`None` = scene root).
    Added { id: NodeId, parent: Option<NodeId> },
    /// Node was freed. Children are freed before their parent.
    Freed { id: NodeId },
    /// The scene advanced one frame.
    Stepped { frame: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node {0:?} not found")]
    NodeNotFound(NodeId),
}

/// A node in the scene tree. `P` is the application payload.
#[derive(Debug, Clone)]
pub struct Node<P> {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub groups: BTreeSet<String>,
    pub payload: P,
}

/// The scene that owns all level content.
///
/// Nodes form a tree under an implicit root. Child order is insertion order,
/// which is the order `children` and `walk` report. Freeing is either
/// immediate (`free`) or deferred to the end of the frame (`queue_free`);
/// application calls `M` can be deferred on the same queue with
/// `call_deferred` and are handed back in FIFO order by `flush_deferred`.
#[derive(Debug, Clone)]
pub struct Scene<P, M> {
    nodes: BTreeMap<NodeId, Node<P>>,
    roots: Vec<NodeId>,
    frame: u64,
    deferred: DeferredQueue<M>,
    event_log: Vec<SceneEvent>,
}

impl<P, M> Scene<P, M> {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            roots: Vec::new(),
            frame: 0,
            deferred: DeferredQueue::new(),
            event_log: Vec::new(),
        }
    }

    /// Current frame number.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<P>> {
        self.nodes.get(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&P> {
        self.nodes.get(&id).map(|n| &n.payload)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut P> {
        self.nodes.get_mut(&id).map(|n| &mut n.payload)
    }

    /// Add a node under `parent` (`None` = root) with the given group tags.
    pub fn add_child(
        &mut self,
        parent: Option<NodeId>,
        payload: P,
        groups: &[&str],
    ) -> Result<NodeId, SceneError> {
        let id = NodeId::new();
        match parent {
            Some(p) => self
                .nodes
                .get_mut(&p)
                .ok_or(SceneError::NodeNotFound(p))?
                .children
                .push(id),
            None => self.roots.push(id),
        }
        self.nodes.insert(
            id,
            Node {
                parent,
                children: Vec::new(),
                groups: groups.iter().map(|g| g.to_string()).collect(),
                payload,
            },
        );
        self.event_log.push(SceneEvent::Added { id, parent });
        Ok(id)
    }

    pub fn add_to_group(&mut self, id: NodeId, group: &str) -> Result<(), SceneError> {
        self.nodes
            .get_mut(&id)
            .ok_or(SceneError::NodeNotFound(id))?
            .groups
            .insert(group.to_string());
        Ok(())
    }

    pub fn is_in_group(&self, id: NodeId, group: &str) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|n| n.groups.contains(group))
    }

    /// Direct children of `parent` (`None` = root), in insertion order.
    pub fn children(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            Some(p) => self
                .nodes
                .get(&p)
                .map(|n| n.children.as_slice())
                .unwrap_or(&[]),
            None => &self.roots,
        }
    }

    /// All live nodes in depth-first pre-order.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Live nodes tagged with `group`, in tree order.
    pub fn nodes_in_group(&self, group: &str) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|id| self.is_in_group(*id, group))
            .collect()
    }

    /// Free a node and its subtree immediately. Returns the node's payload,
    /// or `None` if it was already gone.
    pub fn free(&mut self, id: NodeId) -> Option<P> {
        let Some(node) = self.nodes.get(&id) else {
            tracing::trace!(node = %id.short(), "free of missing node ignored");
            return None;
        };
        let parent = node.parent;
        match parent {
            Some(p) => {
                if let Some(parent) = self.nodes.get_mut(&p) {
                    parent.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|c| *c != id),
        }
        self.free_subtree(id)
    }

    fn free_subtree(&mut self, id: NodeId) -> Option<P> {
        let node = self.nodes.remove(&id)?;
        for child in &node.children {
            self.free_subtree(*child);
        }
        self.event_log.push(SceneEvent::Freed { id });
        Some(node.payload)
    }

    /// Request that a node be freed at the end of the frame.
    pub fn queue_free(&mut self, id: NodeId) {
        self.deferred.push(DeferredCall::Free(id));
    }

    /// Queue an application call to run at the end of the frame.
    pub fn call_deferred(&mut self, call: M) {
        self.deferred.push(DeferredCall::Call(call));
    }

    /// Pending deferred calls, in execution order.
    pub fn deferred(&self) -> &DeferredQueue<M> {
        &self.deferred
    }

    /// Run every deferred call in FIFO order, including calls queued while
    /// flushing. Frees are executed here; application calls go to `handler`.
    ///
    /// Stops at the first handler error, leaving later calls queued.
    pub fn flush_deferred<E>(
        &mut self,
        mut handler: impl FnMut(&mut Self, M) -> Result<(), E>,
    ) -> Result<usize, E> {
        let _span = tracing::debug_span!("flush_deferred", pending = self.deferred.len()).entered();
        let mut ran = 0;
        while let Some(call) = self.deferred.pop() {
            ran += 1;
            match call {
                DeferredCall::Free(id) => {
                    self.free(id);
                }
                DeferredCall::Call(m) => handler(self, m)?,
            }
        }
        tracing::trace!(ran, "deferred queue flushed");
        Ok(ran)
    }

    /// Free every node and drop all pending deferred calls.
    pub fn clear(&mut self) {
        let roots = std::mem::take(&mut self.roots);
        for id in roots {
            self.free_subtree(id);
        }
        self.deferred.clear();
    }

    /// Advance the scene by one frame.
    pub fn step(&mut self) {
        self.frame += 1;
        self.event_log.push(SceneEvent::Stepped { frame: self.frame });
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }
}

impl<P, M> Default for Scene<P, M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestScene = Scene<&'static str, u32>;

    #[test]
    fn scene_starts_empty() {
        let s = TestScene::new();
        assert_eq!(s.frame(), 0);
        assert_eq!(s.node_count(), 0);
        assert!(s.children(None).is_empty());
    }

    #[test]
    fn add_child_records_parent_and_order() {
        let mut s = TestScene::new();
        let a = s.add_child(None, "a", &["level"]).unwrap();
        let b = s.add_child(None, "b", &[]).unwrap();
        let a1 = s.add_child(Some(a), "a1", &[]).unwrap();

        assert_eq!(s.children(None), &[a, b]);
        assert_eq!(s.children(Some(a)), &[a1]);
        assert_eq!(s.node(a1).unwrap().parent, Some(a));
        assert!(s.is_in_group(a, "level"));
        assert!(!s.is_in_group(b, "level"));
        assert_eq!(s.walk(), vec![a, a1, b]);
    }

    #[test]
    fn add_child_to_missing_parent_fails() {
        let mut s = TestScene::new();
        assert!(s.add_child(Some(NodeId::new()), "x", &[]).is_err());
        assert_eq!(s.node_count(), 0);
    }

    #[test]
    fn free_removes_subtree_children_first() {
        let mut s = TestScene::new();
        let a = s.add_child(None, "a", &[]).unwrap();
        let a1 = s.add_child(Some(a), "a1", &[]).unwrap();
        s.drain_events();

        assert_eq!(s.free(a), Some("a"));
        assert_eq!(s.node_count(), 0);
        assert!(s.children(None).is_empty());
        assert_eq!(
            s.events(),
            &[SceneEvent::Freed { id: a1 }, SceneEvent::Freed { id: a }]
        );
    }

    #[test]
    fn double_free_is_ignored() {
        let mut s = TestScene::new();
        let a = s.add_child(None, "a", &[]).unwrap();
        assert!(s.free(a).is_some());
        assert!(s.free(a).is_none());
    }

    #[test]
    fn deferred_calls_run_in_fifo_order() {
        let mut s = TestScene::new();
        let a = s.add_child(None, "a", &[]).unwrap();
        s.queue_free(a);
        s.call_deferred(1);
        s.call_deferred(2);
        assert!(s.contains(a));

        let mut seen = Vec::new();
        let ran = s
            .flush_deferred(|scene, call| {
                // the free queued before this call has already run
                assert!(!scene.contains(a));
                seen.push(call);
                Ok::<(), ()>(())
            })
            .unwrap();
        assert_eq!(ran, 3);
        assert_eq!(seen, vec![1, 2]);
        assert!(s.deferred().is_empty());
    }

    #[test]
    fn calls_queued_during_flush_also_run() {
        let mut s = TestScene::new();
        s.call_deferred(1);
        let mut seen = Vec::new();
        s.flush_deferred(|scene, call| {
            seen.push(call);
            if call == 1 {
                scene.call_deferred(2);
            }
            Ok::<(), ()>(())
        })
        .unwrap();
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn handler_error_leaves_rest_queued() {
        let mut s = TestScene::new();
        s.call_deferred(1);
        s.call_deferred(2);
        let res = s.flush_deferred(|_, call| if call == 1 { Err("boom") } else { Ok(()) });
        assert_eq!(res, Err("boom"));
        assert_eq!(s.deferred().len(), 1);
    }

    #[test]
    fn nodes_in_group_follows_tree_order() {
        let mut s = TestScene::new();
        let a = s.add_child(None, "a", &["level"]).unwrap();
        let _b = s.add_child(None, "b", &[]).unwrap();
        let c = s.add_child(None, "c", &[]).unwrap();
        s.add_to_group(c, "level").unwrap();
        assert_eq!(s.nodes_in_group("level"), vec![a, c]);
    }

    #[test]
    fn step_and_clear() {
        let mut s = TestScene::new();
        s.add_child(None, "a", &[]).unwrap();
        s.call_deferred(9);
        s.step();
        s.step();
        assert_eq!(s.frame(), 2);
        s.clear();
        assert_eq!(s.node_count(), 0);
        assert!(s.deferred().is_empty());
    }
}
