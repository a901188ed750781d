use std::collections::VecDeque;

use dodgecoin_common::NodeId;

/// A call queued for execution after the current frame's callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredCall<M> {
    /// Free a node and its subtree.
    Free(NodeId),
    /// An application-defined call, handed back to the caller on flush.
    Call(M),
}

/// FIFO queue of deferred calls.
#[derive(Debug, Clone)]
pub struct DeferredQueue<M> {
    calls: VecDeque<DeferredCall<M>>,
}

impl<M> DeferredQueue<M> {
    pub fn new() -> Self {
        Self {
            calls: VecDeque::new(),
        }
    }

    pub fn push(&mut self, call: DeferredCall<M>) {
        self.calls.push_back(call);
    }

    pub fn pop(&mut self) -> Option<DeferredCall<M>> {
        self.calls.pop_front()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Pending calls in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &DeferredCall<M>> {
        self.calls.iter()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl<M> Default for DeferredQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut q: DeferredQueue<u32> = DeferredQueue::new();
        let id = NodeId::new();
        q.push(DeferredCall::Free(id));
        q.push(DeferredCall::Call(7));
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some(DeferredCall::Free(id)));
        assert_eq!(q.pop(), Some(DeferredCall::Call(7)));
        assert!(q.pop().is_none());
        assert!(q.is_empty());
    }
}
