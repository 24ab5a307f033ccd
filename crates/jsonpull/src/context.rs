//! Stack-resident record of one open object or array.
//!
//! Both the [`StreamParser`](crate::StreamParser) and the
//! [`Generator`](crate::Generator) track structural nesting with an owned
//! `Vec<Context>` instead of host-call-stack recursion, so traversal depth
//! is bounded by memory, not by stack limits. The parent of a node is
//! simply the element below it on the stack.

use crate::event::{Event, StructKind};

#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub(crate) kind: StructKind,
    /// Items written or read so far in this structure.
    pub(crate) count: usize,
    /// Object only: a key has been emitted but its value has not.
    pub(crate) named: bool,
    /// Parser only: a separating comma was consumed, so another entry must
    /// follow before the structure may close.
    pub(crate) pending: bool,
    /// Parser only: last event emitted while this node was current. An end
    /// event here marks the node for the deferred pop.
    pub(crate) last_event: Option<Event>,
    /// Parser only: the realized key text of the most recent `KeyName`.
    pub(crate) key: Option<String>,
}

impl Context {
    pub(crate) fn new(kind: StructKind) -> Self {
        Self {
            kind,
            count: 0,
            named: false,
            pending: false,
            last_event: None,
            key: None,
        }
    }
}
