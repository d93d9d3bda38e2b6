use crate::model::NodeType;

/// Defines the contract for allocating node and condition ids.
///
/// The store asks again whenever a proposed id is already taken, so implementations
/// only need to avoid repeating themselves.
pub trait IdGenerator: Send + Sync {
    fn node_id(&mut self, node_type: NodeType) -> String;
    fn condition_id(&mut self) -> String;
}

/// Monotonic counter ids: `node_1`, `node_2`, ... and `condition_1`, `condition_2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next_node: u64,
    next_condition: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next_node: first,
            next_condition: first,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn node_id(&mut self, _node_type: NodeType) -> String {
        let id = self.next_node;
        self.next_node += 1;
        format!("node_{}", id)
    }

    fn condition_id(&mut self) -> String {
        let id = self.next_condition;
        self.next_condition += 1;
        format!("condition_{}", id)
    }
}

/// Readable ids prefixed by the node type: `avatarStep_1`, `branch_1`, ...
///
/// Each type counts independently.
#[derive(Debug, Clone, Default)]
pub struct TypedIds {
    counters: ahash::AHashMap<NodeType, u64>,
    next_condition: u64,
}

impl IdGenerator for TypedIds {
    fn node_id(&mut self, node_type: NodeType) -> String {
        let counter = self.counters.entry(node_type).or_insert(0);
        *counter += 1;
        format!("{}_{}", node_type, counter)
    }

    fn condition_id(&mut self) -> String {
        self.next_condition += 1;
        format!("condition_{}", self.next_condition)
    }
}
