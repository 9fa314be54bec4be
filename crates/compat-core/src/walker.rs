//! Depth-first search for compatibility records in a feature tree.
use serde_json::Value;

/// Receives every compatibility record found by [`TreeWalker::walk`].
pub trait RecordVisitor {
    /// `feature` is the name of the node that owns the record.
    fn visit(&mut self, feature: &str, record: &mut Value);
}

impl<F> RecordVisitor for F
where
    F: FnMut(&str, &mut Value),
{
    fn visit(&mut self, feature: &str, record: &mut Value) {
        self(feature, record)
    }
}

#[derive(Debug, Clone)]
pub struct TreeWalker {
    compat_key: String,
}

impl TreeWalker {
    pub fn new(compat_key: impl Into<String>) -> Self {
        Self {
            compat_key: compat_key.into(),
        }
    }

    /// Visit records below `node` in key-insertion order. The value under the
    /// sentinel key is handed to the visitor and never descended into.
    /// Input must be a tree; there is no cycle detection.
    pub fn walk<V>(&self, node: &mut Value, current_name: &str, visitor: &mut V)
    where
        V: RecordVisitor + ?Sized,
    {
        let Value::Object(children) = node else {
            return;
        };

        for (name, child) in children.iter_mut() {
            if *name == self.compat_key {
                visitor.visit(current_name, child);
            } else if child.is_object() {
                self.walk(child, name, visitor);
            }
        }
    }
}
