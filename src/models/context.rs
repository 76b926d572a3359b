//! Per-suite bookkeeping for hoisted context properties
//!
//! Every suite the rewriter enters gets one `Context` record. Records live in
//! a `ContextTree` arena and point at their enclosing suite by index, so
//! lookups walk upward without any shared ownership.

/// Index of a context record inside its `ContextTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

impl ContextId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A `this.<original>` property hoisted into the variable `name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub original: String,
    pub name: String,
}

impl PropertyDescriptor {
    pub fn new(original: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            name: name.into(),
        }
    }
}

/// One nesting level of the suite hierarchy
#[derive(Debug, Clone, Default)]
pub struct Context {
    properties: Vec<PropertyDescriptor>,
    parent: Option<ContextId>,
    children: Vec<ContextId>,
}

impl Context {
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn parent(&self) -> Option<ContextId> {
        self.parent
    }

    pub fn children(&self) -> &[ContextId] {
        &self.children
    }
}

/// Arena of context records for one top-level suite
#[derive(Debug, Clone, Default)]
pub struct ContextTree {
    contexts: Vec<Context>,
}

impl ContextTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record with no enclosing suite
    pub fn new_root(&mut self) -> ContextId {
        self.push(Context::default())
    }

    /// Create a record nested directly inside `parent`
    pub fn add_child(&mut self, parent: ContextId) -> ContextId {
        let child = self.push(Context {
            parent: Some(parent),
            ..Context::default()
        });
        self.contexts[parent.0].children.push(child);
        child
    }

    fn push(&mut self, context: Context) -> ContextId {
        self.contexts.push(context);
        ContextId(self.contexts.len() - 1)
    }

    pub fn get(&self, id: ContextId) -> &Context {
        &self.contexts[id.0]
    }

    pub fn parent(&self, id: ContextId) -> Option<ContextId> {
        self.get(id).parent
    }

    pub fn children(&self, id: ContextId) -> &[ContextId] {
        &self.get(id).children
    }

    pub fn properties(&self, id: ContextId) -> &[PropertyDescriptor] {
        &self.get(id).properties
    }

    /// Record a hoisted property. A second descriptor for the same original
    /// name is ignored; the first one wins.
    pub fn add_property(&mut self, id: ContextId, descriptor: PropertyDescriptor) {
        let properties = &mut self.contexts[id.0].properties;
        if !properties.iter().any(|p| p.original == descriptor.original) {
            properties.push(descriptor);
        }
    }

    /// Find the descriptor for `original` in `id` or the nearest ancestor
    pub fn property_in_scope(&self, id: ContextId, original: &str) -> Option<&PropertyDescriptor> {
        let mut current = Some(id);
        while let Some(context_id) = current {
            let context = self.get(context_id);
            if let Some(found) = context.properties.iter().find(|p| p.original == original) {
                return Some(found);
            }
            current = context.parent;
        }
        None
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_lookup_walks_parents() {
        let mut tree = ContextTree::new();
        let root = tree.new_root();
        let child = tree.add_child(root);

        tree.add_property(root, PropertyDescriptor::new("x", "x"));

        let found = tree.property_in_scope(child, "x").unwrap();
        assert_eq!(found.name, "x");
        assert!(tree.property_in_scope(child, "y").is_none());
    }

    #[test]
    fn test_inner_property_shadows_outer() {
        let mut tree = ContextTree::new();
        let root = tree.new_root();
        let inner = tree.add_child(root);
        let sibling = tree.add_child(root);

        tree.add_property(root, PropertyDescriptor::new("x", "x"));
        tree.add_property(inner, PropertyDescriptor::new("x", "x_fromSetup"));

        assert_eq!(tree.property_in_scope(inner, "x").unwrap().name, "x_fromSetup");
        assert_eq!(tree.property_in_scope(sibling, "x").unwrap().name, "x");
    }

    #[test]
    fn test_add_property_is_idempotent() {
        let mut tree = ContextTree::new();
        let root = tree.new_root();

        tree.add_property(root, PropertyDescriptor::new("x", "x"));
        tree.add_property(root, PropertyDescriptor::new("x", "x_fromSetup"));

        assert_eq!(tree.properties(root), &[PropertyDescriptor::new("x", "x")]);
    }

    #[test]
    fn test_children_are_linked() {
        let mut tree = ContextTree::new();
        let root = tree.new_root();
        let a = tree.add_child(root);
        let b = tree.add_child(root);

        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.len(), 3);
    }
}
