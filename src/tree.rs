//! Composite namespace tree: class leaves, namespace containers, rendering.

use crate::names::indent_block;

/// Handle to a namespace container stored in a [`NamespaceTree`].
///
/// Containers are arena-allocated because the builder's registry may attach
/// the same container under two different parents within one run (same-named
/// segments collapse onto one shared container).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamespaceId(usize);

/// A child of a namespace container.
///
/// The set of shapes is closed, so this is a tagged variant rather than an
/// open interface.
#[derive(Debug, Clone)]
pub enum Component {
    Leaf(ClassLeaf),
    Namespace(NamespaceId),
}

/// One class extracted from a model file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLeaf {
    name: String,
    body: String,
    superclass: Option<String>,
    path: Vec<String>,
    original_flat_name: String,
}

impl ClassLeaf {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            superclass: None,
            path: Vec::new(),
            original_flat_name: String::new(),
        }
    }

    pub fn with_superclass(mut self, superclass: Option<String>) -> Self {
        self.superclass = superclass;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    /// The original, undecomposed class name this leaf was derived from.
    pub fn original_flat_name(&self) -> &str {
        &self.original_flat_name
    }

    pub fn set_original_flat_name(&mut self, name: impl Into<String>) {
        self.original_flat_name = name.into();
    }

    /// Ordered ancestor segment names, outermost first.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Sets the qualification path. Called once during decomposition; the
    /// qualified name is stable afterwards.
    pub fn set_path(&mut self, segments: Vec<String>) {
        self.path = segments;
    }

    /// Dot-joined qualified name with the first `level` segments stripped.
    ///
    /// Level 0 is the full name; a level equal to the path length leaves just
    /// the leaf's own name.
    pub fn qualified_name(&self, level: usize) -> String {
        let mut parts: Vec<&str> = self
            .path
            .iter()
            .skip(level)
            .map(String::as_str)
            .collect();
        parts.push(&self.name);
        parts.join(".")
    }

    /// Renders the class block: header, indented verbatim body, closing brace.
    pub fn render(&self) -> String {
        let header = match &self.superclass {
            // No space before the brace in the extends form; the generated
            // files have always looked like this and downstream fixtures
            // compare byte-for-byte.
            Some(superclass) => format!("export class {} extends {}{{\n", self.name, superclass),
            None => format!("export class {} {{\n", self.name),
        };
        format!("{}{}}}\n", header, indent_block(&self.body, 2))
    }
}

/// One namespace level holding leaves and nested namespaces in discovery order.
#[derive(Debug, Clone)]
pub struct NamespaceContainer {
    name: String,
    children: Vec<Component>,
}

impl NamespaceContainer {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Component] {
        &self.children
    }
}

/// Arena of namespace containers for one consolidation run.
#[derive(Debug, Default)]
pub struct NamespaceTree {
    nodes: Vec<NamespaceContainer>,
}

impl NamespaceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new, empty container.
    pub fn add_container(&mut self, name: impl Into<String>) -> NamespaceId {
        self.nodes.push(NamespaceContainer::new(name));
        NamespaceId(self.nodes.len() - 1)
    }

    pub fn container(&self, id: NamespaceId) -> &NamespaceContainer {
        &self.nodes[id.0]
    }

    /// Tests membership by name, covering both leaf and namespace children.
    pub fn contains(&self, parent: NamespaceId, name: &str) -> bool {
        self.nodes[parent.0]
            .children
            .iter()
            .any(|child| self.child_name(child) == name)
    }

    /// Looks up a direct namespace child by name.
    pub fn find_child_namespace(&self, parent: NamespaceId, name: &str) -> Option<NamespaceId> {
        self.nodes[parent.0].children.iter().find_map(|child| match child {
            Component::Namespace(id) if self.nodes[id.0].name == name => Some(*id),
            _ => None,
        })
    }

    /// Attaches a leaf unless the parent already has a child of that name.
    pub fn add_leaf(&mut self, parent: NamespaceId, leaf: ClassLeaf) {
        if !self.contains(parent, leaf.name()) {
            self.nodes[parent.0].children.push(Component::Leaf(leaf));
        }
    }

    /// Attaches a namespace child unless the parent already has one of that
    /// name, or the edge would make the parent reachable from itself.
    pub fn add_namespace(&mut self, parent: NamespaceId, child: NamespaceId) {
        if self.creates_cycle(parent, child) {
            return;
        }
        let name = self.nodes[child.0].name.clone();
        if !self.contains(parent, &name) {
            self.nodes[parent.0].children.push(Component::Namespace(child));
        }
    }

    /// True when attaching `child` under `parent` would close a cycle. The
    /// name-keyed registry can hand back a container that already sits above
    /// `parent` (a segment named like the build root, or a directory named
    /// like an ancestor); attaching it would make [`Self::render`] recurse
    /// forever.
    pub fn creates_cycle(&self, parent: NamespaceId, child: NamespaceId) -> bool {
        parent == child || self.is_reachable(child, parent)
    }

    fn is_reachable(&self, from: NamespaceId, target: NamespaceId) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if visited[id.0] {
                continue;
            }
            visited[id.0] = true;
            for child in &self.nodes[id.0].children {
                if let Component::Namespace(next) = child {
                    stack.push(*next);
                }
            }
        }
        false
    }

    fn child_name<'a>(&'a self, child: &'a Component) -> &'a str {
        match child {
            Component::Leaf(leaf) => leaf.name(),
            Component::Namespace(id) => &self.nodes[id.0].name,
        }
    }

    /// Renders the namespace block rooted at `id`, depth-first, children in
    /// insertion order. Each child render ends with a newline, and children
    /// are joined with one more, which leaves a separator blank line after
    /// every child at that child's indentation.
    pub fn render(&self, id: NamespaceId) -> String {
        let node = &self.nodes[id.0];
        let body = node
            .children
            .iter()
            .map(|child| match child {
                Component::Leaf(leaf) => leaf.render(),
                Component::Namespace(child_id) => self.render(*child_id),
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "export namespace {} {{\n{}}}\n",
            node.name,
            indent_block(&body, 2)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_leaf() -> ClassLeaf {
        let mut leaf = ClassLeaf::new(
            "Example",
            "projectName: string;\nstatusId?: number;",
        )
        .with_superclass(Some("Example2".to_string()));
        leaf.set_path(vec![
            "BussinessLogic".to_string(),
            "PendingCollection".to_string(),
            "InnerBussiness".to_string(),
            "Foo".to_string(),
            "Bar".to_string(),
        ]);
        leaf
    }

    #[test]
    fn test_qualified_name_levels() {
        let leaf = example_leaf();
        let full = "BussinessLogic.PendingCollection.InnerBussiness.Foo.Bar.Example";
        let at = |level: usize| {
            full.split('.')
                .skip(level)
                .collect::<Vec<_>>()
                .join(".")
        };

        assert_eq!(leaf.qualified_name(0), full);
        for level in 1..=5 {
            assert_eq!(leaf.qualified_name(level), at(level));
        }
        assert_eq!(leaf.qualified_name(5), "Example");
    }

    #[test]
    fn test_set_path_replaces_qualification() {
        let mut leaf = example_leaf();
        leaf.set_path(vec![
            "Hero".to_string(),
            "SpiderMan".to_string(),
            "PeterParker".to_string(),
            "Marvel".to_string(),
        ]);
        assert_eq!(
            leaf.qualified_name(0),
            "Hero.SpiderMan.PeterParker.Marvel.Example"
        );
    }

    #[test]
    fn test_leaf_render_with_superclass() {
        let leaf = example_leaf();
        assert_eq!(
            leaf.render(),
            "export class Example extends Example2{\n\
             \x20 projectName: string;\n\
             \x20 statusId?: number;\n\
             }\n"
        );
    }

    #[test]
    fn test_leaf_render_without_superclass() {
        let leaf = ClassLeaf::new("Search", "id: number;");
        assert_eq!(leaf.render(), "export class Search {\n  id: number;\n}\n");
    }

    #[test]
    fn test_children_unique_by_name() {
        let mut tree = NamespaceTree::new();
        let root = tree.add_container("Root");

        tree.add_leaf(root, ClassLeaf::new("Example", "a: number;"));
        tree.add_leaf(root, ClassLeaf::new("Example", "b: number;"));
        assert_eq!(tree.container(root).children().len(), 1);

        let child = tree.add_container("Example");
        tree.add_namespace(root, child);
        assert_eq!(tree.container(root).children().len(), 1);
    }

    #[test]
    fn test_nested_render() {
        let mut tree = NamespaceTree::new();
        let root = tree.add_container("BussinessLogic");
        let inner = tree.add_container("PendingCollection");
        tree.add_leaf(root, ClassLeaf::new("Search", "id: number;"));
        tree.add_leaf(inner, ClassLeaf::new("Result", "clientName: string;"));
        tree.add_namespace(root, inner);

        let expected = "export namespace BussinessLogic {\n\
                        \x20 export class Search {\n\
                        \x20   id: number;\n\
                        \x20 }\n\
                        \x20 \n\
                        \x20 export namespace PendingCollection {\n\
                        \x20   export class Result {\n\
                        \x20     clientName: string;\n\
                        \x20   }\n\
                        \x20   \n\
                        \x20 }\n\
                        \x20 \n\
                        }\n";
        assert_eq!(tree.render(root), expected);
    }

    #[test]
    fn test_shared_container_renders_under_both_parents() {
        // A same-named segment reused from the registry may be the child of
        // two different parents; rendering repeats it in each location.
        let mut tree = NamespaceTree::new();
        let root = tree.add_container("Root");
        let a = tree.add_container("A");
        let b = tree.add_container("B");
        let shared = tree.add_container("Shared");
        tree.add_leaf(shared, ClassLeaf::new("Thing", "x: number;"));
        tree.add_namespace(a, shared);
        tree.add_namespace(b, shared);
        tree.add_namespace(root, a);
        tree.add_namespace(root, b);

        let rendered = tree.render(root);
        assert_eq!(rendered.matches("export namespace Shared {").count(), 2);
    }

    #[test]
    fn test_add_namespace_refuses_cycle() {
        let mut tree = NamespaceTree::new();
        let root = tree.add_container("Configurations");
        let foo = tree.add_container("Foo");
        tree.add_namespace(root, foo);

        // Self-edges and back-edges to an ancestor are dropped.
        tree.add_namespace(foo, foo);
        tree.add_namespace(foo, root);
        assert!(tree.container(foo).children().is_empty());

        assert!(tree.creates_cycle(foo, root));
        assert!(tree.creates_cycle(foo, foo));
        assert!(!tree.creates_cycle(root, foo));

        // Still renders, and only nests Foo the one time.
        let rendered = tree.render(root);
        assert_eq!(rendered.matches("export namespace Foo {").count(), 1);
    }
}
