//! Class Inheritance Graph
//!
//! Resolution of `is_a` / `mixins` relations. The resolvers in
//! [`ancestry`] and [`slots`] work directly on the name-keyed maps of a
//! [`Schema`]; [`InheritanceGraph`] is a petgraph view of the same edges used
//! for cycle-group summaries and DOT export.

pub mod ancestry;
pub mod slots;

pub use ancestry::{ancestors_of, Ancestry, InheritanceIssue, ParentEdge};
pub use slots::{effective_slots, effective_slots_with};

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use crate::schema::{ClassName, Schema};

/// A node in the inheritance graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    pub name: ClassName,
    /// False for parents that are named but never declared
    pub defined: bool,
}

/// Directed graph with an edge from each class to each of its parents
pub struct InheritanceGraph {
    graph: DiGraph<ClassNode, ParentEdge>,
}

impl InheritanceGraph {
    /// Build the graph from a schema
    pub fn build(schema: &Schema) -> Self {
        let mut graph = DiGraph::with_capacity(schema.classes.len(), schema.classes.len() * 2);
        let mut node_indices: HashMap<ClassName, NodeIndex> =
            HashMap::with_capacity(schema.classes.len());

        for name in schema.classes.keys() {
            let idx = graph.add_node(ClassNode {
                name: name.clone(),
                defined: true,
            });
            node_indices.insert(name.clone(), idx);
        }

        for (name, class) in &schema.classes {
            let from = node_indices[name];
            let parents = class
                .is_a
                .iter()
                .map(|p| (p, ParentEdge::IsA))
                .chain(class.mixins.iter().map(|m| (m, ParentEdge::Mixin)));

            for (parent, edge) in parents {
                let to = *node_indices.entry(parent.clone()).or_insert_with(|| {
                    graph.add_node(ClassNode {
                        name: parent.clone(),
                        defined: false,
                    })
                });
                graph.add_edge(from, to, edge);
            }
        }

        Self { graph }
    }

    /// Number of class nodes, including undefined parents
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of `is_a` + mixin edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Groups of classes that inherit from each other in a cycle.
    ///
    /// Each group is a strongly connected component with more than one
    /// member, or a single class that names itself as a parent. Members are
    /// sorted by name; groups are sorted by their first member.
    pub fn cyclic_groups(&self) -> Vec<Vec<ClassName>> {
        let mut groups: Vec<Vec<ClassName>> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1
                    || self
                        .graph
                        .edges(scc[0])
                        .any(|e| e.target() == scc[0])
            })
            .map(|scc| {
                let mut members: Vec<ClassName> = scc
                    .into_iter()
                    .map(|idx| self.graph[idx].name.clone())
                    .collect();
                members.sort();
                members
            })
            .collect();
        groups.sort();
        groups
    }

    /// Export to GraphViz DOT. Mixin edges are dashed, undefined parents red.
    pub fn to_dot(&self) -> String {
        let mut output = String::new();

        output.push_str("digraph Inheritance {\n");
        output.push_str("  rankdir=BT;\n");
        output.push_str("  node [shape=box, style=\"rounded\", fontname=\"Helvetica\", fontsize=10];\n");
        output.push('\n');

        for node in self.graph.node_weights() {
            if node.defined {
                output.push_str(&format!("  \"{}\";\n", node.name));
            } else {
                output.push_str(&format!(
                    "  \"{}\" [color=\"#F44336\", fontcolor=\"#F44336\"];\n",
                    node.name
                ));
            }
        }

        output.push('\n');

        for edge in self.graph.edge_references() {
            let from = &self.graph[edge.source()].name;
            let to = &self.graph[edge.target()].name;
            match edge.weight() {
                ParentEdge::IsA => output.push_str(&format!("  \"{}\" -> \"{}\";\n", from, to)),
                ParentEdge::Mixin => output.push_str(&format!(
                    "  \"{}\" -> \"{}\" [style=dashed, label=\"mixin\"];\n",
                    from, to
                )),
            }
        }

        output.push_str("}\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ClassDef;

    #[test]
    fn test_build_counts() {
        let schema = Schema::new()
            .with_class(ClassDef::new("A").with_is_a("B").with_mixins(["Ghost"]))
            .with_class(ClassDef::new("B"));

        let graph = InheritanceGraph::build(&schema);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.to_dot().contains("\"Ghost\" [color="));
        assert!(graph.cyclic_groups().is_empty());
    }

    #[test]
    fn test_cyclic_groups() {
        let schema = Schema::new()
            .with_class(ClassDef::new("A").with_is_a("B"))
            .with_class(ClassDef::new("B").with_is_a("A"))
            .with_class(ClassDef::new("Solo").with_mixins(["Solo"]))
            .with_class(ClassDef::new("Fine"));

        let graph = InheritanceGraph::build(&schema);
        assert_eq!(
            graph.cyclic_groups(),
            vec![
                vec!["A".to_string(), "B".to_string()],
                vec!["Solo".to_string()],
            ]
        );
    }

    #[test]
    fn test_dot_export() {
        let schema = Schema::new()
            .with_class(ClassDef::new("Person").with_is_a("NamedThing").with_mixins(["Aliased"]))
            .with_class(ClassDef::new("NamedThing"));

        let dot = InheritanceGraph::build(&schema).to_dot();
        assert!(dot.starts_with("digraph Inheritance {"));
        assert!(dot.contains("\"Person\" -> \"NamedThing\";"));
        assert!(dot.contains("\"Person\" -> \"Aliased\" [style=dashed"));
        assert!(dot.contains("\"Aliased\" [color=\"#F44336\""));
    }
}
