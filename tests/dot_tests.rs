use parallel_stacks::dot::{
    build_segments, generate_dot, generate_text_tree, serialize, DotConfig, DotStyle,
};
use parallel_stacks::merger::merge;
use parallel_stacks::model::{Frame, Graph, IdentityPolicy, MergeNode, NodeId, Stack};
use parallel_stacks::parser::parse_inline;
use parallel_stacks::utils::error::GraphError;
use pretty_assertions::assert_eq;

fn stack(names: &[&str]) -> Stack {
    Stack::new(names.iter().map(|n| Frame::named(*n)).collect())
}

fn node(
    id: usize,
    function: &str,
    depth: usize,
    children: &[usize],
    threads: &[usize],
) -> MergeNode {
    MergeNode {
        id: NodeId::new(id),
        frame: Frame::named(function),
        depth,
        children: children.iter().map(|&c| NodeId::new(c)).collect(),
        thread_count: threads.len(),
        threads: threads.to_vec(),
        positional: false,
    }
}

#[test]
fn test_helper_other_scenario() {
    let graph = merge(&[stack(&["helper", "main"]), stack(&["other", "main"])]);
    let dot = serialize(&graph).unwrap();

    assert!(dot.starts_with("digraph parallel_stacks {\n"));
    assert!(dot.contains("  n0 [label=\"main\\n(2 threads)\""));
    assert!(dot.contains("  n1 [label=\"helper\""));
    assert!(dot.contains("  n2 [label=\"other\""));
    assert!(dot.contains("  n0 -> n1;\n"));
    assert!(dot.contains("  n0 -> n2;\n"));
    assert_eq!(dot.matches("->").count(), 2);
    assert!(dot.ends_with("}\n"));
}

#[test]
fn test_one_node_statement_per_merge_node() {
    let graph = merge(&parse_inline("f,e,d,c,b,a; f,e,g,c,b,a"));
    let dot = serialize(&graph).unwrap();

    assert_eq!(dot.matches(" [label=").count(), graph.len());
    assert_eq!(dot.matches("->").count(), graph.len() - graph.roots().len());
}

#[test]
fn test_serialize_is_deterministic() {
    let stacks = parse_inline("c,b,a; d,b,a; e,x");
    assert_eq!(serialize(&merge(&stacks)).unwrap(), serialize(&merge(&stacks)).unwrap());
}

#[test]
fn test_empty_stack_gives_identical_dot() {
    let with_empty = merge(&[stack(&["b", "a"]), Stack::default(), stack(&["c", "a"])]);
    let without = merge(&[stack(&["b", "a"]), stack(&["c", "a"])]);

    assert_eq!(serialize(&with_empty).unwrap(), serialize(&without).unwrap());
}

#[test]
fn test_hostile_names_are_escaped() {
    let graph = merge(&[Stack::new(vec![
        Frame::new("say \"hi\"\nnow", "C:\\src\\x.c", 1, 1),
        Frame::new("héllo::<T>", "ünï.rs", 2, 0),
    ])]);

    let dot = serialize(&graph).unwrap();
    assert!(dot.contains("label=\"héllo::<T>\\nünï.rs\""));
    assert!(dot.contains("label=\"say \\\"hi\\\"\\nnow\\nC:\\\\src\\\\x.c\""));

    let tables_config = DotConfig::new().with_style(DotStyle::Tables);
    let tables = generate_dot(&graph, Some(&tables_config)).unwrap();
    assert!(tables.contains("héllo::&lt;T&gt;"));
    assert!(tables.contains("say &quot;hi&quot;"));
}

#[test]
fn test_tables_collapse_chains() {
    let graph = merge(&parse_inline("f,e,d,c,b,a; g,e,d,c,b,a"));
    let (segments, links) = build_segments(&graph);

    // a..e shared by both threads, then f and g on their own
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].nodes.len(), 5);
    assert_eq!(segments[0].thread_count, 2);
    assert_eq!(links.len(), 2);

    let dot = generate_dot(&graph, Some(&DotConfig::new().with_style(DotStyle::Tables))).unwrap();
    assert!(dot.contains("2 Threads"));
    assert!(dot.contains("1 Thread<"));
    assert_eq!(dot.matches("->").count(), 2);
}

#[test]
fn test_cycle_is_rejected() {
    let graph = Graph::from_parts(
        IdentityPolicy::Location,
        vec![NodeId::new(0)],
        vec![node(0, "a", 0, &[1], &[0]), node(1, "b", 1, &[0], &[0])],
        vec![None],
    );

    assert!(matches!(serialize(&graph), Err(GraphError::InvariantViolation(_))));
    assert!(generate_text_tree(&graph, 15).is_err());
}

#[test]
fn test_duplicate_siblings_are_rejected() {
    let graph = Graph::from_parts(
        IdentityPolicy::Location,
        vec![NodeId::new(0)],
        vec![
            node(0, "main", 0, &[1, 2], &[0, 1]),
            node(1, "work", 1, &[], &[0]),
            node(2, "work", 1, &[], &[1]),
        ],
        vec![None, None],
    );

    let err = serialize(&graph).unwrap_err();
    assert!(err.to_string().contains("invariant"));
}

#[test]
fn test_wrong_thread_count_is_rejected() {
    let mut bad = node(0, "main", 0, &[], &[0]);
    bad.thread_count = 3;
    let graph = Graph::from_parts(
        IdentityPolicy::Location,
        vec![NodeId::new(0)],
        vec![bad],
        vec![None],
    );

    assert!(serialize(&graph).is_err());
}

#[test]
fn test_repeated_thread_position_is_rejected() {
    // two stacks, but node 0 claims the first one twice
    let graph = Graph::from_parts(
        IdentityPolicy::Location,
        vec![NodeId::new(0)],
        vec![node(0, "main", 0, &[], &[0, 0])],
        vec![None, None],
    );

    assert!(matches!(serialize(&graph), Err(GraphError::InvariantViolation(_))));
}

#[test]
fn test_unreachable_node_is_rejected() {
    let graph = Graph::from_parts(
        IdentityPolicy::Location,
        vec![NodeId::new(0)],
        vec![node(0, "main", 0, &[], &[0]), node(1, "lost", 1, &[], &[0])],
        vec![None],
    );

    assert!(serialize(&graph).is_err());
}

#[test]
fn test_text_tree() {
    let graph = merge(&[stack(&["helper", "main"]), stack(&["other", "main"])]);
    let text = generate_text_tree(&graph, 15).unwrap();

    assert_eq!(text, "main [2 threads]\n  helper\n  other");
}
