use futures::StreamExt;
use std::sync::Arc;
use triplestream_common::{Graph, Slice};
use triplestream_model::{BlankNodeMatchingMode, Literal, Node, Triple};
use triplestream_storage::memory::MemGraph;

fn example_triple() -> Triple {
    Triple::new(
        Node::uri("http://example.com/subject"),
        Node::uri("http://example.com/predicate"),
        Literal::new_simple_literal("value"),
    )
}

fn numbered_triple(n: usize) -> Triple {
    Triple::new(
        Node::uri(format!("http://example.com/s{n}")),
        Node::uri("http://example.com/predicate"),
        Literal::new_simple_literal(n.to_string()),
    )
}

fn any_triple() -> Triple {
    Triple::new(
        Node::variable("s"),
        Node::variable("p"),
        Node::variable("o"),
    )
}

async fn filled_graph(count: usize) -> MemGraph {
    let graph = MemGraph::new();
    graph
        .extend((0..count).map(numbered_triple).collect())
        .await
        .unwrap();
    graph
}

async fn collect(graph: &MemGraph, pattern: &Triple, mode: BlankNodeMatchingMode) -> Vec<Triple> {
    graph
        .filter(pattern, mode)
        .await
        .unwrap()
        .map(Result::unwrap)
        .collect()
        .await
}

#[tokio::test]
async fn insert_triple() {
    let graph = MemGraph::new();

    let inserted = graph.add(example_triple()).await.unwrap();
    assert!(inserted);
    assert_eq!(graph.len().await.unwrap(), 1);
}

#[tokio::test]
async fn insert_duplicate_triples_no_effect() {
    let graph = MemGraph::new();

    graph.add(example_triple()).await.unwrap();
    let inserted = graph
        .extend(vec![example_triple(), example_triple()])
        .await
        .unwrap();
    assert_eq!(inserted, 0);
    assert_eq!(graph.len().await.unwrap(), 1);
}

#[tokio::test]
async fn filter_returns_matches_in_insertion_order() {
    let graph = filled_graph(5).await;

    let triples = collect(&graph, &any_triple(), BlankNodeMatchingMode::Variable).await;
    assert_eq!(triples, (0..5).map(numbered_triple).collect::<Vec<_>>());

    let pattern = Triple::new(
        Node::uri("http://example.com/s3"),
        Node::variable("p"),
        Node::variable("o"),
    );
    let triples = collect(&graph, &pattern, BlankNodeMatchingMode::Variable).await;
    assert_eq!(triples, vec![numbered_triple(3)]);
}

#[tokio::test]
async fn filter_does_not_compare_across_kinds() {
    let graph = MemGraph::new();
    graph.add(example_triple()).await.unwrap();

    let pattern = Triple::new(
        Node::variable("s"),
        Node::variable("p"),
        Node::uri("value"),
    );
    assert!(collect(&graph, &pattern, BlankNodeMatchingMode::Variable)
        .await
        .is_empty());
}

#[tokio::test]
async fn blank_node_matching_modes() {
    let graph = MemGraph::new();
    let stored = Triple::new(
        Node::blank_node("b0"),
        Node::uri("http://example.com/p"),
        Node::uri("http://example.com/o"),
    );
    graph.add(stored.clone()).await.unwrap();

    let pattern = Triple::new(
        Node::blank_node("other"),
        Node::uri("http://example.com/p"),
        Node::variable("o"),
    );
    assert_eq!(
        collect(&graph, &pattern, BlankNodeMatchingMode::Variable).await,
        vec![stored.clone()]
    );
    assert!(collect(&graph, &pattern, BlankNodeMatchingMode::Filter)
        .await
        .is_empty());

    let same = Triple::new(Node::blank_node("b0"), Node::variable("p"), Node::variable("o"));
    assert_eq!(
        collect(&graph, &same, BlankNodeMatchingMode::Filter).await,
        vec![stored]
    );
}

#[tokio::test]
async fn filter_subset_windows() {
    let graph = filled_graph(10).await;

    let count = |slice| {
        let graph = &graph;
        async move {
            graph
                .filter_subset(&any_triple(), BlankNodeMatchingMode::Variable, slice)
                .await
                .unwrap()
                .count()
                .await
        }
    };

    assert_eq!(count(Slice::from_signed(3, 0)).await, 3);
    assert_eq!(count(Slice::from_signed(5, 8)).await, 2);
    assert_eq!(count(Slice::from_signed(-1, 4)).await, 6);
    assert_eq!(count(Slice::from_signed(-1, -1)).await, 10);
    assert_eq!(count(Slice::from_signed(0, 0)).await, 0);
}

#[tokio::test]
async fn filter_subset_keeps_order() {
    let graph = filled_graph(10).await;

    let triples = graph
        .filter_subset(&any_triple(), BlankNodeMatchingMode::Variable, Slice::new(4, Some(2)))
        .await
        .unwrap()
        .map(Result::unwrap)
        .collect::<Vec<_>>()
        .await;
    assert_eq!(triples, vec![numbered_triple(4), numbered_triple(5)]);
}

#[tokio::test]
async fn delete_matching_triples() {
    let graph = filled_graph(4).await;
    graph.add(example_triple()).await.unwrap();

    let pattern = Triple::new(
        Node::variable("s"),
        Node::uri("http://example.com/predicate"),
        Node::variable("o"),
    );
    let removed = graph.delete(&pattern).await.unwrap();
    assert_eq!(removed, 5);
    assert!(graph.is_empty().await.unwrap());

    // Deleted triples can be added again.
    assert!(graph.add(example_triple()).await.unwrap());
}

#[tokio::test]
async fn scan_is_not_affected_by_concurrent_writes() {
    let graph = Arc::new(filled_graph(3).await);

    let mut stream = graph
        .filter(&any_triple(), BlankNodeMatchingMode::Variable)
        .await
        .unwrap();
    assert_eq!(stream.next().await.unwrap().unwrap(), numbered_triple(0));

    graph.delete(&any_triple()).await.unwrap();
    graph.add(numbered_triple(42)).await.unwrap();

    let rest = stream.map(Result::unwrap).collect::<Vec<_>>().await;
    assert_eq!(rest, vec![numbered_triple(1), numbered_triple(2)]);
    assert_eq!(graph.len().await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_readers() {
    let graph = Arc::new(filled_graph(100).await);

    let readers = (0..8)
        .map(|_| {
            let graph = Arc::clone(&graph);
            tokio::spawn(async move {
                graph
                    .filter(&any_triple(), BlankNodeMatchingMode::Variable)
                    .await
                    .unwrap()
                    .count()
                    .await
            })
        })
        .collect::<Vec<_>>();

    for reader in readers {
        assert_eq!(reader.await.unwrap(), 100);
    }
}
