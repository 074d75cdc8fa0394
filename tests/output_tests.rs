use parallel_stacks::commands::{execute_merge, execute_render, InputSource, MergeArgs, RenderArgs};
use parallel_stacks::dot::{serialize, DotConfig, DotStyle};
use parallel_stacks::merger::merge;
use parallel_stacks::output::{read_graph, write_dot, write_graph, GraphDocument};
use parallel_stacks::parser::parse_inline;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

const GDB_DUMP: &str = r#"Thread 3 (Thread 0x7f00 (LWP 103) "worker"):
#0  0x00007f3e6a891d61 in pthread_cond_wait () from /lib/libc.so.6
#1  0x0000555555555a1c in queue_pop (q=0x5555) at src/queue.c:88
#2  worker_main (arg=0x0) at src/worker.c:31
#3  0x00007f3e6a894ac3 in start_thread () from /lib/libc.so.6

Thread 2 (Thread 0x7f01 (LWP 102) "worker"):
#0  0x00007f3e6a891d61 in pthread_cond_wait () from /lib/libc.so.6
#1  0x0000555555555a1c in queue_pop (q=0x5555) at src/queue.c:88
#2  worker_main (arg=0x1) at src/worker.c:31
#3  0x00007f3e6a894ac3 in start_thread () from /lib/libc.so.6

Thread 1 (Thread 0x7f02 (LWP 101) "app"):
#0  main () at src/main.c:12
"#;

#[test]
fn test_graph_document_round_trip() {
    let document = GraphDocument::new(merge(&parse_inline("helper, main; other, main")));
    let temp_file = NamedTempFile::new().unwrap();

    write_graph(&document, temp_file.path()).unwrap();
    let loaded = read_graph(temp_file.path()).unwrap();

    assert_eq!(loaded.graph, document.graph);
    assert_eq!(serialize(&loaded.graph).unwrap(), serialize(&document.graph).unwrap());
}

#[test]
fn test_write_dot_to_nested_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("a/b/stacks.dot");
    let dot = serialize(&merge(&parse_inline("b, a"))).unwrap();

    write_dot(&dot, &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), dot);
}

#[test]
fn test_merge_gdb_dump_end_to_end() {
    let temp_dir = tempfile::tempdir().unwrap();
    let gdb_path = temp_dir.path().join("bt.txt");
    std::fs::write(&gdb_path, GDB_DUMP).unwrap();
    let dot_path = temp_dir.path().join("stacks.dot");
    let json_path = temp_dir.path().join("graph.json");

    execute_merge(MergeArgs {
        input: InputSource::Gdb(gdb_path),
        output_dot: Some(dot_path.clone()),
        output_json: Some(json_path.clone()),
        ..Default::default()
    })
    .unwrap();

    let document = read_graph(&json_path).unwrap();
    assert_eq!(document.stats.stack_count, 3);
    // start_thread for the workers, main for the app thread
    assert_eq!(document.stats.root_count, 2);
    assert_eq!(document.stats.leaf_count, 2);
    assert_eq!(document.graph.thread_label(0), "3");

    let dot = std::fs::read_to_string(&dot_path).unwrap();
    assert!(dot.contains("pthread_cond_wait\\n/lib/libc.so.6\\n(2 threads)"));
}

#[test]
fn test_render_saved_graph_as_tables() {
    let temp_dir = tempfile::tempdir().unwrap();
    let json_path = temp_dir.path().join("graph.json");
    let dot_path = temp_dir.path().join("tables.dot");
    write_graph(
        &GraphDocument::new(merge(&parse_inline("c, b, a; d, b, a"))),
        &json_path,
    )
    .unwrap();

    execute_render(RenderArgs {
        graph: json_path,
        output_dot: Some(dot_path.clone()),
        dot_config: DotConfig::new().with_style(DotStyle::Tables).with_title("saved"),
    })
    .unwrap();

    let dot = std::fs::read_to_string(&dot_path).unwrap();
    assert!(dot.contains("label=\"saved\";"));
    assert!(dot.contains("seg0 [label=<"));
    assert_eq!(dot.matches("->").count(), 2);
}

#[test]
fn test_merge_rejects_bad_json_input() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("stacks.json");
    std::fs::write(&input, r#"{"frames": []}"#).unwrap();

    let result = execute_merge(MergeArgs {
        input: InputSource::Json(input),
        output_dot: Some(temp_dir.path().join("out.dot")),
        ..Default::default()
    });

    assert!(result.is_err());
    assert!(!temp_dir.path().join("out.dot").exists());
}
