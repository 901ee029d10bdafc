mod common;

use common::{assert_graph_invariants, build_graph, node, node_names};
use tsuml_core::model::FilePosition;
use tsuml_typescript::TypeScriptAnalyzer;

const SHAPES: &str = r#"namespace Shapes {
    export interface Shape { area(): number; }
    export class Circle implements Shape {
        constructor(private radius: number) {}
        area() { return Math.PI * this.radius * this.radius; }
    }
    export function total(shapes: Shape[]) {
        return shapes.reduce((sum, s) => sum + s.area(), 0);
    }
}
enum Color { Red, Green }
const palette = [Color.Red, Color.Green];
function paint(c: Shapes.Circle) {
    return Shapes.total([c]) + palette.length;
}
"#;

#[test]
fn given_mixed_program_when_graphed_then_structural_invariants_hold() {
    let graph = build_graph("inv.ts", SHAPES);
    assert_graph_invariants(&graph);
    assert!(!graph.edges.is_empty());
}

#[test]
fn given_qualified_references_when_graphed_then_edges_target_the_members() {
    let graph = build_graph("inv.ts", SHAPES);

    assert!(graph.edge("inv.paint", "inv.Shapes.Circle").is_some());
    assert!(graph.edge("inv.paint", "inv.Shapes.total").is_some());
    assert!(graph.edge("inv.paint", "inv.palette").is_some());
    assert!(graph.edge("inv.Shapes.Circle", "inv.Shapes.Shape").is_some());
    assert!(graph.edge("inv.Shapes.total", "inv.Shapes.Shape").is_some());
    assert!(graph.edge("inv.palette", "inv.Color.Red").is_some());

    let color = graph
        .edge("inv.palette", "inv.Color")
        .expect("palette uses Color");
    assert_eq!(color.weight, 2);
    assert_eq!(
        color.references,
        vec![
            FilePosition {
                file_name: "inv.ts".to_string(),
                line: 11,
                column: 17,
            },
            FilePosition {
                file_name: "inv.ts".to_string(),
                line: 11,
                column: 28,
            },
        ]
    );
}

#[test]
fn given_this_member_access_when_graphed_then_edge_points_at_parameter_property() {
    let graph = build_graph("inv.ts", SHAPES);
    let radius = node(&graph, "radius");
    let area = graph
        .nodes
        .iter()
        .find(|n| n.id == "inv.Shapes.Circle.area")
        .expect("Circle.area node");

    let edge = graph.edge(&area.id, &radius.id).expect("area uses radius");
    assert_eq!(edge.weight, 2);
}

#[test]
fn given_same_input_when_graphed_twice_then_output_is_identical() {
    let analyzer = TypeScriptAnalyzer::default();
    let first = analyzer.compute_graph(SHAPES, "inv.ts").unwrap();
    let second = analyzer.compute_graph(SHAPES, "inv.ts").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_json(false).unwrap(), second.to_json(false).unwrap());
}

#[test]
fn given_shadowed_name_when_graphed_then_only_the_outer_binding_is_linked() {
    let graph = build_graph(
        "shadow.ts",
        "const value = 1;\nfunction a() { const value = 2; return value; }\nfunction b() { return value; }\n",
    );

    assert_eq!(node_names(&graph), vec!["value", "a", "b"]);
    assert_eq!(graph.edges.len(), 1);
    assert!(graph.edge("shadow.b", "shadow.value").is_some());
}

#[test]
fn given_nested_declarations_when_referencing_then_innermost_container_is_the_source() {
    let graph = build_graph(
        "inner.ts",
        "function target() {}\nclass Outer {\n    method() { target(); }\n}\n",
    );

    assert!(graph.edge("inner.Outer.method", "inner.target").is_some());
    assert!(graph.edge("inner.Outer", "inner.target").is_none());
}

#[test]
fn given_child_referencing_parent_when_graphed_then_no_edge_is_emitted() {
    let graph = build_graph(
        "rec.ts",
        "class Node {\n    next(): Node { return new Node(); }\n}\nfunction fact(n: number): number { return n <= 1 ? 1 : n * fact(n - 1); }\n",
    );

    assert!(graph.edges.is_empty(), "edges: {:?}", graph.edges);
}

#[test]
fn given_overloads_when_graphed_then_declarations_merge_into_one_node() {
    let graph = build_graph(
        "over.ts",
        "function over(a: string): void;\nfunction over(a: number): void;\nfunction over(a: any) {}\nfunction use() { over(1); over(\"x\"); }\n",
    );

    assert_eq!(node_names(&graph), vec!["over", "use"]);
    let over = node(&graph, "over");
    assert_eq!(over.start_line, 1);
    let edge = graph.edge("over.use", "over.over").expect("use calls over");
    assert_eq!(edge.weight, 2);
}

#[test]
fn given_member_access_on_unknown_receiver_when_name_is_unique_then_edge_is_kept() {
    let graph = build_graph(
        "uniq.ts",
        "class Store { load() {} }\nclass Cache { save() {} }\nfunction run(s: any, c: any) { s.load(); c.save(); c.missing(); }\n",
    );

    assert!(graph.edge("uniq.run", "uniq.Store.load").is_some());
    assert!(graph.edge("uniq.run", "uniq.Cache.save").is_some());
    assert_eq!(graph.edges.len(), 2);
}

#[test]
fn given_positions_when_graphed_then_lines_and_columns_follow_conventions() {
    let graph = build_graph("pos.ts", "class A {\n  m() {}\n}\n");

    let class = node(&graph, "A");
    assert_eq!(class.file_position.line, 0);
    assert_eq!(class.file_position.column, 6);
    assert_eq!(class.start_line, 1);
    assert_eq!(class.line_count, 2);
    assert_eq!(class.node_size, 30);

    let method = node(&graph, "m");
    assert_eq!(method.file_position.line, 1);
    assert_eq!(method.file_position.column, 2);
    assert_eq!(method.start_line, 2);
    assert_eq!(method.line_count, 0);
    assert_eq!(method.node_size, 30);

    let json: serde_json::Value = serde_json::from_str(&graph.to_json(false).unwrap()).unwrap();
    assert_eq!(json["nodes"][1]["parent"], "pos.A");
    assert_eq!(json["nodes"][0]["kind"], "class");
    assert_eq!(json["nodes"][0]["filePosition"]["fileName"], "pos.ts");
}

#[test]
fn given_empty_source_when_graphed_then_graph_is_empty() {
    let graph = build_graph("empty.ts", "");
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
}

#[test]
fn given_class_extending_a_member_of_itself_when_graphed_then_analysis_completes() {
    let graph = build_graph(
        "rec.ts",
        "class Other { y = 1; }\nclass A extends A.B { m() { return this.y; } }\n",
    );

    assert_eq!(node_names(&graph), vec!["Other", "y", "A", "m"]);
    assert!(graph.edges.is_empty(), "edges: {:?}", graph.edges);
}

#[test]
fn given_sibling_object_literals_when_graphed_then_each_member_is_its_own_node() {
    let graph = build_graph(
        "coll.ts",
        "const handlers = [{ handle() { a(); } }, { handle() { b(); } }];\nfunction a() {}\nfunction b() {}\n",
    );

    let handles: Vec<_> = graph.children_of("coll.handlers").collect();
    assert_eq!(handles.len(), 2);
    assert_ne!(handles[0].id, handles[1].id);
    assert!(graph.edge(&handles[0].id, "coll.a").is_some());
    assert!(graph.edge(&handles[1].id, "coll.b").is_some());
    assert!(graph.edge(&handles[0].id, "coll.b").is_none());
    assert_graph_invariants(&graph);
}

#[test]
fn given_returned_object_literals_when_graphed_then_their_members_stay_apart() {
    let graph = build_graph(
        "ret.ts",
        "function f(flag: boolean) {\n    if (flag) return { run() { return 1; } };\n    return { run() { return 2; } };\n}\n",
    );

    let runs: Vec<_> = graph.nodes_named("run").collect();
    assert_eq!(runs.len(), 2);
    assert_ne!(runs[0].id, runs[1].id);
    assert!(runs.iter().all(|run| run.parent.as_deref() == Some("ret.f")));
}

#[test]
fn given_top_level_call_when_graphed_then_no_edge_is_recorded() {
    let graph = build_graph("top.ts", "function f() {}\nf();\n");
    assert_eq!(node_names(&graph), vec!["f"]);
    assert!(graph.edges.is_empty());
}

#[test]
fn given_merged_class_and_namespace_when_members_share_a_name_then_ids_stay_unique() {
    let graph = build_graph(
        "mrg.ts",
        "class Merged { m() {} }\nnamespace Merged { export function m() {} }\n",
    );

    let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["mrg.Merged", "mrg.Merged.m", "mrg.Merged.m@2:36"]);
    assert_eq!(
        graph.node("mrg.Merged.m@2:36").and_then(|n| n.parent.as_deref()),
        Some("mrg.Merged")
    );
    assert_graph_invariants(&graph);
}
