use clap::Parser;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use tsuml_cli::{Cli, load_config, render_graphs, write_output};
use tsuml_typescript::TypeScriptAnalyzer;

#[test]
fn given_arguments_when_parsed_then_flags_map_to_fields() {
    let cli = Cli::try_parse_from(["tsuml", "a.ts", "b.tsx", "--pretty", "-o", "out.json"]).unwrap();
    assert_eq!(cli.files.len(), 2);
    assert!(cli.pretty);
    assert_eq!(cli.output.as_deref(), Some(std::path::Path::new("out.json")));
    assert!(cli.config.is_none());

    assert!(Cli::try_parse_from(["tsuml"]).is_err());
}

#[test]
fn given_two_files_when_rendered_then_graphs_are_keyed_in_argument_order() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.ts");
    let second = dir.path().join("second.ts");
    std::fs::write(&first, "function a() { b(); }\nfunction b() {}\n").unwrap();
    std::fs::write(&second, "class C {}\n").unwrap();

    let analyzer = TypeScriptAnalyzer::default();
    let graphs = render_graphs(&[first.clone(), second.clone()], &analyzer).unwrap();

    let keys: Vec<_> = graphs.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            first.to_string_lossy().to_string(),
            second.to_string_lossy().to_string()
        ]
    );
    assert!(graphs[0].edge("first.a", "first.b").is_some());
    assert_eq!(graphs[1].nodes[0].id, "second.C");

    let out = dir.path().join("out.json");
    write_output(&graphs, Some(&out), true).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json.as_object().unwrap().len(), 2);
}

#[test]
fn given_missing_file_when_rendered_then_io_error_is_reported() {
    let analyzer = TypeScriptAnalyzer::default();
    let result = render_graphs(&["/definitely/not/here.ts".into()], &analyzer);
    assert!(matches!(result, Err(tsuml_core::GraphError::Io(_))));
}

#[test]
fn given_config_file_when_loaded_then_settings_apply() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{\"track_parameters\": true}}").unwrap();
    let config = load_config(Some(file.path())).unwrap();
    assert!(config.track_parameters);
    assert_eq!(config.framework_namespace, "React");
}
