use crate::Cli;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tsuml_core::config::GraphConfig;
use tsuml_core::error::Result;
use tsuml_core::model::DependencyGraph;
use tsuml_typescript::TypeScriptAnalyzer;

pub fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let analyzer = TypeScriptAnalyzer::new(config);

    let graphs = render_graphs(&cli.files, &analyzer)?;
    write_output(&graphs, cli.output.as_deref(), cli.pretty)
}

pub fn load_config(path: Option<&Path>) -> Result<GraphConfig> {
    match path {
        Some(path) => {
            info!("Loading graph settings from {}", path.display());
            GraphConfig::from_file(path)
        }
        None => Ok(GraphConfig::default()),
    }
}

/// Analyzes each file independently, keyed by the path as given.
pub fn render_graphs(
    files: &[PathBuf],
    analyzer: &TypeScriptAnalyzer,
) -> Result<IndexMap<String, DependencyGraph>> {
    let mut graphs = IndexMap::with_capacity(files.len());
    for path in files {
        let file_name = path.to_string_lossy().to_string();
        let source = std::fs::read_to_string(path)?;
        let analysis = analyzer.analyze(&source, &file_name)?;

        if let Some(alias) = &analysis.framework_alias {
            if analysis.framework_alias_unused() {
                debug!("{}: namespace import {} is never used", file_name, alias.name);
            }
        }
        info!(
            "{}: {} nodes, {} edges",
            file_name,
            analysis.graph.nodes.len(),
            analysis.graph.edges.len()
        );
        graphs.insert(file_name, analysis.graph);
    }
    Ok(graphs)
}

pub fn write_output(
    graphs: &IndexMap<String, DependencyGraph>,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(graphs)?
    } else {
        serde_json::to_string(graphs)?
    };
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("Graph written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
