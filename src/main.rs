use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use docmark::{Config, EditorContent, Error};

#[derive(Parser)]
#[command(name = "docmark")]
#[command(about = "Convert rich-text editor content to Markdown")]
struct Cli {
    /// Serialized editor content (HTML, optionally carrying the document tree)
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to docmark.toml in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document tree JSON; INPUT is then read as the plain HTML mirror
    #[arg(long)]
    tree: Option<PathBuf>,

    /// Render the resulting Markdown to HTML
    #[arg(long)]
    html: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn read(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a tree file; invalid JSON is logged and the HTML mirror is used instead.
fn parse_tree(path: &Path, json: &str) -> Option<serde_json::Value> {
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "tree file is not valid JSON, using HTML");
            None
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!("docmark={log_level}")))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => match Config::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => Config::load(Path::new("docmark.toml")),
    };

    let input = match read(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let markdown = match &cli.tree {
        Some(tree_path) => {
            let json = match read(tree_path) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            };
            let tree = parse_tree(tree_path, &json);
            docmark::convert_content(&EditorContent::new(input, tree), &config)
        }
        None => docmark::convert_with_config(&input, &config),
    };

    let rendered = if cli.html {
        docmark::markdown_to_html(&markdown)
    } else {
        markdown
    };

    match cli.output {
        Some(output) => {
            if let Err(e) = fs::write(&output, rendered) {
                eprintln!("Error writing {}: {}", output.display(), e);
                process::exit(1);
            }
            eprintln!("Created {}", output.display());
        }
        None => print!("{rendered}"),
    }
}
