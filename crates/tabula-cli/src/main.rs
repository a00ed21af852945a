//! Tabula CLI - render tables from YAML models.
//!
//! ```text
//! tabula render -s demos/orders/schema.yaml -d demos/orders/data.yaml -t OrderLine -f Order.Lines --edit
//! tabula check demos/orders/schema.yaml
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tabula::yaml::{load_options, Schema, TableData};
use tabula::{RenderOptions, TableHelper};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tabula")]
#[command(about = "Render metadata-driven HTML tables from YAML models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a table to stdout
    Render(RenderArgs),

    /// Check a model manifest and list its types
    Check {
        /// Path to the manifest
        #[arg(default_value = "schema.yaml")]
        schema: PathBuf,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Model manifest
    #[arg(short, long)]
    schema: PathBuf,

    /// Row data: a sequence of rows, or a mapping with `rows` and view-model keys
    #[arg(short, long)]
    data: PathBuf,

    /// Row type declared in the manifest
    #[arg(short = 't', long = "type")]
    row_type: String,

    /// Field name the rows are bound to
    #[arg(short, long, default_value = "Model")]
    field: String,

    /// Render an editable table
    #[arg(short, long)]
    edit: bool,

    /// Render options
    #[arg(short, long)]
    options: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Render(args) => {
            let html = render(&args)?;
            println!("{html}");
            Ok(())
        }
        Commands::Check { schema } => {
            for line in check(&schema)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_schema(path: &Path) -> Result<Schema> {
    Schema::from_yaml(&read(path)?).with_context(|| format!("invalid manifest {}", path.display()))
}

fn render(args: &RenderArgs) -> Result<String> {
    let schema = load_schema(&args.schema)?;
    let row_type = schema.require(&args.row_type, "--type")?;
    let data = TableData::from_yaml(&read(&args.data)?, row_type)
        .with_context(|| format!("invalid data {}", args.data.display()))?;
    let options = match &args.options {
        Some(path) => load_options(&read(path)?)
            .with_context(|| format!("invalid options {}", path.display()))?,
        None => RenderOptions::default(),
    };

    let helper = TableHelper::new().with_options(options);
    let html = if args.edit {
        helper
            .editor_for(&args.field, &data.rows, row_type, &data.view)?
            .to_html()
    } else {
        helper.display_for(&args.field, &data.rows, row_type)?.to_html()
    };
    info!(row_type = %args.row_type, edit = args.edit, bytes = html.len(), "rendered");
    Ok(html)
}

fn check(path: &Path) -> Result<Vec<String>> {
    let schema = load_schema(path)?;
    Ok(schema
        .type_names()
        .filter_map(|name| schema.get(name))
        .map(|ty| format!("{}: {} properties", ty.name, ty.properties.len()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo(file: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../demos/orders")
            .join(file)
    }

    fn args(edit: bool) -> RenderArgs {
        RenderArgs {
            schema: demo("schema.yaml"),
            data: demo("data.yaml"),
            row_type: "OrderLine".to_string(),
            field: "Order.Lines".to_string(),
            edit,
            options: Some(demo("options.yaml")),
        }
    }

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "tabula", "render", "-s", "s.yaml", "-d", "d.yaml", "-t", "Line", "--edit",
        ])
        .unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.row_type, "Line");
        assert_eq!(args.field, "Model");
        assert!(args.edit && args.options.is_none());
    }

    #[test]
    fn test_render_read_only_demo() {
        let html = render(&args(false)).unwrap();
        assert!(html.starts_with(r#"<table id="Order_Lines" class="readonly-table""#));
        assert!(html.contains("<th>Line</th>"));
        assert!(html.contains(r#"href="/Customers/Details/7""#));
        assert!(html.contains("Sent"));
    }

    #[test]
    fn test_render_editable_demo() {
        let html = render(&args(true)).unwrap();
        assert!(html.contains(r#"name="Order.Lines[0].Qty""#));
        assert!(html.contains(r#"<datalist id="product-datalist">"#));
        assert!(html.contains(">North depot</option>"));
        assert!(html.contains("template-body"));
    }

    #[test]
    fn test_unknown_row_type() {
        let mut a = args(false);
        a.row_type = "Invoice".to_string();
        let err = render(&a).unwrap_err();
        assert!(err.to_string().contains("unknown type 'Invoice'"));
    }

    #[test]
    fn test_check_demo_schema() {
        let lines = check(&demo("schema.yaml")).unwrap();
        assert_eq!(lines, vec!["Customer: 2 properties", "OrderLine: 10 properties"]);
    }

    #[test]
    fn test_missing_file() {
        let err = check(Path::new("no/such/schema.yaml")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }
}
