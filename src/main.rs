mod catalog;
mod cli;
mod error;
mod ir;
mod layout;
mod parser;
mod render;
mod schema;
mod setup;
mod transform;

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Parser;

use catalog::Catalog;
use cli::{Cli, Commands};
use error::AppError;
use layout::LayoutStore;
use render::svg_surface::SvgSurface;
use schema::{SchemaExport, SchemaOptions};
use setup::{ConfigFile, ConfigGenerator, Eol};
use transform::ExternalTransformation;

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Schema {
            input,
            db,
            tables,
            layout,
            save_layout,
            output,
            page,
            page_name,
            show_color,
            show_keys,
            show_dimension,
            same_width,
            relations,
        } => {
            let options = SchemaOptions {
                show_color,
                show_keys,
                table_dimension: show_dimension,
                same_width,
                relation_source: relations.into(),
                page_number: page,
                page_name,
                ..SchemaOptions::default()
            };
            cmd_schema(SchemaArgs {
                input,
                db,
                tables,
                layout,
                save_layout,
                output,
                options,
            })?
        }
        Commands::Transform { programs, options } => cmd_transform(programs, &options)?,
        Commands::Config {
            input,
            defaults,
            output,
            eol,
        } => cmd_config(input, defaults, output, eol.into())?,
    }

    Ok(())
}

struct SchemaArgs {
    input: PathBuf,
    db: String,
    tables: Vec<String>,
    layout: Option<PathBuf>,
    save_layout: bool,
    output: Option<PathBuf>,
    options: SchemaOptions,
}

fn cmd_schema(args: SchemaArgs) -> Result<(), AppError> {
    let dbml_content = std::fs::read_to_string(&args.input)?;
    let diagram = parser::parse_dbml(&dbml_content)?;

    let mut catalog = Catalog::from_diagram(&diagram, &args.db);
    let mut store = LayoutStore::load(args.layout.as_deref());
    store.apply_relations(&mut catalog);

    let requested = if args.tables.is_empty() {
        catalog.table_names()
    } else {
        args.tables
    };
    if requested.is_empty() {
        return Err(AppError::LayoutError(format!(
            "No tables found in database `{}`",
            catalog.db()
        )));
    }
    tracing::info!(
        db = catalog.db(),
        tables = requested.len(),
        stored_relations = store.relations().len(),
        "exporting relation schema"
    );

    let export = SchemaExport::new(
        &catalog,
        catalog.db(),
        &requested,
        &store,
        args.options,
        SvgSurface::new(),
    );
    let document = export.output();
    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(&document.filename));
    std::fs::write(&output_path, &document.bytes)?;
    tracing::info!(
        path = %output_path.display(),
        mime_type = document.mime_type,
        tables = export.tables().count(),
        relations = export.relations().len(),
        "schema written"
    );

    if let (true, Some(layout_path)) = (args.save_layout, args.layout.as_deref()) {
        export.store_positions(&mut store);
        store.save(layout_path, &args.input)?;
        tracing::info!(path = %layout_path.display(), "layout saved");
    }

    Ok(())
}

fn cmd_transform(programs: Option<PathBuf>, options: &[String]) -> Result<(), AppError> {
    let transformation = match programs.as_deref() {
        Some(path) => ExternalTransformation::load(path)?,
        None => ExternalTransformation::default(),
    };
    if !transformation.is_enabled() {
        tracing::info!("no external programs configured, passing input through");
    }
    tracing::debug!(
        transformation = ExternalTransformation::NAME,
        no_wrap = ExternalTransformation::no_wrap(options),
        "{}",
        ExternalTransformation::info()
    );

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let output = transformation.apply(&input, options)?;
    std::io::stdout().write_all(output.as_bytes())?;
    Ok(())
}

fn cmd_config(
    input: PathBuf,
    defaults: Option<PathBuf>,
    output: Option<PathBuf>,
    eol: Eol,
) -> Result<(), AppError> {
    let mut config = ConfigFile::load(&input)?;
    if let Some(path) = defaults.as_deref() {
        config.load_defaults(path)?;
    }

    let text = ConfigGenerator::new(eol).generate(&config);
    match output {
        Some(path) => {
            std::fs::write(&path, &text)?;
            tracing::info!(path = %path.display(), "config written");
        }
        None => std::io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}
