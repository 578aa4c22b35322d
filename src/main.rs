//! Command-line interface for edm-csdl

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::io::Write;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use csdl::edm::{EdmCheckable, EdmNamedElement, HasTypeKind};
#[cfg(feature = "cli")]
use csdl::{CsdlReader, EdmError, EdmModel, ModelReadResult};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "csdl")]
#[command(author, version, about = "CSDL (OData EDM) schema reader", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Read a CSDL document and display its model
    Inspect {
        /// Path to the CSDL file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Report the diagnostics of a CSDL document
    Check {
        /// Path to the CSDL file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { file, json } => cmd_inspect(file, json),
        Commands::Check { file } => cmd_check(file),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

#[cfg(feature = "cli")]
fn cmd_inspect(path: PathBuf, json_output: bool) -> csdl::Result<bool> {
    let result = CsdlReader::new().read_model_file(&path)?;

    if json_output {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &model_json(&result))?;
        writeln!(stdout)?;
    } else {
        match &result.model {
            Some(model) => print_model_summary(model),
            None => println!("No model could be read from {}", path.display()),
        }
        print_diagnostics(&result.errors);
    }
    Ok(result.model.is_some())
}

#[cfg(feature = "cli")]
fn cmd_check(path: PathBuf) -> csdl::Result<bool> {
    let result = CsdlReader::new().read_model_file(&path)?;

    if result.errors.is_empty() {
        println!("✓ {} is valid", path.display());
        Ok(true)
    } else {
        println!("✗ {} has {} diagnostic(s)", path.display(), result.errors.len());
        for error in &result.errors {
            println!("  - {}", error);
        }
        Ok(false)
    }
}

#[cfg(feature = "cli")]
fn print_model_summary(model: &EdmModel) {
    println!("edm-csdl v{}", csdl::VERSION);
    println!("Namespace: {}", model.namespace());
    if let Some(alias) = model.alias() {
        println!("Alias: {}", alias);
    }
    println!("CSDL Version: {}", model.version());
    println!("Schema Types: {}", model.schema_types().len());
    println!("Operations: {}", model.operations().count());
    println!("Entity Containers: {}", model.entity_containers().len());

    println!("\n=== Schema Types ===");
    for schema_type in model.schema_types() {
        let marker = if schema_type.is_bad() { " [bad members]" } else { "" };
        println!(
            "  {} ({:?}){}",
            schema_type.qualified_name(),
            schema_type.type_kind(),
            marker
        );
    }

    println!("\n=== Operations ===");
    for (key, binding) in model.operations() {
        let marker = if binding.is_ambiguous() { " [ambiguous]" } else { "" };
        println!("  {} ({:?}){}", key, binding.kind(), marker);
    }

    println!("\n=== Entity Containers ===");
    for container in model.entity_containers() {
        println!("  {}", container.qualified_name());
        for (name, binding) in container.entity_sets.iter() {
            let entity_type = &binding.first().entity_type;
            let type_name = entity_type
                .schema_type()
                .and_then(|r| model.schema_type(r.id))
                .map(|t| t.qualified_name())
                .unwrap_or_else(|| "<unresolved>".to_string());
            println!("    {} : {}", name, type_name);
        }
    }
}

#[cfg(feature = "cli")]
fn print_diagnostics(errors: &[EdmError]) {
    if errors.is_empty() {
        return;
    }
    println!("\n=== Diagnostics ({}) ===", errors.len());
    for error in errors {
        println!("  {}", error);
    }
}

#[cfg(feature = "cli")]
fn model_json(result: &ModelReadResult) -> serde_json::Value {
    use serde_json::json;

    let model = result.model.as_ref().map(|model| {
        let types: Vec<_> = model
            .schema_types()
            .iter()
            .map(|t| {
                json!({
                    "name": t.qualified_name(),
                    "kind": t.type_kind(),
                    "bad": t.is_bad(),
                })
            })
            .collect();
        let operations: Vec<_> = model
            .operations()
            .map(|(key, binding)| {
                json!({
                    "key": key,
                    "name": binding.qualified_name(),
                    "kind": binding.kind(),
                    "ambiguous": binding.is_ambiguous(),
                    "candidates": binding.candidates().len(),
                })
            })
            .collect();
        let containers: Vec<_> = model
            .entity_containers()
            .iter()
            .map(|c| {
                json!({
                    "name": c.name(),
                    "entitySets": c.entity_sets.iter().map(|(name, _)| name).collect::<Vec<_>>(),
                    "badExtends": c.has_bad_extends(),
                })
            })
            .collect();
        json!({
            "namespace": model.namespace(),
            "alias": model.alias(),
            "version": model.version().to_string(),
            "types": types,
            "operations": operations,
            "containers": containers,
            "annotations": model.annotations(),
        })
    });

    json!({
        "model": model,
        "errors": result.errors,
    })
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
