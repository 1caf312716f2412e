//! Record layout discovery (`aba schema ...`).

use aba_file::schema::{FieldKind, Schema};
use anyhow::{Context, Result, anyhow};
use clap::{Args, Subcommand};

/// Schema subcommands.
#[derive(Subcommand, Debug)]
pub enum SchemaCommand {
    /// List the record types.
    List,
    /// Show column rules for a record type.
    Show(SchemaShowArgs),
}

/// Arguments for `aba schema show`.
#[derive(Args, Debug)]
pub struct SchemaShowArgs {
    /// Record type: descriptive, detail or batch-control.
    pub name: String,
    /// Print the layout as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute a schema command.
pub fn handle(command: SchemaCommand) -> Result<()> {
    match command {
        SchemaCommand::List => list(),
        SchemaCommand::Show(args) => show(args),
    }
}

fn list() -> Result<()> {
    println!("Record types:");
    for layout in Schema::layouts() {
        println!("  - {}: {}", layout.name, layout.description);
    }
    Ok(())
}

fn show(args: SchemaShowArgs) -> Result<()> {
    let layout = Schema::get(&args.name)
        .ok_or_else(|| anyhow!("unknown record type '{}'", args.name))?;
    if args.json {
        let json = serde_json::to_string_pretty(layout).context("failed to serialize layout")?;
        println!("{json}");
        return Ok(());
    }
    println!("Record: {}", layout.name);
    println!("{}", layout.description);
    for field in layout.fields {
        let fill = match field.kind {
            FieldKind::Literal(text) => format!("literal {text:?}"),
            FieldKind::Blank => "blank".to_string(),
            FieldKind::Exact => "exact".to_string(),
            FieldKind::Numeric => "right, zero-filled".to_string(),
            FieldKind::RightSpace => "right, space-filled".to_string(),
            FieldKind::Text => "left, space-filled".to_string(),
        };
        println!(
            "  {:>3}-{:>3}: {:<42} {}",
            field.range.start, field.range.end, field.label, fill
        );
    }
    Ok(())
}
