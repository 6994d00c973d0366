// Copyright 2025 Cowboy AI, LLC.

//! Build the full three-tier index over a small in-memory project
//!
//! ```text
//! cargo run --example index_demo
//! RUST_LOG=discipline_sets=debug cargo run --example index_demo -- config.toml
//! ```

use anyhow::{Context, Result};
use discipline_sets::{
    AttributeSelector, ClassificationEngine, ElementId, FolderNode, InMemoryHost, IndexerConfig,
    SavedItem,
};
use tracing_subscriber::EnvFilter;

fn add(host: &mut InMemoryHost, parent: ElementId, name: &str, props: &[(&str, &str)]) -> Result<()> {
    let id = host.add_child(parent, name)?;
    for (attribute, value) in props {
        host.set_property(id, "Element", attribute, *value)?;
    }
    Ok(())
}

fn sample_project() -> Result<InMemoryHost> {
    let mut host = InMemoryHost::new();

    let arch = host.add_root("Tower_ARCH_01.nwc");
    let level = host.add_child(arch, "Level 1")?;
    add(&mut host, level, "Basic Wall 200", &[("Category", "Walls"), ("Workset", "Shell")])?;
    add(&mut host, level, "Single Flush Door", &[("Category", "Doors"), ("Workset", "Interiors")])?;
    add(&mut host, level, "Curtain Wall", &[("Category", "Walls"), ("Workset", "Shell")])?;

    let strc = host.add_root("Tower_STRC_01.nwc");
    add(&mut host, strc, "Concrete Column", &[("Category", "Structural Columns")])?;
    add(&mut host, strc, "Transfer Beam", &[("Category", "Structural Framing")])?;

    let mep = host.add_root("Annex_MEP_02.nwc");
    add(
        &mut host,
        mep,
        "Supply Duct",
        &[("Category", "Ducts"), ("System Name", "Supply Air 1")],
    )?;
    add(
        &mut host,
        mep,
        "Return Duct",
        &[("Category", "Ducts"), ("System Name", "Return Air 1")],
    )?;

    Ok(host)
}

fn print_folder(folder: &FolderNode, depth: usize) {
    println!("{}{}/", "  ".repeat(depth), folder.name);
    for child in &folder.children {
        match child {
            SavedItem::Folder(sub) => print_folder(sub, depth + 1),
            SavedItem::Set(set) => println!("{}{}", "  ".repeat(depth + 1), set.name),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("discipline_sets=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => IndexerConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => IndexerConfig::default(),
    };

    let mut engine = ClassificationEngine::open(sample_project()?, config)?;

    let disciplines = engine.build_disciplines()?;
    println!("disciplines: {}", disciplines.disciplines.join(", "));

    let selected = engine.discipline_names();
    let clash = engine.build_attribute_sets(AttributeSelector::Category, &selected)?;
    println!("{} category sets in {}", clash.created, clash.folder);

    let scan = engine.scan_properties(&selected)?;
    println!("scanned {} elements", scan.elements_scanned);
    for category in engine.catalog().categories() {
        println!("  {category}: {}", engine.catalog().attributes(category).join(", "));
    }

    let custom = engine.build_custom_sets("Element", "System Name", &selected)?;
    println!(
        "{} custom sets, skipped: {}",
        custom.created,
        custom.skipped_disciplines.join(", ")
    );
    for diagnostic in clash.diagnostics.iter().chain(&custom.diagnostics) {
        println!("warning: {}", diagnostic.error);
    }

    println!();
    for item in engine.host().saved_items() {
        if let SavedItem::Folder(folder) = item {
            print_folder(folder, 0);
        }
    }

    Ok(())
}
