//! Generation Orchestration
//!
//! Runs the three document passes in order. The objects pass must complete
//! first: its definitions feed the cross-reference index the responses pass
//! inlines from. Each pass is load, parse, partition, resolve, emit; any
//! error aborts the run before later passes start.

use std::fs;

use tracing::info;

use crate::config::GenConfig;
use crate::emit::{self, EmitSummary, TemplateSet};
use crate::error::Result;
use crate::loader::load_schema;
use crate::partition;
use crate::render::{self, RenderItem};
use crate::schema::{DocKind, MethodsDocument, RefIndex, SchemaDocument};

/// What a full run produced, per document.
#[derive(Debug)]
pub struct GenerateSummary {
    pub objects: EmitSummary,
    pub responses: EmitSummary,
    pub methods: EmitSummary,
}

/// Run the generator end to end.
pub fn generate(config: &GenConfig) -> Result<GenerateSummary> {
    let templates = TemplateSet::load()?;
    let out_root = &config.output.root;

    let bytes = load_schema(&config.schemas.objects)?;
    let objects_doc = SchemaDocument::parse(&bytes)?;
    info!(definitions = objects_doc.definitions.len(), "objects schema parsed");

    let index = RefIndex::build(&objects_doc.definitions);
    info!(indexed = index.len(), "cross-reference index built");

    let partitions =
        partition::partition_definitions(DocKind::Objects, &objects_doc.definitions, None)?;
    let members: Result<Vec<RenderItem>> = objects_doc
        .definitions
        .iter()
        .map(|(name, node)| render::object_model(name, node))
        .collect();
    let objects = emit::run(DocKind::Objects, &partitions, members?, out_root, &templates)?;

    let bytes = load_schema(&config.schemas.responses)?;
    let responses_doc = SchemaDocument::parse(&bytes)?;
    info!(
        definitions = responses_doc.definitions.len(),
        "responses schema parsed"
    );

    let partitions = partition::partition_definitions(
        DocKind::Responses,
        &responses_doc.definitions,
        Some(&index),
    )?;
    let members: Result<Vec<RenderItem>> = responses_doc
        .definitions
        .iter()
        .map(|(name, node)| render::response_model(name, node, &index))
        .collect();
    let responses = emit::run(DocKind::Responses, &partitions, members?, out_root, &templates)?;

    let bytes = load_schema(&config.schemas.methods)?;
    let methods_doc = MethodsDocument::parse(&bytes)?;
    info!(
        methods = methods_doc.methods.len(),
        errors = methods_doc.errors.len(),
        "methods schema parsed"
    );

    let partitions = partition::partition_methods(&methods_doc.methods);
    let members: Result<Vec<RenderItem>> = methods_doc
        .methods
        .iter()
        .map(render::method_model)
        .collect();
    let methods = emit::run(DocKind::Methods, &partitions, members?, out_root, &templates)?;

    write_root_index(config)?;

    Ok(GenerateSummary {
        objects,
        responses,
        methods,
    })
}

/// Root `mod.rs` tying the three generated modules together.
fn write_root_index(config: &GenConfig) -> Result<()> {
    let mut index = String::from("// Code generated by vkgen. DO NOT EDIT.\n\n");
    for doc in [DocKind::Objects, DocKind::Responses, DocKind::Methods] {
        index.push_str(&format!("pub mod {};\n", doc.dir_name()));
    }

    fs::write(config.output.root.join("mod.rs"), index)?;
    Ok(())
}
