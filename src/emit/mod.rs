//! Emission Pipeline
//!
//! Fans generated members out to one writer thread per category over
//! bounded channels, then joins every writer and aggregates failures. The
//! scope guarantees no writer outlives the run; a dispatch failure flips a
//! cancellation flag so no partially-assembled file reaches disk.
//!
//! Each writer owns exactly one output file: it removes any stale copy,
//! assembles header plus members in the order received, formats the buffer
//! and writes it with a single call.

pub mod format;
pub mod templates;

pub use templates::TemplateSet;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver};
use std::{fs, thread};

use tracing::{debug, info};

use crate::error::{GenError, Result};
use crate::naming::module_ident;
use crate::partition::Partition;
use crate::render::{HeaderModel, RenderItem};
use crate::schema::DocKind;

/// Bound on each per-category channel: dispatch stalls once a writer falls
/// this many members behind.
const CHANNEL_DEPTH: usize = 10;

/// What one document pass produced.
#[derive(Debug, Default)]
pub struct EmitSummary {
    pub files: Vec<PathBuf>,
    pub members: usize,
}

/// Emit one document: route every member to its category writer, join the
/// writers, then write the module index. Returns the written files.
///
/// Member routing re-derives the category key from the member name with the
/// same function the partitioner used; a member whose key has no partition
/// is a [`GenError::PartitionRouting`] and cancels all writers.
pub fn run(
    doc: DocKind,
    partitions: &BTreeMap<String, Partition>,
    mut members: Vec<RenderItem>,
    out_root: &Path,
    templates: &TemplateSet,
) -> Result<EmitSummary> {
    let out_dir = out_root.join(doc.dir_name());
    fs::create_dir_all(&out_dir)?;

    members.sort_by(|a, b| a.name.cmp(&b.name));
    let member_count = members.len();

    // Header data is prepared up front so template-data failures surface
    // before any thread starts.
    let mut headers = BTreeMap::new();
    for (category, partition) in partitions {
        headers.insert(
            category.clone(),
            HeaderModel::new(doc, category, partition).data()?,
        );
    }

    let cancel = AtomicBool::new(false);
    let mut routing_error = None;
    let mut failures: Vec<(String, String)> = Vec::new();
    let mut files = Vec::new();

    thread::scope(|scope| {
        let mut senders = BTreeMap::new();
        let mut handles = Vec::new();

        for (category, header) in &headers {
            let (tx, rx) = sync_channel::<RenderItem>(CHANNEL_DEPTH);
            senders.insert(category.as_str(), tx);

            let path = out_dir.join(format!("{}.rs", module_ident(category)));
            let cancel = &cancel;
            handles.push((
                category.clone(),
                scope.spawn(move || write_module(doc, category, header, path, rx, cancel, templates)),
            ));
        }

        for member in members {
            let key = doc.category_key(&member.name);
            let Some(sender) = senders.get(key) else {
                cancel.store(true, Ordering::Relaxed);
                routing_error = Some(GenError::PartitionRouting {
                    category: key.to_string(),
                    name: member.name,
                });
                break;
            };

            // A send only fails if the writer already exited with an error;
            // that error is collected at join.
            if sender.send(member).is_err() {
                break;
            }
        }

        // Closing the channels lets the writers drain and finish.
        drop(senders);

        for (category, handle) in handles {
            match handle.join() {
                Ok(Ok(Some(path))) => files.push(path),
                Ok(Ok(None)) => {}
                Ok(Err(e)) => failures.push((category, e.to_string())),
                Err(_) => failures.push((category, "writer panicked".to_string())),
            }
        }
    });

    if let Some(e) = routing_error {
        return Err(e);
    }
    if !failures.is_empty() {
        return Err(GenError::Emission { failures });
    }

    write_module_index(&out_dir, headers.keys())?;
    info!(
        document = doc.dir_name(),
        modules = files.len(),
        members = member_count,
        "document emitted"
    );

    Ok(EmitSummary {
        files,
        members: member_count,
    })
}

/// One writer: delete the stale file, assemble header plus members in
/// arrival order, format, write once. Returns `None` when the run was
/// cancelled before the write.
fn write_module(
    doc: DocKind,
    category: &str,
    header: &serde_json::Value,
    path: PathBuf,
    rx: Receiver<RenderItem>,
    cancel: &AtomicBool,
    templates: &TemplateSet,
) -> Result<Option<PathBuf>> {
    match fs::remove_file(&path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let mut buffer = templates.render_header(doc, header)?;
    let mut count = 0usize;

    while let Ok(item) = rx.recv() {
        buffer.push_str(&templates.render_member(doc, &item.data)?);
        count += 1;
    }

    if cancel.load(Ordering::Relaxed) {
        return Ok(None);
    }

    let formatted = format::format_source(category, buffer);
    fs::write(&path, formatted)?;
    debug!(module = category, members = count, "module written");

    Ok(Some(path))
}

/// Write the `mod.rs` index declaring every generated module, sorted.
fn write_module_index<'a>(
    out_dir: &Path,
    categories: impl Iterator<Item = &'a String>,
) -> Result<()> {
    let mut index = String::from("// Code generated by vkgen. DO NOT EDIT.\n\n");
    for category in categories {
        index.push_str(&format!("pub mod {};\n", module_ident(category)));
    }

    fs::write(out_dir.join("mod.rs"), index)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition;
    use crate::render;
    use crate::schema::PropertyNode;
    use indexmap::IndexMap;

    fn definitions(json: &str) -> IndexMap<String, PropertyNode> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_routing_error_cancels_run() {
        let dir = tempfile::tempdir().unwrap();
        let templates = TemplateSet::load().unwrap();

        let defs = definitions(
            r#"{"photos_photo": {"type": "object", "properties": {"id": {"type": "integer"}}}}"#,
        );
        let partitions = partition::partition_definitions(DocKind::Objects, &defs, None).unwrap();

        // A member whose category has no registered writer.
        let stray = render::object_model("users_user", &defs["photos_photo"]).unwrap();

        let err = run(
            DocKind::Objects,
            &partitions,
            vec![stray],
            dir.path(),
            &templates,
        )
        .unwrap_err();

        match err {
            GenError::PartitionRouting { category, name } => {
                assert_eq!(category, "users");
                assert_eq!(name, "users_user");
            }
            other => panic!("expected PartitionRouting, got {other:?}"),
        }

        // Cancellation keeps partial files off disk.
        assert!(!dir.path().join("objects/photos.rs").exists());
    }

    #[test]
    fn test_emits_module_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let templates = TemplateSet::load().unwrap();

        let defs = definitions(
            r#"{
                "photos_photo": {"type": "object", "properties": {"id": {"type": "integer"}}},
                "photos_sizes": {"type": "array", "items": {"type": "integer"}}
            }"#,
        );
        let partitions = partition::partition_definitions(DocKind::Objects, &defs, None).unwrap();
        let members: Vec<RenderItem> = defs
            .iter()
            .map(|(name, node)| render::object_model(name, node).unwrap())
            .collect();

        let summary = run(DocKind::Objects, &partitions, members, dir.path(), &templates).unwrap();
        assert_eq!(summary.members, 2);
        assert_eq!(summary.files.len(), 1);

        let module = fs::read_to_string(dir.path().join("objects/photos.rs")).unwrap();
        assert!(module.contains("pub struct PhotosPhoto"), "got:\n{module}");
        assert!(module.contains("pub type PhotosSizes = Vec<i64>;"), "got:\n{module}");

        let index = fs::read_to_string(dir.path().join("objects/mod.rs")).unwrap();
        assert!(index.contains("pub mod photos;"));
    }
}
