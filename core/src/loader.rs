use crate::{DocId, DocumentStatus, SearchServer};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A document as supplied by a caller, before indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInput {
    pub id: DocId,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<i32>,
}

fn is_document_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|s| s.to_str()), Some("json" | "jsonl"))
}

/// Read documents from a `.json` file (array or single object), a `.jsonl`
/// file, or a directory of both. Directory entries are visited in file name order.
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Vec<DocumentInput>> {
    let path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && is_document_file(p) {
                files.push(p.to_path_buf());
            }
        }
    } else {
        files.push(path.to_path_buf());
    }

    let mut docs = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut docs)?;
        } else {
            read_json(&file, &mut docs)?;
        }
    }
    tracing::debug!(path = %path.display(), count = docs.len(), "loaded documents");
    Ok(docs)
}

fn read_jsonl(file: &Path, docs: &mut Vec<DocumentInput>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: DocumentInput = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), lineno + 1))?;
        docs.push(doc);
    }
    Ok(())
}

fn read_json(file: &Path, docs: &mut Vec<DocumentInput>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                docs.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => docs.push(serde_json::from_value(json)?),
        _ => anyhow::bail!("{}: expected a document or an array of documents", file.display()),
    }
    Ok(())
}

/// Add documents in order, stopping at the first rejected one.
pub fn ingest(server: &mut SearchServer, docs: &[DocumentInput]) -> Result<usize> {
    for doc in docs {
        server
            .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
            .with_context(|| format!("adding document {}", doc.id))?;
    }
    tracing::info!(num_docs = server.document_count(), "ingested documents");
    Ok(docs.len())
}
