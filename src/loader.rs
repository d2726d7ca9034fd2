//! Reads per-country tax documents from a directory of `<CODE>.json` files.

use crate::tax::{CountryTaxDocument, TaxCatalog};
use anyhow::Context;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Parse one document
pub fn read_document<R: Read>(reader: R) -> anyhow::Result<CountryTaxDocument> {
    let document = serde_json::from_reader(reader)?;
    Ok(document)
}

/// All `*.json` files in `dir`, sorted by file name
pub fn document_paths(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("cannot read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Read every document in `dir`, keyed by file stem (`NL.json` -> `NL`)
pub fn read_documents(dir: &Path) -> anyhow::Result<Vec<(String, CountryTaxDocument)>> {
    let paths = document_paths(dir)?;
    log::info!("Reading {} tax documents from {}", paths.len(), dir.display());

    paths
        .iter()
        .map(|path| -> anyhow::Result<(String, CountryTaxDocument)> {
            let key = document_key(path)?;
            let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            let document = read_document(BufReader::new(file))
                .with_context(|| format!("malformed tax document {}", path.display()))?;
            Ok((key, document))
        })
        .collect()
}

/// Build a catalog from the documents in `dir`
pub fn load_catalog(dir: &Path) -> anyhow::Result<TaxCatalog> {
    let documents = read_documents(dir)?;
    let catalog = TaxCatalog::load(documents)
        .with_context(|| format!("tax documents in {} failed validation", dir.display()))?;
    Ok(catalog)
}

pub fn document_key(path: &Path) -> anyhow::Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .with_context(|| format!("cannot derive country code from {}", path.display()))
}
