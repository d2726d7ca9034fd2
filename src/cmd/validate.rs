//! Validate command - check tax documents without loading them into a catalog

use clap::Args;
use finplan::loader;
use finplan::tax::{validate_document, TaxCatalog};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Directory of <CODE>.json tax documents (defaults to --data-dir)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    file: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct ValidationOutput {
    documents: usize,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self, data_dir: Option<&std::path::Path>) -> anyhow::Result<()> {
        let dir = match self.dir.as_deref().or(data_dir) {
            Some(dir) => dir.to_path_buf(),
            None => anyhow::bail!("No directory to validate; pass --dir or --data-dir"),
        };

        let paths = loader::document_paths(&dir)?;
        let mut issues = Vec::new();
        let mut valid = Vec::new();

        for path in &paths {
            let file = path.display().to_string();
            let key = loader::document_key(path)?;
            let parsed = File::open(path)
                .map_err(anyhow::Error::from)
                .and_then(|f| loader::read_document(BufReader::new(f)));
            let document = match parsed {
                Ok(document) => document,
                Err(err) => {
                    issues.push(ValidationIssue {
                        file,
                        message: format!("cannot parse: {}", err),
                    });
                    continue;
                }
            };
            match validate_document(&key, &document) {
                Ok(_) => valid.push((key, document)),
                Err(err) => issues.push(ValidationIssue {
                    file,
                    message: err.to_string(),
                }),
            }
        }

        // Cross-document rules (duplicate option ids) only show up when loading together
        if issues.is_empty() {
            if let Err(err) = TaxCatalog::load(valid) {
                issues.push(ValidationIssue {
                    file: dir.display().to_string(),
                    message: err.to_string(),
                });
            }
        }

        if self.json {
            let output = ValidationOutput {
                documents: paths.len(),
                issue_count: issues.len(),
                issues: issues.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            self.print_text(paths.len(), &issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, documents: usize, issues: &[ValidationIssue]) {
        println!();
        println!("VALIDATION RESULTS ({} documents)", documents);
        println!();

        if issues.is_empty() {
            println!("\u{2713} No issues found.");
            return;
        }

        println!("\u{26A0} {} issue(s) found:", issues.len());
        println!();
        for (i, issue) in issues.iter().enumerate() {
            println!("  {}. {}", i + 1, issue.file);
            println!("     {}", issue.message);
            println!();
        }
    }
}
