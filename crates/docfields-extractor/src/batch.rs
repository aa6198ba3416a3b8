//! Batch driver: walk the input tree and write the mirrored output tree

use crate::config::BatchConfig;
use crate::error::ExtractorError;
use crate::extractor::FieldExtractor;
use crate::output::to_json_bytes;
use crate::types::{BatchReport, FileOutcome};
use docfields_domain::traits::LlmProvider;
use docfields_domain::{DocumentRecord, LabelRegistry, OutputRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Runs one extraction pass over `input_root/<doctype dir>/<record file>`
///
/// Processing is sequential: each record is read, sent to the model and
/// written before the next one starts. A failed remote call or filesystem
/// error aborts the whole pass.
pub struct BatchDriver<L> {
    extractor: FieldExtractor<L>,
    registry: LabelRegistry,
    config: BatchConfig,
}

impl<L> BatchDriver<L>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    /// Create a new BatchDriver
    pub fn new(llm_provider: L, registry: LabelRegistry, config: BatchConfig) -> Self {
        let extractor = FieldExtractor::new(llm_provider, config.key_policy);
        Self {
            extractor,
            registry,
            config,
        }
    }

    /// Process every record under the input root
    pub fn process_documents(&self) -> Result<BatchReport, ExtractorError> {
        self.config.validate().map_err(ExtractorError::Config)?;

        let input_root = &self.config.input_root;
        let output_root = &self.config.output_root;
        info!(
            "Processing documents from '{}' into '{}'",
            input_root.display(),
            output_root.display()
        );

        fs::create_dir_all(output_root).map_err(|e| ExtractorError::io(output_root, e))?;

        let mut report = BatchReport::new(output_root);
        for doctype_dir in sorted_entries(input_root)? {
            if !doctype_dir.is_dir() {
                debug!("Skipping non-directory entry {}", doctype_dir.display());
                continue;
            }
            let Some(dir_name) = doctype_dir.file_name() else {
                continue;
            };

            let output_dir = output_root.join(dir_name);
            fs::create_dir_all(&output_dir).map_err(|e| ExtractorError::io(&output_dir, e))?;

            self.process_directory(&doctype_dir, &output_dir, &mut report)?;
        }

        info!(
            "Predictions saved in '{}': {}",
            output_root.display(),
            report.summary()
        );
        Ok(report)
    }

    fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        report: &mut BatchReport,
    ) -> Result<(), ExtractorError> {
        for path in sorted_entries(input_dir)? {
            if !self.is_record_file(&path) {
                continue;
            }
            let Some(file_name) = path.file_name() else {
                continue;
            };
            let outcome = self.process_file(&path, &output_dir.join(file_name))?;
            report.record(outcome);
        }
        Ok(())
    }

    /// Extract one record file and write its output record
    pub fn process_file(
        &self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<FileOutcome, ExtractorError> {
        let contents =
            fs::read_to_string(input_path).map_err(|e| ExtractorError::io(input_path, e))?;
        let document: DocumentRecord =
            serde_json::from_str(&contents).map_err(|e| ExtractorError::InvalidRecord {
                path: input_path.to_path_buf(),
                source: e,
            })?;

        let keys = self.registry.get_labels(&document.doctype);
        if keys.is_empty() {
            warn!(
                "No extraction keys found for doctype '{}', skipping {}",
                document.doctype,
                input_path.display()
            );
            return Ok(FileOutcome::Skipped);
        }

        debug!(
            "Extracting {} fields from {}",
            keys.len(),
            input_path.display()
        );
        let recovered = self.extractor.extract(&document, keys)?;
        let stage = recovered.stage;

        let output = OutputRecord::from_document(document, recovered.fields);
        let bytes = to_json_bytes(&output, self.config.indent, self.config.ensure_ascii)?;
        fs::write(output_path, bytes).map_err(|e| ExtractorError::io(output_path, e))?;

        Ok(FileOutcome::Written(stage))
    }

    fn is_record_file(&self, path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == self.config.record_extension.as_str())
    }
}

/// Entries of `dir`, sorted by path so runs are reproducible
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ExtractorError> {
    let mut paths = fs::read_dir(dir)
        .map_err(|e| ExtractorError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ExtractorError::io(dir, e))?;
    paths.sort();
    Ok(paths)
}
