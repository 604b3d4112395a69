use super::settings::OutputFormat;
use crate::symbology::Symbology;
use camino::Utf8PathBuf;
use std::fmt;

/// Parameters for one barcode
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub text: String,
    pub symbology: Symbology,
    pub output_format: OutputFormat,
    pub output_directory: Utf8PathBuf,
    /// File stem; derived from the text and a timestamp when `None`
    pub filename: Option<String>,
}

impl GenerationRequest {
    pub fn new(
        text: impl Into<String>,
        symbology: Symbology,
        output_format: OutputFormat,
        output_directory: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            text: text.into(),
            symbology,
            output_format,
            output_directory: output_directory.into(),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// How a batch is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutput {
    /// One file per item
    Individual(OutputFormat),
    /// Every item laid out in one multi-page PDF
    Combined,
}

impl fmt::Display for BatchOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchOutput::Individual(format) => write!(f, "{} (Individual)", format),
            BatchOutput::Combined => write!(f, "PDF (Combined)"),
        }
    }
}

/// A batch run over records read from an input file. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub items: Vec<String>,
    pub symbology: Symbology,
    pub output: BatchOutput,
    pub output_directory: Utf8PathBuf,
    pub filename_prefix: String,
}

/// An item that could not be generated, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub text: String,
    pub reason: String,
}

impl fmt::Display for FailedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Error: {})", self.text, self.reason)
    }
}

/// Aggregate outcome of one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub success_count: usize,
    pub failed_items: Vec<FailedItem>,
}

impl BatchResult {
    /// Total number of items attempted
    pub fn total(&self) -> usize {
        self.success_count + self.failed_items.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed_items.is_empty()
    }

    /// Summary shown when the batch finishes; lists at most `max_listed` failures.
    pub fn summary(&self, max_listed: usize) -> String {
        if self.failed_items.is_empty() {
            return format!("Successfully generated all {} barcodes!", self.success_count);
        }

        let mut msg = format!(
            "Successfully generated {} barcodes.\n\nFailed items:\n",
            self.success_count
        );
        let listed: Vec<String> = self
            .failed_items
            .iter()
            .take(max_listed)
            .map(ToString::to_string)
            .collect();
        msg.push_str(&listed.join("\n"));

        if self.failed_items.len() > max_listed {
            msg.push_str(&format!(
                "\n... and {} more",
                self.failed_items.len() - max_listed
            ));
        }
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(text: &str) -> FailedItem {
        FailedItem {
            text: text.to_string(),
            reason: "bad".to_string(),
        }
    }

    #[test]
    fn test_summary_all_succeeded() {
        let result = BatchResult {
            success_count: 3,
            failed_items: vec![],
        };
        assert_eq!(result.summary(10), "Successfully generated all 3 barcodes!");
        assert!(result.is_complete_success());
    }

    #[test]
    fn test_summary_truncates_failures() {
        let result = BatchResult {
            success_count: 1,
            failed_items: (0..12).map(|i| failed(&format!("item{}", i))).collect(),
        };

        let summary = result.summary(10);
        assert!(summary.contains("item0 (Error: bad)"));
        assert!(summary.contains("item9"));
        assert!(!summary.contains("item10"));
        assert!(summary.ends_with("... and 2 more"));
        assert_eq!(result.total(), 13);
    }

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("A1", Symbology::Code128, OutputFormat::Png, "/tmp")
            .with_filename("label");
        assert_eq!(request.filename.as_deref(), Some("label"));
        assert_eq!(request.output_directory, Utf8PathBuf::from("/tmp"));
    }

    #[test]
    fn test_batch_output_display() {
        assert_eq!(BatchOutput::Combined.to_string(), "PDF (Combined)");
        assert_eq!(
            BatchOutput::Individual(OutputFormat::Pdf).to_string(),
            "PDF (Individual)"
        );
    }
}
