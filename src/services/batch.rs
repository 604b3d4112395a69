use super::combined::assemble_combined;
use super::generator::{BarcodeGenerator, ensure_directory, sanitize_filename};
use crate::error::{GenerationError, GenerationResult};
use crate::models::{AppearanceSettings, BatchJob, BatchOutput, BatchResult, FailedItem, GenerationRequest};
use crate::state::{BatchObserver, BatchProgress, ItemStatus};

/// Characters of the item text kept in a batch file name
const NAME_TEXT_CHARS: usize = 20;

/// File stem for item `index` (1-based) of a batch
///
/// `sanitize(prefix + index padded to 4 digits + "_" + first 20 chars of text)`
pub fn batch_filename(prefix: &str, index: usize, text: &str) -> String {
    let head: String = text.chars().take(NAME_TEXT_CHARS).collect();
    sanitize_filename(&format!("{}{:04}_{}", prefix, index, head))
}

/// Run a batch job, reporting progress to `observer`
///
/// Items are processed strictly in input order and a failing item never stops the
/// batch. Files written for earlier items stay on disk.
///
/// # Errors
/// Setup problems only: an empty item list or a missing output directory.
pub fn generate_batch(
    job: &BatchJob,
    appearance: &AppearanceSettings,
    observer: &mut dyn BatchObserver,
) -> GenerationResult<BatchResult> {
    if job.items.is_empty() {
        return Err(GenerationError::InvalidInput(
            "No data found in the input file.".to_string(),
        ));
    }
    ensure_directory(&job.output_directory)?;

    tracing::info!(
        "Starting batch of {} {} barcodes as {} into {}",
        job.items.len(),
        job.symbology,
        job.output,
        job.output_directory
    );

    let mut progress = BatchProgress::new();
    progress.start(job.items.len(), observer);

    let result = match job.output {
        BatchOutput::Individual(format) => {
            let generator = BarcodeGenerator::new(appearance);
            let mut result = BatchResult::default();

            for (i, text) in job.items.iter().enumerate() {
                let request = GenerationRequest::new(
                    text.as_str(),
                    job.symbology,
                    format,
                    job.output_directory.clone(),
                )
                .with_filename(batch_filename(&job.filename_prefix, i + 1, text));

                match generator.generate(&request) {
                    Ok(_) => {
                        result.success_count += 1;
                        progress.item_done(text, ItemStatus::Generated, observer);
                    }
                    Err(e) => {
                        let reason = e.to_string();
                        result.failed_items.push(FailedItem {
                            text: text.clone(),
                            reason: reason.clone(),
                        });
                        progress.item_done(text, ItemStatus::Failed(reason), observer);
                    }
                }
            }
            result
        }
        BatchOutput::Combined => combined_result(job, appearance, &mut progress, observer),
    };

    progress.finish(&result, observer);
    Ok(result)
}

fn combined_result(
    job: &BatchJob,
    appearance: &AppearanceSettings,
    progress: &mut BatchProgress,
    observer: &mut dyn BatchObserver,
) -> BatchResult {
    let report = assemble_combined(
        &job.items,
        job.symbology,
        &job.output_directory,
        &job.filename_prefix,
        appearance,
        &mut |text: &str, status: ItemStatus| progress.item_done(text, status, &mut *observer),
    );

    match report {
        Ok(report) => BatchResult {
            success_count: report.placed,
            failed_items: report.skipped,
        },
        Err(e) => {
            tracing::error!("Error creating combined PDF: {}", e);
            let reason = e.to_string();
            BatchResult {
                success_count: 0,
                failed_items: job
                    .items
                    .iter()
                    .map(|text| FailedItem {
                        text: text.clone(),
                        reason: reason.clone(),
                    })
                    .collect(),
            }
        }
    }
}
