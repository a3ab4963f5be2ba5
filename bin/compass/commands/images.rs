//! Images command - derive the evaluation image list from a dataset

use crate::style::*;
use anyhow::{Context, Result};
use std::path::PathBuf;
use swe_compass::{collect_images, write_image_list, DatasetFilter};

pub struct ImagesArgs {
    pub dataset: PathBuf,
    pub output: PathBuf,
    pub task_types: String,
    pub programming_languages: String,
    pub programming_scenarios: String,
}

pub fn run(args: ImagesArgs) -> Result<()> {
    let filter = DatasetFilter::new(
        &args.task_types,
        &args.programming_languages,
        &args.programming_scenarios,
    );

    let report = collect_images(&args.dataset, &filter)
        .with_context(|| format!("Cannot load dataset {}", args.dataset.display()))?;
    report.log();

    print_header("Image List");
    print_key_value("Dataset", &args.dataset.display().to_string());
    print_key_value("Instances", &report.total.to_string());
    print_key_value("Matched", &report.matched.to_string());
    if report.unresolved > 0 {
        print_warning(&format!(
            "{} matched instances have no resolvable image",
            report.unresolved
        ));
    }
    println!();

    write_image_list(&args.output, &report.images)
        .with_context(|| format!("Cannot write {}", args.output.display()))?;

    print_success(&format!(
        "Wrote {} images to {}",
        report.images.len(),
        args.output.display()
    ));
    Ok(())
}
