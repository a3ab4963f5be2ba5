//! Pull command - fetch every image in a list with bounded concurrency

use crate::style::colors::*;
use crate::style::*;
use anyhow::{Context, Result};
use std::sync::Arc;
use swe_compass::{
    read_image_list, DockerFetcher, FetchOutcome, HarnessConfig, ImagePuller, ListEntry,
    PullEvent, PullOverrides, PullReporter, PullSummary,
};
use tracing::info;

/// Prints one line per state change as it happens
struct ConsoleReporter;

impl PullReporter for ConsoleReporter {
    fn report(&self, event: PullEvent<'_>) {
        match event {
            PullEvent::Skipped(image) => println!(
                "{} {} {}",
                status_tag("SKIP", YELLOW),
                image,
                style_dim("(already exists)")
            ),
            PullEvent::Pulling(image) => println!("{} {}", status_tag("PULL", CYAN), image),
            PullEvent::Pulled(image) => println!("{} {}", status_tag("OK", GREEN), image),
            PullEvent::Failed(image, _) => println!("{} {}", status_tag("ERR", RED), image),
            PullEvent::Invalid { raw, reason } => println!(
                "{} {} {}",
                status_tag("ERR", RED),
                raw,
                style_dim(&format!("({})", reason))
            ),
        }
    }
}

/// Run the pull. Returns the summary and whether failures should fail the process.
pub async fn run(
    config: HarnessConfig,
    overrides: PullOverrides,
) -> Result<(PullSummary, bool)> {
    let mut pull = config.pull;
    pull.apply(overrides);
    pull.validate()?;

    // Checked before touching Docker so a bad path fails fast.
    let entries = read_image_list(&pull.image_list)
        .with_context(|| format!("Cannot read image list {}", pull.image_list.display()))?;

    print_header("Image Pull");
    print_key_value("List", &pull.image_list.display().to_string());
    print_key_value("Images", &entries.len().to_string());
    print_key_value("Concurrent", &pull.max_concurrent.to_string());
    if let Some(limit) = pull.fetch_timeout() {
        print_key_value("Timeout", &format!("{}s", limit.as_secs()));
    }
    println!();

    let summary = if entries.is_empty() {
        print_warning("Image list is empty, nothing to pull");
        PullSummary::default()
    } else if entries.iter().all(|e| e.image().is_none()) {
        // Nothing to fetch, so no daemon connection is needed.
        report_invalid(&entries, &ConsoleReporter)
    } else {
        let fetcher = DockerFetcher::connect().await?;
        let puller = ImagePuller::new(Arc::new(fetcher), pull.pull_options())
            .with_reporter(Arc::new(ConsoleReporter));
        puller.pull_all(entries).await
    };

    print_summary(&summary);
    info!("Processed {} image references", summary.total());

    Ok((summary, pull.fail_on_error))
}

fn report_invalid(entries: &[ListEntry], reporter: &dyn PullReporter) -> PullSummary {
    let mut summary = PullSummary::default();
    for entry in entries {
        if let ListEntry::Invalid { raw, reason, .. } = entry {
            reporter.report(PullEvent::Invalid { raw, reason });
            summary.record(FetchOutcome::Failed);
        }
    }
    summary
}

fn print_summary(summary: &PullSummary) {
    print_header("Summary");
    print_key_value_colored("Success", &summary.success.to_string(), GREEN);
    print_key_value_colored("Skipped", &summary.skipped.to_string(), YELLOW);
    let failed_color = if summary.has_failures() { RED } else { GREEN };
    print_key_value_colored("Failed ", &summary.failed.to_string(), failed_color);
    println!();
}
