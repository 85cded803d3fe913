//! Terminal progress for `biosearch index`.

use biosearch_core::{IndexProgress, IndexReport};
use biosearch_shared::BiosearchError;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over the unindexed titles, with a line per finished title.
pub(crate) struct CliIndexProgress {
    bar: ProgressBar,
}

impl CliIndexProgress {
    pub(crate) fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl IndexProgress for CliIndexProgress {
    fn started(&self, total: usize) {
        println!("Found {total} unindexed titles.");
        self.bar.set_length(total as u64);
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {wide_bar} {msg}")
        {
            self.bar.set_style(style);
        }
        self.bar.enable_steady_tick(std::time::Duration::from_millis(80));
    }

    fn indexed(&self, title: &str) {
        self.bar.println(format!("Indexed: {title}"));
        self.bar.inc(1);
    }

    fn failed(&self, title: &str, error: &BiosearchError) {
        self.bar.println(format!("Error indexing {title}: {error}"));
        self.bar.inc(1);
    }

    fn finished(&self, report: &IndexReport) {
        self.bar.finish_and_clear();
        println!(
            "Indexing complete. {} succeeded, {} failed, {} total.",
            report.succeeded,
            report.failed.len(),
            report.total
        );
    }
}
