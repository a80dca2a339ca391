//! Per-size progress display with automatic batching for long size lists

use crate::algorithm::executor::BatchObserver;
use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use crate::io::request::Size;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::time::Instant;

/// Display state of one size
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeState {
    /// Not started yet
    Pending,
    /// Currently rendering
    Rendering,
    /// Finished with output
    Done,
    /// Finished without output
    Failed,
}

/// Coordinates progress display for a batch of sizes
///
/// Shows one bar per size for short lists and adds an overall bar once the
/// list is longer than the number of individual bars shown.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    size_bars: Vec<ProgressBar>,
    /// (`label`, `state`) for rolling window display
    size_states: Vec<(String, SizeState)>,
    started: Option<Instant>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static SIZE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg:>10} [{bar:30.cyan/blue}] {prefix}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Sizes: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            size_bars: Vec::new(),
            size_states: Vec::new(),
            started: None,
        }
    }

    /// Prepare bars for `sizes`
    pub fn initialize(&mut self, sizes: &[Size]) {
        self.started = Some(Instant::now());
        self.size_states = sizes
            .iter()
            .map(|size| (format!("{} ({})", size.name, size.key()), SizeState::Pending))
            .collect();

        if sizes.len() > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(sizes.len() as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..sizes.len().min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let bar = ProgressBar::new(1);
            bar.set_style(SIZE_STYLE.clone());
            self.size_bars.push(self.multi_progress.add(bar));
        }
        self.update_bars();
    }

    /// State of the size at `index`
    pub fn state(&self, index: usize) -> Option<&SizeState> {
        self.size_states.get(index).map(|(_, state)| state)
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All sizes rendered");
        }
        if let Some(started) = self.started {
            log::info!("Batch finished in {:.2?}", started.elapsed());
        }
        let _ = self.multi_progress.clear();
    }

    fn set_state(&mut self, index: usize, state: SizeState) {
        if let Some(entry) = self.size_states.get_mut(index) {
            entry.1 = state;
        }
        self.update_bars();
    }

    /// Show the last N sizes that have started
    fn update_bars(&self) {
        let active: Vec<&(String, SizeState)> = self
            .size_states
            .iter()
            .filter(|(_, state)| *state != SizeState::Pending)
            .collect();

        let start = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start..).unwrap_or(&[]);

        for (bar_index, (label, state)) in visible.iter().enumerate() {
            if let Some(bar) = self.size_bars.get(bar_index) {
                let (position, message) = match state {
                    SizeState::Pending | SizeState::Rendering => (0, "rendering"),
                    SizeState::Done => (1, "✓ done"),
                    SizeState::Failed => (1, "✗ failed"),
                };
                bar.set_position(position);
                bar.set_message(message);
                bar.set_prefix(label.clone());
            }
        }

        for bar_index in visible.len()..self.size_bars.len() {
            if let Some(bar) = self.size_bars.get(bar_index) {
                bar.set_position(0);
                bar.set_message(String::new());
                bar.set_prefix(String::new());
            }
        }
    }
}

impl BatchObserver for ProgressManager {
    fn size_started(&mut self, index: usize, size: &Size, total: usize) {
        log::debug!("Size {}/{total}: {}", index + 1, size.key());
        self.set_state(index, SizeState::Rendering);
    }

    fn size_finished(&mut self, index: usize, _size: &Size, succeeded: bool) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        let state = if succeeded {
            SizeState::Done
        } else {
            SizeState::Failed
        };
        self.set_state(index, state);
    }
}
