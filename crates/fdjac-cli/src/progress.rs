use fdjac::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Renders library progress events as an indicatif spinner/bar on stderr.
///
/// The callback handed to the library is `'static` and may be invoked from the
/// coordinator thread at any point during a workflow; all bar state lives
/// behind a mutex shared with the handler.
#[derive(Clone, Default)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

#[derive(Default)]
struct BarState {
    active_bar: Option<ProgressBar>,
    base_message: String,
    hidden: bool,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn hidden() -> Self {
        let handler = Self::default();
        handler.state.lock().unwrap().hidden = true;
        handler
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = Arc::clone(&self.state);
        Box::new(move |progress: Progress| {
            let mut state = state.lock().unwrap();
            handle_progress(&mut state, progress);
        })
    }
}

fn handle_progress(state: &mut BarState, progress: Progress) {
    match progress {
        Progress::PhaseStart { name } => {
            if let Some(bar) = state.active_bar.take() {
                bar.finish_and_clear();
            }

            let pb = ProgressBar::new_spinner();
            if state.hidden {
                pb.set_draw_target(ProgressDrawTarget::hidden());
            }
            pb.enable_steady_tick(Duration::from_millis(80));
            pb.set_style(spinner_style());
            pb.set_message(name.to_string());

            state.active_bar = Some(pb);
            state.base_message = name.to_string();
        }
        Progress::PhaseFinish => {
            if let Some(bar) = state.active_bar.take() {
                bar.finish_and_clear();
            }

            if !state.hidden {
                eprintln!("✓ {}", state.base_message);
            }
            state.base_message.clear();
        }
        Progress::TaskStart { total } => {
            if let Some(bar) = state.active_bar.as_ref() {
                bar.set_style(bar_style());
                bar.set_length(total);
                bar.set_position(0);
                bar.disable_steady_tick();
            }
        }
        Progress::TaskIncrement { amount } => {
            if let Some(bar) = state.active_bar.as_ref() {
                bar.inc(amount);
            }
        }
        Progress::TaskFinish => {
            if let Some(bar) = state.active_bar.as_ref() {
                bar.finish();
            }
        }
        Progress::StatusUpdate { text } => {
            if let Some(bar) = state.active_bar.as_ref() {
                bar.set_message(format!("{} ({})", state.base_message, text));
            }
        }
        Progress::Message(msg) => {
            if let Some(bar) = state.active_bar.as_ref() {
                bar.println(format!("  {}", msg));
            } else if !state.hidden {
                eprintln!("  {}", msg);
            }
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .expect("Invalid template")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<45} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .expect("Invalid template")
        .with_key(
            "eta",
            |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                write!(w, "{:.1}s", state.eta().as_secs_f64()).unwrap();
            },
        )
        .progress_chars("━╸ ")
}
