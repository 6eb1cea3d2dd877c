//! Human-readable transfer output on stderr.

use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::{cursor, terminal, QueueableCommand};
use dcr::domain::ports::{TransferEvent, TransferEventSink};
use dcr::Stage;

use crate::ui::context::UiContext;
use crate::ui::progress::{format_bytes, ProgressBar};
use crate::ui::theme::{dim, Icon};

const REDRAW_INTERVAL: Duration = Duration::from_millis(80);

struct ConsoleState {
    out: Box<dyn Write + Send>,
    bar: Option<ProgressBar>,
    last_draw: Option<Instant>,
}

/// Prints one line per stage and a live upload bar when animation is on.
pub struct ConsoleEventSink {
    ctx: UiContext,
    state: Mutex<ConsoleState>,
}

impl ConsoleEventSink {
    pub fn stderr(ctx: UiContext) -> Self {
        Self::with_writer(ctx, io::stderr())
    }

    pub fn with_writer<W: Write + Send + 'static>(ctx: UiContext, writer: W) -> Self {
        Self {
            ctx,
            state: Mutex::new(ConsoleState {
                out: Box::new(writer),
                bar: None,
                last_draw: None,
            }),
        }
    }

    fn detail(&self, text: &str) -> String {
        format!(
            "  {} {}",
            Icon::Arrow.render(self.ctx.color, self.ctx.unicode),
            dim(text, self.ctx.color)
        )
    }

    fn render(&self, state: &mut ConsoleState, event: TransferEvent) -> io::Result<()> {
        let (color, unicode) = (self.ctx.color, self.ctx.unicode);
        match event {
            TransferEvent::Progress(sample) => {
                let now = Instant::now();
                let bar = state.bar.get_or_insert_with(|| {
                    let mut bar = ProgressBar::new(sample.bytes_total);
                    bar.set_width(self.ctx.caps.width.saturating_sub(40).clamp(10, 40));
                    bar
                });
                bar.set_total(sample.bytes_total);
                bar.set(sample.bytes_transferred);

                let due = state
                    .last_draw
                    .map_or(true, |at| now.duration_since(at) >= REDRAW_INTERVAL);
                if due || bar.is_complete() {
                    let line = format!("  {}", bar.render(unicode));
                    state.out.queue(cursor::MoveToColumn(0))?;
                    state
                        .out
                        .queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
                    state.out.write_all(line.as_bytes())?;
                    state.last_draw = Some(now);
                }
                return state.out.flush();
            }
            _ => finish_bar(state)?,
        }

        let line = match event {
            TransferEvent::StageStarted { stage } => {
                if stage == Stage::CleaningUp && self.ctx.verbose == 0 {
                    return Ok(());
                }
                format!("{} {}", Icon::Progress.render(color, unicode), stage)
            }
            TransferEvent::Packaged { size, entry_count } => {
                self.detail(&format!("{} entries, {}", entry_count, format_bytes(size)))
            }
            TransferEvent::Connected { target } => self.detail(&target),
            TransferEvent::Validated {
                destination,
                created,
            } => {
                if created {
                    self.detail(&format!("{} (created)", destination))
                } else {
                    self.detail(&destination)
                }
            }
            TransferEvent::Succeeded { bytes_transferred } => format!(
                "{} Transferred {}",
                Icon::Success.render(color, unicode),
                format_bytes(bytes_transferred)
            ),
            TransferEvent::Failed { stage, .. } => {
                format!("{} {} failed", Icon::Error.render(color, unicode), stage)
            }
            TransferEvent::Progress(_) => return Ok(()),
        };
        writeln!(state.out, "{}", line)?;
        state.out.flush()
    }
}

/// End a live bar line so the next output starts on a fresh line.
fn finish_bar(state: &mut ConsoleState) -> io::Result<()> {
    if state.bar.take().is_some() {
        state.last_draw = None;
        writeln!(state.out)?;
    }
    Ok(())
}

impl TransferEventSink for ConsoleEventSink {
    fn on_event(&self, event: TransferEvent) {
        if let Ok(mut state) = self.state.lock() {
            let _ = self.render(&mut state, event);
        }
    }

    fn wants_progress(&self) -> bool {
        self.ctx.animation
    }
}
