use std::time::{Duration, Instant};

/// Byte-count progress bar for the upload stage.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    total: u64,
    current: u64,
    width: u16,
    started: Instant,
}

impl ProgressBar {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            current: 0,
            width: 24,
            started: Instant::now(),
        }
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = width.max(1);
    }

    pub fn set(&mut self, value: u64) {
        self.current = value;
    }

    pub fn set_total(&mut self, total: u64) {
        self.total = total;
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.total
    }

    pub fn eta(&self) -> Option<Duration> {
        if self.total == 0 || self.current == 0 {
            return None;
        }

        if self.current >= self.total {
            return Some(Duration::from_secs(0));
        }

        let elapsed_secs = self.started.elapsed().as_secs_f64();
        if elapsed_secs <= 0.0 {
            return None;
        }

        let rate = self.current as f64 / elapsed_secs;
        if rate <= 0.0 {
            return None;
        }

        let secs = (self.total - self.current) as f64 / rate;
        if !secs.is_finite() || secs.is_sign_negative() {
            return None;
        }

        Some(Duration::from_secs_f64(secs))
    }

    pub fn render(&self, supports_unicode: bool) -> String {
        let (filled, empty) = self.bar_segments();
        let bar = if supports_unicode {
            format!("{}{}", "━".repeat(filled), "─".repeat(empty))
        } else {
            format!("{}{}", "=".repeat(filled), "-".repeat(empty))
        };

        let pct = if self.total == 0 {
            100
        } else {
            (self.current.min(self.total).saturating_mul(100)) / self.total
        };

        let mut out = format!(
            "{}  {}/{} ({}%)",
            bar,
            format_bytes(self.current),
            format_bytes(self.total),
            pct
        );
        if let Some(eta) = self.eta().filter(|_| !self.is_complete()) {
            out.push_str(&format!("  ETA: {}", format_duration_compact(eta)));
        }
        out
    }

    fn bar_segments(&self) -> (usize, usize) {
        let width = self.width.max(1) as usize;
        if self.total == 0 {
            return (width, 0);
        }

        let ratio = (self.current.min(self.total)) as f64 / self.total as f64;
        let filled = (ratio * width as f64).round().clamp(0.0, width as f64) as usize;
        (filled, width.saturating_sub(filled))
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        return format!("{} B", bytes);
    }
    if b < MB {
        return format!("{:.1} KB", b / KB);
    }
    if b < GB {
        return format!("{:.1} MB", b / MB);
    }
    format!("{:.1} GB", b / GB)
}

fn format_duration_compact(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m", mins);
    }
    format!("{}h", mins / 60)
}
