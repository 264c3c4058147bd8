use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{HumanBytes, ProgressBar, ProgressDrawTarget, ProgressStyle};

pub(crate) const PROGRESS_BAR_WIDTH: u64 = 50;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn resolve_output_style(force_plain: bool) -> OutputStyle {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
    if force_plain || no_color || !io::stdout().is_terminal() {
        OutputStyle::Plain
    } else {
        OutputStyle::Rich
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct TerminalRenderer {
    style: OutputStyle,
}

pub(crate) struct DownloadProgress {
    style: OutputStyle,
    current: u64,
    total: Option<u64>,
    drawn_cells: Option<u64>,
    progress_bar: Option<ProgressBar>,
    started_at: Instant,
}

impl TerminalRenderer {
    pub(crate) fn from_style(style: OutputStyle) -> Self {
        Self { style }
    }

    pub(crate) fn print_status(self, status: &str, message: &str) {
        let line = match self.style {
            OutputStyle::Plain => render_status_line(self.style, status, message),
            OutputStyle::Rich => {
                let badge = status_badge(status);
                format!("{} {message}", colorize(status_style(status), badge))
            }
        };
        println!("{line}");
    }

    pub(crate) fn print_lines(self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }

    pub(crate) fn start_download(self) -> DownloadProgress {
        DownloadProgress {
            style: self.style,
            current: 0,
            total: None,
            drawn_cells: None,
            progress_bar: None,
            started_at: Instant::now(),
        }
    }
}

impl DownloadProgress {
    /// Redraws the bar for a known total. Reports without a total draw
    /// nothing.
    pub(crate) fn update(&mut self, downloaded: u64, total: Option<u64>) {
        self.current = downloaded;
        self.total = total;
        let Some(total) = total else {
            return;
        };

        match self.style {
            OutputStyle::Rich => {
                let progress_bar = self
                    .progress_bar
                    .get_or_insert_with(|| new_download_bar(total));
                progress_bar.set_length(total);
                progress_bar.set_position(downloaded.min(total));
            }
            OutputStyle::Plain => {
                let cells = filled_cells(downloaded, total);
                if self.drawn_cells == Some(cells) {
                    return;
                }
                self.drawn_cells = Some(cells);
                let mut stdout = io::stdout().lock();
                let _ = write!(stdout, "\r{}", render_ascii_bar(downloaded, total));
                let _ = stdout.flush();
            }
        }
    }

    pub(crate) fn finish(mut self) -> Option<String> {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.finish_and_clear();
        } else if self.drawn_cells.is_some() {
            println!();
        }
        self.total.map(|_| {
            render_download_summary(self.current, Some(self.started_at.elapsed()))
        })
    }

    pub(crate) fn abandon(mut self) {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.abandon();
        } else if self.drawn_cells.is_some() {
            println!();
        }
    }
}

fn new_download_bar(total: u64) -> ProgressBar {
    let progress_bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stdout());
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.cyan.bold} [{bar:50.cyan/blue}] {bytes:>10}/{total_bytes:10} {bytes_per_sec} {eta}",
    ) {
        progress_bar.set_style(style.progress_chars("=> "));
    }
    progress_bar.enable_steady_tick(Duration::from_millis(100));
    progress_bar
}

fn filled_cells(downloaded: u64, total: u64) -> u64 {
    if total == 0 {
        return PROGRESS_BAR_WIDTH;
    }
    (PROGRESS_BAR_WIDTH.saturating_mul(downloaded) / total).min(PROGRESS_BAR_WIDTH)
}

/// Fixed-width bar used when the terminal cannot host an animated one.
pub(crate) fn render_ascii_bar(downloaded: u64, total: u64) -> String {
    let filled = filled_cells(downloaded, total) as usize;
    let width = PROGRESS_BAR_WIDTH as usize;
    format!("[{}{}]", "=".repeat(filled), " ".repeat(width - filled))
}

pub(crate) fn render_download_summary(bytes: u64, elapsed: Option<Duration>) -> String {
    let suffix = elapsed
        .map(|value| format!(" in {}", format_elapsed(value)))
        .unwrap_or_default();
    format!("downloaded {}{}", HumanBytes(bytes), suffix)
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "ok" => "[OK]",
        "warn" => "[WARN]",
        "err" => "[ERR]",
        _ => "[..]",
    }
}

fn status_style(status: &str) -> Style {
    let color = match status {
        "ok" => AnsiColor::BrightGreen,
        "warn" => AnsiColor::BrightYellow,
        "err" => AnsiColor::BrightRed,
        _ => AnsiColor::BrightBlue,
    };
    Style::new()
        .fg_color(Some(color.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let millis = elapsed.subsec_millis();
    format!("{secs}.{millis:03}s")
}
