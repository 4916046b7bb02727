//! Rendering of samples, cadence and recording time.
//!
//! Everything here is a projection of state owned elsewhere; nothing is
//! validated or stored.

use std::io::{self, Write};
use std::time::Duration;

use chrono::Utc;
use colored::{Color, Colorize};
use serde_json::{Value, json};
use util::system_health::Sample;

use crate::session::Cadence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    /// Maps a config value such as `ru` or `ru_RU.UTF-8`. Anything
    /// unrecognised falls back to English.
    pub fn from_config(value: &str) -> Self {
        let value = value.trim().to_ascii_lowercase();
        if value.starts_with("ru") {
            Locale::Ru
        } else {
            if !value.starts_with("en") {
                tracing::warn!(locale = %value, "unsupported locale, using en");
            }
            Locale::En
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayFormat {
    #[default]
    Text,
    Json,
}

impl DisplayFormat {
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => DisplayFormat::Json,
            "text" => DisplayFormat::Text,
            other => {
                tracing::warn!(format = %other, "unknown display format, using text");
                DisplayFormat::Text
            }
        }
    }
}

struct Labels {
    cpu: &'static str,
    ram: &'static str,
    disk: &'static str,
    interval: &'static str,
    elapsed: &'static str,
    started: &'static str,
    stopped: &'static str,
}

const EN: Labels = Labels {
    cpu: "CPU",
    ram: "RAM",
    disk: "Disk",
    interval: "Update interval",
    elapsed: "Recording time",
    started: "Recording started",
    stopped: "Recording stopped",
};

const RU: Labels = Labels {
    cpu: "ЦП",
    ram: "ОЗУ",
    disk: "ПЗУ",
    interval: "Интервал обновления",
    elapsed: "Время записи",
    started: "Запись начата",
    stopped: "Запись остановлена",
};

fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::En => &EN,
        Locale::Ru => &RU,
    }
}

/// "`n` second(s)" with the plural form the locale requires.
pub fn seconds_label(locale: Locale, n: u64) -> String {
    let unit = match locale {
        Locale::En => {
            if n == 1 {
                "second"
            } else {
                "seconds"
            }
        }
        Locale::Ru => match (n % 10, n % 100) {
            (1, rem) if rem != 11 => "секунда",
            (2..=4, rem) if !(12..=14).contains(&rem) => "секунды",
            _ => "секунд",
        },
    };
    format!("{n} {unit}")
}

pub fn cadence_label(locale: Locale, cadence: Cadence) -> String {
    format!(
        "{}: {}",
        labels(locale).interval,
        seconds_label(locale, cadence.seconds())
    )
}

/// `HH:MM:SS`. Hours keep counting past 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Receives everything the monitor wants to show.
pub trait View {
    fn show_sample(&mut self, sample: &Sample) -> io::Result<()>;
    fn show_cadence(&mut self, cadence: Cadence) -> io::Result<()>;
    fn show_elapsed(&mut self, elapsed: Duration) -> io::Result<()>;
    fn show_recording(&mut self, recording: bool) -> io::Result<()>;
    fn show_hint(&mut self, message: &str) -> io::Result<()>;
}

/// Line-oriented view over any writer, as text or one JSON object per line.
pub struct TerminalView<W: Write> {
    out: W,
    locale: Locale,
    format: DisplayFormat,
    color: bool,
}

impl TerminalView<io::Stdout> {
    pub fn stdout(locale: Locale, format: DisplayFormat) -> Self {
        use std::io::IsTerminal;
        let color = io::stdout().is_terminal();
        TerminalView::new(io::stdout(), locale, format, color)
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, locale: Locale, format: DisplayFormat, color: bool) -> Self {
        Self {
            out,
            locale,
            format,
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: String, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text
        }
    }

    fn usage_color(value: f64) -> Color {
        if value < 50.0 {
            Color::Green
        } else if value < 85.0 {
            Color::Yellow
        } else {
            Color::Red
        }
    }

    fn write_json(&mut self, event: &str, body: Value) -> io::Result<()> {
        let mut payload = json!({
            "ts": Utc::now().to_rfc3339(),
            "event": event,
        });
        if let (Some(map), Value::Object(extra)) = (payload.as_object_mut(), body) {
            map.extend(extra);
        }
        writeln!(self.out, "{payload}")?;
        self.out.flush()
    }

    fn write_line(&mut self, line: String) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}

impl<W: Write> View for TerminalView<W> {
    fn show_sample(&mut self, sample: &Sample) -> io::Result<()> {
        if self.format == DisplayFormat::Json {
            let body = serde_json::to_value(sample).map_err(io::Error::other)?;
            return self.write_json("sample", body);
        }

        let l = labels(self.locale);
        let fields = [
            (l.cpu, sample.cpu_load),
            (l.ram, sample.ram_usage),
            (l.disk, sample.disk_usage),
        ];
        let line = fields
            .iter()
            .map(|(label, value)| {
                let value = self.paint(format_percent(*value), Self::usage_color(*value));
                format!("{label}: {value}")
            })
            .collect::<Vec<_>>()
            .join("  ");
        self.write_line(line)
    }

    fn show_cadence(&mut self, cadence: Cadence) -> io::Result<()> {
        match self.format {
            DisplayFormat::Json => self.write_json(
                "cadence",
                json!({
                    "seconds": cadence.seconds(),
                    "label": cadence_label(self.locale, cadence),
                }),
            ),
            DisplayFormat::Text => {
                let line = self.paint(cadence_label(self.locale, cadence), Color::Cyan);
                self.write_line(line)
            }
        }
    }

    fn show_elapsed(&mut self, elapsed: Duration) -> io::Result<()> {
        match self.format {
            DisplayFormat::Json => self.write_json(
                "elapsed",
                json!({
                    "seconds": elapsed.as_secs(),
                    "label": format_elapsed(elapsed),
                }),
            ),
            DisplayFormat::Text => {
                let line = format!(
                    "{}: {}",
                    labels(self.locale).elapsed,
                    format_elapsed(elapsed)
                );
                let line = self.paint(line, Color::Magenta);
                self.write_line(line)
            }
        }
    }

    fn show_recording(&mut self, recording: bool) -> io::Result<()> {
        match self.format {
            DisplayFormat::Json => self.write_json("recording", json!({ "active": recording })),
            DisplayFormat::Text => {
                let l = labels(self.locale);
                let line = if recording {
                    self.paint(format!("● {}", l.started), Color::Red)
                } else {
                    self.paint(format!("■ {}", l.stopped), Color::BrightBlack)
                };
                self.write_line(line)
            }
        }
    }

    fn show_hint(&mut self, message: &str) -> io::Result<()> {
        match self.format {
            DisplayFormat::Json => self.write_json("hint", json!({ "message": message })),
            DisplayFormat::Text => {
                let line = self.paint(message.to_owned(), Color::Yellow);
                self.write_line(line)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_view(locale: Locale) -> TerminalView<Vec<u8>> {
        TerminalView::new(Vec::new(), locale, DisplayFormat::Text, false)
    }

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn english_cadence_label_pluralises() {
        for v in 1..=10 {
            let label = cadence_label(Locale::En, Cadence::clamped(v));
            if v == 1 {
                assert_eq!(label, "Update interval: 1 second");
            } else {
                assert_eq!(label, format!("Update interval: {v} seconds"));
            }
        }
    }

    #[test]
    fn russian_seconds_follow_plural_rules() {
        assert_eq!(seconds_label(Locale::Ru, 1), "1 секунда");
        assert_eq!(seconds_label(Locale::Ru, 2), "2 секунды");
        assert_eq!(seconds_label(Locale::Ru, 4), "4 секунды");
        assert_eq!(seconds_label(Locale::Ru, 5), "5 секунд");
        assert_eq!(seconds_label(Locale::Ru, 10), "10 секунд");
        assert_eq!(seconds_label(Locale::Ru, 11), "11 секунд");
        assert_eq!(seconds_label(Locale::Ru, 12), "12 секунд");
        assert_eq!(seconds_label(Locale::Ru, 21), "21 секунда");
        assert_eq!(seconds_label(Locale::Ru, 22), "22 секунды");
    }

    #[test]
    fn elapsed_formats_as_hours_minutes_seconds() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(37)), "00:00:37");
        assert_eq!(format_elapsed(Duration::from_secs(3_661)), "01:01:01");
        assert_eq!(format_elapsed(Duration::from_secs(90_000)), "25:00:00");
    }

    #[test]
    fn locale_and_format_parse_config_values() {
        assert_eq!(Locale::from_config("ru_RU.UTF-8"), Locale::Ru);
        assert_eq!(Locale::from_config("EN"), Locale::En);
        assert_eq!(Locale::from_config("de"), Locale::En);
        assert_eq!(DisplayFormat::from_config("JSON"), DisplayFormat::Json);
        assert_eq!(DisplayFormat::from_config("xml"), DisplayFormat::Text);
    }

    #[test]
    fn text_view_renders_sample_line() {
        let mut view = text_view(Locale::En);
        view.show_sample(&Sample::new(12.3, 45.0, 100.0)).unwrap();
        assert_eq!(output(view), "CPU: 12.3%  RAM: 45.0%  Disk: 100.0%\n");
    }

    #[test]
    fn text_view_uses_locale_labels() {
        let mut view = text_view(Locale::Ru);
        view.show_sample(&Sample::new(1.0, 2.0, 3.0)).unwrap();
        view.show_cadence(Cadence::clamped(3)).unwrap();
        view.show_elapsed(Duration::from_secs(5)).unwrap();
        assert_eq!(
            output(view),
            "ЦП: 1.0%  ОЗУ: 2.0%  ПЗУ: 3.0%\n\
             Интервал обновления: 3 секунды\n\
             Время записи: 00:00:05\n"
        );
    }

    #[test]
    fn json_view_emits_one_object_per_event() {
        let mut view = TerminalView::new(Vec::new(), Locale::En, DisplayFormat::Json, false);
        view.show_sample(&Sample::new(10.0, 20.0, 30.0)).unwrap();
        view.show_recording(true).unwrap();

        let text = output(view);
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "sample");
        assert_eq!(lines[0]["cpu_load"], 10.0);
        assert_eq!(lines[0]["disk_usage"], 30.0);
        assert!(lines[0]["ts"].is_string());
        assert_eq!(lines[1]["event"], "recording");
        assert_eq!(lines[1]["active"], true);
    }
}
