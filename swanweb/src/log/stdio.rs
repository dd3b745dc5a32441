/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::Local;
use flume::{Receiver, Sender, TrySendError};
use slog::{Drain, KV, Level, OwnedKVList, Record, Serializer};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

struct StdLogValue {
    level: Level,
    message: String,
    kv_pairs: Vec<(String, String)>,
    location: Option<String>,
}

impl StdLogValue {
    fn message_str(&self) -> &str {
        if self.message.is_empty() {
            "()"
        } else {
            &self.message
        }
    }
}

struct FormatterKv<'a>(&'a mut Vec<(String, String)>);

impl Serializer for FormatterKv<'_> {
    fn emit_arguments(&mut self, key: slog::Key, value: &fmt::Arguments) -> slog::Result {
        self.0.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// A drain that moves formatted records to a dedicated writer thread.
pub(super) struct AsyncStdLogger {
    sender: Sender<StdLogValue>,
    append_code_position: bool,
}

impl AsyncStdLogger {
    fn format_slog(
        &self,
        record: &Record,
        logger_values: &OwnedKVList,
    ) -> Result<StdLogValue, slog::Error> {
        let mut kv_pairs = Vec::new();
        let mut kv_formatter = FormatterKv(&mut kv_pairs);
        logger_values.serialize(record, &mut kv_formatter)?;
        record.kv().serialize(record, &mut kv_formatter)?;

        let location = if self.append_code_position {
            let file = record.file().rsplit_once('/').map(|x| x.1).unwrap_or(record.file());
            Some(format!("{file}:{}", record.line()))
        } else {
            None
        };

        Ok(StdLogValue {
            level: record.level(),
            message: record.msg().to_string(),
            kv_pairs,
            location,
        })
    }
}

impl Drain for AsyncStdLogger {
    type Ok = ();
    type Err = slog::Error;

    fn log(&self, record: &Record, logger_values: &OwnedKVList) -> Result<(), slog::Error> {
        let v = self.format_slog(record, logger_values)?;
        match self.sender.try_send(v) {
            Ok(_) => Ok(()),
            // channel full, drop it
            Err(TrySendError::Full(_)) => Ok(()),
            Err(TrySendError::Disconnected(_)) => Err(slog::Error::Other),
        }
    }
}

pub(super) fn new_async_logger(
    thread_name: &str,
    channel_capacity: usize,
    append_code_position: bool,
) -> anyhow::Result<AsyncStdLogger> {
    let (sender, receiver) = flume::bounded::<StdLogValue>(channel_capacity);

    let io_thread = AsyncIoThread { receiver };
    let _detached_thread = std::thread::Builder::new()
        .name(thread_name.to_string())
        .spawn(move || io_thread.run_with_stderr())
        .map_err(|e| anyhow!("failed to spawn log thread: {e}"))?;

    Ok(AsyncStdLogger {
        sender,
        append_code_position,
    })
}

struct AsyncIoThread {
    receiver: Receiver<StdLogValue>,
}

impl AsyncIoThread {
    fn run_with_stderr(self) {
        let stderr = io::stderr();
        if stderr.is_terminal() {
            self.run(stderr, write_console)
        } else {
            self.run(stderr, write_plain)
        }
    }

    fn run<IO, F>(&self, mut io: IO, format: F)
    where
        IO: Write,
        F: Fn(&mut Vec<u8>, StdLogValue) -> io::Result<()>,
    {
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Ok(v) = self.receiver.recv() {
            buf.clear();
            let _ = format(&mut buf, v);
            let _ = io.write_all(&buf);

            while let Ok(v) = self.receiver.try_recv() {
                buf.clear();
                let _ = format(&mut buf, v);
                let _ = io.write_all(&buf);
            }

            let _ = io.flush();
        }
    }
}

fn write_time<IO: Write>(io: &mut IO) -> io::Result<()> {
    write!(io, "{}", Local::now().format(TIME_FORMAT))
}

fn write_plain(io: &mut Vec<u8>, v: StdLogValue) -> io::Result<()> {
    write_time(io)?;
    write!(io, " {}", v.level)?;
    for (k, v) in &v.kv_pairs {
        write!(io, " {k}: {v},")?;
    }
    write!(io, " {}", v.message_str())?;
    if let Some(location) = &v.location {
        write!(io, " <{location}>")?;
    }
    writeln!(io)
}

fn write_console(io: &mut Vec<u8>, v: StdLogValue) -> io::Result<()> {
    use anstyle::{AnsiColor, Color, Style};

    const COLOR_MAGENTA: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Magenta)));
    const COLOR_RED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
    const COLOR_YELLOW: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
    const COLOR_GREEN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
    const COLOR_CYAN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
    const COLOR_BLUE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue)));
    const STYLE_BOLD: Style = Style::new().bold();
    const STYLE_ITALIC: Style = Style::new().italic();

    let bold_s = STYLE_BOLD.render();
    let bold_e = STYLE_BOLD.render_reset();

    write_time(io)?;
    let level_color = match v.level {
        Level::Critical => COLOR_MAGENTA,
        Level::Error => COLOR_RED,
        Level::Warning => COLOR_YELLOW,
        Level::Info => COLOR_GREEN,
        Level::Debug => COLOR_CYAN,
        Level::Trace => COLOR_BLUE,
    };
    write!(
        io,
        " {}{}{}",
        level_color.render(),
        v.level,
        level_color.render_reset(),
    )?;

    for (k, v) in &v.kv_pairs {
        write!(io, " {bold_s}{k}{bold_e}={v},")?;
    }

    write!(io, " {bold_s}{}{bold_e}", v.message_str())?;

    if let Some(location) = &v.location {
        write!(
            io,
            " <{}{location}{}>",
            STYLE_ITALIC.render(),
            STYLE_ITALIC.render_reset()
        )?;
    }
    writeln!(io)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value() -> StdLogValue {
        StdLogValue {
            level: Level::Info,
            message: "GET /status_json 200".to_string(),
            kv_pairs: vec![("peer".to_string(), "127.0.0.1:50000".to_string())],
            location: Some("server.rs:42".to_string()),
        }
    }

    #[test]
    fn plain_line() {
        let mut buf = Vec::new();
        write_plain(&mut buf, value()).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert!(line.ends_with(" peer: 127.0.0.1:50000, GET /status_json 200 <server.rs:42>\n"));
    }

    #[test]
    fn console_line() {
        let mut buf = Vec::new();
        write_console(&mut buf, value()).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert!(line.contains("peer"));
        assert!(line.contains("GET /status_json 200"));
        assert!(line.contains("\x1b["));
    }

    #[test]
    fn empty_message() {
        let mut v = value();
        v.message.clear();
        v.kv_pairs.clear();
        v.location = None;
        let mut buf = Vec::new();
        write_plain(&mut buf, v).unwrap();
        assert!(String::from_utf8(buf).unwrap().ends_with(" ()\n"));
    }
}
