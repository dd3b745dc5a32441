/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use slog::Drain;
use slog_scope::GlobalLoggerGuard;

mod stdio;

const PROCESS_LOG_THREAD_NAME: &str = "log-process";
const PROCESS_LOG_CHANNEL_SIZE: usize = 1024;

fn verbose_level_to_log_level(verbose_level: u8) -> log::Level {
    match verbose_level {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    }
}

fn process_logger(thread_name: &str, append_code_position: bool) -> anyhow::Result<slog::Logger> {
    let drain =
        stdio::new_async_logger(thread_name, PROCESS_LOG_CHANNEL_SIZE, append_code_position)?;
    Ok(slog::Logger::root(drain.fuse(), slog::o!()))
}

pub fn setup(verbose_level: u8) -> anyhow::Result<GlobalLoggerGuard> {
    let logger = process_logger(PROCESS_LOG_THREAD_NAME, true)?;

    let scope_guard = slog_scope::set_global_logger(logger);
    slog_stdlog::init_with_level(verbose_level_to_log_level(verbose_level))?;
    Ok(scope_guard)
}
