/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

pub mod backend;
pub mod config;
pub mod log;
pub mod opts;
pub mod serve;
pub mod signal;

mod build;
