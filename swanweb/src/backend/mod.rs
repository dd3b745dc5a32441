/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

mod swanctl;
pub use swanctl::{CommandError, SwanctlRunner};

mod vici;
pub use vici::{ControlError, ViciControl};

/// Where the raw `swanctl` listings come from.
pub trait StatusSource: Send + Sync {
    fn list_conns(&self) -> impl Future<Output = Result<String, CommandError>> + Send;
    fn list_sas(&self) -> impl Future<Output = Result<String, CommandError>> + Send;
}

/// Bring a child SA up or down.
pub trait ChildSaControl: Send + Sync {
    fn initiate(&self, name: &str) -> impl Future<Output = Result<(), ControlError>> + Send;
    fn terminate(&self, name: &str) -> impl Future<Output = Result<(), ControlError>> + Send;
}
