/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::future::poll_fn;

use anyhow::anyhow;
use log::info;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::broadcast;

pub trait AsyncSignalAction: Clone {
    fn run(&self) -> impl Future<Output = ()> + Send;
}

#[derive(Clone)]
pub struct QuitAction {
    quit_sender: broadcast::Sender<()>,
}

impl QuitAction {
    pub fn new(quit_sender: broadcast::Sender<()>) -> Self {
        QuitAction { quit_sender }
    }
}

impl AsyncSignalAction for QuitAction {
    async fn run(&self) {
        let _ = self.quit_sender.send(());
    }
}

fn register_one<A>(kind: SignalKind, name: &'static str, action: A) -> anyhow::Result<()>
where
    A: AsyncSignalAction + Send + Sync + 'static,
{
    let mut sig =
        signal(kind).map_err(|e| anyhow!("failed to create {name} listener: {e}"))?;
    tokio::spawn(async move {
        if poll_fn(|cx| sig.poll_recv(cx)).await.is_some() {
            info!("got {name} signal");
            action.run().await;
        }
    });
    Ok(())
}

pub fn register_quit<A>(do_quit: A) -> anyhow::Result<()>
where
    A: AsyncSignalAction + Send + Sync + 'static,
{
    register_one(SignalKind::quit(), "SIGQUIT", do_quit.clone())?;
    register_one(SignalKind::interrupt(), "SIGINT", do_quit.clone())?;
    register_one(SignalKind::terminate(), "SIGTERM", do_quit)
}

pub fn register(quit_sender: &broadcast::Sender<()>) -> anyhow::Result<()> {
    register_quit(QuitAction::new(quit_sender.clone()))
}
