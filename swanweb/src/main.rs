/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use anyhow::Context;
use log::{debug, error, info};
use tokio::sync::broadcast;

use swanweb::backend::{SwanctlRunner, ViciControl};
use swanweb::config::SwanwebConfig;
use swanweb::serve::{ApiHandler, HttpServer};

fn main() -> anyhow::Result<()> {
    let Some(proc_args) =
        swanweb::opts::parse_clap().context("failed to parse command line options")?
    else {
        return Ok(());
    };

    // set up process logger early, only proc args is used inside
    let _log_guard =
        swanweb::log::setup(proc_args.verbose_level).context("failed to setup logger")?;

    let (config_file, config) = swanweb::config::load()
        .map_err(|e| e.context(format!("failed to load config, opts: {:?}", &proc_args)))?;
    debug!("loaded config from {}", config_file.display());

    if proc_args.test_config {
        info!("the format of the config file is ok");
        return Ok(());
    }

    let ret = tokio_run(config);
    match ret {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("{e:?}");
            Err(e)
        }
    }
}

fn tokio_run(config: SwanwebConfig) -> anyhow::Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    rt.block_on(async {
        let (quit_sender, quit_receiver) = broadcast::channel(4);
        swanweb::signal::register(&quit_sender).context("failed to setup signal handler")?;

        let api = ApiHandler::new(
            SwanctlRunner::new(&config.swanctl),
            ViciControl::new(&config.vici),
        );
        let server = Arc::new(HttpServer::new(config.server, api));
        let listener = server.bind().await?;
        server.run(listener, quit_receiver).await;
        Ok(())
    })
}
