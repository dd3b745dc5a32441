/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint, value_parser};

const ARGS_VERSION: &str = "version";
const ARGS_VERBOSE: &str = "verbose";
const ARGS_CONFIG_FILE: &str = "config-file";
const ARGS_TEST_CONFIG: &str = "test-config";

static CONFIG_FILE_PATH: OnceLock<PathBuf> = OnceLock::new();
static CONFIG_DIR_PATH: OnceLock<PathBuf> = OnceLock::new();

#[derive(Debug, Default)]
pub struct ProcArgs {
    pub verbose_level: u8,
    pub test_config: bool,
}

fn build_cli_args() -> Command {
    Command::new(crate::build::PKG_NAME)
        .disable_version_flag(true)
        .arg(
            Arg::new(ARGS_VERBOSE)
                .help("Show verbose output")
                .num_args(0)
                .action(ArgAction::Count)
                .short('v')
                .long(ARGS_VERBOSE),
        )
        .arg(
            Arg::new(ARGS_VERSION)
                .help("Show version")
                .action(ArgAction::SetTrue)
                .short('V')
                .long(ARGS_VERSION),
        )
        .arg(
            Arg::new(ARGS_CONFIG_FILE)
                .help("Config file path")
                .num_args(1)
                .value_name("CONFIG FILE")
                .value_hint(ValueHint::FilePath)
                .value_parser(value_parser!(PathBuf))
                .required_unless_present_any([ARGS_VERSION])
                .short('c')
                .long(ARGS_CONFIG_FILE),
        )
        .arg(
            Arg::new(ARGS_TEST_CONFIG)
                .help("Test the format of config file and exit")
                .action(ArgAction::SetTrue)
                .short('t')
                .long(ARGS_TEST_CONFIG),
        )
}

fn parse_args(args: &ArgMatches) -> anyhow::Result<Option<ProcArgs>> {
    let mut proc_args = ProcArgs::default();

    if let Some(verbose_level) = args.get_one::<u8>(ARGS_VERBOSE) {
        proc_args.verbose_level = *verbose_level;
    }

    if args.get_flag(ARGS_VERSION) {
        crate::build::print_version(proc_args.verbose_level);
        return Ok(None);
    }
    if args.get_flag(ARGS_TEST_CONFIG) {
        proc_args.test_config = true;
    }

    let Some(config_file) = args.get_one::<PathBuf>(ARGS_CONFIG_FILE) else {
        return Err(anyhow!("no config file given"));
    };
    validate_and_set_config_file(config_file).context(format!(
        "failed to load config file {}",
        config_file.display()
    ))?;

    Ok(Some(proc_args))
}

pub fn parse_clap() -> anyhow::Result<Option<ProcArgs>> {
    let args = build_cli_args().get_matches();
    parse_args(&args)
}

fn validate_and_get_config_file(path: &Path) -> anyhow::Result<PathBuf> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| anyhow!("failed to get metadata of path {}: {e}", path.display()))?;
    if !metadata.is_file() {
        return Err(anyhow!("{} is not a regular file", path.display()));
    }

    let mut path = path.to_path_buf();
    if !path.is_absolute() {
        let cur_dir =
            std::env::current_dir().map_err(|e| anyhow!("failed to get current dir: {e}"))?;
        path = cur_dir.join(path);
    }
    path.canonicalize()
        .map_err(|e| anyhow!("failed to canonicalize path: {e}"))
}

fn validate_and_set_config_file(path: &Path) -> anyhow::Result<()> {
    let config_file = validate_and_get_config_file(path)?;

    let current_dir = std::env::current_dir()?;
    let conf_dir = config_file.parent().unwrap_or(&current_dir).to_path_buf();

    CONFIG_FILE_PATH
        .set(config_file)
        .map_err(|_| anyhow!("config file has already been set"))?;
    CONFIG_DIR_PATH
        .set(conf_dir)
        .map_err(|_| anyhow!("config dir has already been set"))?;
    Ok(())
}

pub fn config_file() -> Option<&'static Path> {
    CONFIG_FILE_PATH.get().map(|p| p.as_path())
}

pub fn config_dir() -> Option<&'static Path> {
    CONFIG_DIR_PATH.get().map(|p| p.as_path())
}
