// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Parser;

use cmd::cli::Cli;
use cmd::config::MountConfig;

fn main() -> Result<()> {
    // A missing mount path exits here with a usage error.
    let cli = Cli::parse();

    diagnostics::init_with_debug(cli.debug);

    let config = MountConfig::from_cli(&cli)?;
    cmd::mount::run(config)
}
