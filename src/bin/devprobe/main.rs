// Copyright (c) 2022 Huawei Technologies Co.,Ltd. All rights reserved.
//
// sysMaster is licensed under Mulan PSL v2.
// You can use this software according to the terms and conditions of the Mulan
// PSL v2.
// You may obtain a copy of Mulan PSL v2 at:
//         http://license.coscl.org.cn/MulanPSL2
// THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY
// KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO
// NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
// See the Mulan PSL v2 for more details.

//! devprobe dumps the identity block or reads the unit serial of a disk
//!
mod subcmds;
use clap::Parser;
use devprobe::config::{DevprobeConfig, DEFAULT_CONFIG};
use log::{init_log, init_log_to_console, Level};
use std::process;
use subcmds::devprobe_identity::subcommand_identity;
use subcmds::devprobe_info::subcommand_info;
use subcmds::devprobe_serial::subcommand_serial;

/// parse program arguments
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// configuration file
    #[clap(short, long, default_value = DEFAULT_CONFIG)]
    config: String,

    /// log debug messages
    #[clap(short, long)]
    verbose: bool,

    /// Kinds of subcommands
    #[clap(subcommand)]
    subcmd: SubCmd,
}

/// Kinds of subcommands
#[derive(Parser, Debug)]
enum SubCmd {
    /// Dump the non-zero bytes of the ATA identity block
    #[clap(display_order = 1)]
    Identity {
        /// give up on the request after this many milliseconds, 0 waits forever
        #[clap(short, long)]
        timeout_ms: Option<u64>,

        /// device node
        #[clap(required = false)]
        device: Option<String>,
    },

    /// Read the unit serial number from VPD page 0x80
    #[clap(display_order = 2)]
    Serial {
        /// device node
        #[clap(required = false)]
        device: Option<String>,
    },

    /// Print size, vendor, model and serial as KEY=value lines
    #[clap(display_order = 3)]
    Info {
        /// device node
        #[clap(required = false)]
        device: Option<String>,
    },
}

fn main() {
    let args = Args::parse();

    init_log_to_console("devprobe", Level::Info);
    let mut config = DevprobeConfig::new();
    config.load(&args.config);

    let level = if args.verbose {
        Level::Debug
    } else {
        config.get_log_level()
    };
    let targets = config.get_log_targets();
    init_log(
        "devprobe",
        level,
        targets.iter().map(|t| t.as_str()).collect(),
    );

    let ret = match args.subcmd {
        SubCmd::Identity { timeout_ms, device } => {
            let device = device.unwrap_or_else(|| config.get_device());
            subcommand_identity(&config, &device, timeout_ms)
        }
        SubCmd::Serial { device } => {
            let device = device.unwrap_or_else(|| config.get_device());
            subcommand_serial(&config, &device)
        }
        SubCmd::Info { device } => {
            let device = device.unwrap_or_else(|| config.get_device());
            subcommand_info(&config, &device)
        }
    };

    process::exit(ret);
}
