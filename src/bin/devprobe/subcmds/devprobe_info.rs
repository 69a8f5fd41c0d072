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

//! subcommand for devprobe info

use super::report_error;
use devprobe::config::DevprobeConfig;
use devprobe::device::NodeOpener;
use devprobe::error::Result;
use devprobe::probe::{info_probe, DiskInfo};
use std::{io::Write, path::Path};

/// Print the collected properties and map the outcome to the exit code.
pub(crate) fn report_info(result: Result<DiskInfo>, device: &str, out: &mut dyn Write) -> i32 {
    let info = match result {
        Ok(info) => info,
        Err(e) => {
            report_error(device, &e);
            return 1;
        }
    };

    if let Err(e) = info.write_export(out).and_then(|_| out.flush()) {
        log::error!("Failed to print the properties of {}: {}", device, e);
        return 1;
    }
    0
}

/// Print what `device` tells about itself, returning the exit code.
pub fn subcommand_info(config: &DevprobeConfig, device: &str) -> i32 {
    let opener = NodeOpener::new(config.get_sg_version());
    let result = info_probe(&opener, Path::new(device), config.get_scsi_timeout());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report_info(result, device, &mut out)
}
