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

//! subcommands of devprobe
//!
pub(crate) mod devprobe_identity;
pub(crate) mod devprobe_info;
pub(crate) mod devprobe_serial;

use devprobe::error::Error;

/// Log a probe failure. Open errors already name the device.
pub(crate) fn report_error(device: &str, e: &Error) {
    match e {
        Error::Open { .. } => log::error!("{}", e),
        _ => log::error!("{}: {}", device, e),
    }
}
