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

//! capacity, vendor, model and serial of a disk
//!

use super::scsi::std_inquiry;
use super::serial::{read_unit_serial, UnitSerial};
use crate::device::{DeviceControl, DeviceOpener, OpenMode};
use crate::error::*;
use crate::utils::commons::sanitize_identifier;
use std::{io::Write, path::Path, time::Duration};

/// What could be learned about a disk. Fields whose request failed stay `None`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DiskInfo {
    /// size in bytes
    pub size: Option<u64>,
    /// T10 vendor
    pub vendor: Option<String>,
    /// product identification
    pub model: Option<String>,
    /// product revision
    pub revision: Option<String>,
    /// unit serial number
    pub serial: Option<UnitSerial>,
}

impl DiskInfo {
    /// Print the known fields as `KEY=value` lines.
    pub fn write_export(&self, out: &mut dyn Write) -> std::io::Result<()> {
        if let Some(size) = self.size {
            writeln!(out, "ID_SIZE={}", size)?;
        }

        let strings = [
            ("ID_VENDOR", &self.vendor),
            ("ID_MODEL", &self.model),
            ("ID_REVISION", &self.revision),
        ];
        for (key, value) in strings {
            if let Some(v) = value {
                let v = sanitize_identifier(v.as_bytes());
                if !v.is_empty() {
                    writeln!(out, "{}={}", key, v)?;
                }
            }
        }

        if let Some(serial) = &self.serial {
            let serial = sanitize_identifier(serial.as_bytes());
            if !serial.is_empty() {
                writeln!(out, "ID_SERIAL_SHORT={}", serial)?;
            }
        }

        Ok(())
    }
}

/// Collect what the device answers. Only a failed open is an error, every
/// other request is best effort.
pub fn info_probe<O: DeviceOpener>(opener: &O, path: &Path, timeout: Duration) -> Result<DiskInfo> {
    let handle = opener.open(path, OpenMode::ReadOnlyNonBlock)?;
    let mut info = DiskInfo::default();

    match handle.size_bytes() {
        Ok(size) => info.size = Some(size),
        Err(e) => log::debug!("{}: no size: {}", path.display(), e),
    }

    match std_inquiry(&handle, timeout) {
        Ok(inq) => {
            log::debug!("{}: peripheral type {:#04x}", path.display(), inq.device_type);
            info.vendor = Some(inq.vendor);
            info.model = Some(inq.model);
            info.revision = Some(inq.revision);
        }
        Err(e) => log::debug!("{}: no standard inquiry: {}", path.display(), e),
    }

    match read_unit_serial(&handle, timeout) {
        Ok(serial) => info.serial = Some(serial),
        Err(e) => log::debug!("{}: no unit serial: {}", path.display(), e),
    }

    Ok(info)
}
