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

//! unit serial number from VPD page 0x80
//!

use super::scsi::scsi_inquiry;
use crate::device::{DeviceControl, DeviceOpener, OpenMode};
use crate::error::*;
use std::{fmt, path::Path, time::Duration};

/// Unit Serial Number VPD page
pub const PAGE_UNIT_SERIAL: u8 = 0x80;
/// length of the page 0x80 response buffer
pub const SCSI_INQ_BUFF_LEN: usize = 255;
/// page code, reserved and length bytes ahead of the serial
pub const VPD_HEADER_LEN: usize = 4;

/// The raw serial bytes as the device reported them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSerial(Vec<u8>);

impl UnitSerial {
    /// the raw bytes, not terminated
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for UnitSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Extract the serial of a page 0x80 response.
///
/// Byte 3 holds the length, the serial follows at byte 4. The length is
/// checked against what the buffer can hold before slicing.
pub fn parse_unit_serial(buffer: &[u8]) -> Result<UnitSerial> {
    snafu::ensure!(
        buffer.len() >= VPD_HEADER_LEN,
        MalformedResponseSnafu {
            length: VPD_HEADER_LEN,
            capacity: buffer.len(),
        }
    );

    let length = buffer[3] as usize;
    snafu::ensure!(length != 0, NoSerialReportedSnafu);

    let capacity = buffer.len() - VPD_HEADER_LEN;
    snafu::ensure!(
        length <= capacity,
        MalformedResponseSnafu { length, capacity }
    );

    Ok(UnitSerial(
        buffer[VPD_HEADER_LEN..VPD_HEADER_LEN + length].to_vec(),
    ))
}

/// Read page 0x80 on an open device.
pub fn read_unit_serial<H: DeviceControl + ?Sized>(
    handle: &H,
    timeout: Duration,
) -> Result<UnitSerial> {
    let mut buffer = [0u8; SCSI_INQ_BUFF_LEN];
    scsi_inquiry(handle, true, PAGE_UNIT_SERIAL, &mut buffer, timeout)?;

    let serial = parse_unit_serial(&buffer)?;
    if buffer[1] != PAGE_UNIT_SERIAL {
        log::debug!("page code {:#04x} in a page 0x80 response", buffer[1]);
    }

    Ok(serial)
}

/// Open `path` non-blocking and read its unit serial number.
///
/// A failed open stops the probe. The device is closed before returning.
pub fn serial_probe<O: DeviceOpener>(
    opener: &O,
    path: &Path,
    timeout: Duration,
) -> Result<UnitSerial> {
    let handle = opener.open(path, OpenMode::ReadOnlyNonBlock)?;
    let serial = read_unit_serial(&handle, timeout);
    drop(handle);

    if let Ok(s) = &serial {
        log::debug!("{}: unit serial '{}'", path.display(), s);
    }
    serial
}
