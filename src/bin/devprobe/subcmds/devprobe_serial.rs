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

//! subcommand for devprobe serial

use super::report_error;
use devprobe::config::DevprobeConfig;
use devprobe::device::NodeOpener;
use devprobe::error::{Error, Result};
use devprobe::probe::{serial_probe, UnitSerial};
use std::{
    io::{self, Write},
    path::Path,
};

fn print_outcome(result: Result<UnitSerial>, device: &str, out: &mut dyn Write) -> io::Result<i32> {
    match result {
        Ok(serial) => {
            out.write_all(b"Serial Number: ")?;
            out.write_all(serial.as_bytes())?;
            out.write_all(b"\n")?;
            Ok(0)
        }
        Err(Error::TransportFailure { source }) => {
            writeln!(out, "FAIL, rc=-1, errno={}", source as i32)?;
            Ok(1)
        }
        Err(Error::DeviceRejected { .. }) => {
            writeln!(out, "FAIL, rc=1, drive doesn't report serial number")?;
            Ok(0)
        }
        Err(Error::NoSerialReported) => {
            writeln!(out, "Failed to retrieve serial for {}", device)?;
            Ok(1)
        }
        Err(Error::MalformedResponse { length, capacity }) => {
            writeln!(
                out,
                "Malformed serial page from {}: length {} exceeds {}",
                device, length, capacity
            )?;
            Ok(1)
        }
        Err(e) => {
            report_error(device, &e);
            Ok(1)
        }
    }
}

/// Print the outcome of a serial probe and map it to the exit code.
///
/// A device that rejects the page is not a failure of the tool.
pub(crate) fn report_serial(result: Result<UnitSerial>, device: &str, out: &mut dyn Write) -> i32 {
    let ret = print_outcome(result, device, out).and_then(|ret| out.flush().map(|_| ret));
    match ret {
        Ok(ret) => ret,
        Err(e) => {
            log::error!("Failed to print the serial of {}: {}", device, e);
            1
        }
    }
}

/// Print the unit serial of `device`, returning the exit code.
pub fn subcommand_serial(config: &DevprobeConfig, device: &str) -> i32 {
    let opener = NodeOpener::new(config.get_sg_version());
    let result = serial_probe(&opener, Path::new(device), config.get_scsi_timeout());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report_serial(result, device, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use devprobe::probe::parse_unit_serial;
    use nix::errno::Errno;

    fn report(result: Result<UnitSerial>) -> (i32, Vec<u8>) {
        let mut out: Vec<u8> = Vec::new();
        let ret = report_serial(result, "/dev/sdz", &mut out);
        (ret, out)
    }

    #[test]
    fn test_report_serial() {
        let serial = parse_unit_serial(&[0, 0x80, 0, 3, b'X', 0xff, b'Y']).unwrap();
        let (ret, out) = report(Ok(serial));
        assert_eq!(ret, 0);
        assert_eq!(out, b"Serial Number: X\xffY\n");
    }

    #[test]
    fn test_report_transport_failure() {
        let (ret, out) = report(Err(Error::TransportFailure {
            source: Errno::EINVAL,
        }));
        assert_eq!(ret, 1);
        assert_eq!(out, b"FAIL, rc=-1, errno=22\n");
    }

    #[test]
    fn test_report_device_rejected() {
        let (ret, out) = report(Err(Error::DeviceRejected {
            info: 1,
            status: 2,
            host_status: 0,
            driver_status: 8,
        }));
        assert_eq!(ret, 0);
        assert_eq!(out, b"FAIL, rc=1, drive doesn't report serial number\n");
    }

    #[test]
    fn test_report_no_serial() {
        let (ret, out) = report(Err(Error::NoSerialReported));
        assert_eq!(ret, 1);
        assert_eq!(out, b"Failed to retrieve serial for /dev/sdz\n");
    }

    #[test]
    fn test_report_malformed() {
        let (ret, out) = report(Err(Error::MalformedResponse {
            length: 252,
            capacity: 251,
        }));
        assert_eq!(ret, 1);
        assert_eq!(
            out,
            b"Malformed serial page from /dev/sdz: length 252 exceeds 251\n"
        );
    }

    #[test]
    fn test_report_open_failure() {
        let (ret, out) = report(Err(Error::Open {
            path: "/dev/sdz".into(),
            source: Errno::ENOENT,
        }));
        assert_eq!(ret, 1);
        assert!(out.is_empty());
    }
}
