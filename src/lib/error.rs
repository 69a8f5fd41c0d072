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

//! error definitions of devprobe
//!
use nix::errno::Errno;
use snafu::prelude::*;
use std::{path::PathBuf, time::Duration};

/// result of devprobe operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// devprobe error
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    /// The device node can not be opened
    #[snafu(display("Cannot open {}: {}", path.display(), source))]
    Open {
        /// device node
        path: PathBuf,
        /// errno of open(2)
        source: Errno,
    },

    /// A control request other than SG_IO failed
    #[snafu(display("{} failed: {}", request, source))]
    ControlRequest {
        /// name of the request
        request: &'static str,
        /// errno of ioctl(2)
        source: Errno,
    },

    /// The SG_IO call itself failed
    #[snafu(display("SG_IO failed: {}", source))]
    TransportFailure {
        /// errno of ioctl(2)
        source: Errno,
    },

    /// SG_IO went through but the device did not report ok
    #[snafu(display(
        "device rejected the command: info {:#x} status {:#x} host {:#x} driver {:#x}",
        info,
        status,
        host_status,
        driver_status
    ))]
    DeviceRejected {
        /// info flags of the transport
        info: u32,
        /// SCSI status
        status: u8,
        /// host adapter or transport status
        host_status: u16,
        /// driver status
        driver_status: u16,
    },

    /// Page 0x80 came back with an empty serial field
    #[snafu(display("drive reports an empty serial number"))]
    NoSerialReported,

    /// A device reported length runs past the response buffer
    #[snafu(display("reported length {} exceeds {} available bytes", length, capacity))]
    MalformedResponse {
        /// length byte as reported
        length: usize,
        /// bytes available after the header
        capacity: usize,
    },

    /// The control request did not return before the deadline
    #[snafu(display("{} timed out after {}ms", request, timeout.as_millis()))]
    Timeout {
        /// name of the request
        request: &'static str,
        /// deadline that expired
        timeout: Duration,
    },

    /// Writing the report failed
    #[snafu(display("Io: {}", source))]
    Io {
        /// underlying error
        source: std::io::Error,
    },
}

impl Error {
    /// Translate the error to error number.
    pub fn get_errno(&self) -> i32 {
        match self {
            Error::Open { source, .. } => *source as i32,
            Error::ControlRequest { source, .. } => *source as i32,
            Error::TransportFailure { source } => *source as i32,
            Error::DeviceRejected { .. } => Errno::EIO as i32,
            Error::NoSerialReported => Errno::ENODATA as i32,
            Error::MalformedResponse { .. } => Errno::EBADMSG as i32,
            Error::Timeout { .. } => Errno::ETIMEDOUT as i32,
            Error::Io { source } => source.raw_os_error().unwrap_or(Errno::EIO as i32),
        }
    }
}
