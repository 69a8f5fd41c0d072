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

//! device nodes and the control requests issued on them
//!
//! Probes only talk to [`DeviceOpener`] and [`DeviceControl`], the real
//! implementation is [`NodeOpener`] handing out [`DeviceHandle`]s.

use crate::error::*;
use nix::{
    errno::Errno,
    fcntl::{open, OFlag},
    ioctl_read, ioctl_read_bad, ioctl_readwrite_bad,
    sys::stat::Mode,
};
use scsi_generic_rs::{
    sg_io_hdr, sg_io_v4, BSG_PROTOCOL_SCSI, BSG_SUB_PROTOCOL_SCSI_CMD, HDIO_GET_IDENTITY,
    SG_DXFER_FROM_DEV, SG_INFO_OK, SG_INFO_OK_MASK, SG_IO,
};
use snafu::ResultExt;
use std::{
    os::{raw::c_void, unix::io::RawFd},
    path::Path,
    time::Duration,
};

/// size of the ATA identity block
pub const IDENTITY_SIZE: usize = 512;
/// length of the sense buffer handed to SG_IO
pub const SENSE_BUFF_LEN: usize = 32;

/// the identity block filled by HDIO_GET_IDENTITY
pub type IdentityBuffer = [u8; IDENTITY_SIZE];

ioctl_readwrite_bad!(
    /// ioctl sg_io_hdr with SG_IO
    ioctl_sg_io_hdr,
    SG_IO,
    sg_io_hdr
);
ioctl_readwrite_bad!(
    /// ioctl sg_io_v4 with SG_IO
    ioctl_sg_io_v4,
    SG_IO,
    sg_io_v4
);
ioctl_read_bad!(
    /// ioctl the identity block with HDIO_GET_IDENTITY
    ioctl_hdio_get_identity,
    HDIO_GET_IDENTITY,
    IdentityBuffer
);
ioctl_read!(
    /// ioctl the size in bytes with BLKGETSIZE64
    ioctl_blkgetsize64,
    0x12,
    114,
    u64
);

/// Open flags of a device node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// read-only, blocking
    ReadOnly,
    /// read-only, O_NONBLOCK, needed for SCSI nodes without media
    ReadOnlyNonBlock,
}

impl OpenMode {
    fn oflag(self) -> OFlag {
        let base = OFlag::O_RDONLY | OFlag::O_CLOEXEC | OFlag::O_NOCTTY;
        match self {
            OpenMode::ReadOnly => base,
            OpenMode::ReadOnlyNonBlock => base | OFlag::O_NONBLOCK,
        }
    }
}

/// SG_IO header version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SgVersion {
    /// `struct sg_io_hdr`, understood by sd and sg nodes
    V3,
    /// `struct sg_io_v4`, understood by bsg nodes
    V4,
}

/// Status reported back by SG_IO, independent of the header version.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransportStatus {
    /// info flags, see SG_INFO_OK_MASK
    pub info: u32,
    /// SCSI status byte
    pub status: u8,
    /// host adapter status (v3) or transport status (v4)
    pub host_status: u16,
    /// driver status
    pub driver_status: u16,
    /// number of sense bytes written
    pub sense_len: u8,
}

impl TransportStatus {
    /// Whether the command completed without sense or transport errors.
    pub fn is_ok(&self) -> bool {
        (self.info & SG_INFO_OK_MASK) == SG_INFO_OK
    }
}

/// One blocking SG_IO request, data flows from the device to the host.
#[derive(Debug)]
pub struct ControlRequest<'a> {
    /// command descriptor block
    pub cdb: &'a [u8],
    /// data transfer target
    pub data: &'a mut [u8],
    /// sense data returned alongside the response
    pub sense: [u8; SENSE_BUFF_LEN],
    /// command timeout
    pub timeout: Duration,
    /// filled in by the transport
    pub status: TransportStatus,
}

impl<'a> ControlRequest<'a> {
    /// Build a request reading into `data`.
    pub fn new(cdb: &'a [u8], data: &'a mut [u8], timeout: Duration) -> Self {
        ControlRequest {
            cdb,
            data,
            sense: [0; SENSE_BUFF_LEN],
            timeout,
            status: TransportStatus::default(),
        }
    }

    fn timeout_ms(&self) -> u32 {
        u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX)
    }
}

/// Control requests a probe can issue on an open device.
///
/// Implementors release the device when dropped.
pub trait DeviceControl {
    /// HDIO_GET_IDENTITY into `buf`.
    fn get_identity(&self, buf: &mut IdentityBuffer) -> Result<()>;

    /// SG_IO, `Err` only if the call itself fails. The device verdict is
    /// left in `request.status`.
    fn sg_io(&self, request: &mut ControlRequest) -> Result<()>;

    /// Size of the device in bytes.
    fn size_bytes(&self) -> Result<u64>;
}

/// Hands out open devices.
pub trait DeviceOpener {
    /// the handle type, owned by the caller
    type Handle: DeviceControl;

    /// Open `path` with `mode`.
    fn open(&self, path: &Path, mode: OpenMode) -> Result<Self::Handle>;
}

/// Opens real device nodes.
#[derive(Debug, Clone, Copy)]
pub struct NodeOpener {
    sg_version: SgVersion,
}

impl NodeOpener {
    /// create an opener issuing SG_IO with the given header version
    pub fn new(sg_version: SgVersion) -> Self {
        NodeOpener { sg_version }
    }
}

impl Default for NodeOpener {
    fn default() -> Self {
        NodeOpener::new(SgVersion::V3)
    }
}

impl DeviceOpener for NodeOpener {
    type Handle = DeviceHandle;

    fn open(&self, path: &Path, mode: OpenMode) -> Result<DeviceHandle> {
        let fd = open(path, mode.oflag(), Mode::empty()).context(OpenSnafu { path })?;
        log::debug!("opened {} as fd {}", path.display(), fd);

        Ok(DeviceHandle {
            fd,
            sg_version: self.sg_version,
        })
    }
}

/// An open device node, closed on drop.
#[derive(Debug)]
pub struct DeviceHandle {
    fd: RawFd,
    sg_version: SgVersion,
}

impl DeviceHandle {
    fn sg_io_v3(&self, request: &mut ControlRequest) -> Result<()> {
        let mut io_hdr = sg_io_hdr {
            interface_id: 'S' as i32,
            dxfer_direction: SG_DXFER_FROM_DEV,
            cmd_len: request.cdb.len() as u8,
            mx_sb_len: SENSE_BUFF_LEN as u8,
            dxfer_len: request.data.len() as u32,
            dxferp: request.data.as_mut_ptr() as *mut c_void,
            /* The kernel only reads the command. */
            cmdp: request.cdb.as_ptr() as *mut u8,
            sbp: request.sense.as_mut_ptr(),
            timeout: request.timeout_ms(),
            ..Default::default()
        };

        unsafe { ioctl_sg_io_hdr(self.fd, &mut io_hdr) }.context(TransportFailureSnafu)?;

        request.status = TransportStatus {
            info: io_hdr.info,
            status: io_hdr.status,
            host_status: io_hdr.host_status,
            driver_status: io_hdr.driver_status,
            sense_len: io_hdr.sb_len_wr,
        };
        Ok(())
    }

    fn sg_io_v4(&self, request: &mut ControlRequest) -> Result<()> {
        let mut io_v4 = sg_io_v4 {
            guard: 'Q' as i32,
            protocol: BSG_PROTOCOL_SCSI,
            subprotocol: BSG_SUB_PROTOCOL_SCSI_CMD,
            request_len: request.cdb.len() as u32,
            request: request.cdb.as_ptr() as u64,
            max_response_len: SENSE_BUFF_LEN as u32,
            response: request.sense.as_mut_ptr() as u64,
            din_xfer_len: request.data.len() as u32,
            din_xferp: request.data.as_mut_ptr() as u64,
            timeout: request.timeout_ms(),
            ..Default::default()
        };

        unsafe { ioctl_sg_io_v4(self.fd, &mut io_v4) }.context(TransportFailureSnafu)?;

        request.status = TransportStatus {
            info: io_v4.info,
            status: io_v4.device_status as u8,
            host_status: io_v4.transport_status as u16,
            driver_status: io_v4.driver_status as u16,
            sense_len: io_v4.response_len.min(SENSE_BUFF_LEN as u32) as u8,
        };
        Ok(())
    }
}

impl DeviceControl for DeviceHandle {
    fn get_identity(&self, buf: &mut IdentityBuffer) -> Result<()> {
        unsafe { ioctl_hdio_get_identity(self.fd, buf) }.context(ControlRequestSnafu {
            request: "HDIO_GET_IDENTITY",
        })?;
        Ok(())
    }

    fn sg_io(&self, request: &mut ControlRequest) -> Result<()> {
        match self.sg_version {
            SgVersion::V3 => self.sg_io_v3(request),
            SgVersion::V4 => self.sg_io_v4(request),
        }
    }

    fn size_bytes(&self) -> Result<u64> {
        let mut size: u64 = 0;
        unsafe { ioctl_blkgetsize64(self.fd, &mut size) }.context(ControlRequestSnafu {
            request: "BLKGETSIZE64",
        })?;
        Ok(size)
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        if let Err(e) = nix::unistd::close(self.fd) {
            log::debug!("failed to close fd {}: {}", self.fd, e);
        }
    }
}

/// Whether the errno means the node does not understand the request.
pub fn errno_is_not_supported(source: Errno) -> bool {
    matches!(
        source,
        Errno::EOPNOTSUPP | Errno::ENOTTY | Errno::ENOSYS | Errno::EINVAL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_node() {
        let e = NodeOpener::default()
            .open(Path::new("/dev/devprobe-no-such-node"), OpenMode::ReadOnly)
            .unwrap_err();
        assert!(matches!(
            e,
            Error::Open {
                source: Errno::ENOENT,
                ..
            }
        ));
    }

    #[test]
    fn test_control_requests_on_regular_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let handle = NodeOpener::default()
            .open(file.path(), OpenMode::ReadOnlyNonBlock)
            .unwrap();

        let mut identity = [0u8; IDENTITY_SIZE];
        assert!(matches!(
            handle.get_identity(&mut identity),
            Err(Error::ControlRequest {
                request: "HDIO_GET_IDENTITY",
                ..
            })
        ));

        let cdb = [0x12u8, 0, 0, 0, 36, 0];
        let mut data = [0u8; 36];
        let mut request = ControlRequest::new(&cdb, &mut data, Duration::from_millis(100));
        assert!(matches!(
            handle.sg_io(&mut request),
            Err(Error::TransportFailure { .. })
        ));
    }

    #[test]
    fn test_transport_status() {
        let mut status = TransportStatus::default();
        assert!(status.is_ok());
        status.info = 0x1;
        assert!(!status.is_ok());
        status.info = 0x4;
        assert!(status.is_ok());
    }

    #[test]
    fn test_open_mode() {
        assert!(!OpenMode::ReadOnly.oflag().contains(OFlag::O_NONBLOCK));
        assert!(OpenMode::ReadOnlyNonBlock
            .oflag()
            .contains(OFlag::O_NONBLOCK | OFlag::O_CLOEXEC));
    }

    #[test]
    fn test_request_timeout_saturates() {
        let mut data = [0u8; 1];
        let request = ControlRequest::new(&[0u8; 6], &mut data, Duration::from_secs(u64::MAX));
        assert_eq!(request.timeout_ms(), u32::MAX);
    }
}
