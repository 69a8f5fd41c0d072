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

//! SCSI INQUIRY over SG_IO
//!

use crate::device::{ControlRequest, DeviceControl, TransportStatus, SENSE_BUFF_LEN};
use crate::error::*;
use std::time::Duration;

/// INQUIRY operation code, see SPC-4 section 6.4
pub const INQUIRY_CMD: u8 = 0x12;
/// INQUIRY command length
pub const INQUIRY_CMDLEN: usize = 6;
/// length of the standard INQUIRY data
pub const STD_INQUIRY_LEN: usize = 36;
/// max length for vendor
pub const VENDOR_LENGTH: usize = 8;
/// max length for model
pub const MODEL_LENGTH: usize = 16;
/// max length for revision
pub const REVISION_LENGTH: usize = 4;

/// Build a 6-byte INQUIRY command. The allocation length must fit one byte.
pub fn inquiry_cdb(evpd: bool, page: u8, alloc_len: u8) -> [u8; INQUIRY_CMDLEN] {
    [INQUIRY_CMD, evpd as u8, page, 0, alloc_len, 0]
}

/// Issue one INQUIRY into `buffer`.
///
/// Fails with `TransportFailure` if SG_IO itself fails and with
/// `DeviceRejected` if the device does not report ok. A buffer longer
/// than 255 bytes is refused with `MalformedResponse` before any request.
pub fn scsi_inquiry<H: DeviceControl + ?Sized>(
    handle: &H,
    evpd: bool,
    page: u8,
    buffer: &mut [u8],
    timeout: Duration,
) -> Result<()> {
    let alloc_len = match u8::try_from(buffer.len()) {
        Ok(len) => len,
        Err(_) => {
            return MalformedResponseSnafu {
                length: buffer.len(),
                capacity: u8::MAX as usize,
            }
            .fail()
        }
    };
    let cdb = inquiry_cdb(evpd, page, alloc_len);
    let mut request = ControlRequest::new(&cdb, buffer, timeout);

    handle.sg_io(&mut request)?;

    let status = request.status;
    if !status.is_ok() {
        dump_sense(&request.sense, &status);
        return DeviceRejectedSnafu {
            info: status.info,
            status: status.status,
            host_status: status.host_status,
            driver_status: status.driver_status,
        }
        .fail();
    }

    Ok(())
}

/// sense key, additional sense code and qualifier
#[derive(Debug, PartialEq, Eq)]
pub struct SenseCode {
    /// sense key
    pub key: u8,
    /// additional sense code
    pub asc: u8,
    /// additional sense code qualifier
    pub ascq: u8,
}

/// Decode fixed (0x70, 0x71) or descriptor (0x72, 0x73) format sense data.
pub fn decode_sense(sense: &[u8]) -> Option<SenseCode> {
    let code = *sense.first()? & 0x7f;
    match code {
        0x70 | 0x71 if sense.len() >= 14 => Some(SenseCode {
            key: sense[2] & 0xf,
            asc: sense[12],
            ascq: sense[13],
        }),
        0x72 | 0x73 if sense.len() >= 4 => Some(SenseCode {
            key: sense[1] & 0xf,
            asc: sense[2],
            ascq: sense[3],
        }),
        _ => None,
    }
}

fn dump_sense(sense: &[u8; SENSE_BUFF_LEN], status: &TransportStatus) {
    log::debug!(
        "sg_io failed: info {:#x} status {:#x} host {:#x} driver {:#x}",
        status.info,
        status.status,
        status.host_status,
        status.driver_status
    );

    let len = (status.sense_len as usize).min(SENSE_BUFF_LEN);
    if len == 0 {
        log::debug!("sense buffer empty.");
        return;
    }

    match decode_sense(&sense[..len]) {
        Some(s) => log::debug!(
            "sense key {:x} ASC {:x} ASCQ {:x}.",
            s.key,
            s.asc,
            s.ascq
        ),
        None => log::debug!("invalid sense code {:x}.", sense[0]),
    }
}

/// vendor, model and revision from standard INQUIRY data
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StandardInquiry {
    /// peripheral device type
    pub device_type: u8,
    /// T10 vendor identification
    pub vendor: String,
    /// product identification
    pub model: String,
    /// product revision level
    pub revision: String,
}

impl StandardInquiry {
    /// Parse the first 36 bytes of a standard INQUIRY response.
    pub fn parse(buffer: &[u8]) -> Result<StandardInquiry> {
        snafu::ensure!(
            buffer.len() >= STD_INQUIRY_LEN,
            MalformedResponseSnafu {
                length: STD_INQUIRY_LEN,
                capacity: buffer.len(),
            }
        );

        let field = |from: usize, len: usize| {
            String::from_utf8_lossy(&buffer[from..from + len])
                .trim_matches(|c| c == ' ' || c == '\0')
                .to_string()
        };

        Ok(StandardInquiry {
            device_type: buffer[0] & 0x1f,
            vendor: field(8, VENDOR_LENGTH),
            model: field(8 + VENDOR_LENGTH, MODEL_LENGTH),
            revision: field(8 + VENDOR_LENGTH + MODEL_LENGTH, REVISION_LENGTH),
        })
    }
}

/// Issue a standard INQUIRY and parse vendor, model and revision.
pub fn std_inquiry<H: DeviceControl + ?Sized>(
    handle: &H,
    timeout: Duration,
) -> Result<StandardInquiry> {
    let mut buffer = [0u8; STD_INQUIRY_LEN];
    scsi_inquiry(handle, false, 0, &mut buffer, timeout)?;
    StandardInquiry::parse(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::IdentityBuffer;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingHandle {
        requests: Cell<usize>,
    }

    impl DeviceControl for CountingHandle {
        fn get_identity(&self, _buf: &mut IdentityBuffer) -> Result<()> {
            unreachable!()
        }

        fn sg_io(&self, request: &mut ControlRequest) -> Result<()> {
            self.requests.set(self.requests.get() + 1);
            assert_eq!(request.cdb[4] as usize, request.data.len());
            Ok(())
        }

        fn size_bytes(&self) -> Result<u64> {
            unreachable!()
        }
    }

    #[test]
    fn test_inquiry_allocation_length() {
        let handle = CountingHandle::default();
        let timeout = Duration::from_secs(1);

        let mut buffer = [0u8; 255];
        scsi_inquiry(&handle, true, 0x80, &mut buffer, timeout).unwrap();
        assert_eq!(handle.requests.get(), 1);

        let mut buffer = [0u8; 256];
        assert!(matches!(
            scsi_inquiry(&handle, true, 0x80, &mut buffer, timeout),
            Err(Error::MalformedResponse {
                length: 256,
                capacity: 255
            })
        ));
        assert_eq!(handle.requests.get(), 1);
    }

    #[test]
    fn test_inquiry_cdb() {
        assert_eq!(inquiry_cdb(true, 0x80, 255), [0x12, 1, 0x80, 0, 255, 0]);
        assert_eq!(inquiry_cdb(false, 0, 36), [0x12, 0, 0, 0, 36, 0]);
    }

    #[test]
    fn test_decode_sense() {
        let mut fixed = [0u8; 18];
        fixed[0] = 0xf0;
        fixed[2] = 0x05;
        fixed[12] = 0x24;
        fixed[13] = 0x00;
        assert_eq!(
            decode_sense(&fixed),
            Some(SenseCode {
                key: 0x5,
                asc: 0x24,
                ascq: 0
            })
        );

        let descriptor = [0x72u8, 0x06, 0x29, 0x01];
        assert_eq!(
            decode_sense(&descriptor),
            Some(SenseCode {
                key: 0x6,
                asc: 0x29,
                ascq: 1
            })
        );

        assert_eq!(decode_sense(&fixed[..8]), None);
        assert_eq!(decode_sense(&[]), None);
        assert_eq!(decode_sense(&[0x10, 0, 0, 0]), None);
    }

    #[test]
    fn test_parse_standard_inquiry() {
        let mut buffer = [0u8; STD_INQUIRY_LEN];
        buffer[8..16].copy_from_slice(b"ATA     ");
        buffer[16..32].copy_from_slice(b"WDC WD10EZEX-00B");
        buffer[32..36].copy_from_slice(b"1A01");

        let inq = StandardInquiry::parse(&buffer).unwrap();
        assert_eq!(inq.device_type, 0);
        assert_eq!(inq.vendor, "ATA");
        assert_eq!(inq.model, "WDC WD10EZEX-00B");
        assert_eq!(inq.revision, "1A01");

        assert!(matches!(
            StandardInquiry::parse(&buffer[..20]),
            Err(Error::MalformedResponse { .. })
        ));
    }
}
