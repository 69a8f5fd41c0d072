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

//! A scripted device for driving the probes without hardware.
#![allow(dead_code)]

use devprobe::device::{ControlRequest, DeviceControl, DeviceOpener, IdentityBuffer, OpenMode};
use devprobe::error::{Error, Result};
use nix::errno::Errno;
use std::{
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

/// How often the device was opened, asked and closed.
#[derive(Debug, Default)]
pub struct Counters {
    pub opens: AtomicUsize,
    pub requests: AtomicUsize,
    pub closes: AtomicUsize,
}

impl Counters {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// What the fake device answers.
#[derive(Debug, Clone, Default)]
pub struct FakeDevice {
    /// open fails with ENOENT
    pub missing: bool,
    /// identity block, `None` fails the request with ENOTTY
    pub identity: Option<Vec<u8>>,
    /// how long the identity request blocks
    pub identity_delay: Option<Duration>,
    /// SG_IO itself fails with this errno
    pub sg_errno: Option<Errno>,
    /// info flags reported for every SG_IO
    pub sg_info: u32,
    /// data returned for the standard inquiry
    pub std_response: Vec<u8>,
    /// data returned for a VPD inquiry
    pub vpd_response: Vec<u8>,
    /// BLKGETSIZE64 result, `None` fails with ENOTTY
    pub size: Option<u64>,
}

pub struct FakeOpener {
    device: FakeDevice,
    pub counters: Arc<Counters>,
}

impl FakeOpener {
    pub fn new(device: FakeDevice) -> Self {
        FakeOpener {
            device,
            counters: Arc::new(Counters::default()),
        }
    }
}

impl DeviceOpener for FakeOpener {
    type Handle = FakeHandle;

    fn open(&self, path: &Path, _mode: OpenMode) -> Result<FakeHandle> {
        if self.device.missing {
            return Err(Error::Open {
                path: path.to_path_buf(),
                source: Errno::ENOENT,
            });
        }

        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        Ok(FakeHandle {
            device: self.device.clone(),
            counters: self.counters.clone(),
        })
    }
}

pub struct FakeHandle {
    device: FakeDevice,
    counters: Arc<Counters>,
}

impl DeviceControl for FakeHandle {
    fn get_identity(&self, buf: &mut IdentityBuffer) -> Result<()> {
        self.counters.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.device.identity_delay {
            thread::sleep(delay);
        }

        match &self.device.identity {
            Some(identity) => {
                let len = identity.len().min(buf.len());
                buf[..len].copy_from_slice(&identity[..len]);
                Ok(())
            }
            None => Err(Error::ControlRequest {
                request: "HDIO_GET_IDENTITY",
                source: Errno::ENOTTY,
            }),
        }
    }

    fn sg_io(&self, request: &mut ControlRequest) -> Result<()> {
        self.counters.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(errno) = self.device.sg_errno {
            return Err(Error::TransportFailure { source: errno });
        }

        let response = if request.cdb[1] & 1 != 0 {
            &self.device.vpd_response
        } else {
            &self.device.std_response
        };
        let len = response.len().min(request.data.len());
        request.data[..len].copy_from_slice(&response[..len]);
        request.status.info = self.device.sg_info;
        Ok(())
    }

    fn size_bytes(&self) -> Result<u64> {
        self.counters.requests.fetch_add(1, Ordering::SeqCst);
        self.device.size.ok_or(Error::ControlRequest {
            request: "BLKGETSIZE64",
            source: Errno::ENOTTY,
        })
    }
}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// A page 0x80 response declaring `length` bytes of `serial`.
pub fn page80(length: u8, serial: &[u8]) -> Vec<u8> {
    let mut page = vec![0u8; 4];
    page[1] = 0x80;
    page[3] = length;
    page.extend_from_slice(serial);
    page
}

/// A standard inquiry response for a direct access device.
pub fn std_inquiry(vendor: &str, model: &str, revision: &str) -> Vec<u8> {
    let mut page = vec![b' '; 36];
    page[..8].fill(0);
    page[8..8 + vendor.len()].copy_from_slice(vendor.as_bytes());
    page[16..16 + model.len()].copy_from_slice(model.as_bytes());
    page[32..32 + revision.len()].copy_from_slice(revision.as_bytes());
    page
}
