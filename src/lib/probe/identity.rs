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

//! byte dump of the HDIO_GET_IDENTITY block
//!
//! The serial number sits at bytes 20..40 and the model at 54..94, both
//! byte-swapped ATA strings. Nothing here decodes them.

use crate::device::{
    errno_is_not_supported, DeviceControl, DeviceOpener, IdentityBuffer, OpenMode, IDENTITY_SIZE,
};
use crate::error::*;
use snafu::ResultExt;
use std::{
    io::Write,
    path::Path,
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Duration,
};

const REQUEST: &str = "HDIO_GET_IDENTITY";

/// Write one `<index> <byte> (<hex>)` line per non-zero byte.
///
/// The byte itself is written raw. Returns the number of lines.
pub fn render_identity(identity: &IdentityBuffer, out: &mut dyn Write) -> std::io::Result<usize> {
    let mut lines = 0;
    for (i, b) in identity.iter().enumerate().filter(|(_, b)| **b != 0) {
        write!(out, "{} ", i)?;
        out.write_all(&[*b])?;
        writeln!(out, " ({:x})", *b & 0xff)?;
        lines += 1;
    }
    Ok(lines)
}

/// Issue the request, the handle is released before returning.
fn read_identity<H: DeviceControl>(handle: H) -> Result<IdentityBuffer> {
    let mut identity = [0u8; IDENTITY_SIZE];
    handle.get_identity(&mut identity)?;
    Ok(identity)
}

/// Issue the request on a worker thread and give up after `timeout`.
///
/// The worker owns the handle, so a hung device is closed as soon as the
/// ioctl returns, even after the caller stopped waiting.
fn read_identity_with_deadline<H>(handle: H, timeout: Duration) -> Result<IdentityBuffer>
where
    H: DeviceControl + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("identity".to_string())
        .spawn(move || {
            let _ = tx.send(read_identity(handle));
        })
        .context(IoSnafu)?;

    match rx.recv_timeout(timeout) {
        Ok(r) => r,
        Err(RecvTimeoutError::Timeout) => TimeoutSnafu {
            request: REQUEST,
            timeout,
        }
        .fail(),
        Err(RecvTimeoutError::Disconnected) => Err(Error::ControlRequest {
            request: REQUEST,
            source: nix::errno::Errno::EIO,
        }),
    }
}

/// Open `path` read-only, fetch the identity block and dump it to `out`.
///
/// `timeout` of `None` waits for the request forever. Returns the number
/// of lines written.
pub fn identity_probe<O>(
    opener: &O,
    path: &Path,
    timeout: Option<Duration>,
    out: &mut dyn Write,
) -> Result<usize>
where
    O: DeviceOpener,
    O::Handle: Send + 'static,
{
    let handle = opener.open(path, OpenMode::ReadOnly)?;

    let identity = match timeout {
        None => read_identity(handle),
        Some(t) => read_identity_with_deadline(handle, t),
    }
    .map_err(|e| {
        if let Error::ControlRequest { source, .. } = &e {
            if errno_is_not_supported(*source) {
                log::debug!(
                    "{}: {} is not supported here, USB bridges often do not translate it",
                    path.display(),
                    REQUEST
                );
            }
        }
        e
    })?;

    render_identity(&identity, out).context(IoSnafu)
}
