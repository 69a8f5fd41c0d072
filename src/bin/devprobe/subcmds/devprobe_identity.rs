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

//! subcommand for devprobe identity

use super::report_error;
use devprobe::config::DevprobeConfig;
use devprobe::device::NodeOpener;
use devprobe::error::Result;
use devprobe::probe::identity_probe;
use std::{io::Write, path::Path, time::Duration};

/// `--timeout-ms` wins over the configuration, 0 waits forever.
fn identity_timeout(config: &DevprobeConfig, timeout_ms: Option<u64>) -> Option<Duration> {
    match timeout_ms {
        Some(0) => None,
        Some(ms) => Some(Duration::from_millis(ms)),
        None => config.get_identity_timeout(),
    }
}

/// Map the outcome of an identity dump to the exit code.
pub(crate) fn report_identity(result: Result<usize>, device: &str) -> i32 {
    match result {
        Ok(lines) => {
            log::debug!("{}: {} non-zero identity bytes", device, lines);
            0
        }
        Err(e) => {
            report_error(device, &e);
            1
        }
    }
}

/// Dump the identity block of `device` to stdout, returning the exit code.
pub fn subcommand_identity(config: &DevprobeConfig, device: &str, timeout_ms: Option<u64>) -> i32 {
    let timeout = identity_timeout(config, timeout_ms);
    let opener = NodeOpener::new(config.get_sg_version());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let ret = report_identity(
        identity_probe(&opener, Path::new(device), timeout, &mut out),
        device,
    );

    let _ = out.flush();
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use devprobe::error::Error;
    use nix::errno::Errno;

    #[test]
    fn test_report_identity() {
        assert_eq!(report_identity(Ok(0), "/dev/sdz"), 0);
        assert_eq!(report_identity(Ok(12), "/dev/sdz"), 0);
        assert_eq!(
            report_identity(
                Err(Error::ControlRequest {
                    request: "HDIO_GET_IDENTITY",
                    source: Errno::ENOTTY,
                }),
                "/dev/sdz"
            ),
            1
        );
        assert_eq!(
            report_identity(
                Err(Error::Timeout {
                    request: "HDIO_GET_IDENTITY",
                    timeout: Duration::from_millis(10),
                }),
                "/dev/sdz"
            ),
            1
        );
    }

    #[test]
    fn test_identity_timeout() {
        let config = DevprobeConfig::new();
        assert_eq!(
            identity_timeout(&config, None),
            Some(Duration::from_millis(30000))
        );
        assert_eq!(identity_timeout(&config, Some(0)), None);
        assert_eq!(
            identity_timeout(&config, Some(250)),
            Some(Duration::from_millis(250))
        );
    }
}
