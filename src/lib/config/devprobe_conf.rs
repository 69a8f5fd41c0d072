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

//! parse the configuration of devprobe
//!

use crate::device::SgVersion;
use confique::Config;
use log::Level;
use std::str::FromStr;
use std::time::Duration;

/// default configuration path
pub const DEFAULT_CONFIG: &str = "/etc/devprobe/config.toml";

/// device probed when none is given
pub const DEFAULT_DEVICE: &str = "/dev/sda";

/// configuration of devprobe
#[derive(Debug, Default)]
pub struct DevprobeConfig {
    inner: DevprobeConfigData,
}

#[derive(Debug, Config, Default)]
pub(crate) struct DevprobeConfigData {
    pub(crate) device: Option<String>,
    pub(crate) identity_timeout_ms: Option<u64>,
    pub(crate) scsi_timeout_ms: Option<u64>,
    pub(crate) sg_version: Option<u32>,
    pub(crate) log_level: Option<String>,
    pub(crate) log_targets: Option<Vec<String>>,
}

impl DevprobeConfig {
    /// generate a configuration object
    pub fn new() -> DevprobeConfig {
        DevprobeConfig::default()
    }

    /// load the configurations object, keeping the defaults on failure
    pub fn load(&mut self, path: &str) {
        match DevprobeConfigData::builder().file(path).load() {
            Ok(data) => self.inner = data,
            Err(e) => log::error!("Failed to load '{}': {}", path, e),
        }
    }

    /// get the device probed when none is given
    pub fn get_device(&self) -> String {
        self.inner
            .device
            .clone()
            .unwrap_or_else(|| DEFAULT_DEVICE.to_string())
    }

    /// Get the deadline of the identity request. `None` means no deadline.
    pub fn get_identity_timeout(&self) -> Option<Duration> {
        match self.inner.identity_timeout_ms.unwrap_or(30000) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// get the SG_IO command timeout
    pub fn get_scsi_timeout(&self) -> Duration {
        Duration::from_millis(self.inner.scsi_timeout_ms.unwrap_or(5000))
    }

    /// get the SG_IO header version
    pub fn get_sg_version(&self) -> SgVersion {
        match self.inner.sg_version {
            None | Some(3) => SgVersion::V3,
            Some(4) => SgVersion::V4,
            Some(v) => {
                log::error!("Invalid sg_version {}, using 3.", v);
                SgVersion::V3
            }
        }
    }

    /// get the log level
    pub fn get_log_level(&self) -> Level {
        match self.inner.log_level.as_deref() {
            Some(level) => Level::from_str(level).unwrap_or_else(|_| {
                log::error!("Invalid log_level '{}', using info.", level);
                Level::Info
            }),
            None => Level::Info,
        }
    }

    /// Get log targets. If not set, use "console" by default.
    pub fn get_log_targets(&self) -> Vec<String> {
        self.inner
            .log_targets
            .clone()
            .unwrap_or_else(|| vec!["console".to_string()])
    }
}
