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

//! probes
//!
//! Each probe opens the device itself, issues its requests and drops the
//! handle before returning.

pub mod identity;
pub mod info;
pub mod scsi;
pub mod serial;

pub use identity::{identity_probe, render_identity};
pub use info::{info_probe, DiskInfo};
pub use serial::{parse_unit_serial, serial_probe, UnitSerial};
