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

//!
use log::{Level, Log};
use std::{
    io::Write,
    os::unix::net::UnixDatagram,
    sync::{Mutex, RwLock},
};

fn write_msg_common(writer: &mut impl Write, module: &str, msg: String) {
    let time: libc::time_t = unsafe { libc::time(std::ptr::null_mut()) };
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };
    if unsafe { libc::localtime_r(&time, &mut tm) }.is_null() {
        return;
    }
    let now_str = format!(
        "{:0>4}-{:0>2}-{:0>2} {:0>2}:{:0>2}:{:0>2} ",
        tm.tm_year + 1900, /* tm_year is years since 1900 */
        tm.tm_mon + 1,     /* tm_mon is months since Jan: [0, 11] */
        tm.tm_mday,
        tm.tm_hour,
        tm.tm_min,
        tm.tm_sec
    );

    /* 1. Write time */
    if let Err(e) = writer.write_all(now_str.as_bytes()) {
        println!("Failed to log time message: {}", e);
        return;
    }

    /* 2. Write module */
    if let Err(e) = writer.write_all(format!("{} ", module).as_bytes()) {
        println!("Failed to log module message: {}", e);
        return;
    }

    /* 3. Write message */
    if let Err(e) = writer.write_all(format!("{}\n", msg).as_bytes()) {
        println!("Failed to log message: {}", e);
    }
}

struct SysLogger {
    dgram: Mutex<UnixDatagram>,
}

impl SysLogger {
    fn new() -> Result<Self, std::io::Error> {
        let sock = UnixDatagram::unbound()?;
        sock.connect("/dev/log")?;
        Ok(Self {
            dgram: Mutex::new(sock),
        })
    }
}

/* This is an extremely simple implementation, and only
 * supports the very basic log function. */
impl Log for SysLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let msg = format!(
            "{} {}",
            record.module_path().unwrap_or("unknown"),
            record.args()
        );

        match self.dgram.lock() {
            Ok(dgr) => {
                if let Err(e) = dgr.send(msg.as_bytes()) {
                    eprintln!("Failed to send message to syslogger: {}", e);
                }
            }
            Err(_) => eprintln!("Failed to lock syslogger"),
        }
    }

    fn flush(&self) {}
}

/// Writes to stderr, stdout carries the probe output.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let mut stderr = std::io::stderr();
        write_msg_common(
            &mut stderr,
            record.module_path().unwrap_or("unknown"),
            record.args().to_string(),
        );
    }

    fn flush(&self) {}
}

/// Collect different kinds of loggers together.
///
/// Include: SysLogger, ConsoleLogger. The set is swapped on every
/// `init_log`, the instance itself is installed once.
struct CombinedLogger {
    loggers: RwLock<Vec<Box<dyn Log>>>,
}

static LOGGER: CombinedLogger = CombinedLogger {
    loggers: RwLock::new(Vec::new()),
};

impl Log for CombinedLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(loggers) = self.loggers.read() {
            for logger in loggers.iter() {
                logger.log(record);
            }
        }
    }

    fn flush(&self) {
        if let Ok(loggers) = self.loggers.read() {
            for logger in loggers.iter() {
                logger.flush();
            }
        }
    }
}

/// Initialize the global static logger instance.
/// Available log `targets` include `syslog` and `console`.
///
/// Repeated targets take effect only once. Calling it again replaces
/// the previous targets and level.
///
/// # Arguments
///
/// * `name` - The application name that initializes the logger. Just used for debugging.
/// * `level` - Log message level.
/// * `targets` - A set of log targets.
pub fn init_log(name: &str, level: Level, targets: Vec<&str>) {
    let mut loggers: Vec<Box<dyn Log>> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for target in targets {
        if seen.contains(&target) {
            continue;
        }
        seen.push(target);

        let logger = match target {
            "console" => Box::new(ConsoleLogger) as Box<dyn Log>,
            "syslog" => match SysLogger::new() {
                Ok(logger) => Box::new(logger) as Box<dyn Log>,
                Err(e) => {
                    eprintln!("{} failed to create syslogger: {:?}", name, e);
                    continue;
                }
            },
            _ => {
                eprintln!("{}: log target '{}' is strange, ignoring.", name, target);
                continue;
            }
        };

        loggers.push(logger);
    }

    if loggers.is_empty() {
        eprintln!("{}: no available log targets.", name);
    }

    match LOGGER.loggers.write() {
        Ok(mut current) => *current = loggers,
        Err(_) => {
            eprintln!("{}: failed to lock the global logger.", name);
            return;
        }
    }

    /* Fails once a logger is installed, which is then LOGGER itself. */
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level.to_level_filter());
}

/// Initialize console logger.
pub fn init_log_to_console(name: &str, level: Level) {
    init_log(name, level, vec!["console"]);
}

/// Initialize console and syslog logger.
pub fn init_log_to_console_syslog(name: &str, level: Level) {
    init_log(name, level, vec!["console", "syslog"]);
}
