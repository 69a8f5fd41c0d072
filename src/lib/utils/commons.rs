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

//! common utilities

use lazy_static::lazy_static;
use regex::Regex;

pub(crate) fn valid_devnode_chars(c: char, white_list: &str) -> bool {
    c.is_ascii_alphanumeric() || "#+-.:=@_".contains(c) || white_list.contains(c)
}

/// replace invalid chars with '_', except for white list
pub fn replace_chars(s: &str, white_list: &str) -> String {
    let mut ret = String::with_capacity(s.len());

    for c in s.chars() {
        if valid_devnode_chars(c, white_list) {
            ret.push(c);
            continue;
        }

        // if whitespace is in white list, replace whitespace with ordinary space
        if c.is_whitespace() && white_list.contains(' ') {
            ret.push(' ');
            continue;
        }

        ret.push('_');
    }

    ret
}

/// Trim trailing spaces and NULs, then collapse every whitespace run into
/// a single underscore.
pub fn replace_whitespace(s: &str) -> String {
    lazy_static! {
        static ref WHITESPACE_RE: Regex = Regex::new(r"[\t\n\x0B\x0C\r ]+").unwrap();
    }

    let s = s.trim_end_matches(|c| c == ' ' || c == '\0');
    WHITESPACE_RE.replace_all(s, "_").to_string()
}

/// Render raw device bytes as an identifier safe for `KEY=value` output.
pub fn sanitize_identifier(raw: &[u8]) -> String {
    let s = String::from_utf8_lossy(raw);
    replace_chars(&replace_whitespace(s.trim_start()), "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_chars() {
        assert_eq!(replace_chars("abcd!efg", "/ $%?,"), "abcd_efg");
        assert_eq!(replace_chars("abcd\\xefg", "/ $%?,"), "abcd_xefg");
        assert_eq!(replace_chars("abcd\tefg", "/ $%?,"), "abcd efg");
        assert_eq!(replace_chars("abcd\tefg", ""), "abcd_efg");
    }

    #[test]
    fn test_replace_whitespace() {
        assert_eq!(replace_whitespace("WDC  WD10EZEX   "), "WDC_WD10EZEX");
        assert_eq!(replace_whitespace("ATA\0\0"), "ATA");
        assert_eq!(replace_whitespace("a\t b"), "a_b");
        assert_eq!(replace_whitespace("a\r\n\x0b\x0cb"), "a_b");
    }

    #[test]
    fn test_sanitize_inquiry_fields() {
        assert_eq!(sanitize_identifier(b"Samsung SSD"), "Samsung_SSD");
        assert_eq!(sanitize_identifier(b"ST1000DM\\x003"), "ST1000DM_x003");
        assert_eq!(sanitize_identifier(b"    "), "");
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier(b"  WD-WCC6Y0AA1234  "), "WD-WCC6Y0AA1234");
        assert_eq!(sanitize_identifier(b"Samsung SSD 860/1"), "Samsung_SSD_860_1");
        assert_eq!(sanitize_identifier(&[0x41, 0xff, 0x42]), "A_B");
    }
}
