// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

const POLY: u16 = 0x1021;

/// CRC16-CCITT, polynomial 0x1021, initial value 0 (the XMODEM variant).
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |crc, &byte| {
        let mut crc = crc ^ ((byte as u16) << 8);
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
        }
        crc
    })
}

/// Sum of all bytes modulo 256.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_known_vectors() {
        struct TestCase {
            name: &'static str,
            input: &'static [u8],
            expected: u16,
        }

        let test_cases = vec![
            TestCase {
                name: "empty input",
                input: b"",
                expected: 0x0000,
            },
            TestCase {
                name: "published check value",
                input: b"123456789",
                expected: 0x31C3,
            },
            TestCase {
                name: "single byte",
                input: b"A",
                expected: 0x58E5,
            },
        ];

        for test_case in test_cases {
            assert_eq!(
                crc16_ccitt(test_case.input),
                test_case.expected,
                "Test case '{}' failed",
                test_case.name
            );
        }
    }

    #[test]
    fn test_checksum_wraps() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0xFF, 0x02]), 0x01);
        assert_eq!(checksum(&[0x1A; 128]), (0x1A * 128 % 256) as u8);
    }
}
