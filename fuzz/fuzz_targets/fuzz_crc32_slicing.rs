#![no_main]

use libfuzzer_sys::fuzz_target;
use kestrel_crypto::crc32::{CASTAGNOLI, Crc32, IEEE, KOOPMAN};

/// Reference reflected CRC32, one bit at a time.
fn bitwise(polynomial: u32, data: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 == 1 { (crc >> 1) ^ polynomial } else { crc >> 1 };
        }
    }
    !crc
}

fuzz_target!(|data: &[u8]| {
    for crc in [&IEEE, &CASTAGNOLI, &KOOPMAN] {
        let whole = crc.update(data);
        assert_eq!(whole, bitwise(crc.polynomial(), data));

        // Resuming at any split point gives the same answer.
        let split = data.first().map_or(0, |&b| usize::from(b)).min(data.len());
        let (head, tail) = data.split_at(split);
        assert_eq!(crc.resume(crc.update(head), tail), whole);
    }

    // A custom polynomial built from the input behaves like the bitwise model.
    if data.len() >= 4 {
        let polynomial = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let custom = Crc32::new(polynomial);
        assert_eq!(custom.update(&data[4..]), bitwise(polynomial, &data[4..]));
    }
});
