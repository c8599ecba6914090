#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use kestrel_crypto::{Aes, BlockCipher, Ctr, StreamCipher};

#[derive(Debug, Arbitrary)]
struct Input {
    key: Vec<u8>,
    iv: [u8; 16],
    split: u16,
    plaintext: Vec<u8>,
}

fuzz_target!(|input: Input| {
    // Any length other than 16/24/32 must be rejected, never panic.
    let Ok(aes) = Aes::new(&input.key) else {
        assert!(![16, 24, 32].contains(&input.key.len()));
        return;
    };

    // Short IVs are rejected.
    assert!(Ctr::new(aes.clone(), &input.iv[..15]).is_err());

    let Ok(mut encrypt) = Ctr::new(aes.clone(), &input.iv) else {
        unreachable!("16-byte iv is accepted");
    };
    let Ok(ciphertext) = encrypt.encrypt_to_vec(&input.plaintext) else {
        unreachable!("AES never fails on a full counter block");
    };
    assert_eq!(ciphertext.len(), input.plaintext.len());

    // Decrypt in two pieces; the keystream position must carry across calls.
    let split = usize::from(input.split).min(ciphertext.len());
    let Ok(mut decrypt) = Ctr::new(aes.clone(), &input.iv) else {
        unreachable!("16-byte iv is accepted");
    };
    let mut recovered = ciphertext.clone();
    let (head, tail) = recovered.split_at_mut(split);
    assert!(decrypt.apply_keystream(head).is_ok());
    assert!(decrypt.apply_keystream(tail).is_ok());
    assert_eq!(recovered, input.plaintext, "CTR round-trip failed");

    // The first keystream block is E(iv).
    if !input.plaintext.is_empty() {
        let Ok(block) = aes.encrypt_to_vec(&input.iv) else {
            unreachable!("16-byte block");
        };
        assert_eq!(ciphertext[0] ^ input.plaintext[0], block[0]);
        let Ok(back) = aes.decrypt_to_vec(&block) else {
            unreachable!("full schedule decrypts");
        };
        assert_eq!(back, input.iv);
    }
});
