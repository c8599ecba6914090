#![no_main]

use libfuzzer_sys::fuzz_target;
use kestrel_crypto::{Digest, Hmac, Mac, Sha256, Sha512, hmac};

fn check<D: Digest + Clone>(digest: D, key: &[u8], message: &[u8]) {
    let Ok(expected) = hmac(digest.clone(), key, message) else {
        unreachable!("SHA-2 digests are in the block-size table");
    };

    // A long key is replaced by its digest.
    let Ok(mut mac) = Hmac::new(digest.clone()) else {
        unreachable!("SHA-2 digests are in the block-size table");
    };
    if key.len() > mac.block_size() {
        let mut hashed = digest;
        hashed.update(key);
        mac.init(&hashed.build());
    } else {
        mac.init(key);
    }
    mac.update(message);
    assert_eq!(mac.build(), expected);

    // build() resets to the keyed state.
    mac.update(message);
    assert_eq!(mac.build(), expected);
}

fuzz_target!(|input: (Vec<u8>, Vec<u8>)| {
    let (key, message) = input;
    check(Sha256::new(), &key, &message);
    check(Sha512::new(), &key, &message);
});
