#![no_main]

use libfuzzer_sys::fuzz_target;
use kestrel_crypto::{Digest, Sha224, Sha256, Sha384, Sha512};

/// Feeds `data` in pieces whose sizes come from `cuts` and compares with the
/// one-shot result.
fn check<D: Digest>(mut streamed: D, mut whole: D, cuts: &[u8], data: &[u8]) {
    whole.update(data);
    let expected = whole.build();

    let mut rest = data;
    for &cut in cuts {
        let take = usize::from(cut).min(rest.len());
        let (head, tail) = rest.split_at(take);
        streamed.update(head);
        rest = tail;
    }
    streamed.update(rest);

    assert_eq!(streamed.build(), expected, "{}: chunking changed the digest", whole.algorithm_name());

    // Both instances are reset after build.
    assert_eq!(streamed.build(), whole.build());
}

fuzz_target!(|input: (Vec<u8>, Vec<u8>)| {
    let (cuts, data) = input;

    check(Sha224::new(), Sha224::new(), &cuts, &data);
    check(Sha256::new(), Sha256::new(), &cuts, &data);
    check(Sha384::new(), Sha384::new(), &cuts, &data);
    check(Sha512::new(), Sha512::new(), &cuts, &data);
});
