#![no_main]

use libfuzzer_sys::fuzz_target;
use lz4s_convert::{ConvertError, convert_block, convert_block_snappy};

/// Verifies that conversion safely handles arbitrary, potentially malformed input.
///
/// # Invariant
/// Conversion must return either `Ok(_)` or `Err(_)`. It must **never** panic,
/// whatever the input and whatever the destination size.
fn verify_robustness(data: &[u8]) {
    for size in [0, 16, data.len(), data.len() * 4 + 64] {
        let mut dst = vec![0u8; size];
        let _ = convert_block(&mut dst, data);
        let _ = convert_block_snappy(&mut dst, data);
    }
}

/// Verifies that both targets classify every input the same way.
///
/// # Invariant
/// With ample room, S2 and Snappy conversion either both succeed with the same
/// decompressed size or both fail with `Corrupt`.
///
/// # Panics
/// Panics on any disagreement, which signals a fuzzing failure.
fn verify_targets_agree(data: &[u8]) {
    // Snappy needs up to 3 output bytes per 64 decompressed bytes of a match.
    let size = data.len() * 16 + 64;
    let mut a = vec![0u8; size];
    let mut b = vec![0u8; size];

    match (convert_block(&mut a, data), convert_block_snappy(&mut b, data)) {
        (Ok(x), Ok(y)) => assert_eq!(
            x.uncompressed, y.uncompressed,
            "targets disagree on decompressed size"
        ),
        (Err(ConvertError::Corrupt), Err(ConvertError::Corrupt)) => {}
        // A long match can outgrow the Snappy buffer before S2's.
        (_, Err(ConvertError::DstTooSmall)) | (Err(ConvertError::DstTooSmall), _) => {}
        (x, y) => panic!("targets disagree: S2 {x:?}, Snappy {y:?}"),
    }
}

fuzz_target!(|data: &[u8]| {
    verify_robustness(data);
    verify_targets_agree(data);
});
