#![no_main]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use libfuzzer_sys::fuzz_target;
use tokio_mime_writer::encoding::base64::encode_wrapped;

fuzz_target!(|data: &[u8]| {
    let encoded = encode_wrapped(data, 76);

    // Every line fits and the unwrapped text decodes back to the input.
    assert!(encoded.split("\r\n").all(|line| line.len() <= 76));
    let joined: String = encoded.split("\r\n").collect();
    assert_eq!(STANDARD.decode(joined).unwrap(), data);
});
