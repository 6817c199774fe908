#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header probe and full decode must never panic
    let _ = zentga::probe_tga(data);
    let Ok(decoded) = zentga::decode_tga(data, enough::Unstoppable) else {
        return;
    };
    assert_eq!(
        decoded.pixels().len(),
        decoded.width as usize * decoded.height as usize * decoded.layout.channels()
    );

    // Scanline access must agree with the one-shot output
    let mut dec = zentga::TgaDecoder::<&[u8]>::for_reader();
    if dec.open_reader(data).is_err() {
        panic!("one-shot decode succeeded but open failed");
    }
    let stride = decoded.width as usize * decoded.layout.channels();
    let mut row = vec![0u8; stride];
    for y in 0..decoded.height {
        dec.read_scanline(y, &mut row).unwrap();
        let start = y as usize * stride;
        assert_eq!(&row[..], &decoded.pixels()[start..start + stride]);
    }
});
