#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(image_type: u8, cmap: Option<(u16, u8)>, w: u16, h: u16, bpp: u8, attr: u8) -> Vec<u8> {
    let (cmap_len, cmap_bits) = cmap.unwrap_or((0, 0));
    let mut out = vec![0, u8::from(cmap.is_some()), image_type, 0, 0];
    out.extend_from_slice(&cmap_len.to_le_bytes());
    out.push(cmap_bits);
    out.extend_from_slice(&[0, 0, 0, 0]);
    out.extend_from_slice(&w.to_le_bytes());
    out.extend_from_slice(&h.to_le_bytes());
    out.push(bpp);
    out.push(attr);
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // True-color 2x2, 24-bit
    let mut rgb = header(2, None, 2, 2, 24, 0);
    rgb.extend_from_slice(&[0, 0, 255, 0, 255, 0, 255, 0, 0, 128, 128, 128]);
    fs::write(format!("{dir}/rgb_2x2.tga"), rgb).unwrap();

    // True-color RLE 4x1, 32-bit, top-down
    let mut rle = header(10, None, 4, 1, 32, 0x28);
    rle.extend_from_slice(&[0x82, 1, 2, 3, 255, 0x00, 9, 8, 7, 128]);
    fs::write(format!("{dir}/rle_rgba_4x1.tga"), rle).unwrap();

    // Paletted 2x1, 24-bit palette
    let mut pal = header(1, Some((2, 24)), 2, 1, 8, 0);
    pal.extend_from_slice(&[0, 0, 255, 255, 0, 0, 1, 0]);
    fs::write(format!("{dir}/paletted_2x1.tga"), pal).unwrap();

    // Grayscale RLE 3x2, mirrored
    let mut gray = header(11, None, 3, 2, 8, 0x10);
    gray.extend_from_slice(&[0x85, 0x40]);
    fs::write(format!("{dir}/gray_rle_3x2.tga"), gray).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/zero_header.bin"), [0u8; 18]).unwrap();
    fs::write(format!("{dir}/short_header.bin"), &header(2, None, 1, 1, 24, 0)[..9]).unwrap();

    println!("Generated seed corpus in {dir}/");
}
