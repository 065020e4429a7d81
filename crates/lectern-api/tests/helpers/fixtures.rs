//! Test fixtures: deterministic byte bodies and minimal PDF/video blobs.

/// Deterministic body of `len` bytes for exact-slice assertions.
///
/// 251 is prime, so the pattern does not repeat at any power-of-two chunk
/// boundary and a misaligned slice comparison fails loudly.
pub fn patterned_body(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Minimal valid PDF.
pub fn create_test_pdf() -> Vec<u8> {
    b"%PDF-1.4
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
2 0 obj
<< /Type /Pages /Kids [] /Count 0 >>
endobj
trailer
<< /Size 3 /Root 1 0 R >>
%%EOF"
        .to_vec()
}

/// Minimal MP4 (ftyp + mdat).
pub fn create_test_video() -> Vec<u8> {
    let mut mp4 = Vec::new();
    mp4.extend_from_slice(&[0x00, 0x00, 0x00, 0x18]);
    mp4.extend_from_slice(b"ftyp");
    mp4.extend_from_slice(b"isom");
    mp4.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
    mp4.extend_from_slice(b"mp41");
    mp4.extend_from_slice(&[0x00, 0x00, 0x00, 0x10]);
    mp4.extend_from_slice(b"mdat");
    mp4.extend_from_slice(&[0xAA; 8]);
    mp4
}
