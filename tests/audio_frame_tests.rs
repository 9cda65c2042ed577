//! Frame buffer tests

use i2s_sine::audio::frame::{sample_bytes, FrameBuffer};
use i2s_sine::FRAMES_PER_BUFFER;

#[test]
fn test_buffer_starts_silent() {
    let buf: FrameBuffer<FRAMES_PER_BUFFER> = FrameBuffer::new();
    assert_eq!(buf.len(), 128);
    assert!(!buf.is_empty());
    assert_eq!(buf.samples().len(), 256);
    assert!(buf.samples().iter().all(|&s| s == 0));
}

#[test]
fn test_samples_are_interleaved_frames() {
    let mut buf: FrameBuffer<4> = FrameBuffer::new();
    buf.samples_mut().copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);

    assert_eq!(buf.frames(), &[[1, 2], [3, 4], [5, 6], [7, 8]]);

    buf.clear();
    assert_eq!(buf.samples(), &[0; 8]);
}

#[test]
fn test_byte_view() {
    let mut buf: FrameBuffer<2> = FrameBuffer::new();
    buf.samples_mut().copy_from_slice(&[0x1234, -2, 0, i16::MIN]);

    let bytes = buf.as_bytes();
    assert_eq!(bytes.len(), 8);

    let expected: Vec<u8> = buf.samples().iter().flat_map(|s| s.to_ne_bytes()).collect();
    assert_eq!(bytes, expected.as_slice());
}

#[test]
fn test_sample_bytes_empty() {
    assert!(sample_bytes(&[]).is_empty());
}

#[test]
fn test_zero_frame_buffer() {
    let buf: FrameBuffer<0> = FrameBuffer::default();
    assert!(buf.is_empty());
    assert!(buf.samples().is_empty());
    assert!(buf.as_bytes().is_empty());
}

#[test]
fn test_sample_bytes_of_subslice() {
    let samples = [1i16, 0x0102, -1, 7];
    let bytes = sample_bytes(&samples[1..3]);

    let expected: Vec<u8> = [0x0102i16, -1].iter().flat_map(|s| s.to_ne_bytes()).collect();
    assert_eq!(bytes, expected.as_slice());
}
