use super::*;

const PALETTE: [u8; 12] = [0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255];
const T: u8 = 0;
const R: u8 = 1;
const G: u8 = 2;
const B: u8 = 3;

const CLEAR: [u8; 4] = [0, 0, 0, 0];
const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

struct Sub {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    pixels: Vec<u8>,
    delay: u16,
    dispose: gif::DisposalMethod,
}

fn sub(left: u16, top: u16, width: u16, height: u16, pixels: &[u8]) -> Sub {
    Sub {
        left,
        top,
        width,
        height,
        pixels: pixels.to_vec(),
        delay: 10,
        dispose: gif::DisposalMethod::Keep,
    }
}

impl Sub {
    fn dispose(mut self, d: gif::DisposalMethod) -> Self {
        self.dispose = d;
        self
    }

    fn delay(mut self, cs: u16) -> Self {
        self.delay = cs;
        self
    }
}

fn encode(width: u16, height: u16, subs: &[Sub]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut enc = gif::Encoder::new(&mut buf, width, height, &[]).unwrap();
        for s in subs {
            let mut f = gif::Frame::from_palette_pixels(
                s.width,
                s.height,
                s.pixels.clone(),
                PALETTE.to_vec(),
                Some(T),
            );
            f.left = s.left;
            f.top = s.top;
            f.delay = s.delay;
            f.dispose = s.dispose;
            enc.write_frame(&f).unwrap();
        }
    }
    buf
}

fn px(seq: &FrameSequence, frame: usize, x: u32, y: u32) -> [u8; 4] {
    seq.get(frame).unwrap().frame.pixel(x, y).unwrap()
}

#[test]
fn disposal_none_accumulates_previous_pixels() {
    let bytes = encode(2, 1, &[sub(0, 0, 1, 1, &[R]), sub(1, 0, 1, 1, &[G])]);
    let seq = decode_animation(&bytes, &[]).unwrap();

    assert_eq!(seq.len(), 2);
    assert_eq!(px(&seq, 1, 0, 0), RED);
    assert_eq!(px(&seq, 1, 1, 0), GREEN);
    // Earlier output is a copy, untouched by later draws.
    assert_eq!(px(&seq, 0, 1, 0), CLEAR);
}

#[test]
fn disposal_background_erases_before_next_frame() {
    let bytes = encode(
        2,
        1,
        &[
            sub(0, 0, 1, 1, &[R]).dispose(gif::DisposalMethod::Background),
            sub(1, 0, 1, 1, &[G]),
        ],
    );
    let seq = decode_animation(&bytes, &[]).unwrap();

    assert_eq!(px(&seq, 0, 0, 0), RED);
    assert_eq!(px(&seq, 1, 0, 0), CLEAR);
    assert_eq!(px(&seq, 1, 1, 0), GREEN);
}

#[test]
fn disposal_previous_restores_pre_draw_state() {
    let bytes = encode(
        3,
        1,
        &[
            sub(0, 0, 1, 1, &[R]).dispose(gif::DisposalMethod::Previous),
            sub(1, 0, 1, 1, &[G]),
            sub(2, 0, 1, 1, &[B]),
        ],
    );
    let seq = decode_animation(&bytes, &[]).unwrap();

    assert_eq!(px(&seq, 0, 0, 0), RED);
    assert_eq!(px(&seq, 1, 0, 0), CLEAR);
    assert_eq!(px(&seq, 2, 0, 0), CLEAR);
    assert_eq!(px(&seq, 2, 1, 0), GREEN);
    assert_eq!(px(&seq, 2, 2, 0), BLUE);
}

#[test]
fn disposal_previous_restores_accumulated_content_not_blank() {
    let bytes = encode(
        2,
        2,
        &[
            sub(0, 0, 2, 2, &[R, R, R, R]),
            sub(0, 0, 1, 1, &[B]).dispose(gif::DisposalMethod::Previous),
            sub(1, 1, 1, 1, &[G]),
        ],
    );
    let seq = decode_animation(&bytes, &[]).unwrap();

    assert_eq!(px(&seq, 1, 0, 0), BLUE);
    assert_eq!(px(&seq, 2, 0, 0), RED);
    assert_eq!(px(&seq, 2, 1, 0), RED);
    assert_eq!(px(&seq, 2, 1, 1), GREEN);
}

#[test]
fn transparent_sub_frame_pixels_blend_over_instead_of_replacing() {
    let bytes = encode(2, 1, &[sub(0, 0, 2, 1, &[R, R]), sub(0, 0, 2, 1, &[T, G])]);
    let seq = decode_animation(&bytes, &[]).unwrap();

    assert_eq!(px(&seq, 1, 0, 0), RED);
    assert_eq!(px(&seq, 1, 1, 0), GREEN);
}

#[test]
fn saved_disposal_matches_embedded_tags() {
    let bytes = encode(
        3,
        1,
        &[
            sub(0, 0, 1, 1, &[R]).dispose(gif::DisposalMethod::Previous),
            sub(1, 0, 1, 1, &[G]).dispose(gif::DisposalMethod::Background),
            sub(2, 0, 1, 1, &[B]),
        ],
    );
    let embedded = decode_animation(&bytes, &[]).unwrap();

    let saved = decode_saved_disposals(&encode_disposals(&extract_disposals(&bytes).unwrap()));
    let from_saved = decode_animation(&bytes, &saved).unwrap();

    assert_eq!(embedded, from_saved);
}

#[test]
fn saved_disposal_overrides_embedded_tags() {
    let bytes = encode(2, 1, &[sub(0, 0, 1, 1, &[R]), sub(1, 0, 1, 1, &[G])]);
    let seq = decode_animation(&bytes, &[DisposalMethod::Background]).unwrap();
    assert_eq!(px(&seq, 1, 0, 0), CLEAR);
}

#[test]
fn delays_convert_centiseconds_with_defaults() {
    let bytes = encode(
        1,
        1,
        &[
            sub(0, 0, 1, 1, &[R]).delay(0),
            sub(0, 0, 1, 1, &[G]).delay(5),
            sub(0, 0, 1, 1, &[B]).delay(1),
        ],
    );
    let seq = decode_animation(&bytes, &[]).unwrap();
    assert_eq!(seq.durations_ms().collect::<Vec<_>>(), vec![100, 50, 10]);
}

#[test]
fn zero_screen_size_falls_back_to_first_sub_frame() {
    let bytes = encode(0, 0, &[sub(0, 0, 2, 1, &[R, G])]);
    let seq = decode_animation(&bytes, &[]).unwrap();
    let f = &seq.get(0).unwrap().frame;
    assert_eq!((f.width(), f.height()), (2, 1));
    assert_eq!(f.pixel(1, 0), Some(GREEN));
}

#[test]
fn sub_frame_outside_canvas_is_clipped() {
    let bytes = encode(2, 1, &[sub(1, 0, 2, 1, &[R, G])]);
    let seq = decode_animation(&bytes, &[]).unwrap();
    assert_eq!(px(&seq, 0, 0, 0), CLEAR);
    assert_eq!(px(&seq, 0, 1, 0), RED);
}

#[test]
fn oversized_logical_screen_is_a_decode_error() {
    let bytes = encode(
        40000,
        40000,
        &[sub(0, 0, 1, 1, &[R]), sub(0, 0, 1, 1, &[G]), sub(0, 0, 1, 1, &[B])],
    );
    let err = decode_animation(&bytes, &[]).unwrap_err();
    assert!(err.is_decode());
    assert!(extract_disposals(&bytes).unwrap_err().is_decode());
}

#[test]
fn frame_count_counts_against_decode_budget() {
    // 8192x8192 fits once (256 MiB) but not alongside two composited copies.
    let bytes = encode(8192, 8192, &[sub(0, 0, 1, 1, &[R]), sub(0, 0, 1, 1, &[G])]);
    assert!(decode_animation(&bytes, &[]).unwrap_err().is_decode());
}

#[test]
fn container_without_frames_is_a_decode_error() {
    let bytes = encode(4, 4, &[]);
    assert!(decode_animation(&bytes, &[]).unwrap_err().is_decode());
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    assert!(decode_animation(b"not a gif", &[]).unwrap_err().is_decode());
    assert!(extract_disposals(b"GIF89a").unwrap_err().is_decode());
}

#[test]
fn disposal_codes_follow_container_encoding() {
    assert_eq!(
        decode_saved_disposals(&[0, 1, 2, 3, 4, 7]),
        vec![
            DisposalMethod::None,
            DisposalMethod::None,
            DisposalMethod::Background,
            DisposalMethod::Previous,
            DisposalMethod::None,
            DisposalMethod::None,
        ]
    );
    assert_eq!(
        encode_disposals(&[DisposalMethod::Previous, DisposalMethod::None]),
        vec![3, 1]
    );
}
