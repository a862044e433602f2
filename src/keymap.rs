use winit::keyboard::KeyCode;

/// The hexadecimal keypad mapped onto the left 4x4 QWERTY block:
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|      |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
#[rustfmt::skip]
pub const KEYPAD: [(KeyCode, u8); 16] = [
    (KeyCode::Digit1, 0x1), (KeyCode::Digit2, 0x2), (KeyCode::Digit3, 0x3), (KeyCode::Digit4, 0xC),
    (KeyCode::KeyQ,   0x4), (KeyCode::KeyW,   0x5), (KeyCode::KeyE,   0x6), (KeyCode::KeyR,   0xD),
    (KeyCode::KeyA,   0x7), (KeyCode::KeyS,   0x8), (KeyCode::KeyD,   0x9), (KeyCode::KeyF,   0xE),
    (KeyCode::KeyZ,   0xA), (KeyCode::KeyX,   0x0), (KeyCode::KeyC,   0xB), (KeyCode::KeyV,   0xF),
];
