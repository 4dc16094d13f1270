// Static pixel sprite tables (classic Space Invaders). Data only; the
// rendering routine itself lives behind the `Renderer` boundary.

/// Player cannon (11 x 8).
pub const PLAYER: &[&str] = &[
    "00000111000",
    "00011111100",
    "00111111110",
    "01111111111",
    "11111111111",
    "11111111111",
    "00100100100",
    "00100100100",
];

/// Invader kind 1 (squid), two animation frames.
pub const INVADER1: [&[&str]; 2] = [
    &[
        "0011001100",
        "0001111000",
        "0111111110",
        "1111111111",
        "1101101101",
        "1100000111",
        "0001100000",
        "0010010000",
    ],
    &[
        "0011001100",
        "0001111000",
        "0111111110",
        "1111111111",
        "1101101101",
        "1100000111",
        "0010010010",
        "0100000001",
    ],
];

/// Invader kind 2 (crab), two animation frames.
pub const INVADER2: [&[&str]; 2] = [
    &[
        "00111100", "01111110", "11111111", "11011011", "11111111", "00100100", "01000010",
        "10000001",
    ],
    &[
        "00111100", "01111110", "11111111", "11011011", "11111111", "01001010", "10000001",
        "00000000",
    ],
];

/// Invader kind 3 (octopus), two animation frames.
pub const INVADER3: [&[&str]; 2] = [
    &[
        "00111100", "01111110", "11111111", "11000011", "11000011", "11111111", "01100110",
        "11000011",
    ],
    &[
        "00111100", "01111110", "11111111", "11000011", "11011011", "01100110", "00111100",
        "00011000",
    ],
];

/// UFO saucer.
pub const UFO: &[&str] = &[
    "0011111000",
    "0111111110",
    "1111111111",
    "1111111111",
    "0111111110",
    "0011111000",
];

/// Shield damage mask (16 x 8).
pub const SHIELD_MASK: &[&str] = &[
    "0001111111111000",
    "0111111111111110",
    "1111111111111111",
    "1111111111111111",
    "1111111111111111",
    "1111111111111111",
    "1111111111111111",
    "0011111111111100",
];

/// Selects the invader sprite for a kind at a given frame tick. Frames swap
/// every ten ticks; unknown kinds fall back to the octopus.
pub fn invader_sprite(kind: u8, frame_tick: u64) -> &'static [&'static str] {
    let frames = match kind {
        1 => &INVADER1,
        2 => &INVADER2,
        _ => &INVADER3,
    };
    if frame_tick % 20 < 10 { frames[0] } else { frames[1] }
}
