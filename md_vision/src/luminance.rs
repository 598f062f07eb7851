//! ABOUTME: Reduces packed RGB565 pixels to a single grayscale intensity
//! ABOUTME: Integer weighting over raw channel values, kept bit-exact for compatibility

/// Grayscale intensity of a big-endian-decoded RGB565 pixel
///
/// Channels are weighted 299/587/114 per mille without rescaling to 8 bits,
/// so the result lies in `0..=49`.
///
/// ```
/// use md_vision::luminance::rgb565_to_gray;
/// assert_eq!(rgb565_to_gray(0xFFFF), 49);
/// assert_eq!(rgb565_to_gray(0x0000), 0);
/// ```
pub fn rgb565_to_gray(pixel: u16) -> u8 {
    let red = u32::from((pixel >> 11) & 0x1F);
    let green = u32::from((pixel >> 5) & 0x3F);
    let blue = u32::from(pixel & 0x1F);

    ((red * 299 + green * 587 + blue * 114) / 1000) as u8
}

/// Pack 5/6/5-bit channel values; out-of-range bits are masked off
pub fn rgb565(red: u8, green: u8, blue: u8) -> u16 {
    (u16::from(red & 0x1F) << 11) | (u16::from(green & 0x3F) << 5) | u16::from(blue & 0x1F)
}

/// Pack 8-bit channels by dropping their low bits
pub fn rgb565_from_rgb8(red: u8, green: u8, blue: u8) -> u16 {
    rgb565(red >> 3, green >> 2, blue >> 3)
}
