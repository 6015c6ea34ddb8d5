//! 12-bit color quantization: one packed RGB sample to three nibbles.

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// A pixel truncated to 4 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantized {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Quantized {
    /// Quantize a `0x??RRGGBB` sample. The top byte is ignored.
    pub fn from_rgb(color: u32) -> Self {
        Self {
            red: ((color >> 16) & 0xFF) as u8 >> 4,
            green: ((color >> 8) & 0xFF) as u8 >> 4,
            blue: (color & 0xFF) as u8 >> 4,
        }
    }

    /// Reconstruct the 24-bit color shown in the preview image.
    /// Each nibble lands in the high half of its original byte.
    pub fn preview(self) -> u32 {
        (u32::from(self.red) << 20) | (u32::from(self.green) << 12) | (u32::from(self.blue) << 4)
    }

    /// Append this sample's listing line, newline included.
    ///
    /// The BRAM word layout is green, blue, red; this differs from the
    /// preview channel order on purpose.
    pub fn push_record(self, out: &mut String) {
        out.push(hex(self.green));
        out.push(hex(self.blue));
        out.push(hex(self.red));
        out.push('\n');
    }

    pub fn record(self) -> String {
        let mut line = String::with_capacity(4);
        self.push_record(&mut line);
        line.pop();
        line
    }
}

fn hex(nibble: u8) -> char {
    HEX_DIGITS[usize::from(nibble & 0x0F)] as char
}
