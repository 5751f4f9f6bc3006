use barcoders::sym::code128::Code128;
use chrono::Utc;

use crate::{Bitmap, EncodeError};

const MODULE_WIDTH: u32 = 3;
const BAR_HEIGHT: u32 = 60;
// quiet zone on each side, in modules
const QUIET_ZONE: u32 = 10;

/// Barcode content: passenger name plus the issuance timestamp, unique per
/// call.
pub fn barcode_content(passenger_name: &str) -> String {
    format!("{}{}", passenger_name, Utc::now().timestamp_millis())
}

/// Encode `content` as a Code 128 barcode and rasterize it. Characters
/// outside the printable ASCII range are stripped before encoding since the
/// symbology cannot carry them.
pub fn render_code128(content: &str) -> Result<Bitmap, EncodeError> {
    let sanitized = sanitize(content);
    if sanitized.is_empty() {
        return Err(EncodeError::Barcode("empty payload".to_string()));
    }

    // Ɓ selects character set B (full printable ASCII)
    let code = Code128::new(format!("Ɓ{}", sanitized))
        .map_err(|e| EncodeError::Barcode(e.to_string()))?;
    let bars = code.encode();

    let width = (bars.len() as u32 + 2 * QUIET_ZONE) * MODULE_WIDTH;
    let mut pixels = vec![255u8; (width * BAR_HEIGHT) as usize];

    for (i, bar) in bars.iter().enumerate() {
        if *bar == 0 {
            continue;
        }
        let x0 = (QUIET_ZONE + i as u32) * MODULE_WIDTH;
        for y in 0..BAR_HEIGHT {
            for x in x0..x0 + MODULE_WIDTH {
                pixels[(y * width + x) as usize] = 0;
            }
        }
    }

    Ok(Bitmap {
        width,
        height: BAR_HEIGHT,
        pixels,
    })
}

fn sanitize(content: &str) -> String {
    content.chars().filter(|c| matches!(c, ' '..='~')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barcode_content_is_unique_per_call() {
        let a = barcode_content("Jean Dupont");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = barcode_content("Jean Dupont");
        assert!(a.starts_with("Jean Dupont"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_render_produces_plausible_bitmap() {
        let bitmap = render_code128("Jean Dupont1750838400000").unwrap();
        assert_eq!(bitmap.pixels.len(), (bitmap.width * bitmap.height) as usize);
        assert!(bitmap.width > 2 * QUIET_ZONE * MODULE_WIDTH);
        assert!(bitmap.pixels.iter().any(|p| *p == 0));
        assert!(bitmap.pixels.iter().all(|p| *p == 0 || *p == 255));
    }

    #[test]
    fn test_non_ascii_is_stripped_not_fatal() {
        let bitmap = render_code128("Aïcha Bâ1750838400000").unwrap();
        assert!(bitmap.width > 0);
    }

    #[test]
    fn test_unencodable_payload_is_rejected() {
        assert!(render_code128("éàü").is_err());
    }
}
