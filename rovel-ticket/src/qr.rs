use qrcode::{Color, EcLevel, QrCode};
use rovel_domain::ticket::Ticket;

use crate::{Bitmap, EncodeError};

const MODULE_SCALE: u32 = 8;
// quiet zone on each side, in modules
const MARGIN: u32 = 2;

/// The QR carries the full structured ticket summary.
pub fn qr_payload(ticket: &Ticket) -> String {
    serde_json::json!({
        "name": ticket.name,
        "agency": ticket.agency,
        "mode": ticket.mode.as_str(),
        "date": ticket.date,
        "departureTime": ticket.departure_time,
        "from": ticket.from_location,
        "to": ticket.to_location,
        "class": ticket.class,
        "totalAmount": ticket.total_amount,
    })
    .to_string()
}

/// Encode `payload` at error-correction level H and rasterize it.
pub fn render_qr(payload: &str) -> Result<Bitmap, EncodeError> {
    let code = QrCode::with_error_correction_level(payload, EcLevel::H)
        .map_err(|e| EncodeError::Qr(e.to_string()))?;

    let modules = code.width() as u32;
    let colors = code.to_colors();

    let side = (modules + 2 * MARGIN) * MODULE_SCALE;
    let mut pixels = vec![255u8; (side * side) as usize];

    for my in 0..modules {
        for mx in 0..modules {
            if colors[(my * modules + mx) as usize] != Color::Dark {
                continue;
            }
            let x0 = (mx + MARGIN) * MODULE_SCALE;
            let y0 = (my + MARGIN) * MODULE_SCALE;
            for y in y0..y0 + MODULE_SCALE {
                for x in x0..x0 + MODULE_SCALE {
                    pixels[(y * side + x) as usize] = 0;
                }
            }
        }
    }

    Ok(Bitmap {
        width: side,
        height: side,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rovel_domain::ticket::TransportMode;
    use uuid::Uuid;

    fn ticket() -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            agency: "Voyage Rapide".to_string(),
            mode: TransportMode::BUS,
            name: "Jean Dupont".to_string(),
            email: "jean@x.com".to_string(),
            date: "2025-06-25".to_string(),
            departure_time: "08:00".to_string(),
            total_amount: 6000.0,
            class: "Standard".to_string(),
            from_location: "DOUALA".to_string(),
            to_location: "YAOUNDE".to_string(),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_payload_carries_the_full_summary() {
        let payload = qr_payload(&ticket());
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(value["name"], "Jean Dupont");
        assert_eq!(value["mode"], "BUS");
        assert_eq!(value["departureTime"], "08:00");
        assert_eq!(value["from"], "DOUALA");
        assert_eq!(value["to"], "YAOUNDE");
        assert_eq!(value["totalAmount"], 6000.0);
    }

    #[test]
    fn test_render_is_square_and_bilevel() {
        let bitmap = render_qr(&qr_payload(&ticket())).unwrap();
        assert_eq!(bitmap.width, bitmap.height);
        assert_eq!(bitmap.pixels.len(), (bitmap.width * bitmap.height) as usize);
        assert!(bitmap.pixels.iter().any(|p| *p == 0));
        assert!(bitmap.pixels.iter().all(|p| *p == 0 || *p == 255));
    }
}
