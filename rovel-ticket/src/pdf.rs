use printpdf::image_crate::{DynamicImage, GrayImage};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rgb,
};
use rovel_domain::ticket::Ticket;

use crate::Bitmap;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("pdf rendering failed: {0}")]
    Pdf(String),

    #[error("encoded bitmap could not be embedded")]
    Bitmap,
}

/// Compose the printable A5 ticket: structured fields on the left, the QR
/// between the origin and destination, the barcode in the tear-off stub.
pub fn render_ticket_pdf(
    ticket: &Ticket,
    barcode: &Bitmap,
    qr: &Bitmap,
) -> Result<Vec<u8>, RenderError> {
    let (doc, page, layer) =
        PdfDocument::new("Ticket de réservation", Mm(210.0), Mm(148.0), "ticket");
    let layer = doc.get_page(page).get_layer(layer);

    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    // header
    layer.set_fill_color(Color::Rgb(Rgb::new(0.11, 0.31, 0.85, None)));
    layer.use_text("ROVEL TICKET", 16.0, Mm(12.0), Mm(133.0), &bold);

    // left column: label/value pairs
    layer.set_fill_color(Color::Rgb(Rgb::new(0.07, 0.09, 0.15, None)));
    let field = |label: &str, value: &str, label_y: Mm, value_y: Mm| {
        layer.use_text(format!("{}:", label), 8.0, Mm(12.0), label_y, &regular);
        layer.use_text(value, 11.0, Mm(12.0), value_y, &bold);
    };
    field("AGENCE CHOISIE", &ticket.agency, Mm(122.0), Mm(117.0));
    field("Nom", &ticket.name, Mm(109.0), Mm(104.0));
    field("Date", &ticket.date, Mm(96.0), Mm(91.0));
    field("Heure de départ", &ticket.departure_time, Mm(83.0), Mm(78.0));
    field("Mode", ticket.mode.as_str(), Mm(70.0), Mm(65.0));
    field("Classe", &ticket.class, Mm(57.0), Mm(52.0));
    field(
        "Montant total",
        &format!("{:.2} FCFA", ticket.total_amount),
        Mm(44.0),
        Mm(39.0),
    );

    // middle column: origin, QR, destination
    layer.use_text("From:", 9.0, Mm(95.0), Mm(118.0), &regular);
    layer.use_text(ticket.from_location.as_str(), 14.0, Mm(95.0), Mm(111.0), &bold);
    layer.use_text("To:", 9.0, Mm(95.0), Mm(48.0), &regular);
    layer.use_text(ticket.to_location.as_str(), 14.0, Mm(95.0), Mm(41.0), &bold);
    // ~41 mm wide at 300 dpi
    place_bitmap(
        &layer,
        qr,
        ImageTransform {
            translate_x: Some(Mm(95.0)),
            translate_y: Some(Mm(58.0)),
            dpi: Some(300.0),
            ..Default::default()
        },
    )?;

    // tear-off stub
    separator(&layer);
    layer.set_fill_color(Color::Rgb(Rgb::new(0.11, 0.31, 0.85, None)));
    layer.use_text(
        format!("CLASS: {}", ticket.class),
        13.0,
        Mm(150.0),
        Mm(125.0),
        &bold,
    );
    layer.set_fill_color(Color::Rgb(Rgb::new(0.07, 0.09, 0.15, None)));
    layer.use_text(ticket.name.as_str(), 10.0, Mm(150.0), Mm(112.0), &regular);
    // ~55 mm wide at 600 dpi given the encoder's 3 px modules
    place_bitmap(
        &layer,
        barcode,
        ImageTransform {
            translate_x: Some(Mm(148.0)),
            translate_y: Some(Mm(75.0)),
            dpi: Some(600.0),
            ..Default::default()
        },
    )?;
    layer.use_text(
        "Merci de voyager avec Rovel Reservation",
        7.0,
        Mm(148.0),
        Mm(20.0),
        &regular,
    );

    doc.save_to_bytes().map_err(|e| RenderError::Pdf(e.to_string()))
}

fn separator(layer: &PdfLayerReference) {
    let line = Line {
        points: vec![
            (Point::new(Mm(143.0), Mm(12.0)), false),
            (Point::new(Mm(143.0), Mm(136.0)), false),
        ],
        is_closed: false,
    };
    layer.set_outline_color(Color::Rgb(Rgb::new(0.8, 0.8, 0.8, None)));
    layer.add_line(line);
}

fn place_bitmap(
    layer: &PdfLayerReference,
    bitmap: &Bitmap,
    transform: ImageTransform,
) -> Result<(), RenderError> {
    let buffer = GrayImage::from_raw(bitmap.width, bitmap.height, bitmap.pixels.clone())
        .ok_or(RenderError::Bitmap)?;
    let image = Image::from_dynamic_image(&DynamicImage::ImageLuma8(buffer));

    image.add_to_layer(layer.clone(), transform);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{barcode, qr};
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
    fn test_render_produces_a_pdf_buffer() {
        let t = ticket();
        let code = barcode::render_code128("Jean Dupont1750838400000").unwrap();
        let qr_img = qr::render_qr(&qr::qr_payload(&t)).unwrap();

        let bytes = render_ticket_pdf(&t, &code, &qr_img).unwrap();
        assert!(bytes.len() > 1000);
        assert!(bytes.starts_with(b"%PDF"));
    }
}
