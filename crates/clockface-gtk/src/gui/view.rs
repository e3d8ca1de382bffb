use cairo::{Context, FontSlant, FontWeight, LineCap};
use clockface::render::HandStroke;
use clockface::{Color, FaceRenderer, FaceScene, Hand, Point, TextAttributes};
use std::f64::consts::PI;

// center cap radius relative to the thicker hand
const CAP_SCALE: f64 = 0.8;

/// Draws a [`FaceScene`] onto a cairo context.
pub struct CairoRenderer<'a> {
    cr: &'a Context,
}

impl<'a> CairoRenderer<'a> {
    pub fn new(cr: &'a Context) -> Self {
        Self { cr }
    }

    fn set_color(&self, color: Color) {
        let (r, g, b, a) = color.into_components();
        self.cr.set_source_rgba(r, g, b, a);
    }

    fn draw_face(&self, scene: &FaceScene<'_>) -> Result<(), cairo::Error> {
        let face = scene.geometry;
        self.set_color(scene.style.face_color);
        self.cr.arc(face.center.x, face.center.y, face.radius, 0.0, 2.0 * PI);
        self.cr.fill()
    }

    fn draw_border(&self, scene: &FaceScene<'_>) -> Result<(), cairo::Error> {
        if scene.style.border_width <= 0.0 {
            return Ok(());
        }
        let center = scene.geometry.center;
        self.set_color(scene.style.border_color);
        self.cr.set_line_width(scene.style.border_width);
        self.cr.arc(center.x, center.y, scene.border_radius(), 0.0, 2.0 * PI);
        self.cr.stroke()
    }

    fn draw_markings(&self, scene: &FaceScene<'_>) -> Result<(), cairo::Error> {
        let style = scene.style;
        self.cr.set_line_cap(LineCap::Butt);
        for marking in scene.markings() {
            let (color, thickness) = if marking.major {
                (style.major_marking_color, style.major_markings_thickness)
            } else {
                (style.minor_marking_color, style.minor_markings_thickness)
            };
            self.set_color(color);
            self.cr.set_line_width(thickness);
            self.cr.move_to(marking.start.x, marking.start.y);
            self.cr.line_to(marking.end.x, marking.end.y);
            self.cr.stroke()?;
        }
        Ok(())
    }

    /// Centers `text` on `anchor`.
    fn draw_text(
        &self,
        text: &str,
        attributes: &TextAttributes,
        anchor: Point,
    ) -> Result<(), cairo::Error> {
        let weight = if attributes.bold {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        };
        self.cr.select_font_face(&attributes.family, FontSlant::Normal, weight);
        self.cr.set_font_size(attributes.size);
        self.set_color(attributes.color);

        let ext = self.cr.text_extents(text)?;
        self.cr.move_to(
            anchor.x - (ext.width() / 2.0 + ext.x_bearing()),
            anchor.y - (ext.height() / 2.0 + ext.y_bearing()),
        );
        self.cr.show_text(text)
    }

    fn draw_digits(&self, scene: &FaceScene<'_>) -> Result<(), cairo::Error> {
        for digit in scene.digits() {
            self.draw_text(
                &digit.value.to_string(),
                &scene.style.digit_attributes,
                digit.anchor,
            )?;
        }
        Ok(())
    }

    fn draw_labels(&self, scene: &FaceScene<'_>) -> Result<(), cairo::Error> {
        let style = scene.style;
        if let Some(anchor) = scene.title_anchor() {
            self.draw_text(&style.title, &style.title_attributes, anchor)?;
        }
        if let Some(anchor) = scene.subtitle_anchor() {
            self.draw_text(&style.subtitle, &style.subtitle_attributes, anchor)?;
        }
        Ok(())
    }

    fn draw_hand(&self, stroke: HandStroke) -> Result<(), cairo::Error> {
        self.set_color(stroke.color);
        self.cr.set_line_width(stroke.thickness);
        self.cr.set_line_cap(LineCap::Round);
        self.cr.move_to(stroke.from.x, stroke.from.y);
        self.cr.line_to(stroke.to.x, stroke.to.y);
        self.cr.stroke()
    }

    fn draw_cap(&self, scene: &FaceScene<'_>) -> Result<(), cairo::Error> {
        let (hour, minute) = (scene.hand(Hand::Hour), scene.hand(Hand::Minute));
        let center = scene.geometry.center;
        self.set_color(minute.color);
        self.cr.arc(
            center.x,
            center.y,
            hour.thickness.max(minute.thickness) * CAP_SCALE,
            0.0,
            2.0 * PI,
        );
        self.cr.fill()
    }
}

impl FaceRenderer for CairoRenderer<'_> {
    type Error = cairo::Error;

    fn render(&mut self, scene: &FaceScene<'_>) -> Result<(), Self::Error> {
        self.draw_face(scene)?;
        self.draw_border(scene)?;
        self.draw_markings(scene)?;
        self.draw_digits(scene)?;
        self.draw_labels(scene)?;
        // minute hand on top, matching hit-testing
        self.draw_hand(scene.hand(Hand::Hour))?;
        self.draw_hand(scene.hand(Hand::Minute))?;
        self.draw_cap(scene)
    }
}
