//! One printed field on every label: where it goes, how it looks, and the
//! template producing its text.

use crate::canvas::Canvas;
use crate::error::{LabelError, Result};
use crate::geometry::GridGeometry;
use crate::paragraph::{Frame, Paragraph};
use crate::record::Record;
use crate::style::{Alignment, Colour, Font, StyleOptions, TextStyle, LEADING_RATIO};
use crate::template::Template;

/// Field settings as configured. Position and size are fractions of the
/// label and may exceed 0..1 for text that overflows the label. Font size
/// is a fraction of the label height. `None` leaves the default in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldParams {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub colour: Option<String>,
    pub layout: Option<String>,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    frame: Frame,
    template: Template,
    style: TextStyle,
}

impl FieldSpec {
    /// Resolve `params` against the label size of `geometry`.
    pub fn new(params: FieldParams, geometry: &GridGeometry) -> Result<Self> {
        let label_width = geometry.slot_width();
        let label_height = geometry.slot_height();

        for (what, value) in [
            ("X", params.x),
            ("Y", params.y),
            ("Width", params.width),
            ("Height", params.height),
        ] {
            if !value.is_finite() {
                return Err(LabelError::InvalidField(format!("{} is not a number", what)));
            }
        }

        let mut options = StyleOptions::default();

        if let Some(colour) = params.colour.as_deref().filter(|c| !c.trim().is_empty()) {
            options.colour = Some(Colour::parse(colour)?);
        }
        if let Some(family) = params.font_family.as_deref().filter(|f| !f.trim().is_empty()) {
            options.font = Some(Font::from_name(family)?);
        }
        if let Some(size) = params.font_size {
            if !(size.is_finite() && size > 0.0) {
                return Err(LabelError::InvalidField(format!(
                    "font size must be greater than zero, got {}",
                    size
                )));
            }
            options.font_size = Some(size * label_height);
            options.leading = Some(size * LEADING_RATIO * label_height);
        }
        if let Some(layout) = params.layout.as_deref() {
            if Alignment::from_layout_flag(layout) == Alignment::Center {
                options.alignment = Some(Alignment::Center);
            }
        }

        Ok(Self {
            frame: Frame::new(
                params.x * label_width,
                params.y * label_height,
                params.width * label_width,
                params.height * label_height,
            ),
            template: Template::parse(&params.format)?,
            style: TextStyle::resolve(&options),
        })
    }

    /// Format the template with `record` and flow the text into this
    /// field's rectangle. The canvas origin must already be at the label's
    /// bottom-left corner.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, record: &Record) -> Result<()> {
        let text = self.template.format(record)?;
        let paragraph = Paragraph::new(&text, &self.style);
        self.frame.flow(canvas, &paragraph)?;
        Ok(())
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{Op, RecordingCanvas};
    use crate::geometry::tests::grid;

    fn params(format: &str) -> FieldParams {
        FieldParams {
            x: 0.0,
            y: 0.5,
            width: 1.0,
            height: 0.5,
            format: format.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn fractions_scale_to_the_label() {
        // labels are 140 x 90
        let g = grid(2, 2);
        let field = FieldSpec::new(
            FieldParams {
                x: 0.1,
                y: 0.2,
                width: 1.5,
                height: 0.5,
                ..params("")
            },
            &g,
        )
        .unwrap();
        let f = field.frame();
        assert!((f.x - 14.0).abs() < 1e-4);
        assert!((f.y - 18.0).abs() < 1e-4);
        assert!((f.width - 210.0).abs() < 1e-4);
        assert!((f.height - 45.0).abs() < 1e-4);
    }

    #[test]
    fn unset_style_uses_defaults() {
        let field = FieldSpec::new(params("x"), &grid(2, 2)).unwrap();
        assert_eq!(field.style(), &TextStyle::default());
    }

    #[test]
    fn font_size_is_relative_to_label_height() {
        let field = FieldSpec::new(
            FieldParams {
                font_family: Some("Times-Bold".into()),
                font_size: Some(0.2),
                colour: Some("#800000".into()),
                layout: Some("c".into()),
                ..params("x")
            },
            &grid(2, 2),
        )
        .unwrap();

        let style = field.style();
        assert_eq!(style.font, Font::TimesBold);
        assert!((style.font_size - 18.0).abs() < 1e-4);
        assert!((style.leading - 19.8).abs() < 1e-3);
        assert_eq!(style.colour, Colour::from_rgb24(0x800000));
        assert_eq!(style.alignment, Alignment::Center);
    }

    #[test]
    fn empty_style_cells_are_ignored() {
        let field = FieldSpec::new(
            FieldParams {
                font_family: Some("  ".into()),
                colour: Some(String::new()),
                layout: Some(String::new()),
                ..params("x")
            },
            &grid(2, 2),
        )
        .unwrap();
        assert_eq!(field.style(), &TextStyle::default());
    }

    #[test]
    fn bad_style_is_rejected_up_front() {
        let g = grid(2, 2);
        assert!(matches!(
            FieldSpec::new(FieldParams { font_family: Some("Papyrus".into()), ..params("") }, &g),
            Err(LabelError::UnknownFont(_))
        ));
        assert!(matches!(
            FieldSpec::new(FieldParams { font_size: Some(0.0), ..params("") }, &g),
            Err(LabelError::InvalidField(_))
        ));
        assert!(matches!(
            FieldSpec::new(params("%(beer"), &g),
            Err(LabelError::TemplateSyntax { .. })
        ));
    }

    #[test]
    fn render_draws_formatted_text() {
        let field = FieldSpec::new(params("%(beer)s %(abv)s%%"), &grid(2, 2)).unwrap();
        let record = Record::new().with("beer", "Mild").with("abv", "3.4");
        let mut canvas = RecordingCanvas::default();

        field.render(&mut canvas, &record).unwrap();

        // frame top at 90, first baseline one default font size lower
        assert_eq!(
            canvas.ops,
            vec![Op::Text {
                text: "Mild 3.4%".into(),
                x: 6.0,
                y: 80.0
            }]
        );
    }

    #[test]
    fn render_fails_on_missing_field() {
        let field = FieldSpec::new(params("%(brewer)s"), &grid(2, 2)).unwrap();
        let mut canvas = RecordingCanvas::default();
        let err = field
            .render(&mut canvas, &Record::new().with("beer", "Mild"))
            .unwrap_err();
        assert!(matches!(err, LabelError::MissingField { field, .. } if field == "brewer"));
        assert!(canvas.ops.is_empty());
    }
}
