use egui::{Align, Color32, FontId};

use crate::record::{Record, Value};

/// Cells showing this are treated as empty: clicking them copies nothing.
pub const PLACEHOLDER_DASH: &str = "—";

/// Text with explicit color, font and horizontal alignment.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledText {
    pub text: String,
    pub color: Color32,
    pub font: FontId,

    /// Only [`Align::Min`] (left) and [`Align::Center`] are distinguished when painting;
    /// [`Align::Max`] right-aligns.
    pub align: Align,
}

/// What a [`Formatter`] turns a raw field value into.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    /// Left-aligned text in the default cell style.
    PlainText(String),

    /// Text that carries its own style.
    Styled(StyledText),
}

impl CellValue {
    #[inline]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText(text.into())
    }

    #[inline]
    pub fn styled(text: impl Into<String>, color: Color32, font: FontId, align: Align) -> Self {
        Self::Styled(StyledText {
            text: text.into(),
            color,
            font,
            align,
        })
    }

    /// The text to display or copy, regardless of style.
    pub fn text(&self) -> &str {
        match self {
            Self::PlainText(text) => text,
            Self::Styled(styled) => &styled.text,
        }
    }

    /// Worth copying to the clipboard?
    pub fn is_copyable(&self) -> bool {
        let text = self.text();
        !text.is_empty() && text != PLACEHOLDER_DASH
    }
}

impl From<String> for CellValue {
    #[inline]
    fn from(text: String) -> Self {
        Self::PlainText(text)
    }
}

impl From<&str> for CellValue {
    #[inline]
    fn from(text: &str) -> Self {
        Self::PlainText(text.to_owned())
    }
}

impl From<StyledText> for CellValue {
    #[inline]
    fn from(styled: StyledText) -> Self {
        Self::Styled(styled)
    }
}

/// Per-column cell formatter: `(raw value, whole record) -> cell`.
pub type Formatter = Box<dyn Fn(&Value, &Record) -> CellValue>;

/// Produces the action buttons of a row.
pub type ActionsFn = Box<dyn Fn(&Record) -> Vec<ActionButton>>;

// ----------------------------------------------------------------------------

/// A host-defined button in the trailing action column of a row.
pub struct ActionButton {
    pub label: String,
    pub fill: Color32,
    pub text_color: Color32,

    /// Called with the row's record when the button is clicked.
    on_invoke: Option<Box<dyn Fn(&Record)>>,
}

impl ActionButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fill: Color32::from_rgb(59, 130, 246),
            text_color: Color32::WHITE,
            on_invoke: None,
        }
    }

    #[inline]
    pub fn fill(mut self, fill: Color32) -> Self {
        self.fill = fill;
        self
    }

    #[inline]
    pub fn text_color(mut self, text_color: Color32) -> Self {
        self.text_color = text_color;
        self
    }

    #[inline]
    pub fn on_invoke(mut self, on_invoke: impl Fn(&Record) + 'static) -> Self {
        self.on_invoke = Some(Box::new(on_invoke));
        self
    }

    /// Run the callback, if any. Returns `false` for a button without one.
    ///
    /// Errors inside the callback are the host's business.
    pub fn invoke(&self, record: &Record) -> bool {
        if let Some(on_invoke) = &self.on_invoke {
            on_invoke(record);
            true
        } else {
            false
        }
    }
}

impl std::fmt::Debug for ActionButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionButton")
            .field("label", &self.label)
            .field("fill", &self.fill)
            .field("text_color", &self.text_color)
            .field("on_invoke", &self.on_invoke.is_some())
            .finish()
    }
}
