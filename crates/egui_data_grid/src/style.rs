use egui::{Color32, FontId, Vec2};
use enum_map::{Enum, EnumMap, enum_map};

/// The colored roles of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum GridColor {
    HeaderFill,
    HeaderBorder,
    HeaderText,
    Separator,
    RowEven,
    RowOdd,
    RowHovered,
    CellBorder,
    CellText,
    ActionCellFill,
    ButtonBorder,
    ButtonBorderHovered,
    CopyAckFill,
    CopyAckText,
    Background,
}

/// Literal colors and fonts of a grid.
///
/// There is no theme derivation: what you put in is what gets painted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct GridStyle {
    pub palette: EnumMap<GridColor, Color32>,

    /// Column labels. The default fonts have no bold face; register one and set it
    /// here for bold headers.
    pub header_font: FontId,
    pub cell_font: FontId,
    pub button_font: FontId,
    pub copy_ack_font: FontId,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            palette: enum_map! {
                GridColor::HeaderFill => Color32::from_rgb(229, 231, 235),
                GridColor::HeaderBorder => Color32::from_rgb(209, 213, 219),
                GridColor::HeaderText => Color32::from_rgb(55, 65, 81),
                GridColor::Separator => Color32::from_rgb(156, 163, 175),
                GridColor::RowEven => Color32::WHITE,
                GridColor::RowOdd => Color32::from_rgb(248, 250, 252),
                GridColor::RowHovered => Color32::from_rgb(224, 242, 254),
                GridColor::CellBorder => Color32::from_rgb(226, 232, 240),
                GridColor::CellText => Color32::from_rgb(31, 41, 55),
                GridColor::ActionCellFill => Color32::from_rgb(249, 250, 251),
                GridColor::ButtonBorder => Color32::from_rgb(209, 213, 219),
                GridColor::ButtonBorderHovered => Color32::from_rgb(29, 78, 216),
                GridColor::CopyAckFill => Color32::from_rgb(74, 222, 128),
                GridColor::CopyAckText => Color32::WHITE,
                GridColor::Background => Color32::WHITE,
            },
            header_font: FontId::proportional(13.0),
            cell_font: FontId::proportional(13.0),
            button_font: FontId::proportional(12.0),
            copy_ack_font: FontId::proportional(12.0),
        }
    }
}

impl GridStyle {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn color(&self, role: GridColor) -> Color32 {
        self.palette[role]
    }

    /// Override one palette entry.
    #[inline]
    pub fn with_color(mut self, role: GridColor, color: Color32) -> Self {
        self.palette[role] = color;
        self
    }

    #[inline]
    pub fn header_font(mut self, font: FontId) -> Self {
        self.header_font = font;
        self
    }

    #[inline]
    pub fn cell_font(mut self, font: FontId) -> Self {
        self.cell_font = font;
        self
    }

    #[inline]
    pub fn button_font(mut self, font: FontId) -> Self {
        self.button_font = font;
        self
    }
}

// ----------------------------------------------------------------------------

/// Fixed geometry of a grid, in points.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct GridMetrics {
    pub header_height: f32,
    pub row_height: f32,

    /// Left inset of left-aligned cell text.
    pub cell_padding: f32,

    /// Average glyph width used to estimate text width for truncation.
    pub avg_glyph_width: f32,

    /// Part of a column's width that text never uses.
    pub truncation_margin: f32,

    /// Width of the visible column separator.
    pub separator_width: f32,

    /// Half-width of the invisible grab region around a column boundary.
    pub boundary_grab_radius: f32,

    /// Width of each action button when a row has more than one.
    pub button_width: f32,

    /// Width of the action button when a row has exactly one.
    pub single_button_width: f32,
    pub button_gutter: f32,

    /// Vertical inset of action buttons inside their row.
    pub button_inset: f32,

    /// Where the copy acknowledgment appears relative to the pointer.
    pub copy_ack_offset: Vec2,

    /// Seconds before the copy acknowledgment dismisses itself.
    pub copy_ack_seconds: f64,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            header_height: 38.0,
            row_height: 42.0,
            cell_padding: 12.0,
            avg_glyph_width: 7.5,
            truncation_margin: 30.0,
            separator_width: 4.0,
            boundary_grab_radius: 18.0,
            button_width: 85.0,
            single_button_width: 100.0,
            button_gutter: 10.0,
            button_inset: 8.0,
            copy_ack_offset: Vec2::new(20.0, -10.0),
            copy_ack_seconds: 1.5,
        }
    }
}
