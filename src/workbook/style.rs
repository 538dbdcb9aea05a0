//! Fixed presentation attributes shared by the data sheets

/// Cell border; every styled cell uses a thin black outline on all four sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Border {
    Thin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
    pub wrap_text: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellStyle {
    pub border: Option<Border>,
    pub alignment: Option<Alignment>,
}

impl CellStyle {
    pub fn is_plain(&self) -> bool {
        self.border.is_none() && self.alignment.is_none()
    }
}

/// Thin border on all sides
pub const BORDER: Border = Border::Thin;

/// Left/bottom, wrapped: used for the utterance text column
pub const TEXT_ALIGN: Alignment = Alignment {
    horizontal: HorizontalAlign::Left,
    vertical: VerticalAlign::Bottom,
    wrap_text: true,
};

/// Style of an ordinary bordered cell
pub const BORDERED: CellStyle = CellStyle {
    border: Some(BORDER),
    alignment: None,
};

/// Style of an utterance text cell
pub const BORDERED_TEXT: CellStyle = CellStyle {
    border: Some(BORDER),
    alignment: Some(TEXT_ALIGN),
};

/// Width of the utterance text column
pub const TEXT_COLUMN_WIDTH: f64 = 90.71;

/// Minimum width of the global-name column
pub const GLOBAL_NAME_MIN_WIDTH: f64 = 18.0;
