//! Top-down text layout for the single-page screening report.
//!
//! Every line is placed at the current cursor and the cursor moves down by a
//! fixed step. There is no overflow handling: content that runs past the
//! bottom margin is still placed, below the visible page.

use serde_json::Value;

use crate::domain::{AnalysisResult, Finding, HazardLayer};
use crate::findings::MAX_ATTRIBUTES;

/// US Letter, in points.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 72.0;

pub const TITLE: &str = "Rapid Geotechnical & Seismic Analyzer";
pub const SECTION_HEADER: &str = "Preliminary Screening Results";
pub const DISCLAIMER: [&str; 3] = [
    "Notes:",
    "1) Rapid, informational screening using public datasets; accuracy varies.",
    "2) Not a substitute for site-specific geotechnical investigation or regulatory review.",
];

const LINE_STEP: f32 = 14.0;
const NOTES_GAP: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Oblique,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Oblique];

    /// Name of the font in the page resource dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Oblique => "F3",
        }
    }

    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Oblique => "Helvetica-Oblique",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f32,
}

const TITLE_STYLE: TextStyle = TextStyle {
    font: Font::Bold,
    size: 16.0,
};
const BODY_STYLE: TextStyle = TextStyle {
    font: Font::Regular,
    size: 12.0,
};
const HEADER_STYLE: TextStyle = TextStyle {
    font: Font::Bold,
    size: 13.0,
};
const FINDING_STYLE: TextStyle = TextStyle {
    font: Font::Regular,
    size: 11.0,
};
const NOTE_STYLE: TextStyle = TextStyle {
    font: Font::Oblique,
    size: 9.0,
};

/// A line of text at an absolute page position (PDF user space, origin
/// bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub style: TextStyle,
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// Vertical write position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub y: f32,
}

impl Cursor {
    pub fn top() -> Self {
        Self {
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    pub fn advance(self, step: f32) -> Self {
        Self { y: self.y - step }
    }
}

fn place(
    lines: &mut Vec<TextLine>,
    cursor: Cursor,
    style: TextStyle,
    text: String,
    step: f32,
) -> Cursor {
    lines.push(TextLine {
        style,
        x: MARGIN,
        y: cursor.y,
        text,
    });
    cursor.advance(step)
}

/// Render an attribute value the way it reads in the report.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn place_finding(
    lines: &mut Vec<TextLine>,
    cursor: Cursor,
    layer: HazardLayer,
    finding: &Finding,
) -> Cursor {
    let status = format!("- {}: {}", layer.label(), finding.status().as_str());
    let cursor = place(lines, cursor, FINDING_STYLE, status, LINE_STEP);

    if !finding.hit {
        return cursor;
    }

    finding
        .attributes
        .iter()
        .take(MAX_ATTRIBUTES)
        .fold(cursor, |cursor, (key, value)| {
            let bullet = format!("    • {}: {}", key, format_value(value));
            place(lines, cursor, FINDING_STYLE, bullet, LINE_STEP)
        })
}

/// Lay out the whole report, top to bottom.
pub fn layout(result: &AnalysisResult) -> Vec<TextLine> {
    let mut lines = Vec::new();

    let cursor = place(&mut lines, Cursor::top(), TITLE_STYLE, TITLE.to_string(), 22.0);
    let cursor = place(
        &mut lines,
        cursor,
        BODY_STYLE,
        format!("Address: {}", result.address),
        16.0,
    );
    let cursor = place(
        &mut lines,
        cursor,
        BODY_STYLE,
        format!(
            "Coordinates (WGS84): {:.6}, {:.6}",
            result.coordinate.lat, result.coordinate.lon
        ),
        24.0,
    );
    let cursor = place(
        &mut lines,
        cursor,
        HEADER_STYLE,
        SECTION_HEADER.to_string(),
        16.0,
    );

    let cursor = result
        .findings
        .iter()
        .fold(cursor, |cursor, (layer, finding)| {
            place_finding(&mut lines, cursor, layer, finding)
        });

    DISCLAIMER
        .iter()
        .fold(cursor.advance(NOTES_GAP), |cursor, note| {
            place(&mut lines, cursor, NOTE_STYLE, note.to_string(), LINE_STEP)
        });

    lines
}
