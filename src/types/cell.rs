use serde::{Deserialize, Serialize};

/// A single register cell: free-form text plus optional formatting overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// The display value
    #[serde(default)]
    pub value: String,
    /// Per-cell formatting overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatting: Option<CellFormatting>,
}

impl Cell {
    /// Create an unformatted cell
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            formatting: None,
        }
    }

    /// Create a cell with formatting
    pub fn with_formatting(value: impl Into<String>, formatting: CellFormatting) -> Self {
        Self {
            value: value.into(),
            formatting: Some(formatting),
        }
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Cell borders as CSS shorthand values (e.g. `"1px solid #000"`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Borders {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
}

impl Borders {
    /// Same border on every side
    pub fn all(border: &str) -> Self {
        Self {
            top: Some(border.to_string()),
            right: Some(border.to_string()),
            bottom: Some(border.to_string()),
            left: Some(border.to_string()),
        }
    }

    fn merge(&mut self, patch: &Borders) {
        merge_field(&mut self.top, &patch.top);
        merge_field(&mut self.right, &patch.right);
        merge_field(&mut self.bottom, &patch.bottom);
        merge_field(&mut self.left, &patch.left);
    }
}

/// Formatting overrides for a cell. Unset fields fall back to the host's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormatting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borders: Option<Borders>,
}

impl CellFormatting {
    pub fn bold() -> Self {
        Self {
            bold: Some(true),
            ..Default::default()
        }
    }

    pub fn with_background(mut self, color: &str) -> Self {
        self.background_color = Some(color.to_string());
        self
    }

    pub fn with_text_color(mut self, color: &str) -> Self {
        self.text_color = Some(color.to_string());
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge `patch` into `self`: every field set in the patch overwrites ours.
    /// Borders merge per side.
    pub fn merge(&mut self, patch: &CellFormatting) {
        merge_field(&mut self.bold, &patch.bold);
        merge_field(&mut self.italic, &patch.italic);
        merge_field(&mut self.underline, &patch.underline);
        merge_field(&mut self.font_size, &patch.font_size);
        merge_field(&mut self.font_family, &patch.font_family);
        merge_field(&mut self.text_color, &patch.text_color);
        merge_field(&mut self.background_color, &patch.background_color);
        merge_field(&mut self.text_align, &patch.text_align);
        if let Some(patch_borders) = &patch.borders {
            self.borders
                .get_or_insert_with(Borders::default)
                .merge(patch_borders);
        }
    }
}

fn merge_field<T: Clone>(target: &mut Option<T>, patch: &Option<T>) {
    if let Some(value) = patch {
        *target = Some(value.clone());
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn merge_overwrites_only_set_fields() {
        let mut base = CellFormatting::bold().with_text_color("#111111");
        let patch = CellFormatting {
            italic: Some(true),
            text_color: Some("#FF0000".into()),
            ..Default::default()
        };
        base.merge(&patch);

        assert_eq!(base.bold, Some(true));
        assert_eq!(base.italic, Some(true));
        assert_eq!(base.text_color.as_deref(), Some("#FF0000"));
    }

    #[test]
    fn merge_borders_per_side() {
        let mut base = CellFormatting {
            borders: Some(Borders::all("1px solid #000")),
            ..Default::default()
        };
        let patch = CellFormatting {
            borders: Some(Borders {
                bottom: Some("2px dashed red".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        base.merge(&patch);

        let borders = base.borders.unwrap();
        assert_eq!(borders.top.as_deref(), Some("1px solid #000"));
        assert_eq!(borders.bottom.as_deref(), Some("2px dashed red"));
    }

    #[test]
    fn deserialize_camel_case() {
        let cell: Cell = serde_json::from_str(
            r##"{"value":"Cash","formatting":{"fontSize":14,"backgroundColor":"#eee","textAlign":"center"}}"##,
        )
        .unwrap();
        let fmt = cell.formatting.unwrap();
        assert_eq!(fmt.font_size, Some(14.0));
        assert_eq!(fmt.background_color.as_deref(), Some("#eee"));
        assert_eq!(fmt.text_align, Some(TextAlign::Center));
    }

    #[test]
    fn missing_value_defaults_to_empty() {
        let cell: Cell = serde_json::from_str("{}").unwrap();
        assert_eq!(cell.value, "");
        assert!(cell.formatting.is_none());
    }
}
