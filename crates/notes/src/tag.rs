use modelkit_core::model_object;

/// A colored label attached to notes.
#[derive(Debug, Clone, Default)]
pub struct Tag {
    name: String,
    /// Packed `0xRRGGBB`.
    color: u32,
}

model_object!(Tag, "Tag", {
    name: String,
    color: u32,
});

impl Tag {
    pub fn new(name: impl Into<String>, color: u32) -> Self {
        Self {
            name: name.into(),
            color: color & 0x00ff_ffff,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    /// Color as `#rrggbb`.
    pub fn hex(&self) -> String {
        format!("#{:06x}", self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelkit_core::{ModelError, ModelObject, Value, write_property};

    #[test]
    fn new_masks_the_color_to_rgb() {
        let tag = Tag::new("urgent", 0xff12_3456);
        assert_eq!(tag.color(), 0x12_3456);
        assert_eq!(tag.hex(), "#123456");
    }

    #[test]
    fn tags_compare_by_name_and_color() {
        let a = Tag::new("home", 0x00aa00);
        assert!(a.is_equal_to_model_object(Some(&Tag::new("home", 0x00aa00))));
        assert!(!a.is_equal_to_model_object(Some(&Tag::new("home", 0x00aa01))));
    }

    #[test]
    fn color_writes_are_range_checked() {
        let mut tag = Tag::new("home", 0);
        let err = write_property(&mut tag, "color", Value::Int(-5)).unwrap_err();
        assert!(matches!(err, ModelError::OutOfRange(_)));
        assert_eq!(tag.color(), 0);
    }
}
