//! Decoded metadata values and the containers that hold them.

/// A single metadata entry. Instrument readings come with a unit,
/// a few records are bare integers or text.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Quantity { value : f32, unit : String },
    Number(f32),
    Integer(i64),
    Text(String),
}

impl MetadataValue {
    pub fn quantity(value : f32, unit : &str) -> Self {
        MetadataValue::Quantity { value, unit : unit.to_string() }
    }

    /// Returns `(value, unit)` for a `Quantity`
    pub fn as_quantity(&self) -> Option<(f32, &str)> {
        match self {
            MetadataValue::Quantity { value, unit } => Some((*value, unit.as_str())),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetadataValue {
    fn fmt(&self, f : &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MetadataValue::Quantity { value, unit } if unit.is_empty() => write!(f, "{}", value),
            MetadataValue::Quantity { value, unit } => write!(f, "{} {}", value, unit),
            MetadataValue::Number(value) => write!(f, "{}", value),
            MetadataValue::Integer(value) => write!(f, "{}", value),
            MetadataValue::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Metadata entries in the order they were first seen in the file.
/// Names are unique: inserting an existing name replaces its value
/// in place, so the last record in the file wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries : Vec<(String, MetadataValue)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `name`, returning the value it replaced
    pub fn insert(&mut self, name : impl Into<String>, value : MetadataValue) -> Option<MetadataValue> {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name : &str) -> Option<&MetadataValue> {
        self.entries.iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Shortcut for `(value, unit)` entries
    pub fn quantity(&self, name : &str) -> Option<(f32, &str)> {
        self.get(name).and_then(MetadataValue::as_quantity)
    }

    pub fn contains(&self, name : &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The physical field of view of an image.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldOfView {
    /// No usable field of view record was found
    #[default]
    Unset,
    /// The file says there is none (`"none"` or a LEED image)
    Absent,
    /// Field of view in micrometers
    Micrometers(f64),
}

impl FieldOfView {
    pub const UNIT : &'static str = "µm";

    /// Returns `(magnitude, "µm")` if there is a numeric field of view
    pub fn magnitude(&self) -> Option<(f64, &'static str)> {
        match self {
            FieldOfView::Micrometers(value) => Some((*value, Self::UNIT)),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldOfView {
    fn fmt(&self, f : &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FieldOfView::Unset => write!(f, "unset"),
            FieldOfView::Absent => write!(f, "None"),
            FieldOfView::Micrometers(value) => write!(f, "{} {}", value, Self::UNIT),
        }
    }
}

/// How the camera combined frames into the stored image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Averaging {
    Disabled,
    Sliding,
    Frames(u8),
}

impl Averaging {
    pub fn from_byte(byte : u8) -> Self {
        match byte {
            0 => Averaging::Disabled,
            255 => Averaging::Sliding,
            n => Averaging::Frames(n),
        }
    }
}

impl std::fmt::Display for Averaging {
    fn fmt(&self, f : &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Averaging::Disabled => write!(f, "No Averaging"),
            Averaging::Sliding => write!(f, "Sliding Average"),
            Averaging::Frames(n) => write!(f, "{} frames", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins_in_place() {
        let mut metadata = Metadata::new();
        assert!(metadata.insert("Objective", MetadataValue::quantity(1.0, "V")).is_none());
        metadata.insert("Image Title", MetadataValue::Text("Au(111)".into()));
        let old = metadata.insert("Objective", MetadataValue::quantity(2.5, "V"));

        assert_eq!(old, Some(MetadataValue::quantity(1.0, "V")));
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.quantity("Objective"), Some((2.5, "V")));
        assert_eq!(metadata.keys().collect::<Vec<_>>(), vec!["Objective", "Image Title"]);
    }

    #[test]
    fn averaging_classification() {
        assert_eq!(Averaging::from_byte(0), Averaging::Disabled);
        assert_eq!(Averaging::from_byte(255), Averaging::Sliding);
        assert_eq!(Averaging::from_byte(42), Averaging::Frames(42));
    }

    #[test]
    fn fov_display() {
        assert_eq!(FieldOfView::Micrometers(12.5).to_string(), "12.5 µm");
        assert_eq!(FieldOfView::Absent.magnitude(), None);
        assert_eq!(FieldOfView::Micrometers(3.0).magnitude(), Some((3.0, "µm")));
    }
}
