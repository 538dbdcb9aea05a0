//==============================================================================
// Coding Scheme Types
//==============================================================================

/// Which data sheet a property is scored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Scored once per utterance: one column on the interview sheet
    Coding,
    /// Scored once per interview: one row on the global sheet
    Global,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Coding => "coding",
            PropertyKind::Global => "global",
        }
    }
}

/// Declared type of a property's values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Numeric { decimal_digits: u32 },
    Text,
}

impl DataType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Numeric { .. })
    }

    /// Human-readable name of the materialized representation
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::Numeric { decimal_digits: 0 } => "integer",
            DataType::Numeric { .. } => "decimal number",
            DataType::Text => "text",
        }
    }
}

/// One legal value of a property
///
/// `value` is kept as text; it is interpreted according to the owning property's
/// [`DataType`] when it is written to a reference sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyValue {
    pub value: String,
    pub description: String,
    pub value_id: String,
    pub property_id: String,
}

impl PropertyValue {
    pub fn new(
        value: impl Into<String>,
        description: impl Into<String>,
        value_id: impl Into<String>,
        property_id: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            description: description.into(),
            value_id: value_id.into(),
            property_id: property_id.into(),
        }
    }
}

/// A codeable dimension with an enumerated set of legal values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub id: String,
    pub display_name: String,
    pub kind: PropertyKind,
    pub data_type: DataType,
    values: Vec<PropertyValue>,
}

impl Property {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        kind: PropertyKind,
        data_type: DataType,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind,
            data_type,
            values: Vec::new(),
        }
    }

    pub fn coding(id: impl Into<String>, display_name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(id, display_name, PropertyKind::Coding, data_type)
    }

    pub fn global(id: impl Into<String>, display_name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(id, display_name, PropertyKind::Global, data_type)
    }

    /// Append a legal value; its owning property id is taken from `self`
    pub fn add_value(&mut self, value: impl Into<String>, description: impl Into<String>, value_id: impl Into<String>) {
        let value = PropertyValue::new(value, description, value_id, self.id.clone());
        self.values.push(value);
    }

    /// Builder-style variant of [`Property::add_value`]
    pub fn with_value(
        mut self,
        value: impl Into<String>,
        description: impl Into<String>,
        value_id: impl Into<String>,
    ) -> Self {
        self.add_value(value, description, value_id);
        self
    }

    pub fn values(&self) -> &[PropertyValue] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertyValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

}

impl<'a> IntoIterator for &'a Property {
    type Item = &'a PropertyValue;
    type IntoIter = std::slice::Iter<'a, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Parsed coding-scheme configuration
///
/// Properties are filed by their [`PropertyKind`], so a property's list and its
/// tag always agree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodingScheme {
    coding_properties: Vec<Property>,
    global_properties: Vec<Property>,
}

impl CodingScheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property to the list matching its kind
    pub fn add_property(&mut self, property: Property) {
        match property.kind {
            PropertyKind::Coding => self.coding_properties.push(property),
            PropertyKind::Global => self.global_properties.push(property),
        }
    }

    pub fn coding_properties(&self) -> &[Property] {
        &self.coding_properties
    }

    pub fn global_properties(&self) -> &[Property] {
        &self.global_properties
    }

    /// Coding properties followed by global properties, in configuration order
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.coding_properties
            .iter()
            .chain(self.global_properties.iter())
    }
}

impl FromIterator<Property> for CodingScheme {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        let mut scheme = CodingScheme::new();
        for property in iter {
            scheme.add_property(property);
        }
        scheme
    }
}

//==============================================================================
// Interview Types
//==============================================================================

/// A single coded unit of the interview transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub line_number: u32,
    pub utterance_number: u32,
    pub speaker_role: String,
    pub text: String,
}

impl Utterance {
    pub fn new(
        line_number: u32,
        utterance_number: u32,
        speaker_role: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            utterance_number,
            speaker_role: speaker_role.into(),
            text: text.into(),
        }
    }
}

/// Parsed interview: utterances in transcript order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interview {
    pub name: String,
    pub utterances: Vec<Utterance>,
}

impl Interview {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            utterances: Vec::new(),
        }
    }

    pub fn add_utterance(&mut self, utterance: Utterance) {
        self.utterances.push(utterance);
    }
}
