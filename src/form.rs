//! Local editable form state for the add/edit detail view.

use crate::models::today;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Defaults to today's date.
    Date,
}

/// Static description of one form input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(label: &'static str, placeholder: &'static str, required: bool) -> Self {
        Self {
            label,
            placeholder,
            required,
            kind: FieldKind::Text,
        }
    }

    pub const fn date(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            required: false,
            kind: FieldKind::Date,
        }
    }

    fn default_value(&self) -> String {
        match self.kind {
            FieldKind::Text => String::new(),
            FieldKind::Date => today(),
        }
    }
}

/// Text inputs plus the cover-file path input, with a focus cursor.
///
/// Focus index `specs.len()` is the file input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState {
    specs: &'static [FieldSpec],
    values: Vec<String>,
    file_input: String,
    focus: usize,
}

impl FormState {
    pub fn new(specs: &'static [FieldSpec]) -> Self {
        Self {
            specs,
            values: specs.iter().map(FieldSpec::default_value).collect(),
            file_input: String::new(),
            focus: 0,
        }
    }

    /// Reset every input to its default.
    pub fn clear(&mut self) {
        *self = Self::new(self.specs);
    }

    pub fn specs(&self) -> &'static [FieldSpec] {
        self.specs
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn value(&self, idx: usize) -> &str {
        self.values.get(idx).map(String::as_str).unwrap_or("")
    }

    /// Value of the field labelled `label`.
    pub fn value_of(&self, label: &str) -> &str {
        self.specs
            .iter()
            .position(|s| s.label == label)
            .map(|idx| self.value(idx))
            .unwrap_or("")
    }

    pub fn set_value(&mut self, idx: usize, value: impl Into<String>) {
        if let Some(slot) = self.values.get_mut(idx) {
            *slot = value.into();
        }
    }

    /// Replace all text values, in field order. Missing trailing values
    /// fall back to defaults.
    pub fn hydrate(&mut self, values: Vec<String>) {
        let mut values = values.into_iter();
        for (slot, spec) in self.values.iter_mut().zip(self.specs) {
            *slot = values.next().unwrap_or_else(|| spec.default_value());
        }
        self.file_input.clear();
    }

    pub fn file_input(&self) -> &str {
        &self.file_input
    }

    pub fn set_file_input(&mut self, path: impl Into<String>) {
        self.file_input = path.into();
    }

    /// Labels of required fields that are blank.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.specs
            .iter()
            .zip(&self.values)
            .filter(|(spec, value)| spec.required && value.trim().is_empty())
            .map(|(spec, _)| spec.label)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn is_file_focused(&self) -> bool {
        self.focus == self.specs.len()
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (self.specs.len() + 1);
    }

    pub fn focus_prev(&mut self) {
        if self.focus == 0 {
            self.focus = self.specs.len();
        } else {
            self.focus -= 1;
        }
    }

    fn focused_buffer(&mut self) -> &mut String {
        if self.focus < self.values.len() {
            &mut self.values[self.focus]
        } else {
            &mut self.file_input
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.focused_buffer().push(c);
    }

    pub fn pop_char(&mut self) {
        self.focused_buffer().pop();
    }
}
