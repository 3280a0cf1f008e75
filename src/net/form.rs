//! Captured form submissions.
//!
//! When a form submit is intercepted the embedder hands over a [`CapturedForm`]: the
//! form's controls plus the submit control that triggered it. [`FormData::from_form`]
//! builds the payload the way a browser does: named, enabled, successful controls in
//! document order, no submit controls, and then the triggering control's name/value
//! appended.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File {
        filename: String,
        content_type: String,
        data: Vec<u8>,
    },
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Text-like inputs, selects and textareas
    Value,
    /// Checkboxes and radios; only submitted when checked
    Checkable { checked: bool },
    /// Submit buttons and `input[type=submit]`
    Submit,
}

/// A single form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
    pub kind: FieldKind,
    pub disabled: bool,
}

impl FormField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
            kind: FieldKind::Value,
            disabled: false,
        }
    }

    pub fn checkbox(name: impl Into<String>, value: impl Into<String>, checked: bool) -> Self {
        Self {
            kind: FieldKind::Checkable { checked },
            ..Self::text(name, value)
        }
    }

    pub fn submit(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Submit,
            ..Self::text(name, value)
        }
    }

    fn is_successful(&self) -> bool {
        if self.name.is_empty() || self.disabled {
            return false;
        }
        match self.kind {
            FieldKind::Value => true,
            FieldKind::Checkable { checked } => checked,
            FieldKind::Submit => false,
        }
    }
}

/// A form submission captured by the embedder and pending navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedForm {
    /// The form's `action` attribute
    pub action: Option<String>,
    pub fields: Vec<FormField>,
    /// The submit control that triggered the submission, if any
    pub submitter: Option<FormField>,
}

impl CapturedForm {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Default::default()
        }
    }

    pub fn field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn submitted_by(mut self, submitter: FormField) -> Self {
        self.submitter = Some(submitter);
        self
    }
}

/// Ordered form entries. The fetcher sends them as `multipart/form-data`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_form(form: &CapturedForm) -> Self {
        let mut data = Self::new();
        for field in form.fields.iter().filter(|f| f.is_successful()) {
            data.append(field.name.clone(), field.value.clone());
        }

        if let Some(submitter) = &form.submitter {
            if !submitter.name.is_empty() && !submitter.disabled {
                data.append(submitter.name.clone(), submitter.value.clone());
            }
        }
        data
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<FormValue>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn entries(&self) -> &[(String, FormValue)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
