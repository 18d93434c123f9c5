//! Minimal model of a host form: just enough for the hooks to inject, hide,
//! disable and validate fields.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Host forms the hooks attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormId {
    /// Account edit form
    UserEdit,
    /// New account registration form
    UserRegister,
    /// Local username/password login form
    UserLogin,
    /// Password reset request form
    UserPass,
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormId::UserEdit => "user_edit",
            FormId::UserRegister => "user_register",
            FormId::UserLogin => "user_login",
            FormId::UserPass => "user_pass",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Textfield,
    Email,
    Password,
    /// Password plus confirmation
    PasswordConfirm,
    Link { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub kind: FieldKind,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Default value on render, submitted value on validate/submit
    #[serde(default)]
    pub value: Option<String>,
    /// Whether the field is rendered at all
    pub access: bool,
    /// Rendered but not editable
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub weight: i32,
}

impl FormField {
    pub fn new(kind: FieldKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: None,
            value: None,
            access: true,
            disabled: false,
            weight: 0,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }
}

/// Why a form was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// Submitted CAS username already belongs to another account
    UsernameTaken,
    /// A CAS policy flag forbids the action for this account
    Policy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormError {
    pub field: String,
    pub kind: RejectionKind,
    pub message: String,
    /// Where the user should go instead, if anywhere
    #[serde(default)]
    pub link: Option<String>,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    pub fields: BTreeMap<String, FormField>,
    /// Names of validators the host must run on submission
    #[serde(default)]
    pub validators: Vec<String>,
    #[serde(default)]
    pub errors: Vec<FormError>,
}

impl Form {
    pub fn new(id: FormId) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
            validators: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, field: FormField) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.get_mut(name)
    }

    pub fn insert_field(&mut self, name: impl Into<String>, field: FormField) {
        self.fields.insert(name.into(), field);
    }

    /// Trimmed value of a field, `None` when absent or blank.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|f| f.value.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Register a validator once, keeping registration order.
    pub fn add_validator(&mut self, name: &str) {
        if !self.validators.iter().any(|v| v == name) {
            self.validators.push(name.to_string());
        }
    }

    pub fn set_error(&mut self, error: FormError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors_for(&self, field: &str) -> impl Iterator<Item = &FormError> {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// Turn recorded errors into a result, for hosts that prefer `?`.
    pub fn check(&self) -> Result<(), super::HookError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(super::HookError::Rejected(self.errors.clone()))
        }
    }
}
