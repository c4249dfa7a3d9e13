use crate::core::forms::{TextForm, UrlForm};
use crate::core::vcard::{to_vcard_with, Escaping};
use crate::domain::model::{ContactRecord, Mode, QrPayload};
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Input of exactly one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputForm {
    Url(UrlForm),
    Text(TextForm),
    Contact(ContactRecord),
}

impl InputForm {
    /// Blank form for `mode`.
    pub fn empty(mode: Mode) -> Self {
        match mode {
            Mode::Url => Self::Url(UrlForm::default()),
            Mode::Text => Self::Text(TextForm::default()),
            Mode::Contact => Self::Contact(ContactRecord::default()),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::Url(_) => Mode::Url,
            Self::Text(_) => Mode::Text,
            Self::Contact(_) => Mode::Contact,
        }
    }

    /// Validates the form and builds its payload: the raw URL, the raw text,
    /// or the serialized vCard.
    pub fn to_payload(&self, escaping: Escaping) -> Result<QrPayload> {
        self.validate()?;
        let payload = match self {
            Self::Url(form) => QrPayload::new(form.url.as_str()),
            Self::Text(form) => QrPayload::new(form.text.as_str()),
            Self::Contact(record) => QrPayload::new(to_vcard_with(record, escaping)),
        };
        tracing::debug!("Built {} payload ({} bytes)", self.mode(), payload.len());
        Ok(payload)
    }
}

impl Validate for InputForm {
    fn validate(&self) -> Result<()> {
        match self {
            Self::Url(form) => form.validate(),
            Self::Text(form) => form.validate(),
            Self::Contact(record) => record.validate(),
        }
    }
}

impl From<UrlForm> for InputForm {
    fn from(form: UrlForm) -> Self {
        Self::Url(form)
    }
}

impl From<TextForm> for InputForm {
    fn from(form: TextForm) -> Self {
        Self::Text(form)
    }
}

impl From<ContactRecord> for InputForm {
    fn from(record: ContactRecord) -> Self {
        Self::Contact(record)
    }
}

/// The single active form. Modes never share in-progress input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    active: InputForm,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(Mode::Url)
    }
}

impl FormState {
    pub fn new(mode: Mode) -> Self {
        Self {
            active: InputForm::empty(mode),
        }
    }

    pub fn mode(&self) -> Mode {
        self.active.mode()
    }

    /// Switching to another mode discards the current input; re-selecting the
    /// active mode keeps it.
    pub fn switch_mode(&mut self, mode: Mode) {
        if self.active.mode() != mode {
            tracing::debug!("Switching input mode {} -> {}", self.active.mode(), mode);
            self.active = InputForm::empty(mode);
        }
    }

    pub fn active(&self) -> &InputForm {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut InputForm {
        &mut self.active
    }

    /// Replaces the active input, switching mode if needed.
    pub fn set(&mut self, form: impl Into<InputForm>) {
        self.active = form.into();
    }
}
