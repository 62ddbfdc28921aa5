// ── Notifications ──
//
// Every operation reduces its outcome to at most one of these. Front ends
// decide how to render and dismiss them.

use std::time::Duration;

use strum::{Display, IntoStaticStr};

use crate::error::CoreError;

pub const CLINICA_ATUALIZADA: &str = "Clínica atualizada com sucesso.";
pub const CLINICA_CRIADA: &str = "Clínica criada com sucesso.";
pub const MEDICO_EXCLUIDO: &str = "Médico excluído.";
pub const MEDICO_CRIADO: &str = "Médico criado com sucesso.";
pub const MEDICO_ATUALIZADO: &str = "Médico atualizado com sucesso.";
pub const CLINICA_PENDENTE: &str =
    "A clínica não foi criada: adicione-a pela lista de médicos.";

/// How long an interactive front end keeps a notice on screen.
pub const AUTO_DISMISS: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A dismissible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl From<&CoreError> for Notice {
    fn from(err: &CoreError) -> Self {
        Self::error(err.display_message())
    }
}
