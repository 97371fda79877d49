//! Item and folder classification

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Outlook item class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// `olMail`
    #[default]
    Email,
    /// `olAppointment`
    Event,
    /// `olContact`
    Contact,
    /// `olTask`
    Task,
    /// `olNote`
    Note,
    /// Anything else (meeting requests, reports, ...)
    Unknown,
}

impl ItemKind {
    /// Values accepted by the `type` filter.
    pub const FILTERABLE: [Self; 4] = [Self::Email, Self::Event, Self::Contact, Self::Task];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Event => "event",
            Self::Contact => "contact",
            Self::Task => "task",
            Self::Note => "note",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a `type` filter value (case-insensitive).
    pub fn parse_filter(value: &str) -> CoreResult<Self> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::FILTERABLE
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "unknown type '{value}', expected one of: email, event, contact, task"
                ))
            })
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default item type of a folder (`Folder.DefaultItemType`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FolderKind {
    #[default]
    Mail,
    Calendar,
    Contact,
    Task,
    Journal,
    Note,
    Post,
    Unknown,
}

impl FolderKind {
    /// Folder kinds that hold filterable items.
    #[must_use]
    pub const fn is_filterable(self) -> bool {
        matches!(self, Self::Mail | Self::Calendar | Self::Contact | Self::Task)
    }
}

/// Task progress (`TaskItem.Status`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Complete,
    Waiting,
    Deferred,
}

impl TaskStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::InProgress => "In progress",
            Self::Complete => "Complete",
            Self::Waiting => "Waiting",
            Self::Deferred => "Deferred",
        }
    }
}

/// Calendar free/busy state (`AppointmentItem.BusyStatus`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyStatus {
    Free,
    Tentative,
    #[default]
    Busy,
    OutOfOffice,
}

impl BusyStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Tentative => "Tentative",
            Self::Busy => "Busy",
            Self::OutOfOffice => "Out of Office",
        }
    }
}

/// Message importance (`olImportance*`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    #[default]
    Normal,
    High,
}

impl Importance {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
        }
    }
}
