// 🗓️ Activity Entity - scheduled or past events ("atividades")
//
// Status is assigned by whoever edits the JSON; nothing here moves an
// activity from one status to another.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{require, Dated, HasStatus, Record, Scheduled, Searchable};
use crate::temporal::IsoDate;

// ============================================================================
// STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityStatus {
    #[serde(rename = "agendado")]
    Scheduled,

    #[serde(rename = "concluido")]
    Completed,

    #[serde(rename = "cancelado")]
    Cancelled,
}

impl ActivityStatus {
    pub const ALL: [ActivityStatus; 3] = [
        ActivityStatus::Scheduled,
        ActivityStatus::Completed,
        ActivityStatus::Cancelled,
    ];

    /// Wire value used in the JSON files
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Scheduled => "agendado",
            ActivityStatus::Completed => "concluido",
            ActivityStatus::Cancelled => "cancelado",
        }
    }

    /// Badge label
    pub fn label(&self) -> &'static str {
        match self {
            ActivityStatus::Scheduled => "Agendado",
            ActivityStatus::Completed => "Concluído",
            ActivityStatus::Cancelled => "Cancelado",
        }
    }

    /// Plural label used by the filter buttons
    pub fn plural_label(&self) -> &'static str {
        match self {
            ActivityStatus::Scheduled => "Agendadas",
            ActivityStatus::Completed => "Concluídas",
            ActivityStatus::Cancelled => "Canceladas",
        }
    }
}

impl FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "agendado" | "scheduled" => Ok(ActivityStatus::Scheduled),
            "concluido" | "concluído" | "completed" => Ok(ActivityStatus::Completed),
            "cancelado" | "cancelled" => Ok(ActivityStatus::Cancelled),
            other => Err(format!("unknown activity status '{}'", other)),
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// STATUS FILTER
// ============================================================================

/// Either every status (the "all" sentinel) or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ActivityStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: ActivityStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, StatusFilter::All)
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" | "todos" | "todas" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

// ============================================================================
// ACTIVITY ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub titulo: String,
    #[serde(default)]
    pub descricao: String,
    pub data_inicio: IsoDate,
    pub data_fim: IsoDate,
    #[serde(default)]
    pub local: String,
    pub status: ActivityStatus,
}

impl Activity {
    /// True when `day` falls inside `[start, end]`
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.data_inicio.day() <= day && day <= self.data_fim.day()
    }

    pub fn is_multi_day(&self) -> bool {
        self.data_inicio.day() != self.data_fim.day()
    }
}

impl Record for Activity {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("titulo", &self.titulo)?;
        if self.data_fim.day() < self.data_inicio.day() {
            return Err(format!(
                "dataFim {} is before dataInicio {}",
                self.data_fim, self.data_inicio
            ));
        }
        Ok(())
    }
}

impl Dated for Activity {
    fn primary_date(&self) -> &IsoDate {
        &self.data_inicio
    }
}

impl Searchable for Activity {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.titulo.as_str(), self.descricao.as_str()]
    }
}

impl Scheduled for Activity {
    fn start_day(&self) -> NaiveDate {
        self.data_inicio.day()
    }

    fn end_day(&self) -> NaiveDate {
        self.data_fim.day()
    }
}

impl HasStatus for Activity {
    fn status(&self) -> ActivityStatus {
        self.status
    }
}
