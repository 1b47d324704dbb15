// 👥 Board Roster - executive board and fiscal council ("diretoria")
//
// Unlike the other resources this is a single object, not an array.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardMember {
    pub cargo: String,
    pub nome: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilMember {
    pub nome: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRoster {
    /// Term of office, e.g. "2023-2025"
    pub mandato: String,

    #[serde(default)]
    pub diretoria_executiva: Vec<BoardMember>,

    #[serde(default)]
    pub conselho_fiscal: Vec<CouncilMember>,

    #[serde(default)]
    pub suplentes_conselho_fiscal: Vec<CouncilMember>,
}

impl BoardRoster {
    pub fn member_count(&self) -> usize {
        self.diretoria_executiva.len()
            + self.conselho_fiscal.len()
            + self.suplentes_conselho_fiscal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_count() == 0
    }
}
