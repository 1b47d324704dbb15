// 📄 Document Entity - reports and statements ("documentos")

use serde::{Deserialize, Serialize};

use super::{require, Record, Searchable, Yearly};
use crate::format::month_name;
use crate::temporal::{Month, Year};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub titulo: String,

    /// Free-form type tag ("relatorio", "ata", "balanco", ...)
    pub tipo: String,

    pub ano: Year,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mes: Option<Month>,

    pub url: String,
}

impl Document {
    /// Type tag with the first letter capitalized, as shown in filters
    pub fn type_label(&self) -> String {
        capitalize(&self.tipo)
    }

    /// "Março de 2024" or just "2024"
    pub fn period_label(&self) -> String {
        match self.mes.and_then(|m| month_name(m.0)) {
            Some(name) => format!("{} de {}", name, self.ano),
            None => self.ano.to_string(),
        }
    }
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Record for Document {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("titulo", &self.titulo)?;
        require("tipo", &self.tipo)?;
        require("url", &self.url)
    }
}

impl Yearly for Document {
    fn year(&self) -> Year {
        self.ano
    }
}

impl Searchable for Document {
    // Documents have no body; only the title is searched
    fn search_fields(&self) -> Vec<&str> {
        vec![self.titulo.as_str()]
    }
}
