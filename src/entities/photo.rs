// 📷 Photo Entity - gallery pictures ("galeria")
//
// `ano`/`mes` are kept for the admin export format; grouping uses `data`,
// so a record whose `ano`/`mes` disagree with `data` is rejected.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::{require, Dated, Record, Searchable};
use crate::temporal::{IsoDate, Month, Year};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub titulo: String,
    #[serde(default)]
    pub descricao: String,
    pub data: IsoDate,
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ano: Option<Year>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mes: Option<Month>,
}

impl Record for Photo {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("titulo", &self.titulo)?;
        require("url", &self.url)?;

        let day = self.data.day();
        if let Some(Year(ano)) = self.ano {
            if ano != day.year() {
                return Err(format!("ano {} does not match data {}", ano, self.data.as_str()));
            }
        }
        if let Some(Month(mes)) = self.mes {
            if mes != day.month() {
                return Err(format!("mes {} does not match data {}", mes, self.data.as_str()));
            }
        }
        Ok(())
    }
}

impl Dated for Photo {
    fn primary_date(&self) -> &IsoDate {
        &self.data
    }
}

impl Searchable for Photo {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.titulo.as_str(), self.descricao.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(data: &str, ano: &str, mes: &str) -> Photo {
        serde_json::from_value(serde_json::json!({
            "id": "p1",
            "titulo": "Festa junina",
            "data": data,
            "url": "/data/imagens/festa.jpg",
            "ano": ano,
            "mes": mes
        }))
        .unwrap()
    }

    #[test]
    fn test_photo_period_matches_date() {
        assert!(photo("2024-06-15", "2024", "6").validate().is_ok());

        let bare: Photo = serde_json::from_value(serde_json::json!({
            "id": "p2",
            "titulo": "Assembleia",
            "data": "2024-03-02",
            "url": "/data/imagens/assembleia.jpg"
        }))
        .unwrap();
        assert!(bare.validate().is_ok());
    }

    #[test]
    fn test_photo_rejects_period_out_of_step_with_date() {
        let wrong_year = photo("2024-06-15", "2023", "6").validate().unwrap_err();
        assert!(wrong_year.contains("ano"));

        let wrong_month = photo("2024-06-15", "2024", "7").validate().unwrap_err();
        assert!(wrong_month.contains("mes"));
    }
}
