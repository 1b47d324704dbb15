// 📢 Notice Entity - published announcements ("avisos")
//
// A notice can be highlighted ("destaque") for the home page and may carry
// images, an enrollment period and a downloadable file.

use serde::{Deserialize, Serialize};

use super::{require, Dated, Record, Searchable};
use crate::temporal::IsoDate;

/// Downloadable file attached to a notice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub nome: String,
    pub tipo: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub titulo: String,
    pub conteudo: String,
    pub data_publicacao: IsoDate,

    /// Highlighted on the home page
    #[serde(default)]
    pub destaque: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagem: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imagens_adicionais: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periodo_inscricao: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentos: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arquivo: Option<Attachment>,
}

impl Notice {
    /// Body split into paragraphs, blank lines dropped
    pub fn paragraphs(&self) -> Vec<&str> {
        self.conteudo
            .split('\n')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Main image followed by the additional ones
    pub fn all_images(&self) -> Vec<&str> {
        self.imagem
            .iter()
            .chain(self.imagens_adicionais.iter())
            .map(String::as_str)
            .collect()
    }
}

impl Record for Notice {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("titulo", &self.titulo)?;
        if let Some(arquivo) = &self.arquivo {
            require("arquivo.url", &arquivo.url)?;
        }
        Ok(())
    }
}

impl Dated for Notice {
    fn primary_date(&self) -> &IsoDate {
        &self.data_publicacao
    }
}

impl Searchable for Notice {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.titulo.as_str(), self.conteudo.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_decodes_with_optional_fields_missing() {
        let notice: Notice = serde_json::from_value(serde_json::json!({
            "id": "1",
            "titulo": "Assembleia geral",
            "conteudo": "Primeiro parágrafo.\n\nSegundo parágrafo.",
            "dataPublicacao": "2024-03-01T10:00:00"
        }))
        .unwrap();

        assert!(!notice.destaque);
        assert!(notice.arquivo.is_none());
        assert_eq!(notice.paragraphs(), vec!["Primeiro parágrafo.", "Segundo parágrafo."]);
        assert!(notice.validate().is_ok());
    }

    #[test]
    fn test_notice_images_and_attachment() {
        let notice: Notice = serde_json::from_value(serde_json::json!({
            "id": "2",
            "titulo": "Edital",
            "conteudo": "Inscrições abertas",
            "dataPublicacao": "2024-04-10",
            "destaque": true,
            "imagem": "/img/capa.jpg",
            "imagensAdicionais": ["/img/a.jpg", "/img/b.jpg"],
            "arquivo": { "nome": "edital.pdf", "tipo": "pdf", "url": "" }
        }))
        .unwrap();

        assert_eq!(notice.all_images(), vec!["/img/capa.jpg", "/img/a.jpg", "/img/b.jpg"]);
        // Attachment without URL is not downloadable
        assert!(notice.validate().is_err());
    }
}
