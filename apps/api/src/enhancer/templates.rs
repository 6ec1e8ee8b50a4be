//! HTML résumé templates stored as `<templates_dir>/<id>.html`.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub id: String,
    pub label: String,
}

/// Numeric templates, sorted by id. A missing directory yields an empty list.
pub async fn list_templates(dir: &Path) -> Result<Vec<TemplateInfo>, AppError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(AppError::Internal(e.into())),
    };

    let mut ids: Vec<u64> = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::Internal(e.into()))?
    {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(stem) = html_stem(name) else { continue };
        if let Ok(id) = stem.parse::<u64>() {
            if stem.chars().all(|c| c.is_ascii_digit()) {
                ids.push(id);
            }
        }
    }
    ids.sort_unstable();
    ids.dedup();

    Ok(ids
        .into_iter()
        .map(|id| TemplateInfo {
            id: id.to_string(),
            label: format!("Template {id}"),
        })
        .collect())
}

pub async fn load_template(dir: &Path, template_id: &str) -> Result<String, AppError> {
    let path = template_path(dir, template_id)?;
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Ok(html),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(format!(
            "HTML template '{template_id}' not found"
        ))),
        Err(e) => Err(AppError::Internal(e.into())),
    }
}

/// Template ids are plain alphanumerics, which keeps lookups inside `dir`.
fn template_path(dir: &Path, template_id: &str) -> Result<PathBuf, AppError> {
    let id = template_id.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::Validation(format!(
            "Invalid template id '{template_id}'"
        )));
    }
    Ok(dir.join(format!("{id}.html")))
}

fn html_stem(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    ext.eq_ignore_ascii_case("html").then_some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_templates_numeric_only_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["10.html", "2.html", "1.HTML", "modern.html", "3.txt", "-4.html"] {
            std::fs::write(dir.path().join(name), "<html></html>").unwrap();
        }
        let items = list_templates(dir.path()).await.unwrap();
        let ids: Vec<&str> = items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "10"]);
        assert_eq!(items[2].label, "Template 10");
    }

    #[tokio::test]
    async fn test_missing_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let items = list_templates(&dir.path().join("absent")).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_load_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1.html"), "<html>{{ full_name }}</html>").unwrap();

        let html = load_template(dir.path(), "1").await.unwrap();
        assert!(html.contains("{{ full_name }}"));

        assert!(matches!(
            load_template(dir.path(), "7").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            load_template(dir.path(), "../secrets").await,
            Err(AppError::Validation(_))
        ));
    }
}
