//! Site description endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use quire_content::{Section, TemplateRegistry, load_templates};
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /{site}.
#[derive(Serialize)]
pub(crate) struct SiteResponse {
    id: String,
    title: String,
    sections: Vec<Section>,
    templates: TemplateRegistry,
}

/// Handle GET /{site}.
pub(crate) async fn get_site(
    Path(site_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SiteResponse>, ServerError> {
    let site = state.content.load_site(&site_id)?;
    let templates = load_templates(&site)?;

    Ok(Json(SiteResponse {
        id: site.id().to_owned(),
        title: site.title().to_owned(),
        sections: site.sections().to_vec(),
        templates,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_response_serialization() {
        let response = SiteResponse {
            id: "blog".to_owned(),
            title: "My Blog".to_owned(),
            sections: vec![Section {
                label: "Posts".to_owned(),
                path: "posts".to_owned(),
                pattern: "*".to_owned(),
                extension: ".md".to_owned(),
                templates: vec!["post".to_owned()],
            }],
            templates: TemplateRegistry::new(),
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["sections"][0]["match"], "*");
        assert_eq!(json["sections"][0]["extension"], ".md");
        assert_eq!(json["sections"][0]["templates"][0], "post");
        assert!(json["templates"].as_object().unwrap().is_empty());
    }
}
