//! Transformation facade: parsed document in, artifacts bundle out
//!
//! No I/O and no branching of its own; any structural failure of the model
//! propagates unchanged and no partial result is produced.

use tracing::{debug, instrument};

use crate::domain::{
    collect_attributes, extract_presets, materialize_fields, model_tree, ConfigurableModel,
    DomainResult, Field, Preset, UnresolvedReference, XmlElement,
};

/// Everything the artifact writers need from one model.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Resolved default language code
    pub language: String,
    pub presets: Vec<Preset>,
    pub fields: Vec<Field>,
    /// Selection attributes that had no configuration entry
    pub unresolved: Vec<UnresolvedReference>,
    /// Typed model, kept for display
    pub model: ConfigurableModel,
    /// The parsed document as read
    pub raw_tree: XmlElement,
}

#[instrument(skip_all)]
pub fn transform(document: XmlElement, fallback_language: &str) -> DomainResult<TransformOutput> {
    let model = ConfigurableModel::from_document(&document, fallback_language)?;
    debug!(
        "Parsing SMART Configurable Model into the following tree:\n{}",
        model_tree(&model)
    );

    let presets = extract_presets(&model.nodes);
    let attributes = collect_attributes(&model.nodes);
    let field_set = materialize_fields(&attributes, &model.attribute_configs);

    Ok(TransformOutput {
        language: model.language.clone(),
        presets,
        fields: field_set.fields,
        unresolved: field_set.unresolved,
        model,
        raw_tree: document,
    })
}
