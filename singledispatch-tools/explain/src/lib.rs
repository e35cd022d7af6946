//! Dispatch Explainer
//!
//! Loads a type hierarchy and a list of registration keys, then reports,
//! for each concrete type, the order in which registrations are ranked and
//! which one a call on that type would run.
//!
//! # Example
//!
//! ```
//! use singledispatch_explain::{Explainer, Manifest};
//!
//! let manifest = Manifest::from_toml_str(r#"registrations = ["Sequence", "tuple"]"#).unwrap();
//! let explainer = Explainer::builtins(&manifest).unwrap();
//! let report = explainer.render_type("list").unwrap();
//! assert!(report.contains("selected: Sequence"));
//! ```

pub mod manifest;

use std::sync::Arc;

use singledispatch::{DispatchError, Dispatcher, Explanation, Hierarchy, Resolution};
use thiserror::Error;
use tracing::{debug, info};

pub use manifest::{Manifest, ManifestError, ManifestResult, TypeEntry};

const DEFAULT: &str = "<default>";

/// Errors raised while setting up or querying an [`Explainer`].
#[derive(Debug, Error)]
pub enum ExplainError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("registration rejected: {0}")]
    Registration(#[from] DispatchError),

    #[error("no type named `{0}`")]
    UnknownType(String),
}

/// Result type for the explainer.
pub type ExplainResult<T> = Result<T, ExplainError>;

/// A hierarchy plus a dispatcher whose implementations are the names of
/// the keys they were registered for.
#[derive(Debug)]
pub struct Explainer {
    hierarchy: Arc<Hierarchy>,
    dispatcher: Dispatcher<String>,
}

impl Explainer {
    /// Use the hierarchy the manifest declares.
    pub fn from_manifest(manifest: &Manifest) -> ExplainResult<Self> {
        let hierarchy = manifest.build_hierarchy()?;
        Self::new(hierarchy, manifest)
    }

    /// Use the builtin hierarchy; only the manifest's dispatch settings and
    /// registrations apply.
    pub fn builtins(manifest: &Manifest) -> ExplainResult<Self> {
        Self::new(Hierarchy::builtins(), manifest)
    }

    fn new(hierarchy: Hierarchy, manifest: &Manifest) -> ExplainResult<Self> {
        let hierarchy = Arc::new(hierarchy);
        let dispatcher = Dispatcher::with_config(
            "explain",
            Arc::clone(&hierarchy),
            DEFAULT.to_string(),
            manifest.dispatch.clone(),
        );
        for key in &manifest.registrations {
            dispatcher.register_named(key, key.clone())?;
        }
        info!(
            types = hierarchy.len(),
            registrations = manifest.registrations.len(),
            "loaded dispatch setup"
        );
        Ok(Self {
            hierarchy,
            dispatcher,
        })
    }

    /// The hierarchy under inspection.
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// The dispatcher under inspection.
    pub fn dispatcher(&self) -> &Dispatcher<String> {
        &self.dispatcher
    }

    /// Explain every concrete type, in declaration order.
    pub fn explain_all(&self) -> Vec<Explanation> {
        self.hierarchy
            .concrete_types()
            .map(|cls| self.dispatcher.explain(cls))
            .collect()
    }

    /// Explain one type by name.
    pub fn explain_type(&self, name: &str) -> ExplainResult<Explanation> {
        let cls = self
            .hierarchy
            .lookup(name)
            .ok_or_else(|| ExplainError::UnknownType(name.to_string()))?;
        Ok(self.dispatcher.explain(cls))
    }

    /// Name of the implementation a call on `name` would run.
    pub fn selected_for(&self, name: &str) -> String {
        self.dispatcher.dispatch_name(name)
    }

    /// Render one explanation as text.
    pub fn render(&self, explanation: &Explanation) -> String {
        let h = &*self.hierarchy;
        let label = if explanation.fallback {
            "fallback:"
        } else {
            "composed:"
        };
        let selected = explanation.selected.map_or(DEFAULT, |key| h.name(key));
        let outcome = match explanation.resolution {
            Resolution::Ambiguous { first, second } => format!(
                "{selected} (ambiguous between {} and {})",
                h.name(first),
                h.name(second)
            ),
            Resolution::Resolved(_) | Resolution::NoMatch => selected.to_string(),
        };

        let lines = [
            h.name(explanation.ty).to_string(),
            format!("  mro:      {}", h.names(&explanation.mro).join(", ")),
            format!("  {label} {}", h.names(&explanation.composed).join(", ")),
            format!("  selected: {outcome}"),
        ];
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Render every concrete type.
    pub fn render_all(&self) -> String {
        let explanations = self.explain_all();
        debug!(count = explanations.len(), "rendering report");
        explanations
            .iter()
            .map(|explanation| self.render(explanation))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render a single type by name.
    pub fn render_type(&self, name: &str) -> ExplainResult<String> {
        let explanation = self.explain_type(name)?;
        Ok(self.render(&explanation))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use singledispatch::AmbiguityPolicy;

    use super::*;

    fn manifest(registrations: &[&str]) -> Manifest {
        Manifest {
            registrations: registrations.iter().map(|s| s.to_string()).collect(),
            ..Manifest::default()
        }
    }

    #[test]
    fn test_render_tuple() {
        let explainer = Explainer::builtins(&manifest(&["Sequence", "tuple"])).unwrap();
        assert_eq!(
            explainer.render_type("tuple").unwrap(),
            "tuple\n\
             \x20 mro:      tuple, object\n\
             \x20 composed: tuple, Sequence, Reversible, Collection, Sized, Iterable, Container, object\n\
             \x20 selected: tuple\n"
        );
    }

    #[test]
    fn test_render_default() {
        let explainer = Explainer::builtins(&manifest(&["str"])).unwrap();
        let report = explainer.render_type("NoneType").unwrap();
        assert!(report.ends_with("  selected: <default>\n"));
        assert_eq!(explainer.selected_for("NoneType"), "<default>");
        assert_eq!(explainer.selected_for("str"), "str");
    }

    #[test]
    fn test_render_ambiguous() {
        let mut m = manifest(&["Sized", "Iterable"]);
        m.dispatch.ambiguity = AmbiguityPolicy::RegistrationOrder;
        let explainer = Explainer::builtins(&m).unwrap();
        let report = explainer.render_type("list").unwrap();
        assert!(report.contains("selected: Sized (ambiguous between Sized and Iterable)"));
    }

    #[test]
    fn test_rejected_registration() {
        let err = Explainer::builtins(&manifest(&["Sized", "Iterable"])).unwrap_err();
        assert!(matches!(
            err,
            ExplainError::Registration(DispatchError::Ambiguous { .. })
        ));
    }

    #[test]
    fn test_unknown_names() {
        let err = Explainer::builtins(&manifest(&["Frob"])).unwrap_err();
        assert!(matches!(
            err,
            ExplainError::Registration(DispatchError::UnknownTypeName(_))
        ));

        let explainer = Explainer::builtins(&manifest(&[])).unwrap();
        assert!(matches!(
            explainer.render_type("Frob"),
            Err(ExplainError::UnknownType(_))
        ));
    }

    #[test]
    fn test_explain_all_covers_concrete_types() {
        let explainer = Explainer::builtins(&manifest(&["object"])).unwrap();
        let all = explainer.explain_all();
        assert_eq!(all.len(), explainer.hierarchy().concrete_types().count());
        assert!(all.iter().all(|e| e.resolution == Resolution::Resolved(e.mro[e.mro.len() - 1])));
    }

    #[test]
    fn test_from_manifest() {
        let m = Manifest::from_toml_str(
            r#"
registrations = ["Drawable"]

[[type]]
name = "object"

[[type]]
name = "Drawable"
interface = true
bases = ["object"]
requires = ["draw"]

[[type]]
name = "Shape"
bases = ["object"]
provides = ["draw"]
"#,
        )
        .unwrap();
        let explainer = Explainer::from_manifest(&m).unwrap();
        assert_eq!(
            explainer.render_all(),
            "object\n\
             \x20 mro:      object\n\
             \x20 composed: object\n\
             \x20 selected: <default>\n\
             \n\
             Shape\n\
             \x20 mro:      Shape, object\n\
             \x20 composed: Shape, Drawable, object\n\
             \x20 selected: Drawable\n"
        );
    }
}
