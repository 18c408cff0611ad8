use super::{CmdResult, TEMPLATE_NAME};
use crate::config::UndefinedPolicy;
use crate::error::Result;
use crate::output::finalize_document;
use crate::source::RecordSource;
use stencil::{FilterResult, Renderer, RendererConfig, Value};

/// Engine config for resume templates: the built-in filters plus `unbold`.
pub fn renderer_config(policy: UndefinedPolicy) -> RendererConfig {
    RendererConfig::new()
        .with_filter("unbold", unbold)
        .undefined(policy.into())
}

/// Removes `**` emphasis markers, for plain-text outputs of Markdown bullets.
fn unbold(value: &Value, args: &[Value]) -> FilterResult {
    if !args.is_empty() {
        return Err(format!("takes no arguments, got {}", args.len()));
    }
    match value.to_text() {
        Some(text) => Ok(Value::String(text.replace("**", ""))),
        None => Err(format!("expected text, got a {}", value.kind())),
    }
}

/// Renders the document for one role without writing it anywhere.
pub fn render_role<S: RecordSource>(source: &S, renderer: &Renderer, role: &str) -> Result<String> {
    let record = source.get_record(role)?;
    let rendered = renderer.render(TEMPLATE_NAME, &record)?;
    Ok(finalize_document(&rendered))
}

pub fn run<S: RecordSource>(source: &S, renderer: &Renderer, role: &str) -> Result<CmdResult> {
    Ok(CmdResult::default().with_rendered(render_role(source, renderer, role)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResumeError;
    use crate::model::ResumeRecord;
    use crate::source::memory::InMemorySource;

    fn renderer(template: &str, policy: UndefinedPolicy) -> Renderer {
        let mut renderer = Renderer::new(renderer_config(policy));
        renderer.add_template(TEMPLATE_NAME, template).unwrap();
        renderer
    }

    fn source() -> InMemorySource {
        InMemorySource::new().with_record(
            "python",
            ResumeRecord {
                name: "Ada".into(),
                summary: vec!["Built **X**".into(), "Led Y".into()],
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_render_role() {
        let renderer = renderer(
            "# {{ name }}\n{% for s in summary %}- {{ s }}\n{% endfor %}\n\n",
            UndefinedPolicy::Strict,
        );
        let doc = render_role(&source(), &renderer, "python").unwrap();
        assert_eq!(doc, "# Ada\n- Built **X**\n- Led Y\n");
    }

    #[test]
    fn test_unbold_filter() {
        let renderer = renderer(
            "{% for s in summary %}{{ s | unbold }};{% endfor %}",
            UndefinedPolicy::Strict,
        );
        let doc = render_role(&source(), &renderer, "python").unwrap();
        assert_eq!(doc, "Built X;Led Y;\n");
    }

    #[test]
    fn test_unknown_role() {
        let renderer = renderer("{{ name }}", UndefinedPolicy::Strict);
        let err = render_role(&source(), &renderer, "java").unwrap_err();
        assert!(matches!(err, ResumeError::NotFound(_)));
    }

    #[test]
    fn test_missing_field_policy() {
        let strict = renderer("{{ name }}{{ nickname }}", UndefinedPolicy::Strict);
        let err = render_role(&source(), &strict, "python").unwrap_err();
        assert!(matches!(
            err,
            ResumeError::Render(stencil::Error::Undefined { .. })
        ));

        let lenient = renderer("{{ name }}{{ nickname }}", UndefinedPolicy::Lenient);
        assert_eq!(render_role(&source(), &lenient, "python").unwrap(), "Ada\n");
    }

    #[test]
    fn test_run_returns_document() {
        let renderer = renderer("{{ name }}", UndefinedPolicy::Strict);
        let result = run(&source(), &renderer, "python").unwrap();
        assert_eq!(result.rendered.as_deref(), Some("Ada\n"));
        assert!(result.is_success());
    }
}
