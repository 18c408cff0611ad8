//! # Stencil - Text Templates with Strict Data Binding
//!
//! A small template engine for rendering plain-text and Markdown documents
//! from structured data. The syntax is a subset of Jinja2, and the engine
//! refuses to guess: a reference to data that is not there is an error
//! unless the caller opts into lenient rendering.
//!
//! ## Quick Example
//!
//! ```rust
//! use stencil::{render, RendererConfig};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data {
//!     summary: Vec<String>,
//! }
//!
//! let data = Data { summary: vec!["Built X".into(), "Led Y".into()] };
//! let out = render(
//!     "{% for s in summary %}- {{ s }}\n{% endfor %}",
//!     &data,
//!     &RendererConfig::new(),
//! ).unwrap();
//! assert_eq!(out, "- Built X\n- Led Y\n");
//! ```
//!
//! ## Template Syntax
//!
//! ```jinja
//! {# comments are dropped #}
//! {{ name | capitalize }}
//! {% for entry in experience %}
//!   {{ entry.role }} at {{ entry.company }}
//!   {%- for b in entry.bullets %}
//!   - {{ b }}
//!   {%- endfor %}
//! {% endfor %}
//! {% for category, items in skills.items() %}
//! **{{ category | capitalize }}:** {{ join(items, ", ") }}
//! {% endfor %}
//! {% if github %}GitHub: {{ github }}{% else %}no GitHub{% endif %}
//! ```
//!
//! - `-` inside a delimiter (`{%-`, `-%}`, `{{-`, `-}}`) strips whitespace on that side.
//! - `name(x, args)` is the same as `x | name(args)`.
//! - Inside a loop, `loop.index`, `loop.first`, `loop.last` and `loop.length` are bound.
//!
//! ## Rendering Model
//!
//! Templates are parsed once into a tree ([`ast::Node`]) and interpreted against
//! an explicit binding context ([`Context`]): the root data plus one frame per
//! active loop iteration. Filters and the undefined-variable policy live in a
//! [`RendererConfig`] value handed to every render; there is no global state.

pub mod ast;
pub mod context;
pub mod error;
pub mod filters;
pub mod parser;
mod render;

pub use context::{Context, Value};
pub use error::{Error, Result};
pub use filters::{FilterResult, RendererConfig, Undefined};

use ast::Node;
use render::Evaluator;
use serde::Serialize;
use std::collections::HashMap;

/// A parsed template, ready to be rendered any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parses template source. Syntax errors carry the line of the offending tag.
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self {
            nodes: parser::parse(source)?,
        })
    }

    /// Renders against a root value, which must be a mapping for any
    /// variable to resolve.
    pub fn render(&self, root: &Value, config: &RendererConfig) -> Result<String> {
        let mut ctx = Context::new(root);
        let mut out = String::new();
        Evaluator::new(config).render_nodes(&self.nodes, &mut ctx, &mut out)?;
        Ok(out)
    }

    /// Serializes `data` and renders against it.
    pub fn render_data<T: Serialize + ?Sized>(
        &self,
        data: &T,
        config: &RendererConfig,
    ) -> Result<String> {
        self.render(&Value::from_serialize(data)?, config)
    }

    /// Fails with [`Error::UnknownFilter`] for the first filter `config` lacks.
    pub fn check_filters(&self, config: &RendererConfig) -> Result<()> {
        match ast::filters_used(&self.nodes)
            .into_iter()
            .find(|(name, _)| !config.has_filter(name))
        {
            Some((name, line)) => Err(Error::UnknownFilter { name, line }),
            None => Ok(()),
        }
    }
}

/// Parses and renders a template in one go.
pub fn render<T: Serialize + ?Sized>(
    template: &str,
    data: &T,
    config: &RendererConfig,
) -> Result<String> {
    Template::parse(template)?.render_data(data, config)
}

/// A renderer with pre-registered templates.
///
/// Templates are compiled once when added and reused for every render.
///
/// # Example
///
/// ```rust
/// use stencil::{Renderer, RendererConfig};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Header { title: String }
///
/// let mut renderer = Renderer::new(RendererConfig::new());
/// renderer.add_template("header", "# {{ title | upper }}").unwrap();
///
/// let out = renderer.render("header", &Header { title: "cv".into() }).unwrap();
/// assert_eq!(out, "# CV");
/// ```
pub struct Renderer {
    config: RendererConfig,
    templates: HashMap<String, Template>,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            templates: HashMap::new(),
        }
    }

    /// Registers a named template.
    ///
    /// The template is parsed immediately; syntax errors and filters unknown
    /// to this renderer's config are reported here rather than at render time.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<()> {
        let template = Template::parse(source)?;
        template.check_filters(&self.config)?;
        self.templates.insert(name.to_string(), template);
        Ok(())
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Renders a registered template with the given data.
    ///
    /// # Errors
    ///
    /// Returns an error if the template name is not registered or rendering fails.
    pub fn render<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Result<String> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| Error::TemplateNotFound(name.to_string()))?;
        template.render_data(data, &self.config)
    }
}
