//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! resumegen operation. It owns the record source, the renderer with the resume
//! template registered, and the output writer, and dispatches each call to the
//! matching `commands::*::run`.
//!
//! The facade does no I/O of its own beyond what the commands do: nothing is
//! printed and no process exit codes are decided here. Callers get a
//! [`CmdResult`] back and present it however they like.
//!
//! `ResumeApi<S: RecordSource>` is generic over the data source:
//! - Production: `ResumeApi<YamlSource>`
//! - Testing: `ResumeApi<InMemorySource>`

use crate::commands::{self, TEMPLATE_NAME};
use crate::error::Result;
use crate::output::OutputWriter;
use crate::source::RecordSource;
use std::path::Path;
use stencil::{Renderer, RendererConfig};

pub use crate::commands::{BatchReport, CmdMessage, CmdResult, MessageLevel};

pub struct ResumeApi<S: RecordSource> {
    source: S,
    renderer: Renderer,
    writer: OutputWriter,
}

impl<S: RecordSource> ResumeApi<S> {
    /// Parses `template` up front, so syntax errors and unknown filters surface
    /// before any role is rendered.
    pub fn new(
        source: S,
        template: &str,
        config: RendererConfig,
        writer: OutputWriter,
    ) -> Result<Self> {
        let mut renderer = Renderer::new(config);
        renderer.add_template(TEMPLATE_NAME, template)?;
        Ok(Self {
            source,
            renderer,
            writer,
        })
    }

    /// Builds the given roles, continuing past failures.
    pub fn build<R: AsRef<str>>(&self, roles: &[R]) -> Result<CmdResult> {
        commands::build::run(&self.source, &self.renderer, &self.writer, roles)
    }

    /// Builds every role the source knows.
    pub fn build_all(&self) -> Result<CmdResult> {
        let roles = self.source.roles();
        commands::build::run(&self.source, &self.renderer, &self.writer, &roles)
    }

    pub fn render(&self, role: &str) -> Result<CmdResult> {
        commands::render::run(&self.source, &self.renderer, role)
    }

    pub fn check(&self) -> Result<CmdResult> {
        commands::check::run(&self.source, &self.renderer, &self.writer)
    }

    pub fn roles(&self) -> Result<CmdResult> {
        commands::roles::run(&self.source)
    }

    pub fn writer(&self) -> &OutputWriter {
        &self.writer
    }
}

/// Scaffolds a new project in `dir`. Needs no source, so it lives outside the facade.
pub fn init_project(dir: &Path, force: bool) -> Result<CmdResult> {
    commands::init::run(dir, force)
}
