// crates/glossa-broker/src/render.rs
// ============================================================================
// Module: Glossa Brace Renderer
// Description: `{name}` template rendering.
// Purpose: Substitute finalized placeholder values into string templates.
// Dependencies: glossa-config, glossa-core
// ============================================================================

//! ## Overview
//! [`BraceRenderer`] replaces `{name}` with the display form of the resolved
//! placeholder `name`. `{{` and `}}` render literal braces. Names the
//! strategy did not resolve are left verbatim, or rejected in strict mode.
//! Invariants:
//! - An unclosed `{` or a lone `}` is always an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;
use std::fmt::Write;

use glossa_config::RenderingConfig;
use glossa_core::ContractType;
use glossa_core::MessageRenderer;
use glossa_core::MethodSignature;
use glossa_core::RenderError;
use glossa_core::ResolvedPlaceholders;

// ============================================================================
// SECTION: Brace Renderer
// ============================================================================

/// Brace-template renderer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BraceRenderer {
    /// Reject unresolved placeholder names.
    strict: bool,
}

impl BraceRenderer {
    /// Creates a lenient renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strict: false,
        }
    }

    /// Creates a renderer that rejects unresolved names.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            strict: true,
        }
    }

    /// Creates a renderer from configuration.
    #[must_use]
    pub const fn from_config(config: &RenderingConfig) -> Self {
        Self {
            strict: config.strict,
        }
    }

    /// Returns true in strict mode.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Renders `template` with `placeholders`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnbalancedBrace`] with the byte offset of a
    /// stray brace, or [`RenderError::UnknownPlaceholder`] in strict mode.
    pub fn render_template<F: Display>(
        &self,
        template: &str,
        placeholders: &ResolvedPlaceholders<F>,
    ) -> Result<String, RenderError> {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;
        let mut offset = 0;
        while let Some(pos) = rest.find(['{', '}']) {
            output.push_str(&rest[.. pos]);
            let tail = &rest[pos ..];
            let brace_at = offset + pos;
            let consumed = if tail.starts_with("{{") {
                output.push('{');
                2
            } else if tail.starts_with("}}") {
                output.push('}');
                2
            } else if tail.starts_with('}') {
                return Err(RenderError::UnbalancedBrace(brace_at));
            } else {
                let close = tail.find('}').ok_or(RenderError::UnbalancedBrace(brace_at))?;
                let name = &tail[1 .. close];
                match placeholders.get(name) {
                    Some(value) => write!(output, "{value}")
                        .map_err(|err| RenderError::Failed(err.to_string()))?,
                    None if self.strict => {
                        return Err(RenderError::UnknownPlaceholder(name.to_string()));
                    }
                    None => output.push_str(&tail[..= close]),
                }
                close + 1
            };
            rest = &tail[consumed ..];
            offset = brace_at + consumed;
        }
        output.push_str(rest);
        Ok(output)
    }
}

impl<R, F: Display> MessageRenderer<R, String, String, F> for BraceRenderer {
    fn render(
        &self,
        _receiver: &R,
        message: &String,
        placeholders: &ResolvedPlaceholders<F>,
        _method: &MethodSignature,
        _contract: &ContractType,
    ) -> Result<String, RenderError> {
        self.render_template(message, placeholders)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
