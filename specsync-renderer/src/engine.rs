//! Tera engine for branch names, commit messages and pull request text.
//!
//! | Kind           | Config key                | Default                                            |
//! |----------------|---------------------------|----------------------------------------------------|
//! | Branch         | `templates.branch`        | `mini-cms/update-specifications-{{ timestamp }}`   |
//! | PrTitle        | `templates.pr_title`      | `[Mini CMS] Update specifications {{ timestamp }}` |
//! | PrBody         | `templates.pr_body`       | fixed sentence                                     |
//! | CommitCreate   | `templates.commit_create` | `Create {{ path }}`                                |
//! | CommitUpdate   | `templates.commit_update` | `Update {{ path }}`                                |

use tera::Tera;

use specsync_core::config::Templates;

use crate::context::MessageContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// MessageKind
// ---------------------------------------------------------------------------

/// Every templated string sent to the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Branch,
    PrTitle,
    PrBody,
    CommitCreate,
    CommitUpdate,
}

impl MessageKind {
    /// All kinds in a stable order.
    pub fn all() -> &'static [MessageKind] {
        &[
            MessageKind::Branch,
            MessageKind::PrTitle,
            MessageKind::PrBody,
            MessageKind::CommitCreate,
            MessageKind::CommitUpdate,
        ]
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            MessageKind::Branch       => "branch",
            MessageKind::PrTitle      => "pr_title",
            MessageKind::PrBody       => "pr_body",
            MessageKind::CommitCreate => "commit_create",
            MessageKind::CommitUpdate => "commit_update",
        }
    }

    fn source<'a>(&self, templates: &'a Templates) -> &'a str {
        match self {
            MessageKind::Branch       => &templates.branch,
            MessageKind::PrTitle      => &templates.pr_title,
            MessageKind::PrBody       => &templates.pr_body,
            MessageKind::CommitCreate => &templates.commit_create,
            MessageKind::CommitUpdate => &templates.commit_update,
        }
    }
}

// ---------------------------------------------------------------------------
// MessageEngine
// ---------------------------------------------------------------------------

/// Compiled message templates. Construction fails on template syntax errors,
/// so a bad config is caught before any remote call.
pub struct MessageEngine {
    tera: Tera,
}

impl MessageEngine {
    pub fn new(templates: &Templates) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        let items: Vec<(&str, &str)> = MessageKind::all()
            .iter()
            .map(|kind| (kind.template_name(), kind.source(templates)))
            .collect();
        tera.add_raw_templates(items)?;
        Ok(MessageEngine { tera })
    }

    pub fn render(&self, kind: MessageKind, ctx: &MessageContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let rendered = self.tera.render(kind.template_name(), &tera_ctx)?;
        Ok(rendered.trim().to_owned())
    }

    /// Render the working branch name and reject names git refuses.
    pub fn branch_name(&self, ctx: &MessageContext) -> Result<String, RenderError> {
        let name = self.render(MessageKind::Branch, ctx)?;
        if !is_valid_branch_name(&name) {
            return Err(RenderError::InvalidBranchName(name));
        }
        Ok(name)
    }
}

/// A practical subset of `git check-ref-format --branch`.
fn is_valid_branch_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('/')
        && !name.ends_with('/')
        && !name.ends_with(".lock")
        && !name.ends_with('.')
        && !name.contains("..")
        && !name.contains("//")
        && !name.contains("@{")
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || "~^:?*[\\".contains(c))
}
