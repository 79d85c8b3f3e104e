use super::{ClauseRenderer, Fragment, RenderContext};
use crate::error::SqlMiddlewareDbError;

/// Trailing row-lock clause of a SELECT.
///
/// Inactive by default and renders nothing; once [`activate`](Self::activate)d it
/// renders `FOR UPDATE`. There is no way to switch it off again. SELECT keeps this
/// block last, after `UNION`, so the lock always ends the statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForUpdateBlock {
    lock_for_update: bool,
}

impl ForUpdateBlock {
    pub const KEYWORD: &'static str = "FOR UPDATE";

    pub fn activate(&mut self) {
        self.lock_for_update = true;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lock_for_update
    }
}

impl ClauseRenderer for ForUpdateBlock {
    fn render(&self, _ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        Ok(if self.lock_for_update {
            Fragment::from_text(Self::KEYWORD)
        } else {
            Fragment::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{RenderMode, StatementOptions};

    #[test]
    fn renders_only_when_activated() {
        let options = StatementOptions::default();
        let ctx = RenderContext {
            options: &options,
            mode: RenderMode::Parameterized,
            has_source: true,
        };
        let mut block = ForUpdateBlock::default();
        assert_eq!(block.render(&ctx).unwrap(), Fragment::default());

        block.activate();
        block.activate();
        let rendered = block.render(&ctx).unwrap();
        assert_eq!(rendered.text, "FOR UPDATE");
        assert!(rendered.values.is_empty());
    }
}
