//! Walkers that drive visitors over a parsed file.

mod expr_walker;
mod local_comment_walker;

pub use expr_walker::{ExprVisitor, ExprWalker};
pub use local_comment_walker::{LocalCommentVisitor, LocalCommentWalker};
