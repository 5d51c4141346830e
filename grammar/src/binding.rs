//! Capability interface between a target language's AST and [`AsdlTree`].
//!
//! A binding is handed explicitly to whatever needs it (a dataset builder, a
//! decoder turning predicted trees back into text). There is no global
//! registry of languages.

use crate::error::Result;
use crate::grammar::Grammar;
use crate::tree::AsdlTree;

/// Converts between a language-specific AST and grammar trees.
pub trait LanguageBinding {
    /// The language's own syntax tree.
    type Ast;

    /// The grammar this binding's trees conform to.
    fn grammar(&self) -> &Grammar;

    /// Lowers a language AST into a grammar tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the AST has no representation in [`Self::grammar`].
    fn to_asdl_tree(&self, ast: &Self::Ast) -> Result<AsdlTree>;

    /// Raises a grammar tree back into a language AST.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree does not describe a valid AST.
    fn to_ast(&self, tree: &AsdlTree) -> Result<Self::Ast>;

    /// Lowers `ast` and validates the result against [`Self::grammar`].
    ///
    /// # Errors
    ///
    /// Any error from [`Self::to_asdl_tree`] or [`AsdlTree::validate`].
    fn checked_tree(&self, ast: &Self::Ast) -> Result<AsdlTree> {
        let tree = self.to_asdl_tree(ast)?;
        tree.validate(self.grammar())?;
        Ok(tree)
    }
}
