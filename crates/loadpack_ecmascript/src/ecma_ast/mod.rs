pub mod program_cell;

use std::fmt::Debug;

use arcstr::ArcStr;
use oxc::{ast::ast::Program, span::SourceType};

use self::program_cell::ProgramCell;

/// A parsed module. Use `ast.program.with_mut(|fields| ...)` for `&mut Program`.
pub struct EcmaAst {
  pub program: ProgramCell,
  pub source_type: SourceType,
}

impl EcmaAst {
  pub fn source(&self) -> &ArcStr {
    &self.program.borrow_owner().source
  }

  pub fn program(&self) -> &Program {
    &self.program.borrow_dependent().program
  }
}

impl Debug for EcmaAst {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("EcmaAst")
      .field("source_type", &self.source_type)
      .field("source_len", &self.source().len())
      .finish_non_exhaustive()
  }
}

// The arena is only ever touched through `&mut self` or while no other
// reference to the program exists.
unsafe impl Send for EcmaAst {}
unsafe impl Sync for EcmaAst {}
