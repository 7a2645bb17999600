mod ecma_ast;
mod ecma_compiler;
mod es5_lowering;

pub use crate::{
  ecma_ast::{program_cell::WithMutFields, EcmaAst},
  ecma_compiler::{EcmaCompiler, EcmaTransformOptions, EcmaTransformOutput},
};
