use oxc::ast::{
  ast::{Argument, CallExpression, Expression, ImportExpression, MetaProperty},
  visit::walk,
  Visit,
};

use super::AstScanner;

impl<'ast> Visit<'ast> for AstScanner<'_> {
  fn visit_call_expression(&mut self, expr: &CallExpression<'ast>) {
    if let Expression::Identifier(callee) = &expr.callee {
      if callee.name.as_str() == "require" && expr.arguments.len() == 1 {
        if let Some(Argument::StringLiteral(request)) = expr.arguments.first() {
          let record = self.add_import_record(request.value.as_str());
          self.result.require_literals.push((request.span, record));
        }
      }
    }
    walk::walk_call_expression(self, expr);
  }

  fn visit_import_expression(&mut self, expr: &ImportExpression<'ast>) {
    self.result.warnings.push(anyhow::anyhow!(
      "{}: dynamic import() is not bundled and is left as written",
      self.module_id
    ));
    walk::walk_import_expression(self, expr);
  }

  fn visit_meta_property(&mut self, meta: &MetaProperty<'ast>) {
    if meta.meta.name.as_str() == "import" {
      self.result.warnings.push(anyhow::anyhow!(
        "{}: import.meta is not available in bundled modules",
        self.module_id
      ));
    }
  }
}
