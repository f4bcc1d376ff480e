use oxc_allocator::Vec as ArenaVec;
use oxc_ast::ast::*;
use oxc_span::GetSpan;
use tracing::trace;

use super::{
    ModuleRewrite,
    hoist::{self, HoistHints, HoistPriority},
    tables::Specifier,
    templates,
};
use crate::Error;

impl<'a> ModuleRewrite<'a> {
    /// Single left-to-right pass over the top-level statements. Imports are
    /// collected and removed; exports are rewritten in place.
    pub(super) fn scan(&mut self, statements: ArenaVec<'a, Statement<'a>>, hints: &HoistHints) -> Result<(), Error> {
        for statement in statements {
            let priority = hoist::priority_of(hints, statement.span());
            match statement {
                Statement::ImportDeclaration(decl) => self.record_import(decl.unbox(), priority),
                Statement::ExportDefaultDeclaration(decl) => self.export_default(decl.unbox(), priority)?,
                Statement::ExportNamedDeclaration(decl) => self.export_named(decl.unbox(), priority)?,
                Statement::ExportAllDeclaration(decl) => self.export_all(decl.unbox(), priority)?,
                Statement::TSExportAssignment(assignment) => {
                    let assignment = assignment.unbox();
                    let statement =
                        templates::module_exports_assignment(self.ast, assignment.span, assignment.expression);
                    self.keep(priority, statement);
                }
                Statement::TSNamespaceExportDeclaration(_) => {}
                statement => self.keep(priority, statement),
            }
        }
        Ok(())
    }

    fn record_import(&mut self, decl: ImportDeclaration<'a>, priority: HoistPriority) {
        if decl.import_kind.is_type() {
            trace!(source = %decl.source.value, "skipped type-only import");
            return;
        }

        let source = decl.source.value;
        let specifiers = match decl.specifiers {
            None => Vec::new(),
            Some(specifiers) if specifiers.is_empty() => Vec::new(),
            Some(specifiers) => {
                let values: Vec<_> = specifiers.iter().filter_map(value_specifier).collect();
                // Every specifier was `type`-only: nothing to load at runtime.
                if values.is_empty() {
                    trace!(source = %source, "skipped type-only import");
                    return;
                }
                values
            }
        };

        trace!(source = %source, specifiers = specifiers.len(), "import");
        self.has_imports = true;
        self.imports.record(source, decl.span, priority, specifiers);
    }
}

fn value_specifier<'a>(specifier: &ImportDeclarationSpecifier<'a>) -> Option<Specifier<'a>> {
    match specifier {
        ImportDeclarationSpecifier::ImportSpecifier(spec) if spec.import_kind.is_type() => None,
        ImportDeclarationSpecifier::ImportSpecifier(spec) => {
            Some(Specifier::Named { local: spec.local.name, imported: spec.imported.name() })
        }
        ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => Some(Specifier::Default { local: spec.local.name }),
        ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
            Some(Specifier::Namespace { local: spec.local.name })
        }
    }
}
