use oxc_allocator::Vec as ArenaVec;
use oxc_ast::{AstBuilder, ast::*};
use oxc_ecmascript::BoundNames;
use oxc_span::{Atom, GetSpan, SPAN, Span};
use tracing::trace;

use super::{ModuleRewrite, ensure_legal_export, helpers::Helper, hoist::HoistPriority, templates};
use crate::Error;

impl<'a> ModuleRewrite<'a> {
    pub(super) fn export_default(
        &mut self,
        decl: ExportDefaultDeclaration<'a>,
        priority: HoistPriority,
    ) -> Result<(), Error> {
        if default_is_type_only(&decl.declaration) {
            trace!("skipped type-only default export");
            return Ok(());
        }
        match &decl.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => check_bound_id(func.id.as_ref())?,
            ExportDefaultDeclarationKind::ClassDeclaration(class) => check_bound_id(class.id.as_ref())?,
            _ => {}
        }

        self.has_exports = true;
        self.has_default_export = true;
        let ast = self.ast;
        let default = Atom::from("default");

        match decl.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(mut func) => match binding_name(func.id.as_ref()) {
                // Function declarations hoist, so the assignment can go first.
                Some(name) => {
                    self.exports.add(name, default);
                    self.hoist(
                        HoistPriority::ORDINARY,
                        templates::exports_assignment(ast, "default", templates::identifier(ast, name)),
                    );
                    self.keep(priority, Statement::FunctionDeclaration(func));
                }
                None => {
                    func.r#type = FunctionType::FunctionExpression;
                    self.hoist(
                        HoistPriority::ORDINARY,
                        templates::exports_assignment(ast, "default", Expression::FunctionExpression(func)),
                    );
                }
            },
            ExportDefaultDeclarationKind::ClassDeclaration(mut class) => match binding_name(class.id.as_ref()) {
                Some(name) => {
                    self.exports.add(name, default);
                    self.keep(priority, Statement::ClassDeclaration(class));
                    self.keep(
                        HoistPriority::ORDINARY,
                        templates::exports_assignment(ast, "default", templates::identifier(ast, name)),
                    );
                }
                None => {
                    class.r#type = ClassType::ClassExpression;
                    let statement = exports_statement(ast, decl.span, "default", Expression::ClassExpression(class));
                    self.keep(priority, statement);
                }
            },
            kind => {
                let Ok(value) = Expression::try_from(kind) else {
                    return Ok(());
                };
                let statement = exports_statement(ast, decl.span, "default", value);
                self.keep(priority, statement);
            }
        }
        trace!("export default");
        Ok(())
    }

    pub(super) fn export_named(&mut self, decl: ExportNamedDeclaration<'a>, priority: HoistPriority) -> Result<(), Error> {
        if decl.export_kind.is_type() || decl.declaration.as_ref().is_some_and(declaration_is_type_only) {
            trace!("skipped type-only export");
            return Ok(());
        }
        if let Some(declaration) = &decl.declaration {
            let mut bound = Vec::new();
            declaration.bound_names(&mut |id| bound.push((id.name, id.span)));
            for (name, span) in bound {
                ensure_legal_export(&name, span)?;
            }
            if let Some(id) = declaration.id() {
                ensure_legal_export(&id.name, id.span)?;
            }
        }
        for specifier in &decl.specifiers {
            ensure_legal_export(&specifier.exported.name(), specifier.exported.span())?;
        }

        self.has_exports = true;

        if let Some(declaration) = decl.declaration {
            self.export_declaration(declaration, priority);
            return Ok(());
        }

        match decl.source {
            Some(source) => self.reexport(source.value, decl.specifiers, priority),
            None => self.export_locals(decl.specifiers),
        }
        Ok(())
    }

    pub(super) fn export_all(&mut self, decl: ExportAllDeclaration<'a>, priority: HoistPriority) -> Result<(), Error> {
        if decl.export_kind.is_type() {
            trace!(source = %decl.source.value, "skipped type-only export");
            return Ok(());
        }
        if let Some(exported) = &decl.exported {
            ensure_legal_export(&exported.name(), exported.span())?;
        }

        self.has_exports = true;
        let ast = self.ast;
        let source = decl.source.value;
        let span = self.imports.span_of(&source).unwrap_or(SPAN);
        let reference = self.add_require(source, priority, span);

        match decl.exported {
            // `export * as ns from "m"`
            Some(exported) => {
                let name = exported.name();
                self.record_export_name(&name);
                let namespace = templates::identifier(ast, reference);
                let value = if self.options.strict {
                    namespace
                } else {
                    let wildcard = self.helper(Helper::InteropRequireWildcard);
                    templates::helper_call(ast, wildcard, namespace)
                };
                self.hoist(HoistPriority::ORDINARY, templates::exports_from(ast, &name, value));
                self.non_hoisted.insert(name);
                trace!(source = %source, exported = %name, "export namespace");
            }
            None => {
                self.has_named_export = true;
                self.hoist(HoistPriority::ORDINARY, templates::export_all(ast, decl.span, reference));
                trace!(source = %source, "export all");
            }
        }
        Ok(())
    }

    fn export_declaration(&mut self, declaration: Declaration<'a>, priority: HoistPriority) {
        let ast = self.ast;
        match declaration {
            Declaration::FunctionDeclaration(func) => {
                if let Some(name) = binding_name(func.id.as_ref()) {
                    self.record_export_name(&name);
                    self.exports.add(name, name);
                    self.hoist(
                        HoistPriority::ORDINARY,
                        templates::exports_assignment(ast, &name, templates::identifier(ast, name)),
                    );
                }
                self.keep(priority, Statement::FunctionDeclaration(func));
            }
            Declaration::VariableDeclaration(mut var) => {
                let mut pattern_names = Vec::new();
                for declarator in &mut var.declarations {
                    self.has_named_export = true;
                    let init =
                        declarator.init.take().unwrap_or_else(|| templates::identifier(ast, Atom::from("undefined")));
                    if let BindingPattern::BindingIdentifier(id) = &declarator.id {
                        let name = id.name;
                        self.exports.add(name, name);
                        self.non_hoisted.insert(name);
                        declarator.init = Some(templates::exports_assignment_expression(ast, &name, init));
                    } else {
                        declarator.id.bound_names(&mut |id| pattern_names.push(id.name));
                        declarator.init = Some(init);
                    }
                }
                self.keep(priority, Statement::VariableDeclaration(var));
                // Destructured names are only known once the pattern has run.
                for name in pattern_names {
                    self.exports.add(name, name);
                    self.non_hoisted.insert(name);
                    self.keep(
                        HoistPriority::ORDINARY,
                        templates::exports_assignment(ast, &name, templates::identifier(ast, name)),
                    );
                }
            }
            // Classes, plus runtime TypeScript declarations such as enums
            // and namespaces: none of them hoist.
            declaration => {
                let name = declaration.id().map(|id| id.name);
                self.keep(priority, Statement::from(declaration));
                if let Some(name) = name {
                    self.record_export_name(&name);
                    self.exports.add(name, name);
                    self.non_hoisted.insert(name);
                    self.keep(
                        HoistPriority::ORDINARY,
                        templates::exports_assignment(ast, &name, templates::identifier(ast, name)),
                    );
                }
            }
        }
    }

    /// `export { a as b } from "m"`: live getters on the required module.
    fn reexport(&mut self, source: Atom<'a>, specifiers: ArenaVec<'a, ExportSpecifier<'a>>, priority: HoistPriority) {
        let ast = self.ast;
        let span = self.imports.span_of(&source).unwrap_or(SPAN);
        let reference = self.add_require(source, priority, span);

        for specifier in specifiers.iter().filter(|s| !s.export_kind.is_type()) {
            let exported = specifier.exported.name();
            let local = specifier.local.name();
            self.record_export_name(&exported);

            let module = templates::identifier(ast, reference);
            let value = if local == "default" {
                let interop = self.helper(Helper::InteropRequireDefault);
                templates::member_expression(ast, templates::helper_call(ast, interop, module), "default")
            } else {
                templates::member_expression(ast, module, &local)
            };
            self.hoist(HoistPriority::ORDINARY, templates::exports_from(ast, &exported, value));
            self.non_hoisted.insert(exported);
            trace!(source = %source, local = %local, exported = %exported, "re-export");
        }
    }

    /// `export { a, a as b }`: one assignment per specifier, in place.
    fn export_locals(&mut self, specifiers: ArenaVec<'a, ExportSpecifier<'a>>) {
        let ast = self.ast;
        for specifier in specifiers.iter().filter(|s| !s.export_kind.is_type()) {
            let exported = specifier.exported.name();
            self.record_export_name(&exported);

            let (local, value) = match &specifier.local {
                ModuleExportName::IdentifierReference(ident) => (ident.name, reference_to(ast, ident)),
                other => (other.name(), templates::identifier(ast, other.name())),
            };
            self.exports.add(local, exported);
            self.non_hoisted.insert(exported);
            self.keep(HoistPriority::ORDINARY, templates::exports_assignment(ast, &exported, value));
            trace!(local = %local, exported = %exported, "export");
        }
    }
}

/// `exports.NAME = VALUE;` at the location of the export it replaces.
fn exports_statement<'a>(ast: AstBuilder<'a>, span: Span, name: &str, value: Expression<'a>) -> Statement<'a> {
    ast.statement_expression(span, templates::exports_assignment_expression(ast, name, value))
}

fn binding_name<'a>(id: Option<&BindingIdentifier<'a>>) -> Option<Atom<'a>> {
    id.map(|id| id.name)
}

/// A read of `ident` that still resolves the way the original did.
fn reference_to<'a>(ast: AstBuilder<'a>, ident: &IdentifierReference<'a>) -> Expression<'a> {
    match ident.reference_id.get() {
        Some(reference_id) => ast.expression_identifier_with_reference_id(ident.span, ident.name, reference_id),
        None => ast.expression_identifier(ident.span, ident.name),
    }
}

fn check_bound_id(id: Option<&BindingIdentifier<'_>>) -> Result<(), Error> {
    match id {
        Some(id) => ensure_legal_export(&id.name, id.span),
        None => Ok(()),
    }
}

fn declaration_is_type_only(declaration: &Declaration<'_>) -> bool {
    match declaration {
        Declaration::FunctionDeclaration(func) => func.declare || func.body.is_none(),
        Declaration::TSGlobalDeclaration(_) => true,
        _ => declaration.is_type() || declaration.declare(),
    }
}

fn default_is_type_only(kind: &ExportDefaultDeclarationKind<'_>) -> bool {
    match kind {
        ExportDefaultDeclarationKind::TSInterfaceDeclaration(_) => true,
        ExportDefaultDeclarationKind::FunctionDeclaration(func) => func.declare || func.body.is_none(),
        ExportDefaultDeclarationKind::ClassDeclaration(class) => class.declare,
        _ => false,
    }
}
