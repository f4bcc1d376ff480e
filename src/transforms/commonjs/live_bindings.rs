//! Keeps imports and exports live after the module syntax is gone.
//!
//! Reads of imported names are routed through the require binding, and
//! every write to an exported local is mirrored onto `exports`.

use std::mem;

use oxc_allocator::{TakeIn, Vec as ArenaVec};
use oxc_ast::{AstBuilder, ast::*};
use oxc_ast_visit::{VisitMut, walk_mut};
use oxc_semantic::{ReferenceId, Scoping};
use oxc_span::{Atom, SPAN};
use oxc_syntax::{
    identifier::is_identifier_name,
    operator::{AssignmentOperator, BinaryOperator, UpdateOperator},
    scope::ScopeFlags,
};
use rustc_hash::FxHashSet;

use super::{
    tables::{ExportTable, Remap, RemapTable},
    templates,
};

pub struct LiveBindings<'s, 'a> {
    ast: AstBuilder<'a>,
    scoping: &'s Scoping,
    remaps: &'s RemapTable<'a>,
    exports: &'s ExportTable<'a>,
    /// Assignment targets whose writes are already mirrored onto `exports`.
    mirrored: FxHashSet<ReferenceId>,
    /// Whether the statement being visited can be the completion value of
    /// the program or the body of an expression-bodied arrow.
    completion: bool,
    rewrites: usize,
}

impl<'s, 'a> LiveBindings<'s, 'a> {
    pub fn new(
        ast: AstBuilder<'a>,
        scoping: &'s Scoping,
        remaps: &'s RemapTable<'a>,
        exports: &'s ExportTable<'a>,
    ) -> Self {
        Self { ast, scoping, remaps, exports, mirrored: FxHashSet::default(), completion: true, rewrites: 0 }
    }

    pub fn rewrites(&self) -> usize {
        self.rewrites
    }

    /// True when `ident` refers to the module-level binding of its name and
    /// not to a local that shadows it.
    fn resolves_to_module_binding(&self, ident: &IdentifierReference<'a>) -> bool {
        let Some(reference_id) = ident.reference_id.get() else {
            return false;
        };
        self.scoping.get_reference(reference_id).symbol_id() == self.scoping.get_root_binding(&ident.name)
    }

    fn remap_for(&self, ident: &IdentifierReference<'a>) -> Option<Remap<'a>> {
        let remap = self.remaps.get(&ident.name)?;
        self.resolves_to_module_binding(ident).then_some(remap)
    }

    /// Like `remap_for`, but only remaps a JSX tag name can spell.
    fn jsx_remap_for(&self, ident: &IdentifierReference<'a>) -> Option<Remap<'a>> {
        match self.remap_for(ident)? {
            Remap::Member { property, .. } if !is_identifier_name(&property) => None,
            remap => Some(remap),
        }
    }

    /// `_ui.Button` as a JSX member expression.
    fn jsx_member(&self, object: Atom<'a>, property: Atom<'a>) -> JSXMemberExpressionObject<'a> {
        let ast = self.ast;
        ast.jsx_member_expression_object_member_expression(
            SPAN,
            ast.jsx_member_expression_object_identifier_reference(SPAN, object),
            ast.jsx_identifier(SPAN, property),
        )
    }

    fn exported_names(&self, ident: &IdentifierReference<'a>) -> Option<&'s [Atom<'a>]> {
        let exports = self.exports;
        let names = exports.get(&ident.name)?;
        self.resolves_to_module_binding(ident).then_some(names)
    }

    /// Export names to mirror the assignment `expr` onto, unless it was
    /// mirrored already.
    fn assignment_exports(&mut self, expr: &Expression<'a>) -> Option<&'s [Atom<'a>]> {
        let Expression::AssignmentExpression(assignment) = expr else {
            return None;
        };
        let AssignmentTarget::AssignmentTargetIdentifier(ident) = &assignment.left else {
            return None;
        };
        let names = self.exported_names(ident)?;
        let reference_id = ident.reference_id.get()?;
        self.mirrored.insert(reference_id).then_some(names)
    }

    /// `exports.b = exports.a = VALUE`
    fn mirror(&self, value: Expression<'a>, names: &[Atom<'a>]) -> Expression<'a> {
        names.iter().fold(value, |value, name| templates::exports_assignment_expression(self.ast, name, value))
    }

    /// `x++` on an exported local becomes `exports.x = x += 1`. When the old
    /// value is observed, the result is `(exports.x = x += 1, x - 1)`.
    fn rewrite_update(&mut self, update: &UpdateExpression<'a>, discarded: bool) -> Option<Expression<'a>> {
        let SimpleAssignmentTarget::AssignmentTargetIdentifier(ident) = &update.argument else {
            return None;
        };
        let names = self.exported_names(ident)?;
        let reference_id = ident.reference_id.get()?;
        let ast = self.ast;

        let (operator, inverse) = match update.operator {
            UpdateOperator::Increment => (AssignmentOperator::Addition, BinaryOperator::Subtraction),
            UpdateOperator::Decrement => (AssignmentOperator::Subtraction, BinaryOperator::Addition),
        };
        let target =
            ast.simple_assignment_target_assignment_target_identifier_with_reference_id(ident.span, ident.name, reference_id);
        let assignment =
            ast.expression_assignment(update.span, operator, AssignmentTarget::from(target), templates::number(ast, 1.0));
        let mirrored = self.mirror(assignment, names);
        self.mirrored.insert(reference_id);
        self.rewrites += 1;

        if discarded || update.prefix {
            return Some(mirrored);
        }
        let previous = ast.expression_binary(
            SPAN,
            ast.expression_identifier_with_reference_id(ident.span, ident.name, reference_id),
            inverse,
            templates::number(ast, 1.0),
        );
        Some(ast.expression_sequence(update.span, ast.vec_from_array([mirrored, previous])))
    }
}

impl<'a> VisitMut<'a> for LiveBindings<'_, 'a> {
    fn visit_statements(&mut self, it: &mut ArenaVec<'a, Statement<'a>>) {
        let outer = self.completion;
        let last = it.len().saturating_sub(1);
        for (index, statement) in it.iter_mut().enumerate() {
            self.completion = outer && index == last;
            self.visit_statement(statement);
        }
        self.completion = outer;
    }

    fn visit_switch_cases(&mut self, it: &mut ArenaVec<'a, SwitchCase<'a>>) {
        let outer = self.completion;
        let last = it.len().saturating_sub(1);
        for (index, case) in it.iter_mut().enumerate() {
            self.completion = outer && index == last;
            self.visit_switch_case(case);
        }
        self.completion = outer;
    }

    fn visit_function(&mut self, it: &mut Function<'a>, flags: ScopeFlags) {
        let outer = mem::replace(&mut self.completion, false);
        walk_mut::walk_function(self, it, flags);
        self.completion = outer;
    }

    fn visit_arrow_function_expression(&mut self, it: &mut ArrowFunctionExpression<'a>) {
        // An expression body is the arrow's return value.
        let outer = mem::replace(&mut self.completion, it.expression);
        walk_mut::walk_arrow_function_expression(self, it);
        self.completion = outer;
    }

    fn visit_static_block(&mut self, it: &mut StaticBlock<'a>) {
        let outer = mem::replace(&mut self.completion, false);
        walk_mut::walk_static_block(self, it);
        self.completion = outer;
    }

    fn visit_expression_statement(&mut self, it: &mut ExpressionStatement<'a>) {
        let replacement = match &it.expression {
            Expression::UpdateExpression(update) => self.rewrite_update(update, !self.completion),
            _ => None,
        };
        match replacement {
            Some(replacement) => it.expression = replacement,
            None => walk_mut::walk_expression_statement(self, it),
        }
    }

    fn visit_expression(&mut self, expr: &mut Expression<'a>) {
        match expr {
            Expression::Identifier(ident) => {
                if let Some(remap) = self.remap_for(ident) {
                    *expr = remap.to_expression(self.ast);
                    self.rewrites += 1;
                }
                return;
            }
            Expression::CallExpression(call) => {
                let remap = match &call.callee {
                    Expression::Identifier(ident) => self.remap_for(ident),
                    _ => None,
                };
                if let Some(remap) = remap {
                    call.callee = templates::unbound_callee(self.ast, remap.to_expression(self.ast));
                    self.rewrites += 1;
                }
            }
            Expression::UpdateExpression(update) => {
                if let Some(replacement) = self.rewrite_update(update, false) {
                    *expr = replacement;
                    return;
                }
            }
            Expression::AssignmentExpression(_) => {
                walk_mut::walk_expression(self, expr);
                if let Some(names) = self.assignment_exports(expr) {
                    let assignment = expr.take_in(self.ast);
                    *expr = self.mirror(assignment, names);
                    self.rewrites += 1;
                }
                return;
            }
            _ => {}
        }
        walk_mut::walk_expression(self, expr);
    }

    fn visit_jsx_element_name(&mut self, it: &mut JSXElementName<'a>) {
        let JSXElementName::IdentifierReference(ident) = &*it else {
            walk_mut::walk_jsx_element_name(self, it);
            return;
        };
        let Some(remap) = self.jsx_remap_for(ident) else {
            return;
        };
        let ast = self.ast;
        *it = match remap {
            Remap::Binding(name) => ast.jsx_element_name_identifier_reference(SPAN, name),
            Remap::Member { object, property } => ast.jsx_element_name_member_expression(
                SPAN,
                ast.jsx_member_expression_object_identifier_reference(SPAN, object),
                ast.jsx_identifier(SPAN, property),
            ),
        };
        self.rewrites += 1;
    }

    fn visit_jsx_member_expression_object(&mut self, it: &mut JSXMemberExpressionObject<'a>) {
        let JSXMemberExpressionObject::IdentifierReference(ident) = &*it else {
            walk_mut::walk_jsx_member_expression_object(self, it);
            return;
        };
        let Some(remap) = self.jsx_remap_for(ident) else {
            return;
        };
        *it = match remap {
            Remap::Binding(name) => self.ast.jsx_member_expression_object_identifier_reference(SPAN, name),
            Remap::Member { object, property } => self.jsx_member(object, property),
        };
        self.rewrites += 1;
    }

    fn visit_object_property(&mut self, it: &mut ObjectProperty<'a>) {
        walk_mut::walk_object_property(self, it);
        // `{ a }` whose value was remapped has to be written out in full.
        if it.shorthand && !matches!(it.value, Expression::Identifier(_)) {
            it.shorthand = false;
        }
    }
}
