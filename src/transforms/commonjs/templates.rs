//! Builders for the runtime shapes the CommonJS rewrite emits.
//!
//! Every builder returns freshly allocated nodes with dummy spans unless a
//! span is passed in, and none of the produced identifiers carry reference
//! ids, so later passes never mistake them for user code.

use oxc_ast::{AstBuilder, NONE, ast::*};
use oxc_span::{Atom, SPAN, Span};
use oxc_syntax::identifier::is_identifier_name;

pub fn identifier<'a>(ast: AstBuilder<'a>, name: Atom<'a>) -> Expression<'a> {
    ast.expression_identifier(SPAN, name)
}

pub fn string<'a>(ast: AstBuilder<'a>, value: &str) -> Expression<'a> {
    ast.expression_string_literal(SPAN, ast.atom(value), None)
}

pub fn number<'a>(ast: AstBuilder<'a>, value: f64) -> Expression<'a> {
    ast.expression_numeric_literal(SPAN, value, None, NumberBase::Decimal)
}

/// `object.property`, or `object["property"]` when the name cannot be
/// written as a dotted access.
pub fn member<'a>(ast: AstBuilder<'a>, object: Expression<'a>, property: &str) -> MemberExpression<'a> {
    if is_identifier_name(property) {
        ast.member_expression_static(SPAN, object, ast.identifier_name(SPAN, ast.atom(property)), false)
    } else {
        ast.member_expression_computed(SPAN, object, string(ast, property), false)
    }
}

pub fn member_expression<'a>(ast: AstBuilder<'a>, object: Expression<'a>, property: &str) -> Expression<'a> {
    Expression::from(member(ast, object, property))
}

pub fn call<'a, const N: usize>(
    ast: AstBuilder<'a>,
    callee: Expression<'a>,
    arguments: [Expression<'a>; N],
) -> Expression<'a> {
    ast.expression_call(SPAN, callee, NONE, ast.vec_from_iter(arguments.into_iter().map(Argument::from)), false)
}

/// `require(MODULE)`
pub fn require_call<'a>(ast: AstBuilder<'a>, source: &str) -> Expression<'a> {
    call(ast, identifier(ast, Atom::from("require")), [string(ast, source)])
}

/// `require(MODULE);`
pub fn require_statement<'a>(ast: AstBuilder<'a>, span: Span, source: &str) -> Statement<'a> {
    ast.statement_expression(span, require_call(ast, source))
}

/// `var ID = INIT;`
pub fn var_declaration<'a>(ast: AstBuilder<'a>, span: Span, name: Atom<'a>, init: Expression<'a>) -> Statement<'a> {
    let declarator = ast.variable_declarator(
        SPAN,
        VariableDeclarationKind::Var,
        ast.binding_pattern_binding_identifier(SPAN, name),
        NONE,
        Some(init),
        false,
    );
    Statement::VariableDeclaration(ast.alloc_variable_declaration(
        span,
        VariableDeclarationKind::Var,
        ast.vec1(declarator),
        false,
    ))
}

/// `exports.ID = VALUE`
pub fn exports_assignment_expression<'a>(ast: AstBuilder<'a>, name: &str, value: Expression<'a>) -> Expression<'a> {
    let target = SimpleAssignmentTarget::from(member(ast, identifier(ast, Atom::from("exports")), name));
    ast.expression_assignment(SPAN, AssignmentOperator::Assign, AssignmentTarget::from(target), value)
}

/// `exports.ID = VALUE;`
pub fn exports_assignment<'a>(ast: AstBuilder<'a>, name: &str, value: Expression<'a>) -> Statement<'a> {
    ast.statement_expression(SPAN, exports_assignment_expression(ast, name, value))
}

/// `Object.defineProperty(exports, "__esModule", { value: true });`, or
/// `exports.__esModule = true;` when `plain` is set.
pub fn module_flag<'a>(ast: AstBuilder<'a>, plain: bool) -> Statement<'a> {
    let value = ast.expression_boolean_literal(SPAN, true);
    if plain {
        return exports_assignment(ast, "__esModule", value);
    }
    define_export_property(ast, string(ast, "__esModule"), object(ast, [("value", value)]))
}

/// `Object.defineProperty(exports, "NAME", { enumerable: true, get: function () { return VALUE; } });`
pub fn exports_from<'a>(ast: AstBuilder<'a>, name: &str, value: Expression<'a>) -> Statement<'a> {
    define_export_property(ast, string(ast, name), getter_descriptor(ast, value))
}

/// ```js
/// Object.keys(OBJECT).forEach(function (key) {
///   if (key === "default") return;
///   Object.defineProperty(exports, key, {
///     enumerable: true,
///     get: function () { return OBJECT[key]; }
///   });
/// });
/// ```
pub fn export_all<'a>(ast: AstBuilder<'a>, span: Span, object_name: Atom<'a>) -> Statement<'a> {
    let key = Atom::from("key");

    let skip_default = ast.statement_if(
        SPAN,
        ast.expression_binary(SPAN, identifier(ast, key), BinaryOperator::StrictEquality, string(ast, "default")),
        ast.statement_return(SPAN, None),
        None,
    );
    let property = Expression::from(ast.member_expression_computed(
        SPAN,
        identifier(ast, object_name),
        identifier(ast, key),
        false,
    ));
    let define = define_export_property(ast, identifier(ast, key), getter_descriptor(ast, property));

    let param = ast.formal_parameter(
        SPAN,
        ast.vec(),
        ast.binding_pattern_binding_identifier(SPAN, key),
        NONE,
        NONE,
        false,
        None,
        false,
        false,
    );
    let callback = function_expression(ast, ast.vec1(param), ast.vec_from_array([skip_default, define]));

    let object_keys = member_expression(ast, identifier(ast, Atom::from("Object")), "keys");
    let keys = call(ast, object_keys, [identifier(ast, object_name)]);
    let for_each = member_expression(ast, keys, "forEach");
    ast.statement_expression(span, call(ast, for_each, [callback]))
}

/// `module.exports = VALUE;`
pub fn module_exports_assignment<'a>(ast: AstBuilder<'a>, span: Span, value: Expression<'a>) -> Statement<'a> {
    let target = SimpleAssignmentTarget::from(member(ast, identifier(ast, Atom::from("module")), "exports"));
    ast.statement_expression(
        span,
        ast.expression_assignment(SPAN, AssignmentOperator::Assign, AssignmentTarget::from(target), value),
    )
}

/// `module.exports = exports["default"];`
pub fn default_export_alias<'a>(ast: AstBuilder<'a>) -> Statement<'a> {
    let value = Expression::from(ast.member_expression_computed(
        SPAN,
        identifier(ast, Atom::from("exports")),
        string(ast, "default"),
        false,
    ));
    module_exports_assignment(ast, SPAN, value)
}

/// `HELPER(VALUE)`
pub fn helper_call<'a>(ast: AstBuilder<'a>, helper: Atom<'a>, value: Expression<'a>) -> Expression<'a> {
    call(ast, identifier(ast, helper), [value])
}

/// `(0, VALUE)`, which calls `VALUE` without a `this` binding.
pub fn unbound_callee<'a>(ast: AstBuilder<'a>, value: Expression<'a>) -> Expression<'a> {
    ast.expression_sequence(SPAN, ast.vec_from_array([number(ast, 0.0), value]))
}

fn define_export_property<'a>(ast: AstBuilder<'a>, key: Expression<'a>, descriptor: Expression<'a>) -> Statement<'a> {
    let callee = member_expression(ast, identifier(ast, Atom::from("Object")), "defineProperty");
    let exports = identifier(ast, Atom::from("exports"));
    ast.statement_expression(SPAN, call(ast, callee, [exports, key, descriptor]))
}

fn getter_descriptor<'a>(ast: AstBuilder<'a>, value: Expression<'a>) -> Expression<'a> {
    let get = function_expression(ast, ast.vec(), ast.vec1(ast.statement_return(SPAN, Some(value))));
    object(ast, [("enumerable", ast.expression_boolean_literal(SPAN, true)), ("get", get)])
}

fn object<'a, const N: usize>(ast: AstBuilder<'a>, properties: [(&'static str, Expression<'a>); N]) -> Expression<'a> {
    let properties = properties.into_iter().map(|(key, value)| {
        ast.object_property_kind_object_property(
            SPAN,
            PropertyKind::Init,
            ast.property_key_static_identifier(SPAN, key),
            value,
            false,
            false,
            false,
        )
    });
    ast.expression_object(SPAN, ast.vec_from_iter(properties))
}

fn function_expression<'a>(
    ast: AstBuilder<'a>,
    params: oxc_allocator::Vec<'a, FormalParameter<'a>>,
    statements: oxc_allocator::Vec<'a, Statement<'a>>,
) -> Expression<'a> {
    let params = ast.formal_parameters(SPAN, FormalParameterKind::FormalParameter, params, NONE);
    let body = ast.function_body(SPAN, ast.vec(), statements);
    ast.expression_function(
        SPAN,
        FunctionType::FunctionExpression,
        None,
        false,
        false,
        false,
        NONE,
        NONE,
        params,
        NONE,
        Some(body),
    )
}
