//! Rewrites `import`/`export` syntax into `require`/`exports` code.
//!
//! The rewrite runs in two phases. The scan walks the top-level statements
//! once, collecting import and export tables and replacing each module
//! declaration with its runtime equivalent. The live binding pass then
//! walks the finished body and routes reads of imports and writes of
//! exports through the synthesized bindings.

mod exports;
mod helpers;
pub mod hoist;
mod imports;
mod live_bindings;
mod scanner;
mod scope;
mod tables;
mod templates;

use std::mem;

use oxc_allocator::Vec as ArenaVec;
use oxc_ast::{AstBuilder, ast::*};
use oxc_ast_visit::VisitMut;
use oxc_span::{Atom, SPAN, Span};
use tracing::debug;

use crate::{Error, Transform, TransformCtx, TransformOptions};

use self::{
    helpers::{Helper, Helpers},
    hoist::HoistPriority,
    live_bindings::LiveBindings,
    scope::UidGenerator,
    tables::{ExportTable, ImportTable, NonHoistedExportNames, RemapTable, RequireCache},
};

pub struct CommonJs {
    options: TransformOptions,
}

impl CommonJs {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }
}

impl Transform for CommonJs {
    fn name(&self) -> &'static str {
        "commonjs"
    }

    fn run<'a>(&self, ctx: &mut TransformCtx<'a>, program: &mut Program<'a>) -> Result<bool, Error> {
        if !program.body.iter().any(Statement::is_module_declaration) {
            return Ok(false);
        }

        let ast = AstBuilder::new(ctx.allocator);
        let mut uids = UidGenerator::new(&ctx.scoping);
        let renamed = scope::reserve_commonjs_names(ast, &mut ctx.scoping, &mut uids, program);

        let mut module = ModuleRewrite::new(ast, self.options, uids);
        let statements = mem::replace(&mut program.body, ast.vec());
        module.scan(statements, &ctx.hoist_hints)?;
        module.rewrite_imports();
        program.body = module.finish()?;

        let mut live_rewrites = 0;
        if !module.remaps.is_empty() || !module.exports.is_empty() {
            let mut live = LiveBindings::new(ast, &ctx.scoping, &module.remaps, &module.exports);
            live.visit_program(program);
            live_rewrites = live.rewrites();
        }

        debug!(
            renamed,
            requires = module.requires.len(),
            exported_locals = module.exports.len(),
            remapped_locals = module.remaps.len(),
            live_rewrites,
            module_flag = module.has_exports,
            "rewrote module syntax"
        );
        Ok(true)
    }
}

/// State of one module's rewrite.
struct ModuleRewrite<'a> {
    ast: AstBuilder<'a>,
    options: TransformOptions,
    uids: UidGenerator,
    helpers: Helpers<'a>,

    imports: ImportTable<'a>,
    exports: ExportTable<'a>,
    remaps: RemapTable<'a>,
    requires: RequireCache<'a>,
    non_hoisted: NonHoistedExportNames<'a>,

    /// Statements placed ahead of the remaining body.
    top: Vec<(HoistPriority, Statement<'a>)>,
    /// The remaining body, with module declarations replaced in place.
    body: Vec<(HoistPriority, Statement<'a>)>,

    has_imports: bool,
    has_exports: bool,
    has_default_export: bool,
    has_named_export: bool,
}

impl<'a> ModuleRewrite<'a> {
    fn new(ast: AstBuilder<'a>, options: TransformOptions, uids: UidGenerator) -> Self {
        Self {
            ast,
            options,
            uids,
            helpers: Helpers::default(),
            imports: ImportTable::default(),
            exports: ExportTable::default(),
            remaps: RemapTable::default(),
            requires: RequireCache::default(),
            non_hoisted: NonHoistedExportNames::default(),
            top: Vec::new(),
            body: Vec::new(),
            has_imports: false,
            has_exports: false,
            has_default_export: false,
            has_named_export: false,
        }
    }

    fn keep(&mut self, priority: HoistPriority, statement: Statement<'a>) {
        self.body.push((priority, statement));
    }

    fn hoist(&mut self, priority: HoistPriority, statement: Statement<'a>) {
        self.top.push((priority, statement));
    }

    fn helper(&mut self, helper: Helper) -> Atom<'a> {
        self.helpers.name(self.ast, &mut self.uids, helper)
    }

    fn record_export_name(&mut self, exported: &str) {
        if exported == "default" {
            self.has_default_export = true;
        } else {
            self.has_named_export = true;
        }
    }

    /// Puts the module header in front of the rewritten statements, orders
    /// everything by hoist priority and appends the helpers in use.
    fn finish(&mut self) -> Result<ArenaVec<'a, Statement<'a>>, Error> {
        let ast = self.ast;
        let mut statements = Vec::with_capacity(self.top.len() + self.body.len() + 3);

        if self.has_exports {
            let flag = templates::module_flag(ast, self.options.plain_module_flag());
            statements.push((HoistPriority::MODULE_FLAG, flag));
        }
        if self.has_imports && !self.non_hoisted.is_empty() {
            let chain = self.non_hoisted.iter().fold(
                templates::identifier(ast, Atom::from("undefined")),
                |value, name| templates::exports_assignment_expression(ast, &name, value),
            );
            statements.push((HoistPriority::EXPORT_PREDECLARATION, ast.statement_expression(SPAN, chain)));
        }

        statements.append(&mut self.top);
        statements.append(&mut self.body);

        if self.options.add_exports && self.has_default_export && !self.has_named_export {
            statements.push((HoistPriority::ORDINARY, templates::default_export_alias(ast)));
        }

        hoist::arrange(&mut statements);

        let mut body = ast.vec_from_iter(statements.into_iter().map(|(_, statement)| statement));
        body.extend(self.helpers.declarations(ast)?);
        Ok(body)
    }
}

/// `Illegal export "__esModule"` when `name` is the reserved flag name.
fn ensure_legal_export(name: &str, span: Span) -> Result<(), Error> {
    if name == "__esModule" {
        return Err(Error::IllegalExportName { name: name.to_string(), span });
    }
    Ok(())
}
