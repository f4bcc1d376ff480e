use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_codegen::{Codegen, CodegenOptions, CodegenReturn};
use oxc_parser::{ParseOptions, Parser};
use oxc_semantic::{Scoping, SemanticBuilder};
use tracing::debug;

mod error;
mod options;
pub mod transforms;

pub use error::Error;
pub use options::{RunOptions, TransformOptions};
pub use transforms::commonjs::hoist::{HoistHints, HoistPriority};

use transforms::commonjs::CommonJs;

/// Parses a module, rewrites its `import`/`export` syntax into CommonJS and
/// prints the result.
pub struct ModuleTransformer {
    options: TransformOptions,
    parse_options: ParseOptions,
    codegen_options: CodegenOptions,
    commonjs: CommonJs,
}

impl Default for ModuleTransformer {
    fn default() -> Self {
        Self::new(TransformOptions::default())
    }
}

pub struct TransformResult {
    pub modified: bool,
    pub code: String,
}

pub trait Transform {
    fn name(&self) -> &'static str;

    fn run<'a>(&self, ctx: &mut TransformCtx<'a>, program: &mut Program<'a>) -> Result<bool, Error>;
}

pub struct TransformCtx<'a> {
    pub allocator: &'a Allocator,
    /// Scope table of the program as parsed. It is not updated for the
    /// synthesized code.
    pub scoping: Scoping,
    /// Caller supplied hoist priorities, keyed by top-level statement span.
    pub hoist_hints: HoistHints,
}

impl<'a> TransformCtx<'a> {
    pub fn new(allocator: &'a Allocator, scoping: Scoping) -> Self {
        Self { allocator, scoping, hoist_hints: HoistHints::default() }
    }
}

impl ModuleTransformer {
    pub fn new(options: TransformOptions) -> Self {
        Self {
            options,
            parse_options: ParseOptions {
                parse_regular_expression: true,
                preserve_parens: false,
                ..ParseOptions::default()
            },
            codegen_options: CodegenOptions::default(),
            commonjs: CommonJs::new(options),
        }
    }

    pub fn options(&self) -> TransformOptions {
        self.options
    }

    pub fn transform(&self, source_text: &str, opts: RunOptions) -> Result<TransformResult, Error> {
        let allocator = Allocator::default();
        let source_type = opts.resolve_source_type()?;

        let parse_ret = Parser::new(&allocator, source_text, source_type).with_options(self.parse_options).parse();
        if let Some(error) = parse_ret.errors.first() {
            return Err(Error::ParseFailed(error.to_string()));
        }
        let mut program = parse_ret.program;

        let semantic_ret = SemanticBuilder::new().build(&program);
        if let Some(error) = semantic_ret.errors.first() {
            return Err(Error::Semantic(error.to_string()));
        }
        let scoping = semantic_ret.semantic.into_scoping();

        let mut ctx = TransformCtx::new(&allocator, scoping);
        let modified = self.transform_program(&mut ctx, &mut program)?;

        let CodegenReturn { code, .. } = Codegen::new().with_options(self.codegen_options.clone()).build(&program);

        Ok(TransformResult { modified, code })
    }

    /// Runs the rewrite on a program the caller already parsed and analysed.
    pub fn transform_program<'a>(&self, ctx: &mut TransformCtx<'a>, program: &mut Program<'a>) -> Result<bool, Error> {
        let modified = self.commonjs.run(ctx, program)?;
        debug!(transform = self.commonjs.name(), modified, "transform finished");
        Ok(modified)
    }
}
