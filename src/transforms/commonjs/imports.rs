use std::mem;

use oxc_span::{Atom, Span};
use tracing::trace;

use super::{
    ModuleRewrite,
    helpers::Helper,
    hoist::HoistPriority,
    scope,
    tables::{Remap, Specifier},
    templates,
};

impl<'a> ModuleRewrite<'a> {
    /// Binding that holds `require(source)`, declared once per module path.
    pub(super) fn add_require(&mut self, source: Atom<'a>, priority: HoistPriority, span: Span) -> Atom<'a> {
        if let Some(binding) = self.requires.get(&source) {
            return binding;
        }

        let ast = self.ast;
        let binding = ast.atom(&self.uids.generate(scope::module_basename(&source)));
        self.requires.insert(source, binding);
        self.hoist(priority, templates::var_declaration(ast, span, binding, templates::require_call(ast, &source)));
        trace!(source = %source, binding = %binding, "require");
        binding
    }

    /// Turns the collected import table into require bindings, in the order
    /// the module paths were first imported.
    pub(super) fn rewrite_imports(&mut self) {
        let ast = self.ast;
        for (source, entry) in mem::take(&mut self.imports).into_entries() {
            if entry.specifiers.is_empty() {
                self.hoist(HoistPriority::ORDINARY, templates::require_statement(ast, entry.span, &source));
                continue;
            }

            let reference = self.add_require(source, entry.hoist, entry.span);

            for specifier in &entry.specifiers {
                let Specifier::Namespace { local } = *specifier else { continue };
                if self.options.strict {
                    self.remaps.insert(local, Remap::Binding(reference));
                } else {
                    let wildcard = self.helper(Helper::InteropRequireWildcard);
                    let init = templates::helper_call(ast, wildcard, templates::identifier(ast, reference));
                    self.hoist(entry.hoist, templates::var_declaration(ast, entry.span, local, init));
                }
            }

            for specifier in &entry.specifiers {
                let (local, imported) = match *specifier {
                    Specifier::Namespace { .. } => continue,
                    Specifier::Default { local } => (local, Atom::from("default")),
                    Specifier::Named { local, imported } => (local, imported),
                };

                let module = templates::identifier(ast, reference);
                let init = if imported == "default" {
                    let interop = self.helper(Helper::InteropRequireDefault);
                    templates::member_expression(ast, templates::helper_call(ast, interop, module), "default")
                } else {
                    // Reads go through the module object so they stay live.
                    self.remaps.insert(local, Remap::Member { object: reference, property: imported });
                    templates::member_expression(ast, module, &imported)
                };
                self.hoist(entry.hoist, templates::var_declaration(ast, entry.span, local, init));
            }

            trace!(source = %source, binding = %reference, specifiers = entry.specifiers.len(), "rewrote import");
        }
    }
}
