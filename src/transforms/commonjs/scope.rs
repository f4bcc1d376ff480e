use oxc_ast::{AstBuilder, ast::*};
use oxc_ast_visit::{VisitMut, walk_mut};
use oxc_semantic::{Scoping, SymbolId};
use oxc_span::Atom;
use rustc_hash::{FxHashMap, FxHashSet};

/// Hands out identifiers that collide with nothing declared or referenced in
/// the module, nor with anything handed out before.
pub struct UidGenerator {
    taken: FxHashSet<String>,
}

impl UidGenerator {
    pub fn new(scoping: &Scoping) -> Self {
        let mut taken: FxHashSet<String> = scoping.symbol_names().map(str::to_string).collect();
        taken.extend(scoping.root_unresolved_references().keys().map(|name| (*name).to_string()));
        Self { taken }
    }

    pub fn generate(&mut self, hint: &str) -> String {
        let base = to_identifier(hint);
        let base = base.trim_start_matches('_').trim_end_matches(|c: char| c.is_ascii_digit());

        let mut attempt = 1usize;
        loop {
            let candidate = if attempt > 1 { format!("_{base}{attempt}") } else { format!("_{base}") };
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            attempt += 1;
        }
    }
}

/// Turns an arbitrary string into something usable as an identifier:
/// `string-helpers` becomes `stringHelpers`.
pub fn to_identifier(name: &str) -> String {
    let replaced: String =
        name.chars().map(|c| if c.is_ascii_alphanumeric() || c == '$' || c == '_' { c } else { '-' }).collect();
    let trimmed = replaced.trim_start_matches(|c: char| c == '-' || c.is_ascii_digit());

    let mut out = String::with_capacity(trimmed.len());
    let mut upper_next = false;
    for c in trimmed.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    if out.is_empty() { "_".to_string() } else { out }
}

/// File name of a module path without its extension, the way a require
/// binding is named after it: `./lib/string-helpers.js` gives
/// `string-helpers`.
pub fn module_basename(source: &str) -> &str {
    let trimmed = source.trim_end_matches('/');
    let base = trimmed.rsplit('/').next().unwrap_or(trimmed);
    match base.rfind('.') {
        Some(dot) if base[..dot].chars().any(|c| c != '.') => &base[..dot],
        _ => base,
    }
}

/// Renames root-scope bindings, in the tree and in the scope table.
pub struct BindingRenamer<'s, 'a> {
    scoping: &'s Scoping,
    renames: FxHashMap<SymbolId, Atom<'a>>,
}

impl<'s, 'a> BindingRenamer<'s, 'a> {
    pub fn new(scoping: &'s Scoping, renames: FxHashMap<SymbolId, Atom<'a>>) -> Self {
        Self { scoping, renames }
    }

    fn renamed_binding(&self, ident: &BindingIdentifier<'a>) -> Option<Atom<'a>> {
        ident.symbol_id.get().and_then(|symbol_id| self.renames.get(&symbol_id).copied())
    }

    fn renamed_reference(&self, ident: &IdentifierReference<'a>) -> Option<Atom<'a>> {
        let reference_id = ident.reference_id.get()?;
        let symbol_id = self.scoping.get_reference(reference_id).symbol_id()?;
        self.renames.get(&symbol_id).copied()
    }
}

impl<'a> VisitMut<'a> for BindingRenamer<'_, 'a> {
    fn visit_binding_identifier(&mut self, it: &mut BindingIdentifier<'a>) {
        if let Some(name) = self.renamed_binding(it) {
            it.name = name;
        }
    }

    fn visit_identifier_reference(&mut self, it: &mut IdentifierReference<'a>) {
        if let Some(name) = self.renamed_reference(it) {
            it.name = name;
        }
    }

    fn visit_object_property(&mut self, it: &mut ObjectProperty<'a>) {
        walk_mut::walk_object_property(self, it);
        if it.shorthand {
            if let (PropertyKey::StaticIdentifier(key), Expression::Identifier(value)) = (&it.key, &it.value) {
                if key.name != value.name {
                    it.shorthand = false;
                }
            }
        }
    }

    fn visit_binding_property(&mut self, it: &mut BindingProperty<'a>) {
        walk_mut::walk_binding_property(self, it);
        if it.shorthand {
            if let (PropertyKey::StaticIdentifier(key), BindingPattern::BindingIdentifier(value)) = (&it.key, &it.value)
            {
                if key.name != value.name {
                    it.shorthand = false;
                }
            }
        }
    }
}

/// Renames the module's own top-level `module`, `exports` and `require`
/// bindings so the generated code reaches the runtime's objects.
pub fn reserve_commonjs_names<'a>(
    ast: AstBuilder<'a>,
    scoping: &mut Scoping,
    uids: &mut UidGenerator,
    program: &mut Program<'a>,
) -> usize {
    let root = scoping.root_scope_id();
    let mut renames = FxHashMap::default();
    for name in ["module", "exports", "require"] {
        if let Some(symbol_id) = scoping.get_binding(root, name) {
            renames.insert(symbol_id, ast.atom(&uids.generate(name)));
        }
    }
    if renames.is_empty() {
        return 0;
    }

    let mut renamer = BindingRenamer::new(scoping, renames);
    renamer.visit_program(program);
    let renames = renamer.renames;
    for (symbol_id, name) in &renames {
        scoping.rename_symbol(*symbol_id, root, name);
    }
    renames.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_basename_strips_directories_and_extension() {
        assert_eq!(module_basename("lodash"), "lodash");
        assert_eq!(module_basename("lodash/fp"), "fp");
        assert_eq!(module_basename("./lib/string-helpers.js"), "string-helpers");
        assert_eq!(module_basename("@scope/pkg/"), "pkg");
        assert_eq!(module_basename("./.env"), ".env");
        assert_eq!(module_basename("a.b.mjs"), "a.b");
        assert_eq!(module_basename(".."), "..");
    }

    #[test]
    fn to_identifier_camel_cases_separators() {
        assert_eq!(to_identifier("string-helpers"), "stringHelpers");
        assert_eq!(to_identifier("react dom"), "reactDom");
        assert_eq!(to_identifier("a.b"), "aB");
        assert_eq!(to_identifier("2d-canvas"), "dCanvas");
        assert_eq!(to_identifier(".."), "_");
        assert_eq!(to_identifier("$jq"), "$jq");
    }

    #[test]
    fn generated_names_avoid_each_other() {
        let mut uids = UidGenerator { taken: FxHashSet::default() };
        assert_eq!(uids.generate("lodash"), "_lodash");
        assert_eq!(uids.generate("lodash"), "_lodash2");
        assert_eq!(uids.generate("_lodash3"), "_lodash3");
        assert_eq!(uids.generate("lodash"), "_lodash4");
    }

    #[test]
    fn generated_names_avoid_taken_names() {
        let mut uids = UidGenerator { taken: ["_exports".to_string(), "_exports2".to_string()].into_iter().collect() };
        assert_eq!(uids.generate("exports"), "_exports3");
    }
}
